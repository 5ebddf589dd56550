use std::time::Duration;

use iso8601_timestamp::Timestamp;

use crate::config::AdminOverride;
use crate::logic::AdminLoginOutcome;
use crate::models::Role;
use crate::util::normalise_email;
use crate::{Result, Unigate};

impl Unigate {
    /// Attempt a login against the configured administrator override
    ///
    /// Credentials come from configuration, not the database; the
    /// matching account only has to exist. Failures are throttled per
    /// address independently of the regular lockout machine.
    pub async fn admin_login(
        &self,
        email: String,
        secret: String,
        ip: String,
    ) -> Result<AdminLoginOutcome> {
        let (max_attempts, lockout_seconds, session_ttl) = match &self.config.admin_override {
            AdminOverride::Enabled {
                max_attempts,
                lockout_seconds,
                session_ttl,
                ..
            } => (*max_attempts, *lockout_seconds, *session_ttl),
            AdminOverride::Disabled => {
                warn!("Administrator login attempted while the override is disabled.");
                return Ok(AdminLoginOutcome::InvalidCredentials);
            }
        };

        let key = format!("admin-login:{}", ip);

        if self.rate_limiter.too_many_attempts(&key, max_attempts) {
            return Ok(AdminLoginOutcome::RateLimited {
                retry_after: self.rate_limiter.available_in(&key),
            });
        }

        if !self.config.admin_override.verify(&email, &secret) {
            self.rate_limiter
                .hit(&key, Duration::from_secs(lockout_seconds));

            return Ok(AdminLoginOutcome::InvalidCredentials);
        }

        self.rate_limiter.clear(&key);

        let email_normalised = normalise_email(email);
        let mut account = match self
            .database
            .find_account_by_normalised_email(&email_normalised)
            .await?
        {
            Some(account) => account,
            None => {
                warn!("Administrator credentials matched but no account exists.");
                return Ok(AdminLoginOutcome::InvalidCredentials);
            }
        };

        // the override is the source of truth for this account's standing
        if account.role != Role::Admin || account.email_verified_at.is_none() {
            account.role = Role::Admin;
            account.email_verified_at.get_or_insert(Timestamp::now_utc());
            account.save(self).await?;
        }

        info!("Administrator logged in from {}.", ip);

        let session = account
            .create_session(self, "admin_auth_token".into(), session_ttl)
            .await?;

        Ok(AdminLoginOutcome::Success(session))
    }
}
