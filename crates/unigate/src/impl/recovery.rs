use iso8601_timestamp::Timestamp;

use crate::models::{Account, RecoveryToken, RecoveryTokenKind};
use crate::util::{hash_password, normalise_email, temporary_password, timestamp_after};
use crate::{Error, Result, Success, Unigate};

impl RecoveryToken {
    /// Issue a password reset link token
    ///
    /// Any earlier unused reset token stops being redeemable.
    pub async fn issue_reset(
        unigate: &Unigate,
        account: &Account,
        ip: String,
    ) -> Result<RecoveryToken> {
        unigate
            .database
            .invalidate_recovery_tokens(&account.id, RecoveryTokenKind::Reset)
            .await?;

        let token = RecoveryToken {
            id: ulid::Ulid::new().to_string(),
            account_id: account.id.clone(),
            kind: RecoveryTokenKind::Reset,
            secret: nanoid!(64),
            expires_at: timestamp_after(unigate.config.recovery.expire_reset),
            used: false,
            used_at: None,
            issued_by_ip: ip,
        };

        token.save(unigate).await?;

        let url = format!("{}{}", unigate.config.templates.reset.url, token.secret);
        unigate
            .mailer
            .send(
                account.email.clone(),
                &unigate.config.templates.reset,
                json!({ "url": url }),
            )
            .ok();

        Ok(token)
    }

    /// Issue a temporary password
    ///
    /// Only the argon2 hash is stored; the plaintext code goes out by
    /// email and is gone. Any earlier unused temporary password stops
    /// being redeemable.
    pub async fn issue_temporary(
        unigate: &Unigate,
        account: &Account,
        ip: String,
    ) -> Result<RecoveryToken> {
        unigate
            .database
            .invalidate_recovery_tokens(&account.id, RecoveryTokenKind::Temporary)
            .await?;

        let code = temporary_password();

        let token = RecoveryToken {
            id: ulid::Ulid::new().to_string(),
            account_id: account.id.clone(),
            kind: RecoveryTokenKind::Temporary,
            secret: hash_password(code.clone())?,
            expires_at: timestamp_after(unigate.config.recovery.expire_temporary),
            used: false,
            used_at: None,
            issued_by_ip: ip,
        };

        token.save(unigate).await?;

        unigate
            .mailer
            .send(
                account.email.clone(),
                &unigate.config.templates.temporary_password,
                json!({ "code": code }),
            )
            .ok();

        Ok(token)
    }

    /// Whether this token is past its expiry
    pub fn is_expired(&self) -> bool {
        *Timestamp::now_utc() > *self.expires_at
    }

    /// Atomically mark this token as used
    pub async fn consume(&self, unigate: &Unigate) -> Success {
        unigate.database.consume_recovery_token(&self.id).await
    }

    /// Save model
    pub async fn save(&self, unigate: &Unigate) -> Success {
        unigate.database.save_recovery_token(self).await
    }
}

impl Unigate {
    /// Email a password reset link if the email belongs to an account
    ///
    /// Always reports success so callers cannot probe which emails
    /// are registered.
    pub async fn send_password_reset(&self, email: String, ip: String) -> Success {
        let email_normalised = normalise_email(email);

        if let Some(account) = self
            .database
            .find_account_by_normalised_email(&email_normalised)
            .await?
        {
            RecoveryToken::issue_reset(self, &account, ip).await?;
        }

        Ok(())
    }

    /// Redeem a password reset token and set a new password
    ///
    /// All existing sessions are revoked; whoever requested the reset
    /// wants everyone else out.
    pub async fn reset_password(&self, token: String, new_password: String) -> Success {
        self.config.password_policy.assert_safe(&new_password)?;

        let token = self
            .database
            .find_recovery_token_by_secret(&token, RecoveryTokenKind::Reset)
            .await?
            .ok_or(Error::InvalidToken)?;

        if token.used || token.is_expired() {
            return Err(Error::InvalidToken);
        }

        token.consume(self).await?;

        let mut account = self.database.find_account(&token.account_id).await?;
        account.password = hash_password(new_password)?;
        account.failed_login_attempts = 0;
        account.save(self).await?;

        self.revoke_all_sessions(account.id, None).await
    }

    /// Delete recovery tokens which no longer serve a purpose
    ///
    /// Meant to be driven by the host application's scheduler.
    pub async fn prune_recovery_tokens(&self) -> Result<u64> {
        let pruned = self
            .database
            .prune_recovery_tokens(chrono::Duration::days(
                self.config.recovery.retain_used_days,
            ))
            .await?;

        if pruned > 0 {
            info!("Pruned {} recovery tokens.", pruned);
        }

        Ok(pruned)
    }
}
