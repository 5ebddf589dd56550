use iso8601_timestamp::Timestamp;

use crate::logic::VerifyEmailOutcome;
use crate::models::{Account, Role, Session, StudentType};
use crate::util::{hash_password, normalise_email, timestamp_after};
use crate::{Error, Result, Success, Unigate, UnigateEvent};

impl Account {
    /// Create a new account
    ///
    /// If an account already exists for the email, no new account is
    /// created; instead the existing one is nudged along, which keeps
    /// registration responses identical for both cases.
    pub async fn new(
        unigate: &Unigate,
        name: String,
        email: String,
        plaintext_password: String,
        student_type: Option<StudentType>,
        verify_email: bool,
        ip: String,
    ) -> Result<Account> {
        unigate.config.email_policy.validate(&email)?;
        unigate
            .config
            .password_policy
            .assert_safe(&plaintext_password)?;

        // Hash the user's password
        let password = hash_password(plaintext_password)?;

        // Get a normalised representation of the user's email
        let email_normalised = normalise_email(email.clone());

        // Try to find an existing account
        if let Some(mut account) = unigate
            .database
            .find_account_by_normalised_email(&email_normalised)
            .await?
        {
            // Resend account verification or send password reset
            if account.email_verified_at.is_none() {
                account.start_email_verification(unigate).await?;
            } else {
                crate::models::RecoveryToken::issue_reset(unigate, &account, ip).await?;
            }

            Ok(account)
        } else {
            // Create a new account
            let mut account = Account {
                id: ulid::Ulid::new().to_string(),

                email,
                email_normalised,
                name,
                password,

                role: Role::User,
                student_type,

                failed_login_attempts: 0,
                email_verified_at: None,
                verification_token: None,
            };

            // Send email verification
            if verify_email {
                account.start_email_verification(unigate).await?;
            } else {
                account.email_verified_at = Some(Timestamp::now_utc());
                unigate.database.save_account(&account).await?;
            }

            unigate
                .publish_event(UnigateEvent::CreateAccount {
                    account: account.clone(),
                })
                .await;

            Ok(account)
        }
    }

    /// Create a new session
    pub async fn create_session(
        &self,
        unigate: &Unigate,
        name: String,
        ttl_seconds: i64,
    ) -> Result<Session> {
        let session = Session {
            id: ulid::Ulid::new().to_string(),
            token: nanoid!(64),

            user_id: self.id.clone(),
            name,

            expires_at: timestamp_after(ttl_seconds),
        };

        unigate.database.save_session(&session).await?;

        unigate
            .publish_event(UnigateEvent::CreateSession {
                session: session.clone(),
            })
            .await;

        Ok(session)
    }

    /// Send account verification email
    pub async fn start_email_verification(&mut self, unigate: &Unigate) -> Success {
        let token = nanoid!(32);
        let url = format!("{}{}", unigate.config.templates.verify.url, token);

        unigate
            .mailer
            .send(
                self.email.clone(),
                &unigate.config.templates.verify,
                json!({ "url": url }),
            )
            .ok();

        self.verification_token = Some(token);
        unigate.database.save_account(self).await
    }

    /// Verify a user's password is correct
    pub fn verify_password(&self, plaintext_password: &str) -> Success {
        argon2::verify_encoded(&self.password, plaintext_password.as_bytes())
            .map(|v| {
                if v {
                    Ok(())
                } else {
                    Err(Error::InvalidCredentials)
                }
            })
            // To prevent user enumeration, we should ignore
            // the error and pretend the password is wrong.
            .map_err(|_| Error::InvalidCredentials)?
    }

    /// Save model
    pub async fn save(&self, unigate: &Unigate) -> Success {
        unigate.database.save_account(self).await
    }
}

impl Unigate {
    /// Redeem an email verification token
    ///
    /// Verifying also zeroes the failed attempt counter; the account
    /// holder has just proven control of the mailbox.
    pub async fn verify_email_token(&self, token: &str) -> Result<VerifyEmailOutcome> {
        let mut account = match self
            .database
            .find_account_by_verification_token(token)
            .await?
        {
            Some(account) => account,
            None => return Ok(VerifyEmailOutcome::Invalid),
        };

        if account.email_verified_at.is_some() {
            account.verification_token = None;
            account.save(self).await?;
            return Ok(VerifyEmailOutcome::AlreadyVerified);
        }

        account.email_verified_at = Some(Timestamp::now_utc());
        account.verification_token = None;
        account.failed_login_attempts = 0;
        account.save(self).await?;

        Ok(VerifyEmailOutcome::Verified(account))
    }
}
