use iso8601_timestamp::Timestamp;

use crate::logic::{self, LoginEffect, LoginOutcome, LoginTransition};
use crate::models::{RecoveryToken, RecoveryTokenKind, Session};
use crate::util::{normalise_email, throttle_key};
use crate::{Error, Result, Unigate};

/// When a session was created, recovered from its ulid
///
/// A session id which does not parse yields None, which keeps the
/// failed attempt counter live rather than failing the login.
fn session_issued_at(session: &Session) -> Option<Timestamp> {
    let datetime = ulid::Ulid::from_string(&session.id).ok()?.datetime();

    Some(Timestamp::from_unix_timestamp_ms(
        datetime
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64,
    ))
}

impl Unigate {
    /// Attempt a regular password login
    ///
    /// Never errors on bad credentials; every attempt maps to a
    /// `LoginOutcome` so callers can report attempt counts.
    pub async fn attempt_login(
        &self,
        email: String,
        password: String,
        ip: String,
    ) -> Result<LoginOutcome> {
        let email_normalised = normalise_email(email);

        let account = self
            .database
            .find_account_by_normalised_email(&email_normalised)
            .await?;

        let password_matches = account
            .as_ref()
            .map(|account| account.verify_password(&password).is_ok())
            .unwrap_or_default();

        let last_session_issued = match &account {
            Some(account) => self
                .database
                .find_latest_session(&account.id)
                .await?
                .and_then(|session| session_issued_at(&session)),
            None => None,
        };

        let decision = logic::decide(
            account.as_ref(),
            password_matches,
            last_session_issued,
            Timestamp::now_utc(),
            &self.config.login,
        );

        let mut account = match account {
            Some(account) => account,
            None => return Ok(LoginOutcome::NoUser),
        };

        let mut failed_attempts = account.failed_login_attempts;

        for effect in &decision.effects {
            match effect {
                LoginEffect::ResetStaleAttempts => {
                    self.database.reset_failed_attempts(&account.id).await?;
                    account.failed_login_attempts = 0;
                    failed_attempts = 0;
                }
                LoginEffect::IncrementAttempts => {
                    // the store hands back the authoritative count
                    failed_attempts = self.database.increment_failed_attempts(&account.id).await?;
                    account.failed_login_attempts = failed_attempts;
                }
                LoginEffect::IssueTemporaryPassword => {
                    RecoveryToken::issue_temporary(self, &account, ip.clone()).await?;
                }
                LoginEffect::IssueVerificationToken => {
                    account.start_email_verification(self).await?;
                }
                LoginEffect::IssueSession => {
                    self.database.reset_failed_attempts(&account.id).await?;
                }
            }
        }

        let account_verified = account.email_verified_at.is_some();

        Ok(match decision.transition {
            LoginTransition::NoUser => LoginOutcome::NoUser,
            LoginTransition::Unverified => LoginOutcome::Unverified,
            LoginTransition::WrongPassword => LoginOutcome::WrongPassword {
                failed_attempts,
                remaining_attempts: self.config.login.remaining_attempts(failed_attempts),
                max_attempts: self.config.login.max_attempts,
                account_verified,
            },
            LoginTransition::TemporaryPasswordIssued => LoginOutcome::TemporaryPasswordIssued {
                failed_attempts,
                max_attempts: self.config.login.max_attempts,
                account_verified,
            },
            LoginTransition::Ok => LoginOutcome::Success(
                account
                    .create_session(self, "auth_token".into(), self.config.login.session_ttl)
                    .await?,
            ),
        })
    }

    /// Log in with an emailed temporary password
    ///
    /// Only the most recently issued temporary password is considered,
    /// and redeeming it zeroes the failed attempt counter and clears
    /// the account's login throttle.
    pub async fn login_with_temporary_password(
        &self,
        email: String,
        code: String,
        ip: String,
    ) -> Result<Session> {
        let email_normalised = normalise_email(email.clone());

        let account = self
            .database
            .find_account_by_normalised_email(&email_normalised)
            .await?
            .ok_or(Error::InvalidCredentials)?;

        let token = self
            .database
            .find_latest_recovery_token(&account.id, RecoveryTokenKind::Temporary)
            .await?
            .ok_or(Error::InvalidCredentials)?;

        if token.used || token.is_expired() {
            return Err(Error::InvalidCredentials);
        }

        if !matches!(
            argon2::verify_encoded(&token.secret, code.as_bytes()),
            Ok(true)
        ) {
            return Err(Error::InvalidCredentials);
        }

        token
            .consume(self)
            .await
            .map_err(|_| Error::InvalidCredentials)?;

        self.database.reset_failed_attempts(&account.id).await?;
        self.rate_limiter.clear(&throttle_key(&email, &ip));

        account
            .create_session(
                self,
                "temp_auth_token".into(),
                self.config.login.session_ttl,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::logic::LoginOutcome;
    use crate::test::*;

    async fn registered_account(unigate: &Unigate) -> Account {
        Account::new(
            unigate,
            "Example Student".into(),
            "1234567@example.edu".into(),
            "password_insecure".into(),
            None,
            false,
            "127.0.0.1".into(),
        )
        .await
        .unwrap()
    }

    #[async_std::test]
    async fn it_logs_in_with_correct_credentials() {
        let (unigate, _receiver) = for_test();
        let account = registered_account(&unigate).await;

        match unigate
            .attempt_login(
                "1234567@example.edu".into(),
                "password_insecure".into(),
                "127.0.0.1".into(),
            )
            .await
            .unwrap()
        {
            LoginOutcome::Success(session) => {
                assert_eq!(session.user_id, account.id);
                assert!(!session.is_expired());
            }
            outcome => panic!("unexpected outcome: {:?}", outcome),
        }
    }

    #[async_std::test]
    async fn it_reports_unknown_users() {
        let (unigate, _receiver) = for_test();

        assert!(matches!(
            unigate
                .attempt_login(
                    "7654321@example.edu".into(),
                    "password_insecure".into(),
                    "127.0.0.1".into(),
                )
                .await
                .unwrap(),
            LoginOutcome::NoUser
        ));
    }

    #[async_std::test]
    async fn it_counts_attempts_and_issues_a_temporary_password() {
        let (unigate, _receiver) = for_test();
        let account = registered_account(&unigate).await;

        for attempt in 1..=4 {
            match unigate
                .attempt_login(
                    "1234567@example.edu".into(),
                    "wrong_password".into(),
                    "127.0.0.1".into(),
                )
                .await
                .unwrap()
            {
                LoginOutcome::WrongPassword {
                    failed_attempts,
                    remaining_attempts,
                    max_attempts,
                    ..
                } => {
                    assert_eq!(failed_attempts, attempt);
                    assert_eq!(remaining_attempts, max_attempts - attempt);
                }
                outcome => panic!("unexpected outcome: {:?}", outcome),
            }

            assert!(outbox(&unigate).take().is_empty());
        }

        // fifth failure sends a temporary password
        match unigate
            .attempt_login(
                "1234567@example.edu".into(),
                "wrong_password".into(),
                "127.0.0.1".into(),
            )
            .await
            .unwrap()
        {
            LoginOutcome::TemporaryPasswordIssued {
                failed_attempts, ..
            } => assert_eq!(failed_attempts, 5),
            outcome => panic!("unexpected outcome: {:?}", outcome),
        }

        let mail = outbox(&unigate).take().pop().expect("an email");
        let first_code = mail.variables["code"].as_str().unwrap().to_string();

        // further failures keep sending fresh ones
        match unigate
            .attempt_login(
                "1234567@example.edu".into(),
                "wrong_password".into(),
                "127.0.0.1".into(),
            )
            .await
            .unwrap()
        {
            LoginOutcome::TemporaryPasswordIssued {
                failed_attempts, ..
            } => assert_eq!(failed_attempts, 6),
            outcome => panic!("unexpected outcome: {:?}", outcome),
        }

        let mail = outbox(&unigate).take().pop().expect("an email");
        let second_code = mail.variables["code"].as_str().unwrap().to_string();

        // the first code was invalidated by the second
        assert_eq!(
            unigate
                .login_with_temporary_password(
                    "1234567@example.edu".into(),
                    first_code,
                    "127.0.0.1".into(),
                )
                .await
                .unwrap_err(),
            Error::InvalidCredentials
        );

        // the second one works and resets the counter
        let session = unigate
            .login_with_temporary_password(
                "1234567@example.edu".into(),
                second_code.clone(),
                "127.0.0.1".into(),
            )
            .await
            .unwrap();

        assert_eq!(session.user_id, account.id);
        assert_eq!(session.name, "temp_auth_token");

        let account = unigate.database.find_account(&account.id).await.unwrap();
        assert_eq!(account.failed_login_attempts, 0);

        // and it is single use
        assert_eq!(
            unigate
                .login_with_temporary_password(
                    "1234567@example.edu".into(),
                    second_code,
                    "127.0.0.1".into(),
                )
                .await
                .unwrap_err(),
            Error::InvalidCredentials
        );
    }

    #[async_std::test]
    async fn it_resets_the_counter_on_a_correct_login() {
        let (unigate, _receiver) = for_test();
        let mut account = registered_account(&unigate).await;

        account.failed_login_attempts = 4;
        account.save(&unigate).await.unwrap();

        match unigate
            .attempt_login(
                "1234567@example.edu".into(),
                "password_insecure".into(),
                "127.0.0.1".into(),
            )
            .await
            .unwrap()
        {
            LoginOutcome::Success(session) => assert_eq!(session.user_id, account.id),
            outcome => panic!("unexpected outcome: {:?}", outcome),
        }

        let account = unigate.database.find_account(&account.id).await.unwrap();
        assert_eq!(account.failed_login_attempts, 0);

        // no temporary password was minted along the way
        assert!(unigate
            .database
            .find_latest_recovery_token(&account.id, RecoveryTokenKind::Temporary)
            .await
            .unwrap()
            .is_none());
        assert!(outbox(&unigate).take().is_empty());
    }

    #[async_std::test]
    async fn it_tolerates_sessions_with_malformed_ids() {
        let (unigate, _receiver) = for_test();
        let mut account = registered_account(&unigate).await;

        account.failed_login_attempts = 4;
        account.save(&unigate).await.unwrap();

        let session = Session {
            id: "not a ulid".into(),
            user_id: account.id.clone(),
            token: nanoid!(64),
            name: "auth_token".into(),
            expires_at: crate::util::timestamp_after(3600),
        };
        session.save(&unigate).await.unwrap();

        // the counter stays live rather than the login falling over
        match unigate
            .attempt_login(
                "1234567@example.edu".into(),
                "wrong_password".into(),
                "127.0.0.1".into(),
            )
            .await
            .unwrap()
        {
            LoginOutcome::TemporaryPasswordIssued {
                failed_attempts, ..
            } => assert_eq!(failed_attempts, 5),
            outcome => panic!("unexpected outcome: {:?}", outcome),
        }
    }

    #[async_std::test]
    async fn it_forgives_stale_counters() {
        let (unigate, _receiver) = for_test();
        let mut account = registered_account(&unigate).await;

        account.failed_login_attempts = 4;
        account.save(&unigate).await.unwrap();

        // last session predates the idle window
        let issued = std::time::SystemTime::now() - std::time::Duration::from_secs(3 * 3600);
        let session = Session {
            id: ulid::Ulid::from_datetime(issued).to_string(),
            user_id: account.id.clone(),
            token: nanoid!(64),
            name: "auth_token".into(),
            expires_at: crate::util::timestamp_after(-3600),
        };
        session.save(&unigate).await.unwrap();

        match unigate
            .attempt_login(
                "1234567@example.edu".into(),
                "wrong_password".into(),
                "127.0.0.1".into(),
            )
            .await
            .unwrap()
        {
            LoginOutcome::WrongPassword {
                failed_attempts, ..
            } => assert_eq!(failed_attempts, 1),
            outcome => panic!("unexpected outcome: {:?}", outcome),
        }
    }

    #[async_std::test]
    async fn it_blocks_unverified_accounts_and_resends_verification() {
        let (unigate, _receiver) = for_test();

        Account::new(
            &unigate,
            "Example Student".into(),
            "1234567@example.edu".into(),
            "password_insecure".into(),
            None,
            true,
            "127.0.0.1".into(),
        )
        .await
        .unwrap();

        // registration itself sent one verification email
        assert_eq!(outbox(&unigate).take().len(), 1);

        assert!(matches!(
            unigate
                .attempt_login(
                    "1234567@example.edu".into(),
                    "password_insecure".into(),
                    "127.0.0.1".into(),
                )
                .await
                .unwrap(),
            LoginOutcome::Unverified
        ));

        // a token is already outstanding, no duplicate email
        assert!(outbox(&unigate).take().is_empty());
    }

    #[async_std::test]
    async fn it_rejects_expired_temporary_passwords() {
        let (unigate, _receiver) = for_test_with_config(Config {
            recovery: RecoveryPolicy {
                expire_temporary: -1,
                ..Default::default()
            },
            ..Default::default()
        });

        let account = registered_account(&unigate).await;
        crate::models::RecoveryToken::issue_temporary(&unigate, &account, "127.0.0.1".into())
            .await
            .unwrap();

        let mail = outbox(&unigate).take().pop().expect("an email");
        let code = mail.variables["code"].as_str().unwrap().to_string();

        assert_eq!(
            unigate
                .login_with_temporary_password(
                    "1234567@example.edu".into(),
                    code,
                    "127.0.0.1".into(),
                )
                .await
                .unwrap_err(),
            Error::InvalidCredentials
        );
    }
}
