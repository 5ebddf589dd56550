use crate::{
    models::{Account, RecoveryToken, RecoveryTokenKind, Session},
    Error, Result, Success,
};

use chrono::Duration;
use futures::lock::Mutex;
use iso8601_timestamp::Timestamp;
use std::collections::HashMap;
use std::sync::Arc;

use super::definition::AbstractDatabase;

#[derive(Default, Clone)]
pub struct DummyDb {
    pub accounts: Arc<Mutex<HashMap<String, Account>>>,
    pub recovery_tokens: Arc<Mutex<HashMap<String, RecoveryToken>>>,
    pub sessions: Arc<Mutex<HashMap<String, Session>>>,
}

#[async_trait]
impl AbstractDatabase for DummyDb {
    /// Find account by id
    async fn find_account(&self, id: &str) -> Result<Account> {
        let accounts = self.accounts.lock().await;
        accounts.get(id).cloned().ok_or(Error::UnknownUser)
    }

    /// Find account by normalised email
    async fn find_account_by_normalised_email(
        &self,
        normalised_email: &str,
    ) -> Result<Option<Account>> {
        let accounts = self.accounts.lock().await;
        Ok(accounts
            .values()
            .find(|account| account.email_normalised == normalised_email)
            .cloned())
    }

    /// Find account by email verification token
    async fn find_account_by_verification_token(&self, token: &str) -> Result<Option<Account>> {
        let accounts = self.accounts.lock().await;
        Ok(accounts
            .values()
            .find(|account| account.verification_token.as_deref() == Some(token))
            .cloned())
    }

    /// Save account
    async fn save_account(&self, account: &Account) -> Success {
        let mut accounts = self.accounts.lock().await;
        accounts.insert(account.id.to_string(), account.clone());
        Ok(())
    }

    /// Atomically bump an account's failed login counter
    async fn increment_failed_attempts(&self, account_id: &str) -> Result<i32> {
        let mut accounts = self.accounts.lock().await;
        let account = accounts.get_mut(account_id).ok_or(Error::UnknownUser)?;
        account.failed_login_attempts += 1;
        Ok(account.failed_login_attempts)
    }

    /// Reset an account's failed login counter to zero
    async fn reset_failed_attempts(&self, account_id: &str) -> Success {
        let mut accounts = self.accounts.lock().await;
        let account = accounts.get_mut(account_id).ok_or(Error::UnknownUser)?;
        account.failed_login_attempts = 0;
        Ok(())
    }

    /// Save recovery token
    async fn save_recovery_token(&self, token: &RecoveryToken) -> Success {
        let mut tokens = self.recovery_tokens.lock().await;
        tokens.insert(token.id.to_string(), token.clone());
        Ok(())
    }

    /// Find recovery token by its secret
    async fn find_recovery_token_by_secret(
        &self,
        secret: &str,
        kind: RecoveryTokenKind,
    ) -> Result<Option<RecoveryToken>> {
        let tokens = self.recovery_tokens.lock().await;
        Ok(tokens
            .values()
            .find(|token| token.kind == kind && token.secret == secret)
            .cloned())
    }

    /// Find an account's most recently issued recovery token of a given kind
    async fn find_latest_recovery_token(
        &self,
        account_id: &str,
        kind: RecoveryTokenKind,
    ) -> Result<Option<RecoveryToken>> {
        let tokens = self.recovery_tokens.lock().await;
        Ok(tokens
            .values()
            .filter(|token| token.account_id == account_id && token.kind == kind)
            // ulids sort chronologically
            .max_by(|a, b| a.id.cmp(&b.id))
            .cloned())
    }

    /// Mark an account's unused recovery tokens of a given kind as used
    async fn invalidate_recovery_tokens(
        &self,
        account_id: &str,
        kind: RecoveryTokenKind,
    ) -> Success {
        let mut tokens = self.recovery_tokens.lock().await;
        let now = Timestamp::now_utc();
        for token in tokens.values_mut() {
            if token.account_id == account_id && token.kind == kind && !token.used {
                token.used = true;
                token.used_at = Some(now);
            }
        }

        Ok(())
    }

    /// Atomically mark a recovery token as used
    async fn consume_recovery_token(&self, id: &str) -> Success {
        let mut tokens = self.recovery_tokens.lock().await;
        let token = tokens.get_mut(id).ok_or(Error::InvalidToken)?;
        if token.used {
            return Err(Error::InvalidToken);
        }

        token.used = true;
        token.used_at = Some(Timestamp::now_utc());
        Ok(())
    }

    /// Delete recovery tokens which no longer serve a purpose
    async fn prune_recovery_tokens(&self, retain_used_for: Duration) -> Result<u64> {
        let mut tokens = self.recovery_tokens.lock().await;
        let now = Timestamp::now_utc();
        let cutoff = crate::util::timestamp_after(-retain_used_for.num_seconds());

        let before = tokens.len();
        tokens.retain(|_, token| {
            if token.used {
                match token.used_at {
                    Some(used_at) => *used_at >= *cutoff,
                    None => false,
                }
            } else {
                *token.expires_at >= *now
            }
        });

        Ok((before - tokens.len()) as u64)
    }

    /// Save session
    async fn save_session(&self, session: &Session) -> Success {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(session.id.to_string(), session.clone());
        Ok(())
    }

    /// Find session by token
    async fn find_session_by_token(&self, token: &str) -> Result<Option<Session>> {
        let sessions = self.sessions.lock().await;
        Ok(sessions
            .values()
            .find(|session| session.token == token)
            .cloned())
    }

    /// Find a user's most recently issued session
    async fn find_latest_session(&self, user_id: &str) -> Result<Option<Session>> {
        let sessions = self.sessions.lock().await;
        Ok(sessions
            .values()
            .filter(|session| session.user_id == user_id)
            .max_by(|a, b| a.id.cmp(&b.id))
            .cloned())
    }

    /// Delete session
    async fn delete_session(&self, id: &str) -> Success {
        let mut sessions = self.sessions.lock().await;
        if sessions.remove(id).is_some() {
            Ok(())
        } else {
            Err(Error::InvalidSession)
        }
    }

    /// Delete all of a user's sessions
    async fn delete_all_sessions(&self, user_id: &str, ignore: Option<String>) -> Success {
        let mut sessions = self.sessions.lock().await;
        sessions.retain(|_, session| {
            if session.user_id == user_id {
                if let Some(ignore) = &ignore {
                    ignore == &session.id
                } else {
                    false
                }
            } else {
                true
            }
        });

        Ok(())
    }
}
