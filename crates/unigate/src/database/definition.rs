use chrono::Duration;

use crate::{
    models::{Account, RecoveryToken, RecoveryTokenKind, Session},
    Result, Success,
};

#[async_trait]
pub trait AbstractDatabase: Sync + Send {
    /// Find account by id
    async fn find_account(&self, id: &str) -> Result<Account>;

    /// Find account by normalised email
    async fn find_account_by_normalised_email(
        &self,
        normalised_email: &str,
    ) -> Result<Option<Account>>;

    /// Find account by email verification token
    async fn find_account_by_verification_token(&self, token: &str) -> Result<Option<Account>>;

    /// Save account
    async fn save_account(&self, account: &Account) -> Success;

    /// Atomically bump an account's failed login counter
    ///
    /// Returns the counter value after the increment.
    async fn increment_failed_attempts(&self, account_id: &str) -> Result<i32>;

    /// Reset an account's failed login counter to zero
    async fn reset_failed_attempts(&self, account_id: &str) -> Success;

    /// Save recovery token
    async fn save_recovery_token(&self, token: &RecoveryToken) -> Success;

    /// Find recovery token by its secret
    async fn find_recovery_token_by_secret(
        &self,
        secret: &str,
        kind: RecoveryTokenKind,
    ) -> Result<Option<RecoveryToken>>;

    /// Find an account's most recently issued recovery token of a given kind
    async fn find_latest_recovery_token(
        &self,
        account_id: &str,
        kind: RecoveryTokenKind,
    ) -> Result<Option<RecoveryToken>>;

    /// Mark an account's unused recovery tokens of a given kind as used
    async fn invalidate_recovery_tokens(
        &self,
        account_id: &str,
        kind: RecoveryTokenKind,
    ) -> Success;

    /// Atomically mark a recovery token as used
    ///
    /// Fails with `Error::InvalidToken` if the token is missing or was
    /// already consumed, so two concurrent redemptions cannot both win.
    async fn consume_recovery_token(&self, id: &str) -> Success;

    /// Delete recovery tokens which no longer serve a purpose
    ///
    /// Removes unused tokens past their expiry and used tokens consumed
    /// longer ago than the retention window. Returns how many were deleted.
    async fn prune_recovery_tokens(&self, retain_used_for: Duration) -> Result<u64>;

    /// Save session
    async fn save_session(&self, session: &Session) -> Success;

    /// Find session by token
    async fn find_session_by_token(&self, token: &str) -> Result<Option<Session>>;

    /// Find a user's most recently issued session
    async fn find_latest_session(&self, user_id: &str) -> Result<Option<Session>>;

    /// Delete session
    async fn delete_session(&self, id: &str) -> Success;

    /// Delete all of a user's sessions
    async fn delete_all_sessions(&self, user_id: &str, ignore: Option<String>) -> Success;
}
