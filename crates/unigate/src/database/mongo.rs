use chrono::Duration;
use iso8601_timestamp::Timestamp;
use mongodb::options::{
    FindOneAndUpdateOptions, FindOneOptions, ReplaceOptions, ReturnDocument,
};
use std::ops::Deref;

use crate::{
    models::{Account, RecoveryToken, RecoveryTokenKind, Session},
    Error, Result, Success,
};

use super::definition::AbstractDatabase;

#[derive(Clone)]
pub struct MongoDb(pub mongodb::Database);

impl Deref for MongoDb {
    type Target = mongodb::Database;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl AbstractDatabase for MongoDb {
    /// Find account by id
    async fn find_account(&self, id: &str) -> Result<Account> {
        self.collection("accounts")
            .find_one(
                doc! {
                    "_id": id
                },
                None,
            )
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "find_one",
                with: "account",
            })?
            .ok_or(Error::UnknownUser)
    }

    /// Find account by normalised email
    ///
    /// Normalised emails are stored lowercased so an exact match suffices.
    async fn find_account_by_normalised_email(
        &self,
        normalised_email: &str,
    ) -> Result<Option<Account>> {
        self.collection("accounts")
            .find_one(
                doc! {
                    "email_normalised": normalised_email
                },
                None,
            )
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "find_one",
                with: "account",
            })
    }

    /// Find account by email verification token
    async fn find_account_by_verification_token(&self, token: &str) -> Result<Option<Account>> {
        self.collection("accounts")
            .find_one(
                doc! {
                    "verification_token": token
                },
                None,
            )
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "find_one",
                with: "account",
            })
    }

    /// Save account
    async fn save_account(&self, account: &Account) -> Success {
        self.collection::<Account>("accounts")
            .replace_one(
                doc! {
                    "_id": &account.id
                },
                account,
                ReplaceOptions::builder().upsert(true).build(),
            )
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "upsert_one",
                with: "account",
            })
            .map(|_| ())
    }

    /// Atomically bump an account's failed login counter
    async fn increment_failed_attempts(&self, account_id: &str) -> Result<i32> {
        self.collection::<Account>("accounts")
            .find_one_and_update(
                doc! {
                    "_id": account_id
                },
                doc! {
                    "$inc": {
                        "failed_login_attempts": 1
                    }
                },
                FindOneAndUpdateOptions::builder()
                    .return_document(ReturnDocument::After)
                    .build(),
            )
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "update_one",
                with: "account",
            })?
            .map(|account| account.failed_login_attempts)
            .ok_or(Error::UnknownUser)
    }

    /// Reset an account's failed login counter to zero
    async fn reset_failed_attempts(&self, account_id: &str) -> Success {
        self.collection::<Account>("accounts")
            .update_one(
                doc! {
                    "_id": account_id
                },
                doc! {
                    "$set": {
                        "failed_login_attempts": 0
                    }
                },
                None,
            )
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "update_one",
                with: "account",
            })
            .map(|_| ())
    }

    /// Save recovery token
    async fn save_recovery_token(&self, token: &RecoveryToken) -> Success {
        self.collection::<RecoveryToken>("recovery_tokens")
            .replace_one(
                doc! {
                    "_id": &token.id
                },
                token,
                ReplaceOptions::builder().upsert(true).build(),
            )
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "upsert_one",
                with: "recovery_token",
            })
            .map(|_| ())
    }

    /// Find recovery token by its secret
    async fn find_recovery_token_by_secret(
        &self,
        secret: &str,
        kind: RecoveryTokenKind,
    ) -> Result<Option<RecoveryToken>> {
        self.collection("recovery_tokens")
            .find_one(
                doc! {
                    "secret": secret,
                    "kind": kind.as_str()
                },
                None,
            )
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "find_one",
                with: "recovery_token",
            })
    }

    /// Find an account's most recently issued recovery token of a given kind
    async fn find_latest_recovery_token(
        &self,
        account_id: &str,
        kind: RecoveryTokenKind,
    ) -> Result<Option<RecoveryToken>> {
        self.collection("recovery_tokens")
            .find_one(
                doc! {
                    "account_id": account_id,
                    "kind": kind.as_str()
                },
                FindOneOptions::builder()
                    // ulids sort chronologically
                    .sort(doc! { "_id": -1 })
                    .build(),
            )
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "find_one",
                with: "recovery_token",
            })
    }

    /// Mark an account's unused recovery tokens of a given kind as used
    async fn invalidate_recovery_tokens(
        &self,
        account_id: &str,
        kind: RecoveryTokenKind,
    ) -> Success {
        self.collection::<RecoveryToken>("recovery_tokens")
            .update_many(
                doc! {
                    "account_id": account_id,
                    "kind": kind.as_str(),
                    "used": false
                },
                doc! {
                    "$set": {
                        "used": true,
                        "used_at": Timestamp::now_utc().to_string()
                    }
                },
                None,
            )
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "update_many",
                with: "recovery_token",
            })
            .map(|_| ())
    }

    /// Atomically mark a recovery token as used
    async fn consume_recovery_token(&self, id: &str) -> Success {
        let result = self
            .collection::<RecoveryToken>("recovery_tokens")
            .update_one(
                doc! {
                    "_id": id,
                    "used": false
                },
                doc! {
                    "$set": {
                        "used": true,
                        "used_at": Timestamp::now_utc().to_string()
                    }
                },
                None,
            )
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "update_one",
                with: "recovery_token",
            })?;

        if result.modified_count == 1 {
            Ok(())
        } else {
            Err(Error::InvalidToken)
        }
    }

    /// Delete recovery tokens which no longer serve a purpose
    ///
    /// Timestamps are stored as fixed-width ISO 8601 strings so
    /// lexicographic comparison matches chronological order.
    async fn prune_recovery_tokens(&self, retain_used_for: Duration) -> Result<u64> {
        let now = Timestamp::now_utc().to_string();
        let cutoff = crate::util::timestamp_after(-retain_used_for.num_seconds()).to_string();

        let expired = self
            .collection::<RecoveryToken>("recovery_tokens")
            .delete_many(
                doc! {
                    "used": false,
                    "expires_at": {
                        "$lt": now
                    }
                },
                None,
            )
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "delete_many",
                with: "recovery_token",
            })?;

        let stale = self
            .collection::<RecoveryToken>("recovery_tokens")
            .delete_many(
                doc! {
                    "used": true,
                    "used_at": {
                        "$lt": cutoff
                    }
                },
                None,
            )
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "delete_many",
                with: "recovery_token",
            })?;

        Ok(expired.deleted_count + stale.deleted_count)
    }

    /// Save session
    async fn save_session(&self, session: &Session) -> Success {
        self.collection::<Session>("sessions")
            .replace_one(
                doc! {
                    "_id": &session.id
                },
                session,
                ReplaceOptions::builder().upsert(true).build(),
            )
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "upsert_one",
                with: "session",
            })
            .map(|_| ())
    }

    /// Find session by token
    async fn find_session_by_token(&self, token: &str) -> Result<Option<Session>> {
        self.collection("sessions")
            .find_one(
                doc! {
                    "token": token
                },
                None,
            )
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "find_one",
                with: "session",
            })
    }

    /// Find a user's most recently issued session
    async fn find_latest_session(&self, user_id: &str) -> Result<Option<Session>> {
        self.collection("sessions")
            .find_one(
                doc! {
                    "user_id": user_id
                },
                FindOneOptions::builder().sort(doc! { "_id": -1 }).build(),
            )
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "find_one",
                with: "session",
            })
    }

    /// Delete session
    async fn delete_session(&self, id: &str) -> Success {
        self.collection::<Session>("sessions")
            .delete_one(
                doc! {
                    "_id": id
                },
                None,
            )
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "delete_one",
                with: "session",
            })
            .map(|_| ())
    }

    /// Delete all of a user's sessions
    async fn delete_all_sessions(&self, user_id: &str, ignore: Option<String>) -> Success {
        let mut query = doc! {
            "user_id": user_id
        };

        if let Some(id) = ignore {
            query.insert(
                "_id",
                doc! {
                    "$ne": id
                },
            );
        }

        self.collection::<Session>("sessions")
            .delete_many(query, None)
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "delete_many",
                with: "session",
            })
            .map(|_| ())
    }
}
