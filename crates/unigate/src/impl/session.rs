use iso8601_timestamp::Timestamp;

use crate::{models::Session, Success, Unigate, UnigateEvent};

impl Session {
    /// Whether this session is past its expiry
    pub fn is_expired(&self) -> bool {
        *Timestamp::now_utc() > *self.expires_at
    }

    /// Save model
    pub async fn save(&self, unigate: &Unigate) -> Success {
        unigate.database.save_session(self).await
    }

    /// Delete session
    pub async fn delete(self, unigate: &Unigate) -> Success {
        // Delete from database
        unigate.database.delete_session(&self.id).await?;

        // Create and push event
        unigate
            .publish_event(UnigateEvent::DeleteSession {
                user_id: self.user_id,
                session_id: self.id,
            })
            .await;

        Ok(())
    }
}

impl Unigate {
    /// Delete all of a user's sessions
    pub async fn revoke_all_sessions(&self, user_id: String, ignore: Option<String>) -> Success {
        self.database
            .delete_all_sessions(&user_id, ignore.clone())
            .await?;

        self.publish_event(UnigateEvent::DeleteAllSessions {
            user_id,
            exclude_session_id: ignore,
        })
        .await;

        Ok(())
    }
}
