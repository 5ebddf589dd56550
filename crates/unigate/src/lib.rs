#[macro_use]
extern crate serde;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate async_trait;
#[macro_use]
extern crate nanoid;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_json;

#[cfg(feature = "schemas")]
#[macro_use]
extern crate schemars;
#[cfg(feature = "database-mongodb")]
#[macro_use]
extern crate bson;

mod result;
pub use result::*;

pub mod config;
pub mod database;
pub mod derive;
pub mod events;
pub mod r#impl;
pub mod logic;
pub mod mailer;
pub mod models;
pub mod ratelimit;
pub mod util;

#[cfg(any(test, feature = "test"))]
pub mod test;

pub use config::Config;
pub use database::Database;
pub use events::UnigateEvent;
pub use mailer::Mailer;
pub use ratelimit::RateLimiter;

use async_std::channel::Sender;

/// Unigate state
#[derive(Default, Clone)]
pub struct Unigate {
    pub config: Config,
    pub database: Database,
    pub mailer: Mailer,
    pub rate_limiter: RateLimiter,
    pub event_channel: Option<Sender<UnigateEvent>>,
}

impl Unigate {
    pub async fn publish_event(&self, event: UnigateEvent) {
        if let Some(sender) = &self.event_channel {
            if let Err(err) = sender.send(event).await {
                error!("Failed to publish a Unigate event: {:?}", err);
            }
        }
    }
}
