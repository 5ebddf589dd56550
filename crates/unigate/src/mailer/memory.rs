use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::{config::Template, Success};

/// A captured email
#[derive(Clone, Debug)]
pub struct Mail {
    pub to: String,
    pub title: String,
    pub variables: Value,
}

/// Mailer which stores emails instead of delivering them
#[derive(Default, Clone)]
pub struct MemoryMailer {
    outbox: Arc<Mutex<Vec<Mail>>>,
}

impl MemoryMailer {
    pub fn send(&self, to: String, template: &Template, variables: Value) -> Success {
        self.outbox
            .lock()
            .expect("poisoned `outbox`")
            .push(Mail {
                to,
                title: template.title.clone(),
                variables,
            });

        Ok(())
    }

    /// Drain all captured emails
    pub fn take(&self) -> Vec<Mail> {
        self.outbox
            .lock()
            .expect("poisoned `outbox`")
            .drain(..)
            .collect()
    }
}
