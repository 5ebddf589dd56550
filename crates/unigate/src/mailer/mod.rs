use serde_json::Value;

use crate::{config::Template, Success};

mod memory;
mod smtp;

pub use memory::{Mail, MemoryMailer};
pub use smtp::{SmtpMailer, SmtpSettings};

/// Outgoing email transport
#[derive(Default, Clone)]
pub enum Mailer {
    /// Don't send emails
    #[default]
    Disabled,

    /// Deliver over SMTP
    Smtp(SmtpMailer),

    /// Capture emails in memory, used by tests
    Memory(MemoryMailer),
}

impl Mailer {
    /// Render a template and send it to the given address
    pub fn send(&self, to: String, template: &Template, variables: Value) -> Success {
        match self {
            Mailer::Disabled => {
                info!("Email not sent to {}, mailer is disabled.", to);
                Ok(())
            }
            Mailer::Smtp(smtp) => smtp.send(to, template, variables),
            Mailer::Memory(memory) => memory.send(to, template, variables),
        }
    }
}
