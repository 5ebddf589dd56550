use handlebars::Handlebars;
use lettre::message::MultiPart;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use serde_json::Value;

use crate::{config::Template, Error, Result, Success};

lazy_static! {
    static ref HANDLEBARS: Handlebars<'static> = Handlebars::new();
}

/// SMTP mail server configuration
#[derive(Serialize, Deserialize, Clone)]
pub struct SmtpSettings {
    /// Sender address
    pub from: String,

    /// Reply-To address
    pub reply_to: Option<String>,

    /// SMTP host
    pub host: String,

    /// SMTP port
    pub port: Option<u16>,

    /// SMTP username
    pub username: String,

    /// SMTP password
    pub password: String,

    /// Whether to use TLS
    pub use_tls: Option<bool>,
}

#[derive(Clone)]
pub struct SmtpMailer {
    settings: SmtpSettings,
    transport: SmtpTransport,
}

impl SmtpMailer {
    /// Build an SMTP transport from settings
    pub fn new(settings: SmtpSettings) -> Result<SmtpMailer> {
        let mut builder = if settings.use_tls == Some(false) {
            SmtpTransport::builder_dangerous(&settings.host)
        } else {
            SmtpTransport::relay(&settings.host).map_err(|_| Error::InternalError)?
        };

        if let Some(port) = settings.port {
            builder = builder.port(port);
        }

        let transport = builder
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();

        Ok(SmtpMailer {
            settings,
            transport,
        })
    }

    /// Render a template and send it to the given address
    pub fn send(&self, to: String, template: &Template, variables: Value) -> Success {
        let text = render_template(&template.text, &variables)?;

        let message = Message::builder()
            .from(
                self.settings
                    .from
                    .parse()
                    .map_err(|_| Error::InternalError)?,
            )
            .to(to.parse().map_err(|_| Error::InternalError)?)
            .subject(template.title.clone());

        let message = if let Some(reply_to) = &self.settings.reply_to {
            message.reply_to(reply_to.parse().map_err(|_| Error::InternalError)?)
        } else {
            message
        };

        let message = if let Some(html) = &template.html {
            message.multipart(MultiPart::alternative_plain_html(
                text,
                render_template(html, &variables)?,
            ))
        } else {
            message.body(text)
        }
        .map_err(|_| Error::InternalError)?;

        if let Err(error) = self.transport.send(&message) {
            error!("Failed to send email to {}!\nlettre error: {}", to, error);
            return Err(Error::EmailFailed);
        }

        Ok(())
    }
}

fn render_template(text: &str, variables: &Value) -> Result<String> {
    HANDLEBARS
        .render_template(text, variables)
        .map_err(|_| Error::RenderFail)
}
