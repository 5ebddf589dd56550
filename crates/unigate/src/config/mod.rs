mod admin;
mod email_policy;
mod ip_resolve;
mod login;
mod passwords;
mod recovery;
mod templates;

pub use admin::*;
pub use email_policy::*;
pub use ip_resolve::*;
pub use login::*;
pub use passwords::*;
pub use recovery::*;
pub use templates::*;

/// Unigate configuration
#[derive(Default, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Email format requirements for regular accounts
    pub email_policy: EmailPolicy,

    /// Password requirements for registration and reset
    pub password_policy: PasswordPolicy,

    /// Login attempt thresholds and session lifetime
    pub login: LoginPolicy,

    /// Recovery token lifetimes and retention
    pub recovery: RecoveryPolicy,

    /// Configuration-bound administrator override
    pub admin_override: AdminOverride,

    /// Email templates
    pub templates: Templates,

    /// Whether this application is running behind Cloudflare
    pub resolve_ip: ResolveIp,
}
