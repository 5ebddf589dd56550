use subtle::ConstantTimeEq;

/// Configuration-bound administrator override
///
/// Routes one configured email to a constant-time credential check which
/// bypasses the institutional email gate and the ordinary hashing flow.
#[derive(Serialize, Deserialize, Clone)]
pub enum AdminOverride {
    /// No administrator override
    Disabled,

    /// Compare against configured credentials
    Enabled {
        /// Administrator email, matched case-insensitively
        email: String,

        /// Administrator secret
        secret: String,

        /// Failed attempts per IP before the path locks
        #[serde(default = "AdminOverride::default_max_attempts")]
        max_attempts: u64,

        /// How long the IP stays locked out (in seconds)
        #[serde(default = "AdminOverride::default_lockout_seconds")]
        lockout_seconds: u64,

        /// Lifetime of an administrator session credential (in seconds)
        #[serde(default = "AdminOverride::default_session_ttl")]
        session_ttl: i64,
    },
}

impl Default for AdminOverride {
    fn default() -> AdminOverride {
        AdminOverride::Disabled
    }
}

impl AdminOverride {
    fn default_max_attempts() -> u64 {
        5
    }

    fn default_lockout_seconds() -> u64 {
        60
    }

    fn default_session_ttl() -> i64 {
        24 * 3600
    }

    /// Whether a login email is routed to the override path
    pub fn matches_email(&self, email: &str) -> bool {
        match self {
            AdminOverride::Enabled { email: admin, .. } => {
                admin.trim().to_lowercase() == email.trim().to_lowercase()
            }
            AdminOverride::Disabled => false,
        }
    }

    /// Constant-time comparison of both credential fields
    pub fn verify(&self, email: &str, secret: &str) -> bool {
        match self {
            AdminOverride::Enabled {
                email: admin_email,
                secret: admin_secret,
                ..
            } => {
                let admin_email = admin_email.trim().to_lowercase();
                let email = email.trim().to_lowercase();

                let email_matches = admin_email.as_bytes().ct_eq(email.as_bytes());
                let secret_matches = admin_secret.as_bytes().ct_eq(secret.as_bytes());

                (email_matches & secret_matches).into()
            }
            AdminOverride::Disabled => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AdminOverride;

    fn enabled() -> AdminOverride {
        AdminOverride::Enabled {
            email: "admin@portal.test".into(),
            secret: "admin_secret".into(),
            max_attempts: 5,
            lockout_seconds: 60,
            session_ttl: 24 * 3600,
        }
    }

    #[test]
    fn it_matches_emails_case_insensitively() {
        let admin = enabled();
        assert!(admin.matches_email("  ADMIN@Portal.Test "));
        assert!(!admin.matches_email("1234567@portal.test"));
        assert!(!AdminOverride::Disabled.matches_email("admin@portal.test"));
    }

    #[test]
    fn it_requires_both_fields_to_match() {
        let admin = enabled();
        assert!(admin.verify("Admin@portal.test", "admin_secret"));
        assert!(!admin.verify("admin@portal.test", "wrong_secret"));
        assert!(!admin.verify("other@portal.test", "admin_secret"));
        assert!(!AdminOverride::Disabled.verify("admin@portal.test", "admin_secret"));
    }
}
