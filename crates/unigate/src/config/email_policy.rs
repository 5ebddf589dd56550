use regex::Regex;

use crate::{Error, Success};

/// Email format requirements for regular accounts
#[derive(Serialize, Deserialize, Clone)]
pub enum EmailPolicy {
    /// Accept any syntactically valid email
    Any,

    /// Require a numeric local part at a fixed institutional domain,
    /// e.g. `1234567@example.edu`
    Institutional { domain: String, local_digits: usize },
}

impl Default for EmailPolicy {
    fn default() -> EmailPolicy {
        EmailPolicy::Any
    }
}

impl EmailPolicy {
    /// Check that an email may be used for an account
    pub fn validate(&self, email: &str) -> Success {
        lazy_static! {
            static ref EMAIL_RE: Regex = Regex::new("^[^@\\s]+@[^@\\s]+\\.[^@\\s]+$").unwrap();
        }

        let email = email.trim();
        if !EMAIL_RE.is_match(email) {
            return Err(Error::IncorrectData { with: "email" });
        }

        match self {
            EmailPolicy::Any => Ok(()),
            EmailPolicy::Institutional {
                domain,
                local_digits,
            } => {
                let (local, host) = email
                    .split_once('@')
                    .ok_or(Error::IncorrectData { with: "email" })?;

                if host.eq_ignore_ascii_case(domain)
                    && local.len() == *local_digits
                    && local.chars().all(|c| c.is_ascii_digit())
                {
                    Ok(())
                } else {
                    Err(Error::IncorrectData { with: "email" })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EmailPolicy;

    #[test]
    fn it_accepts_any_valid_email_by_default() {
        let policy = EmailPolicy::default();
        assert!(policy.validate("someone@example.com").is_ok());
        assert!(policy.validate("not an email").is_err());
        assert!(policy.validate("missing@tld").is_err());
    }

    #[test]
    fn it_enforces_the_institutional_format() {
        let policy = EmailPolicy::Institutional {
            domain: "example.edu".into(),
            local_digits: 7,
        };

        assert!(policy.validate("1234567@example.edu").is_ok());
        assert!(policy.validate("1234567@EXAMPLE.EDU").is_ok());

        assert!(policy.validate("123456@example.edu").is_err());
        assert!(policy.validate("12345678@example.edu").is_err());
        assert!(policy.validate("a234567@example.edu").is_err());
        assert!(policy.validate("1234567@elsewhere.edu").is_err());
    }
}
