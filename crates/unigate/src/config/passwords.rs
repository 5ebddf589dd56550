use std::collections::HashSet;

use crate::{Error, Success};

/// Password requirements for registration and reset
#[derive(Serialize, Deserialize, Clone)]
pub enum PasswordPolicy {
    /// Only enforce the minimum length
    MinimumLength,

    /// Additionally reject passwords from a custom block list
    Custom { passwords: HashSet<String> },
}

impl Default for PasswordPolicy {
    fn default() -> PasswordPolicy {
        PasswordPolicy::MinimumLength
    }
}

impl PasswordPolicy {
    /// Check that a password may be used
    pub fn assert_safe(&self, password: &str) -> Success {
        if password.len() < 8 {
            return Err(Error::ShortPassword);
        }

        match self {
            PasswordPolicy::MinimumLength => Ok(()),
            PasswordPolicy::Custom { passwords } => {
                if passwords.contains(&password.to_lowercase()) {
                    Err(Error::CompromisedPassword)
                } else {
                    Ok(())
                }
            }
        }
    }
}
