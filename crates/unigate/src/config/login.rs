/// Login attempt thresholds and session lifetime
#[derive(Serialize, Deserialize, Clone)]
pub struct LoginPolicy {
    /// Failed attempts at which a temporary password is issued
    pub max_attempts: i32,

    /// Lifetime of an ordinary session credential (in seconds)
    ///
    /// Doubles as the idle window after which a leftover failed-attempt
    /// counter is considered stale.
    pub session_ttl: i64,
}

impl Default for LoginPolicy {
    fn default() -> LoginPolicy {
        LoginPolicy {
            max_attempts: 5,
            session_ttl: 2 * 3600,
        }
    }
}

impl LoginPolicy {
    /// Attempts left before a temporary password is issued
    pub fn remaining_attempts(&self, failed_attempts: i32) -> i32 {
        (self.max_attempts - failed_attempts).max(0)
    }
}
