/// Recovery token lifetimes and retention
#[derive(Serialize, Deserialize, Clone)]
pub struct RecoveryPolicy {
    /// How long password reset links should last for (in seconds)
    pub expire_reset: i64,

    /// How long temporary passwords should last for (in seconds)
    pub expire_temporary: i64,

    /// How long used tokens are kept around before pruning (in days)
    pub retain_used_days: i64,
}

impl Default for RecoveryPolicy {
    fn default() -> RecoveryPolicy {
        RecoveryPolicy {
            expire_reset: 3600,
            expire_temporary: 15 * 60,
            retain_used_days: 7,
        }
    }
}
