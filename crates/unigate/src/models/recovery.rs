use iso8601_timestamp::Timestamp;

/// Recovery token kind
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "schemas", derive(JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum RecoveryTokenKind {
    /// Random link token for password reset
    Reset,
    /// Human-typed temporary password
    Temporary,
}

impl RecoveryTokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecoveryTokenKind::Reset => "reset",
            RecoveryTokenKind::Temporary => "temporary",
        }
    }
}

/// Single-use, time-boxed recovery secret
///
/// At most one redeemable token exists per (account, kind) pair:
/// issuance invalidates any prior unused token of the same kind.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "schemas", derive(JsonSchema))]
pub struct RecoveryToken {
    /// Unique Id
    #[serde(rename = "_id")]
    pub id: String,

    /// Account Id
    pub account_id: String,

    /// Token kind
    pub kind: RecoveryTokenKind,

    /// Reset: the URL token itself. Temporary: argon2 hash of the code;
    /// the plaintext only ever exists in the issuing email.
    pub secret: String,

    /// Absolute expiry
    pub expires_at: Timestamp,

    /// Whether this token has been consumed
    #[serde(default)]
    pub used: bool,

    /// When this token was consumed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_at: Option<Timestamp>,

    /// Submitting IP at issuance, for diagnostics only
    pub issued_by_ip: String,
}
