use iso8601_timestamp::Timestamp;

/// Account role
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "schemas", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Default for Role {
    fn default() -> Role {
        Role::User
    }
}

/// Student enrollment type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "schemas", derive(JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum StudentType {
    FullTime,
    External,
}

/// Account model
#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "schemas", derive(JsonSchema))]
pub struct Account {
    /// Unique Id
    #[serde(rename = "_id")]
    pub id: String,

    /// User's email
    pub email: String,

    /// Normalised email, unique per account
    pub email_normalised: String,

    /// Display name
    pub name: String,

    /// Argon2 hashed password
    pub password: String,

    /// Role used for authorisation decisions
    #[serde(default)]
    pub role: Role,

    /// Enrollment type given at registration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_type: Option<StudentType>,

    /// Consecutive failed login attempts
    ///
    /// Reset on successful login and on email verification.
    #[serde(default)]
    pub failed_login_attempts: i32,

    /// When the email was verified; None means unverified
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verified_at: Option<Timestamp>,

    /// Outstanding email verification token
    ///
    /// Present only while unverified and a verification email is out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_token: Option<String>,
}
