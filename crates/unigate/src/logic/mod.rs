use crate::models::{Account, Session};

mod login;

pub use login::*;

/// Result of a regular login attempt
#[derive(Debug)]
pub enum LoginOutcome {
    /// No account exists for this email
    NoUser,

    /// Wrong password, attempts remain
    WrongPassword {
        failed_attempts: i32,
        remaining_attempts: i32,
        max_attempts: i32,
        account_verified: bool,
    },

    /// Wrong password too many times, a temporary password was emailed
    TemporaryPasswordIssued {
        failed_attempts: i32,
        max_attempts: i32,
        account_verified: bool,
    },

    /// Correct password but the email is not verified yet
    Unverified,

    /// Logged in
    Success(Session),
}

/// Result of an administrator login attempt
#[derive(Debug)]
pub enum AdminLoginOutcome {
    /// Credentials did not match or the override is disabled
    InvalidCredentials,

    /// Too many failed attempts from this address
    RateLimited { retry_after: u64 },

    /// Logged in
    Success(Session),
}

/// Result of redeeming an email verification token
#[derive(Debug)]
pub enum VerifyEmailOutcome {
    /// Token does not match any account
    Invalid,

    /// Account was already verified
    AlreadyVerified,

    /// Email is now verified
    Verified(Account),
}
