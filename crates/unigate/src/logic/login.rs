use iso8601_timestamp::{Duration, Timestamp};

use crate::config::LoginPolicy;
use crate::models::Account;

/// Side effect requested by a login decision
///
/// Effects are ordered; the caller applies them in sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginEffect {
    /// Zero the failed attempt counter before anything else
    ResetStaleAttempts,

    /// Record another failed attempt
    IncrementAttempts,

    /// Email a temporary password, invalidating earlier ones
    IssueTemporaryPassword,

    /// Email a fresh verification link
    IssueVerificationToken,

    /// Create a session and zero the failed attempt counter
    IssueSession,
}

/// State transition chosen for a login attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginTransition {
    NoUser,
    WrongPassword,
    TemporaryPasswordIssued,
    Unverified,
    Ok,
}

#[derive(Debug)]
pub struct LoginDecision {
    pub transition: LoginTransition,
    pub effects: Vec<LoginEffect>,
}

/// Decide what a login attempt should do
///
/// Pure function over the account state, so every path through the
/// lockout machine can be tested without a database.
///
/// A failed attempt counter left over from a previous run of attempts
/// is forgiven if the account's most recent session is older than the
/// session lifetime.
pub fn decide(
    account: Option<&Account>,
    password_matches: bool,
    last_session_issued: Option<Timestamp>,
    now: Timestamp,
    policy: &LoginPolicy,
) -> LoginDecision {
    let account = match account {
        Some(account) => account,
        None => {
            return LoginDecision {
                transition: LoginTransition::NoUser,
                effects: vec![],
            }
        }
    };

    let mut effects = vec![];
    let mut failed_attempts = account.failed_login_attempts;

    if failed_attempts > 0 {
        let stale = match last_session_issued {
            Some(issued) => now.duration_since(issued) > Duration::seconds(policy.session_ttl),
            None => false,
        };

        if stale {
            effects.push(LoginEffect::ResetStaleAttempts);
            failed_attempts = 0;
        }
    }

    if password_matches {
        if account.email_verified_at.is_none() {
            if account.verification_token.is_none() {
                effects.push(LoginEffect::IssueVerificationToken);
            }

            return LoginDecision {
                transition: LoginTransition::Unverified,
                effects,
            };
        }

        effects.push(LoginEffect::IssueSession);
        return LoginDecision {
            transition: LoginTransition::Ok,
            effects,
        };
    }

    effects.push(LoginEffect::IncrementAttempts);

    if failed_attempts + 1 >= policy.max_attempts {
        effects.push(LoginEffect::IssueTemporaryPassword);
        LoginDecision {
            transition: LoginTransition::TemporaryPasswordIssued,
            effects,
        }
    } else {
        LoginDecision {
            transition: LoginTransition::WrongPassword,
            effects,
        }
    }
}
