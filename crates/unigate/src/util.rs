use chrono::Duration;
use iso8601_timestamp::Timestamp;
use regex::Regex;

use crate::{Error, Result};

lazy_static! {
    static ref ARGON_CONFIG: argon2::Config<'static> = argon2::Config::default();
}

/// Alphabet for human-typed codes, ambiguous characters removed
static ALPHABET: [char; 31] = [
    '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'M',
    'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// Strip aliases and special characters from emails and lowercase them
pub fn normalise_email(original: String) -> String {
    lazy_static! {
        static ref SPLIT: Regex = Regex::new("([^@]+)(@.+)").unwrap();
        static ref SYMBOL_RE: Regex = Regex::new("\\+.+|\\.").unwrap();
    }

    let original = original.trim().to_lowercase();
    let split = match SPLIT.captures(&original) {
        Some(split) => split,
        None => return original,
    };

    let mut clean = SYMBOL_RE
        .replace_all(split.get(1).unwrap().as_str(), "")
        .to_string();

    clean.push_str(split.get(2).unwrap().as_str());

    clean
}

/// Hash a password using argon2
pub fn hash_password(plaintext_password: String) -> Result<String> {
    argon2::hash_encoded(
        plaintext_password.as_bytes(),
        nanoid::nanoid!(24).as_bytes(),
        &ARGON_CONFIG,
    )
    .map_err(|_| Error::InternalError)
}

/// Generate a human-typed temporary password, e.g. `8F3K-T2NQ-WD7H`
pub fn temporary_password() -> String {
    format!(
        "{}-{}-{}",
        nanoid!(4, &ALPHABET),
        nanoid!(4, &ALPHABET),
        nanoid!(4, &ALPHABET)
    )
}

/// Composite rate-limit key for an account and client address pair
pub fn throttle_key(email: &str, ip: &str) -> String {
    format!("{}|{}", email.to_lowercase(), ip)
}

/// Timestamp a given number of seconds into the future
pub fn timestamp_after(seconds: i64) -> Timestamp {
    Timestamp::from_unix_timestamp_ms(
        chrono::Utc::now()
            .checked_add_signed(Duration::seconds(seconds))
            .expect("failed to checked_add_signed")
            .timestamp_millis(),
    )
}
