//! Verify an account's email
//! POST /account/verify/<token>
use rocket::serde::json::Json;
use rocket::State;
use unigate::logic::VerifyEmailOutcome;
use unigate::{Error, Result, Unigate};

/// # Verification Response
#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(tag = "result")]
pub enum ResponseVerifyEmail {
    /// Email is now verified
    Verified { user_id: String, email: String },
    /// Account was already verified
    AlreadyVerified,
}

/// # Verify Email
///
/// Verify an email address with the token from the verification email.
#[openapi(tag = "Account")]
#[post("/verify/<token>")]
pub async fn verify_email(
    unigate: &State<Unigate>,
    token: String,
) -> Result<Json<ResponseVerifyEmail>> {
    match unigate.verify_email_token(&token).await? {
        VerifyEmailOutcome::Invalid => Err(Error::InvalidToken),
        VerifyEmailOutcome::AlreadyVerified => Ok(Json(ResponseVerifyEmail::AlreadyVerified)),
        VerifyEmailOutcome::Verified(account) => Ok(Json(ResponseVerifyEmail::Verified {
            user_id: account.id,
            email: account.email,
        })),
    }
}
