//! Login to an account
//! POST /session/login
use rocket::serde::json::Json;
use rocket::State;
use unigate::derive::rocket::RequestIp;
use unigate::logic::{AdminLoginOutcome, LoginOutcome};
use unigate::models::Session;
use unigate::{Error, Result, Unigate};

/// # Login Data
#[derive(Serialize, Deserialize, JsonSchema)]
pub struct DataLogin {
    /// Email
    pub email: String,
    /// Password
    pub password: String,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(tag = "result")]
pub enum ResponseLogin {
    Success(Session),
    Failure {
        failed_attempts: i32,
        remaining_attempts: i32,
        max_attempts: i32,
        account_verified: bool,
    },
    TemporaryPassword {
        failed_attempts: i32,
        max_attempts: i32,
        account_verified: bool,
    },
}

/// # Login
///
/// Login to an account.
///
/// Wrong passwords are reported with the attempt budget rather than a
/// bare error; once the budget is spent a temporary password goes out
/// by email. The configured administrator email short-circuits into a
/// separate, rate limited credential check.
#[openapi(tag = "Session")]
#[post("/login", data = "<data>")]
pub async fn login(
    unigate: &State<Unigate>,
    data: Json<DataLogin>,
    ip: RequestIp,
) -> Result<Json<ResponseLogin>> {
    let data = data.into_inner();

    if unigate.config.admin_override.matches_email(&data.email) {
        return match unigate
            .admin_login(data.email, data.password, ip.0)
            .await?
        {
            AdminLoginOutcome::Success(session) => Ok(Json(ResponseLogin::Success(session))),
            AdminLoginOutcome::RateLimited { retry_after } => {
                Err(Error::RateLimited { retry_after })
            }
            AdminLoginOutcome::InvalidCredentials => Err(Error::InvalidCredentials),
        };
    }

    match unigate
        .attempt_login(data.email, data.password, ip.0)
        .await?
    {
        LoginOutcome::Success(session) => Ok(Json(ResponseLogin::Success(session))),
        LoginOutcome::NoUser => Err(Error::InvalidCredentials),
        LoginOutcome::Unverified => Err(Error::UnverifiedAccount),
        LoginOutcome::WrongPassword {
            failed_attempts,
            remaining_attempts,
            max_attempts,
            account_verified,
        } => Ok(Json(ResponseLogin::Failure {
            failed_attempts,
            remaining_attempts,
            max_attempts,
            account_verified,
        })),
        LoginOutcome::TemporaryPasswordIssued {
            failed_attempts,
            max_attempts,
            account_verified,
        } => Ok(Json(ResponseLogin::TemporaryPassword {
            failed_attempts,
            max_attempts,
            account_verified,
        })),
    }
}
