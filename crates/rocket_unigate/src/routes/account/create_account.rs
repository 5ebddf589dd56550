//! Create a new account
//! POST /account/create
use rocket::serde::json::Json;
use rocket::State;
use unigate::derive::rocket::RequestIp;
use unigate::models::{Account, StudentType};
use unigate::{Result, Unigate};

/// # Account Data
#[derive(Serialize, Deserialize, JsonSchema)]
pub struct DataCreateAccount {
    /// Display name
    pub name: String,
    /// Valid email address
    pub email: String,
    /// Password
    pub password: String,
    /// Enrollment type
    pub student_type: Option<StudentType>,
}

/// # Registration Response
#[derive(Serialize, Deserialize, JsonSchema)]
pub struct ResponseCreateAccount {
    pub message: String,
}

/// # Create Account
///
/// Create a new account. If the email is already registered, the
/// response is identical and the existing account receives either a
/// fresh verification email or a password reset link.
#[openapi(tag = "Account")]
#[post("/create", data = "<data>")]
pub async fn create_account(
    unigate: &State<Unigate>,
    data: Json<DataCreateAccount>,
    ip: RequestIp,
) -> Result<Json<ResponseCreateAccount>> {
    let data = data.into_inner();

    Account::new(
        unigate,
        data.name,
        data.email,
        data.password,
        data.student_type,
        true,
        ip.0,
    )
    .await?;

    Ok(Json(ResponseCreateAccount {
        message: "Registration received, please check your inbox.".into(),
    }))
}
