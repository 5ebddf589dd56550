//! Login with an emailed temporary password
//! POST /session/login/temporary
use rocket::serde::json::Json;
use rocket::State;
use unigate::derive::rocket::RequestIp;
use unigate::models::Session;
use unigate::{Result, Unigate};

/// # Temporary Login Data
#[derive(Serialize, Deserialize, JsonSchema)]
pub struct DataTemporaryLogin {
    /// Email
    pub email: String,
    /// Temporary password from the lockout email
    pub code: String,
}

/// # Temporary Login Response
#[derive(Serialize, Deserialize, JsonSchema)]
pub struct ResponseTemporaryLogin {
    pub session: Session,
    /// The temporary password is spent; the account still has its old
    /// password, so clients should steer the user to change it.
    pub should_change_password: bool,
}

/// # Temporary Login
///
/// Login with the temporary password issued after too many failed
/// attempts. The code is single use and only the most recent one
/// counts.
#[openapi(tag = "Session")]
#[post("/login/temporary", data = "<data>")]
pub async fn login_temporary(
    unigate: &State<Unigate>,
    data: Json<DataTemporaryLogin>,
    ip: RequestIp,
) -> Result<Json<ResponseTemporaryLogin>> {
    let data = data.into_inner();

    let session = unigate
        .login_with_temporary_password(data.email, data.code, ip.0)
        .await?;

    Ok(Json(ResponseTemporaryLogin {
        session,
        should_change_password: true,
    }))
}

#[cfg(test)]
mod tests {
    use super::ResponseTemporaryLogin;
    use crate::test::*;
    use unigate::models::RecoveryToken;

    #[async_std::test]
    async fn success() {
        let (unigate, _session, account, _receiver) = for_test_authenticated().await;

        RecoveryToken::issue_temporary(&unigate, &account, "127.0.0.1".into())
            .await
            .unwrap();

        let mail = outbox(&unigate).take().pop().expect("an email");
        let code = mail.variables["code"].as_str().unwrap().to_string();

        let client = bootstrap_rocket_with_auth(
            unigate.clone(),
            routes![crate::routes::session::login_temporary::login_temporary],
        )
        .await;

        let res = client
            .post("/login/temporary")
            .header(ContentType::JSON)
            .body(
                json!({
                    "email": account.email,
                    "code": code
                })
                .to_string(),
            )
            .dispatch()
            .await;

        assert_eq!(res.status(), Status::Ok);

        let response: ResponseTemporaryLogin =
            serde_json::from_str(&res.into_string().await.unwrap()).unwrap();

        assert!(response.should_change_password);
        assert_eq!(response.session.user_id, account.id);
    }

    #[async_std::test]
    async fn fail_wrong_code() {
        let (unigate, _session, account, _receiver) = for_test_authenticated().await;

        RecoveryToken::issue_temporary(&unigate, &account, "127.0.0.1".into())
            .await
            .unwrap();

        let client = bootstrap_rocket_with_auth(
            unigate,
            routes![crate::routes::session::login_temporary::login_temporary],
        )
        .await;

        let res = client
            .post("/login/temporary")
            .header(ContentType::JSON)
            .body(
                json!({
                    "email": account.email,
                    "code": "XXXX-XXXX-XXXX"
                })
                .to_string(),
            )
            .dispatch()
            .await;

        assert_eq!(res.status(), Status::Unauthorized);
        assert_eq!(
            res.into_string().await,
            Some("{\"type\":\"InvalidCredentials\"}".into())
        );
    }
}
