//! Confirm a password reset.
//! PATCH /account/reset_password
use rocket::serde::json::Json;
use rocket::State;
use unigate::{Result, Unigate};

/// # Password Reset
#[derive(Serialize, Deserialize, JsonSchema)]
pub struct DataPasswordReset {
    /// Reset token
    pub token: String,
    /// New password
    pub password: String,
}

/// # Reset Response
#[derive(Serialize, Deserialize, JsonSchema)]
pub struct ResponsePasswordReset {
    pub message: String,
}

/// # Password Reset
///
/// Confirm password reset and change the password. All existing
/// sessions are logged out.
#[openapi(tag = "Account")]
#[patch("/reset_password", data = "<data>")]
pub async fn password_reset(
    unigate: &State<Unigate>,
    data: Json<DataPasswordReset>,
) -> Result<Json<ResponsePasswordReset>> {
    let data = data.into_inner();

    unigate.reset_password(data.token, data.password).await?;

    Ok(Json(ResponsePasswordReset {
        message: "Password changed, please log in again.".into(),
    }))
}

#[cfg(test)]
mod tests {
    use crate::test::*;

    #[async_std::test]
    async fn success() {
        let (unigate, _session, account, _receiver) = for_test_authenticated().await;

        let client = bootstrap_rocket_with_auth(
            unigate.clone(),
            routes![
                crate::routes::account::password_reset::password_reset,
                crate::routes::session::login::login
            ],
        )
        .await;

        unigate
            .send_password_reset(account.email.clone(), "127.0.0.1".into())
            .await
            .unwrap();

        let mail = outbox(&unigate).take().pop().expect("an email");
        let url = mail.variables["url"].as_str().unwrap().to_string();
        let token = url
            .strip_prefix(unigate.config.templates.reset.url.as_str())
            .expect("a reset url");

        let res = client
            .patch("/reset_password")
            .header(ContentType::JSON)
            .body(
                json!({
                    "token": token,
                    "password": "new valid password"
                })
                .to_string(),
            )
            .dispatch()
            .await;

        assert_eq!(res.status(), Status::Ok);

        // the new password works
        let res = client
            .post("/login")
            .header(ContentType::JSON)
            .body(
                json!({
                    "email": account.email,
                    "password": "new valid password"
                })
                .to_string(),
            )
            .dispatch()
            .await;

        assert_eq!(res.status(), Status::Ok);
    }

    #[async_std::test]
    async fn fail_invalid_token() {
        let (client, _unigate, _receiver) = bootstrap_rocket(routes![
            crate::routes::account::password_reset::password_reset
        ])
        .await;

        let res = client
            .patch("/reset_password")
            .header(ContentType::JSON)
            .body(
                json!({
                    "token": "invalid",
                    "password": "new valid password"
                })
                .to_string(),
            )
            .dispatch()
            .await;

        assert_eq!(res.status(), Status::Unauthorized);
        assert_eq!(
            res.into_string().await,
            Some("{\"type\":\"InvalidToken\"}".into())
        );
    }
}
