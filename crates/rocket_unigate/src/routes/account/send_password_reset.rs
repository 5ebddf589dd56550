//! Request a password reset email
//! POST /account/reset_password
use rocket::serde::json::Json;
use rocket::State;
use unigate::derive::rocket::RequestIp;
use unigate::{Result, Unigate};

/// # Reset Information
#[derive(Serialize, Deserialize, JsonSchema)]
pub struct DataSendPasswordReset {
    /// Email associated with the account
    pub email: String,
}

/// # Reset Response
#[derive(Serialize, Deserialize, JsonSchema)]
pub struct ResponseSendPasswordReset {
    pub message: String,
}

/// # Send Password Reset
///
/// Send an email to reset the account's password. The response does
/// not reveal whether the email belongs to an account.
#[openapi(tag = "Account")]
#[post("/reset_password", data = "<data>")]
pub async fn send_password_reset(
    unigate: &State<Unigate>,
    data: Json<DataSendPasswordReset>,
    ip: RequestIp,
) -> Result<Json<ResponseSendPasswordReset>> {
    let data = data.into_inner();

    unigate.send_password_reset(data.email, ip.0).await?;

    Ok(Json(ResponseSendPasswordReset {
        message: "If the email belongs to an account, a reset link is on its way.".into(),
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
            routes![crate::routes::account::send_password_reset::send_password_reset],
        )
        .await;

        let res = client
            .post("/reset_password")
            .header(ContentType::JSON)
            .body(json!({ "email": account.email }).to_string())
            .dispatch()
            .await;

        assert_eq!(res.status(), Status::Ok);

        let mail = outbox(&unigate).take().pop().expect("an email");
        assert_eq!(mail.to, account.email);
    }

    #[async_std::test]
    async fn success_unknown_email() {
        let (client, unigate, _receiver) = bootstrap_rocket(routes![
            crate::routes::account::send_password_reset::send_password_reset
        ])
        .await;

        let res = client
            .post("/reset_password")
            .header(ContentType::JSON)
            .body(json!({ "email": "nobody@example.edu" }).to_string())
            .dispatch()
            .await;

        // identical response, no email
        assert_eq!(res.status(), Status::Ok);
        assert!(outbox(&unigate).take().is_empty());
    }
}
