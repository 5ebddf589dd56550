//! Logout of current session
//! POST /session/logout
use rocket::serde::json::Json;
use rocket::State;
use unigate::models::Session;
use unigate::{Result, Unigate};

/// # Logout Response
#[derive(Serialize, Deserialize, JsonSchema)]
pub struct ResponseLogout {
    pub message: String,
}

/// # Logout
///
/// Delete current session.
#[openapi(tag = "Session")]
#[post("/logout")]
pub async fn logout(unigate: &State<Unigate>, session: Session) -> Result<Json<ResponseLogout>> {
    session.delete(unigate).await?;

    Ok(Json(ResponseLogout {
        message: "Logged out.".into(),
    }))
}

#[cfg(test)]
mod tests {
    use crate::test::*;

    #[async_std::test]
    async fn success() {
        let (unigate, session, _account, receiver) = for_test_authenticated().await;
        let client = bootstrap_rocket_with_auth(
            unigate.clone(),
            routes![crate::routes::session::logout::logout],
        )
        .await;

        let res = client
            .post("/logout")
            .header(Header::new("x-session-token", session.token.clone()))
            .dispatch()
            .await;

        assert_eq!(res.status(), Status::Ok);

        assert!(unigate
            .database
            .find_session_by_token(&session.token)
            .await
            .unwrap()
            .is_none());

        let event = receiver.try_recv().expect("an event");
        if let UnigateEvent::DeleteSession {
            user_id,
            session_id,
        } = event
        {
            assert_eq!(user_id, session.user_id);
            assert_eq!(session_id, session.id);
        } else {
            panic!("Received incorrect event type. {:?}", event);
        }
    }

    #[async_std::test]
    async fn fail_invalid_session() {
        let (client, _unigate, _receiver) =
            bootstrap_rocket(routes![crate::routes::session::logout::logout]).await;

        let res = client
            .post("/logout")
            .header(Header::new("x-session-token", "invalid"))
            .dispatch()
            .await;

        assert_eq!(res.status(), Status::Unauthorized);
    }

    #[async_std::test]
    async fn fail_expired_session() {
        let (unigate, mut session, _account, _receiver) = for_test_authenticated().await;

        session.expires_at = unigate::util::timestamp_after(-1);
        session.save(&unigate).await.unwrap();

        let client = bootstrap_rocket_with_auth(
            unigate,
            routes![crate::routes::session::logout::logout],
        )
        .await;

        let res = client
            .post("/logout")
            .header(Header::new("x-session-token", session.token))
            .dispatch()
            .await;

        assert_eq!(res.status(), Status::Unauthorized);
    }

    #[async_std::test]
    async fn fail_no_session() {
        let (client, _unigate, _receiver) =
            bootstrap_rocket(routes![crate::routes::session::logout::logout]).await;

        let res = client.post("/logout").dispatch().await;

        assert_eq!(res.status(), Status::Unauthorized);
    }
}
