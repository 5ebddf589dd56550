use rocket::{
    http::{ContentType, Status},
    outcome::Outcome,
    request::{self, FromRequest},
    response::{self, Responder},
    Request, Response,
};

use crate::{
    config::ResolveIp,
    models::{Account, Session},
    Error, Unigate,
};

/// HTTP response builder for Error enum
impl<'r> Responder<'r, 'static> for Error {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let status = match self {
            Error::IncorrectData { .. } => Status::BadRequest,
            Error::DatabaseError { .. } => Status::InternalServerError,
            Error::InternalError => Status::InternalServerError,
            Error::OperationFailed => Status::InternalServerError,
            Error::RenderFail => Status::InternalServerError,
            Error::MissingHeaders => Status::BadRequest,
            Error::InvalidSession => Status::Unauthorized,
            Error::UnverifiedAccount => Status::Forbidden,
            Error::UnknownUser => Status::NotFound,
            Error::EmailFailed => Status::InternalServerError,
            Error::InvalidToken => Status::Unauthorized,
            Error::InvalidCredentials => Status::Unauthorized,
            Error::ShortPassword => Status::BadRequest,
            Error::CompromisedPassword => Status::BadRequest,
            Error::RateLimited { .. } => Status::TooManyRequests,
        };

        // Serialize the error data structure into JSON.
        let string = json!(self).to_string();

        // Build and send the request.
        Response::build()
            .sized_body(string.len(), std::io::Cursor::new(string))
            .header(ContentType::new("application", "json"))
            .status(status)
            .ok()
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Session {
    type Error = Error;

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let header_session_token = request
            .headers()
            .get("x-session-token")
            .next()
            .map(|x| x.to_string());

        match (request.rocket().state::<Unigate>(), header_session_token) {
            (Some(unigate), Some(token)) => {
                if let Ok(session) = unigate.database.find_session_by_token(&token).await {
                    match session {
                        Some(session) if !session.is_expired() => Outcome::Success(session),
                        _ => Outcome::Error((Status::Unauthorized, Error::InvalidSession)),
                    }
                } else {
                    Outcome::Error((Status::Unauthorized, Error::InvalidSession))
                }
            }
            (_, _) => Outcome::Error((Status::Unauthorized, Error::MissingHeaders)),
        }
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Account {
    type Error = Error;

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        match request.guard::<Session>().await {
            Outcome::Success(session) => {
                let unigate = request.rocket().state::<Unigate>().unwrap();

                if let Ok(account) = unigate.database.find_account(&session.user_id).await {
                    Outcome::Success(account)
                } else {
                    Outcome::Error((Status::InternalServerError, Error::InternalError))
                }
            }
            Outcome::Forward(status) => Outcome::Forward(status),
            Outcome::Error(err) => Outcome::Error(err),
        }
    }
}

/// Client address as configured for the deployment
pub struct RequestIp(pub String);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for RequestIp {
    type Error = Error;

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let unigate = match request.rocket().state::<Unigate>() {
            Some(unigate) => unigate,
            None => return Outcome::Error((Status::InternalServerError, Error::InternalError)),
        };

        match unigate.config.resolve_ip {
            ResolveIp::Remote => Outcome::Success(RequestIp(
                request
                    .client_ip()
                    .map(|ip| ip.to_string())
                    .unwrap_or_else(|| "unknown".to_string()),
            )),
            ResolveIp::Cloudflare => match request.headers().get("CF-Connecting-IP").next() {
                Some(ip) => Outcome::Success(RequestIp(ip.to_string())),
                None => Outcome::Error((Status::BadRequest, Error::MissingHeaders)),
            },
        }
    }
}
