use rocket_okapi::okapi;
use rocket_okapi::okapi::openapi3::{self, SecurityScheme, SecuritySchemeData};
use rocket_okapi::{
    gen::OpenApiGenerator,
    request::{OpenApiFromRequest, RequestHeaderInput},
    response::OpenApiResponderInner,
};

use crate::{
    derive::rocket::RequestIp,
    models::{Account, Session},
    Error,
};

impl OpenApiResponderInner for Error {
    fn responses(
        gen: &mut OpenApiGenerator,
    ) -> std::result::Result<openapi3::Responses, rocket_okapi::OpenApiError> {
        let mut content = okapi::Map::new();

        content.insert(
            "application/json".to_string(),
            openapi3::MediaType {
                schema: Some(gen.json_schema::<Error>()),
                ..Default::default()
            },
        );

        Ok(openapi3::Responses {
            default: Some(openapi3::RefOr::Object(openapi3::Response {
                content,
                description: "An error occurred.".to_string(),
                ..Default::default()
            })),
            ..Default::default()
        })
    }
}

fn session_token_security() -> rocket_okapi::Result<RequestHeaderInput> {
    let mut requirements = schemars::Map::new();
    requirements.insert("Api Key".to_owned(), vec![]);

    Ok(RequestHeaderInput::Security(
        "Api Key".to_owned(),
        SecurityScheme {
            data: SecuritySchemeData::ApiKey {
                name: "x-session-token".to_owned(),
                location: "header".to_owned(),
            },
            description: Some("Session Token".to_owned()),
            extensions: schemars::Map::new(),
        },
        requirements,
    ))
}

impl<'r> OpenApiFromRequest<'r> for Session {
    fn from_request_input(
        _gen: &mut OpenApiGenerator,
        _name: String,
        _required: bool,
    ) -> rocket_okapi::Result<RequestHeaderInput> {
        session_token_security()
    }
}

impl<'r> OpenApiFromRequest<'r> for Account {
    fn from_request_input(
        _gen: &mut OpenApiGenerator,
        _name: String,
        _required: bool,
    ) -> rocket_okapi::Result<RequestHeaderInput> {
        session_token_security()
    }
}

impl<'r> OpenApiFromRequest<'r> for RequestIp {
    fn from_request_input(
        _gen: &mut OpenApiGenerator,
        _name: String,
        _required: bool,
    ) -> rocket_okapi::Result<RequestHeaderInput> {
        Ok(RequestHeaderInput::None)
    }
}
