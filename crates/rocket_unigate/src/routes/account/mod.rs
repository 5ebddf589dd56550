use rocket::Route;
use rocket_okapi::okapi::openapi3::OpenApi;

pub mod create_account;
pub mod password_reset;
pub mod send_password_reset;
pub mod verify_email;

pub fn routes() -> (Vec<Route>, OpenApi) {
    openapi_get_routes_spec![
        create_account::create_account,
        verify_email::verify_email,
        send_password_reset::send_password_reset,
        password_reset::password_reset
    ]
}
