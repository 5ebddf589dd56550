use rocket::Route;
use rocket_okapi::okapi::openapi3::OpenApi;

pub mod account;
pub mod session;

pub fn routes() -> (Vec<Route>, OpenApi) {
    openapi_get_routes_spec![
        account::create_account::create_account,
        account::verify_email::verify_email,
        account::send_password_reset::send_password_reset,
        account::password_reset::password_reset,
        session::login::login,
        session::login_temporary::login_temporary,
        session::logout::logout
    ]
}
