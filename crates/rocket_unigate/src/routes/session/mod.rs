use rocket::Route;
use rocket_okapi::okapi::openapi3::OpenApi;

pub mod login;
pub mod login_temporary;
pub mod logout;

pub fn routes() -> (Vec<Route>, OpenApi) {
    openapi_get_routes_spec![login::login, login_temporary::login_temporary, logout::logout]
}
