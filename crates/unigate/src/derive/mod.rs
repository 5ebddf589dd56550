#[cfg(feature = "okapi_impl")]
pub mod okapi;
#[cfg(feature = "rocket_impl")]
pub mod rocket;
