#[macro_use]
extern crate serde;
#[macro_use]
extern crate rocket;
#[macro_use]
extern crate rocket_okapi;
#[macro_use]
extern crate schemars;
#[cfg(any(test, feature = "test"))]
#[macro_use]
extern crate serde_json;

pub mod routes;
