mod account;
mod recovery;
mod session;

pub use account::*;
pub use recovery::*;
pub use session::*;
