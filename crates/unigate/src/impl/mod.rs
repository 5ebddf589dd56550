mod account;
mod admin;
mod login;
mod recovery;
mod session;
