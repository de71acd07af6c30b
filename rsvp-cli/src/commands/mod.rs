pub mod config;
pub mod events;
pub mod login;
pub mod logout;
pub mod new;
pub mod status;
