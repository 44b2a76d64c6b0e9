pub mod app;
pub mod companion;
pub mod config;
pub mod conversation;
pub mod environment;
pub mod keyring;
pub mod message;
pub mod screen;
