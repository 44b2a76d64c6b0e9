//! ChatBuddy is a terminal companion chat: pick Allu or Jenny, sign in, and
//! talk to a persona that answers in character and reports its mood.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the companion roster, conversation state machine, screen
//!   flow, configuration and the [`core::app::App`] that ties them together.
//! - [`generator`] builds persona prompts, calls the model backend and infers
//!   the companion's mood from each reply.
//! - [`auth`] signs users in against the account service and keeps the
//!   session and profile.
//! - [`ui`] renders the terminal screens and runs the interactive loop.
//! - [`commands`] parses the slash commands typed in the chat screen.
//! - [`api`] holds the wire types shared by the HTTP clients.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod core;
pub mod generator;
pub mod ui;
pub mod utils;
