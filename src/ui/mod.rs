//! Terminal front end for interactive chat sessions.
//!
//! - [`chat_loop`]: drives the selection, auth and chat screens, dispatching
//!   slash commands to [`crate::commands`] and replies from
//!   [`crate::generator::service`].
//! - [`render`]: styled lines for each screen, written below the cursor.
//! - [`theme`]: per-companion styles derived from the persona colors.

pub mod chat_loop;
pub mod render;
pub mod theme;
