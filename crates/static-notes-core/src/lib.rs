//! static-notes core library
//!
//! Build pipeline that turns markdown notes (local or on GitHub) into static
//! JSON artifacts, plus the reader, pending-note layer and admin session
//! used around it.

pub mod artifacts;
pub mod auth;
pub mod compiler;
pub mod config;
pub mod error;
pub mod http;
pub mod index;
pub mod logging;
pub mod note;
pub mod pending;
pub mod pipeline;
pub mod publish;
pub mod reader;
pub mod source;
pub mod sync;
