//! Blogforge - blog publishing backend with AI writing tools.
//!
//! Serves posts, comments, bookmarks, profiles and an admin dashboard over
//! a JSON API backed by SQLite. Writing tools (drafts, summaries,
//! headlines, tone and grammar rewrites, translation, image description)
//! are forwarded to OpenAI-compatible providers and fall back to built-in
//! templates where one exists.

pub mod ai;
pub mod analytics;
pub mod auth;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::{build_app, prepare, run};
pub use state::{AppState, SharedState};
