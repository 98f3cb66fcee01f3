//! HTTP front end for the tinyfix shortener.
//!
//! Serves the start page form, turns submitted URLs into short links and
//! redirects short links back to their long URLs.

pub mod app;
pub mod cli;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use state::AppState;
