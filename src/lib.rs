pub mod api;
pub mod config;
pub mod error;
pub mod filter;
pub mod mail;
pub mod models;
pub mod report;
pub mod security;
pub mod state;

pub use config::Config;
pub use error::{AppError, Result};
pub use state::AppState;
