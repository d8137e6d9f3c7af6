pub mod api;
pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod grams;
pub mod handlers;
pub mod middleware;
pub mod pictures;
pub mod state;
pub mod types;
pub mod users;

pub use app::app;
pub use state::AppState;
