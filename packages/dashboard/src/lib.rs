pub mod adjust;
pub mod app;
pub mod client;
pub mod config;
mod error;
pub mod health;
pub mod orchestrator;
pub mod poll;
pub mod routing;
pub mod state;
pub mod wallet;

pub use error::{DashboardError, DashboardResult};
