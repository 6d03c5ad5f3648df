// fleetwatch - vehicle document expiry and maintenance tracking

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod dates;
pub mod error;
pub mod expiry;
pub mod format;
pub mod models;
pub mod snapshot;
pub mod stats;

pub use error::{FleetError, Result};
pub use expiry::{aggregate_due, is_due_soon, DueReport};
pub use stats::{build_dashboard_stats, DashboardStats};
