//! # karat-dashboard
//!
//! Local web console for the Karat production API.
//!
//! Every page reads the shared session, checks the role it needs, calls the
//! API through the gateway and renders server-side HTML:
//! - Owner pages: job summary, jobs, job detail and assignment, users, reports
//! - Worker pages: open tasks and task completion
//!
//! ## Tech Stack
//!
//! - Axum for HTTP server
//! - Server-rendered HTML with Tailwind CSS from a CDN
//! - The session file is shared with the `karat` CLI

pub mod auth;
pub mod error;
pub mod handlers;
pub mod pages;
pub mod routes;
pub mod server;
pub mod state;
pub mod templates;

pub use error::DashboardError;
pub use routes::create_router;
pub use server::DashboardServer;
pub use state::AppState;
