//! # karat-core
//!
//! Types shared by every Karat crate:
//! - Configuration (`karat.yaml` plus environment overrides)
//! - Roles, production stages and job statuses
//! - Records transported to and from the production API
//!
//! The records here are owned by the remote API. Karat never computes loss
//! figures or enforces business rules on them; it only carries them between
//! the API and the console.

pub mod config;
pub mod model;
pub mod role;

pub use config::{
    ApiConfig, ConfigError, DEFAULT_API_URL, DashboardConfig, KaratConfig, SessionConfig,
};
pub use model::{
    AssignJob, CompleteTask, Job, JobDetail, JobSummary, MaterialConsumption, NewJob, NewUser,
    ReportsOverview, TokenResponse, Transaction, User, WorkerPerformance, WorkerTask,
};
pub use role::{JobStatus, Role, Stage};
