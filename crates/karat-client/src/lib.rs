//! # karat-client
//!
//! Client-side session handling and the single point of egress to the
//! production API.
//!
//! - [`SessionStore`]: the persisted token and cached user profile, and the
//!   only client-side authorization state.
//! - [`ApiClient`]: the gateway. It attaches the stored token as a bearer
//!   credential to every request and, on a 401, clears the session and sends
//!   the user to the login page before the error reaches the caller.
//! - [`access`]: page gating by role.
//!
//! ```rust,ignore
//! let session = SessionStore::new(Arc::new(FileStorage::new(path)));
//! let client = ApiClient::new(&config.api.base_url, session.clone())?;
//! let user = client.login("owner1", "validpass").await?;
//! assert!(session.is_authenticated());
//! ```

pub mod access;
pub mod api;
pub mod auth;
pub mod error;
pub mod gateway;
pub mod navigate;
pub mod session;
pub mod storage;

pub use access::{Access, AccessDenied, Route};
pub use error::{ClientError, StorageError};
pub use gateway::ApiClient;
pub use navigate::{LogNavigator, Navigator};
pub use session::{Session, SessionStore, TOKEN_KEY, USER_KEY};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
