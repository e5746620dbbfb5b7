//! Users Domain
//!
//! Session identity for the task board, plus account registration and
//! login for the remote API.
//!
//! # Features
//!
//! - `Session`: the resolved user of the current run (social provider or guest)
//! - Account registration with Argon2 password hashing
//! - Login with case-insensitive email lookup
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{handlers, InMemoryUserRepository, Session, UserService};
//!
//! let mut session = Session::new();
//! let user = session.guest();
//! assert!(user.is_guest());
//!
//! let service = UserService::new(InMemoryUserRepository::new());
//! let router = handlers::router(service);
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod session;

// Re-export commonly used types
pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use models::{Account, AuthProvider, LoginRequest, RegisterRequest, User, UserResponse};
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
pub use session::Session;
