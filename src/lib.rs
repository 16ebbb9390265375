//! Request authentication and authorization gate for axum routers.
//!
//! A [`Guard`] verifies the `Authorization` bearer token (HS256 JWT),
//! decodes the caller's [`Identity`] from its claims, checks an optional
//! [`Policy`] and hands the identity to downstream handlers through the
//! request extensions. Handlers read it back with [`CurrentIdentity`] or
//! [`extract_identity`].
//!
//! ```ignore
//! let config = Config::from_env()?;
//! let verifier = Arc::new(TokenVerifier::from_config(&config));
//!
//! let admin = Router::new().route("/admin", get(admin));
//! let admin = Guard::new(verifier)
//!     .with_policy(Policy::new().with_groups(["admin"]).with_permissions(["admin:access"]))
//!     .apply(admin);
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

pub use api::v1::extractors::identity::{CurrentIdentity, Identity, extract_identity};
pub use config::{Config, ConfigError, SigningSecret};
pub use error::AuthError;
pub use middleware::auth::guard::{Guard, RejectionFormat};
pub use services::auth::{Policy, TokenVerifier};
