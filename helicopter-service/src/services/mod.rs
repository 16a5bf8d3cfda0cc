//! Services layer for helicopter-service.
//!
//! Authentication, creator-based authorization and persistence.

pub mod auth;
mod database;
pub mod error;
pub mod identity;
mod jwt;
pub mod metrics;
pub mod ownership;

pub use auth::AuthService;
pub use database::Database;
pub use error::ServiceError;
pub use identity::{IdentityStore, MockIdentityStore};
pub use jwt::{AccessTokenClaims, JwtService};
pub use ownership::{CreatorLookup, MockCreatorLookup, OwnershipGate, ResourceKind};
