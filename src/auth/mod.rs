//! Bearer token authorization against an external issuer.
//!
//! - `jwks` - published key set client with caching
//! - `jwt` - token verification and header parsing
//! - `claims` - verified claims and the permissions the API checks

pub mod claims;
pub mod error;
pub mod jwks;
pub mod jwt;

pub use claims::{Claims, Permission};
pub use error::AuthError;
pub use jwks::{JwksClient, KeySource};
pub use jwt::{bearer_token, TokenVerifier};
