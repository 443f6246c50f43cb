pub mod auth;
pub mod response;

pub use auth::{require_permission, PermissionGuard};
pub use response::{ApiResponse, ApiResult, Deleted, Drinks};
