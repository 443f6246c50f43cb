use serde::{Deserialize, Serialize};

use super::error::AuthError;

/// Claims carried by an access token from the external issuer.
///
/// Audience and issuer are checked during decoding and are not kept here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
    /// Absent when the API has RBAC permissions disabled at the issuer
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}

impl Claims {
    /// Ensure the token grants `permission`
    pub fn check_permission(&self, permission: Permission) -> Result<(), AuthError> {
        let granted = self.permissions.as_ref().ok_or(AuthError::PermissionsMissing)?;

        if granted.iter().any(|p| p == permission.as_str()) {
            Ok(())
        } else {
            Err(AuthError::PermissionDenied)
        }
    }
}

/// Permissions the drinks API asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    GetDrinksDetails,
    CreateDrinks,
    UpdateDrinks,
    DeleteDrinks,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::GetDrinksDetails => "get:drinks-details",
            Permission::CreateDrinks => "create:drinks",
            Permission::UpdateDrinks => "update:drinks",
            Permission::DeleteDrinks => "delete:drinks",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "get:drinks-details" => Some(Permission::GetDrinksDetails),
            "create:drinks" => Some(Permission::CreateDrinks),
            "update:drinks" => Some(Permission::UpdateDrinks),
            "delete:drinks" => Some(Permission::DeleteDrinks),
            _ => None,
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
