use anyhow::anyhow;
use clap::Subcommand;
use serde_json::json;

use crate::auth::{Permission, TokenVerifier};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Verify a token and show its subject and permissions")]
    Check {
        #[arg(help = "Access token (without the Bearer prefix)")]
        token: String,
        #[arg(long, help = "Also require this permission, e.g. create:drinks")]
        permission: Option<String>,
    },
}

pub async fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Check { token, permission } => {
            let permission = permission
                .map(|p| Permission::parse(&p).ok_or_else(|| anyhow!("unknown permission '{}'", p)))
                .transpose()?;

            let auth = &config::config().auth;
            let verifier = TokenVerifier::from_config(auth)?;
            let claims = verifier
                .verify(&token)
                .await
                .map_err(|e| anyhow!("{} ({})", e, e.code()))?;

            if let Some(permission) = permission {
                claims
                    .check_permission(permission)
                    .map_err(|e| anyhow!("{} ({}): {}", e, e.code(), permission))?;
            }

            let permissions = claims.permissions.clone().unwrap_or_default();
            let message = format!(
                "Token valid for {} with permissions [{}]",
                claims.sub,
                permissions.join(", ")
            );
            output_success(
                &output_format,
                &message,
                Some(json!({
                    "sub": claims.sub,
                    "permissions": permissions,
                    "exp": claims.exp
                })),
            )
        }
    }
}
