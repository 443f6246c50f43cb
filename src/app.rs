use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post, MethodRouter},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::{Permission, TokenVerifier};
use crate::config::{AppConfig, SecurityConfig};
use crate::database::DrinkRepository;
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::{require_permission, PermissionGuard};

/// Shared handles every handler can reach
#[derive(Clone)]
pub struct AppState {
    pub drinks: Arc<dyn DrinkRepository>,
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(drinks: Arc<dyn DrinkRepository>, verifier: Arc<TokenVerifier>) -> Self {
        Self { drinks, verifier }
    }
}

pub fn router(state: AppState, config: &AppConfig) -> Router {
    let verifier = &state.verifier;

    let router = Router::new()
        // Public
        .route("/", get(public::service::root))
        .route("/health", get(public::service::health))
        .route(
            "/drinks",
            get(public::drinks::list).merge(protect(
                post(protected::drinks::create),
                verifier,
                Permission::CreateDrinks,
            )),
        )
        // Protected
        .route(
            "/drinks-detail",
            protect(get(protected::drinks::detail), verifier, Permission::GetDrinksDetails),
        )
        .route(
            "/drinks/:id",
            protect(patch(protected::drinks::update), verifier, Permission::UpdateDrinks).merge(
                protect(delete(protected::drinks::delete), verifier, Permission::DeleteDrinks),
            ),
        )
        .fallback(not_found)
        // Global middleware
        .layer(middleware::map_response(method_not_allowed_envelope))
        .layer(DefaultBodyLimit::max(config.server.max_request_size_bytes))
        .layer(TraceLayer::new_for_http());

    let router = if config.security.enable_cors {
        router.layer(cors_layer(&config.security))
    } else {
        router
    };

    router.with_state(state)
}

/// Put `route` behind a token carrying `permission`
fn protect(
    route: MethodRouter<AppState>,
    verifier: &Arc<TokenVerifier>,
    permission: Permission,
) -> MethodRouter<AppState> {
    route.route_layer(middleware::from_fn_with_state(
        PermissionGuard::new(verifier.clone(), permission),
        require_permission,
    ))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]);

    if security.cors_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Give axum's bare 405 the JSON error envelope, keeping its `Allow` header
async fn method_not_allowed_envelope(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    let allow = response.headers().get(header::ALLOW).cloned();
    let mut replaced = ApiError::MethodNotAllowed.into_response();
    if let Some(allow) = allow {
        replaced.headers_mut().insert(header::ALLOW, allow);
    }
    replaced
}
