#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, jwk::JwkSet, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

use coffee_shop_api::app::{router, AppState};
use coffee_shop_api::auth::{JwksClient, TokenVerifier};
use coffee_shop_api::config::AppConfig;
use coffee_shop_api::database::models::{Drink, NewDrink};
use coffee_shop_api::database::{DatabaseError, DrinkRepository, MemoryDrinkRepository};

pub const ISSUER: &str = "https://coffee-shop.test/";
pub const AUDIENCE: &str = "drinks";
pub const KEY_ID: &str = "test-key-1";

const PRIVATE_KEY: &[u8] = include_bytes!("../fixtures/test_rsa_key.pem");
const JWKS: &str = include_str!("../fixtures/jwks.json");

pub const MANAGER: &[&str] = &[
    "get:drinks-details",
    "create:drinks",
    "update:drinks",
    "delete:drinks",
];
pub const BARISTA: &[&str] = &["get:drinks-details"];

/// Router backed by an empty in-memory table and the fixture key set
pub fn test_app() -> Router {
    test_app_with(Arc::new(MemoryDrinkRepository::new()))
}

pub fn test_app_with(drinks: Arc<dyn DrinkRepository>) -> Router {
    let keys: JwkSet = serde_json::from_str(JWKS).expect("fixture jwks parses");
    let verifier = TokenVerifier::new(JwksClient::fixed(keys), ISSUER, AUDIENCE);
    let state = AppState::new(drinks, Arc::new(verifier));
    router(state, &AppConfig::development())
}

/// Store whose pool never hands out a connection
pub struct UnreachableDrinkRepository;

fn pool_timed_out() -> DatabaseError {
    DatabaseError::Sqlx(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl DrinkRepository for UnreachableDrinkRepository {
    async fn list(&self) -> Result<Vec<Drink>, DatabaseError> {
        Err(pool_timed_out())
    }

    async fn get(&self, _id: i32) -> Result<Option<Drink>, DatabaseError> {
        Err(pool_timed_out())
    }

    async fn insert(&self, _drink: NewDrink) -> Result<Drink, DatabaseError> {
        Err(pool_timed_out())
    }

    async fn update(&self, _id: i32, _drink: NewDrink) -> Result<Option<Drink>, DatabaseError> {
        Err(pool_timed_out())
    }

    async fn delete(&self, _id: i32) -> Result<bool, DatabaseError> {
        Err(pool_timed_out())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Err(pool_timed_out())
    }
}

/// Sign arbitrary claims with the fixture key
pub fn sign(claims: &Value, kid: Option<&str>) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = kid.map(String::from);
    let key = EncodingKey::from_rsa_pem(PRIVATE_KEY).expect("fixture key parses");
    encode(&header, claims, &key).expect("token signs")
}

/// Valid token for `sub` granting `permissions`
pub fn token(permissions: &[&str]) -> String {
    let now = chrono::Utc::now().timestamp();
    sign(
        &json!({
            "iss": ISSUER,
            "sub": "auth0|tester",
            "aud": AUDIENCE,
            "iat": now,
            "exp": now + 3600,
            "permissions": permissions,
        }),
        Some(KEY_ID),
    )
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> Result<TestResponse> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await.context("request failed")?;
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).with_context(|| format!("non-JSON body for {}", uri))?
    };

    Ok(TestResponse { status, body })
}

pub fn latte() -> Value {
    json!({
        "title": "latte",
        "recipe": [
            {"name": "espresso", "color": "brown", "parts": 1},
            {"name": "milk", "color": "white", "parts": 3}
        ]
    })
}

/// Create a drink as manager and return its id
pub async fn create(app: &Router, body: Value) -> Result<i64> {
    let res = send(app, Method::POST, "/drinks", Some(&token(MANAGER)), Some(body)).await?;
    anyhow::ensure!(res.status == StatusCode::OK, "create failed: {} {}", res.status, res.body);
    res.body["drinks"][0]["id"].as_i64().context("created drink has no id")
}
