mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{latte, send, sign, test_app, token, AUDIENCE, BARISTA, ISSUER, KEY_ID, MANAGER};

fn claims_with(overrides: serde_json::Value) -> serde_json::Value {
    let now = chrono::Utc::now().timestamp();
    let mut claims = json!({
        "iss": ISSUER,
        "sub": "auth0|tester",
        "aud": AUDIENCE,
        "iat": now,
        "exp": now + 3600,
        "permissions": MANAGER,
    });
    if let (Some(base), Some(extra)) = (claims.as_object_mut(), overrides.as_object()) {
        for (k, v) in extra {
            if v.is_null() {
                base.remove(k);
            } else {
                base.insert(k.clone(), v.clone());
            }
        }
    }
    claims
}

#[tokio::test]
async fn protected_routes_reject_missing_header() -> Result<()> {
    let app = test_app();

    for (method, uri) in [
        (Method::GET, "/drinks-detail"),
        (Method::POST, "/drinks"),
        (Method::PATCH, "/drinks/1"),
        (Method::DELETE, "/drinks/1"),
    ] {
        let res = send(&app, method.clone(), uri, None, Some(latte())).await?;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(
            res.body,
            json!({"success": false, "error": 401, "message": "Authorization header is expected."})
        );
    }
    Ok(())
}

#[tokio::test]
async fn barista_cannot_modify_drinks() -> Result<()> {
    let app = test_app();
    let barista = token(BARISTA);

    let res = send(&app, Method::POST, "/drinks", Some(&barista), Some(latte())).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body["message"], "Permission not found.");

    let res = send(&app, Method::DELETE, "/drinks/1", Some(&barista), None).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = send(&app, Method::GET, "/drinks-detail", Some(&barista), None).await?;
    assert_eq!(res.status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn token_without_permissions_claim_is_bad_request() -> Result<()> {
    let app = test_app();
    let token = sign(&claims_with(json!({"permissions": null})), Some(KEY_ID));

    let res = send(&app, Method::GET, "/drinks-detail", Some(&token), None).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["message"], "Permissions not included in JWT.");
    Ok(())
}

#[tokio::test]
async fn expired_token_is_unauthorized() -> Result<()> {
    let app = test_app();
    let past = chrono::Utc::now().timestamp() - 3600;
    let token = sign(&claims_with(json!({"exp": past, "iat": past - 60})), Some(KEY_ID));

    let res = send(&app, Method::GET, "/drinks-detail", Some(&token), None).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["message"], "Token expired.");
    Ok(())
}

#[tokio::test]
async fn wrong_audience_or_issuer_is_unauthorized() -> Result<()> {
    let app = test_app();

    for overrides in [json!({"aud": "payments"}), json!({"iss": "https://evil.test/"})] {
        let token = sign(&claims_with(overrides), Some(KEY_ID));
        let res = send(&app, Method::GET, "/drinks-detail", Some(&token), None).await?;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED);
        assert_eq!(res.body["message"], "Incorrect claims. Please, check the audience and issuer.");
    }
    Ok(())
}

#[tokio::test]
async fn token_header_problems() -> Result<()> {
    let app = test_app();

    let no_kid = sign(&claims_with(json!({})), None);
    let res = send(&app, Method::GET, "/drinks-detail", Some(&no_kid), None).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["message"], "Authorization malformed.");

    let unknown_kid = sign(&claims_with(json!({})), Some("rotated-away"));
    let res = send(&app, Method::GET, "/drinks-detail", Some(&unknown_kid), None).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["message"], "Unable to find the appropriate key.");

    let res = send(&app, Method::GET, "/drinks-detail", Some("garbage"), None).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["message"], "Unable to parse authentication token.");
    Ok(())
}

#[tokio::test]
async fn tampered_signature_is_rejected() -> Result<()> {
    let app = test_app();
    let valid = token(MANAGER);
    let mut parts: Vec<String> = valid.split('.').map(String::from).collect();
    let forged = sign(&claims_with(json!({"sub": "auth0|intruder"})), Some(KEY_ID));
    // Keep the genuine signature but swap in another payload
    parts[1] = forged.split('.').nth(1).unwrap_or_default().to_string();
    let tampered = parts.join(".");

    let res = send(&app, Method::GET, "/drinks-detail", Some(&tampered), None).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn auth_runs_before_not_found() -> Result<()> {
    let app = test_app();
    let res = send(&app, Method::DELETE, "/drinks/999", None, None).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = send(&app, Method::DELETE, "/drinks/999", Some(&token(MANAGER)), None).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn doubled_space_after_scheme_is_rejected() -> Result<()> {
    let app = test_app();
    let padded = format!(" {}", token(MANAGER));

    let res = send(&app, Method::GET, "/drinks-detail", Some(&padded), None).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["message"], "Authorization header must be bearer token.");
    Ok(())
}
