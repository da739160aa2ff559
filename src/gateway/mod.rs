//! HTTP gateway
//!
//! | Method | Path                           | Auth   |
//! |--------|--------------------------------|--------|
//! | GET    | `/health`                      | none   |
//! | POST   | `/api/v1/accounts`             | none   |
//! | GET    | `/api/v1/accounts`             | none   |
//! | GET    | `/api/v1/accounts/{id}/balance`| none   |
//! | POST   | `/api/v1/login`                | none   |
//! | POST   | `/api/v1/transfers`            | bearer |
//! | GET    | `/api/v1/transfers`            | bearer |
//! | POST   | `/api/v1/logout`               | bearer |

pub mod handlers;
pub mod state;
pub mod types;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::auth::bearer_auth_middleware;
use crate::config::GatewayConfig;
use state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route(
            "/api/v1/transfers",
            get(handlers::list_transfers).post(handlers::create_transfer),
        )
        .route("/api/v1/logout", post(handlers::logout))
        .route_layer(from_fn_with_state(state.clone(), bearer_auth_middleware));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/api/v1/accounts",
            get(handlers::list_accounts).post(handlers::create_account),
        )
        .route("/api/v1/accounts/{id}/balance", get(handlers::get_balance))
        .route("/api/v1/login", post(handlers::login))
        .merge(protected)
        .with_state(state)
}

/// Serve until ctrl-c.
pub async fn run_server(config: &GatewayConfig, state: Arc<AppState>) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Gateway listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("Shutdown signal received");
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::hash_secret;
    use crate::config::GatekeeperConfig;
    use crate::error::ACCESS_DENIED_MSG;
    use crate::gatekeeper::Gatekeeper;
    use crate::storage::{Account, MemoryStore};
    use crate::transfer::TransferOptions;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use chrono::Utc;
    use http_body_util::BodyExt;
    use rust_decimal::Decimal;
    use serde_json::{Value, json};
    use std::str::FromStr;
    use tower::ServiceExt;

    fn setup() -> (Router, Arc<MemoryStore>, Arc<Gatekeeper>) {
        let store = Arc::new(MemoryStore::new());
        for (id, cpf, balance) in [("a", "111", "22.22"), ("b", "222", "22.22")] {
            store
                .insert_account(Account {
                    id: id.to_string(),
                    name: format!("holder {}", id),
                    cpf: cpf.to_string(),
                    secret_hash: hash_secret("pass").unwrap(),
                    balance: Decimal::from_str(balance).unwrap(),
                    created_at: Utc::now(),
                })
                .unwrap();
        }
        let gatekeeper =
            Arc::new(Gatekeeper::new(&GatekeeperConfig::new("testSecret", "test")).unwrap());
        let state = AppState::from_store(gatekeeper.clone(), store.clone(), TransferOptions::default());
        (router(Arc::new(state)), store, gatekeeper)
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, auth: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get(uri: &str, auth: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn login(app: &Router, cpf: &str) -> String {
        let (status, body) = send(
            app,
            post_json("/api/v1/login", None, json!({"cpf": cpf, "secret": "pass"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["data"]["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _, _) = setup();
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], 0);
        assert_eq!(body["data"]["status"], "ok");
    }

    #[tokio::test]
    async fn test_login_and_transfer() {
        let (app, store, _) = setup();
        let token = login(&app, "111").await;

        let (status, body) = send(
            &app,
            post_json(
                "/api/v1/transfers",
                Some(&format!("Bearer {}", token)),
                json!({"account_destination_id": "b", "amount": 11.11}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["code"], 0);
        assert_eq!(body["data"]["origin_account_id"], "a");
        assert_eq!(store.balance_of("a").unwrap(), Decimal::from_str("11.11").unwrap());
        assert_eq!(store.balance_of("b").unwrap(), Decimal::from_str("33.33").unwrap());
    }

    #[tokio::test]
    async fn test_wrong_password_is_forbidden() {
        let (app, _, _) = setup();
        let (status, body) = send(
            &app,
            post_json("/api/v1/login", None, json!({"cpf": "111", "secret": "nope"})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_ne!(body["code"], 0);
    }

    #[tokio::test]
    async fn test_bad_headers_are_rejected_identically() {
        let (app, _, _) = setup();
        let payload = json!({"account_destination_id": "b", "amount": "1"});
        let mut bodies = Vec::new();
        for auth in [None, Some("a.b.c"), Some("Basic a.b.c"), Some("Bearer a.b.c")] {
            let (status, body) = send(&app, post_json("/api/v1/transfers", auth, payload.clone())).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "header {:?}", auth);
            assert_eq!(body["msg"], ACCESS_DENIED_MSG);
            bodies.push(body);
        }
        assert!(bodies.windows(2).all(|w| w[0] == w[1]));
    }

    #[tokio::test]
    async fn test_signed_but_unissued_token_is_rejected() {
        let (app, _, gatekeeper) = setup();
        let cred = gatekeeper.sign("a").unwrap();
        let (status, body) = send(
            &app,
            post_json(
                "/api/v1/transfers",
                Some(&format!("Bearer {}", cred.digest)),
                json!({"account_destination_id": "b", "amount": "1"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["msg"], ACCESS_DENIED_MSG);
    }

    #[tokio::test]
    async fn test_malformed_payload_is_bad_request() {
        let (app, store, _) = setup();
        let token = format!("Bearer {}", login(&app, "111").await);
        for payload in [
            json!({"account_destination_id": "b"}),
            json!({"account_destination_id": "b", "amount": "abc"}),
            json!({"account_destination_id": "b", "amount": -5}),
        ] {
            let (status, _) = send(&app, post_json("/api/v1/transfers", Some(&token), payload)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
        assert_eq!(store.balance_of("a").unwrap(), Decimal::from_str("22.22").unwrap());
    }

    #[tokio::test]
    async fn test_insufficient_balance_is_bad_request() {
        let (app, _, _) = setup();
        let token = format!("Bearer {}", login(&app, "111").await);
        let (status, body) = send(
            &app,
            post_json(
                "/api/v1/transfers",
                Some(&token),
                json!({"account_destination_id": "b", "amount": "22.23"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["msg"], "not enough balance to execute this operation");
    }

    #[tokio::test]
    async fn test_logout_revokes() {
        let (app, _, _) = setup();
        let token = format!("Bearer {}", login(&app, "111").await);

        let (status, body) = send(&app, post_json("/api/v1/logout", Some(&token), json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["revoked"], true);

        let (status, _) = send(
            &app,
            post_json(
                "/api/v1/transfers",
                Some(&token),
                json!({"account_destination_id": "b", "amount": "1"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_account_then_login() {
        let (app, store, _) = setup();
        let resp = app
            .clone()
            .oneshot(post_json(
                "/api/v1/accounts",
                None,
                json!({"name": "Chewbacca Solo", "cpf": "11111111030", "secret": "254855", "balance": 42.42}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let location = resp.headers()[header::LOCATION].to_str().unwrap().to_string();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        let id = body["data"]["id"].as_str().unwrap().to_string();
        assert_eq!(location, format!("/api/v1/accounts/{}", id));
        assert_eq!(store.balance_of(&id).unwrap(), Decimal::from_str("42.42").unwrap());

        let (status, body) = send(
            &app,
            post_json("/api/v1/login", None, json!({"cpf": "11111111030", "secret": "254855"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["token"].is_string());
    }

    #[tokio::test]
    async fn test_create_account_rejections() {
        let (app, _, _) = setup();
        let valid = json!({"name": "Han", "cpf": "12345678909", "secret": "x", "balance": "1.00"});
        let (status, _) = send(&app, post_json("/api/v1/accounts", None, valid.clone())).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&app, post_json("/api/v1/accounts", None, valid)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], types::error_codes::DUPLICATE_CPF);

        for payload in [
            json!({"name": "Han", "cpf": "11111111111", "secret": "x"}),
            json!({"name": "", "cpf": "52998224725", "secret": "x"}),
            json!({"name": "Han", "cpf": "52998224725", "secret": "x", "balance": -42.42}),
            json!({"name": "Han", "cpf": 52998224725u64, "secret": "x"}),
        ] {
            let (status, _) = send(&app, post_json("/api/v1/accounts", None, payload)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_list_accounts_hides_secrets() {
        let (app, _, _) = setup();
        let (status, body) = send(&app, get("/api/v1/accounts", None)).await;
        assert_eq!(status, StatusCode::OK);
        let accounts = body["data"].as_array().unwrap();
        assert_eq!(accounts.len(), 2);
        assert!(accounts.iter().all(|a| a.get("secret_hash").is_none()));
        assert!(!body.to_string().contains("argon2"));
    }

    #[tokio::test]
    async fn test_balance_lookup() {
        let (app, _, _) = setup();
        let (status, body) = send(&app, get("/api/v1/accounts/a/balance", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["balance"], "22.22");

        let (status, body) = send(&app, get("/api/v1/accounts/a6sf46af6af/balance", None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], types::error_codes::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_transfer_history_is_per_caller() {
        let (app, _, _) = setup();
        let a = format!("Bearer {}", login(&app, "111").await);
        let b = format!("Bearer {}", login(&app, "222").await);
        let (status, _) = send(
            &app,
            post_json(
                "/api/v1/transfers",
                Some(&a),
                json!({"account_destination_id": "b", "amount": "2.50"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&app, get("/api/v1/transfers", Some(&a))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["sent"].as_array().unwrap().len(), 1);
        assert!(body["data"]["received"].as_array().unwrap().is_empty());

        let (_, body) = send(&app, get("/api/v1/transfers", Some(&b))).await;
        assert!(body["data"]["sent"].as_array().unwrap().is_empty());
        assert_eq!(body["data"]["received"][0]["origin_account_id"], "a");

        let (status, body) = send(&app, get("/api/v1/transfers", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["msg"], ACCESS_DENIED_MSG);
    }
}
