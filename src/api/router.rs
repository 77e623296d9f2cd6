use std::time::Duration;

use axum::{middleware, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use super::auth;
use super::health;
use super::middleware::{localize_errors, logging_middleware};
use super::state::AppState;
use super::team;
use super::transfer;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    let catalog = state.catalog.clone();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        .merge(auth::create_auth_router())
        .merge(team::create_team_router())
        .nest("/transfer", transfer::create_transfer_router())
        .with_state(state)
        .layer(middleware::from_fn_with_state(catalog, localize_errors))
        .layer(middleware::from_fn(logging_middleware))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use rust_decimal::Decimal;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::api::state::ServiceComponents;
    use crate::domain::storage::TransactionalStore;
    use crate::domain::transfer::FixedAppreciation;
    use crate::domain::RandomSquadGenerator;
    use crate::infrastructure::auth::{JwtConfig, JwtService};
    use crate::infrastructure::storage::{InMemoryStore, Stores};
    use crate::infrastructure::testing::{PlainHasher, TEST_PASSWORD};

    fn test_app(store: InMemoryStore) -> Router {
        let stores = Stores::in_memory(store);
        let state = AppState::new(
            &stores,
            ServiceComponents {
                hasher: Arc::new(PlainHasher),
                jwt: Arc::new(JwtService::new(JwtConfig::new("router-test-secret", 30))),
                refresh_ttl: chrono::Duration::days(7),
                squads: Arc::new(RandomSquadGenerator::new()),
                appreciation: Arc::new(FixedAppreciation::new(Decimal::new(15, 1))),
            },
        );
        create_router(state)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn register(app: &Router, email: &str) {
        let response = send(
            app,
            Method::POST,
            "/register",
            None,
            Some(json!({
                "email": email,
                "password": TEST_PASSWORD,
                "team_name": format!("{} United", email),
                "country": "AR"
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    /// Register and log in; returns the access and refresh tokens
    async fn sign_up(app: &Router, email: &str) -> (String, String) {
        register(app, email).await;

        let response = send(
            app,
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": email, "password": TEST_PASSWORD })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let tokens = body_json(response).await;
        (
            tokens["access_token"].as_str().unwrap().to_string(),
            tokens["refresh_token"].as_str().unwrap().to_string(),
        )
    }

    fn money(value: &Value) -> Decimal {
        value.as_str().unwrap().parse().unwrap()
    }

    async fn first_player_id(app: &Router, token: &str) -> i64 {
        let team = body_json(send(app, Method::GET, "/team", Some(token), None).await).await;
        team["players"][0]["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_register_login_and_view_team() {
        let app = test_app(InMemoryStore::new());
        let (token, _) = sign_up(&app, "ana@example.com").await;

        let response = send(&app, Method::GET, "/team", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let team = body_json(response).await;
        assert_eq!(money(&team["budget"]), Decimal::from(5_000_000));
        assert_eq!(money(&team["total_value"]), Decimal::from(20_000_000));
        assert_eq!(team["players"].as_array().unwrap().len(), 20);
    }

    #[tokio::test]
    async fn test_register_response_is_localized() {
        let app = test_app(InMemoryStore::new());

        let request = Request::builder()
            .method(Method::POST)
            .uri("/register")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT_LANGUAGE, "es-MX")
            .body(Body::from(
                json!({
                    "email": "eva@example.com",
                    "password": TEST_PASSWORD,
                    "team_name": "Pumas",
                    "country": "MX"
                })
                .to_string(),
            ))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Usuario creado exitosamente");
        assert!(body["data"]["team_id"].is_i64());
    }

    #[tokio::test]
    async fn test_duplicate_email_in_spanish() {
        let app = test_app(InMemoryStore::new());
        register(&app, "dup@example.com").await;

        let request = Request::builder()
            .method(Method::POST)
            .uri("/register")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT_LANGUAGE, "es")
            .body(Body::from(
                json!({
                    "email": "DUP@example.com",
                    "password": TEST_PASSWORD,
                    "team_name": "Otro",
                    "country": "ES"
                })
                .to_string(),
            ))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "email_exists");
        assert_eq!(body["error"]["message"], "El correo ya está registrado");
    }

    #[tokio::test]
    async fn test_validation_and_malformed_bodies() {
        let app = test_app(InMemoryStore::new());

        let response = send(
            &app,
            Method::POST,
            "/register",
            None,
            Some(json!({ "email": "x@example.com", "password": "123" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "password_short");

        let request = Request::builder()
            .method(Method::POST)
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{broken"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "invalid_json");
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized() {
        let app = test_app(InMemoryStore::new());
        register(&app, "kim@example.com").await;

        let response = send(
            &app,
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "kim@example.com", "password": "nope-nope" })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"]["code"], "invalid_credentials");
    }

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        let app = test_app(InMemoryStore::new());

        let response = send(&app, Method::GET, "/team", None, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"]["code"], "unauthorized");

        let response = send(&app, Method::GET, "/transfer/market", Some("garbage"), None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"]["code"], "invalid_token");
    }

    #[tokio::test]
    async fn test_transfer_flow() {
        let app = test_app(InMemoryStore::new());
        let (seller, _) = sign_up(&app, "seller@example.com").await;
        let (buyer, _) = sign_up(&app, "buyer@example.com").await;
        let player_id = first_player_id(&app, &seller).await;

        let response = send(
            &app,
            Method::POST,
            "/transfer/list",
            Some(&seller),
            Some(json!({ "player_id": player_id, "price": 2000000 })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let listed = body_json(response).await;
        assert_eq!(listed["data"]["on_transfer_list"], true);

        let market =
            body_json(send(&app, Method::GET, "/transfer/market", Some(&buyer), None).await).await;
        assert_eq!(market.as_array().unwrap().len(), 1);
        assert_eq!(market[0]["id"], player_id);

        let response = send(
            &app,
            Method::POST,
            "/transfer/buy",
            Some(&seller),
            Some(json!({ "player_id": player_id })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await["error"]["code"], "own_player_buy");

        let response = send(
            &app,
            Method::POST,
            "/transfer/buy",
            Some(&buyer),
            Some(json!({ "player_id": player_id })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let receipt = body_json(response).await;
        assert_eq!(money(&receipt["data"]["price"]), Decimal::from(2_000_000));
        assert_eq!(money(&receipt["data"]["new_base_value"]), Decimal::from(1_500_000));

        let buyer_team = body_json(send(&app, Method::GET, "/team", Some(&buyer), None).await).await;
        assert_eq!(money(&buyer_team["budget"]), Decimal::from(3_000_000));
        assert_eq!(buyer_team["players"].as_array().unwrap().len(), 21);

        let seller_team =
            body_json(send(&app, Method::GET, "/team", Some(&seller), None).await).await;
        assert_eq!(money(&seller_team["budget"]), Decimal::from(7_000_000));
        assert_eq!(seller_team["players"].as_array().unwrap().len(), 19);

        let market =
            body_json(send(&app, Method::GET, "/transfer/market", Some(&buyer), None).await).await;
        assert!(market.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_foreign_player_and_invalid_price() {
        let app = test_app(InMemoryStore::new());
        let (owner, _) = sign_up(&app, "owner@example.com").await;
        let (other, _) = sign_up(&app, "other@example.com").await;
        let player_id = first_player_id(&app, &owner).await;

        let response = send(
            &app,
            Method::POST,
            "/transfer/list",
            Some(&other),
            Some(json!({ "player_id": player_id, "price": "100.00" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["code"], "do_not_own_player");

        let response = send(
            &app,
            Method::POST,
            "/transfer/list",
            Some(&owner),
            Some(json!({ "player_id": player_id, "price": -5 })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "invalid_price");

        let response = send(
            &app,
            Method::POST,
            "/transfer/remove",
            Some(&owner),
            Some(json!({ "player_id": player_id })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await["error"]["code"], "player_not_for_sale");
    }

    #[tokio::test]
    async fn test_profile_updates() {
        let app = test_app(InMemoryStore::new());
        let (token, _) = sign_up(&app, "coach@example.com").await;
        let player_id = first_player_id(&app, &token).await;

        let response = send(
            &app,
            Method::PUT,
            "/team",
            Some(&token),
            Some(json!({ "name": "  Boca Seniors  " })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["name"], "Boca Seniors");

        let response = send(
            &app,
            Method::PUT,
            "/player",
            Some(&token),
            Some(json!({ "player_id": player_id, "first_name": "Diego" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["first_name"], "Diego");

        let response = send(
            &app,
            Method::PUT,
            "/team",
            Some(&token),
            Some(json!({ "country": "   " })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "country_required");
    }

    #[tokio::test]
    async fn test_refresh_rotation_and_logout() {
        let app = test_app(InMemoryStore::new());
        let (_, refresh_token) = sign_up(&app, "rot@example.com").await;

        let response = send(
            &app,
            Method::POST,
            "/refresh",
            None,
            Some(json!({ "refresh_token": refresh_token })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let rotated = body_json(response).await;
        let next_token = rotated["refresh_token"].as_str().unwrap().to_string();
        assert_ne!(next_token, refresh_token);

        let response = send(
            &app,
            Method::POST,
            "/refresh",
            None,
            Some(json!({ "refresh_token": refresh_token })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"]["code"], "invalid_token");

        for _ in 0..2 {
            let response = send(
                &app,
                Method::POST,
                "/logout",
                None,
                Some(json!({ "refresh_token": next_token })),
            )
            .await;
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = send(
            &app,
            Method::POST,
            "/refresh",
            None,
            Some(json!({ "refresh_token": next_token })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_busy_store_reports_unavailable() {
        let store = InMemoryStore::new().with_lock_timeout(std::time::Duration::from_millis(50));
        let app = test_app(store.clone());
        let (token, _) = sign_up(&app, "busy@example.com").await;

        let held = store.begin().await.unwrap();
        let response = send(&app, Method::GET, "/transfer/market", Some(&token), None).await;
        drop(held);

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(response).await["error"]["code"], "service_unavailable");

        let response = send(&app, Method::GET, "/transfer/market", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = test_app(InMemoryStore::new());

        let response = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(body_json(response).await["status"], "healthy");

        let response = send(&app, Method::GET, "/live", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
