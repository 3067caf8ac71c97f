mod builds;
mod categories;
mod chat;
pub mod error;
mod orders;
mod products;
mod service_feedback;
mod service_orders;
mod services;
mod suppliers;
mod users;
mod validation;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::CorsConfig;
use crate::AppState;

pub use error::{ApiError, ErrorCode};

pub fn create_router(state: Arc<AppState>) -> Router {
    let user_routes = Router::new()
        .route("/user/register", post(users::register))
        .route("/user/login", post(users::login))
        .route(
            "/user/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/users", get(users::list_users));

    let catalog_routes = Router::new()
        // Categories
        .route(
            "/category",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/category/:id",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route("/category/:id/products", get(categories::category_products))
        // Products
        .route(
            "/product",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/product/:id",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        // Suppliers
        .route(
            "/supplier",
            get(suppliers::list_suppliers).post(suppliers::create_supplier),
        )
        .route(
            "/supplier/:id",
            get(suppliers::get_supplier)
                .put(suppliers::update_supplier)
                .delete(suppliers::delete_supplier),
        )
        .route("/supplier/:id/products", get(suppliers::supplier_products));

    let service_routes = Router::new()
        // Services
        .route(
            "/service",
            get(services::list_services).post(services::create_service),
        )
        .route(
            "/service/:id",
            get(services::get_service)
                .put(services::update_service)
                .delete(services::delete_service),
        )
        // Service orders
        .route(
            "/service-order",
            get(service_orders::list_service_orders).post(service_orders::create_service_order),
        )
        .route(
            "/service-order/:id",
            get(service_orders::get_service_order)
                .put(service_orders::update_service_order)
                .delete(service_orders::delete_service_order),
        )
        .route(
            "/service-order/user/:user_id",
            get(service_orders::user_service_orders),
        )
        // Feedback
        .route(
            "/service-feedback",
            get(service_feedback::list_feedback).post(service_feedback::create_feedback),
        )
        .route(
            "/service-feedback/:id",
            get(service_feedback::get_feedback)
                .put(service_feedback::update_feedback)
                .delete(service_feedback::delete_feedback),
        )
        .route(
            "/service-feedback/service-order/:id",
            get(service_feedback::service_order_feedback),
        )
        .route(
            "/service-feedback/user/:user_id",
            get(service_feedback::user_feedback),
        );

    let shop_routes = Router::new()
        // Builds
        .route("/build", get(builds::list_builds).post(builds::create_build))
        .route(
            "/build/:id",
            get(builds::get_build)
                .put(builds::update_build)
                .delete(builds::delete_build),
        )
        .route("/build/user/:user_id", get(builds::user_builds))
        // Orders
        .route("/order", get(orders::list_orders).post(orders::create_order))
        .route(
            "/order/:id",
            get(orders::get_order)
                .put(orders::update_order)
                .delete(orders::delete_order),
        )
        .route("/order/user/:user_id", get(orders::user_orders))
        // AI advisor
        .route("/chat", post(chat::chat))
        .route("/chat/history", get(chat::chat_history));

    let api_routes = user_routes
        .merge(catalog_routes)
        .merge(service_routes)
        .merge(shop_routes);

    let cors = cors_layer(&state.config.cors);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the CORS layer. A `*` entry allows any origin.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    if config.allowed_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::test_pool;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn app() -> Router {
        app_with_pool().await.0
    }

    async fn app_with_pool() -> (Router, crate::db::DbPool) {
        let db = test_pool().await;
        let state = AppState::new(Config::default(), db.clone()).unwrap();
        (create_router(Arc::new(state)), db)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let app = app().await;
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn test_register_login_and_patch() {
        let app = app().await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/user/register",
            Some(json!({
                "fullname": "Nguyen A",
                "email": "a@test.com",
                "password": "abc123",
                "phone": "0912345678",
                "dob": "15/03/1995"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["user"]["dob"], "1995-03-15");
        assert!(body["token"].as_str().is_some());
        assert!(body["user"].get("password").is_none());
        let id = body["user"]["id"].as_i64().unwrap();

        let (status, body) = send(
            &app,
            "POST",
            "/api/user/register",
            Some(json!({"fullname": "B", "email": "a@test.com", "password": "abc123"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["message"], "Email đã tồn tại");

        let (status, body) = send(
            &app,
            "POST",
            "/api/user/login",
            Some(json!({"identifier": "0912345678", "password": "abc123"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["id"], id);

        let (status, _) = send(
            &app,
            "POST",
            "/api/user/login",
            Some(json!({"identifier": "a@test.com", "password": "wrong1"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/api/user/{}", id),
            Some(json!({"address": "Ha Noi", "phone": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["address"], "Ha Noi");
        assert_eq!(body["phone"], Value::Null);
        assert_eq!(body["fullname"], "Nguyen A");
    }

    #[tokio::test]
    async fn test_register_validation_details() {
        let app = app().await;
        let (status, body) = send(
            &app,
            "POST",
            "/api/user/register",
            Some(json!({"fullname": "A", "email": "not-an-email", "password": "abc123"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "validation_error");
        assert!(body["error"]["details"]["email"].is_array());
    }

    #[tokio::test]
    async fn test_product_lifecycle() {
        let app = app().await;

        let (status, category) =
            send(&app, "POST", "/api/category", Some(json!({"name": "CPU"}))).await;
        assert_eq!(status, StatusCode::CREATED);
        let category_id = category["id"].as_i64().unwrap();

        let (status, product) = send(
            &app,
            "POST",
            "/api/product",
            Some(json!({
                "name": "Ryzen 5 7600",
                "brand": "AMD",
                "category_id": category_id,
                "imageUrl1": "https://img.test/r5.png",
                "tdpWatt": 65,
                "productPrices": [{"price": 5290000}]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(product["category"]["name"], "CPU");
        assert_eq!(product["image_url1"], "https://img.test/r5.png");
        assert_eq!(product["imageUrl1"], "https://img.test/r5.png");
        assert_eq!(product["tdp_watt"], 65);
        let id = product["id"].as_i64().unwrap();

        let (status, updated) = send(
            &app,
            "PUT",
            &format!("/api/product/{}", id),
            Some(json!({"brand": "AMD Ryzen"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["brand"], "AMD Ryzen");
        assert_eq!(updated["name"], "Ryzen 5 7600");
        assert_eq!(updated["productPrices"].as_array().unwrap().len(), 1);

        let (status, listing) = send(
            &app,
            "GET",
            &format!("/api/category/{}/products", category_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listing["products"].as_array().unwrap().len(), 1);

        let (status, body) = send(&app, "DELETE", &format!("/api/product/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (status, body) = send(&app, "GET", &format!("/api/product/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn test_build_and_order() {
        let (app, db) = app_with_pool().await;

        let (_, category) = send(&app, "POST", "/api/category", Some(json!({"name": "RAM"}))).await;
        let (status, _) = send(
            &app,
            "POST",
            "/api/product",
            Some(json!({
                "name": "DDR5 32GB",
                "category_id": category["id"],
                "productPrices": [{"price": 2500000}]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let (price_id,): (i64,) = sqlx::query_as("SELECT id FROM product_prices LIMIT 1")
            .fetch_one(&db)
            .await
            .unwrap();

        let (status, build) = send(
            &app,
            "POST",
            "/api/build",
            Some(json!({
                "name": "Office",
                "totalPrice": 5000000,
                "items": [{"productPriceId": price_id, "quantity": 2}]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(build["items"][0]["quantity"], 2);
        assert_eq!(build["items"][0]["productName"], "DDR5 32GB");
        let build_id = build["id"].as_i64().unwrap();

        let (status, _) = send(
            &app,
            "POST",
            "/api/build",
            Some(json!({"name": "Bad", "items": [{"productPriceId": price_id, "quantity": 0}]})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, order) = send(
            &app,
            "POST",
            "/api/order",
            Some(json!({"buildId": build_id, "phone": "+84 912-345-678", "totalPrice": 5000000})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(order["status"], "PAID");
        assert_eq!(order["phone"], "84912345678");
    }

    #[tokio::test]
    async fn test_chat_without_api_key_fails_softly() {
        let app = app().await;
        let (status, body) = send(
            &app,
            "POST",
            "/api/chat",
            Some(json!({"message": "Build PC 20 triệu", "userId": "1"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Build PC 20 triệu");
        assert!(body["error"].as_str().is_some());

        let (status, history) = send(&app, "GET", "/api/chat/history?userId=1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(history.as_array().unwrap().is_empty());
    }
}
