//! Shared test harness: an in-process stub of the commerce backend plus a
//! helper that boots the storefront against it on an ephemeral port.
//!
//! The stub implements just enough of the `/api/v1` surface for the
//! storefront's flows: token-based auth, products, image bytes, uploads,
//! and a cart with server-computed totals.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use serde_json::{Value, json};

use shopstyle_storefront::config::StorefrontConfig;
use shopstyle_storefront::state::AppState;

/// Password every stub account accepts.
pub const PASSWORD: &str = "secret";

/// Mutable state of the stub backend, shared with the test body.
#[derive(Default)]
pub struct BackendState {
    /// Products as camelCase JSON objects, exactly as the wire carries them
    pub products: Mutex<Vec<Value>>,
    pub next_product_id: Mutex<i64>,
    /// token -> (email, is_admin)
    pub tokens: Mutex<HashMap<String, (String, bool)>>,
    /// token -> cart lines (product_id, quantity)
    pub carts: Mutex<HashMap<String, Vec<(i64, u32)>>>,
    /// Authorization header observed on each `GET /products` request
    pub products_auth_headers: Mutex<Vec<Option<String>>>,
    /// When set, `GET /products` fails with (status, optional message body)
    pub products_failure: Mutex<Option<(u16, Option<String>)>>,
    /// When true, `GET /auth/check-admin` returns 500
    pub admin_check_failure: Mutex<bool>,
    /// Raw bytes received by `POST /products/upload`
    pub uploads: Mutex<Vec<Vec<u8>>>,
}

pub struct TestBackend {
    pub addr: SocketAddr,
    pub state: Arc<BackendState>,
}

impl TestBackend {
    pub fn base_url(&self) -> String {
        format!("http://{}/api/v1", self.addr)
    }

    /// Revoke a token server-side, simulating session expiry.
    pub fn revoke_token(&self, token: &str) {
        self.state.tokens.lock().unwrap().remove(token);
    }

    /// Re-install a token (used to prove the client stopped sending it).
    pub fn install_token(&self, token: &str, email: &str, admin: bool) {
        self.state
            .tokens
            .lock()
            .unwrap()
            .insert(token.to_string(), (email.to_string(), admin));
    }

    pub fn last_products_auth_header(&self) -> Option<Option<String>> {
        self.state
            .products_auth_headers
            .lock()
            .unwrap()
            .last()
            .cloned()
    }

    pub fn fail_products_with(&self, status: u16, message: Option<&str>) {
        *self.state.products_failure.lock().unwrap() =
            Some((status, message.map(String::from)));
    }

    pub fn clear_products_failure(&self) {
        *self.state.products_failure.lock().unwrap() = None;
    }
}

/// Expected token for an email logged in against the stub.
pub fn token_for(email: &str) -> String {
    format!("tok-{email}")
}

/// A small but real PNG, for the image endpoint and upload tests.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        width,
        height,
        image::Rgb([10, 120, 200]),
    ));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageOutputFormat::Png).unwrap();
    buf.into_inner()
}

fn seed_products() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "name": "Linen Shirt",
            "description": "A soft linen shirt",
            "price": 49.9,
            "imageUrl": "/uploads/images/shirt.jpg",
            "stock": 5
        }),
        json!({
            "id": 2,
            "name": "Wool Hat",
            "description": "Warm and itchy",
            "price": 15.0,
            "imageUrl": "/uploads/images/hat.jpg",
            "stock": 0
        }),
    ]
}

/// Spawn the stub backend on an ephemeral port.
pub async fn spawn_backend() -> TestBackend {
    let state = Arc::new(BackendState {
        products: Mutex::new(seed_products()),
        next_product_id: Mutex::new(3),
        ..BackendState::default()
    });

    let api = Router::new()
        .route("/auth/register", post(auth_register))
        .route("/auth/login", post(auth_login))
        .route("/auth/me", get(auth_me))
        .route("/auth/check-admin", get(auth_check_admin))
        .route("/products", get(products_list).post(products_create))
        .route("/products/upload", post(products_upload))
        .route("/products/image/{id}", get(products_image))
        .route(
            "/products/{id}",
            get(products_get).put(products_update).delete(products_delete),
        )
        .route("/cart", get(cart_get))
        .route("/cart/add/{id}", post(cart_add))
        .route("/cart/update/{id}", put(cart_update))
        .route("/cart/remove/{id}", delete(cart_remove))
        .route("/cart/clear", delete(cart_clear));

    let app = Router::new()
        .nest("/api/v1", api)
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestBackend { addr, state }
}

/// Spawn the storefront against the given backend, returning its base URL.
pub async fn spawn_storefront(backend: &TestBackend) -> String {
    let config = StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        api_base_url: backend.base_url(),
        http_timeout: Duration::from_secs(5),
        cart_poll_secs: 10,
        sentry_dsn: None,
    };

    let state = AppState::new(config).unwrap();
    let app = shopstyle_storefront::app(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

/// A browser-like client: keeps cookies, never follows redirects (so tests
/// can assert on them).
pub fn browser() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

/// Log in through the storefront form and assert it succeeded.
pub async fn login(client: &reqwest::Client, storefront: &str, email: &str) {
    let response = client
        .post(format!("{storefront}/login"))
        .form(&[("email", email), ("password", PASSWORD)])
        .send()
        .await
        .unwrap();

    assert!(response.status().is_redirection(), "login should redirect");
    assert_eq!(location(&response), "/");
}

/// The Location header of a redirect response.
pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

// =============================================================================
// Stub handlers
// =============================================================================

type Backend = Arc<BackendState>;

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(String::from)
}

/// Resolve the caller's token, or fail with 401.
fn authenticate(state: &Backend, headers: &HeaderMap) -> Result<(String, bool), StatusCode> {
    let token = bearer(headers).ok_or(StatusCode::UNAUTHORIZED)?;
    let tokens = state.tokens.lock().unwrap();
    let (_, admin) = tokens.get(&token).ok_or(StatusCode::UNAUTHORIZED)?;
    Ok((token.clone(), *admin))
}

fn issue_token(state: &Backend, email: &str) -> (String, bool) {
    let admin = email.starts_with("admin@");
    let token = token_for(email);
    state
        .tokens
        .lock()
        .unwrap()
        .insert(token.clone(), (email.to_string(), admin));
    (token, admin)
}

async fn auth_register(State(state): State<Backend>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    if email.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Email is required"})),
        )
            .into_response();
    }
    let (token, _) = issue_token(&state, &email);
    Json(json!({ "token": token })).into_response()
}

async fn auth_login(State(state): State<Backend>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default();
    if password != PASSWORD {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Invalid email or password"})),
        )
            .into_response();
    }
    let (token, _) = issue_token(&state, &email);
    Json(json!({ "token": token })).into_response()
}

async fn auth_me(State(state): State<Backend>, headers: HeaderMap) -> Response {
    match authenticate(&state, &headers) {
        Ok((token, admin)) => {
            let tokens = state.tokens.lock().unwrap();
            let (email, _) = tokens.get(&token).cloned().unwrap();
            Json(json!({
                "firstName": "Test",
                "lastName": "Shopper",
                "email": email,
                "role": if admin { "ADMIN" } else { "USER" }
            }))
            .into_response()
        }
        Err(status) => status.into_response(),
    }
}

async fn auth_check_admin(State(state): State<Backend>, headers: HeaderMap) -> Response {
    if *state.admin_check_failure.lock().unwrap() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    match authenticate(&state, &headers) {
        Ok((_, admin)) => Json(json!(admin)).into_response(),
        Err(status) => status.into_response(),
    }
}

async fn products_list(State(state): State<Backend>, headers: HeaderMap) -> Response {
    state
        .products_auth_headers
        .lock()
        .unwrap()
        .push(bearer(&headers).map(|token| format!("Bearer {token}")));

    if let Some((status, message)) = state.products_failure.lock().unwrap().clone() {
        let status = StatusCode::from_u16(status).unwrap();
        return match message {
            Some(message) => (status, Json(json!({"message": message}))).into_response(),
            None => status.into_response(),
        };
    }

    Json(state.products.lock().unwrap().clone()).into_response()
}

async fn products_get(State(state): State<Backend>, Path(id): Path<i64>) -> Response {
    let products = state.products.lock().unwrap();
    products
        .iter()
        .find(|product| product["id"].as_i64() == Some(id))
        .map_or_else(
            || StatusCode::NOT_FOUND.into_response(),
            |product| Json(product.clone()).into_response(),
        )
}

async fn products_create(
    State(state): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    match authenticate(&state, &headers) {
        Ok((_, true)) => {}
        Ok((_, false)) => return StatusCode::FORBIDDEN.into_response(),
        Err(status) => return status.into_response(),
    }

    let id = {
        let mut next = state.next_product_id.lock().unwrap();
        let id = *next;
        *next += 1;
        id
    };
    let product = json!({
        "id": id,
        "name": body["name"],
        "description": body["description"],
        "price": body["price"],
        "imageUrl": body["imageUrl"],
        "stock": 0
    });
    state.products.lock().unwrap().push(product.clone());
    Json(product).into_response()
}

async fn products_update(
    State(state): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    match authenticate(&state, &headers) {
        Ok((_, true)) => {}
        Ok((_, false)) => return StatusCode::FORBIDDEN.into_response(),
        Err(status) => return status.into_response(),
    }

    let mut products = state.products.lock().unwrap();
    let Some(product) = products
        .iter_mut()
        .find(|product| product["id"].as_i64() == Some(id))
    else {
        return StatusCode::NOT_FOUND.into_response();
    };

    product["name"] = body["name"].clone();
    product["description"] = body["description"].clone();
    product["price"] = body["price"].clone();
    product["imageUrl"] = body["imageUrl"].clone();
    Json(product.clone()).into_response()
}

async fn products_delete(
    State(state): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    match authenticate(&state, &headers) {
        Ok((_, true)) => {}
        Ok((_, false)) => return StatusCode::FORBIDDEN.into_response(),
        Err(status) => return status.into_response(),
    }

    state
        .products
        .lock()
        .unwrap()
        .retain(|product| product["id"].as_i64() != Some(id));
    StatusCode::OK.into_response()
}

async fn products_upload(
    State(state): State<Backend>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    match authenticate(&state, &headers) {
        Ok((_, true)) => {}
        Ok((_, false)) => return StatusCode::FORBIDDEN.into_response(),
        Err(status) => return status.into_response(),
    }

    let mut file_name = "upload.jpg".to_string();
    while let Some(field) = multipart.next_field().await.unwrap() {
        if field.name() == Some("file") {
            if let Some(name) = field.file_name() {
                file_name = name.to_string();
            }
            let bytes = field.bytes().await.unwrap();
            state.uploads.lock().unwrap().push(bytes.to_vec());
        }
    }

    format!("/uploads/images/stub_{file_name}").into_response()
}

async fn products_image(State(_state): State<Backend>, Path(id): Path<i64>) -> Response {
    if id == 404 {
        return StatusCode::NOT_FOUND.into_response();
    }
    (
        [(header::CONTENT_TYPE, "image/png")],
        png_bytes(2, 2),
    )
        .into_response()
}

fn cart_json(state: &Backend, token: &str) -> Value {
    let carts = state.carts.lock().unwrap();
    let products = state.products.lock().unwrap();
    let lines = carts.get(token).cloned().unwrap_or_default();

    let mut items = Vec::new();
    let mut total = 0.0;
    for (index, (product_id, quantity)) in lines.iter().enumerate() {
        let Some(product) = products
            .iter()
            .find(|product| product["id"].as_i64() == Some(*product_id))
        else {
            continue;
        };
        let price = product["price"].as_f64().unwrap_or_default();
        let line_total = price * f64::from(*quantity);
        total += line_total;
        items.push(json!({
            "id": index as i64 + 1,
            "productId": product_id,
            "productName": product["name"],
            "price": price,
            "quantity": quantity,
            "totalPrice": line_total
        }));
    }

    json!({ "id": 1, "items": items, "totalPrice": total })
}

async fn cart_get(State(state): State<Backend>, headers: HeaderMap) -> Response {
    match authenticate(&state, &headers) {
        Ok((token, _)) => Json(cart_json(&state, &token)).into_response(),
        Err(status) => status.into_response(),
    }
}

fn quantity_param(params: &HashMap<String, String>) -> u32 {
    params
        .get("quantity")
        .and_then(|value| value.parse().ok())
        .unwrap_or(1)
}

async fn cart_add(
    State(state): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let (token, _) = match authenticate(&state, &headers) {
        Ok(auth) => auth,
        Err(status) => return status.into_response(),
    };
    let quantity = quantity_param(&params);

    {
        let mut carts = state.carts.lock().unwrap();
        let lines = carts.entry(token.clone()).or_default();
        if let Some(line) = lines.iter_mut().find(|(pid, _)| *pid == id) {
            line.1 += quantity;
        } else {
            lines.push((id, quantity));
        }
    }

    let cart = cart_json(&state, &token);
    let item = cart["items"]
        .as_array()
        .and_then(|items| {
            items
                .iter()
                .find(|item| item["productId"].as_i64() == Some(id))
        })
        .cloned()
        .unwrap_or_default();
    Json(item).into_response()
}

async fn cart_update(
    State(state): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let (token, _) = match authenticate(&state, &headers) {
        Ok(auth) => auth,
        Err(status) => return status.into_response(),
    };
    let quantity = quantity_param(&params);

    let mut carts = state.carts.lock().unwrap();
    if let Some(lines) = carts.get_mut(&token)
        && let Some(line) = lines.iter_mut().find(|(pid, _)| *pid == id)
    {
        line.1 = quantity;
    }
    StatusCode::OK.into_response()
}

async fn cart_remove(
    State(state): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    let (token, _) = match authenticate(&state, &headers) {
        Ok(auth) => auth,
        Err(status) => return status.into_response(),
    };

    let mut carts = state.carts.lock().unwrap();
    if let Some(lines) = carts.get_mut(&token) {
        lines.retain(|(pid, _)| *pid != id);
    }
    StatusCode::OK.into_response()
}

async fn cart_clear(State(state): State<Backend>, headers: HeaderMap) -> Response {
    let (token, _) = match authenticate(&state, &headers) {
        Ok(auth) => auth,
        Err(status) => return status.into_response(),
    };

    state.carts.lock().unwrap().remove(&token);
    StatusCode::OK.into_response()
}
