/// Tests for best-effort price enrichment against a mocked catalog.
/// Enrichment must never fail; every failure mode degrades to a null price.
use inspection_customer_api::admin_auth::AdminTokenCache;
use inspection_customer_api::enrichment::resolve_price;
use inspection_customer_api::models::VehicleSnapshot;
use inspection_customer_api::vehicle_master::VehicleMasterGateway;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway(base_url: &str) -> VehicleMasterGateway {
    let auth = Arc::new(
        AdminTokenCache::new(
            base_url.to_string(),
            "svc@example.com".to_string(),
            "secret".to_string(),
            Duration::from_millis(2000),
        )
        .unwrap(),
    );
    VehicleMasterGateway::new(base_url.to_string(), auth, Duration::from_millis(2000)).unwrap()
}

fn snapshot(brand: &str, model: &str) -> VehicleSnapshot {
    VehicleSnapshot {
        brand: brand.to_string(),
        model: model.to_string(),
        year: 2020,
        vin: String::new(),
        registration_number: String::new(),
        price: None,
    }
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {"token": "tok-1", "expiresIn": 3600}
        })))
        .mount(server)
        .await;
}

async fn mount_catalog(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/vehicle-master/brands"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {"brands": [
                {"id": "b1", "name": "Toyota"},
                {"id": "b2", "name": "Honda"}
            ]}
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/vehicle-master/brands/b1/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {"models": [
                {"id": "m1", "name": "Corolla", "price": 45000.0},
                {"id": "m2", "name": "Camry", "price": 52000.0}
            ]}
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn matches_brand_and_model_case_insensitively() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_catalog(&server).await;

    let gateway = gateway(&server.uri());

    let enriched = resolve_price(&gateway, snapshot("toyota", "COROLLA")).await;
    assert_eq!(enriched.price, Some(45000.0));
}

#[tokio::test]
async fn unknown_brand_yields_null_price() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_catalog(&server).await;

    let gateway = gateway(&server.uri());

    let enriched = resolve_price(&gateway, snapshot("Lada", "Niva")).await;
    assert_eq!(enriched.price, None);
}

#[tokio::test]
async fn unknown_model_yields_null_price() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_catalog(&server).await;

    let gateway = gateway(&server.uri());

    let enriched = resolve_price(&gateway, snapshot("Toyota", "Yaris")).await;
    assert_eq!(enriched.price, None);
}

#[tokio::test]
async fn catalog_failure_degrades_to_null_price() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/vehicle-master/brands"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let gateway = gateway(&server.uri());

    let enriched = resolve_price(&gateway, snapshot("Toyota", "Corolla")).await;
    assert_eq!(enriched.price, None);
}

#[tokio::test]
async fn auth_failure_degrades_to_null_price() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .mount(&server)
        .await;

    let gateway = gateway(&server.uri());

    let enriched = resolve_price(&gateway, snapshot("Toyota", "Corolla")).await;
    assert_eq!(enriched.price, None);
}

#[tokio::test]
async fn enrichment_does_not_touch_other_fields() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_catalog(&server).await;

    let gateway = gateway(&server.uri());

    let mut input = snapshot("Toyota", "Camry");
    input.vin = "VIN123".to_string();
    let enriched = resolve_price(&gateway, input).await;

    assert_eq!(enriched.price, Some(52000.0));
    assert_eq!(enriched.brand, "Toyota");
    assert_eq!(enriched.vin, "VIN123");
    assert_eq!(enriched.year, 2020);
}
