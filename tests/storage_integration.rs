use std::env;

use chrono::Utc;
use inspection_customer_api::db::Database;
use inspection_customer_api::models::{
    Coordinates, CustomerSnapshot, Location, Payment, PendingSubmission, RequestStatus, Schedule,
    ServiceType, VehicleSnapshot,
};
use inspection_customer_api::store::postgres::PostgresRequestStore;
use inspection_customer_api::store::RequestStore;

/// Integration smoke test for the Postgres request store.
/// Marked ignored to avoid running against production by accident; set
/// TEST_DATABASE_URL to run.
#[tokio::test]
#[ignore]
async fn request_store_round_trip_smoke_test() -> anyhow::Result<()> {
    let db_url = env::var("TEST_DATABASE_URL")
        .or_else(|_| env::var("DATABASE_URL"))
        .map_err(|_| anyhow::anyhow!("Set TEST_DATABASE_URL or DATABASE_URL to run this test"))?;

    let db = Database::new(&db_url).await?;
    let store = PostgresRequestStore::new(db.pool.clone());

    let submission = PendingSubmission {
        service_type: ServiceType::Uci,
        customer_snapshot: CustomerSnapshot {
            name: "Smoke Test".to_string(),
            phone: "5550100".to_string(),
            email: "smoke@example.com".to_string(),
            notes: Some("integration smoke".to_string()),
        },
        vehicle_snapshot: VehicleSnapshot {
            brand: "Honda".to_string(),
            model: "Civic".to_string(),
            year: 2021,
            vin: String::new(),
            registration_number: String::new(),
            price: Some(25000.0),
        },
        schedule: Schedule {
            date: Utc::now().date_naive(),
            slot: "10-11".to_string(),
        },
        location: Location {
            address: "Smoke Lane 1".to_string(),
            coordinates: Coordinates { lat: 1.0, lng: 2.0 },
        },
        payment: Payment::default(),
    };

    let persisted = store
        .insert(submission)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    assert!(persisted.request_number.starts_with("REQ-"));
    assert_eq!(persisted.status, RequestStatus::Pending);
    assert!(persisted.admin_job_id.is_none());

    let fetched = store
        .find_by_request_number(&persisted.request_number)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .expect("persisted request must be readable");
    assert_eq!(fetched.vehicle_snapshot.price, Some(25000.0));
    assert_eq!(fetched.customer_snapshot.email, "smoke@example.com");

    store
        .mark_forwarded(&persisted.request_number, "smoke-job-1")
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let forwarded = store
        .find_by_request_number(&persisted.request_number)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .expect("forwarded request must be readable");
    assert_eq!(forwarded.status, RequestStatus::Forwarded);
    assert_eq!(forwarded.admin_job_id.as_deref(), Some("smoke-job-1"));

    let summaries = store
        .list_summaries()
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    assert!(summaries
        .iter()
        .any(|s| s.request_id == persisted.request_number));

    Ok(())
}
