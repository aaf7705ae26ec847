//! Shape validation for inbound inspection-request payloads.
//!
//! Runs before the orchestrator; produces 400-class errors with messages
//! that name the offending field.

use crate::errors::AppError;
use crate::models::{
    Coordinates, CustomerSnapshot, Location, Payment, PendingSubmission, Schedule, ServiceType,
    VehicleSnapshot,
};
use chrono::{NaiveDate, Utc};
use regex::Regex;
use serde::Deserialize;

/// Raw submission body. Everything is optional here so that missing fields
/// produce our validation messages instead of deserialization failures.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionRequestPayload {
    #[serde(default)]
    pub service_type: Option<String>,
    #[serde(default)]
    pub customer_snapshot: Option<CustomerSnapshotPayload>,
    #[serde(default)]
    pub vehicle_snapshot: Option<VehicleSnapshotPayload>,
    #[serde(default)]
    pub schedule: Option<SchedulePayload>,
    #[serde(default)]
    pub location: Option<LocationPayload>,
    #[serde(default)]
    pub payment: Option<Payment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSnapshotPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSnapshotPayload {
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub vin: Option<String>,
    #[serde(default)]
    pub registration_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SchedulePayload {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub slot: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LocationPayload {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub coordinates: Option<CoordinatesPayload>,
}

#[derive(Debug, Deserialize)]
pub struct CoordinatesPayload {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

/// Validate email address format (RFC 5322 simplified).
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < 5 || !email.contains('@') || !email.contains('.') {
        return false;
    }

    let email_regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).unwrap();

    email_regex.is_match(email)
}

/// Parses the schedule date, accepting a plain ISO date or an RFC 3339
/// timestamp (the date part is kept).
fn parse_schedule_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = raw.parse::<NaiveDate>() {
        return Some(date);
    }
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .ok()
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Validates a raw submission payload into a [`PendingSubmission`].
///
/// Checks run in a fixed order and stop at the first failure, matching the
/// messages the routing layer documents.
pub fn validate_inspection_request(
    payload: InspectionRequestPayload,
) -> Result<PendingSubmission, AppError> {
    let service_type = payload
        .service_type
        .as_deref()
        .and_then(ServiceType::parse)
        .ok_or_else(|| {
            tracing::warn!(reason = "invalid_service_type", "Validation failed");
            AppError::Validation("serviceType must be either PDI or UCI".to_string())
        })?;

    let customer = payload.customer_snapshot.unwrap_or(CustomerSnapshotPayload {
        name: None,
        phone: None,
        email: None,
        notes: None,
    });
    let (name, phone, email) = match (
        non_empty(&customer.name),
        non_empty(&customer.phone),
        non_empty(&customer.email),
    ) {
        (Some(name), Some(phone), Some(email)) => (name, phone, email),
        _ => {
            tracing::warn!(reason = "invalid_customer_snapshot", "Validation failed");
            return Err(AppError::Validation(
                "customerSnapshot.name, phone, and email are required".to_string(),
            ));
        }
    };
    if !is_valid_email(&email) {
        tracing::warn!(reason = "invalid_customer_email", "Validation failed");
        return Err(AppError::Validation(
            "customerSnapshot.email must be a valid email address".to_string(),
        ));
    }

    let vehicle = payload.vehicle_snapshot.unwrap_or(VehicleSnapshotPayload {
        brand: None,
        model: None,
        year: None,
        vin: None,
        registration_number: None,
    });
    let (brand, model, year) = match (
        non_empty(&vehicle.brand),
        non_empty(&vehicle.model),
        vehicle.year,
    ) {
        (Some(brand), Some(model), Some(year)) => (brand, model, year),
        _ => {
            tracing::warn!(reason = "invalid_vehicle_snapshot", "Validation failed");
            return Err(AppError::Validation(
                "vehicleSnapshot.brand, model, and year are required".to_string(),
            ));
        }
    };

    let schedule = payload.schedule.unwrap_or(SchedulePayload {
        date: None,
        slot: None,
    });
    let (date, slot) = match (
        schedule.date.as_deref().and_then(parse_schedule_date),
        non_empty(&schedule.slot),
    ) {
        (Some(date), Some(slot)) => (date, slot),
        _ => {
            tracing::warn!(reason = "invalid_schedule", "Validation failed");
            return Err(AppError::Validation(
                "schedule.date and schedule.slot are required and date must be valid".to_string(),
            ));
        }
    };
    if date < Utc::now().date_naive() {
        tracing::warn!(reason = "past_schedule_date", "Validation failed");
        return Err(AppError::Validation(
            "schedule.date must be today or a future date".to_string(),
        ));
    }

    let location = payload.location.unwrap_or(LocationPayload {
        address: None,
        coordinates: None,
    });
    let address = non_empty(&location.address);
    let lat = location.coordinates.as_ref().and_then(|c| c.lat);
    let lng = location.coordinates.as_ref().and_then(|c| c.lng);
    let (address, lat, lng) = match (address, lat, lng) {
        (Some(address), Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => {
            (address, lat, lng)
        }
        _ => {
            tracing::warn!(reason = "invalid_location", "Validation failed");
            return Err(AppError::Validation(
                "location.address, location.coordinates.lat, and location.coordinates.lng are required as valid numbers"
                    .to_string(),
            ));
        }
    };

    Ok(PendingSubmission {
        service_type,
        customer_snapshot: CustomerSnapshot {
            name,
            phone,
            email,
            notes: customer.notes,
        },
        vehicle_snapshot: VehicleSnapshot {
            brand,
            model,
            year,
            vin: non_empty(&vehicle.vin).unwrap_or_default(),
            registration_number: non_empty(&vehicle.registration_number).unwrap_or_default(),
            price: None,
        },
        schedule: Schedule { date, slot },
        location: Location {
            address,
            coordinates: Coordinates { lat, lng },
        },
        payment: payload.payment.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_payload() -> InspectionRequestPayload {
        serde_json::from_value(serde_json::json!({
            "serviceType": "PDI",
            "customerSnapshot": {"name": "A", "phone": "1", "email": "a@a.com"},
            "vehicleSnapshot": {"brand": "Honda", "model": "Civic", "year": 2020},
            "schedule": {"date": "2099-06-01", "slot": "10-11"},
            "location": {"address": "X", "coordinates": {"lat": 1.0, "lng": 2.0}}
        }))
        .unwrap()
    }

    #[test]
    fn accepts_a_complete_payload() {
        let submission = validate_inspection_request(valid_payload()).unwrap();
        assert_eq!(submission.service_type, ServiceType::Pdi);
        assert_eq!(submission.customer_snapshot.email, "a@a.com");
        assert_eq!(submission.schedule.slot, "10-11");
        assert!(submission.vehicle_snapshot.price.is_none());
        assert_eq!(submission.vehicle_snapshot.vin, "");
    }

    #[test]
    fn rejects_unknown_service_type() {
        let mut payload = valid_payload();
        payload.service_type = Some("OIL_CHANGE".to_string());
        let err = validate_inspection_request(payload).unwrap_err();
        assert!(err.to_string().contains("PDI or UCI"));
    }

    #[test]
    fn rejects_missing_customer_fields() {
        let mut payload = valid_payload();
        payload.customer_snapshot.as_mut().unwrap().phone = None;
        let err = validate_inspection_request(payload).unwrap_err();
        assert!(err.to_string().contains("customerSnapshot"));
    }

    #[test]
    fn rejects_malformed_email() {
        let mut payload = valid_payload();
        payload.customer_snapshot.as_mut().unwrap().email = Some("not-an-email".to_string());
        let err = validate_inspection_request(payload).unwrap_err();
        assert!(err.to_string().contains("email"));
    }

    #[test]
    fn rejects_past_schedule_date() {
        let mut payload = valid_payload();
        payload.schedule.as_mut().unwrap().date = Some("2001-01-01".to_string());
        let err = validate_inspection_request(payload).unwrap_err();
        assert!(err.to_string().contains("future"));
    }

    #[test]
    fn rejects_unparseable_date() {
        let mut payload = valid_payload();
        payload.schedule.as_mut().unwrap().date = Some("next tuesday".to_string());
        let err = validate_inspection_request(payload).unwrap_err();
        assert!(err.to_string().contains("schedule.date"));
    }

    #[test]
    fn accepts_rfc3339_timestamps_as_dates() {
        let mut payload = valid_payload();
        payload.schedule.as_mut().unwrap().date = Some("2099-06-01T09:30:00Z".to_string());
        let submission = validate_inspection_request(payload).unwrap();
        assert_eq!(
            submission.schedule.date,
            NaiveDate::from_ymd_opt(2099, 6, 1).unwrap()
        );
    }

    #[test]
    fn rejects_missing_coordinates() {
        let mut payload = valid_payload();
        payload.location.as_mut().unwrap().coordinates = None;
        let err = validate_inspection_request(payload).unwrap_err();
        assert!(err.to_string().contains("coordinates"));
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("test.user+tag@subdomain.example.co.uk"));
        assert!(!is_valid_email("not_an_email"));
        assert!(!is_valid_email("missing@domain"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
    }
}
