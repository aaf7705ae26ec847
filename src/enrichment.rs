//! Best-effort price enrichment against the vehicle-master catalog.
//!
//! Resolution never blocks a submission: any lookup failure degrades to a
//! null price with a logged warning.

use crate::errors::AppError;
use crate::models::{Brand, CatalogModel, VehicleSnapshot};
use crate::vehicle_master::VehicleMasterGateway;

/// Attaches the canonical catalog price to a vehicle snapshot.
///
/// Matching is case-insensitive exact equality on brand and model names, the
/// first match wins. No catalog match, or any failure along the way, yields
/// `price = None`; this function never fails.
pub async fn resolve_price(
    gateway: &VehicleMasterGateway,
    mut snapshot: VehicleSnapshot,
) -> VehicleSnapshot {
    snapshot.price = match lookup_price(gateway, &snapshot.brand, &snapshot.model).await {
        Ok(price) => price,
        Err(e) => {
            tracing::warn!(
                brand = %snapshot.brand,
                model = %snapshot.model,
                error = %e,
                "Price enrichment failed, continuing with null price"
            );
            None
        }
    };
    snapshot
}

async fn lookup_price(
    gateway: &VehicleMasterGateway,
    brand: &str,
    model: &str,
) -> Result<Option<f64>, AppError> {
    let brands = gateway.list_brands().await?;

    let Some(matched_brand) = match_brand(&brands, brand) else {
        tracing::debug!(brand = brand, "No catalog brand match");
        return Ok(None);
    };

    let models = gateway.list_models(&matched_brand.id).await?;

    let Some(matched_model) = match_model(&models, model) else {
        tracing::debug!(
            brand = %matched_brand.name,
            model = model,
            "No catalog model match"
        );
        return Ok(None);
    };

    Ok(matched_model.price)
}

/// Case-insensitive exact match on brand name; first match wins.
pub fn match_brand<'a>(brands: &'a [Brand], name: &str) -> Option<&'a Brand> {
    let wanted = name.trim().to_lowercase();
    brands.iter().find(|b| b.name.to_lowercase() == wanted)
}

/// Case-insensitive exact match on model name; first match wins.
pub fn match_model<'a>(models: &'a [CatalogModel], name: &str) -> Option<&'a CatalogModel> {
    let wanted = name.trim().to_lowercase();
    models.iter().find(|m| m.name.to_lowercase() == wanted)
}
