use super::types::{ApiError, EstimateQuery};
use crate::{
    Error,
    estimate::{DamageEstimator, Upload, VehicleHint},
};
use axum::{
    extract::{
        Multipart, Query, State, multipart::MultipartRejection, rejection::QueryRejection,
    },
    response::Json,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;

pub const SERVICE_TITLE: &str = "Car Damage Estimation Vision API";

#[derive(Clone)]
pub struct AppState {
    pub estimator: Arc<DamageEstimator>,
}

pub async fn root() -> Json<Value> {
    Json(json!({
        "title": SERVICE_TITLE,
        "version": env!("CARGO_PKG_VERSION"),
        "message": format!("{} is up and running!", SERVICE_TITLE),
        "endpoints": {
            "/estimate-damage": "POST endpoint for car damage estimation",
            "query_params": {
                "car_name": "Optional car name",
                "car_model": "Optional car model year"
            }
        }
    }))
}

pub async fn estimate_damage(
    State(state): State<AppState>,
    query: Result<Query<EstimateQuery>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<String, ApiError> {
    let Query(query) =
        query.map_err(|e| Error::input(format!("Invalid query parameters: {}", e)))?;
    let multipart =
        multipart.map_err(|e| Error::input(format!("Expected multipart/form-data: {}", e)))?;
    let upload = read_upload(multipart, state.estimator.max_image_bytes()).await?;

    info!(
        "Received estimate request (car_name: {:?}, car_model: {:?})",
        query.car_name, query.car_model
    );

    let hint = VehicleHint::new(query.car_name, query.car_model);
    let text = state.estimator.estimate(upload, &hint).await?;

    Ok(text)
}

/// Pulls the `file` part out of the form, stopping early once `max_bytes`
/// is exceeded.
async fn read_upload(mut multipart: Multipart, max_bytes: Option<usize>) -> Result<Upload, Error> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::input(format!("Multipart error: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let mut bytes = Vec::new();

        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| Error::input(format!("Read error: {}", e)))?
        {
            bytes.extend_from_slice(&chunk);
            if let Some(limit) = max_bytes {
                if bytes.len() > limit {
                    return Err(Error::input(format!(
                        "Image too large: exceeds the {} byte limit",
                        limit
                    )));
                }
            }
        }

        return Ok(Upload::new(file_name, content_type, bytes));
    }

    Err(Error::input("Missing file in multipart form"))
}
