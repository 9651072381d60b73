use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{RecommendationRequest, RecommendationResponse},
    routes::AppState,
};

fn validate(request: &RecommendationRequest, max_sample_size: usize) -> AppResult<()> {
    if request.series_url.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "series_url cannot be empty".to_string(),
        ));
    }
    if request.sample_size == 0 || request.sample_size > max_sample_size {
        return Err(AppError::InvalidInput(format!(
            "sample_size must be between 1 and {}",
            max_sample_size
        )));
    }
    if !request.min_popularity.is_finite() || request.min_popularity < 0.0 {
        return Err(AppError::InvalidInput(
            "min_popularity must be a non-negative number".to_string(),
        ));
    }
    Ok(())
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    validate(&request, state.max_sample_size)?;

    tracing::info!(
        request_id = %request_id,
        series_url = %request.series_url,
        sample_size = request.sample_size,
        min_popularity = request.min_popularity,
        "Processing recommendation request"
    );

    let recommendations = state
        .recommender
        .recommend(
            request.series_url.trim(),
            request.sample_size,
            request.min_popularity,
        )
        .await?;

    tracing::info!(
        request_id = %request_id,
        reference_title = %recommendations.reference_title,
        count = recommendations.series.len(),
        "Recommendations completed"
    );

    Ok(Json(RecommendationResponse {
        reference_title: recommendations.reference_title,
        sample_size: request.sample_size,
        recommendations: recommendations.series,
    }))
}
