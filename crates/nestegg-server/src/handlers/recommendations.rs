//! Recommendation handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use crate::{AppError, AppState};
use nestegg_core::{advice, inference, Transaction, TransactionInput};

/// Response for a recommendation request
#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<String>,
}

/// POST /api/recommendations - Predict advice for new transactions
///
/// Body: JSON array of `{amount, date, category_name, type}`. Each
/// transaction is reconstructed into a feature row aligned to the trained
/// model's schema and classified independently; the predicted labels flatten
/// into one advice string per fired tag.
pub async fn get_recommendations(
    State(state): State<Arc<AppState>>,
    Json(inputs): Json<Vec<TransactionInput>>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let transactions: Vec<Transaction> = inputs
        .iter()
        .map(|input| input.to_transaction())
        .collect::<nestegg_core::Result<_>>()
        .map_err(|e| AppError::bad_request(&e.to_string()))?;

    let rows = inference::reconstruct_rows(&transactions, &state.model);
    let labels = state.model.predict_labels(&rows)?;
    let recommendations = advice::recommendations(&labels);

    info!(
        transactions = transactions.len(),
        recommendations = recommendations.len(),
        "recommendation request served"
    );

    Ok(Json(RecommendationsResponse { recommendations }))
}
