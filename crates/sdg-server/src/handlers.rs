use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::Html;
use sdg_core::{GOALS, Prediction, SdgGoal, classification_text, normalize_doi};
use serde::Deserialize;
use tracing::info;

use crate::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FetchRequest {
    #[serde(default)]
    pub doi: Option<String>,
}

/// `POST /classify/`: classify raw text.
pub async fn classify(
    State(state): State<AppState>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Result<Json<Vec<Prediction>>, ApiError> {
    let Json(req) = payload?;
    let text = req
        .text
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::missing_field("text"))?;

    let predictions = run_classifier(&state, text).await?;
    Ok(Json(predictions))
}

/// `POST /fetch-and-classify/`: look a DOI up in OpenAlex and classify its metadata.
pub async fn fetch_and_classify(
    State(state): State<AppState>,
    payload: Result<Json<FetchRequest>, JsonRejection>,
) -> Result<Json<Vec<Prediction>>, ApiError> {
    let Json(req) = payload?;
    let doi = req
        .doi
        .filter(|d| !d.is_empty())
        .ok_or_else(|| ApiError::missing_field("doi"))?;
    let doi = normalize_doi(&doi);

    let work = state.openalex.fetch_work(doi).await?;
    let text = classification_text(&work).map_err(|e| ApiError::Internal(e.to_string()))?;
    if text.is_empty() {
        return Err(ApiError::BadRequest(format!(
            "No classifiable text for DOI {doi}"
        )));
    }

    info!(doi, chars = text.len(), "classifying fetched work");
    let predictions = run_classifier(&state, text).await?;
    Ok(Json(predictions))
}

/// `POST /plot/`: render classification output as an embedded PNG bar chart.
pub async fn plot(
    State(state): State<AppState>,
    payload: Result<Json<Vec<Prediction>>, JsonRejection>,
) -> Result<Html<String>, ApiError> {
    let Json(predictions) = payload?;
    let options = state.chart.clone();
    let png = tokio::task::spawn_blocking(move || sdg_chart::render_png(&predictions, &options))
        .await
        .map_err(|e| ApiError::Internal(format!("chart task failed: {e}")))??;
    Ok(Html(sdg_chart::html_fragment(&png)))
}

/// `GET /goals`: the 17 goals in canonical order.
pub async fn goals() -> Json<Vec<SdgGoal>> {
    Json(GOALS.iter().map(SdgGoal::from).collect())
}

/// Model inference is CPU-bound; keep it off the async workers.
async fn run_classifier(state: &AppState, text: String) -> Result<Vec<Prediction>, ApiError> {
    let classifier = state.classifier.clone();
    let predictions = tokio::task::spawn_blocking(move || classifier.classify(&text))
        .await
        .map_err(|e| ApiError::Internal(format!("classification task failed: {e}")))??;
    Ok(predictions)
}
