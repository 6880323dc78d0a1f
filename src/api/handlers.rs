use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;
use std::time::Instant;

use crate::data_models::KeywordResult;
use crate::pipeline::KeywordPipeline;

use super::models::{DEFAULT_TARGET_URL, ErrorResponse, GenerateRequest};

pub async fn generate_handler(
    State(pipeline): State<Arc<KeywordPipeline>>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<Vec<KeywordResult>>, (StatusCode, Json<ErrorResponse>)> {
    let start = Instant::now();

    let Some(raw_keywords) = request.keywords else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("缺少关键词")),
        ));
    };

    let target_url = request
        .url
        .unwrap_or_else(|| DEFAULT_TARGET_URL.to_string())
        .trim()
        .to_string();

    // The pipeline only errors before the first oracle call, on an empty
    // seed list; per-keyword failures come back in-band.
    let results = pipeline
        .process(&raw_keywords, &target_url)
        .await
        .map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(e.to_string())),
            )
        })?;

    log::info!(
        "generated {} results in {}ms",
        results.len(),
        start.elapsed().as_millis()
    );

    Ok(Json(results))
}

pub async fn home_handler() -> &'static str {
    "✅ Backend API 已启动，可通过 POST /generate 生成内容。"
}
