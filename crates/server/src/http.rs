//! HTTP Endpoints
//!
//! REST API for scoring, interaction feedback, analytics and prompts.

use std::time::Duration;

use axum::{
    extract::{Json, MatchedPath, Path, Query, Request, State},
    http::{HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use vidya_config::Tone;
use vidya_core::{Difficulty, FeedbackUpdate, InteractionRecord, Language, QualityScore};
use vidya_llm::{Message, TutorPrompt};
use vidya_quality::scorer::{effective_language, DEFAULT_LANGUAGE};
use vidya_quality::{
    FeedbackAggregate, KnowledgeGap, QualityScorer, RetrainDecision, ScoreRequest,
};

use crate::metrics::{metrics_handler, record_quality_score, record_request};
use crate::state::AppState;
use crate::ServerError;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let server = &state.config.server;
    let cors_layer = build_cors_layer(&server.cors_origins, server.cors_enabled);
    let timeout = Duration::from_secs(server.timeout_seconds);

    Router::new()
        .route("/api/quality/score", post(score_response))
        .route("/api/interactions", post(create_interaction))
        .route("/api/interactions/:id", get(get_interaction))
        .route("/api/interactions/:id/feedback", post(submit_feedback))
        .route("/api/interactions/:id/rescore", post(rescore_interaction))
        .route("/api/analytics/feedback", get(feedback_analytics))
        .route("/api/analytics/knowledge-gaps", get(knowledge_gaps))
        .route("/api/analytics/retrain", get(retrain_decision))
        .route("/api/prompts", post(build_prompt))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route_layer(middleware::from_fn(track_requests))
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Count requests per matched route and status
async fn track_requests(req: Request, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let response = next.run(req).await;
    record_request(&route, response.status());
    response
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, returns permissive layer (for dev)
/// - If no configured origin parses, defaults to localhost:3000
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if parsed_origins.is_empty() {
        tracing::info!("No usable CORS origins configured, defaulting to localhost:3000");
        return layer.allow_origin(HeaderValue::from_static("http://localhost:3000"));
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    layer.allow_origin(parsed_origins)
}

/// POST /api/quality/score
///
/// Always answers 200 with a well-formed score for well-formed JSON. A body
/// that is not an object scores as an empty request.
async fn score_response(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Json<QualityScore> {
    let request = serde_json::from_value::<ScoreRequest>(body).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "Unusable score request body, scoring as empty");
        ScoreRequest::default()
    });
    Json(score_and_record(&state.scorer, &request))
}

fn score_and_record(scorer: &QualityScorer, request: &ScoreRequest) -> QualityScore {
    let assessment = scorer.assess_request(request);
    let language = effective_language(request.language.as_deref().unwrap_or_default());
    record_quality_score(&assessment, language);
    assessment.score
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateInteractionRequest {
    question: String,
    answer: String,
    #[serde(default)]
    language: Option<String>,
    subject: String,
    grade: u8,
    #[serde(default)]
    response_time: u64,
    #[serde(default)]
    tokens_used: u32,
    #[serde(default)]
    concept_difficulty: Option<Difficulty>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateInteractionResponse {
    id: Uuid,
    quality: QualityScore,
}

/// POST /api/interactions
///
/// Scores the answer and stores the record with its score attached.
async fn create_interaction(
    State(state): State<AppState>,
    Json(request): Json<CreateInteractionRequest>,
) -> Result<(StatusCode, Json<CreateInteractionResponse>), ServerError> {
    let language = request
        .language
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

    let score_request = ScoreRequest::new(&request.question, &request.answer, &language)
        .with_subject(&request.subject);
    let quality = score_and_record(&state.scorer, &score_request);

    let mut record = InteractionRecord::new(
        request.question,
        request.answer,
        language,
        request.subject,
        request.grade,
    )
    .with_usage(request.response_time, request.tokens_used);
    record.concept_difficulty = request.concept_difficulty;
    record.quality = Some(quality);
    record.validate()?;

    state.store.insert(&record).await?;
    tracing::info!(
        id = %record.id,
        language = %record.language,
        subject = %record.subject,
        overall = quality.overall_score,
        "Interaction recorded"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateInteractionResponse {
            id: record.id,
            quality,
        }),
    ))
}

/// GET /api/interactions/:id
async fn get_interaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InteractionRecord>, ServerError> {
    state
        .store
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ServerError::NotFound(format!("interaction {}", id)))
}

/// POST /api/interactions/:id/rescore
///
/// Scores the stored answer again with the current marker tables and weights.
async fn rescore_interaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QualityScore>, ServerError> {
    let record = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("interaction {}", id)))?;

    let request = ScoreRequest::new(&record.question, &record.answer, &record.language)
        .with_subject(&record.subject);
    let quality = score_and_record(&state.scorer, &request);
    state.store.attach_quality(id, &quality).await?;

    tracing::info!(
        id = %id,
        previous = ?record.quality.map(|q| q.overall_score),
        overall = quality.overall_score,
        "Interaction rescored"
    );
    Ok(Json(quality))
}

/// POST /api/interactions/:id/feedback
async fn submit_feedback(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<FeedbackUpdate>,
) -> Result<Json<InteractionRecord>, ServerError> {
    let record = state.store.apply_feedback(id, &update).await?;
    Ok(Json(record))
}

#[derive(Debug, Deserialize)]
struct WindowQuery {
    days: Option<u32>,
}

/// GET /api/analytics/feedback?days=N
///
/// Worst-rated segment first.
async fn feedback_analytics(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<Vec<FeedbackAggregate>>, ServerError> {
    let window = state.analyzer.window(query.days, Utc::now());
    let records = state.store.list_since(window.start).await?;
    Ok(Json(state.analyzer.aggregate(&records, window)))
}

/// GET /api/analytics/knowledge-gaps?days=N
async fn knowledge_gaps(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<Vec<KnowledgeGap>>, ServerError> {
    let window = state.analyzer.window(query.days, Utc::now());
    let records = state.store.list_since(window.start).await?;
    Ok(Json(state.analyzer.knowledge_gaps(&records, window)))
}

/// GET /api/analytics/retrain
///
/// Reports the decision only; acting on it is up to the operator.
async fn retrain_decision(
    State(state): State<AppState>,
) -> Result<Json<RetrainDecision>, ServerError> {
    let now = Utc::now();
    let window = state.analyzer.retrain_window(now);
    let records = state.store.list_since(window.start).await?;
    Ok(Json(state.analyzer.should_retrain(&records, now)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptRequest {
    question: String,
    #[serde(default)]
    subject: Option<String>,
    grade: u8,
    #[serde(default)]
    tone: Option<Tone>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    context: Option<String>,
    #[serde(default)]
    max_tokens: Option<usize>,
}

#[derive(Debug, Serialize)]
struct PromptResponse {
    messages: Vec<Message>,
}

/// POST /api/prompts
async fn build_prompt(
    State(state): State<AppState>,
    Json(request): Json<PromptRequest>,
) -> Result<Json<PromptResponse>, ServerError> {
    let tutor = &state.config.tutor;
    let language = match request.language.as_deref() {
        Some(code) if !code.trim().is_empty() => code.parse::<Language>()?,
        _ => Language::default(),
    };

    let mut builder = TutorPrompt::new(tutor)
        .grade(request.grade)
        .tone(request.tone.unwrap_or(tutor.default_tone))
        .language(language);
    if let Some(subject) = &request.subject {
        builder = builder.subject(subject);
    }
    if let Some(context) = &request.context {
        builder = builder.with_context(context);
    }

    let messages = match request.max_tokens {
        Some(limit) => builder.build_with_limit(&request.question, limit)?,
        None => builder.build(&request.question)?,
    };
    Ok(Json(PromptResponse { messages }))
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let languages: Vec<&str> = state.scorer.heuristics().markers().codes().collect();
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.environment,
        "store": state.store.backend(),
        "languages": languages,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header::CONTENT_TYPE;
    use tower::ServiceExt;
    use vidya_config::{MarkerTables, Settings};

    fn app() -> Router {
        create_router(AppState::new(Settings::default(), MarkerTables::builtin()))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<serde_json::Value>) -> (StatusCode, serde_json::Value) {
        let builder = axum::http::Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_score_endpoint() {
        let app = app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/quality/score",
            Some(serde_json::json!({
                "question": "What is the speed of light",
                "answer": "The speed of light is constant",
                "language": "en"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["metrics"]["relevance"], 0.667);
        assert!(body["overallScore"].is_number());
    }

    #[tokio::test]
    async fn test_score_endpoint_accepts_empty_object() {
        let app = app();
        let (status, body) = send(&app, "POST", "/api/quality/score", Some(serde_json::json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["overallScore"], 0.0);
    }

    #[tokio::test]
    async fn test_score_endpoint_tolerates_wrong_field_types() {
        let app = app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/quality/score",
            Some(serde_json::json!({
                "question": 5,
                "answer": "The speed of light.",
                "language": "en"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["metrics"]["relevance"], 0.0);
        assert_eq!(body["metrics"]["completeness"], 0.5);

        let (status, body) = send(&app, "POST", "/api/quality/score", Some(serde_json::json!([1, 2]))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["overallScore"], 0.0);
    }

    #[tokio::test]
    async fn test_interaction_feedback_and_analytics() {
        let app = app();
        let (status, created) = send(
            &app,
            "POST",
            "/api/interactions",
            Some(serde_json::json!({
                "question": "प्रकाश की गति क्या है?",
                "answer": "प्रकाश की गति लगभग तीन लाख किलोमीटर प्रति सेकंड है।",
                "language": "hi",
                "subject": "physics",
                "grade": 9,
                "responseTime": 900,
                "tokensUsed": 120
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap().to_string();
        assert_eq!(created["quality"]["metrics"]["languageQuality"], 0.8);

        let feedback_uri = format!("/api/interactions/{}/feedback", id);
        let (status, record) = send(&app, "POST", &feedback_uri, Some(serde_json::json!({ "userRating": 2 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(record["userRating"], 2);

        let (status, _) = send(&app, "POST", &feedback_uri, Some(serde_json::json!({ "userRating": 5 }))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, rows) = send(&app, "GET", "/api/analytics/feedback?days=7", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rows[0]["language"], "hi");
        assert_eq!(rows[0]["negativeCount"], 1);

        let (status, gaps) = send(&app, "GET", "/api/analytics/knowledge-gaps", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(gaps[0]["subject"], "physics");
        assert_eq!(gaps[0]["count"], 1);

        let (status, decision) = send(&app, "GET", "/api/analytics/retrain", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(decision["shouldTune"], false);
        assert_eq!(decision["evaluatedSegments"], 1);
    }

    #[tokio::test]
    async fn test_interaction_rejects_bad_grade() {
        let app = app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/interactions",
            Some(serde_json::json!({
                "question": "q", "answer": "a", "subject": "math", "grade": 0
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().to_lowercase().contains("grade"));
    }

    #[tokio::test]
    async fn test_rescore_replaces_stored_quality() {
        let state = AppState::new(Settings::default(), MarkerTables::builtin());
        let record = InteractionRecord::new(
            "Where is the Ganga",
            "The Ganga flows across India from the Himalaya.",
            "en",
            "geography",
            7,
        );
        let id = record.id;
        state.store.insert(&record).await.unwrap();
        let app = create_router(state.clone());

        let (status, body) = send(&app, "POST", &format!("/api/interactions/{}/rescore", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["metrics"]["culturalContext"], 1.0);

        let stored = state.store.get(id).await.unwrap().unwrap();
        let quality = stored.quality.unwrap();
        assert_eq!(serde_json::to_value(quality).unwrap(), body);

        let (status, _) = send(&app, "POST", &format!("/api/interactions/{}/rescore", Uuid::new_v4()), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_feedback_for_unknown_interaction() {
        let app = app();
        let uri = format!("/api/interactions/{}/feedback", Uuid::new_v4());
        let (status, _) = send(&app, "POST", &uri, Some(serde_json::json!({ "userRating": 3 }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_prompt_endpoint() {
        let app = app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/prompts",
            Some(serde_json::json!({
                "question": "Why do we see lightning before thunder?",
                "subject": "physics",
                "grade": 8,
                "tone": "playful",
                "language": "kn"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert!(messages[0]["content"].as_str().unwrap().contains("Kannada"));

        let (status, _) = send(
            &app,
            "POST",
            "/api/prompts",
            Some(serde_json::json!({ "question": "Why?", "grade": 8, "language": "klingon" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health() {
        let app = app();
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["store"], "memory");
    }
}
