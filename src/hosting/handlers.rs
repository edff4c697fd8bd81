use actix_web::{web, HttpResponse, Responder};
use rand::Rng;

use crate::dto::{
    EdgeCasesResponse, ErrorResponse, LeaderboardResponse, MlStatusResponse, ModelVersionSummary,
    ModelVersionsResponse, StartGameRequest, StartGameResponse, SubmitScoreRequest, SubmitScoreResponse,
    TrainingTriggerResponse,
};
use crate::error::PipelineError;

use super::state::AppState;

pub async fn start_game(state: web::Data<AppState>, body: web::Json<StartGameRequest>) -> impl Responder {
    if !state.start_rate_limiter.check(&body.player_id).await {
        return error_response(&PipelineError::RateLimited);
    }
    let seed: u32 = rand::rng().random();
    state.sessions.start(body.player_id.clone(), seed).await;
    HttpResponse::Ok().json(StartGameResponse {
        seed,
        grid: state.config.replay.grid,
        initial_speed_ms: state.config.replay.initial_speed_ms,
    })
}

pub async fn submit_score(state: web::Data<AppState>, body: web::Json<SubmitScoreRequest>) -> impl Responder {
    let submission = body.into_inner().into_submission();
    match state.orchestrator.submit(submission).await {
        Ok((score, rank)) => HttpResponse::Ok().json(SubmitScoreResponse {
            accepted: true,
            score,
            rank,
        }),
        Err(err) => error_response(&err),
    }
}

pub async fn hall_of_fame(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(LeaderboardResponse {
        entries: state.leaderboard.top(25).await,
    })
}

pub async fn hall_of_shame(state: web::Data<AppState>) -> impl Responder {
    let entries = state.shame_list.top(25).await;
    HttpResponse::Ok().json(serde_json::json!({ "entries": entries }))
}

pub async fn ml_status(state: web::Data<AppState>) -> impl Responder {
    let active_version = state.predictor.active_version_id().await;
    let metrics = match &active_version {
        Some(id) => state.model_registry.load(id).ok().map(|b| b.version.metrics),
        None => None,
    };
    HttpResponse::Ok().json(MlStatusResponse {
        active_version,
        metrics,
    })
}

pub async fn ml_versions(state: web::Data<AppState>) -> impl Responder {
    match state.model_registry.list() {
        Ok(versions) => HttpResponse::Ok().json(ModelVersionsResponse {
            versions: versions
                .into_iter()
                .map(|v| ModelVersionSummary {
                    id: v.id,
                    created_at_millis: v.created_at_millis,
                    metrics: v.metrics,
                })
                .collect(),
        }),
        Err(err) => HttpResponse::InternalServerError().json(ErrorResponse { error: err.to_string() }),
    }
}

pub async fn ml_training_logs(state: web::Data<AppState>) -> impl Responder {
    match state.training_store.read_all().await {
        Ok(samples) => HttpResponse::Ok().json(serde_json::json!({ "samples": samples.len() })),
        Err(err) => HttpResponse::InternalServerError().json(ErrorResponse { error: err.to_string() }),
    }
}

pub async fn ml_edge_cases(state: web::Data<AppState>) -> impl Responder {
    match state.edge_cases.read_all().await {
        Ok(cases) => HttpResponse::Ok().json(EdgeCasesResponse { cases }),
        Err(err) => HttpResponse::InternalServerError().json(ErrorResponse { error: err.to_string() }),
    }
}

/// Manual override for the periodic scheduler: an operator can force a
/// training run without waiting for the edge-case threshold.
pub async fn ml_train(state: web::Data<AppState>) -> impl Responder {
    let triggered = state.orchestrator.trigger_training().await;
    HttpResponse::Ok().json(TrainingTriggerResponse {
        triggered,
        reason: if triggered {
            "training run requested".into()
        } else {
            "a training run is already in progress".into()
        },
    })
}

fn error_response(err: &PipelineError) -> HttpResponse {
    let status = actix_web::http::StatusCode::from_u16(err.http_status()).unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(ErrorResponse {
        error: err.client_message(),
    })
}
