use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use warp::Filter;
use warp::http::StatusCode;

use crate::auth::{AuthError, AuthService, Claims};
use crate::engine::{EngineError, RoundEngine};
use round_types::{
    AuthResponse, CreateRoundResponse, RoundDetailResponse, RoundFinishedResponse, TapResponse,
};

pub mod auth;
pub mod config;
pub mod engine;

#[derive(Deserialize)]
struct LoginBody {
    username: Option<String>,
    password: Option<String>,
}

#[derive(Deserialize)]
struct TapBody {
    #[serde(rename = "roundUuid")]
    round_uuid: Option<String>,
}

type JsonReply = warp::reply::WithStatus<warp::reply::Json>;

pub fn create_routes(
    auth_service: Arc<AuthService>,
    engine: Arc<RoundEngine>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    // Clone for filters
    let auth_filter = warp::any().map({
        let auth_service = auth_service.clone();
        move || auth_service.clone()
    });

    let engine_filter = warp::any().map({
        let engine = engine.clone();
        move || engine.clone()
    });

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    // Login-or-register endpoint
    let login = warp::path!("auth")
        .and(warp::post())
        .and(warp::body::json())
        .and(auth_filter.clone())
        .and_then(handle_login);

    // Non-finished rounds, newest first
    let rounds = warp::path!("rounds")
        .and(warp::get())
        .and(warp::header::optional::<String>("authorization"))
        .and(auth_filter.clone())
        .and(engine_filter.clone())
        .and_then(handle_list_rounds);

    // Round creation (admin only)
    let create_round = warp::path!("round")
        .and(warp::post())
        .and(warp::header::optional::<String>("authorization"))
        .and(auth_filter.clone())
        .and(engine_filter.clone())
        .and_then(handle_create_round);

    // Round detail, with results once finished
    let round_detail = warp::path!("round" / String)
        .and(warp::get())
        .and(warp::header::optional::<String>("authorization"))
        .and(auth_filter.clone())
        .and(engine_filter.clone())
        .and_then(handle_round_detail);

    // Tap endpoint
    let tap = warp::path!("tap")
        .and(warp::post())
        .and(warp::header::optional::<String>("authorization"))
        .and(warp::body::json())
        .and(auth_filter.clone())
        .and(engine_filter.clone())
        .and_then(handle_tap);

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type", "authorization"])
        .allow_methods(vec!["GET", "POST"]);

    health
        .or(login)
        .or(rounds)
        .or(create_round)
        .or(round_detail)
        .or(tap)
        .with(cors)
        .with(warp::log("round_server"))
}

fn error_reply(status: StatusCode, message: &str) -> JsonReply {
    warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message
        })),
        status,
    )
}

fn engine_error_reply(err: EngineError) -> JsonReply {
    let status = match &err {
        EngineError::RoundNotFound => StatusCode::NOT_FOUND,
        EngineError::RoundNotActive => StatusCode::BAD_REQUEST,
        EngineError::AdminRequired => StatusCode::FORBIDDEN,
        EngineError::Database(_) | EngineError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("Engine failure: {:?}", err);
        return error_reply(status, "Internal server error");
    }

    error_reply(status, &err.to_string())
}

fn authenticate(auth_service: &AuthService, header: Option<String>) -> Result<Claims, JsonReply> {
    let header = match header {
        Some(header) => header,
        None => {
            return Err(error_reply(
                StatusCode::UNAUTHORIZED,
                "Authentication required",
            ));
        }
    };

    let token = header.strip_prefix("Bearer ").unwrap_or(&header);

    auth_service
        .validate_token(token)
        .map_err(|_| error_reply(StatusCode::UNAUTHORIZED, "Invalid authentication token"))
}

async fn handle_login(
    body: LoginBody,
    auth_service: Arc<AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let (username, password) = match (body.username, body.password) {
        (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
            (username, password)
        }
        _ => {
            return Ok(error_reply(
                StatusCode::UNAUTHORIZED,
                "Username and password are required",
            ));
        }
    };

    match auth_service.login(&username, &password).await {
        Ok(access_token) => Ok(warp::reply::with_status(
            warp::reply::json(&AuthResponse { access_token }),
            StatusCode::OK,
        )),
        Err(AuthError::InvalidCredentials) => {
            Ok(error_reply(StatusCode::UNAUTHORIZED, "Invalid credentials"))
        }
        Err(err) => {
            tracing::error!("Login failed: {:?}", err);
            Ok(error_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            ))
        }
    }
}

async fn handle_list_rounds(
    auth_header: Option<String>,
    auth_service: Arc<AuthService>,
    engine: Arc<RoundEngine>,
) -> Result<impl warp::Reply, warp::Rejection> {
    if let Err(reply) = authenticate(&auth_service, auth_header) {
        return Ok(reply);
    }

    match engine.list_rounds().await {
        Ok(rounds) => Ok(warp::reply::with_status(
            warp::reply::json(&rounds),
            StatusCode::OK,
        )),
        Err(err) => Ok(engine_error_reply(err)),
    }
}

async fn handle_create_round(
    auth_header: Option<String>,
    auth_service: Arc<AuthService>,
    engine: Arc<RoundEngine>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let claims = match authenticate(&auth_service, auth_header) {
        Ok(claims) => claims,
        Err(reply) => return Ok(reply),
    };

    match engine.create_round(claims.role).await {
        Ok(round) => Ok(warp::reply::with_status(
            warp::reply::json(&CreateRoundResponse { round }),
            StatusCode::CREATED,
        )),
        Err(err) => Ok(engine_error_reply(err)),
    }
}

async fn handle_round_detail(
    round_id: String,
    auth_header: Option<String>,
    auth_service: Arc<AuthService>,
    engine: Arc<RoundEngine>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let claims = match authenticate(&auth_service, auth_header) {
        Ok(claims) => claims,
        Err(reply) => return Ok(reply),
    };

    let round_uuid = match Uuid::parse_str(&round_id) {
        Ok(uuid) => uuid,
        Err(_) => {
            return Ok(error_reply(
                StatusCode::BAD_REQUEST,
                "Invalid round ID format",
            ));
        }
    };

    match engine.round_detail(round_uuid, &claims.sub).await {
        Ok(detail) => match detail.summary {
            Some(summary) => Ok(warp::reply::with_status(
                warp::reply::json(&RoundFinishedResponse {
                    round: detail.round,
                    current_user_score: detail.current_user_score,
                    total_score: summary.total_score,
                    best_player: summary.best_player,
                }),
                StatusCode::OK,
            )),
            None => Ok(warp::reply::with_status(
                warp::reply::json(&RoundDetailResponse {
                    round: detail.round,
                    current_user_score: detail.current_user_score,
                }),
                StatusCode::OK,
            )),
        },
        Err(err) => Ok(engine_error_reply(err)),
    }
}

async fn handle_tap(
    auth_header: Option<String>,
    body: TapBody,
    auth_service: Arc<AuthService>,
    engine: Arc<RoundEngine>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let claims = match authenticate(&auth_service, auth_header) {
        Ok(claims) => claims,
        Err(reply) => return Ok(reply),
    };

    let round_id = match body.round_uuid {
        Some(round_id) => round_id,
        None => {
            return Ok(error_reply(StatusCode::BAD_REQUEST, "roundUuid is required"));
        }
    };

    let round_uuid = match Uuid::parse_str(&round_id) {
        Ok(uuid) => uuid,
        Err(_) => {
            return Ok(error_reply(
                StatusCode::BAD_REQUEST,
                "Invalid round ID format",
            ));
        }
    };

    match engine.tap(&claims.sub, round_uuid, claims.role).await {
        Ok(score) => Ok(warp::reply::with_status(
            warp::reply::json(&TapResponse { score }),
            StatusCode::OK,
        )),
        Err(err) => Ok(engine_error_reply(err)),
    }
}
