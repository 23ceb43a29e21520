//! The progress API: a handful of JSON endpoints wrapping the session
//! document in a `success`-flag envelope.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::SignedCookieJar;
use math_core::model::{
    ModuleName, ModuleUpdate, PracticeRecord, SessionState, SessionStateUpdate,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use services::PracticeKind;
use storage::repository::StorageError;
use tracing::{info, warn};

use crate::state::AppState;

//
// ─── ENVELOPES ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub success: bool,
    pub state: SessionState,
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct ModuleResponse {
    pub success: bool,
    pub data: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeResponse {
    pub success: bool,
    pub practice: PracticeRecord,
    pub total_stars: u32,
    pub stars_earned: u8,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

/// Failures become a `success: false` envelope; callers treat them the same
/// as a dropped connection and keep their last good state.
#[derive(Debug)]
pub enum ApiError {
    Storage(StorageError),
    UnknownModule(String),
    BadRequest(String),
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        ApiError::Storage(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::Storage(e) => {
                warn!(error = %e, "session store failure");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            ApiError::UnknownModule(module) => {
                (StatusCode::NOT_FOUND, format!("unknown module: {module}"))
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };
        (
            status,
            Json(ErrorResponse {
                success: false,
                error,
            }),
        )
            .into_response()
    }
}

//
// ─── HANDLERS ──────────────────────────────────────────────────────────────────
//

/// `GET /api/state`
pub async fn get_state(
    State(app): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Json<StateResponse>, ApiError> {
    let state = app.sessions.read(&jar).await?;
    Ok(Json(StateResponse {
        success: true,
        state,
    }))
}

/// `POST /api/state` — shallow-merge a partial document.
pub async fn post_state(
    State(app): State<AppState>,
    jar: SignedCookieJar,
    Json(update): Json<SessionStateUpdate>,
) -> Result<(SignedCookieJar, Json<StateResponse>), ApiError> {
    let mut state = app.sessions.read(&jar).await?;
    state.merge(update);
    let jar = app.sessions.write(jar, &mut state).await?;
    Ok((
        jar,
        Json(StateResponse {
            success: true,
            state,
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LessonVisitRequest {
    pub lesson: String,
}

/// `POST /api/lesson/visit` — fire-and-forget visit counter.
pub async fn lesson_visit(
    State(app): State<AppState>,
    jar: SignedCookieJar,
    Json(req): Json<LessonVisitRequest>,
) -> Result<(SignedCookieJar, Json<OkResponse>), ApiError> {
    let mut state = app.sessions.read(&jar).await?;
    state.record_lesson_visit(&req.lesson, app.sessions.now());
    let jar = app.sessions.write(jar, &mut state).await?;
    Ok((jar, Json(OkResponse { success: true })))
}

fn parse_module_update(module: ModuleName, body: Value) -> Result<ModuleUpdate, ApiError> {
    let bad = |e: serde_json::Error| ApiError::BadRequest(e.to_string());
    Ok(match module {
        ModuleName::NumberPlaces => {
            ModuleUpdate::NumberPlaces(serde_json::from_value(body).map_err(bad)?)
        }
        ModuleName::StackedMath => {
            ModuleUpdate::StackedMath(serde_json::from_value(body).map_err(bad)?)
        }
        ModuleName::Multiplication => {
            ModuleUpdate::Multiplication(serde_json::from_value(body).map_err(bad)?)
        }
        ModuleName::Division => ModuleUpdate::Division(serde_json::from_value(body).map_err(bad)?),
        ModuleName::CarryOver => {
            ModuleUpdate::CarryOver(serde_json::from_value(body).map_err(bad)?)
        }
        ModuleName::Borrowing => {
            ModuleUpdate::Borrowing(serde_json::from_value(body).map_err(bad)?)
        }
        ModuleName::SightWords => {
            ModuleUpdate::SightWords(serde_json::from_value(body).map_err(bad)?)
        }
    })
}

fn module_record(state: &SessionState, module: ModuleName) -> Result<Value, ApiError> {
    let ser = |e: serde_json::Error| {
        ApiError::Storage(StorageError::Serialization(e.to_string()))
    };
    match module {
        ModuleName::NumberPlaces => serde_json::to_value(&state.number_places).map_err(ser),
        ModuleName::StackedMath => serde_json::to_value(&state.stacked_math).map_err(ser),
        ModuleName::Multiplication => serde_json::to_value(&state.multiplication).map_err(ser),
        ModuleName::Division => serde_json::to_value(&state.division).map_err(ser),
        ModuleName::CarryOver => serde_json::to_value(&state.carry_over).map_err(ser),
        ModuleName::Borrowing => serde_json::to_value(&state.borrowing).map_err(ser),
        ModuleName::SightWords => serde_json::to_value(&state.sight_words).map_err(ser),
    }
}

/// `POST /api/progress/{module}` — apply a per-module merge, returning the
/// updated module record.
pub async fn module_progress(
    State(app): State<AppState>,
    Path(module): Path<String>,
    jar: SignedCookieJar,
    Json(body): Json<Value>,
) -> Result<(SignedCookieJar, Json<ModuleResponse>), ApiError> {
    let module: ModuleName = module
        .parse()
        .map_err(|_| ApiError::UnknownModule(module))?;
    let update = parse_module_update(module, body)?;

    let mut state = app.sessions.read(&jar).await?;
    state.apply_module(update);
    let data = module_record(&state, module)?;
    let jar = app.sessions.write(jar, &mut state).await?;

    Ok((
        jar,
        Json(ModuleResponse {
            success: true,
            data,
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct PracticeRecordRequest {
    pub correct: u32,
    pub total: u32,
    #[serde(default, rename = "type")]
    pub kind: Option<PracticeKind>,
}

/// `POST /api/practice/record` — fold one completed practice session into
/// the document. A single write covers the practice record and the stars.
pub async fn practice_record(
    State(app): State<AppState>,
    jar: SignedCookieJar,
    Json(req): Json<PracticeRecordRequest>,
) -> Result<(SignedCookieJar, Json<PracticeResponse>), ApiError> {
    let mut state = app.sessions.read(&jar).await?;
    let outcome = state.record_practice_session(req.correct, req.total);
    let jar = app.sessions.write(jar, &mut state).await?;

    info!(
        kind = req.kind.map(|k| k.as_str()).unwrap_or("mixed"),
        percent = outcome.percent,
        stars = outcome.stars_earned,
        "practice session recorded"
    );

    Ok((
        jar,
        Json(PracticeResponse {
            success: true,
            practice: state.practice,
            total_stars: state.total_stars,
            stars_earned: outcome.stars_earned,
        }),
    ))
}

/// `POST /api/reset` — destroy the document; back to all-zero defaults.
pub async fn reset(
    State(app): State<AppState>,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Json<StateResponse>), ApiError> {
    let jar = app.sessions.reset(jar).await?;
    Ok((
        jar,
        Json(StateResponse {
            success: true,
            state: SessionState::default(),
        }),
    ))
}
