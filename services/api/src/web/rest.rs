//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.
//!
//! Request payloads are normalized here: the legacy clients send several
//! spellings for the same concept (`session_id` vs `sessionId`, `email` vs
//! `userEmail`), which serde aliases fold into one canonical shape, while
//! `deny_unknown_fields` rejects anything unrecognized instead of silently
//! accepting it.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use auracare_core::domain::{ChatMessage, MoodSample, MusicTrack, QuizQuestion, Sender, User};
use auracare_core::ports::PortError;

use crate::web::auth::{AuthResponse, LoginRequest, SignupRequest};
use crate::web::chat::{ChatRequest, ChatResponse};
use crate::web::state::AppState;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::auth::signup_handler,
        crate::web::auth::login_handler,
        crate::web::auth::logout_handler,
        crate::web::chat::chat_handler,
        log_message_handler,
        session_messages_handler,
        message_history_handler,
        list_sessions_handler,
        log_mood_handler,
        moods_by_session_handler,
        moods_by_owner_handler,
        log_activity_handler,
        activity_summary_handler,
        get_profile_handler,
        update_profile_handler,
        list_users_handler,
        list_quiz_handler,
        create_quiz_handler,
        update_quiz_handler,
        delete_quiz_handler,
        list_music_handler,
        create_music_handler,
        update_music_handler,
        delete_music_handler,
    ),
    components(schemas(
        SignupRequest,
        LoginRequest,
        AuthResponse,
        ChatRequest,
        ChatResponse,
        LogMessageRequest,
        LogMessageResponse,
        SessionMessagesRequest,
        MessageHistoryRequest,
        MessageView,
        MessagesResponse,
        SessionView,
        SessionsResponse,
        LogMoodRequest,
        MoodView,
        MoodsResponse,
        LogActivityRequest,
        ActivityTotalView,
        ActivitySummaryResponse,
        StatusResponse,
        UpdateProfileRequest,
        UserView,
        UsersResponse,
        QuizPayload,
        QuizView,
        QuizzesResponse,
        MusicPayload,
        MusicView,
        MusicListResponse,
    )),
    tags(
        (name = "AuraCare API", description = "API endpoints for the mental-wellness chat companion.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Error Mapping
//=========================================================================================

/// Maps a port error onto the HTTP taxonomy: validation 400, not-found 404,
/// unauthorized 401, conflict 409, everything else 500.
pub fn port_error(context: &'static str, err: PortError) -> (StatusCode, String) {
    match &err {
        PortError::Validation(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        PortError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        PortError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
        PortError::Conflict(_) => (StatusCode::CONFLICT, err.to_string()),
        other => {
            error!("Failed to {context}: {other:?}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to {context}"),
            )
        }
    }
}

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct LogMessageRequest {
    #[serde(alias = "userEmail")]
    pub email: String,
    /// "user" or "bot".
    pub sender: String,
    #[serde(alias = "body")]
    pub message: String,
    #[serde(alias = "sessionId")]
    pub session_id: String,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Serialize, ToSchema)]
pub struct LogMessageResponse {
    pub success: bool,
    pub id: Uuid,
}

#[derive(Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct SessionMessagesRequest {
    #[serde(alias = "userEmail")]
    pub email: String,
    #[serde(alias = "sessionId")]
    pub session_id: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct MessageHistoryRequest {
    #[serde(alias = "userEmail")]
    pub email: String,
    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
}

#[derive(Serialize, ToSchema)]
pub struct MessageView {
    pub id: Uuid,
    pub sender: String,
    pub message: String,
    pub session_id: String,
    pub timestamp: String,
}

impl From<ChatMessage> for MessageView {
    fn from(m: ChatMessage) -> Self {
        Self {
            id: m.id,
            sender: m.sender.as_str().to_string(),
            message: m.body,
            session_id: m.session_id,
            timestamp: m.timestamp.to_rfc3339(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct MessagesResponse {
    pub success: bool,
    pub messages: Vec<MessageView>,
}

#[derive(Serialize, ToSchema)]
pub struct SessionView {
    pub id: String,
    pub created_at: String,
}

#[derive(Serialize, ToSchema)]
pub struct SessionsResponse {
    pub success: bool,
    pub sessions: Vec<SessionView>,
}

#[derive(Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct LogMoodRequest {
    #[serde(alias = "userEmail")]
    pub email: String,
    #[serde(alias = "sessionId")]
    pub session_id: String,
    pub mood: i32,
    pub source: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Serialize, ToSchema)]
pub struct MoodView {
    pub id: Uuid,
    pub email: String,
    pub session_id: String,
    pub mood: i32,
    pub emotion: String,
    pub source: Option<String>,
    pub timestamp: String,
}

impl From<MoodSample> for MoodView {
    fn from(m: MoodSample) -> Self {
        Self {
            id: m.id,
            email: m.owner_email,
            session_id: m.session_id,
            mood: m.mood,
            emotion: m.emotion.as_str().to_string(),
            source: m.source,
            timestamp: m.timestamp.to_rfc3339(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct MoodsResponse {
    pub moods: Vec<MoodView>,
}

#[derive(Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct LogActivityRequest {
    #[serde(alias = "userEmail")]
    pub email: String,
    pub activity: String,
    /// Duration in seconds; must be positive.
    pub duration: i64,
}

#[derive(Serialize, ToSchema)]
pub struct ActivityTotalView {
    pub name: String,
    pub minutes: f64,
}

#[derive(Serialize, ToSchema)]
pub struct ActivitySummaryResponse {
    pub success: bool,
    pub activities: Vec<ActivityTotalView>,
}

#[derive(Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateProfileRequest {
    pub email: String,
    pub name: Option<String>,
    pub dob: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct UserView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub dob: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub is_profile_complete: bool,
    pub role: String,
    pub status: String,
}

impl From<User> for UserView {
    fn from(u: User) -> Self {
        Self {
            id: u.user_id,
            name: u.name,
            email: u.email,
            avatar: u.avatar,
            dob: u.dob,
            location: u.location,
            bio: u.bio,
            is_profile_complete: u.is_profile_complete,
            role: "User".to_string(),
            status: "Active".to_string(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct UsersResponse {
    pub success: bool,
    pub users: Vec<UserView>,
}

#[derive(Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct QuizPayload {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    pub category: Option<String>,
    pub difficulty: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct QuizView {
    pub id: Uuid,
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    pub category: Option<String>,
    pub difficulty: Option<String>,
}

impl From<QuizQuestion> for QuizView {
    fn from(q: QuizQuestion) -> Self {
        Self {
            id: q.id,
            question: q.question,
            options: q.options,
            answer: q.answer,
            category: q.category,
            difficulty: q.difficulty,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct QuizzesResponse {
    pub success: bool,
    pub questions: Vec<QuizView>,
}

#[derive(Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct MusicPayload {
    pub title: String,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub url: String,
    pub category: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct MusicView {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub url: String,
    pub category: Option<String>,
}

impl From<MusicTrack> for MusicView {
    fn from(t: MusicTrack) -> Self {
        Self {
            id: t.id,
            title: t.title,
            description: t.description,
            duration: t.duration,
            url: t.url,
            category: t.category,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct MusicListResponse {
    pub success: bool,
    pub music: Vec<MusicView>,
}

//=========================================================================================
// Message Log Handlers
//=========================================================================================

/// Append one chat turn to a session, creating the session on first write.
#[utoipa::path(
    post,
    path = "/api/messages",
    request_body = LogMessageRequest,
    responses(
        (status = 200, description = "Message logged", body = LogMessageResponse),
        (status = 400, description = "Missing required fields")
    )
)]
pub async fn log_message_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LogMessageRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let sender = Sender::parse(&req.sender).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            format!("sender must be \"user\" or \"bot\", got {:?}", req.sender),
        )
    })?;

    let message = state
        .journal
        .append_message(&req.email, &req.session_id, sender, &req.message, req.timestamp)
        .await
        .map_err(|e| port_error("log message", e))?;

    Ok(Json(LogMessageResponse {
        success: true,
        id: message.id,
    }))
}

/// Fetch all messages of one session, ascending by timestamp.
#[utoipa::path(
    post,
    path = "/api/session-messages",
    request_body = SessionMessagesRequest,
    responses(
        (status = 200, description = "Messages for the session", body = MessagesResponse),
        (status = 400, description = "Missing email or session_id")
    )
)]
pub async fn session_messages_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SessionMessagesRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let messages = state
        .journal
        .session_messages(&req.email, &req.session_id)
        .await
        .map_err(|e| port_error("fetch session messages", e))?;

    Ok(Json(MessagesResponse {
        success: true,
        messages: messages.into_iter().map(MessageView::from).collect(),
    }))
}

/// Fetch every message of one owner on a UTC calendar day.
#[utoipa::path(
    post,
    path = "/api/message-history",
    request_body = MessageHistoryRequest,
    responses(
        (status = 200, description = "Messages on the given day", body = MessagesResponse),
        (status = 400, description = "Missing email or unparsable date")
    )
)]
pub async fn message_history_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MessageHistoryRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let messages = state
        .journal
        .messages_on_date(&req.email, &req.date)
        .await
        .map_err(|e| port_error("fetch message history", e))?;

    Ok(Json(MessagesResponse {
        success: true,
        messages: messages.into_iter().map(MessageView::from).collect(),
    }))
}

/// List the chat sessions belonging to an owner.
#[utoipa::path(
    get,
    path = "/api/sessions/{email}",
    params(("email" = String, Path, description = "Owner email")),
    responses(
        (status = 200, description = "Sessions owned by the user", body = SessionsResponse)
    )
)]
pub async fn list_sessions_handler(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let sessions = state
        .journal
        .sessions_for(&email)
        .await
        .map_err(|e| port_error("list sessions", e))?;

    Ok(Json(SessionsResponse {
        success: true,
        sessions: sessions
            .into_iter()
            .map(|s| SessionView {
                id: s.session_id,
                created_at: s.created_at.to_rfc3339(),
            })
            .collect(),
    }))
}

//=========================================================================================
// Mood Log Handlers
//=========================================================================================

/// Record one mood sample; the emotion label is derived from the score.
#[utoipa::path(
    post,
    path = "/api/mood-log",
    request_body = LogMoodRequest,
    responses(
        (status = 200, description = "Mood logged with emotion", body = StatusResponse),
        (status = 400, description = "Missing session_id, email, or mood")
    )
)]
pub async fn log_mood_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LogMoodRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .journal
        .log_mood(
            &req.email,
            &req.session_id,
            req.mood,
            req.source.as_deref(),
            req.timestamp,
        )
        .await
        .map_err(|e| port_error("log mood", e))?;

    Ok(Json(StatusResponse {
        success: true,
        message: "Mood logged with emotion".to_string(),
    }))
}

/// Fetch mood samples recorded against one session.
#[utoipa::path(
    get,
    path = "/api/mood-logs/session/{session_id}",
    params(("session_id" = String, Path, description = "Chat session id")),
    responses((status = 200, description = "Mood samples for the session", body = MoodsResponse))
)]
pub async fn moods_by_session_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let moods = state
        .journal
        .moods_by_session(&session_id)
        .await
        .map_err(|e| port_error("fetch mood logs", e))?;

    Ok(Json(MoodsResponse {
        moods: moods.into_iter().map(MoodView::from).collect(),
    }))
}

/// Fetch every mood sample belonging to one owner.
#[utoipa::path(
    get,
    path = "/api/mood-logs/email/{email}",
    params(("email" = String, Path, description = "Owner email")),
    responses((status = 200, description = "Mood samples for the owner", body = MoodsResponse))
)]
pub async fn moods_by_owner_handler(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let moods = state
        .journal
        .moods_by_owner(&email)
        .await
        .map_err(|e| port_error("fetch mood logs", e))?;

    Ok(Json(MoodsResponse {
        moods: moods.into_iter().map(MoodView::from).collect(),
    }))
}

//=========================================================================================
// Activity Log Handlers
//=========================================================================================

/// Record one timed wellness-activity event.
#[utoipa::path(
    post,
    path = "/api/activity-log",
    request_body = LogActivityRequest,
    responses(
        (status = 200, description = "Activity logged", body = StatusResponse),
        (status = 400, description = "Missing fields or non-positive duration")
    )
)]
pub async fn log_activity_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LogActivityRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .journal
        .log_activity(&req.email, &req.activity, req.duration)
        .await
        .map_err(|e| port_error("log activity", e))?;

    Ok(Json(StatusResponse {
        success: true,
        message: "Activity logged".to_string(),
    }))
}

/// Per-activity minute totals for one owner.
#[utoipa::path(
    get,
    path = "/api/activity-summary/{email}",
    params(("email" = String, Path, description = "Owner email")),
    responses((status = 200, description = "Minutes per activity", body = ActivitySummaryResponse))
)]
pub async fn activity_summary_handler(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let summary = state
        .journal
        .activity_summary(&email)
        .await
        .map_err(|e| port_error("summarize activity", e))?;

    Ok(Json(ActivitySummaryResponse {
        success: true,
        activities: summary
            .into_iter()
            .map(|t| ActivityTotalView {
                name: t.activity,
                minutes: t.minutes,
            })
            .collect(),
    }))
}

//=========================================================================================
// Profile and Admin Handlers
//=========================================================================================

/// Fetch one user's profile (never includes the password hash).
#[utoipa::path(
    get,
    path = "/api/profile/{email}",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "The profile", body = UserView),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_profile_handler(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let user = state
        .store
        .get_user_by_email(&email)
        .await
        .map_err(|e| port_error("fetch profile", e))?;
    Ok(Json(UserView::from(user)))
}

/// Update profile fields and mark the profile complete.
#[utoipa::path(
    post,
    path = "/api/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = StatusResponse),
        (status = 400, description = "Email is required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_profile_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.email.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Email is required".to_string()));
    }

    state
        .store
        .update_profile(
            &req.email,
            req.name.as_deref(),
            req.dob.as_deref(),
            req.location.as_deref(),
            req.bio.as_deref(),
        )
        .await
        .map_err(|e| port_error("update profile", e))?;

    Ok(Json(StatusResponse {
        success: true,
        message: "Profile updated successfully".to_string(),
    }))
}

/// List all registered users (admin view; password hashes excluded).
#[utoipa::path(
    get,
    path = "/api/users",
    responses((status = 200, description = "All users", body = UsersResponse))
)]
pub async fn list_users_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let users = state
        .store
        .list_users()
        .await
        .map_err(|e| port_error("list users", e))?;

    Ok(Json(UsersResponse {
        success: true,
        users: users.into_iter().map(UserView::from).collect(),
    }))
}

//=========================================================================================
// Quiz Catalog Handlers
//=========================================================================================

#[utoipa::path(
    get,
    path = "/api/quiz",
    responses((status = 200, description = "All quiz questions", body = QuizzesResponse))
)]
pub async fn list_quiz_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let questions = state
        .store
        .list_quiz_questions()
        .await
        .map_err(|e| port_error("list quiz questions", e))?;

    Ok(Json(QuizzesResponse {
        success: true,
        questions: questions.into_iter().map(QuizView::from).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/quiz",
    request_body = QuizPayload,
    responses((status = 201, description = "Quiz question created", body = QuizView))
)]
pub async fn create_quiz_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QuizPayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let question = QuizQuestion {
        id: Uuid::new_v4(),
        question: req.question,
        options: req.options,
        answer: req.answer,
        category: req.category,
        difficulty: req.difficulty,
    };
    state
        .store
        .create_quiz_question(&question)
        .await
        .map_err(|e| port_error("create quiz question", e))?;

    Ok((StatusCode::CREATED, Json(QuizView::from(question))))
}

#[utoipa::path(
    put,
    path = "/api/quiz/{id}",
    params(("id" = Uuid, Path, description = "Quiz question id")),
    request_body = QuizPayload,
    responses(
        (status = 200, description = "Quiz question updated", body = StatusResponse),
        (status = 404, description = "Quiz question not found")
    )
)]
pub async fn update_quiz_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<QuizPayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let question = QuizQuestion {
        id,
        question: req.question,
        options: req.options,
        answer: req.answer,
        category: req.category,
        difficulty: req.difficulty,
    };
    state
        .store
        .update_quiz_question(&question)
        .await
        .map_err(|e| port_error("update quiz question", e))?;

    Ok(Json(StatusResponse {
        success: true,
        message: "Quiz updated".to_string(),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/quiz/{id}",
    params(("id" = Uuid, Path, description = "Quiz question id")),
    responses(
        (status = 200, description = "Quiz question deleted", body = StatusResponse),
        (status = 404, description = "Quiz question not found")
    )
)]
pub async fn delete_quiz_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .store
        .delete_quiz_question(id)
        .await
        .map_err(|e| port_error("delete quiz question", e))?;

    Ok(Json(StatusResponse {
        success: true,
        message: "Quiz deleted".to_string(),
    }))
}

//=========================================================================================
// Music Catalog Handlers
//=========================================================================================

#[utoipa::path(
    get,
    path = "/api/music",
    responses((status = 200, description = "All music tracks", body = MusicListResponse))
)]
pub async fn list_music_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let tracks = state
        .store
        .list_music_tracks()
        .await
        .map_err(|e| port_error("list music tracks", e))?;

    Ok(Json(MusicListResponse {
        success: true,
        music: tracks.into_iter().map(MusicView::from).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/music",
    request_body = MusicPayload,
    responses((status = 201, description = "Music track created", body = MusicView))
)]
pub async fn create_music_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MusicPayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let track = MusicTrack {
        id: Uuid::new_v4(),
        title: req.title,
        description: req.description,
        duration: req.duration,
        url: req.url,
        category: req.category,
    };
    state
        .store
        .create_music_track(&track)
        .await
        .map_err(|e| port_error("create music track", e))?;

    Ok((StatusCode::CREATED, Json(MusicView::from(track))))
}

#[utoipa::path(
    put,
    path = "/api/music/{id}",
    params(("id" = Uuid, Path, description = "Music track id")),
    request_body = MusicPayload,
    responses(
        (status = 200, description = "Music track updated", body = StatusResponse),
        (status = 404, description = "Music track not found")
    )
)]
pub async fn update_music_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<MusicPayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let track = MusicTrack {
        id,
        title: req.title,
        description: req.description,
        duration: req.duration,
        url: req.url,
        category: req.category,
    };
    state
        .store
        .update_music_track(&track)
        .await
        .map_err(|e| port_error("update music track", e))?;

    Ok(Json(StatusResponse {
        success: true,
        message: "Track updated".to_string(),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/music/{id}",
    params(("id" = Uuid, Path, description = "Music track id")),
    responses(
        (status = 200, description = "Music track deleted", body = StatusResponse),
        (status = 404, description = "Music track not found")
    )
)]
pub async fn delete_music_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .store
        .delete_music_track(id)
        .await
        .map_err(|e| port_error("delete music track", e))?;

    Ok(Json(StatusResponse {
        success: true,
        message: "Track deleted".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_aliases_normalize_to_one_shape() {
        let req: LogMessageRequest = serde_json::from_str(
            r#"{"userEmail": "amy@example.com", "sender": "user",
                "message": "hi", "sessionId": "s-1"}"#,
        )
        .unwrap();
        assert_eq!(req.email, "amy@example.com");
        assert_eq!(req.session_id, "s-1");
        assert!(req.timestamp.is_none());
    }

    #[test]
    fn unrecognized_payload_keys_are_rejected() {
        let result = serde_json::from_str::<LogMoodRequest>(
            r#"{"email": "amy@example.com", "session_id": "s", "mood": 5, "vibe": "off"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn port_errors_map_to_the_http_taxonomy() {
        let (code, _) = port_error("x", PortError::Validation("missing".into()));
        assert_eq!(code, StatusCode::BAD_REQUEST);
        let (code, _) = port_error("x", PortError::NotFound("gone".into()));
        assert_eq!(code, StatusCode::NOT_FOUND);
        let (code, _) = port_error("x", PortError::Unauthorized);
        assert_eq!(code, StatusCode::UNAUTHORIZED);
        let (code, _) = port_error("x", PortError::Storage("down".into()));
        assert_eq!(code, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
