//! crates/auracare_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    ActivityEvent, AuthSession, ChatMessage, ChatSession, Classification, MoodSample, MusicTrack,
    QuizQuestion, User, UserCredentials,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// A required field was missing, empty, or malformed. Surfaced to the
    /// caller as a 4xx outcome and never retried.
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    /// The record already exists where a new one was required (e.g. signup
    /// with a taken email).
    #[error("Conflict: {0}")]
    Conflict(String),
    /// The underlying persistence layer was unavailable or rejected the
    /// operation. Surfaced as a 5xx outcome; retry policy belongs to the
    /// caller, not this subsystem.
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The persistence port for every record kind the backend owns.
///
/// All log-shaped tables (sessions, messages, mood samples, activity events)
/// are insert-only; nothing in this trait mutates or deletes them. The
/// implementation must provide atomic "insert" and atomic "insert if absent"
/// primitives; no application-level locking is layered on top.
#[async_trait]
pub trait WellnessStore: Send + Sync {
    // --- Accounts and Auth ---
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        hashed_password: &str,
        avatar: Option<&str>,
    ) -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<User>;

    async fn get_credentials_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    async fn update_profile(
        &self,
        email: &str,
        name: Option<&str>,
        dob: Option<&str>,
        location: Option<&str>,
        bio: Option<&str>,
    ) -> PortResult<()>;

    async fn list_users(&self) -> PortResult<Vec<User>>;

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    /// Returns the live session for `session_id`, or `Unauthorized` when it
    /// is missing or expired.
    async fn validate_auth_session(&self, session_id: &str) -> PortResult<AuthSession>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;

    // --- Session Registry ---

    /// Inserts the session if and only if `session_id` is unseen. First
    /// writer wins; later calls with a different owner or timestamp are
    /// no-ops. Safe to call concurrently for the same id.
    async fn ensure_session(
        &self,
        session_id: &str,
        owner_email: &str,
        observed_at: DateTime<Utc>,
    ) -> PortResult<()>;

    async fn list_sessions(&self, owner_email: &str) -> PortResult<Vec<ChatSession>>;

    // --- Message Log ---
    async fn insert_message(&self, message: &ChatMessage) -> PortResult<()>;

    /// Messages for one session, ascending by timestamp.
    async fn messages_for_session(
        &self,
        owner_email: &str,
        session_id: &str,
    ) -> PortResult<Vec<ChatMessage>>;

    /// Messages with timestamp in `[start, end)`, ascending by timestamp.
    async fn messages_in_range(
        &self,
        owner_email: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> PortResult<Vec<ChatMessage>>;

    // --- Mood Log ---
    async fn insert_mood(&self, sample: &MoodSample) -> PortResult<()>;

    async fn moods_by_session(&self, session_id: &str) -> PortResult<Vec<MoodSample>>;

    async fn moods_by_owner(&self, owner_email: &str) -> PortResult<Vec<MoodSample>>;

    // --- Activity Log ---
    async fn insert_activity(&self, event: &ActivityEvent) -> PortResult<()>;

    /// Total seconds per literal activity name for one owner. Unordered.
    async fn activity_totals(&self, owner_email: &str) -> PortResult<Vec<(String, i64)>>;

    // --- Quiz Catalog ---
    async fn list_quiz_questions(&self) -> PortResult<Vec<QuizQuestion>>;

    async fn create_quiz_question(&self, question: &QuizQuestion) -> PortResult<()>;

    async fn update_quiz_question(&self, question: &QuizQuestion) -> PortResult<()>;

    async fn delete_quiz_question(&self, id: Uuid) -> PortResult<()>;

    // --- Music Catalog ---
    async fn list_music_tracks(&self) -> PortResult<Vec<MusicTrack>>;

    async fn create_music_track(&self, track: &MusicTrack) -> PortResult<()>;

    async fn update_music_track(&self, track: &MusicTrack) -> PortResult<()>;

    async fn delete_music_track(&self, id: Uuid) -> PortResult<()>;
}

/// The externally hosted text-generation service: prompt in, text out,
/// may fail (timeout, non-2xx, malformed body).
#[async_trait]
pub trait ReplyService: Send + Sync {
    async fn generate_reply(&self, prompt: &str) -> PortResult<String>;
}

/// The external language/sentiment classifier: text in,
/// {language tag, sentiment score} out.
#[async_trait]
pub trait SentimentService: Send + Sync {
    async fn classify(&self, text: &str) -> PortResult<Classification>;
}
