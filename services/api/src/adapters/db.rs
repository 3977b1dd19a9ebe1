//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `WellnessStore` port from the `core` crate. It handles all interactions
//! with the SQLite database using `sqlx`.
//!
//! Every id is stored as a TEXT UUID and every timestamp as fixed-width
//! RFC 3339 UTC text, so lexicographic ordering in SQL matches chronological
//! ordering. The log-shaped tables are insert-only; session creation relies
//! on SQLite's atomic `ON CONFLICT DO NOTHING`.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

use auracare_core::domain::{
    ActivityEvent, AuthSession, ChatMessage, ChatSession, Emotion, MoodSample, MusicTrack,
    QuizQuestion, Sender, User, UserCredentials,
};
use auracare_core::ports::{PortError, PortResult, WellnessStore};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `WellnessStore` port.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

fn storage_err(e: sqlx::Error) -> PortError {
    PortError::Storage(e.to_string())
}

/// Fixed-width RFC 3339 UTC (`2024-03-01T23:59:59.000000Z`).
fn fmt_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_ts(s: &str) -> PortResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| PortError::Unexpected(format!("stored timestamp {s:?} is invalid: {e}")))
}

fn parse_id(s: &str) -> PortResult<Uuid> {
    Uuid::parse_str(s)
        .map_err(|e| PortError::Unexpected(format!("stored id {s:?} is invalid: {e}")))
}

impl SqliteStore {
    /// Opens (creating if missing) the database at `database_url` and brings
    /// the schema up to date.
    pub async fn new(database_url: &str) -> PortResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| PortError::Storage(format!("invalid database URL: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(storage_err)?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// An isolated in-memory database, used by tests.
    pub async fn new_in_memory() -> PortResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| PortError::Storage(format!("invalid database URL: {e}")))?
            .foreign_keys(true);

        // One connection keeps the in-memory database alive for the pool's
        // lifetime.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(storage_err)?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> PortResult<()> {
        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS users (
                user_id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                avatar TEXT,
                dob TEXT,
                location TEXT,
                bio TEXT,
                is_profile_complete INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS auth_sessions (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(user_id),
                expires_at TEXT NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS chat_sessions (
                session_id TEXT PRIMARY KEY,
                owner_email TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                id TEXT PRIMARY KEY,
                owner_email TEXT NOT NULL,
                session_id TEXT NOT NULL,
                sender TEXT NOT NULL,
                body TEXT NOT NULL,
                timestamp TEXT NOT NULL
            )
            "#,
            r#"
            CREATE INDEX IF NOT EXISTS idx_messages_owner_session_ts
            ON messages(owner_email, session_id, timestamp)
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS mood_samples (
                id TEXT PRIMARY KEY,
                owner_email TEXT NOT NULL,
                session_id TEXT NOT NULL,
                mood INTEGER NOT NULL,
                emotion TEXT NOT NULL,
                source TEXT,
                timestamp TEXT NOT NULL
            )
            "#,
            r#"
            CREATE INDEX IF NOT EXISTS idx_mood_samples_session
            ON mood_samples(session_id)
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS activity_events (
                id TEXT PRIMARY KEY,
                owner_email TEXT NOT NULL,
                activity TEXT NOT NULL,
                duration_seconds INTEGER NOT NULL,
                timestamp TEXT NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS quiz_questions (
                id TEXT PRIMARY KEY,
                question TEXT NOT NULL,
                options TEXT NOT NULL,
                answer TEXT NOT NULL,
                category TEXT,
                difficulty TEXT
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS music_tracks (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT,
                duration TEXT,
                url TEXT NOT NULL,
                category TEXT
            )
            "#,
        ];
        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(storage_err)?;
        }
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    user_id: String,
    name: String,
    email: String,
    avatar: Option<String>,
    dob: Option<String>,
    location: Option<String>,
    bio: Option<String>,
    is_profile_complete: i64,
}

impl UserRecord {
    fn to_domain(self) -> PortResult<User> {
        Ok(User {
            user_id: parse_id(&self.user_id)?,
            name: self.name,
            email: self.email,
            avatar: self.avatar,
            dob: self.dob,
            location: self.location,
            bio: self.bio,
            is_profile_complete: self.is_profile_complete != 0,
        })
    }
}

#[derive(FromRow)]
struct SessionRecord {
    session_id: String,
    owner_email: String,
    created_at: String,
}

impl SessionRecord {
    fn to_domain(self) -> PortResult<ChatSession> {
        Ok(ChatSession {
            session_id: self.session_id,
            owner_email: self.owner_email,
            created_at: parse_ts(&self.created_at)?,
        })
    }
}

#[derive(FromRow)]
struct MessageRecord {
    id: String,
    owner_email: String,
    session_id: String,
    sender: String,
    body: String,
    timestamp: String,
}

impl MessageRecord {
    fn to_domain(self) -> PortResult<ChatMessage> {
        let sender = Sender::parse(&self.sender).ok_or_else(|| {
            PortError::Unexpected(format!("stored sender {:?} is invalid", self.sender))
        })?;
        Ok(ChatMessage {
            id: parse_id(&self.id)?,
            owner_email: self.owner_email,
            session_id: self.session_id,
            sender,
            body: self.body,
            timestamp: parse_ts(&self.timestamp)?,
        })
    }
}

#[derive(FromRow)]
struct MoodRecord {
    id: String,
    owner_email: String,
    session_id: String,
    mood: i64,
    emotion: String,
    source: Option<String>,
    timestamp: String,
}

impl MoodRecord {
    fn to_domain(self) -> PortResult<MoodSample> {
        let emotion = Emotion::parse(&self.emotion).ok_or_else(|| {
            PortError::Unexpected(format!("stored emotion {:?} is invalid", self.emotion))
        })?;
        Ok(MoodSample {
            id: parse_id(&self.id)?,
            owner_email: self.owner_email,
            session_id: self.session_id,
            mood: self.mood as i32,
            emotion,
            source: self.source,
            timestamp: parse_ts(&self.timestamp)?,
        })
    }
}

#[derive(FromRow)]
struct QuizRecord {
    id: String,
    question: String,
    options: String,
    answer: String,
    category: Option<String>,
    difficulty: Option<String>,
}

impl QuizRecord {
    fn to_domain(self) -> PortResult<QuizQuestion> {
        let options: Vec<String> = serde_json::from_str(&self.options).map_err(|e| {
            PortError::Unexpected(format!("stored quiz options are invalid: {e}"))
        })?;
        Ok(QuizQuestion {
            id: parse_id(&self.id)?,
            question: self.question,
            options,
            answer: self.answer,
            category: self.category,
            difficulty: self.difficulty,
        })
    }
}

#[derive(FromRow)]
struct MusicRecord {
    id: String,
    title: String,
    description: Option<String>,
    duration: Option<String>,
    url: String,
    category: Option<String>,
}

impl MusicRecord {
    fn to_domain(self) -> PortResult<MusicTrack> {
        Ok(MusicTrack {
            id: parse_id(&self.id)?,
            title: self.title,
            description: self.description,
            duration: self.duration,
            url: self.url,
            category: self.category,
        })
    }
}

//=========================================================================================
// `WellnessStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl WellnessStore for SqliteStore {
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        hashed_password: &str,
        avatar: Option<&str>,
    ) -> PortResult<User> {
        let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = ?1")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(storage_err)?;
        if existing > 0 {
            return Err(PortError::Conflict(format!("email {email} already exists")));
        }

        let user_id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO users (user_id, name, email, password_hash, avatar, is_profile_complete, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
        )
        .bind(user_id.to_string())
        .bind(name)
        .bind(email)
        .bind(hashed_password)
        .bind(avatar)
        .bind(fmt_ts(Utc::now()))
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(User {
            user_id,
            name: name.to_string(),
            email: email.to_string(),
            avatar: avatar.map(str::to_string),
            dob: None,
            location: None,
            bio: None,
            is_profile_complete: false,
        })
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT user_id, name, email, avatar, dob, location, bio, is_profile_complete
             FROM users WHERE email = ?1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("User {email} not found")),
            _ => storage_err(e),
        })?;
        record.to_domain()
    }

    async fn get_credentials_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let (user_id, password_hash) = sqlx::query_as::<_, (String, String)>(
            "SELECT user_id, password_hash FROM users WHERE email = ?1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("User {email} not found")),
            _ => storage_err(e),
        })?;
        Ok(UserCredentials {
            user_id: parse_id(&user_id)?,
            email: email.to_string(),
            hashed_password: password_hash,
        })
    }

    async fn update_profile(
        &self,
        email: &str,
        name: Option<&str>,
        dob: Option<&str>,
        location: Option<&str>,
        bio: Option<&str>,
    ) -> PortResult<()> {
        let result = sqlx::query(
            "UPDATE users SET
                name = COALESCE(?2, name),
                dob = COALESCE(?3, dob),
                location = COALESCE(?4, location),
                bio = COALESCE(?5, bio),
                is_profile_complete = 1
             WHERE email = ?1",
        )
        .bind(email)
        .bind(name)
        .bind(dob)
        .bind(location)
        .bind(bio)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("User {email} not found")));
        }
        Ok(())
    }

    async fn list_users(&self) -> PortResult<Vec<User>> {
        let records = sqlx::query_as::<_, UserRecord>(
            "SELECT user_id, name, email, avatar, dob, location, bio, is_profile_complete
             FROM users",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;
        records.into_iter().map(UserRecord::to_domain).collect()
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES (?1, ?2, ?3)")
            .bind(session_id)
            .bind(user_id.to_string())
            .bind(fmt_ts(expires_at))
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<AuthSession> {
        let row = sqlx::query_as::<_, (String, String)>(
            "SELECT user_id, expires_at FROM auth_sessions WHERE id = ?1",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        let (user_id, expires_at) = row.ok_or(PortError::Unauthorized)?;
        let expires_at = parse_ts(&expires_at)?;
        if expires_at < Utc::now() {
            return Err(PortError::Unauthorized);
        }
        Ok(AuthSession {
            id: session_id.to_string(),
            user_id: parse_id(&user_id)?,
            expires_at,
        })
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = ?1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(())
    }

    async fn ensure_session(
        &self,
        session_id: &str,
        owner_email: &str,
        observed_at: DateTime<Utc>,
    ) -> PortResult<()> {
        // First writer wins; the conflict clause makes later calls no-ops
        // without any application-level locking.
        sqlx::query(
            "INSERT INTO chat_sessions (session_id, owner_email, created_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(session_id) DO NOTHING",
        )
        .bind(session_id)
        .bind(owner_email)
        .bind(fmt_ts(observed_at))
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }

    async fn list_sessions(&self, owner_email: &str) -> PortResult<Vec<ChatSession>> {
        let records = sqlx::query_as::<_, SessionRecord>(
            "SELECT session_id, owner_email, created_at FROM chat_sessions
             WHERE owner_email = ?1 ORDER BY created_at ASC",
        )
        .bind(owner_email)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;
        records.into_iter().map(SessionRecord::to_domain).collect()
    }

    async fn insert_message(&self, message: &ChatMessage) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO messages (id, owner_email, session_id, sender, body, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(message.id.to_string())
        .bind(&message.owner_email)
        .bind(&message.session_id)
        .bind(message.sender.as_str())
        .bind(&message.body)
        .bind(fmt_ts(message.timestamp))
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }

    async fn messages_for_session(
        &self,
        owner_email: &str,
        session_id: &str,
    ) -> PortResult<Vec<ChatMessage>> {
        let records = sqlx::query_as::<_, MessageRecord>(
            "SELECT id, owner_email, session_id, sender, body, timestamp FROM messages
             WHERE owner_email = ?1 AND session_id = ?2 ORDER BY timestamp ASC",
        )
        .bind(owner_email)
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;
        records.into_iter().map(MessageRecord::to_domain).collect()
    }

    async fn messages_in_range(
        &self,
        owner_email: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> PortResult<Vec<ChatMessage>> {
        let records = sqlx::query_as::<_, MessageRecord>(
            "SELECT id, owner_email, session_id, sender, body, timestamp FROM messages
             WHERE owner_email = ?1 AND timestamp >= ?2 AND timestamp < ?3
             ORDER BY timestamp ASC",
        )
        .bind(owner_email)
        .bind(fmt_ts(start))
        .bind(fmt_ts(end))
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;
        records.into_iter().map(MessageRecord::to_domain).collect()
    }

    async fn insert_mood(&self, sample: &MoodSample) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO mood_samples (id, owner_email, session_id, mood, emotion, source, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(sample.id.to_string())
        .bind(&sample.owner_email)
        .bind(&sample.session_id)
        .bind(sample.mood as i64)
        .bind(sample.emotion.as_str())
        .bind(&sample.source)
        .bind(fmt_ts(sample.timestamp))
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }

    async fn moods_by_session(&self, session_id: &str) -> PortResult<Vec<MoodSample>> {
        let records = sqlx::query_as::<_, MoodRecord>(
            "SELECT id, owner_email, session_id, mood, emotion, source, timestamp
             FROM mood_samples WHERE session_id = ?1 ORDER BY timestamp ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;
        records.into_iter().map(MoodRecord::to_domain).collect()
    }

    async fn moods_by_owner(&self, owner_email: &str) -> PortResult<Vec<MoodSample>> {
        let records = sqlx::query_as::<_, MoodRecord>(
            "SELECT id, owner_email, session_id, mood, emotion, source, timestamp
             FROM mood_samples WHERE owner_email = ?1 ORDER BY timestamp ASC",
        )
        .bind(owner_email)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;
        records.into_iter().map(MoodRecord::to_domain).collect()
    }

    async fn insert_activity(&self, event: &ActivityEvent) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO activity_events (id, owner_email, activity, duration_seconds, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(event.id.to_string())
        .bind(&event.owner_email)
        .bind(&event.activity)
        .bind(event.duration_seconds)
        .bind(fmt_ts(event.timestamp))
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }

    async fn activity_totals(&self, owner_email: &str) -> PortResult<Vec<(String, i64)>> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT activity, SUM(duration_seconds) FROM activity_events
             WHERE owner_email = ?1 GROUP BY activity",
        )
        .bind(owner_email)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(rows)
    }

    async fn list_quiz_questions(&self) -> PortResult<Vec<QuizQuestion>> {
        let records = sqlx::query_as::<_, QuizRecord>(
            "SELECT id, question, options, answer, category, difficulty FROM quiz_questions",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;
        records.into_iter().map(QuizRecord::to_domain).collect()
    }

    async fn create_quiz_question(&self, question: &QuizQuestion) -> PortResult<()> {
        let options = serde_json::to_string(&question.options)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        sqlx::query(
            "INSERT INTO quiz_questions (id, question, options, answer, category, difficulty)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(question.id.to_string())
        .bind(&question.question)
        .bind(options)
        .bind(&question.answer)
        .bind(&question.category)
        .bind(&question.difficulty)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }

    async fn update_quiz_question(&self, question: &QuizQuestion) -> PortResult<()> {
        let options = serde_json::to_string(&question.options)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        let result = sqlx::query(
            "UPDATE quiz_questions
             SET question = ?2, options = ?3, answer = ?4, category = ?5, difficulty = ?6
             WHERE id = ?1",
        )
        .bind(question.id.to_string())
        .bind(&question.question)
        .bind(options)
        .bind(&question.answer)
        .bind(&question.category)
        .bind(&question.difficulty)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Quiz {} not found", question.id)));
        }
        Ok(())
    }

    async fn delete_quiz_question(&self, id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM quiz_questions WHERE id = ?1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Quiz {id} not found")));
        }
        Ok(())
    }

    async fn list_music_tracks(&self) -> PortResult<Vec<MusicTrack>> {
        let records = sqlx::query_as::<_, MusicRecord>(
            "SELECT id, title, description, duration, url, category FROM music_tracks",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;
        records.into_iter().map(MusicRecord::to_domain).collect()
    }

    async fn create_music_track(&self, track: &MusicTrack) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO music_tracks (id, title, description, duration, url, category)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(track.id.to_string())
        .bind(&track.title)
        .bind(&track.description)
        .bind(&track.duration)
        .bind(&track.url)
        .bind(&track.category)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }

    async fn update_music_track(&self, track: &MusicTrack) -> PortResult<()> {
        let result = sqlx::query(
            "UPDATE music_tracks
             SET title = ?2, description = ?3, duration = ?4, url = ?5, category = ?6
             WHERE id = ?1",
        )
        .bind(track.id.to_string())
        .bind(&track.title)
        .bind(&track.description)
        .bind(&track.duration)
        .bind(&track.url)
        .bind(&track.category)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Track {} not found", track.id)));
        }
        Ok(())
    }

    async fn delete_music_track(&self, id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM music_tracks WHERE id = ?1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Track {id} not found")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn message(owner: &str, session: &str, body: &str, timestamp: DateTime<Utc>) -> ChatMessage {
        ChatMessage {
            id: Uuid::new_v4(),
            owner_email: owner.to_string(),
            session_id: session.to_string(),
            sender: Sender::User,
            body: body.to_string(),
            timestamp,
        }
    }

    #[tokio::test]
    async fn ensure_session_is_first_writer_wins() {
        let store = SqliteStore::new_in_memory().await.unwrap();
        let first_seen = ts("2024-03-01T10:00:00Z");

        store
            .ensure_session("sess-1", "amy@example.com", first_seen)
            .await
            .unwrap();
        // A later writer with a different owner and timestamp changes nothing.
        store
            .ensure_session("sess-1", "mallory@example.com", ts("2024-04-01T00:00:00Z"))
            .await
            .unwrap();

        let sessions = store.list_sessions("amy@example.com").await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].session_id, "sess-1");
        assert_eq!(sessions[0].created_at, first_seen);
        assert!(store
            .list_sessions("mallory@example.com")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn session_messages_come_back_in_timestamp_order() {
        let store = SqliteStore::new_in_memory().await.unwrap();
        let owner = "amy@example.com";
        let m1 = message(owner, "s", "m1", ts("2024-03-01T10:00:00Z"));
        let m2 = message(owner, "s", "m2", ts("2024-03-01T10:05:00Z"));
        let m3 = message(owner, "s", "m3", ts("2024-03-01T09:59:00Z"));
        for m in [&m1, &m2, &m3] {
            store.insert_message(m).await.unwrap();
        }

        let read = store.messages_for_session(owner, "s").await.unwrap();
        let bodies: Vec<&str> = read.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["m3", "m1", "m2"]);
    }

    #[tokio::test]
    async fn range_query_is_half_open_on_the_end_bound() {
        let store = SqliteStore::new_in_memory().await.unwrap();
        let owner = "amy@example.com";
        store
            .insert_message(&message(owner, "s", "late", ts("2024-03-01T23:59:59Z")))
            .await
            .unwrap();
        store
            .insert_message(&message(owner, "s", "next day", ts("2024-03-02T00:00:00Z")))
            .await
            .unwrap();

        let first = store
            .messages_in_range(owner, ts("2024-03-01T00:00:00Z"), ts("2024-03-02T00:00:00Z"))
            .await
            .unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].body, "late");

        let second = store
            .messages_in_range(owner, ts("2024-03-02T00:00:00Z"), ts("2024-03-03T00:00:00Z"))
            .await
            .unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].body, "next day");
    }

    #[tokio::test]
    async fn mood_samples_round_trip_through_both_queries() {
        let store = SqliteStore::new_in_memory().await.unwrap();
        let sample = MoodSample {
            id: Uuid::new_v4(),
            owner_email: "amy@example.com".to_string(),
            session_id: "sess-1".to_string(),
            mood: 8,
            emotion: Emotion::Happy,
            source: Some("chat".to_string()),
            timestamp: ts("2024-03-01T12:00:00Z"),
        };
        store.insert_mood(&sample).await.unwrap();

        let by_session = store.moods_by_session("sess-1").await.unwrap();
        assert_eq!(by_session, vec![sample.clone()]);
        let by_owner = store.moods_by_owner("amy@example.com").await.unwrap();
        assert_eq!(by_owner, vec![sample]);
    }

    #[tokio::test]
    async fn activity_totals_group_by_literal_name() {
        let store = SqliteStore::new_in_memory().await.unwrap();
        let owner = "amy@example.com";
        for (activity, seconds) in [("walking", 120), ("walking", 180), ("meditation", 300)] {
            store
                .insert_activity(&ActivityEvent {
                    id: Uuid::new_v4(),
                    owner_email: owner.to_string(),
                    activity: activity.to_string(),
                    duration_seconds: seconds,
                    timestamp: Utc::now(),
                })
                .await
                .unwrap();
        }

        let mut totals = store.activity_totals(owner).await.unwrap();
        totals.sort();
        assert_eq!(
            totals,
            vec![("meditation".to_string(), 300), ("walking".to_string(), 120 + 180)]
        );
        assert!(store
            .activity_totals("other@example.com")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn duplicate_signup_email_is_a_conflict() {
        let store = SqliteStore::new_in_memory().await.unwrap();
        store
            .create_user("Amy", "amy@example.com", "hash", None)
            .await
            .unwrap();
        let err = store
            .create_user("Amy Again", "amy@example.com", "hash2", None)
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Conflict(_)));
    }

    #[tokio::test]
    async fn expired_auth_sessions_are_rejected() {
        let store = SqliteStore::new_in_memory().await.unwrap();
        let user = store
            .create_user("Amy", "amy@example.com", "hash", None)
            .await
            .unwrap();

        store
            .create_auth_session("live", user.user_id, Utc::now() + chrono::Duration::days(30))
            .await
            .unwrap();
        store
            .create_auth_session("stale", user.user_id, Utc::now() - chrono::Duration::hours(1))
            .await
            .unwrap();

        let live = store.validate_auth_session("live").await.unwrap();
        assert_eq!(live.user_id, user.user_id);
        assert_eq!(live.id, "live");
        assert!(matches!(
            store.validate_auth_session("stale").await.unwrap_err(),
            PortError::Unauthorized
        ));
        assert!(matches!(
            store.validate_auth_session("missing").await.unwrap_err(),
            PortError::Unauthorized
        ));
    }

    #[tokio::test]
    async fn quiz_crud_round_trips() {
        let store = SqliteStore::new_in_memory().await.unwrap();
        let mut q = QuizQuestion {
            id: Uuid::new_v4(),
            question: "How do you feel today?".to_string(),
            options: vec!["Calm".to_string(), "Tense".to_string()],
            answer: "Calm".to_string(),
            category: Some("relaxation".to_string()),
            difficulty: None,
        };
        store.create_quiz_question(&q).await.unwrap();

        q.answer = "Tense".to_string();
        store.update_quiz_question(&q).await.unwrap();

        let listed = store.list_quiz_questions().await.unwrap();
        assert_eq!(listed, vec![q.clone()]);

        store.delete_quiz_question(q.id).await.unwrap();
        assert!(store.list_quiz_questions().await.unwrap().is_empty());
        assert!(matches!(
            store.delete_quiz_question(q.id).await.unwrap_err(),
            PortError::NotFound(_)
        ));
    }
}
