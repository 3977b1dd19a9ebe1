//! crates/auracare_core/src/journal.rs
//!
//! The session/mood-logging service. Ties a chat session to its stream of
//! timestamped messages and mood samples, derives the coarse emotion label,
//! and computes per-user activity summaries.
//!
//! The `Journal` owns no state of its own; every operation is a bounded round
//! trip through the `WellnessStore` port. Writes validate first, then ensure
//! the session exists, then append. Ensure-session plus append are two
//! independent idempotent steps, not a transaction: a crash in between leaves
//! a session with no messages, which the next write simply finds already
//! present.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::domain::{
    ActivityEvent, ActivityTotal, ChatMessage, ChatSession, Emotion, MoodSample, Sender,
};
use crate::ports::{PortError, PortResult, WellnessStore};

/// Rejects a missing or blank required field.
fn require(field: &'static str, value: &str) -> PortResult<()> {
    if value.trim().is_empty() {
        Err(PortError::Validation(format!(
            "missing required field: {field}"
        )))
    } else {
        Ok(())
    }
}

/// Parses a `YYYY-MM-DD` calendar day into the UTC half-open range
/// `[00:00:00, next day 00:00:00)`.
fn day_range(date: &str) -> PortResult<(DateTime<Utc>, DateTime<Utc>)> {
    let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| PortError::Validation(format!("invalid date format: {date:?}")))?;
    let start = day.and_time(NaiveTime::MIN).and_utc();
    Ok((start, start + Duration::days(1)))
}

/// The append-side and read-side API over the session, message, mood, and
/// activity logs.
#[derive(Clone)]
pub struct Journal {
    store: Arc<dyn WellnessStore>,
}

impl Journal {
    pub fn new(store: Arc<dyn WellnessStore>) -> Self {
        Self { store }
    }

    // --- Message Log ---

    /// Appends one chat turn. The session is created on first reference;
    /// validation failures produce no side effects at all.
    pub async fn append_message(
        &self,
        owner_email: &str,
        session_id: &str,
        sender: Sender,
        body: &str,
        timestamp: Option<DateTime<Utc>>,
    ) -> PortResult<ChatMessage> {
        require("email", owner_email)?;
        require("session_id", session_id)?;
        require("message", body)?;

        let timestamp = timestamp.unwrap_or_else(Utc::now);
        self.store
            .ensure_session(session_id, owner_email, timestamp)
            .await?;

        let message = ChatMessage {
            id: Uuid::new_v4(),
            owner_email: owner_email.to_string(),
            session_id: session_id.to_string(),
            sender,
            body: body.to_string(),
            timestamp,
        };
        self.store.insert_message(&message).await?;
        Ok(message)
    }

    /// All messages of one session, ascending by timestamp.
    pub async fn session_messages(
        &self,
        owner_email: &str,
        session_id: &str,
    ) -> PortResult<Vec<ChatMessage>> {
        require("email", owner_email)?;
        require("session_id", session_id)?;
        self.store
            .messages_for_session(owner_email, session_id)
            .await
    }

    /// Every message of one owner whose timestamp falls on the given
    /// `YYYY-MM-DD` calendar day (UTC), ascending by timestamp.
    pub async fn messages_on_date(
        &self,
        owner_email: &str,
        date: &str,
    ) -> PortResult<Vec<ChatMessage>> {
        require("email", owner_email)?;
        require("date", date)?;
        let (start, end) = day_range(date)?;
        self.store.messages_in_range(owner_email, start, end).await
    }

    // --- Session Registry ---

    pub async fn sessions_for(&self, owner_email: &str) -> PortResult<Vec<ChatSession>> {
        require("email", owner_email)?;
        self.store.list_sessions(owner_email).await
    }

    // --- Mood Log ---

    /// Records one mood sample with its derived emotion label. The session
    /// is created on first reference, exactly as for messages.
    pub async fn log_mood(
        &self,
        owner_email: &str,
        session_id: &str,
        mood: i32,
        source: Option<&str>,
        timestamp: Option<DateTime<Utc>>,
    ) -> PortResult<MoodSample> {
        require("email", owner_email)?;
        require("session_id", session_id)?;

        let timestamp = timestamp.unwrap_or_else(Utc::now);
        self.store
            .ensure_session(session_id, owner_email, timestamp)
            .await?;

        let sample = MoodSample {
            id: Uuid::new_v4(),
            owner_email: owner_email.to_string(),
            session_id: session_id.to_string(),
            mood,
            emotion: Emotion::from_score(mood),
            source: source.map(str::to_string),
            timestamp,
        };
        self.store.insert_mood(&sample).await?;
        Ok(sample)
    }

    pub async fn moods_by_session(&self, session_id: &str) -> PortResult<Vec<MoodSample>> {
        require("session_id", session_id)?;
        self.store.moods_by_session(session_id).await
    }

    pub async fn moods_by_owner(&self, owner_email: &str) -> PortResult<Vec<MoodSample>> {
        require("email", owner_email)?;
        self.store.moods_by_owner(owner_email).await
    }

    // --- Activity Log ---

    pub async fn log_activity(
        &self,
        owner_email: &str,
        activity: &str,
        duration_seconds: i64,
    ) -> PortResult<ActivityEvent> {
        require("email", owner_email)?;
        require("activity", activity)?;
        if duration_seconds <= 0 {
            return Err(PortError::Validation(format!(
                "duration must be a positive number of seconds, got {duration_seconds}"
            )));
        }

        let event = ActivityEvent {
            id: Uuid::new_v4(),
            owner_email: owner_email.to_string(),
            activity: activity.to_string(),
            duration_seconds,
            timestamp: Utc::now(),
        };
        self.store.insert_activity(&event).await?;
        Ok(event)
    }

    /// Per-activity totals for one owner, converted to minutes rounded
    /// half-up to one decimal. Activity names are grouped literally; the
    /// store does the summation, this layer only converts units.
    pub async fn activity_summary(&self, owner_email: &str) -> PortResult<Vec<ActivityTotal>> {
        require("email", owner_email)?;
        let totals = self.store.activity_totals(owner_email).await?;
        Ok(totals
            .into_iter()
            .map(|(activity, seconds)| ActivityTotal::from_seconds(activity, seconds))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::domain::{AuthSession, MusicTrack, QuizQuestion, User, UserCredentials};

    /// In-memory store that records writes, for exercising the Journal's
    /// validation and orchestration without a database.
    #[derive(Default)]
    struct MemStore {
        sessions: Mutex<Vec<ChatSession>>,
        messages: Mutex<Vec<ChatMessage>>,
        moods: Mutex<Vec<MoodSample>>,
        activities: Mutex<Vec<ActivityEvent>>,
    }

    #[async_trait]
    impl WellnessStore for MemStore {
        async fn create_user(
            &self,
            _: &str,
            _: &str,
            _: &str,
            _: Option<&str>,
        ) -> PortResult<User> {
            unimplemented!()
        }
        async fn get_user_by_email(&self, _: &str) -> PortResult<User> {
            unimplemented!()
        }
        async fn get_credentials_by_email(&self, _: &str) -> PortResult<UserCredentials> {
            unimplemented!()
        }
        async fn update_profile(
            &self,
            _: &str,
            _: Option<&str>,
            _: Option<&str>,
            _: Option<&str>,
            _: Option<&str>,
        ) -> PortResult<()> {
            unimplemented!()
        }
        async fn list_users(&self) -> PortResult<Vec<User>> {
            unimplemented!()
        }
        async fn create_auth_session(
            &self,
            _: &str,
            _: Uuid,
            _: DateTime<Utc>,
        ) -> PortResult<()> {
            unimplemented!()
        }
        async fn validate_auth_session(&self, _: &str) -> PortResult<AuthSession> {
            unimplemented!()
        }
        async fn delete_auth_session(&self, _: &str) -> PortResult<()> {
            unimplemented!()
        }

        async fn ensure_session(
            &self,
            session_id: &str,
            owner_email: &str,
            observed_at: DateTime<Utc>,
        ) -> PortResult<()> {
            let mut sessions = self.sessions.lock().unwrap();
            if !sessions.iter().any(|s| s.session_id == session_id) {
                sessions.push(ChatSession {
                    session_id: session_id.to_string(),
                    owner_email: owner_email.to_string(),
                    created_at: observed_at,
                });
            }
            Ok(())
        }

        async fn list_sessions(&self, owner_email: &str) -> PortResult<Vec<ChatSession>> {
            Ok(self
                .sessions
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.owner_email == owner_email)
                .cloned()
                .collect())
        }

        async fn insert_message(&self, message: &ChatMessage) -> PortResult<()> {
            self.messages.lock().unwrap().push(message.clone());
            Ok(())
        }

        async fn messages_for_session(
            &self,
            owner_email: &str,
            session_id: &str,
        ) -> PortResult<Vec<ChatMessage>> {
            let mut out: Vec<ChatMessage> = self
                .messages
                .lock()
                .unwrap()
                .iter()
                .filter(|m| m.owner_email == owner_email && m.session_id == session_id)
                .cloned()
                .collect();
            out.sort_by_key(|m| m.timestamp);
            Ok(out)
        }

        async fn messages_in_range(
            &self,
            owner_email: &str,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> PortResult<Vec<ChatMessage>> {
            let mut out: Vec<ChatMessage> = self
                .messages
                .lock()
                .unwrap()
                .iter()
                .filter(|m| {
                    m.owner_email == owner_email && m.timestamp >= start && m.timestamp < end
                })
                .cloned()
                .collect();
            out.sort_by_key(|m| m.timestamp);
            Ok(out)
        }

        async fn insert_mood(&self, sample: &MoodSample) -> PortResult<()> {
            self.moods.lock().unwrap().push(sample.clone());
            Ok(())
        }

        async fn moods_by_session(&self, session_id: &str) -> PortResult<Vec<MoodSample>> {
            Ok(self
                .moods
                .lock()
                .unwrap()
                .iter()
                .filter(|m| m.session_id == session_id)
                .cloned()
                .collect())
        }

        async fn moods_by_owner(&self, owner_email: &str) -> PortResult<Vec<MoodSample>> {
            Ok(self
                .moods
                .lock()
                .unwrap()
                .iter()
                .filter(|m| m.owner_email == owner_email)
                .cloned()
                .collect())
        }

        async fn insert_activity(&self, event: &ActivityEvent) -> PortResult<()> {
            self.activities.lock().unwrap().push(event.clone());
            Ok(())
        }

        async fn activity_totals(&self, owner_email: &str) -> PortResult<Vec<(String, i64)>> {
            let mut totals: Vec<(String, i64)> = Vec::new();
            for event in self
                .activities
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.owner_email == owner_email)
            {
                match totals.iter_mut().find(|(name, _)| *name == event.activity) {
                    Some((_, total)) => *total += event.duration_seconds,
                    None => totals.push((event.activity.clone(), event.duration_seconds)),
                }
            }
            Ok(totals)
        }

        async fn list_quiz_questions(&self) -> PortResult<Vec<QuizQuestion>> {
            unimplemented!()
        }
        async fn create_quiz_question(&self, _: &QuizQuestion) -> PortResult<()> {
            unimplemented!()
        }
        async fn update_quiz_question(&self, _: &QuizQuestion) -> PortResult<()> {
            unimplemented!()
        }
        async fn delete_quiz_question(&self, _: Uuid) -> PortResult<()> {
            unimplemented!()
        }
        async fn list_music_tracks(&self) -> PortResult<Vec<MusicTrack>> {
            unimplemented!()
        }
        async fn create_music_track(&self, _: &MusicTrack) -> PortResult<()> {
            unimplemented!()
        }
        async fn update_music_track(&self, _: &MusicTrack) -> PortResult<()> {
            unimplemented!()
        }
        async fn delete_music_track(&self, _: Uuid) -> PortResult<()> {
            unimplemented!()
        }
    }

    fn journal() -> (Journal, Arc<MemStore>) {
        let store = Arc::new(MemStore::default());
        (Journal::new(store.clone()), store)
    }

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn append_message_creates_session_on_first_write() {
        let (journal, store) = journal();
        journal
            .append_message("amy@example.com", "sess-1", Sender::User, "hello", None)
            .await
            .unwrap();

        let sessions = store.sessions.lock().unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].owner_email, "amy@example.com");
    }

    #[tokio::test]
    async fn rejected_append_leaves_no_session_behind() {
        let (journal, store) = journal();
        let err = journal
            .append_message("amy@example.com", "sess-1", Sender::User, "   ", None)
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Validation(_)));

        assert!(store.sessions.lock().unwrap().is_empty());
        assert!(store.messages.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn messages_read_back_in_timestamp_order() {
        let (journal, _) = journal();
        let owner = "amy@example.com";
        let m1 = journal
            .append_message(owner, "s", Sender::User, "m1", Some(ts("2024-03-01T10:00:00Z")))
            .await
            .unwrap();
        let m2 = journal
            .append_message(owner, "s", Sender::Bot, "m2", Some(ts("2024-03-01T10:05:00Z")))
            .await
            .unwrap();
        let m3 = journal
            .append_message(owner, "s", Sender::User, "m3", Some(ts("2024-03-01T09:59:00Z")))
            .await
            .unwrap();

        let read = journal.session_messages(owner, "s").await.unwrap();
        let ids: Vec<Uuid> = read.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![m3.id, m1.id, m2.id]);
    }

    #[tokio::test]
    async fn date_query_uses_half_open_day_bucket() {
        let (journal, _) = journal();
        let owner = "amy@example.com";
        journal
            .append_message(owner, "s", Sender::User, "late", Some(ts("2024-03-01T23:59:59Z")))
            .await
            .unwrap();

        let on_first = journal.messages_on_date(owner, "2024-03-01").await.unwrap();
        assert_eq!(on_first.len(), 1);
        let on_second = journal.messages_on_date(owner, "2024-03-02").await.unwrap();
        assert!(on_second.is_empty());
    }

    #[tokio::test]
    async fn unparsable_date_is_a_validation_error() {
        let (journal, _) = journal();
        let err = journal
            .messages_on_date("amy@example.com", "03/01/2024")
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Validation(_)));
    }

    #[tokio::test]
    async fn log_mood_derives_and_persists_the_emotion() {
        let (journal, _) = journal();
        let sample = journal
            .log_mood("amy@example.com", "s", 2, Some("chat"), None)
            .await
            .unwrap();
        assert_eq!(sample.emotion, Emotion::Anxious);

        let by_session = journal.moods_by_session("s").await.unwrap();
        assert_eq!(by_session, vec![sample.clone()]);
        let by_owner = journal.moods_by_owner("amy@example.com").await.unwrap();
        assert_eq!(by_owner, vec![sample]);
    }

    #[tokio::test]
    async fn activity_summary_groups_and_converts_to_minutes() {
        let (journal, _) = journal();
        let owner = "amy@example.com";
        journal.log_activity(owner, "walking", 120).await.unwrap();
        journal.log_activity(owner, "walking", 180).await.unwrap();
        journal.log_activity(owner, "meditation", 300).await.unwrap();

        let mut summary = journal.activity_summary(owner).await.unwrap();
        summary.sort_by(|a, b| a.activity.cmp(&b.activity));
        assert_eq!(
            summary,
            vec![
                ActivityTotal { activity: "meditation".into(), minutes: 5.0 },
                ActivityTotal { activity: "walking".into(), minutes: 5.0 },
            ]
        );
    }

    #[tokio::test]
    async fn non_positive_durations_are_rejected() {
        let (journal, store) = journal();
        for bad in [0, -30] {
            let err = journal
                .log_activity("amy@example.com", "walking", bad)
                .await
                .unwrap_err();
            assert!(matches!(err, PortError::Validation(_)));
        }
        assert!(store.activities.lock().unwrap().is_empty());
    }
}
