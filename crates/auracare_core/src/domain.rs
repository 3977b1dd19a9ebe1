//! crates/auracare_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a chat conversation, identified by an opaque, externally
/// supplied id and scoped to one owning user.
///
/// A session is created implicitly by the first message or mood sample that
/// references an unseen id. Its owner and creation time are fixed at first
/// observation and never change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSession {
    pub session_id: String,
    pub owner_email: String,
    pub created_at: DateTime<Utc>,
}

/// Which side of the conversation produced a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }

    pub fn parse(s: &str) -> Option<Sender> {
        match s {
            "user" => Some(Sender::User),
            "bot" => Some(Sender::Bot),
            _ => None,
        }
    }
}

/// A single chat turn, bound to a session and a user. Immutable once written.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: Uuid,
    pub owner_email: String,
    pub session_id: String,
    pub sender: Sender,
    pub body: String,
    pub timestamp: DateTime<Utc>,
}

/// A coarse emotional label derived from a numeric mood score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Emotion {
    Happy,
    Neutral,
    Sad,
    Anxious,
}

impl Emotion {
    /// Buckets a 0-10 mood score into a coarse label.
    ///
    /// Total for every integer input: anything below 3, including negative
    /// values, lands in the lowest bucket. Thresholds are inclusive lower
    /// bounds, evaluated highest-first.
    pub fn from_score(mood: i32) -> Emotion {
        if mood >= 8 {
            Emotion::Happy
        } else if mood >= 5 {
            Emotion::Neutral
        } else if mood >= 3 {
            Emotion::Sad
        } else {
            Emotion::Anxious
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Happy => "Happy",
            Emotion::Neutral => "Neutral",
            Emotion::Sad => "Sad",
            Emotion::Anxious => "Anxious",
        }
    }

    pub fn parse(s: &str) -> Option<Emotion> {
        match s {
            "Happy" => Some(Emotion::Happy),
            "Neutral" => Some(Emotion::Neutral),
            "Sad" => Some(Emotion::Sad),
            "Anxious" => Some(Emotion::Anxious),
            _ => None,
        }
    }
}

/// A single numeric self-report or inferred reading of a user's emotional
/// state, plus the label derived from it. The label is stored alongside the
/// raw score (denormalized) so consumers never re-derive it on read.
#[derive(Debug, Clone, PartialEq)]
pub struct MoodSample {
    pub id: Uuid,
    pub owner_email: String,
    pub session_id: String,
    pub mood: i32,
    pub emotion: Emotion,
    pub source: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// A timed occurrence of a wellness activity (a game, a breathing exercise,
/// a music listen) attributable to a user. Immutable once written.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEvent {
    pub id: Uuid,
    pub owner_email: String,
    pub activity: String,
    pub duration_seconds: i64,
    pub timestamp: DateTime<Utc>,
}

/// One row of the per-user activity summary: total time spent in one
/// activity, in minutes rounded half-up to one decimal place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityTotal {
    pub activity: String,
    pub minutes: f64,
}

impl ActivityTotal {
    pub fn from_seconds(activity: String, total_seconds: i64) -> ActivityTotal {
        // round() is half-away-from-zero, which is half-up for the
        // non-negative durations validation lets through.
        let minutes = (total_seconds as f64 / 60.0 * 10.0).round() / 10.0;
        ActivityTotal { activity, minutes }
    }
}

const TAMIL_LETTERS: &str = "அஆஇஈஉஊஎஏஐஒஓஔகஙசஜஞடணதநனபமயரலவழளறஹஶ";

/// Detects Tanglish: Tamil script mixed with another alphabet in the same
/// text. Pure Tamil (letters plus combining signs, which are not alphabetic)
/// does not qualify, nor does text with no Tamil letters at all.
pub fn is_tanglish(text: &str) -> bool {
    let has_tamil = text.chars().any(|c| TAMIL_LETTERS.contains(c));
    has_tamil
        && text
            .chars()
            .any(|c| c.is_alphabetic() && !TAMIL_LETTERS.contains(c))
}

/// The output of the external language/sentiment classifier for one piece of
/// user text: an ISO-639 language tag plus a VADER-style compound score in
/// [-1.0, 1.0].
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub language: String,
    pub compound: f64,
}

impl Classification {
    /// Scales the compound score from [-1, 1] onto the 0-10 mood scale used
    /// by the mood log, truncating toward zero the way the original chat
    /// pipeline did.
    pub fn mood_score(&self) -> i32 {
        ((self.compound + 1.0) * 5.0) as i32
    }

    /// A long, strongly negative message: more than 80 characters after
    /// trimming, with a compound score below -0.5. Such a turn gets a fixed
    /// calming suggestion instead of a generated reply.
    pub fn signals_distress(&self, text: &str) -> bool {
        text.trim().chars().count() > 80 && self.compound < -0.5
    }
}

// Represents a user - used throughout app
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub dob: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub is_profile_complete: bool,
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub email: String,
    pub hashed_password: String,
}

// Represents a browser login session (auth cookie)
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub id: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// A quiz catalog entry. Plain record storage, no derived logic.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizQuestion {
    pub id: Uuid,
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    pub category: Option<String>,
    pub difficulty: Option<String>,
}

/// A music catalog entry. Plain record storage, no derived logic.
#[derive(Debug, Clone, PartialEq)]
pub struct MusicTrack {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub url: String,
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emotion_buckets_match_thresholds() {
        assert_eq!(Emotion::from_score(10), Emotion::Happy);
        assert_eq!(Emotion::from_score(9), Emotion::Happy);
        assert_eq!(Emotion::from_score(8), Emotion::Happy);
        assert_eq!(Emotion::from_score(7), Emotion::Neutral);
        assert_eq!(Emotion::from_score(5), Emotion::Neutral);
        assert_eq!(Emotion::from_score(4), Emotion::Sad);
        assert_eq!(Emotion::from_score(3), Emotion::Sad);
        assert_eq!(Emotion::from_score(2), Emotion::Anxious);
        assert_eq!(Emotion::from_score(0), Emotion::Anxious);
        assert_eq!(Emotion::from_score(-1), Emotion::Anxious);
    }

    #[test]
    fn emotion_is_monotonic_over_scores() {
        fn rank(e: Emotion) -> u8 {
            match e {
                Emotion::Anxious => 0,
                Emotion::Sad => 1,
                Emotion::Neutral => 2,
                Emotion::Happy => 3,
            }
        }
        for m in -5..15 {
            assert!(rank(Emotion::from_score(m)) <= rank(Emotion::from_score(m + 1)));
        }
    }

    #[test]
    fn emotion_labels_round_trip() {
        for e in [Emotion::Happy, Emotion::Neutral, Emotion::Sad, Emotion::Anxious] {
            assert_eq!(Emotion::parse(e.as_str()), Some(e));
        }
        assert_eq!(Emotion::parse("Ecstatic"), None);
    }

    #[test]
    fn activity_totals_round_half_up_to_one_decimal() {
        let t = ActivityTotal::from_seconds("walking".into(), 300);
        assert_eq!(t.minutes, 5.0);
        // 141 s = 2.35 min, half rounds up
        let t = ActivityTotal::from_seconds("walking".into(), 141);
        assert_eq!(t.minutes, 2.4);
        let t = ActivityTotal::from_seconds("breathing".into(), 80);
        assert_eq!(t.minutes, 1.3);
    }

    #[test]
    fn tanglish_needs_tamil_script_mixed_with_another_alphabet() {
        assert!(is_tanglish("என்ன da, romba tired ah irukku"));
        // Pure Tamil: letters plus combining signs only.
        assert!(!is_tanglish("வணக்கம் நண்பா"));
        assert!(!is_tanglish("just plain english"));
        assert!(!is_tanglish(""));
    }

    #[test]
    fn distress_needs_both_length_and_a_strongly_negative_score() {
        let long_text = "a".repeat(81);
        let short_text = "feeling bad";
        let negative = Classification { language: "en".into(), compound: -0.8 };
        let mild = Classification { language: "en".into(), compound: -0.5 };

        assert!(negative.signals_distress(&long_text));
        assert!(!negative.signals_distress(short_text));
        // -0.5 is the exclusive boundary.
        assert!(!mild.signals_distress(&long_text));
        // Trailing whitespace does not count toward the length.
        let padded = format!("{}{}", "a".repeat(80), " ".repeat(10));
        assert!(!negative.signals_distress(&padded));
    }

    #[test]
    fn compound_score_scales_to_mood_range() {
        assert_eq!(Classification { language: "en".into(), compound: 1.0 }.mood_score(), 10);
        assert_eq!(Classification { language: "en".into(), compound: 0.0 }.mood_score(), 5);
        assert_eq!(Classification { language: "en".into(), compound: -1.0 }.mood_score(), 0);
        assert_eq!(Classification { language: "en".into(), compound: -0.52 }.mood_score(), 2);
    }
}
