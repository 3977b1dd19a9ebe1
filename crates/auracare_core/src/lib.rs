pub mod domain;
pub mod journal;
pub mod ports;

pub use domain::{
    ActivityEvent, ActivityTotal, AuthSession, ChatMessage, ChatSession, Classification, Emotion,
    MoodSample, MusicTrack, QuizQuestion, Sender, User, UserCredentials,
};
pub use journal::Journal;
pub use ports::{PortError, PortResult, ReplyService, SentimentService, WellnessStore};
