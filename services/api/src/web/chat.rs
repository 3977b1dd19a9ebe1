//! services/api/src/web/chat.rs
//!
//! Orchestrates one chat turn: classify the user's text, log the inferred
//! mood, ask the text-generation service for an empathetic reply, and append
//! both sides of the exchange to the message log.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use utoipa::ToSchema;

use auracare_core::domain::{is_tanglish, Sender};

use crate::web::rest::port_error;
use crate::web::state::AppState;

/// Shown when the text-generation service is unreachable or rejects the call.
const FALLBACK_REPLY: &str =
    "Sorry, I'm having trouble responding right now. Please try again soon.";

/// Shown instead of a generated reply when the message signals distress;
/// points at the in-app calming activities.
const CALMING_REPLY: &str = "You seem really down. Want to try something calming? \
     You could play a game, listen to some music, or take a quiz.";

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ChatRequest {
    #[serde(alias = "userEmail")]
    pub email: String,
    #[serde(alias = "sessionId")]
    pub session_id: String,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct ChatResponse {
    pub success: bool,
    pub reply: String,
    pub session_id: String,
}

//=========================================================================================
// Prompt Construction
//=========================================================================================

/// Styles the empathetic-friend prompt by detected language. Tamil gets a
/// Tamil instruction, Tamil script mixed with another alphabet a Tanglish
/// one, everything else English; either way the reply is asked to stay
/// short.
fn build_prompt(language: &str, message: &str) -> String {
    if language == "ta" {
        format!(
            "நீங்கள் ஒரு அன்பான நண்பர். கீழே உள்ள செய்திக்கு மிக எளிமையாகவும், \
             மென்மையாகவும் தமிழில் 2 அல்லது 3 வரிகளில் பதிலளிக்கவும்:\n\n{message}"
        )
    } else if is_tanglish(message) {
        format!(
            "You are a warm friend. Reply casually in Tanglish (Tamil + English \
             mix), in 2 or 3 short lines:\n\n{message}"
        )
    } else {
        format!(
            "You're a kind and supportive friend. Respond in English in just \
             2 or 3 short lines:\n\n{message}"
        )
    }
}

//=========================================================================================
// Handler
//=========================================================================================

/// Process one chat turn.
///
/// The mood sample is logged as a side effect of the classification,
/// independent of whether the reply generation succeeds. A distressed turn
/// (long, strongly negative) gets a fixed calming suggestion without
/// consulting the generation service; a generation failure degrades to a
/// fixed apology rather than an error.
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Bot reply for the turn", body = ChatResponse),
        (status = 400, description = "Missing required fields")
    )
)]
pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // 1. Log the user's turn (creates the session on first write). A
    //    validation failure stops the whole turn here, with no side effects.
    state
        .journal
        .append_message(&req.email, &req.session_id, Sender::User, &req.message, None)
        .await
        .map_err(|e| port_error("log chat message", e))?;

    // 2. Classify the text. On success, log the inferred mood; a classifier
    //    or mood-log failure never fails the turn.
    let classification = match state.classifier_adapter.classify(&req.message).await {
        Ok(classification) => {
            let mood = classification.mood_score();
            if let Err(e) = state
                .journal
                .log_mood(&req.email, &req.session_id, mood, Some("chat"), None)
                .await
            {
                warn!("Failed to log inferred mood: {:?}", e);
            }
            Some(classification)
        }
        Err(e) => {
            warn!("Classifier unavailable, skipping mood log: {:?}", e);
            None
        }
    };

    // 3. A distress signal skips the generation round trip entirely and
    //    offers the calming activities instead. Otherwise generate the
    //    reply, degrading to a fixed apology on failure.
    let distressed = classification
        .as_ref()
        .is_some_and(|c| c.signals_distress(&req.message));
    let reply = if distressed {
        CALMING_REPLY.to_string()
    } else {
        let language = classification
            .map(|c| c.language)
            .unwrap_or_else(|| "en".to_string());
        let prompt = build_prompt(&language, &req.message);
        match state.reply_adapter.generate_reply(&prompt).await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => FALLBACK_REPLY.to_string(),
            Err(e) => {
                warn!("Reply generation failed: {:?}", e);
                FALLBACK_REPLY.to_string()
            }
        }
    };

    // 4. Log the bot's turn.
    state
        .journal
        .append_message(&req.email, &req.session_id, Sender::Bot, &reply, None)
        .await
        .map_err(|e| port_error("log bot reply", e))?;

    Ok(Json(ChatResponse {
        success: true,
        reply,
        session_id: req.session_id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    use auracare_core::domain::Classification;
    use auracare_core::ports::{PortError, PortResult, ReplyService, SentimentService};

    use crate::adapters::db::SqliteStore;
    use crate::config::Config;

    #[test]
    fn tamil_text_gets_a_tamil_prompt() {
        let prompt = build_prompt("ta", "வணக்கம்");
        assert!(prompt.contains("வணக்கம்"));
        assert!(prompt.contains("தமிழில்"));
    }

    #[test]
    fn mixed_script_text_gets_a_tanglish_prompt() {
        let prompt = build_prompt("en", "என்ன da, romba tired ah irukku");
        assert!(prompt.contains("Tanglish"));
    }

    #[test]
    fn other_languages_fall_back_to_english() {
        for lang in ["en", "fr", "unknown"] {
            let prompt = build_prompt(lang, "rough day");
            assert!(prompt.contains("rough day"));
            assert!(prompt.starts_with("You're a kind and supportive friend"));
        }
    }

    struct FixedClassifier(Classification);

    #[async_trait]
    impl SentimentService for FixedClassifier {
        async fn classify(&self, _text: &str) -> PortResult<Classification> {
            Ok(self.0.clone())
        }
    }

    struct DownReplyService {
        called: AtomicBool,
    }

    impl DownReplyService {
        fn new() -> Self {
            Self {
                called: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl ReplyService for DownReplyService {
        async fn generate_reply(&self, _prompt: &str) -> PortResult<String> {
            self.called.store(true, Ordering::SeqCst);
            Err(PortError::Unexpected("connection refused".to_string()))
        }
    }

    fn test_config() -> Config {
        Config {
            bind_address: "127.0.0.1:0".parse().unwrap(),
            database_url: "sqlite::memory:".to_string(),
            log_level: tracing::Level::INFO,
            cors_origin: "http://localhost:3000".to_string(),
            llm_base_url: "http://localhost:11434".to_string(),
            llm_model: "llama3".to_string(),
            llm_temperature: 0.6,
            llm_num_predict: 150,
            llm_timeout_secs: 1,
            classifier_url: "http://localhost:8500".to_string(),
        }
    }

    async fn state_with(
        compound: f64,
        reply_adapter: Arc<DownReplyService>,
    ) -> Arc<AppState> {
        let store = Arc::new(SqliteStore::new_in_memory().await.unwrap());
        Arc::new(AppState::new(
            store,
            Arc::new(test_config()),
            reply_adapter,
            Arc::new(FixedClassifier(Classification {
                language: "en".to_string(),
                compound,
            })),
        ))
    }

    #[tokio::test]
    async fn mood_is_logged_even_when_reply_generation_fails() {
        let reply_adapter = Arc::new(DownReplyService::new());
        let state = state_with(-0.9, reply_adapter.clone()).await;

        let result = chat_handler(
            State(state.clone()),
            Json(ChatRequest {
                email: "amy@example.com".to_string(),
                session_id: "sess-1".to_string(),
                message: "rough day".to_string(),
            }),
        )
        .await;
        assert!(result.is_ok());
        assert!(reply_adapter.called.load(Ordering::SeqCst));

        // The inferred mood was persisted with source "chat"; -0.9 scales
        // to a mood of 0.
        let moods = state.journal.moods_by_session("sess-1").await.unwrap();
        assert_eq!(moods.len(), 1);
        assert_eq!(moods[0].mood, 0);
        assert_eq!(moods[0].source.as_deref(), Some("chat"));

        // Both turns were appended, the bot's being the fixed apology.
        let messages = state
            .journal
            .session_messages("amy@example.com", "sess-1")
            .await
            .unwrap();
        assert_eq!(messages.len(), 2);
        let bot = messages.iter().find(|m| m.sender == Sender::Bot).unwrap();
        assert_eq!(bot.body, FALLBACK_REPLY);
        assert!(messages.iter().any(|m| m.sender == Sender::User));
    }

    #[tokio::test]
    async fn distressed_turns_skip_generation_and_get_the_calming_reply() {
        let reply_adapter = Arc::new(DownReplyService::new());
        let state = state_with(-0.8, reply_adapter.clone()).await;

        let long_message = format!("i can't keep doing this. {}", "it never gets better. ".repeat(4));
        assert!(long_message.trim().chars().count() > 80);

        let result = chat_handler(
            State(state.clone()),
            Json(ChatRequest {
                email: "amy@example.com".to_string(),
                session_id: "sess-1".to_string(),
                message: long_message,
            }),
        )
        .await;
        assert!(result.is_ok());

        // The generation service was never consulted.
        assert!(!reply_adapter.called.load(Ordering::SeqCst));

        let messages = state
            .journal
            .session_messages("amy@example.com", "sess-1")
            .await
            .unwrap();
        let bot = messages.iter().find(|m| m.sender == Sender::Bot).unwrap();
        assert_eq!(bot.body, CALMING_REPLY);

        // The mood sample is still logged on this path.
        let moods = state.journal.moods_by_session("sess-1").await.unwrap();
        assert_eq!(moods.len(), 1);
    }
}
