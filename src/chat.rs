use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::interaction_log::InteractionLogger;
use crate::responder::{MatchType, ResponseBundle, ResponseSelector, UNKNOWN_INTENT};

pub const EMPTY_INPUT_REPLY: &str = "Tshwarelo, ha ke a utlwa letho. Ka kopo, bua hape.";
pub const TOO_LONG_REPLY: &str = "Molaetsa wa hao o molelele haholo. Ka kopo, o kgutsufatse.";
pub const ERROR_REPLY: &str = "Ho na le bothata. Ka kopo, leka hape.";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReplyMetadata {
    pub match_type: MatchType,
    pub intent: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english: Option<String>,
}

/// What the chat endpoint sends back.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub response: String,
    pub metadata: ReplyMetadata,
}

impl ChatReply {
    fn canned(text: &str, match_type: MatchType) -> Self {
        Self {
            response: text.to_string(),
            metadata: ReplyMetadata {
                match_type,
                intent: UNKNOWN_INTENT.to_string(),
                confidence: 0.0,
                english: None,
            },
        }
    }

    pub fn empty() -> Self {
        Self::canned(EMPTY_INPUT_REPLY, MatchType::Empty)
    }

    pub fn too_long() -> Self {
        Self::canned(TOO_LONG_REPLY, MatchType::Rejected)
    }

    pub fn error() -> Self {
        Self::canned(ERROR_REPLY, MatchType::Error)
    }
}

impl From<ResponseBundle> for ChatReply {
    fn from(bundle: ResponseBundle) -> Self {
        Self {
            response: bundle.response,
            metadata: ReplyMetadata {
                match_type: bundle.match_type,
                intent: bundle.intent,
                confidence: bundle.confidence,
                english: Some(bundle.english),
            },
        }
    }
}

/// Input checks in front of the selector, plus the interaction log.
pub struct ChatService {
    selector: ResponseSelector,
    logger: InteractionLogger,
    max_input_chars: usize,
}

impl ChatService {
    pub fn new(selector: ResponseSelector, logger: InteractionLogger, max_input_chars: usize) -> Self {
        Self {
            selector,
            logger,
            max_input_chars,
        }
    }

    pub fn reply(&self, message: Option<&str>) -> ChatReply {
        self.reply_with_id(Uuid::new_v4(), message)
    }

    pub fn reply_with_id(&self, id: Uuid, message: Option<&str>) -> ChatReply {
        let message = match message {
            Some(m) if !m.trim().is_empty() => m,
            _ => return ChatReply::empty(),
        };
        if message.chars().count() > self.max_input_chars {
            log::info!("[{}] rejected input of {} chars", id, message.chars().count());
            return ChatReply::too_long();
        }

        let bundle = self.selector.generate_response(message);
        log::info!(
            "[{}] {} intent={} confidence={:.2}",
            id,
            bundle.match_type.as_str(),
            bundle.intent,
            bundle.confidence
        );
        self.logger.log(id, message, &bundle);
        bundle.into()
    }

    /// Stops the interaction log writer after flushing queued records.
    pub fn shutdown(self) {
        self.logger.close();
    }
}
