//! Reply interpretation: structured JSON when possible, plain text otherwise

use serde_json::Value;

use crate::types::TaxReply;

/// Result of reading a response body
#[derive(Debug, Clone, PartialEq)]
pub enum Interpretation {
    /// Body was a complete structured reply
    Decoded(TaxReply),
    /// Anything else, kept verbatim
    Raw(String),
}

impl Interpretation {
    /// Text to show as the bot's reply
    pub fn into_reply(self) -> String {
        match self {
            Interpretation::Decoded(reply) => reply.summary(),
            Interpretation::Raw(text) => text,
        }
    }
}

/// Interpret a response body. Never fails: undecodable bodies are plain text.
pub fn interpret(body: &str) -> Interpretation {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => match TaxReply::from_json(&value) {
            Some(reply) => Interpretation::Decoded(reply),
            None => {
                tracing::debug!("reply has no usable taxAmount and classification, showing raw body");
                Interpretation::Raw(body.to_string())
            }
        },
        Err(e) => {
            tracing::debug!(error = %e, "reply is not structured, showing raw body");
            Interpretation::Raw(body.to_string())
        }
    }
}
