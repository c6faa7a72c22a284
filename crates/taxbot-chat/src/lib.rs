//! taxbot-chat: Conversation runtime for the tax chatbot
//!
//! Holds the two-question capture state, decides what the bot says next,
//! and keeps the append-only message log the view renders.

pub mod conversation;
pub mod machine;
pub mod message;

pub use conversation::{Conversation, Submission};
pub use machine::{Context, ConversationState, Step, complete, parse_income, transition};
pub use message::{Message, MessageLog, Sender};
