//! Conversation state machine and credit ledger for Slayd Bot.
//!
//! A user signs up with `/start` (optionally carrying a `REF<id>` referral
//! token), presses the start button, then answers four prompts in order:
//! name, page count, theme and topic. The topic answer spends one credit and
//! triggers deck generation.
//!
//! Storage sits behind [`LedgerStore`] and [`StateStore`]; replies go through
//! a [`ReplySink`]; decks come from any [`deck_core::DeckGenerator`].
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use conversation::{Conversation, LoggingSink, Outcome, UserInfo};
//! use pptx_deck::PptxGenerator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), conversation::ConversationError> {
//!     let conv = Conversation::in_memory(Arc::new(PptxGenerator::new()), LoggingSink);
//!
//!     conv.handle_begin(&UserInfo::new(1), None).await?;
//!     conv.handle_choice(1, "start_creation").await?;
//!     conv.handle_text(1, "Ali").await?;
//!     conv.handle_choice(1, "pages_10").await?;
//!     conv.handle_choice(1, "design_2").await?;
//!     let outcome = conv.handle_text(1, "Space").await?;
//!
//!     assert_eq!(outcome, Outcome::Delivered { slide_count: 10 });
//!     Ok(())
//! }
//! ```

mod conversation;
mod error;
mod memory;
pub mod messages;
mod payload;
pub mod policy;
mod sender;
mod sqlite;
mod step;
mod store;

pub use conversation::{Conversation, Outcome, UserInfo, DEFAULT_DECK_FILE_NAME};
pub use error::{ConversationError, Result};
pub use memory::{MemoryLedger, MemoryStateStore};
pub use payload::ChoicePayload;
pub use sender::{Choice, LoggingSink, NoOpSink, RecordingSink, Reply, ReplySink};
pub use sqlite::{SqliteLedger, SqliteStateStore};
pub use step::{Collected, ConversationState, Step};
pub use store::{LedgerStore, StateStore};
