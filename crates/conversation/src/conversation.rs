//! The deck dialogue.

use std::sync::Arc;

use database::user::referral_code_for;
use database::{Database, NewUser};
use deck_core::{is_valid_page_count, DeckGenerator, ThemeCatalog};
use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::memory::{MemoryLedger, MemoryStateStore};
use crate::messages;
use crate::payload::ChoicePayload;
use crate::policy::{parse_referral_token, CREDITS_PER_DECK};
use crate::sender::ReplySink;
use crate::sqlite::{SqliteLedger, SqliteStateStore};
use crate::step::{Collected, ConversationState, Step};
use crate::store::{LedgerStore, StateStore};

/// Attachment name used unless overridden.
pub const DEFAULT_DECK_FILE_NAME: &str = "slayd.pptx";

/// Who sent a begin event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    pub user_id: i64,
    pub display_name: Option<String>,
    pub handle: Option<String>,
}

impl UserInfo {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            display_name: None,
            handle: None,
        }
    }
}

/// What handling one event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Welcome sent. `created` is true for a first-time user.
    Welcomed { created: bool },
    /// The dialogue moved to the given step.
    Advanced(Step),
    /// Start was refused for lack of credits.
    NoCredits,
    /// The event did not fit the current step; nothing changed.
    Ignored { reason: &'static str },
    /// A deck was generated and sent.
    Delivered { slide_count: u32 },
    /// A credit was spent but generation failed.
    GenerationFailed,
    /// The topic arrived but the balance was empty; the step was kept.
    DebitDeclined,
}

/// Drives each user through name, page count, theme and topic, then spends a
/// credit and delivers the generated deck.
///
/// Every handler reads the user's state from storage, so any number of
/// events may be handled concurrently.
pub struct Conversation<S: ReplySink> {
    ledger: Arc<dyn LedgerStore>,
    states: Arc<dyn StateStore>,
    generator: Arc<dyn DeckGenerator>,
    sink: S,
    themes: ThemeCatalog,
    deck_file_name: String,
}

impl<S: ReplySink> Conversation<S> {
    /// Create a conversation over the given stores.
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        states: Arc<dyn StateStore>,
        generator: Arc<dyn DeckGenerator>,
        sink: S,
    ) -> Self {
        Self {
            ledger,
            states,
            generator,
            sink,
            themes: ThemeCatalog::builtin(),
            deck_file_name: DEFAULT_DECK_FILE_NAME.to_string(),
        }
    }

    /// Create a conversation persisted in `database`.
    pub fn with_database(
        database: Database,
        generator: Arc<dyn DeckGenerator>,
        sink: S,
    ) -> Self {
        Self::new(
            Arc::new(SqliteLedger::new(database.clone())),
            Arc::new(SqliteStateStore::new(database)),
            generator,
            sink,
        )
    }

    /// Create a conversation that keeps everything in memory.
    pub fn in_memory(generator: Arc<dyn DeckGenerator>, sink: S) -> Self {
        Self::new(
            Arc::new(MemoryLedger::new()),
            Arc::new(MemoryStateStore::new()),
            generator,
            sink,
        )
    }

    /// Set the attachment name of delivered decks.
    pub fn with_deck_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.deck_file_name = file_name.into();
        self
    }

    pub fn ledger(&self) -> &Arc<dyn LedgerStore> {
        &self.ledger
    }

    pub fn states(&self) -> &Arc<dyn StateStore> {
        &self.states
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Handle `/start`, optionally carrying a referral token.
    ///
    /// Signs the user up on first contact, resets any dialogue in progress and
    /// sends the welcome with the start button.
    pub async fn handle_begin(&self, user: &UserInfo, referral: Option<&str>) -> Result<Outcome> {
        let mut referrer = referral.and_then(|token| parse_referral_token(token, user.user_id));
        if let Some(id) = referrer {
            if self.ledger.get(id).await?.is_none() {
                debug!("Referral token names unknown user {}", id);
                referrer = None;
            }
        }

        let new_user = NewUser {
            display_name: user.display_name.clone(),
            handle: user.handle.clone(),
            ..NewUser::new(user.user_id)
        }
        .referred_by(referrer);
        let created = self.ledger.create(&new_user).await?;
        if created {
            info!("New user {} (referrer: {:?})", user.user_id, referrer);
        }

        self.states.reset(user.user_id).await?;

        let (credits, referral_code) = match self.ledger.get(user.user_id).await? {
            Some(stored) => (stored.credits, stored.referral_code),
            None => (0, referral_code_for(user.user_id)),
        };
        self.sink
            .send_choices(
                user.user_id,
                &messages::welcome(credits, &referral_code),
                &messages::start_keyboard(),
            )
            .await?;

        Ok(Outcome::Welcomed { created })
    }

    /// Handle a button press.
    pub async fn handle_choice(&self, user_id: i64, raw: &str) -> Result<Outcome> {
        let Some(payload) = ChoicePayload::parse(raw) else {
            debug!("Ignoring malformed payload {:?} from {}", raw, user_id);
            return Ok(Outcome::Ignored {
                reason: "malformed payload",
            });
        };

        let state = self.states.get(user_id).await?;
        match (state.step, payload) {
            (Step::Idle, ChoicePayload::Start) => self.start(user_id).await,
            (Step::AwaitingPageCount, ChoicePayload::Pages(pages)) => {
                if !is_valid_page_count(pages) {
                    debug!("Ignoring page count {} from {}", pages, user_id);
                    return Ok(Outcome::Ignored {
                        reason: "page count out of range",
                    });
                }
                let collected = Collected {
                    pages: Some(pages),
                    ..state.collected
                };
                self.advance(user_id, Step::AwaitingTheme, collected).await?;
                self.sink
                    .send_choices(
                        user_id,
                        messages::ASK_THEME,
                        &messages::themes_keyboard(&self.themes),
                    )
                    .await?;
                Ok(Outcome::Advanced(Step::AwaitingTheme))
            }
            (Step::AwaitingTheme, ChoicePayload::Design(theme_id)) => {
                if !self.themes.contains(theme_id) {
                    debug!("Ignoring unknown theme {} from {}", theme_id, user_id);
                    return Ok(Outcome::Ignored {
                        reason: "unknown theme",
                    });
                }
                let collected = Collected {
                    theme_id: Some(theme_id),
                    ..state.collected
                };
                self.advance(user_id, Step::AwaitingTopic, collected).await?;
                self.sink.send_text(user_id, messages::ASK_TOPIC).await?;
                Ok(Outcome::Advanced(Step::AwaitingTopic))
            }
            (step, payload) => {
                debug!("Ignoring {} from {} at {}", payload, user_id, step);
                Ok(Outcome::Ignored {
                    reason: "choice does not match step",
                })
            }
        }
    }

    /// Handle a free-text message.
    pub async fn handle_text(&self, user_id: i64, text: &str) -> Result<Outcome> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Outcome::Ignored {
                reason: "empty text",
            });
        }
        if text.starts_with('/') {
            return Ok(Outcome::Ignored { reason: "command" });
        }

        let state = self.states.get(user_id).await?;
        if !state.step.expects_text() {
            debug!("Ignoring text from {} at {}", user_id, state.step);
            return Ok(Outcome::Ignored {
                reason: "text not expected",
            });
        }

        match state.step {
            Step::AwaitingName => {
                let collected = Collected {
                    full_name: Some(text.to_string()),
                    ..state.collected
                };
                self.advance(user_id, Step::AwaitingPageCount, collected)
                    .await?;
                self.sink
                    .send_choices(user_id, messages::ASK_PAGES, &messages::pages_keyboard())
                    .await?;
                Ok(Outcome::Advanced(Step::AwaitingPageCount))
            }
            _ => self.deliver(user_id, text).await,
        }
    }

    async fn start(&self, user_id: i64) -> Result<Outcome> {
        if self.ledger.credits(user_id).await? < CREDITS_PER_DECK {
            info!("User {} has no credits left", user_id);
            self.sink.send_text(user_id, messages::NO_CREDITS).await?;
            return Ok(Outcome::NoCredits);
        }

        self.advance(user_id, Step::AwaitingName, Collected::default())
            .await?;
        self.sink.send_text(user_id, messages::ASK_NAME).await?;
        Ok(Outcome::Advanced(Step::AwaitingName))
    }

    async fn advance(&self, user_id: i64, step: Step, collected: Collected) -> Result<()> {
        self.states
            .set(user_id, &ConversationState::new(step, collected))
            .await?;
        info!("User {} moved to {}", user_id, step);
        Ok(())
    }

    /// Hand a claimed topic step back to the user after a failed debit.
    async fn release_topic(&self, user_id: i64, collected: &Collected) {
        match self.states.release(user_id, Step::AwaitingTopic, collected).await {
            Ok(true) => debug!("Topic step restored for {}", user_id),
            Ok(false) => debug!("State of {} changed since the claim; not restored", user_id),
            Err(e) => error!("Failed to restore topic step for {}: {}", user_id, e),
        }
    }

    /// Spend a credit on the topic and send the deck.
    async fn deliver(&self, user_id: i64, topic: &str) -> Result<Outcome> {
        // Only one delivery of the topic may get past this point.
        let Some(collected) = self.states.claim(user_id, Step::AwaitingTopic).await? else {
            debug!("Topic from {} already claimed", user_id);
            return Ok(Outcome::Ignored {
                reason: "topic already claimed",
            });
        };

        let Some(spec) = collected.deck_spec(topic) else {
            warn!("Incomplete answers for {}: {:?}", user_id, collected);
            self.states.reset(user_id).await?;
            return Ok(Outcome::Ignored {
                reason: "incomplete answers",
            });
        };

        let debited = match self.ledger.debit_one(user_id).await {
            Ok(debited) => debited,
            Err(e) => {
                error!("Debit failed for {}: {}", user_id, e);
                self.release_topic(user_id, &collected).await;
                return Err(e);
            }
        };
        if !debited {
            info!("Debit declined for {}", user_id);
            self.release_topic(user_id, &collected).await;
            return Ok(Outcome::DebitDeclined);
        }

        if let Err(e) = self.states.reset(user_id).await {
            warn!("Failed to clear answers for {}: {}", user_id, e);
        }

        // The credit is spent; generation goes ahead even if this notice is lost.
        if let Err(e) = self.sink.send_text(user_id, messages::PREPARING).await {
            warn!("Failed to send progress notice to {}: {}", user_id, e);
        }

        match self.generator.generate(&spec).await {
            Ok(deck) => {
                info!(
                    "Delivering {}-slide deck to {} via {}",
                    deck.slide_count,
                    user_id,
                    self.generator.name()
                );
                self.sink
                    .send_document(
                        user_id,
                        &self.deck_file_name,
                        deck.bytes,
                        messages::DECK_CAPTION,
                    )
                    .await?;
                Ok(Outcome::Delivered {
                    slide_count: deck.slide_count,
                })
            }
            Err(e) => {
                error!("Deck generation failed for {}: {}", user_id, e);
                self.sink
                    .send_text(user_id, messages::GENERATION_FAILED)
                    .await?;
                Ok(Outcome::GenerationFailed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sender::{Choice, RecordingSink, Reply};
    use mock_deck::StaticGenerator;

    fn conversation() -> Conversation<RecordingSink> {
        Conversation::in_memory(Arc::new(StaticGenerator::new()), RecordingSink::new())
    }

    #[tokio::test]
    async fn test_begin_sends_welcome_with_start_button() {
        let conv = conversation();
        let outcome = conv.handle_begin(&UserInfo::new(1), None).await.unwrap();
        assert_eq!(outcome, Outcome::Welcomed { created: true });

        match conv.sink().last().await.unwrap() {
            Reply::Choices { text, rows, .. } => {
                assert!(text.contains("Kreditlar: 2"));
                assert!(text.contains("REF1"));
                assert_eq!(rows, vec![vec![Choice::new("📊 Slayd Yaratish", "start_creation")]]);
            }
            other => panic!("unexpected reply {:?}", other),
        }

        let again = conv.handle_begin(&UserInfo::new(1), None).await.unwrap();
        assert_eq!(again, Outcome::Welcomed { created: false });
    }

    #[tokio::test]
    async fn test_begin_resets_dialogue() {
        let conv = conversation();
        conv.handle_begin(&UserInfo::new(1), None).await.unwrap();
        conv.handle_choice(1, "start_creation").await.unwrap();
        conv.handle_text(1, "Ali").await.unwrap();

        conv.handle_begin(&UserInfo::new(1), None).await.unwrap();
        assert_eq!(conv.states().get(1).await.unwrap(), ConversationState::idle());
    }

    #[tokio::test]
    async fn test_legacy_start_payload() {
        let conv = conversation();
        conv.handle_begin(&UserInfo::new(1), None).await.unwrap();
        let outcome = conv.handle_choice(1, "create_slide").await.unwrap();
        assert_eq!(outcome, Outcome::Advanced(Step::AwaitingName));
    }

    #[tokio::test]
    async fn test_start_only_from_idle() {
        let conv = conversation();
        conv.handle_begin(&UserInfo::new(1), None).await.unwrap();
        conv.handle_choice(1, "start_creation").await.unwrap();
        conv.handle_text(1, "Ali").await.unwrap();

        let outcome = conv.handle_choice(1, "start_creation").await.unwrap();
        assert!(matches!(outcome, Outcome::Ignored { .. }));
        assert_eq!(conv.states().get(1).await.unwrap().step, Step::AwaitingPageCount);
    }

    #[tokio::test]
    async fn test_commands_are_not_answers() {
        let conv = conversation();
        conv.handle_begin(&UserInfo::new(1), None).await.unwrap();
        conv.handle_choice(1, "start_creation").await.unwrap();

        let outcome = conv.handle_text(1, "/help").await.unwrap();
        assert_eq!(outcome, Outcome::Ignored { reason: "command" });
        let outcome = conv.handle_text(1, "   ").await.unwrap();
        assert_eq!(outcome, Outcome::Ignored { reason: "empty text" });
        assert_eq!(conv.states().get(1).await.unwrap().step, Step::AwaitingName);
    }

    #[tokio::test]
    async fn test_name_is_trimmed() {
        let conv = conversation();
        conv.handle_begin(&UserInfo::new(1), None).await.unwrap();
        conv.handle_choice(1, "start_creation").await.unwrap();
        conv.handle_text(1, "  Ali Valiyev \n").await.unwrap();

        let state = conv.states().get(1).await.unwrap();
        assert_eq!(state.collected.full_name.as_deref(), Some("Ali Valiyev"));
    }

    #[tokio::test]
    async fn test_unknown_theme_is_ignored() {
        let conv = conversation();
        conv.handle_begin(&UserInfo::new(1), None).await.unwrap();
        conv.handle_choice(1, "start_creation").await.unwrap();
        conv.handle_text(1, "Ali").await.unwrap();
        conv.handle_choice(1, "pages_9").await.unwrap();

        let outcome = conv.handle_choice(1, "design_7").await.unwrap();
        assert_eq!(outcome, Outcome::Ignored { reason: "unknown theme" });
        assert_eq!(conv.states().get(1).await.unwrap().step, Step::AwaitingTheme);
    }

    #[tokio::test]
    async fn test_incomplete_answers_reset_without_debit() {
        let conv = conversation();
        conv.handle_begin(&UserInfo::new(1), None).await.unwrap();
        conv.states()
            .set(
                1,
                &ConversationState::new(Step::AwaitingTopic, Collected::default()),
            )
            .await
            .unwrap();

        let outcome = conv.handle_text(1, "Space").await.unwrap();
        assert_eq!(outcome, Outcome::Ignored { reason: "incomplete answers" });
        assert_eq!(conv.ledger().credits(1).await.unwrap(), 2);
        assert_eq!(conv.states().get(1).await.unwrap(), ConversationState::idle());
    }

    #[tokio::test]
    async fn test_custom_deck_file_name() {
        let conv = conversation().with_deck_file_name("deck.pptx");
        conv.handle_begin(&UserInfo::new(1), None).await.unwrap();
        conv.handle_choice(1, "start_creation").await.unwrap();
        conv.handle_text(1, "Ali").await.unwrap();
        conv.handle_choice(1, "pages_8").await.unwrap();
        conv.handle_choice(1, "design_1").await.unwrap();
        conv.handle_text(1, "Space").await.unwrap();

        match conv.sink().last().await.unwrap() {
            Reply::Document { file_name, .. } => assert_eq!(file_name, "deck.pptx"),
            other => panic!("unexpected reply {:?}", other),
        }
    }
}
