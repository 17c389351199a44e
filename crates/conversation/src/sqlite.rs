//! SQLite-backed stores.

use async_trait::async_trait;
use database::conversation_state as state_store;
use database::user as user_store;
use database::{Database, NewUser, User};
use tracing::warn;

use crate::error::Result;
use crate::step::{Collected, ConversationState, Step};
use crate::store::{LedgerStore, StateStore};

/// Ledger backed by the `users` table.
#[derive(Debug, Clone)]
pub struct SqliteLedger {
    database: Database,
}

impl SqliteLedger {
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

#[async_trait]
impl LedgerStore for SqliteLedger {
    async fn get(&self, user_id: i64) -> Result<Option<User>> {
        Ok(user_store::get_user(self.database.pool(), user_id).await?)
    }

    async fn create(&self, user: &NewUser) -> Result<bool> {
        Ok(user_store::create_user(self.database.pool(), user).await?)
    }

    async fn credits(&self, user_id: i64) -> Result<i64> {
        Ok(user_store::get_credits(self.database.pool(), user_id).await?)
    }

    async fn debit_one(&self, user_id: i64) -> Result<bool> {
        Ok(user_store::debit_credit(self.database.pool(), user_id).await?)
    }
}

/// Conversation state backed by the `conversation_state` table.
#[derive(Debug, Clone)]
pub struct SqliteStateStore {
    database: Database,
}

impl SqliteStateStore {
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

fn decode_collected(user_id: i64, json: &str) -> Option<Collected> {
    match Collected::from_json(json) {
        Ok(collected) => Some(collected),
        Err(err) => {
            warn!("Unreadable collected data for {}: {}", user_id, err);
            None
        }
    }
}

#[async_trait]
impl StateStore for SqliteStateStore {
    async fn get(&self, user_id: i64) -> Result<ConversationState> {
        let Some(record) = state_store::get_state(self.database.pool(), user_id).await? else {
            return Ok(ConversationState::idle());
        };

        let Some(step) = Step::from_code(&record.step) else {
            warn!("Unknown step {:?} stored for {}", record.step, user_id);
            return Ok(ConversationState::idle());
        };

        match decode_collected(user_id, &record.collected) {
            Some(collected) => Ok(ConversationState::new(step, collected)),
            None => Ok(ConversationState::idle()),
        }
    }

    async fn set(&self, user_id: i64, state: &ConversationState) -> Result<()> {
        state_store::upsert_state(
            self.database.pool(),
            user_id,
            state.step.as_str(),
            &state.collected.to_json(),
        )
        .await?;
        Ok(())
    }

    async fn claim(&self, user_id: i64, step: Step) -> Result<Option<Collected>> {
        let claimed = state_store::claim_step(
            self.database.pool(),
            user_id,
            step.as_str(),
            Step::Idle.as_str(),
        )
        .await?;

        // A claimed row with unreadable answers still counts as claimed.
        Ok(claimed.map(|json| decode_collected(user_id, &json).unwrap_or_default()))
    }

    async fn release(&self, user_id: i64, step: Step, collected: &Collected) -> Result<bool> {
        let released = state_store::release_step(
            self.database.pool(),
            user_id,
            Step::Idle.as_str(),
            &collected.to_json(),
            step.as_str(),
        )
        .await?;
        Ok(released)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_state_defaults_to_idle() {
        let store = SqliteStateStore::new(test_db().await);
        assert_eq!(store.get(1).await.unwrap(), ConversationState::idle());
    }

    #[tokio::test]
    async fn test_state_survives_new_store_instance() {
        let db = test_db().await;
        let state = ConversationState::new(
            Step::AwaitingTheme,
            Collected {
                full_name: Some("Ali".to_string()),
                pages: Some(12),
                theme_id: None,
            },
        );
        SqliteStateStore::new(db.clone()).set(5, &state).await.unwrap();

        let reopened = SqliteStateStore::new(db);
        assert_eq!(reopened.get(5).await.unwrap(), state);
    }

    #[tokio::test]
    async fn test_corrupt_row_reads_as_idle() {
        let db = test_db().await;
        state_store::upsert_state(db.pool(), 6, "awaiting_theme", "not json")
            .await
            .unwrap();
        state_store::upsert_state(db.pool(), 7, "3", "{}").await.unwrap();

        let store = SqliteStateStore::new(db);
        assert_eq!(store.get(6).await.unwrap(), ConversationState::idle());
        assert_eq!(store.get(7).await.unwrap(), ConversationState::idle());
    }

    #[tokio::test]
    async fn test_claim_moves_to_idle() {
        let store = SqliteStateStore::new(test_db().await);
        let collected = Collected {
            full_name: Some("Ali".to_string()),
            pages: Some(8),
            theme_id: Some(1),
        };
        store
            .set(9, &ConversationState::new(Step::AwaitingTopic, collected.clone()))
            .await
            .unwrap();

        assert_eq!(store.claim(9, Step::AwaitingTopic).await.unwrap(), Some(collected));
        assert_eq!(store.get(9).await.unwrap().step, Step::Idle);
        assert_eq!(store.claim(9, Step::AwaitingTopic).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_ledger_adapter() {
        let ledger = SqliteLedger::new(test_db().await);
        assert!(ledger.create(&NewUser::new(1)).await.unwrap());
        assert!(!ledger.create(&NewUser::new(1)).await.unwrap());
        assert_eq!(ledger.credits(1).await.unwrap(), 2);
        assert!(ledger.debit_one(1).await.unwrap());
        assert_eq!(ledger.get(1).await.unwrap().unwrap().credits, 1);
    }

    #[tokio::test]
    async fn test_release_after_claim() {
        let store = SqliteStateStore::new(test_db().await);
        let collected = Collected {
            full_name: Some("Ali".to_string()),
            pages: Some(8),
            theme_id: Some(1),
        };
        store
            .set(10, &ConversationState::new(Step::AwaitingTopic, collected.clone()))
            .await
            .unwrap();
        store.claim(10, Step::AwaitingTopic).await.unwrap();

        assert!(store.release(10, Step::AwaitingTopic, &collected).await.unwrap());
        assert_eq!(
            store.get(10).await.unwrap(),
            ConversationState::new(Step::AwaitingTopic, collected)
        );
    }

    #[tokio::test]
    async fn test_release_skips_reset_row() {
        let store = SqliteStateStore::new(test_db().await);
        let collected = Collected {
            full_name: Some("Ali".to_string()),
            pages: Some(8),
            theme_id: Some(1),
        };
        store
            .set(11, &ConversationState::new(Step::AwaitingTopic, collected.clone()))
            .await
            .unwrap();
        store.claim(11, Step::AwaitingTopic).await.unwrap();
        store.reset(11).await.unwrap();

        assert!(!store.release(11, Step::AwaitingTopic, &collected).await.unwrap());
        assert_eq!(store.get(11).await.unwrap(), ConversationState::idle());
    }
}
