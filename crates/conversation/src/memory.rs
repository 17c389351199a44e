//! In-memory stores for tests and local runs.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use database::user::{referral_code_for, REFERRAL_BONUS, SIGNUP_CREDITS};
use database::{NewUser, User};
use tokio::sync::Mutex;

use crate::error::Result;
use crate::step::{Collected, ConversationState, Step};
use crate::store::{LedgerStore, StateStore};

/// Ledger held in a map. Not persisted.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    users: Mutex<HashMap<i64, User>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    async fn get(&self, user_id: i64) -> Result<Option<User>> {
        Ok(self.users.lock().await.get(&user_id).cloned())
    }

    async fn create(&self, user: &NewUser) -> Result<bool> {
        let mut users = self.users.lock().await;
        if users.contains_key(&user.user_id) {
            return Ok(false);
        }

        let referrer = user
            .referred_by
            .filter(|id| *id != user.user_id && users.contains_key(id));

        if let Some(referrer) = referrer.and_then(|id| users.get_mut(&id)) {
            referrer.credits += REFERRAL_BONUS;
            referrer.referral_count += 1;
        }

        users.insert(
            user.user_id,
            User {
                user_id: user.user_id,
                display_name: user.display_name.clone(),
                handle: user.handle.clone(),
                credits: SIGNUP_CREDITS,
                referral_code: referral_code_for(user.user_id),
                referred_by: referrer,
                referral_count: 0,
                created_at: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            },
        );
        Ok(true)
    }

    async fn credits(&self, user_id: i64) -> Result<i64> {
        Ok(self
            .users
            .lock()
            .await
            .get(&user_id)
            .map(|user| user.credits)
            .unwrap_or(0))
    }

    async fn debit_one(&self, user_id: i64) -> Result<bool> {
        let mut users = self.users.lock().await;
        match users.get_mut(&user_id) {
            Some(user) if user.credits > 0 => {
                user.credits -= 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// Conversation state held in a map. Not persisted.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    states: Mutex<HashMap<i64, ConversationState>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn get(&self, user_id: i64) -> Result<ConversationState> {
        Ok(self
            .states
            .lock()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn set(&self, user_id: i64, state: &ConversationState) -> Result<()> {
        self.states.lock().await.insert(user_id, state.clone());
        Ok(())
    }

    async fn claim(&self, user_id: i64, step: Step) -> Result<Option<Collected>> {
        let mut states = self.states.lock().await;
        match states.get_mut(&user_id) {
            Some(state) if state.step == step => {
                state.step = Step::Idle;
                Ok(Some(state.collected.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn release(&self, user_id: i64, step: Step, collected: &Collected) -> Result<bool> {
        let mut states = self.states.lock().await;
        match states.get_mut(&user_id) {
            Some(state) if state.step == Step::Idle && state.collected == *collected => {
                state.step = step;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_referral() {
        let ledger = MemoryLedger::new();
        assert!(ledger.create(&NewUser::new(1)).await.unwrap());
        assert!(ledger
            .create(&NewUser::new(2).referred_by(Some(1)))
            .await
            .unwrap());
        assert!(!ledger
            .create(&NewUser::new(2).referred_by(Some(1)))
            .await
            .unwrap());

        let referrer = ledger.get(1).await.unwrap().unwrap();
        assert_eq!(referrer.credits, SIGNUP_CREDITS + REFERRAL_BONUS);
        assert_eq!(referrer.referral_count, 1);
        assert_eq!(ledger.get(2).await.unwrap().unwrap().referred_by, Some(1));
    }

    #[tokio::test]
    async fn test_unknown_and_self_referrals_ignored() {
        let ledger = MemoryLedger::new();
        ledger
            .create(&NewUser::new(3).referred_by(Some(3)))
            .await
            .unwrap();
        ledger
            .create(&NewUser::new(4).referred_by(Some(99)))
            .await
            .unwrap();

        let user = ledger.get(3).await.unwrap().unwrap();
        assert_eq!(user.referred_by, None);
        assert_eq!(user.credits, SIGNUP_CREDITS);
        assert_eq!(ledger.get(4).await.unwrap().unwrap().referred_by, None);
    }

    #[tokio::test]
    async fn test_debit_stops_at_zero() {
        let ledger = MemoryLedger::new();
        ledger.create(&NewUser::new(5)).await.unwrap();
        assert!(ledger.debit_one(5).await.unwrap());
        assert!(ledger.debit_one(5).await.unwrap());
        assert!(!ledger.debit_one(5).await.unwrap());
        assert_eq!(ledger.credits(5).await.unwrap(), 0);
        assert!(!ledger.debit_one(404).await.unwrap());
    }

    #[tokio::test]
    async fn test_claim_only_once() {
        let store = MemoryStateStore::new();
        assert_eq!(store.claim(1, Step::AwaitingTopic).await.unwrap(), None);

        store
            .set(1, &ConversationState::new(Step::AwaitingTopic, Collected::default()))
            .await
            .unwrap();
        assert!(store.claim(1, Step::AwaitingTopic).await.unwrap().is_some());
        assert!(store.claim(1, Step::AwaitingTopic).await.unwrap().is_none());
        assert_eq!(store.get(1).await.unwrap().step, Step::Idle);
    }

    #[tokio::test]
    async fn test_release_only_untouched_claim() {
        let store = MemoryStateStore::new();
        let collected = Collected {
            full_name: Some("Ali".to_string()),
            pages: Some(9),
            theme_id: Some(2),
        };
        store
            .set(2, &ConversationState::new(Step::AwaitingTopic, collected.clone()))
            .await
            .unwrap();

        store.claim(2, Step::AwaitingTopic).await.unwrap();
        assert!(store.release(2, Step::AwaitingTopic, &collected).await.unwrap());
        assert_eq!(store.get(2).await.unwrap().step, Step::AwaitingTopic);

        store.claim(2, Step::AwaitingTopic).await.unwrap();
        store.reset(2).await.unwrap();
        assert!(!store.release(2, Step::AwaitingTopic, &collected).await.unwrap());
        assert_eq!(store.get(2).await.unwrap(), ConversationState::idle());
    }
}
