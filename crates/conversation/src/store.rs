//! Storage seams for the ledger and the conversation state.

use async_trait::async_trait;
use database::{NewUser, User};

use crate::error::Result;
use crate::step::{Collected, ConversationState, Step};

/// Durable record of users, credits and referrals.
///
/// Implementations must make `create` idempotent and `debit_one` an atomic
/// check-and-decrement.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Get a user by id.
    async fn get(&self, user_id: i64) -> Result<Option<User>>;

    /// Create a user unless one already exists.
    ///
    /// Returns `true` if the user was created. On creation an existing
    /// referrer is rewarded as part of the same operation.
    async fn create(&self, user: &NewUser) -> Result<bool>;

    /// Current balance, 0 for unknown users.
    async fn credits(&self, user_id: i64) -> Result<i64>;

    /// Take one credit if the balance is positive.
    async fn debit_one(&self, user_id: i64) -> Result<bool>;
}

/// Durable per-user dialogue position.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Current state, `(Idle, {})` if none is stored.
    async fn get(&self, user_id: i64) -> Result<ConversationState>;

    /// Replace the stored state.
    async fn set(&self, user_id: i64, state: &ConversationState) -> Result<()>;

    /// Reset to `(Idle, {})`.
    async fn reset(&self, user_id: i64) -> Result<()> {
        self.set(user_id, &ConversationState::idle()).await
    }

    /// Atomically move the user from `step` to Idle.
    ///
    /// Returns the collected answers if this call made the move, `None` if
    /// the user was not at `step`. The stored answers are left for the caller
    /// to overwrite.
    async fn claim(&self, user_id: i64, step: Step) -> Result<Option<Collected>>;

    /// Undo a [`claim`](StateStore::claim): move the user from Idle back to
    /// `step`, but only while the row still holds `collected`.
    ///
    /// Returns `false` if the row was rewritten after the claim (for example
    /// by a restart), leaving the newer state in place.
    async fn release(&self, user_id: i64, step: Step, collected: &Collected) -> Result<bool>;
}
