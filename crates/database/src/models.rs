//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user in the ledger, identified by their chat platform id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Platform-assigned user id (e.g., a Telegram user id).
    pub user_id: i64,
    /// Display name at signup.
    pub display_name: Option<String>,
    /// Platform handle at signup, without the leading `@`.
    pub handle: Option<String>,
    /// Remaining credits. Never negative.
    pub credits: i64,
    /// Referral code handed out by this user (`REF<user_id>`).
    pub referral_code: String,
    /// User who referred this one, if any.
    pub referred_by: Option<i64>,
    /// Number of users this user has referred.
    pub referral_count: i64,
    /// Creation timestamp.
    pub created_at: String,
}

/// Fields supplied when a user is first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewUser {
    pub user_id: i64,
    pub display_name: Option<String>,
    pub handle: Option<String>,
    /// Referrer candidate. Only stored if that user exists.
    pub referred_by: Option<i64>,
}

impl NewUser {
    /// Create a signup record with no names and no referrer.
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            ..Default::default()
        }
    }

    /// Attach a referrer candidate.
    pub fn referred_by(mut self, referrer: Option<i64>) -> Self {
        self.referred_by = referrer;
        self
    }
}

/// A stored conversation row.
///
/// `step` and `collected` are kept as opaque strings here; the conversation
/// crate owns their encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ConversationRecord {
    /// Owning user.
    pub user_id: i64,
    /// Step code (e.g., "awaiting_name").
    pub step: String,
    /// JSON object of collected answers.
    pub collected: String,
    /// Last update timestamp.
    pub updated_at: String,
}
