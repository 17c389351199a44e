//! User ledger operations: signup, referral rewards, and credit debits.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::{NewUser, User};

/// Credits granted to every new user.
pub const SIGNUP_CREDITS: i64 = 2;

/// Credits granted to a referrer for each user they bring in.
pub const REFERRAL_BONUS: i64 = 1;

/// Prefix of every referral code.
pub const REFERRAL_PREFIX: &str = "REF";

/// Derive the referral code for a user id.
pub fn referral_code_for(user_id: i64) -> String {
    format!("{}{}", REFERRAL_PREFIX, user_id)
}

/// Create a user if they do not exist yet.
///
/// Returns `true` if a row was inserted, `false` if the user already existed.
/// An existing row is never modified. When a row is inserted and
/// `referred_by` names an existing user, that user's credits and referral
/// count are bumped in the same transaction, so a retried signup can never
/// reward the referrer twice.
pub async fn create_user(pool: &SqlitePool, user: &NewUser) -> Result<bool> {
    let referrer = user.referred_by.filter(|id| *id != user.user_id);

    let mut tx = pool.begin().await?;

    // referred_by resolves to NULL when the referrer is unknown.
    let inserted = sqlx::query(
        r#"
        INSERT INTO users (user_id, display_name, handle, credits, referral_code, referred_by, referral_count)
        VALUES (?, ?, ?, ?, ?, (SELECT user_id FROM users WHERE user_id = ?), 0)
        ON CONFLICT(user_id) DO NOTHING
        "#,
    )
    .bind(user.user_id)
    .bind(&user.display_name)
    .bind(&user.handle)
    .bind(SIGNUP_CREDITS)
    .bind(referral_code_for(user.user_id))
    .bind(referrer)
    .execute(&mut *tx)
    .await?
    .rows_affected()
        > 0;

    if !inserted {
        tx.rollback().await?;
        return Ok(false);
    }

    if let Some(referrer_id) = referrer {
        let rewarded = sqlx::query(
            r#"
            UPDATE users
            SET credits = credits + ?, referral_count = referral_count + 1
            WHERE user_id = ?
            "#,
        )
        .bind(REFERRAL_BONUS)
        .bind(referrer_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if rewarded > 0 {
            tracing::info!(
                "User {} referred by {}; referrer rewarded",
                user.user_id,
                referrer_id
            );
        }
    }

    tx.commit().await?;

    tracing::info!("Created user {}", user.user_id);
    Ok(true)
}

/// Get a user by ID.
pub async fn get_user(pool: &SqlitePool, user_id: i64) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT user_id, display_name, handle, credits, referral_code, referred_by, referral_count, created_at
        FROM users
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Get a user's credit balance, or 0 if the user does not exist.
pub async fn get_credits(pool: &SqlitePool, user_id: i64) -> Result<i64> {
    let credits = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT credits FROM users WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(credits.unwrap_or(0))
}

/// Take one credit from a user.
///
/// The balance check and the decrement are one statement, so concurrent
/// callers can never drive the balance below zero. Returns `false` when the
/// user has no credits left or does not exist.
pub async fn debit_credit(pool: &SqlitePool, user_id: i64) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET credits = credits - 1
        WHERE user_id = ? AND credits > 0
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Count total users.
pub async fn count_users(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM users
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
