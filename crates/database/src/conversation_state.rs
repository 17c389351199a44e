//! Per-user conversation rows.
//!
//! Each user has at most one row. Writes replace the whole row; nothing is
//! merged.

use sqlx::SqlitePool;

use crate::models::ConversationRecord;
use crate::Result;

/// Get the conversation row for a user.
pub async fn get_state(pool: &SqlitePool, user_id: i64) -> Result<Option<ConversationRecord>> {
    let record = sqlx::query_as::<_, ConversationRecord>(
        r#"
        SELECT user_id, step, collected, updated_at
        FROM conversation_state
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Create or replace the conversation row for a user.
pub async fn upsert_state(
    pool: &SqlitePool,
    user_id: i64,
    step: &str,
    collected: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO conversation_state (user_id, step, collected)
        VALUES (?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            step = excluded.step,
            collected = excluded.collected,
            updated_at = datetime('now')
        "#,
    )
    .bind(user_id)
    .bind(step)
    .bind(collected)
    .execute(pool)
    .await?;

    Ok(())
}

/// Atomically move a row from `expected_step` to `next_step`.
///
/// Only the step changes; `collected` is left as it was and returned, so the
/// caller can act on it and then overwrite the row. Returns `None` if the row
/// was not at `expected_step` (including when it does not exist). Of several
/// racing callers, at most one gets `Some`.
pub async fn claim_step(
    pool: &SqlitePool,
    user_id: i64,
    expected_step: &str,
    next_step: &str,
) -> Result<Option<String>> {
    let collected = sqlx::query_scalar::<_, String>(
        r#"
        UPDATE conversation_state
        SET step = ?, updated_at = datetime('now')
        WHERE user_id = ? AND step = ?
        RETURNING collected
        "#,
    )
    .bind(next_step)
    .bind(user_id)
    .bind(expected_step)
    .fetch_optional(pool)
    .await?;

    Ok(collected)
}

/// Undo a [`claim_step`].
///
/// Moves the row from `claimed_step` back to `restored_step`, but only while
/// it still holds exactly `collected`. Returns `false` when the row was
/// rewritten since the claim, in which case it is left alone.
pub async fn release_step(
    pool: &SqlitePool,
    user_id: i64,
    claimed_step: &str,
    collected: &str,
    restored_step: &str,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE conversation_state
        SET step = ?, updated_at = datetime('now')
        WHERE user_id = ? AND step = ? AND collected = ?
        "#,
    )
    .bind(restored_step)
    .bind(user_id)
    .bind(claimed_step)
    .bind(collected)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
