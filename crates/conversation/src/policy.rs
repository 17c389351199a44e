//! Credit and referral rules.

pub use database::user::{REFERRAL_BONUS, REFERRAL_PREFIX, SIGNUP_CREDITS};

/// Credits spent on one finished deck.
pub const CREDITS_PER_DECK: i64 = 1;

/// Resolve a `REF<user_id>` token to the referrer id.
///
/// Malformed tokens and tokens naming `new_user_id` itself yield `None`.
/// Whether the referrer exists is up to the caller.
pub fn parse_referral_token(token: &str, new_user_id: i64) -> Option<i64> {
    let referrer = token
        .trim()
        .strip_prefix(REFERRAL_PREFIX)?
        .parse::<i64>()
        .ok()?;
    (referrer != new_user_id).then_some(referrer)
}
