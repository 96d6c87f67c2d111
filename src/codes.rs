//! Activation code minting.
//!
//! A code pairs a random base36 segment with a millisecond timestamp
//! segment, so codes stay unique with overwhelming probability even under a
//! weak RNG or a stuck clock. Uniqueness is still enforced at write time:
//! the subscriptions table keys on `activation_code` and the registry
//! re-mints on conflict.

use chrono::Utc;
use rand::Rng;

use crate::error::{AppError, Result};
use crate::util::SECONDS_PER_DAY;

const CODE_PREFIX: &str = "AC";
const RANDOM_SEGMENT_LEN: usize = 8;
const BASE36: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A freshly minted activation code and its expiry instant (unix seconds).
#[derive(Debug, Clone)]
pub struct MintedCode {
    pub code: String,
    pub expires_at: i64,
}

/// Mint an activation code valid for `duration_days` from now.
///
/// Pure function of the clock, the RNG, and the duration; performs no store
/// access. Expiry is computed in UTC in one instant to avoid drift.
pub fn mint(duration_days: i64) -> Result<MintedCode> {
    if duration_days <= 0 {
        return Err(AppError::Validation(
            "Duration must be a positive number of days".into(),
        ));
    }

    let now = Utc::now();
    let expires_at = duration_days
        .checked_mul(SECONDS_PER_DAY)
        .and_then(|secs| now.timestamp().checked_add(secs))
        .ok_or_else(|| AppError::Validation("Duration is too large".into()))?;

    let mut rng = rand::thread_rng();
    let random: String = (0..RANDOM_SEGMENT_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();

    let code = format!(
        "{}-{}-{}",
        CODE_PREFIX,
        random,
        to_base36(now.timestamp_millis())
    );

    Ok(MintedCode { code, expires_at })
}

fn to_base36(mut n: i64) -> String {
    if n <= 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).expect("base36 digits are ASCII")
}

/// Check that a string looks like an activation code: `AC-` followed by
/// eight base36 characters, a dash, and a base36 timestamp segment.
pub fn looks_like_code(code: &str) -> bool {
    let mut parts = code.splitn(3, '-');
    let (Some(prefix), Some(random), Some(ts)) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    prefix == CODE_PREFIX
        && random.len() == RANDOM_SEGMENT_LEN
        && random.bytes().all(|b| BASE36.contains(&b))
        && !ts.is_empty()
        && ts.bytes().all(|b| BASE36.contains(&b))
}
