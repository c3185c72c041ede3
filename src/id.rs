//! Record identifiers and timestamps.
//!
//! Ids are lowercase ULIDs: a millisecond timestamp followed by 80 random
//! bits. Uniqueness is probabilistic; nothing checks for collisions.

use chrono::{DateTime, SubsecRound, Utc};
use ulid::Ulid;

/// Generate a fresh record id.
pub fn new_id() -> String {
    Ulid::new().to_string().to_lowercase()
}

/// Current time at the millisecond precision records are stored with.
pub fn timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
