// Document identifiers.
//
// IDs are 24 lowercase hex characters laid out like a BSON ObjectId:
// 4 bytes of big-endian unix seconds, 5 random bytes fixed per process,
// and a 3-byte wrapping counter. They sort roughly by creation time.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::Utc;
use rand::{Rng, rng};

/// Length of an encoded ID.
pub const ID_LEN: usize = 24;

static PROCESS_RANDOM: OnceLock<[u8; 5]> = OnceLock::new();
static COUNTER: OnceLock<AtomicU32> = OnceLock::new();

/// Generate a new document ID.
pub fn new_id() -> String {
    let seconds = Utc::now().timestamp() as u32;
    let random = PROCESS_RANDOM.get_or_init(|| rng().random());
    let count = COUNTER
        .get_or_init(|| AtomicU32::new(rng().random::<u32>() & 0x00ff_ffff))
        .fetch_add(1, Ordering::Relaxed);

    let mut bytes = [0u8; 12];
    bytes[..4].copy_from_slice(&seconds.to_be_bytes());
    bytes[4..9].copy_from_slice(random);
    bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
    hex::encode(bytes)
}

/// Whether `value` is a well-formed document ID (24 hex characters).
pub fn is_valid_id(value: &str) -> bool {
    value.len() == ID_LEN && value.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Lowercase form of a well-formed ID, matching what [`new_id`] produces.
pub fn normalize_id(value: &str) -> Option<String> {
    is_valid_id(value).then(|| value.to_ascii_lowercase())
}
