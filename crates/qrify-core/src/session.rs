//! Opaque per-client session identifiers.
//!
//! A session id only scopes history lookups. It carries no authentication
//! meaning and is never stored server-side outside of history rows.

use chrono::Utc;
use rand::Rng;
use std::fmt;

/// Longest client-supplied id we accept.
pub const SESSION_ID_MAX_LEN: usize = 128;

/// A per-client session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Mint a fresh id: base-36 millisecond timestamp followed by a base-36
    /// random component.
    pub fn generate() -> Self {
        let millis = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        let random: u64 = rand::rng().random();
        Self(format!("{}{}", to_base36(millis), to_base36(random)))
    }

    /// Accept a client-supplied id if it looks like one we could have issued.
    pub fn parse(raw: &str) -> Option<Self> {
        let plausible = !raw.is_empty()
            && raw.len() <= SESSION_ID_MAX_LEN
            && raw
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        plausible.then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    // Only ASCII digits were pushed.
    String::from_utf8_lossy(&out).into_owned()
}
