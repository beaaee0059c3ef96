//! Bounded text helpers

use heapless::String;

/// Fixed-capacity UTF-8 text
pub type Text<const N: usize> = String<N>;

/// Application name capacity in bytes
pub const APP_LEN: usize = 16;
/// Sender capacity in bytes
pub const SENDER_LEN: usize = 32;
/// Notification body capacity in bytes
pub const NOTIFICATION_LEN: usize = 64;
/// Reminder message capacity in bytes (matches the persisted field)
pub const REMINDER_LEN: usize = 63;
/// Song title capacity in bytes
pub const SONG_LEN: usize = 64;
/// Artist capacity in bytes
pub const ARTIST_LEN: usize = 48;

/// Copy `s` into a bounded string, keeping at most `max_chars` characters
///
/// Truncation always lands on a character boundary, so the result is
/// valid UTF-8 even when the byte capacity is the binding limit.
pub fn bounded<const N: usize>(s: &str, max_chars: usize) -> String<N> {
    let mut out = String::new();
    for c in s.chars().take(max_chars) {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Like [`bounded`], appending `...` when characters were dropped
pub fn ellipsized<const N: usize>(s: &str, max_chars: usize) -> String<N> {
    let total = s.chars().count();
    if total <= max_chars {
        return bounded(s, max_chars);
    }
    let mut out: String<N> = bounded(s, max_chars.saturating_sub(3));
    let _ = out.push_str("...");
    out
}
