//! Reminder record encoding
//!
//! The whole table plus the id counter is one fixed-size little-endian
//! record:
//!
//! ```text
//! header (12 bytes)
//!   magic u32 | version u8 | capacity u8 | reserved u16 | next_id u32
//! slot (96 bytes) x capacity
//!   id u32 | due_at i64 | next_review_at i64 | repeat_minutes u32 |
//!   review_count u32 | flags u8 | priority u8 | message_len u8 |
//!   message [u8; 63] | reserved [u8; 2]
//! ```
//!
//! An id of 0 marks an empty slot. Decoding never fails on a bad slot; the
//! slot is dropped and counted instead. Timestamps must lie between the
//! epoch and the end of year 9999.

use heapless::String;

use crate::entity::text::REMINDER_LEN;
use crate::entity::{Priority, Reminder, ReminderId, ReminderTable, MAX_REMINDER_ID};
use crate::error::Error;
use crate::time::{is_plausible, EpochSecs};

/// "NBRM"
pub const RECORD_MAGIC: u32 = 0x4E42_524D;
pub const RECORD_VERSION: u8 = 1;
pub const HEADER_LEN: usize = 12;
pub const SLOT_LEN: usize = 96;

/// Largest table the format is used with
pub const MAX_RECORD_SLOTS: usize = 50;
pub const MAX_RECORD_LEN: usize = record_len(MAX_RECORD_SLOTS);

const FLAG_COMPLETED: u8 = 1 << 0;
const FLAG_TRIGGERED: u8 = 1 << 1;
const FLAG_HAS_DUE: u8 = 1 << 2;
const FLAG_HAS_REVIEW: u8 = 1 << 3;

const OFF_ID: usize = 0;
const OFF_DUE: usize = 4;
const OFF_REVIEW: usize = 12;
const OFF_REPEAT: usize = 20;
const OFF_COUNT: usize = 24;
const OFF_FLAGS: usize = 28;
const OFF_PRIORITY: usize = 29;
const OFF_MSG_LEN: usize = 30;
const OFF_MSG: usize = 31;

/// Encoded size of a table with `slots` slots
pub const fn record_len(slots: usize) -> usize {
    HEADER_LEN + slots * SLOT_LEN
}

/// Outcome of decoding a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LoadReport {
    /// Reminders restored
    pub loaded: u8,
    /// Slots rejected by validation
    pub rejected: u8,
    /// Valid slots beyond this table's capacity
    pub dropped: u8,
}

/// Encode `table` into `buf`, returning the number of bytes written
pub fn encode<const M: usize>(table: &ReminderTable<M>, buf: &mut [u8]) -> Result<usize, Error> {
    let len = record_len(M);
    if M > u8::MAX as usize || buf.len() < len {
        return Err(Error::CapacityExceeded);
    }
    let buf = &mut buf[..len];
    buf.fill(0);

    buf[0..4].copy_from_slice(&RECORD_MAGIC.to_le_bytes());
    buf[4] = RECORD_VERSION;
    buf[5] = M as u8;
    buf[8..12].copy_from_slice(&table.next_id().to_le_bytes());

    for (i, slot) in table.slots().iter().enumerate() {
        if let Some(reminder) = slot {
            let start = HEADER_LEN + i * SLOT_LEN;
            encode_slot(reminder, &mut buf[start..start + SLOT_LEN]);
        }
    }

    Ok(len)
}

fn encode_slot(r: &Reminder, out: &mut [u8]) {
    let mut flags = 0;
    if r.completed {
        flags |= FLAG_COMPLETED;
    }
    if r.triggered {
        flags |= FLAG_TRIGGERED;
    }
    if r.due_at.is_some() {
        flags |= FLAG_HAS_DUE;
    }
    if r.next_review_at.is_some() {
        flags |= FLAG_HAS_REVIEW;
    }

    out[OFF_ID..OFF_ID + 4].copy_from_slice(&r.id.to_le_bytes());
    out[OFF_DUE..OFF_DUE + 8].copy_from_slice(&r.due_at.unwrap_or(0).to_le_bytes());
    out[OFF_REVIEW..OFF_REVIEW + 8].copy_from_slice(&r.next_review_at.unwrap_or(0).to_le_bytes());
    out[OFF_REPEAT..OFF_REPEAT + 4].copy_from_slice(&r.repeat_minutes.to_le_bytes());
    out[OFF_COUNT..OFF_COUNT + 4].copy_from_slice(&r.review_count.to_le_bytes());
    out[OFF_FLAGS] = flags;
    out[OFF_PRIORITY] = r.priority.as_u8();

    let msg = r.message.as_bytes();
    out[OFF_MSG_LEN] = msg.len() as u8;
    out[OFF_MSG..OFF_MSG + msg.len()].copy_from_slice(msg);
}

/// Decode a record into a table of capacity `M`
///
/// A bad header is `StorageCorrupt`. Bad slots are skipped and reported.
pub fn decode<const M: usize>(bytes: &[u8]) -> Result<(ReminderTable<M>, LoadReport), Error> {
    if bytes.len() < HEADER_LEN {
        return Err(Error::StorageCorrupt);
    }
    if read_u32(bytes, 0) != RECORD_MAGIC || bytes[4] != RECORD_VERSION {
        return Err(Error::StorageCorrupt);
    }
    let capacity = usize::from(bytes[5]);
    if bytes.len() < record_len(capacity) {
        return Err(Error::StorageCorrupt);
    }
    // A counter past the id ceiling would mint ids the next load rejects
    let stored_next_id = match read_u32(bytes, 8) {
        id if id > MAX_REMINDER_ID => 0,
        id => id,
    };

    let mut slots: [Option<Reminder>; M] = core::array::from_fn(|_| None);
    let mut report = LoadReport::default();

    for i in 0..capacity {
        let start = HEADER_LEN + i * SLOT_LEN;
        let slot = &bytes[start..start + SLOT_LEN];
        let id = read_u32(slot, OFF_ID);
        if id == 0 {
            continue;
        }

        let reminder = match decode_slot(id, slot) {
            Some(r) if !slots.iter().flatten().any(|s| s.id == r.id) => r,
            _ => {
                report.rejected = report.rejected.saturating_add(1);
                continue;
            }
        };

        // Keep the stored position when it exists in this table
        let target = if i < M && slots[i].is_none() {
            Some(i)
        } else {
            slots.iter().position(Option::is_none)
        };
        match target {
            Some(t) => {
                slots[t] = Some(reminder);
                report.loaded = report.loaded.saturating_add(1);
            }
            None => report.dropped = report.dropped.saturating_add(1),
        }
    }

    Ok((ReminderTable::from_parts(slots, stored_next_id), report))
}

fn decode_slot(id: ReminderId, slot: &[u8]) -> Option<Reminder> {
    if id > MAX_REMINDER_ID {
        return None;
    }
    let msg_len = usize::from(slot[OFF_MSG_LEN]);
    if msg_len > REMINDER_LEN {
        return None;
    }
    let text = core::str::from_utf8(&slot[OFF_MSG..OFF_MSG + msg_len]).ok()?;
    let mut message: String<REMINDER_LEN> = String::new();
    message.push_str(text).ok()?;

    let flags = slot[OFF_FLAGS];
    let completed = flags & FLAG_COMPLETED != 0;
    let due_at = read_time(slot, flags, FLAG_HAS_DUE, OFF_DUE)?;
    let next_review_at = read_time(slot, flags, FLAG_HAS_REVIEW, OFF_REVIEW)?;
    Some(Reminder {
        id,
        message,
        due_at,
        repeat_minutes: read_u32(slot, OFF_REPEAT),
        completed,
        priority: Priority::from_u8(slot[OFF_PRIORITY]),
        // Completed wins over a stale triggered flag
        triggered: !completed && flags & FLAG_TRIGGERED != 0,
        next_review_at: if completed { None } else { next_review_at },
        review_count: if completed { 0 } else { read_u32(slot, OFF_COUNT) },
    })
}

/// Optional timestamp field; `None` (reject the slot) when it is set but
/// outside the displayable range
fn read_time(slot: &[u8], flags: u8, flag: u8, at: usize) -> Option<Option<EpochSecs>> {
    if flags & flag == 0 {
        return Some(None);
    }
    let t = read_i64(slot, at);
    is_plausible(t).then_some(Some(t))
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(&bytes[at..at + 4]);
    u32::from_le_bytes(b)
}

fn read_i64(bytes: &[u8], at: usize) -> i64 {
    let mut b = [0u8; 8];
    b.copy_from_slice(&bytes[at..at + 8]);
    i64::from_le_bytes(b)
}
