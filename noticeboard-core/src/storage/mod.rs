//! Persistence format for the reminder table

pub mod record;

pub use record::{
    decode, encode, record_len, LoadReport, HEADER_LEN, MAX_RECORD_LEN, MAX_RECORD_SLOTS,
    RECORD_MAGIC, RECORD_VERSION, SLOT_LEN,
};
