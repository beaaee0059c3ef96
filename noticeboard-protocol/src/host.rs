//! Host bridge link
//!
//! The host forwards form-style requests as packets whose payload is a
//! fixed sequence of length-prefixed text fields, the same fields the web
//! endpoints take. Trailing fields may be omitted and read as empty.
//! Parsing and truncation happen here, so the core only ever sees
//! validated [`Command`]s.

use noticeboard_core::command::{Command, Reply};
use noticeboard_core::config::{DeviceConfig, TextLimits};
use noticeboard_core::entity::text::{
    APP_LEN, ARTIST_LEN, NOTIFICATION_LEN, REMINDER_LEN, SENDER_LEN, SONG_LEN,
};
use noticeboard_core::entity::{bounded, Notification, Priority, Reminder};
use noticeboard_core::state::{ScreenMode, Telemetry};
use noticeboard_core::time::{is_synchronised, EpochSecs};
use noticeboard_core::Error;

use crate::packet::{FrameError, Packet, PayloadReader, PayloadWriter};
use crate::parse::{
    extract_sender, parse_datetime, parse_flag, parse_int, parse_tenths, parse_uint,
    ScheduleError,
};

/// Fields: app, from, message, priority
pub const REQ_NOTIFY: u8 = 0x40;
pub const REQ_CLEAR_NOTIFICATIONS: u8 = 0x41;
/// Fields: message, time, limit, priority
pub const REQ_ADD_REMINDER: u8 = 0x42;
pub const REQ_LIST_REMINDERS: u8 = 0x43;
/// Fields: id
pub const REQ_COMPLETE_REMINDER: u8 = 0x44;
pub const REQ_CLEAR_REMINDERS: u8 = 0x45;
/// Fields: song, artist
pub const REQ_NOW_PLAYING: u8 = 0x46;
/// Fields: name
pub const REQ_SCREEN: u8 = 0x47;
/// Fields: enabled
pub const REQ_GAMING: u8 = 0x48;
/// Fields: cpu_temp, cpu_usage, cpu_speed, ram_used, ram_total, gpu_temp,
/// gpu_usage, net_down, net_up
pub const REQ_PC_STATS: u8 = 0x49;
/// Fields: epoch
pub const REQ_SET_TIME: u8 = 0x4A;
/// Fields: delta
pub const REQ_PAGE_CALENDAR: u8 = 0x4B;

pub const RSP_OK: u8 = 0x60;
pub const RSP_REMINDER_ADDED: u8 = 0x61;
pub const RSP_ERROR: u8 = 0x62;
pub const RSP_REMINDER: u8 = 0x63;
pub const RSP_LIST_END: u8 = 0x64;

/// Error codes above the core range
pub const CODE_MALFORMED: u8 = 0x10;
pub const CODE_MISSING_FIELD: u8 = 0x11;
pub const CODE_UNKNOWN_REQUEST: u8 = 0x12;

const ENTRY_TRIGGERED: u8 = 1 << 0;
const ENTRY_HAS_DUE: u8 = 1 << 1;
const ENTRY_HAS_REVIEW: u8 = 1 << 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestError {
    Frame(FrameError),
    Schedule(ScheduleError),
    /// A required field was empty
    MissingField,
    /// A numeric field did not parse
    InvalidNumber,
    /// A numeric field parsed but lies outside its range
    OutOfRange,
}

impl RequestError {
    /// Code sent back in an error reply
    pub fn code(self) -> u8 {
        match self {
            RequestError::Frame(FrameError::UnknownType(_)) => CODE_UNKNOWN_REQUEST,
            RequestError::Frame(_) | RequestError::InvalidNumber | RequestError::OutOfRange => {
                CODE_MALFORMED
            }
            RequestError::Schedule(_) => Error::InvalidSchedule.code(),
            RequestError::MissingField => CODE_MISSING_FIELD,
        }
    }
}

impl From<FrameError> for RequestError {
    fn from(e: FrameError) -> Self {
        RequestError::Frame(e)
    }
}

impl From<ScheduleError> for RequestError {
    fn from(e: ScheduleError) -> Self {
        RequestError::Schedule(e)
    }
}

/// Partial telemetry; `None` keeps the current figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatsUpdate {
    pub cpu_temp_c: Option<u8>,
    pub cpu_usage_pct: Option<u8>,
    pub cpu_ghz_x10: Option<u8>,
    pub ram_used_gb: Option<u8>,
    pub ram_total_gb: Option<u8>,
    pub gpu_temp_c: Option<u8>,
    pub gpu_usage_pct: Option<u8>,
    pub net_down_x10: Option<u16>,
    pub net_up_x10: Option<u16>,
}

impl StatsUpdate {
    /// Merge onto the current telemetry
    pub fn apply(&self, current: Telemetry) -> Telemetry {
        Telemetry {
            gaming_mode: current.gaming_mode,
            cpu_temp_c: self.cpu_temp_c.unwrap_or(current.cpu_temp_c),
            cpu_usage_pct: self.cpu_usage_pct.unwrap_or(current.cpu_usage_pct),
            cpu_ghz_x10: self.cpu_ghz_x10.unwrap_or(current.cpu_ghz_x10),
            ram_used_gb: self.ram_used_gb.unwrap_or(current.ram_used_gb),
            ram_total_gb: self.ram_total_gb.unwrap_or(current.ram_total_gb),
            gpu_temp_c: self.gpu_temp_c.unwrap_or(current.gpu_temp_c),
            gpu_usage_pct: self.gpu_usage_pct.unwrap_or(current.gpu_usage_pct),
            net_down_x10: self.net_down_x10.unwrap_or(current.net_down_x10),
            net_up_x10: self.net_up_x10.unwrap_or(current.net_up_x10),
        }
    }
}

/// A decoded host request
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostRequest {
    Command(Command),
    /// Wall clock in epoch seconds; handled by the clock, not the core
    SetTime(EpochSecs),
    /// Needs the current telemetry before it becomes a command
    PcStats(StatsUpdate),
}

impl HostRequest {
    pub fn decode(packet: &Packet, config: &DeviceConfig) -> Result<Self, RequestError> {
        let mut r = packet.reader();
        let limits = &config.limits;
        let request = match packet.kind {
            REQ_NOTIFY => HostRequest::Command(notification(&mut r, limits)?),
            REQ_CLEAR_NOTIFICATIONS => HostRequest::Command(Command::ClearNotifications),
            REQ_ADD_REMINDER => {
                HostRequest::Command(reminder(&mut r, limits, config.utc_offset_minutes)?)
            }
            REQ_LIST_REMINDERS => HostRequest::Command(Command::ListReminders),
            REQ_COMPLETE_REMINDER => {
                let id = required(r.text_or_empty()?)?;
                let id = parse_int(id)
                    .and_then(|v| u32::try_from(v).ok())
                    .ok_or(RequestError::InvalidNumber)?;
                HostRequest::Command(Command::CompleteReminder { id })
            }
            REQ_CLEAR_REMINDERS => HostRequest::Command(Command::ClearReminders),
            REQ_NOW_PLAYING => {
                let song = r.text_or_empty()?;
                let artist = r.text_or_empty()?;
                HostRequest::Command(if song.is_empty() {
                    Command::ClearNowPlaying
                } else {
                    Command::SetNowPlaying {
                        song: bounded::<SONG_LEN>(song, usize::from(limits.song_chars)),
                        artist: bounded::<ARTIST_LEN>(artist, usize::from(limits.artist_chars)),
                    }
                })
            }
            REQ_SCREEN => HostRequest::Command(Command::SwitchScreen(screen_by_name(
                r.text_or_empty()?,
            ))),
            REQ_GAMING => {
                HostRequest::Command(Command::SetGamingMode(parse_flag(r.text_or_empty()?)))
            }
            REQ_PC_STATS => HostRequest::PcStats(stats(&mut r)?),
            REQ_SET_TIME => {
                let epoch = parse_int(required(r.text_or_empty()?)?)
                    .ok_or(RequestError::InvalidNumber)?;
                if !is_synchronised(epoch) {
                    return Err(RequestError::OutOfRange);
                }
                HostRequest::SetTime(epoch)
            }
            REQ_PAGE_CALENDAR => {
                let delta = parse_int(required(r.text_or_empty()?)?)
                    .ok_or(RequestError::InvalidNumber)?;
                let delta = delta.clamp(i64::from(i8::MIN), i64::from(i8::MAX)) as i8;
                HostRequest::Command(Command::PageCalendar(delta))
            }
            other => return Err(FrameError::UnknownType(other).into()),
        };
        Ok(request)
    }
}

fn required(field: &str) -> Result<&str, RequestError> {
    let field = field.trim();
    if field.is_empty() {
        Err(RequestError::MissingField)
    } else {
        Ok(field)
    }
}

fn or_default<'a>(field: &'a str, default: &'a str) -> &'a str {
    if field.is_empty() {
        default
    } else {
        field
    }
}

fn notification(r: &mut PayloadReader<'_>, limits: &TextLimits) -> Result<Command, RequestError> {
    let app = or_default(r.text_or_empty()?, "App");
    let sender = extract_sender(r.text_or_empty()?);
    let message = or_default(r.text_or_empty()?, "Notification");
    let priority = Priority::from_name(r.text_or_empty()?);

    Ok(Command::AddNotification(Notification {
        app: bounded::<APP_LEN>(app, usize::from(limits.app_chars)),
        sender: bounded::<SENDER_LEN>(sender, usize::from(limits.sender_chars)),
        message: bounded::<NOTIFICATION_LEN>(message, usize::from(limits.notification_chars)),
        priority,
    }))
}

fn reminder(
    r: &mut PayloadReader<'_>,
    limits: &TextLimits,
    utc_offset_minutes: i16,
) -> Result<Command, RequestError> {
    let message = r.text_or_empty()?;
    let time = required(r.text_or_empty()?)?;
    let limit = r.text_or_empty()?;
    let priority = Priority::from_name(r.text_or_empty()?);

    let due_at = parse_datetime(time, i32::from(utc_offset_minutes))?;
    Ok(Command::AddReminder {
        message: bounded::<REMINDER_LEN>(message, usize::from(limits.reminder_chars)),
        due_at: Some(due_at),
        repeat_minutes: parse_uint(limit),
        priority,
    })
}

fn stats(r: &mut PayloadReader<'_>) -> Result<StatsUpdate, RequestError> {
    let mut fields = [""; 9];
    for field in &mut fields {
        *field = r.text_or_empty()?.trim();
    }
    let whole = |s: &str| -> Option<u8> {
        if s.is_empty() {
            None
        } else {
            Some(parse_uint(s).min(u32::from(u8::MAX)) as u8)
        }
    };
    let tenths_u8 = |s: &str| parse_tenths(s).map(|v| v.min(u32::from(u8::MAX)) as u8);
    let tenths_u16 = |s: &str| parse_tenths(s).map(|v| v.min(u32::from(u16::MAX)) as u16);

    Ok(StatsUpdate {
        cpu_temp_c: whole(fields[0]),
        cpu_usage_pct: whole(fields[1]),
        cpu_ghz_x10: tenths_u8(fields[2]),
        ram_used_gb: whole(fields[3]),
        ram_total_gb: whole(fields[4]),
        gpu_temp_c: whole(fields[5]),
        gpu_usage_pct: whole(fields[6]),
        net_down_x10: tenths_u16(fields[7]),
        net_up_x10: tenths_u16(fields[8]),
    })
}

/// Screen for a `name` field; unknown names fall back to notifications
pub fn screen_by_name(name: &str) -> ScreenMode {
    match name.trim() {
        "reminder" | "reminders" => ScreenMode::Reminders,
        "calendar" => ScreenMode::Calendar,
        _ => ScreenMode::Notifications,
    }
}

/// Reply packets sent back to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostReply<'a> {
    Ok,
    ReminderAdded(u32),
    Error(u8),
    /// One listed reminder
    Entry(&'a Reminder),
    /// Ends a listing of `count` entries
    ListEnd(u8),
}

impl<'a> HostReply<'a> {
    pub fn encode(&self) -> Result<Packet, FrameError> {
        match *self {
            HostReply::Ok => Ok(Packet::bare(RSP_OK)),
            HostReply::ReminderAdded(id) => Packet::new(RSP_REMINDER_ADDED, &id.to_le_bytes()),
            HostReply::Error(code) => Packet::new(RSP_ERROR, &[code]),
            HostReply::Entry(r) => {
                let mut flags = 0;
                if r.triggered {
                    flags |= ENTRY_TRIGGERED;
                }
                if r.due_at.is_some() {
                    flags |= ENTRY_HAS_DUE;
                }
                if r.next_review_at.is_some() {
                    flags |= ENTRY_HAS_REVIEW;
                }
                let mut w = PayloadWriter::new();
                w.u32(r.id)?
                    .u8(flags)?
                    .u8(r.priority.as_u8())?
                    .i64(r.due_at.unwrap_or(0))?
                    .i64(r.next_review_at.unwrap_or(0))?
                    .u32(r.repeat_minutes)?
                    .u32(r.review_count)?
                    .text(&r.message)?;
                Ok(w.finish(RSP_REMINDER))
            }
            HostReply::ListEnd(count) => Packet::new(RSP_LIST_END, &[count]),
        }
    }

    /// Every packet for a core reply, in send order
    pub fn for_reply<const M: usize, F>(reply: &Reply<M>, mut send: F)
    where
        F: FnMut(HostReply<'_>),
    {
        match reply {
            Reply::Ok => send(HostReply::Ok),
            Reply::ReminderAdded(id) => send(HostReply::ReminderAdded(*id)),
            Reply::Error(e) => send(HostReply::Error(e.code())),
            Reply::Reminders(list) => {
                for r in list {
                    send(HostReply::Entry(r));
                }
                send(HostReply::ListEnd(list.len().min(usize::from(u8::MAX)) as u8));
            }
        }
    }
}
