//! Now-playing ticker and disc animation
//!
//! Two independent cadences: the disc frame turns every `disc_period_ms`
//! whether or not anything is playing, and the scroll offset advances every
//! `scroll_period_ms` only while a song is shown. Both only ever mark the
//! Status zone dirty.

use core::fmt::Write;

use heapless::String;

use crate::config::DeviceConfig;
use crate::entity::text::{bounded, ARTIST_LEN, SONG_LEN};
use crate::render::{DirtyTracker, Zone};
use crate::traits::TextMetrics;

/// Separator between song and artist
pub const ARTIST_SEPARATOR: &str = " - ";

/// Blank run appended so the text does not butt against its own wrap
pub const TICKER_GAP: &str = "    ";

/// Capacity of the composed ticker text
pub const TICKER_TEXT_LEN: usize = SONG_LEN + ARTIST_SEPARATOR.len() + ARTIST_LEN + TICKER_GAP.len();

/// Ticker and disc counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickerState {
    pub active: bool,
    pub song: String<SONG_LEN>,
    pub artist: String<ARTIST_LEN>,
    /// Scroll offset in pixels, always below `text_width_px` when active
    pub scroll_px: u32,
    /// Pixel width of [`TickerState::text`]
    pub text_width_px: u32,
    /// Disc animation frame
    pub disc_frame: u8,
    last_scroll_ms: u64,
    last_disc_ms: u64,
    updated_ms: u64,
}

impl TickerState {
    /// The scrolling text: `song - artist` plus the trailing gap
    pub fn text(&self) -> String<TICKER_TEXT_LEN> {
        let mut out = String::new();
        if !self.active {
            return out;
        }
        let _ = out.push_str(&self.song);
        if !self.artist.is_empty() {
            let _ = write!(out, "{}{}", ARTIST_SEPARATOR, self.artist);
        }
        let _ = out.push_str(TICKER_GAP);
        out
    }
}

/// Steps the ticker counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickerEngine {
    scroll_period_ms: u64,
    disc_period_ms: u64,
    scroll_step_px: u32,
    disc_frames: u8,
    timeout_ms: u64,
}

impl TickerEngine {
    pub fn from_config(config: &DeviceConfig) -> Self {
        Self {
            scroll_period_ms: u64::from(config.timing.scroll_period_ms.max(1)),
            disc_period_ms: u64::from(config.timing.disc_period_ms.max(1)),
            scroll_step_px: u32::from(config.ticker.scroll_step_px),
            disc_frames: config.ticker.disc_frames.max(1),
            timeout_ms: u64::from(config.timing.now_playing_timeout_ms),
        }
    }

    /// Show a new song
    ///
    /// An empty song clears the ticker. Otherwise the scroll restarts from
    /// zero while the disc keeps its frame.
    pub fn set_now_playing<T: TextMetrics>(
        &self,
        ticker: &mut TickerState,
        dirty: &mut DirtyTracker,
        song: &str,
        artist: &str,
        metrics: &T,
        now_ms: u64,
    ) {
        if song.is_empty() {
            self.clear_now_playing(ticker, dirty);
            return;
        }

        ticker.song = bounded(song, SONG_LEN);
        ticker.artist = bounded(artist, ARTIST_LEN);
        ticker.active = true;
        ticker.scroll_px = 0;
        ticker.last_scroll_ms = now_ms;
        ticker.updated_ms = now_ms;
        ticker.text_width_px = metrics.text_width(&ticker.text());
        dirty.mark_dirty(Zone::Status);
    }

    /// Stop showing a song; the disc keeps its frame
    pub fn clear_now_playing(&self, ticker: &mut TickerState, dirty: &mut DirtyTracker) {
        ticker.active = false;
        ticker.song.clear();
        ticker.artist.clear();
        ticker.scroll_px = 0;
        ticker.text_width_px = 0;
        dirty.mark_dirty(Zone::Status);
    }

    /// Advance whichever counters are due at `now_ms`
    ///
    /// Returns true when the Status zone was marked dirty.
    pub fn tick(&self, ticker: &mut TickerState, dirty: &mut DirtyTracker, now_ms: u64) -> bool {
        let mut changed = false;

        if ticker.active
            && self.timeout_ms > 0
            && now_ms.saturating_sub(ticker.updated_ms) >= self.timeout_ms
        {
            self.clear_now_playing(ticker, dirty);
            changed = true;
        }

        if now_ms.saturating_sub(ticker.last_disc_ms) >= self.disc_period_ms {
            ticker.last_disc_ms = now_ms;
            ticker.disc_frame = (ticker.disc_frame + 1) % self.disc_frames;
            changed = true;
        }

        if ticker.active && now_ms.saturating_sub(ticker.last_scroll_ms) >= self.scroll_period_ms {
            ticker.last_scroll_ms = now_ms;
            if ticker.text_width_px > 0 {
                let next = (ticker.scroll_px + self.scroll_step_px) % ticker.text_width_px;
                if next != ticker.scroll_px {
                    ticker.scroll_px = next;
                    changed = true;
                }
            }
        }

        if changed {
            dirty.mark_dirty(Zone::Status);
        }
        changed
    }
}
