//! Shared system state
//!
//! Owned by the control loop. Producers take it by `&mut`, the render
//! scheduler by `&`.

use chrono::NaiveDate;
use heapless::Deque;

use crate::config::ContentLayout;
use crate::engine::ticker::TickerState;
use crate::entity::{NotificationRing, ReminderTable, MAX_NOTIFICATIONS, MAX_REMINDERS};
use crate::render::{DirtyTracker, Zone};
use crate::time::shift_month;

/// Pending indicator requests kept between drains
pub const MAX_INDICATIONS: usize = 8;

/// Screen shown in the content area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScreenMode {
    #[default]
    Notifications,
    Reminders,
    Calendar,
}

impl ScreenMode {
    const ALL: [ScreenMode; 3] = [
        ScreenMode::Notifications,
        ScreenMode::Reminders,
        ScreenMode::Calendar,
    ];

    /// Title zone text
    pub fn title(self) -> &'static str {
        match self {
            ScreenMode::Notifications => "Notifications",
            ScreenMode::Reminders => "Reminders",
            ScreenMode::Calendar => "Calendar",
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(usize::from(value)).copied()
    }

    /// Cycle through screens by `delta` steps
    pub fn cycle(self, delta: i8) -> Self {
        let len = Self::ALL.len() as i16;
        let idx = (i16::from(self.as_u8()) + i16::from(delta)).rem_euclid(len);
        Self::ALL[idx as usize]
    }
}

/// Attention indicator request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Indication {
    /// Steady colour for the given screen
    Screen(ScreenMode),
    /// Blink `times` on/off pairs of `period_ms` each
    Blink { times: u8, period_ms: u16 },
    /// Indicator off
    Off,
}

/// Host PC telemetry shown in gaming mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Telemetry {
    pub gaming_mode: bool,
    pub cpu_temp_c: u8,
    pub cpu_usage_pct: u8,
    /// Clock in tenths of a GHz
    pub cpu_ghz_x10: u8,
    pub ram_used_gb: u8,
    pub ram_total_gb: u8,
    pub gpu_temp_c: u8,
    pub gpu_usage_pct: u8,
    /// Network throughput in tenths of a Mbit/s
    pub net_down_x10: u16,
    pub net_up_x10: u16,
}

/// Month shown by the calendar screen, as an offset from today's month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalendarView {
    pub offset_months: i16,
}

impl CalendarView {
    /// First day of the viewed month
    pub fn resolve(&self, today: NaiveDate) -> Option<NaiveDate> {
        shift_month(today, i32::from(self.offset_months))
    }

    pub fn page(&mut self, delta: i8) {
        self.offset_months = self.offset_months.saturating_add(i16::from(delta));
    }

    pub fn reset(&mut self) {
        self.offset_months = 0;
    }
}

/// Everything the producers mutate and the renderer reads
pub struct SystemState<const N: usize = MAX_NOTIFICATIONS, const M: usize = MAX_REMINDERS> {
    pub screen: ScreenMode,
    pub notifications: NotificationRing<N>,
    pub reminders: ReminderTable<M>,
    pub ticker: TickerState,
    pub telemetry: Telemetry,
    pub calendar: CalendarView,
    pub dirty: DirtyTracker,
    indications: Deque<Indication, MAX_INDICATIONS>,
}

impl<const N: usize, const M: usize> SystemState<N, M> {
    /// Fresh state with every zone dirty
    pub fn new(layout: ContentLayout) -> Self {
        let mut dirty = DirtyTracker::new(layout);
        dirty.mark_all_dirty();
        Self {
            screen: ScreenMode::default(),
            notifications: NotificationRing::new(),
            reminders: ReminderTable::new(),
            ticker: TickerState::default(),
            telemetry: Telemetry::default(),
            calendar: CalendarView::default(),
            dirty,
            indications: Deque::new(),
        }
    }

    /// Show another screen; the title and whole body are redrawn
    pub fn switch_screen(&mut self, mode: ScreenMode) {
        if self.screen == ScreenMode::Calendar && mode != ScreenMode::Calendar {
            self.calendar.reset();
        }
        self.screen = mode;
        self.dirty.mark_dirty(Zone::Title);
        self.dirty.mark_all_content_dirty();
        self.indicate(Indication::Screen(mode));
    }

    /// Page the calendar by `delta` months
    ///
    /// Ignored unless the calendar is shown.
    pub fn page_calendar(&mut self, delta: i8) -> bool {
        if self.screen != ScreenMode::Calendar || delta == 0 {
            return false;
        }
        self.calendar.page(delta);
        self.dirty.mark_all_content_dirty();
        true
    }

    /// Queue an indicator request, dropping the oldest when full
    pub fn indicate(&mut self, indication: Indication) {
        if self.indications.is_full() {
            self.indications.pop_front();
        }
        let _ = self.indications.push_back(indication);
    }

    /// Take the oldest pending indicator request
    pub fn next_indication(&mut self) -> Option<Indication> {
        self.indications.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_screen_marks_title_and_content() {
        let mut state: SystemState = SystemState::new(ContentLayout::Slotted);
        for zone in Zone::ALL {
            state.dirty.clear(zone);
        }
        state.switch_screen(ScreenMode::Reminders);
        assert!(state.dirty.is_dirty(Zone::Title));
        assert!(state.dirty.is_dirty(Zone::Content1));
        assert!(state.dirty.is_dirty(Zone::Content3));
        assert!(!state.dirty.is_dirty(Zone::Clock));
        assert_eq!(
            state.next_indication(),
            Some(Indication::Screen(ScreenMode::Reminders))
        );
    }

    #[test]
    fn test_indication_queue_drops_oldest() {
        let mut state: SystemState = SystemState::new(ContentLayout::Single);
        for i in 0..(MAX_INDICATIONS as u8 + 2) {
            state.indicate(Indication::Blink {
                times: i,
                period_ms: 100,
            });
        }
        assert_eq!(
            state.next_indication(),
            Some(Indication::Blink {
                times: 2,
                period_ms: 100
            })
        );
    }

    #[test]
    fn test_screen_cycle() {
        assert_eq!(ScreenMode::Notifications.cycle(1), ScreenMode::Reminders);
        assert_eq!(ScreenMode::Notifications.cycle(-1), ScreenMode::Calendar);
        assert_eq!(ScreenMode::from_u8(2), Some(ScreenMode::Calendar));
        assert_eq!(ScreenMode::from_u8(3), None);
    }

    #[test]
    fn test_calendar_paging_wraps_years() {
        let mut view = CalendarView::default();
        let today = NaiveDate::from_ymd_opt(2026, 1, 20).unwrap();
        view.page(-1);
        assert_eq!(view.resolve(today), NaiveDate::from_ymd_opt(2025, 12, 1));
        view.page(14);
        assert_eq!(view.resolve(today), NaiveDate::from_ymd_opt(2027, 2, 1));
        view.reset();
        assert_eq!(view.resolve(today), NaiveDate::from_ymd_opt(2026, 1, 1));
    }

    #[test]
    fn test_page_calendar_only_on_calendar_screen() {
        let mut state: SystemState = SystemState::new(ContentLayout::Single);
        assert!(!state.page_calendar(1));
        state.switch_screen(ScreenMode::Calendar);
        assert!(state.page_calendar(1));
        state.switch_screen(ScreenMode::Notifications);
        assert_eq!(state.calendar, CalendarView::default());
    }
}
