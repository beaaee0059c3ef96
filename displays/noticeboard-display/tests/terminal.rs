//! Rendering the Noticeboard onto an in-memory terminal

use noticeboard_core::command::Command;
use noticeboard_core::config::{ContentLayout, DeviceConfig};
use noticeboard_core::engine::TickerState;
use noticeboard_core::entity::{bounded, Notification, Priority, ReminderTable};
use noticeboard_core::render::{Frame, Zone, ZoneContent};
use noticeboard_core::state::{ReminderEvent, ScreenMode, Telemetry};
use noticeboard_core::storage::{encode, record_len, HEADER_LEN};
use noticeboard_core::time::{epoch_from_local, EpochSecs};
use noticeboard_core::traits::{Canvas, Clock, Store, StoreError};
use noticeboard_core::Noticeboard;
use noticeboard_display::{Screen, ZoneCanvas};
use proptest::prelude::*;

#[derive(Default)]
struct NullStore;

impl Store for NullStore {
    fn put(&mut self, _key: &str, _bytes: &[u8]) -> Result<(), StoreError> {
        Ok(())
    }

    fn get(&mut self, _key: &str, _buf: &mut [u8]) -> Result<Option<usize>, StoreError> {
        Ok(None)
    }
}

/// Serves one fixed reminder record
struct RecordStore {
    record: Vec<u8>,
}

impl Store for RecordStore {
    fn put(&mut self, _key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        self.record = bytes.to_vec();
        Ok(())
    }

    fn get(&mut self, _key: &str, buf: &mut [u8]) -> Result<Option<usize>, StoreError> {
        let len = self.record.len();
        if len > buf.len() {
            return Err(StoreError::BufferTooSmall);
        }
        buf[..len].copy_from_slice(&self.record);
        Ok(Some(len))
    }
}

/// Record with one triggered, repeating reminder in slot 0
fn triggered_record(due: EpochSecs) -> Vec<u8> {
    let mut table: ReminderTable<10> = ReminderTable::new();
    let id = table
        .insert(bounded("Stretch", 63), Some(due), 5, Priority::Normal)
        .unwrap();
    table.get_mut(id).unwrap().apply(ReminderEvent::Due, due);
    table
        .insert(bounded("Water plants", 63), Some(due + 3600), 0, Priority::Normal)
        .unwrap();
    let mut record = vec![0u8; record_len(10)];
    encode(&table, &mut record).unwrap();
    record
}

const SLOT_DUE: usize = HEADER_LEN + 4;
const SLOT_REVIEW: usize = HEADER_LEN + 12;

fn render_every_screen<S: Store>(
    board: &mut Noticeboard,
    canvas: &mut ZoneCanvas<Screen>,
    store: &mut S,
    clock: &TestClock,
) {
    for screen in [ScreenMode::Reminders, ScreenMode::Calendar, ScreenMode::Notifications] {
        board.handle(Command::SwitchScreen(screen), store, clock);
        board.poll(store, clock);
        board.render(canvas, clock);
    }
}

struct TestClock {
    millis: u64,
    epoch: Option<EpochSecs>,
}

impl TestClock {
    fn advance(&mut self, secs: i64) {
        self.millis += secs as u64 * 1000;
        self.epoch = self.epoch.map(|t| t + secs);
    }
}

impl Clock for TestClock {
    fn now_millis(&self) -> u64 {
        self.millis
    }

    fn now_epoch(&self) -> Option<EpochSecs> {
        self.epoch
    }
}

const IST: i32 = 330;

fn at(hour: u32, minute: u32) -> EpochSecs {
    epoch_from_local(2026, 10, 14, hour, minute, IST).unwrap()
}

fn setup(config: DeviceConfig) -> (Noticeboard, ZoneCanvas<Screen>, NullStore, TestClock) {
    let canvas = ZoneCanvas::from_config(Screen::new(), &config);
    let clock = TestClock {
        millis: 5_000,
        epoch: Some(at(9, 0)),
    };
    (Noticeboard::new(config), canvas, NullStore, clock)
}

fn note(app: &str, message: &str, priority: Priority) -> Command {
    Command::AddNotification(Notification {
        app: bounded(app, 16),
        sender: bounded("Sam", 32),
        message: bounded(message, 64),
        priority,
    })
}

#[test]
fn first_frame_fills_header_and_body() {
    let (mut board, mut canvas, _store, clock) = setup(DeviceConfig::default());
    board.render(&mut canvas, &clock);

    let screen = canvas.backend();
    assert_eq!(screen.span(0, 0, 13).as_str(), "Notifications");
    assert_eq!(screen.span(0, 21, 40).as_str(), "Wed,14-Oct,09:00:00");
    assert_eq!(screen.row(1).as_str(), "| Nothing playing");
    assert_eq!(screen.row(2).chars().count(), 40);
    assert_eq!(screen.row(3).as_str(), "No notifications");
}

#[test]
fn clock_tick_redraws_changed_cells_only() {
    let (mut board, mut canvas, _store, mut clock) = setup(DeviceConfig::default());
    board.render(&mut canvas, &clock);
    canvas.backend_mut().take_dirty_rows();
    let draws = canvas.backend().text_draws();

    clock.advance(1);
    let report = board.render(&mut canvas, &clock);

    assert!(report.was_drawn(Zone::Clock));
    assert_eq!(canvas.backend().text_draws(), draws + 1);
    assert_eq!(canvas.backend_mut().take_dirty_rows(), 0b1);
    assert_eq!(canvas.backend().span(0, 21, 40).as_str(), "Wed,14-Oct,09:00:01");

    // 09:00:59 -> 09:01:00 touches two separate runs
    clock.advance(58);
    board.render(&mut canvas, &clock);
    let draws = canvas.backend().text_draws();
    clock.advance(1);
    board.render(&mut canvas, &clock);
    assert_eq!(canvas.backend().text_draws(), draws + 2);
    assert_eq!(canvas.backend().span(0, 21, 40).as_str(), "Wed,14-Oct,09:01:00");
}

#[test]
fn whole_string_policy_draws_once() {
    let mut config = DeviceConfig::default();
    config.clock_policy = noticeboard_core::config::ClockPolicy::WholeString;
    let (mut board, mut canvas, _store, mut clock) = setup(config);
    board.render(&mut canvas, &clock);
    let draws = canvas.backend().text_draws();

    clock.advance(60);
    board.render(&mut canvas, &clock);
    assert_eq!(canvas.backend().text_draws(), draws + 1);
    assert_eq!(canvas.backend().span(0, 21, 40).as_str(), "Wed,14-Oct,09:01:00");
}

#[test]
fn high_priority_notification_is_highlighted() {
    let (mut board, mut canvas, mut store, clock) = setup(DeviceConfig::default());
    board.render(&mut canvas, &clock);

    board.handle(note("Slack", "Build is green", Priority::High), &mut store, &clock);
    board.render(&mut canvas, &clock);

    let screen = canvas.backend();
    assert_eq!(screen.row(3).as_str(), "Slack  Sam");
    assert!(screen.is_inverted(3, 0));
    assert!(screen.is_inverted(3, 4));
    assert!(!screen.is_inverted(3, 5));
    assert_eq!(screen.row(4).as_str(), "Build is green");
}

#[test]
fn long_notification_wraps_to_third_row() {
    let (mut board, mut canvas, mut store, clock) = setup(DeviceConfig::default());
    let message = "0123456789012345678901234567890123456789tail";
    board.handle(note("Mail", message, Priority::Normal), &mut store, &clock);
    board.render(&mut canvas, &clock);

    let screen = canvas.backend();
    assert_eq!(screen.row(4).as_str(), &message[..40]);
    assert_eq!(screen.row(5).as_str(), "tail");
}

#[test]
fn newest_notification_on_top() {
    let (mut board, mut canvas, mut store, clock) = setup(DeviceConfig::default());
    board.handle(note("One", "first", Priority::Normal), &mut store, &clock);
    board.handle(note("Two", "second", Priority::Normal), &mut store, &clock);
    board.render(&mut canvas, &clock);

    let screen = canvas.backend();
    assert_eq!(screen.row(3).as_str(), "Two  Sam");
    assert_eq!(screen.row(6).as_str(), "One  Sam");
    assert_eq!(screen.row(7).as_str(), "first");
}

#[test]
fn reminders_show_countdown_then_due() {
    let (mut board, mut canvas, mut store, mut clock) = setup(DeviceConfig::default());
    board.handle(
        Command::AddReminder {
            message: bounded("Stand-up", 63),
            due_at: Some(at(9, 30)),
            repeat_minutes: 0,
            priority: Priority::Normal,
        },
        &mut store,
        &clock,
    );
    board.handle(Command::SwitchScreen(ScreenMode::Reminders), &mut store, &clock);
    board.render(&mut canvas, &clock);

    assert_eq!(canvas.backend().span(0, 0, 9).as_str(), "Reminders");
    assert_eq!(canvas.backend().row(3).as_str(), "  1 in 30m");
    assert_eq!(canvas.backend().row(4).as_str(), "    Stand-up");

    clock.advance(30 * 60);
    board.poll(&mut store, &clock);
    board.render(&mut canvas, &clock);

    let screen = canvas.backend();
    assert_eq!(screen.row(3).as_str(), "  1 DUE");
    assert!(screen.is_inverted(3, 4));
    assert!(screen.is_inverted(3, 6));
}

#[test]
fn switching_screen_clears_previous_body() {
    let (mut board, mut canvas, mut store, clock) = setup(DeviceConfig::default());
    let message = "0123456789012345678901234567890123456789tail";
    board.handle(note("Mail", message, Priority::Normal), &mut store, &clock);
    board.handle(note("Chat", "hi", Priority::Normal), &mut store, &clock);
    board.handle(note("News", "ok", Priority::Normal), &mut store, &clock);
    board.render(&mut canvas, &clock);
    // Third slot wraps onto row 11, below the calendar grid
    assert_eq!(canvas.backend().row(11).as_str(), "tail");

    board.handle(Command::SwitchScreen(ScreenMode::Calendar), &mut store, &clock);
    board.render(&mut canvas, &clock);

    let screen = canvas.backend();
    assert_eq!(screen.row(3).trim_start(), "October 2026");
    for row in 11..14 {
        assert_eq!(screen.row(row).as_str(), "", "row {row}");
    }
}

#[test]
fn calendar_marks_today() {
    let (mut board, mut canvas, mut store, clock) = setup(DeviceConfig::default());
    board.handle(Command::SwitchScreen(ScreenMode::Calendar), &mut store, &clock);
    board.render(&mut canvas, &clock);

    let screen = canvas.backend();
    assert_eq!(screen.row(3).trim_start(), "October 2026");
    assert_eq!(screen.span(4, 9, 29).as_str(), "Mo Tu We Th Fr Sa Su");
    // October 2026 starts on a Thursday
    assert_eq!(screen.span(5, 18, 20).as_str(), " 1");
    assert_eq!(screen.span(7, 15, 17).as_str(), "14");
    assert!(screen.is_inverted(7, 15));
    assert!(screen.is_inverted(7, 16));
    assert!(!screen.is_inverted(7, 18));

    board.handle(Command::PageCalendar(1), &mut store, &clock);
    board.render(&mut canvas, &clock);
    let screen = canvas.backend();
    assert_eq!(screen.row(3).trim_start(), "November 2026");
    assert!(!screen.is_inverted(7, 15));
}

#[test]
fn calendar_waits_for_clock() {
    let (mut board, mut canvas, mut store, mut clock) = setup(DeviceConfig::default());
    clock.epoch = None;
    board.handle(Command::SwitchScreen(ScreenMode::Calendar), &mut store, &clock);
    board.render(&mut canvas, &clock);

    assert_eq!(canvas.backend().row(3).as_str(), "Clock not set");
    assert_eq!(canvas.backend().span(0, 21, 40).trim_end(), "");
}

#[test]
fn gaming_mode_shows_telemetry() {
    let (mut board, mut canvas, mut store, clock) = setup(DeviceConfig::default());
    board.handle(Command::SetGamingMode(true), &mut store, &clock);
    board.handle(
        Command::UpdatePcStats(Telemetry {
            gaming_mode: true,
            cpu_temp_c: 61,
            cpu_usage_pct: 35,
            cpu_ghz_x10: 42,
            ram_used_gb: 12,
            ram_total_gb: 32,
            gpu_temp_c: 70,
            gpu_usage_pct: 99,
            net_down_x10: 125,
            net_up_x10: 34,
        }),
        &mut store,
        &clock,
    );
    board.render(&mut canvas, &clock);

    assert_eq!(
        canvas.backend().row(1).as_str(),
        "61C 35% 4.2G|70C 99%|12G|v12 ^3.4"
    );
}

#[test]
fn slotted_layout_keeps_slots_apart() {
    let config = DeviceConfig {
        layout: ContentLayout::Slotted,
        ..DeviceConfig::default()
    };
    let (mut board, mut canvas, mut store, clock) = setup(config);
    board.handle(note("One", "first", Priority::Normal), &mut store, &clock);
    board.render(&mut canvas, &clock);
    board.handle(note("Two", "second", Priority::Normal), &mut store, &clock);
    board.render(&mut canvas, &clock);

    let screen = canvas.backend();
    assert_eq!(screen.row(3).as_str(), "Two  Sam");
    assert_eq!(screen.row(6).as_str(), "One  Sam");
    assert_eq!(screen.row(9).as_str(), "");
}

fn ticker_frame<'a>(ticker: &'a TickerState, telemetry: &'a Telemetry) -> Frame<'a> {
    Frame {
        screen: ScreenMode::Notifications,
        layout: ContentLayout::Single,
        notifications: &[],
        reminders: &[],
        ticker,
        telemetry,
        now: None,
        local: None,
        clock_text: "",
        calendar_month: None,
    }
}

fn playing(song: &str, artist: &str, scroll_px: u32, disc_frame: u8) -> TickerState {
    let mut ticker = TickerState::default();
    ticker.active = true;
    ticker.song = bounded(song, 64);
    ticker.artist = bounded(artist, 48);
    ticker.scroll_px = scroll_px;
    ticker.disc_frame = disc_frame;
    ticker
}

#[test]
fn ticker_window_follows_scroll_offset() {
    let ticker = playing("A very long song title that keeps going", "Someone", 16, 1);
    let telemetry = Telemetry::default();
    let mut canvas = ZoneCanvas::new(Screen::new(), 8);
    canvas
        .draw(Zone::Status, ZoneContent::Status, &ticker_frame(&ticker, &telemetry))
        .unwrap();

    let text = ticker.text();
    let expected: String = text.chars().skip(2).take(38).collect();
    let row = canvas.backend().span(1, 0, 40);
    assert_eq!(&row[..2], "/ ");
    assert_eq!(&row[2..], expected.as_str());
}

#[test]
fn short_title_is_not_scrolled() {
    let ticker = playing("Yellow", "Coldplay", 40, 2);
    let telemetry = Telemetry::default();
    let mut canvas = ZoneCanvas::new(Screen::new(), 8);
    canvas
        .draw(Zone::Status, ZoneContent::Status, &ticker_frame(&ticker, &telemetry))
        .unwrap();
    assert_eq!(canvas.backend().row(1).as_str(), "- Yellow - Coldplay");
}

proptest! {
    #[test]
    fn ticker_line_stays_in_one_row(
        song in "\\PC{0,64}",
        artist in "\\PC{0,48}",
        scroll_px in 0u32..10_000,
        disc_frame in any::<u8>(),
    ) {
        let ticker = playing(&song, &artist, scroll_px, disc_frame);
        let telemetry = Telemetry::default();
        let mut canvas = ZoneCanvas::new(Screen::new(), 8);
        let result = canvas.draw(Zone::Status, ZoneContent::Status, &ticker_frame(&ticker, &telemetry));
        prop_assert!(result.is_ok());
        prop_assert_eq!(canvas.backend_mut().take_dirty_rows(), 0b10);
    }

    #[test]
    fn stored_timestamps_never_break_rendering(
        due in any::<i64>(),
        review in any::<i64>(),
    ) {
        let mut record = triggered_record(at(8, 0));
        record[SLOT_DUE..SLOT_DUE + 8].copy_from_slice(&due.to_le_bytes());
        record[SLOT_REVIEW..SLOT_REVIEW + 8].copy_from_slice(&review.to_le_bytes());
        let mut store = RecordStore { record };

        let (mut board, mut canvas, _, clock) = setup(DeviceConfig::default());
        let report = board.load(&mut store).unwrap();
        prop_assert_eq!(report.loaded + report.rejected, 2);
        for r in board.state().reminders.iter() {
            prop_assert!(r.due_at.map_or(true, |t| (0..=253_402_300_799).contains(&t)));
            prop_assert!(r.next_review_at.map_or(true, |t| (0..=253_402_300_799).contains(&t)));
        }

        render_every_screen(&mut board, &mut canvas, &mut store, &clock);
    }

    #[test]
    fn any_wall_clock_renders(epoch in any::<i64>()) {
        let mut store = RecordStore { record: triggered_record(at(8, 0)) };
        let (mut board, mut canvas, _, _) = setup(DeviceConfig::default());
        board.load(&mut store).unwrap();
        let clock = TestClock { millis: 5_000, epoch: Some(epoch) };

        render_every_screen(&mut board, &mut canvas, &mut store, &clock);
    }
}

#[test]
fn extreme_timestamps_render_without_countdown_overflow() {
    let mut record = triggered_record(at(8, 0));
    record[SLOT_DUE..SLOT_DUE + 8].copy_from_slice(&i64::MIN.to_le_bytes());
    let mut store = RecordStore { record };
    let (mut board, mut canvas, _, _) = setup(DeviceConfig::default());

    let report = board.load(&mut store).unwrap();
    assert_eq!((report.loaded, report.rejected), (1, 1));

    for epoch in [i64::MIN, -1, 0, i64::MAX] {
        let clock = TestClock { millis: 5_000, epoch: Some(epoch) };
        render_every_screen(&mut board, &mut canvas, &mut store, &clock);
    }
    // Wall clock out of range reads as unset
    assert_eq!(canvas.backend().span(0, 21, 40).trim(), "--:--:--");
}
