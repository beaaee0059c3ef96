//! Incremental render scheduler
//!
//! Each tick drains the dirty zones in fixed order (Title, Clock, Status,
//! Content1..k), resolves what each one shows and hands it to the canvas.
//! A zone whose draw fails stays dirty and is retried on the next tick.

use heapless::String;

use crate::config::{ClockPolicy, DeviceConfig};
use crate::state::SystemState;
use crate::time::{self, local_time, EpochSecs, CLOCK_TEXT_LEN};
use crate::traits::{Canvas, CanvasError};

use super::clock::ClockFace;
use super::content::{body_content, header_content, ClockUpdate, ZoneContent};
use super::frame::Frame;
use super::zone::Zone;

/// What one scheduler tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RenderReport {
    drawn: u8,
    /// Clock update sent this tick, if any
    pub clock: Option<ClockUpdate>,
    /// First zone that failed to draw
    pub failed: Option<(Zone, CanvasError)>,
}

impl RenderReport {
    pub fn was_drawn(&self, zone: Zone) -> bool {
        self.drawn & (1 << zone as u8) != 0
    }

    /// Number of zones drawn
    pub fn drawn_count(&self) -> u32 {
        self.drawn.count_ones()
    }

    /// Zones drawn, in render order
    pub fn drawn(&self) -> impl Iterator<Item = Zone> + '_ {
        Zone::ALL.into_iter().filter(|z| self.was_drawn(*z))
    }

    fn record(&mut self, zone: Zone) {
        self.drawn |= 1 << zone as u8;
    }
}

/// Drains dirty zones into a canvas
#[derive(Debug, Clone)]
pub struct RenderScheduler {
    policy: ClockPolicy,
    utc_offset_minutes: i32,
    clock: ClockFace,
}

impl RenderScheduler {
    pub fn new(policy: ClockPolicy, utc_offset_minutes: i32) -> Self {
        Self {
            policy,
            utc_offset_minutes,
            clock: ClockFace::new(),
        }
    }

    pub fn from_config(config: &DeviceConfig) -> Self {
        Self::new(config.clock_policy, i32::from(config.utc_offset_minutes))
    }

    pub fn policy(&self) -> ClockPolicy {
        self.policy
    }

    /// Forget what is on screen; the next cycle redraws the clock in full
    pub fn invalidate(&mut self) {
        self.clock.invalidate();
    }

    /// Run one scheduler cycle
    ///
    /// The clock text is recomputed every cycle; its zone is marked dirty
    /// whenever the text differs from what was last drawn.
    pub fn tick<C: Canvas, const N: usize, const M: usize>(
        &mut self,
        state: &mut SystemState<N, M>,
        canvas: &mut C,
        wall: Option<EpochSecs>,
    ) -> RenderReport {
        let local = wall.and_then(|t| local_time(t, self.utc_offset_minutes));
        let clock_text: String<CLOCK_TEXT_LEN> =
            local.as_ref().map(time::clock_text).unwrap_or_default();

        if local.is_some() && self.clock.is_stale(&clock_text) {
            state.dirty.mark_dirty(Zone::Clock);
        }

        let active = state.reminders.active();
        let frame = Frame {
            screen: state.screen,
            layout: state.dirty.layout(),
            notifications: state.notifications.slots(),
            reminders: &active,
            ticker: &state.ticker,
            telemetry: &state.telemetry,
            now: wall,
            local,
            clock_text: &clock_text,
            calendar_month: local.and_then(|t| state.calendar.resolve(t.date_naive())),
        };

        let mut report = RenderReport::default();

        for zone in Zone::ALL {
            if !state.dirty.is_dirty(zone) {
                continue;
            }

            let content = match zone {
                Zone::Clock => {
                    // Nothing to show before the wall clock is set
                    let update = if local.is_some() {
                        self.clock.plan(&clock_text, self.policy)
                    } else {
                        None
                    };
                    update.map(ZoneContent::Clock)
                }
                z if z.is_content() => body_content(z, frame.screen, frame.layout),
                z => header_content(z, frame.screen, ClockUpdate::Full),
            };

            let Some(content) = content else {
                state.dirty.clear(zone);
                continue;
            };

            match canvas.draw(zone, content, &frame) {
                Ok(()) => {
                    state.dirty.clear(zone);
                    report.record(zone);
                    match zone {
                        Zone::Title => {
                            self.clock.invalidate();
                            state.dirty.mark_dirty(Zone::Clock);
                        }
                        Zone::Clock => {
                            self.clock.commit(&clock_text);
                            if let ZoneContent::Clock(update) = content {
                                report.clock = Some(update);
                            }
                        }
                        _ => {}
                    }
                }
                Err(e) => {
                    if zone == Zone::Clock {
                        self.clock.invalidate();
                    }
                    if report.failed.is_none() {
                        report.failed = Some((zone, e));
                    }
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec::Vec;

    use super::*;
    use crate::config::ContentLayout;
    use crate::state::ScreenMode;
    use crate::time::epoch_from_local;

    #[derive(Default)]
    struct RecordingCanvas {
        calls: Vec<(Zone, ZoneContent)>,
        fail: Option<Zone>,
    }

    impl Canvas for RecordingCanvas {
        fn draw(
            &mut self,
            zone: Zone,
            content: ZoneContent,
            _frame: &Frame<'_>,
        ) -> Result<(), CanvasError> {
            if self.fail == Some(zone) {
                return Err(CanvasError::Communication);
            }
            self.calls.push((zone, content));
            Ok(())
        }
    }

    fn clean_state(layout: ContentLayout) -> SystemState {
        let mut state = SystemState::new(layout);
        for zone in Zone::ALL {
            state.dirty.clear(zone);
        }
        state
    }

    fn wall() -> EpochSecs {
        epoch_from_local(2026, 10, 14, 9, 5, 330).unwrap()
    }

    #[test]
    fn test_double_mark_draws_once() {
        let mut state = clean_state(ContentLayout::Single);
        let mut canvas = RecordingCanvas::default();
        let mut scheduler = RenderScheduler::new(ClockPolicy::CellDiff, 330);

        state.dirty.mark_dirty(Zone::Status);
        state.dirty.mark_dirty(Zone::Status);
        let report = scheduler.tick(&mut state, &mut canvas, None);

        assert_eq!(canvas.calls.as_slice(), &[(Zone::Status, ZoneContent::Status)]);
        assert_eq!(report.drawn_count(), 1);
        assert!(!state.dirty.is_dirty(Zone::Status));

        // Idle tick draws nothing
        let report = scheduler.tick(&mut state, &mut canvas, None);
        assert_eq!(report.drawn_count(), 0);
        assert_eq!(canvas.calls.len(), 1);
    }

    #[test]
    fn test_title_forces_full_clock() {
        let mut state = clean_state(ContentLayout::Single);
        let mut canvas = RecordingCanvas::default();
        let mut scheduler = RenderScheduler::new(ClockPolicy::CellDiff, 330);

        scheduler.tick(&mut state, &mut canvas, Some(wall()));
        canvas.calls.clear();

        // Same second, title redrawn: clock must be redrawn in full
        state.dirty.mark_dirty(Zone::Title);
        scheduler.tick(&mut state, &mut canvas, Some(wall()));
        assert_eq!(
            canvas.calls.as_slice(),
            &[
                (Zone::Title, ZoneContent::Title(ScreenMode::Notifications)),
                (Zone::Clock, ZoneContent::Clock(ClockUpdate::Full)),
            ]
        );
    }

    #[test]
    fn test_clock_cell_diff_each_second() {
        let mut state = clean_state(ContentLayout::Single);
        let mut canvas = RecordingCanvas::default();
        let mut scheduler = RenderScheduler::new(ClockPolicy::CellDiff, 330);

        scheduler.tick(&mut state, &mut canvas, Some(wall()));
        scheduler.tick(&mut state, &mut canvas, Some(wall()));
        let report = scheduler.tick(&mut state, &mut canvas, Some(wall() + 1));

        assert_eq!(canvas.calls.len(), 2);
        assert_eq!(report.clock, Some(ClockUpdate::Cells(1 << 18)));
    }

    #[test]
    fn test_no_clock_before_sync() {
        let mut state = clean_state(ContentLayout::Single);
        let mut canvas = RecordingCanvas::default();
        let mut scheduler = RenderScheduler::new(ClockPolicy::CellDiff, 0);

        state.dirty.mark_dirty(Zone::Title);
        scheduler.tick(&mut state, &mut canvas, None);
        assert_eq!(canvas.calls.len(), 1);
        assert!(!state.dirty.is_dirty(Zone::Clock));
    }

    #[test]
    fn test_failed_zone_stays_dirty() {
        let mut state = clean_state(ContentLayout::Single);
        let mut canvas = RecordingCanvas {
            fail: Some(Zone::Content1),
            ..Default::default()
        };
        let mut scheduler = RenderScheduler::new(ClockPolicy::CellDiff, 0);

        state.dirty.mark_dirty(Zone::Status);
        state.dirty.mark_dirty(Zone::Content1);
        let report = scheduler.tick(&mut state, &mut canvas, None);

        assert_eq!(report.failed, Some((Zone::Content1, CanvasError::Communication)));
        assert!(report.was_drawn(Zone::Status));
        assert!(state.dirty.is_dirty(Zone::Content1));

        canvas.fail = None;
        let report = scheduler.tick(&mut state, &mut canvas, None);
        assert!(report.was_drawn(Zone::Content1));
        assert!(!state.dirty.any_dirty());
    }

    #[test]
    fn test_slotted_layout_splits_reminders() {
        let mut state = clean_state(ContentLayout::Slotted);
        let mut canvas = RecordingCanvas::default();
        let mut scheduler = RenderScheduler::new(ClockPolicy::CellDiff, 0);

        state.screen = ScreenMode::Reminders;
        state.dirty.mark_all_content_dirty();
        scheduler.tick(&mut state, &mut canvas, None);

        assert_eq!(
            canvas.calls.as_slice(),
            &[
                (Zone::Content1, ZoneContent::Reminders { first: 0, count: 2 }),
                (Zone::Content2, ZoneContent::Reminders { first: 2, count: 2 }),
                (Zone::Content3, ZoneContent::Reminders { first: 4, count: 1 }),
            ]
        );
    }
}
