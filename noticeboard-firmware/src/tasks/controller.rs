//! Main controller task
//!
//! Owns the application. Each wake-up, from a control event or the
//! scheduler tick, applies at most one event, runs the timers, draws dirty
//! zones and forwards indicator requests.

use defmt::*;
use embassy_futures::select::{select, Either};
use heapless::Vec;

use noticeboard_core::command::{Command, Reply};
use noticeboard_core::config::DeviceConfig;
use noticeboard_core::engine::TickOutcome;
use noticeboard_core::entity::MAX_REMINDERS;
use noticeboard_core::render::RenderReport;
use noticeboard_core::state::{Indication, ScreenMode};
use noticeboard_core::traits::{CanvasError, Indicator};
use noticeboard_core::Noticeboard;
use noticeboard_display::{DisplayBackend, ZoneCanvas};
use noticeboard_protocol::{HostReply, HostRequest, InputEvent, Packet};

use crate::adapters::{BoardClock, FlashStore, LedIndicator, TerminalLink};
use crate::channels::{ControlEvent, CONTROL, HOST_TX};
use crate::tasks::tick::TICK_SIGNAL;

/// Reply packets for one request: a full listing plus its terminator
const MAX_REPLY_PACKETS: usize = MAX_REMINDERS + 1;

struct Controller {
    board: Noticeboard,
    store: FlashStore,
    clock: BoardClock,
    canvas: ZoneCanvas<TerminalLink>,
    indicator: LedIndicator,
}

#[embassy_executor::task]
pub async fn controller_task(config: DeviceConfig, store: FlashStore) {
    info!("Controller task started");

    let board: Noticeboard = Noticeboard::new(config);
    let canvas = ZoneCanvas::from_config(TerminalLink::new(), board.config());
    let mut controller = Controller {
        board,
        store,
        clock: BoardClock::new(),
        canvas,
        indicator: LedIndicator,
    };
    controller.restore();

    loop {
        match select(CONTROL.receive(), TICK_SIGNAL.wait()).await {
            Either::First(event) => controller.handle_event(event).await,
            Either::Second(_now_ms) => {}
        }
        controller.step();
    }
}

impl Controller {
    fn restore(&mut self) {
        match self.board.load(&mut self.store) {
            Ok(report) => {
                info!(
                    "Restored {} reminders ({} rejected, {} over capacity)",
                    report.loaded, report.rejected, report.dropped
                );
                if report.rejected > 0 {
                    warn!("{} reminder slots failed validation", report.rejected);
                }
            }
            Err(e) => warn!("Reminder record unusable: {:?}, starting empty", e),
        }
        let screen = self.board.state().screen;
        self.indicator.apply(Indication::Screen(screen));
    }

    /// Timers, then rendering, then indicator requests
    fn step(&mut self) {
        let outcome = self.board.poll(&mut self.store, &self.clock);
        log_outcome(&outcome);

        let report = self.board.render(&mut self.canvas, &self.clock);
        log_report(&report);

        self.board.drain_indications(&mut self.indicator);
    }

    async fn handle_event(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::Host(request) => self.handle_host(request).await,
            ControlEvent::Input(input) => self.handle_input(input),
            ControlEvent::ClearButton => {
                info!("Button: clear notifications");
                self.apply(Command::ClearNotifications);
            }
            ControlEvent::TerminalAttached => {
                info!(
                    "Terminal attached, redrawing ({} messages sent so far)",
                    self.canvas.backend().queued()
                );
                if let Err(e) = self.canvas.backend_mut().clear() {
                    warn!("Terminal clear failed: {:?}", e);
                }
                self.board.redraw_all();
            }
        }
    }

    async fn handle_host(&mut self, request: HostRequest) {
        let command = match request {
            HostRequest::SetTime(epoch) => {
                info!("Clock set to {}", epoch);
                self.clock.set_time(epoch);
                // Countdowns and the calendar depend on the date
                self.board.redraw_all();
                send_reply(HostReply::Ok).await;
                return;
            }
            HostRequest::PcStats(stats) => {
                Command::UpdatePcStats(stats.apply(self.board.state().telemetry))
            }
            HostRequest::Command(command) => command,
        };

        debug!("Host command: {}", command.name());
        let reply = self.board.handle(command, &mut self.store, &self.clock);
        if let Reply::Error(e) = &reply {
            debug!("Command rejected: {:?}", e);
        }

        let mut packets: Vec<Packet, MAX_REPLY_PACKETS> = Vec::new();
        HostReply::for_reply(&reply, |r| match r.encode() {
            Ok(packet) => {
                if packets.push(packet).is_err() {
                    warn!("Reply too long, truncating");
                }
            }
            Err(e) => warn!("Reply encode failed: {:?}", e),
        });
        for packet in packets {
            HOST_TX.send(packet).await;
        }
    }

    /// Knob: turn to change screen (or month on the calendar), press to
    /// clear notifications or move on, hold to go home
    fn handle_input(&mut self, input: InputEvent) {
        let screen = self.board.state().screen;
        let command = match input {
            InputEvent::TurnCw | InputEvent::TurnCcw => {
                let delta = input.detents();
                if screen == ScreenMode::Calendar {
                    Command::PageCalendar(delta)
                } else {
                    Command::SwitchScreen(screen.cycle(delta))
                }
            }
            InputEvent::Press if screen == ScreenMode::Notifications => {
                Command::ClearNotifications
            }
            InputEvent::Press => Command::SwitchScreen(screen.cycle(1)),
            InputEvent::LongPress => Command::SwitchScreen(ScreenMode::Notifications),
            InputEvent::Release => return,
        };
        self.apply(command);
    }

    fn apply(&mut self, command: Command) {
        debug!("Local command: {}", command.name());
        let reply = self.board.handle(command, &mut self.store, &self.clock);
        if !reply.is_ok() {
            warn!("Local command failed: {:?}", reply);
        }
    }
}

async fn send_reply(reply: HostReply<'_>) {
    match reply.encode() {
        Ok(packet) => HOST_TX.send(packet).await,
        Err(e) => warn!("Reply encode failed: {:?}", e),
    }
}

fn log_outcome(outcome: &TickOutcome) {
    if outcome.triggered > 0 || outcome.reviewed > 0 {
        info!(
            "Reminders: {} triggered, {} follow-ups",
            outcome.triggered, outcome.reviewed
        );
    }
    if outcome.persisted {
        debug!("Reminder record handed to storage");
    }
    if let Some(e) = outcome.store_error {
        warn!("Reminder record not saved: {:?}, will retry", e);
    }
}

fn log_report(report: &RenderReport) {
    if report.drawn_count() > 0 {
        trace!("Drew {} zones", report.drawn_count());
    }
    match report.failed {
        // Expected while the terminal is detached or its queue is full
        Some((_, CanvasError::Busy)) | None => {}
        Some((zone, e)) => warn!("Zone {:?} draw failed: {:?}", zone, e),
    }
}
