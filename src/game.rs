use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, Show},
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEventKind,
    },
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::rngs::ThreadRng;
use std::io::{stdout, Write};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use wrapsnake::logic::GameLogic;
use wrapsnake::render::{Layout, Renderer};
use wrapsnake::snake::Direction;
use wrapsnake::store::ScoreStore;
use wrapsnake::swipe::{SwipeTracker, DEFAULT_WINDOW};

// Mouse drags move in whole terminal cells, far coarser than touch pixels.
const SWIPE_MIN_DIFFERENCE: i32 = 2;

pub type Logic = GameLogic<Box<dyn ScoreStore>, ThreadRng>;

enum Control {
    Turn(Direction),
    Quit,
    Ignore,
}

pub struct Game {
    logic: Logic,
    renderer: Renderer,
    swipe: SwipeTracker,
    frame_time: Duration,
    quit: bool,
}

impl Game {
    /// Sizes the board for the current terminal. Fails when the board
    /// cannot fit at one character row per cell.
    pub fn new(logic: Logic) -> Result<Self> {
        let terminal_size = terminal::size().context("failed to read terminal size")?;
        let layout = Layout::new(terminal_size, logic.settings().board_size)?;
        let frame_time = logic.settings().frame_time();
        info!(
            ?terminal_size,
            cell_size = layout.cell_size(),
            frame_ms = frame_time.as_millis() as u64,
            "board laid out"
        );

        Ok(Game {
            logic,
            renderer: Renderer::new(layout, frame_time),
            swipe: SwipeTracker::new(DEFAULT_WINDOW, SWIPE_MIN_DIFFERENCE),
            frame_time,
            quit: false,
        })
    }

    pub fn logic(&self) -> &Logic {
        &self.logic
    }

    fn update(&mut self) -> Result<()> {
        self.logic.tick();
        let mut stdout = stdout();
        self.renderer.draw_frame(&mut stdout, &self.logic.snapshot())?;
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => match translate_key(key) {
                Control::Turn(direction) => self.logic.handle_control(direction),
                Control::Quit => self.quit = true,
                Control::Ignore => {}
            },
            Event::Mouse(mouse) => {
                let (x, y) = (i32::from(mouse.column), i32::from(mouse.row));
                match mouse.kind {
                    MouseEventKind::Down(_) => self.swipe.start(x, y),
                    MouseEventKind::Drag(_) => {
                        if let Some(direction) = self.swipe.track(x, y) {
                            self.logic.handle_control(direction);
                        }
                    }
                    _ => {}
                }
            }
            Event::Resize(columns, rows) => {
                match Layout::new((columns, rows), self.logic.settings().board_size) {
                    Ok(layout) => self.renderer.set_layout(layout),
                    Err(err) => warn!(error = %err, "keeping previous layout after resize"),
                }
            }
            _ => {}
        }
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut next_tick = Instant::now();

        loop {
            // Drain input every pass; at a zero period a tick is always due.
            while event::poll(Duration::ZERO)? {
                let event = event::read()?;
                self.handle_event(event);
            }
            if self.quit {
                break;
            }

            match time_until_tick(Instant::now(), next_tick) {
                None => {
                    self.update()?;
                    next_tick = reschedule(next_tick, Instant::now(), self.frame_time);
                }
                Some(wait) => {
                    if event::poll(wait)? {
                        let event = event::read()?;
                        self.handle_event(event);
                    }
                }
            }
        }
        Ok(())
    }

    pub fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        execute!(stdout(), EnterAlternateScreen, EnableMouseCapture, Hide)
            .context("failed to prepare terminal")?;

        let result = self.event_loop();

        if let Err(err) = execute!(stdout(), Show, DisableMouseCapture, LeaveAlternateScreen) {
            tracing::error!(?err, "failed to restore terminal screen");
        }
        if let Err(err) = terminal::disable_raw_mode() {
            tracing::error!(?err, "failed to disable raw mode");
        }
        stdout().flush()?;

        result
    }
}

/// How long to wait for input before the tick at `next_tick` is due, or
/// `None` when it is due now.
fn time_until_tick(now: Instant, next_tick: Instant) -> Option<Duration> {
    next_tick
        .checked_duration_since(now)
        .filter(|wait| !wait.is_zero())
}

/// Next tick after the one scheduled at `scheduled` finished at `finished`.
/// A late tick restarts the schedule from `finished` instead of bursting.
fn reschedule(scheduled: Instant, finished: Instant, frame_time: Duration) -> Instant {
    let next = scheduled + frame_time;
    if next <= finished {
        finished + frame_time
    } else {
        next
    }
}

fn translate_key(key: KeyEvent) -> Control {
    if key.kind == KeyEventKind::Release {
        return Control::Ignore;
    }
    match key.code {
        KeyCode::Up | KeyCode::Char('w') => Control::Turn(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') => Control::Turn(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') => Control::Turn(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') => Control::Turn(Direction::Right),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Control::Quit,
        KeyCode::Char('q') | KeyCode::Esc => Control::Quit,
        _ => Control::Ignore,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_and_wasd_steer() {
        for (code, expected) in [
            (KeyCode::Up, Direction::Up),
            (KeyCode::Char('s'), Direction::Down),
            (KeyCode::Left, Direction::Left),
            (KeyCode::Char('d'), Direction::Right),
        ] {
            match translate_key(press(code)) {
                Control::Turn(direction) => assert_eq!(direction, expected),
                _ => panic!("{code:?} should steer"),
            }
        }
    }

    #[test]
    fn quit_keys() {
        assert!(matches!(translate_key(press(KeyCode::Char('q'))), Control::Quit));
        assert!(matches!(translate_key(press(KeyCode::Esc)), Control::Quit));
        assert!(matches!(
            translate_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Control::Quit
        ));
        assert!(matches!(translate_key(press(KeyCode::Char('c'))), Control::Ignore));
    }

    #[test]
    fn tick_is_due_once_its_time_has_come() {
        let now = Instant::now();
        let later = now + Duration::from_millis(40);
        assert_eq!(time_until_tick(now, later), Some(Duration::from_millis(40)));
        assert_eq!(time_until_tick(later, later), None);
        assert_eq!(time_until_tick(later, now), None);
    }

    #[test]
    fn on_time_ticks_keep_a_fixed_period() {
        let start = Instant::now();
        let frame = Duration::from_millis(100);
        let next = reschedule(start, start + Duration::from_millis(5), frame);
        assert_eq!(next, start + frame);
        assert!(time_until_tick(start + Duration::from_millis(5), next).is_some());
    }

    #[test]
    fn late_ticks_restart_from_now() {
        let start = Instant::now();
        let frame = Duration::from_millis(100);
        let finished = start + Duration::from_millis(350);
        assert_eq!(reschedule(start, finished, frame), finished + frame);
    }

    #[test]
    fn zero_frame_time_is_due_every_pass() {
        // Speeds above 1000 floor to a zero period; the loop still drains
        // input before each of these ticks.
        let start = Instant::now();
        let next = reschedule(start, start, Duration::ZERO);
        assert_eq!(next, start);
        assert_eq!(time_until_tick(start, next), None);
    }

    #[test]
    fn key_release_is_ignored() {
        let mut key = press(KeyCode::Up);
        key.kind = KeyEventKind::Release;
        assert!(matches!(translate_key(key), Control::Ignore));
    }
}
