use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, info};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

use crate::clock::GameClock;
use crate::config::GameConfig;
use crate::difficulty::as_duration;
use crate::error::ConfigError;
use crate::input::{command_for_key, Command};
use crate::render::{CanvasRenderer, PixelSurface, Renderer, Rgb, Surface};
use crate::score_store::ScoreStore;
use crate::session::{GameSession, SessionObserver, Snapshot, Status, TickOutcome};

/// How long to wait for a key while no clock is armed.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Where inside a cell the board is sampled. Each cell becomes two
/// half-block glyphs, so four samples per cell.
const SAMPLES: [f32; 2] = [0.3, 0.7];

/// Rows above the board.
const HEADER_ROWS: u16 = 1;

impl From<Rgb> for Color {
    fn from(Rgb(r, g, b): Rgb) -> Self {
        Color::Rgb { r, g, b }
    }
}

/// Collects session events for the status line.
#[derive(Debug, Default)]
struct Hud {
    banner: Option<String>,
    dirty: bool,
}

impl SessionObserver for Hud {
    fn on_score_changed(&mut self, score: u32) {
        debug!("score {score}");
    }

    fn on_game_over(&mut self, final_score: u32, is_new_high_score: bool) {
        self.banner = Some(if is_new_high_score {
            format!("Game over! Score: {final_score}  New record!")
        } else {
            format!("Game over! Score: {final_score}")
        });
    }

    fn on_won(&mut self, final_score: u32, is_new_high_score: bool) {
        self.banner = Some(if is_new_high_score {
            format!("The board is full, you win! Score: {final_score}  New record!")
        } else {
            format!("The board is full, you win! Score: {final_score}")
        });
    }

    fn on_tick(&mut self, _snapshot: &Snapshot) {
        self.dirty = true;
    }
}

/// One game session hosted in the terminal.
pub struct Game {
    session: GameSession,
    clock: GameClock,
    renderer: CanvasRenderer,
    surface: PixelSurface,
    hud: Hud,
    quit: bool,
}

impl Game {
    pub fn new(config: &GameConfig, store: Box<dyn ScoreStore>) -> Result<Self, ConfigError> {
        let session = GameSession::new(config, store)?;
        let side = config.surface_size() as usize;
        Ok(Game {
            session,
            clock: GameClock::new(),
            renderer: CanvasRenderer::new(config.cell_size),
            surface: PixelSurface::new(side, side),
            hud: Hud {
                banner: None,
                dirty: true,
            },
            quit: false,
        })
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, Hide)?;

        let result = self.event_loop();

        // Restore the terminal even if the loop failed.
        let restored = execute!(stdout(), Show, LeaveAlternateScreen)
            .and_then(|()| terminal::disable_raw_mode());
        result.and(restored)
    }

    fn event_loop(&mut self) -> io::Result<()> {
        let mut out = stdout();

        while !self.quit {
            if self.hud.dirty {
                self.draw(&mut out)?;
                self.hud.dirty = false;
            }

            let timeout = self
                .clock
                .time_until_due(Instant::now())
                .unwrap_or(IDLE_POLL);
            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind != KeyEventKind::Release => {
                        if let Some(command) = command_for_key(key.code) {
                            self.handle(command);
                        }
                    }
                    Event::Resize(..) => self.hud.dirty = true,
                    _ => {}
                }
            }

            if self.clock.poll(Instant::now()) {
                self.tick();
            }
        }

        info!(
            "quitting with score {} (best {})",
            self.session.score(),
            self.session.high_score()
        );
        Ok(())
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Steer(direction) => {
                self.session.set_direction(direction);
            }
            Command::Start => match self.session.status() {
                Status::Idle => {
                    self.session.start(&mut self.hud);
                    self.arm_clock();
                }
                Status::GameOver | Status::Won => {
                    self.hud.banner = None;
                    self.session.restart(&mut self.hud);
                    self.arm_clock();
                }
                Status::Running => {}
            },
            Command::Quit => self.quit = true,
        }
    }

    fn arm_clock(&mut self) {
        self.clock.start(as_duration(self.session.speed_ms()), Instant::now());
    }

    fn tick(&mut self) {
        let outcome = self.session.advance(&mut self.hud);
        debug!("tick: {outcome:?}");
        match outcome {
            TickOutcome::Ate {
                new_interval: Some(interval),
                ..
            } => self.clock.reschedule(as_duration(interval), Instant::now()),
            TickOutcome::Collided(_) | TickOutcome::Won | TickOutcome::Inactive => {
                self.clock.stop()
            }
            TickOutcome::Moved | TickOutcome::Ate { .. } => {}
        }
    }

    /// Board width and height in terminal cells, plus header and footer.
    fn required_size(&self) -> (u16, u16) {
        let side = u16::try_from(self.session.grid().size()).unwrap_or(u16::MAX);
        (side.saturating_mul(2), side.saturating_add(HEADER_ROWS + 1))
    }

    fn fits_terminal(&self) -> bool {
        let (need_w, need_h) = self.required_size();
        terminal::size()
            .map(|(w, h)| w >= need_w && h >= need_h)
            .unwrap_or(false)
    }

    fn draw(&mut self, out: &mut impl Write) -> io::Result<()> {
        let snapshot = self.session.snapshot();
        queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;

        if !self.fits_terminal() {
            self.renderer.draw(None, &snapshot);
            let (w, h) = self.required_size();
            queue!(out, Print(format!("Terminal too small, need {w}x{h}")))?;
            return out.flush();
        }

        self.renderer.draw(Some(&mut self.surface as &mut dyn Surface), &snapshot);

        queue!(
            out,
            Print(format!(
                "Score: {}   Best: {}   Speed: {} ms",
                snapshot.score, snapshot.high_score, snapshot.speed_ms
            ))
        )?;

        let cell = self.renderer.cell_size();
        for row in 0..snapshot.grid_size {
            queue!(out, MoveTo(0, HEADER_ROWS + row as u16))?;
            for col in 0..snapshot.grid_size {
                for fx in SAMPLES {
                    let top = self.surface.sample_cell(col, row, cell, fx, SAMPLES[0]);
                    let bottom = self.surface.sample_cell(col, row, cell, fx, SAMPLES[1]);
                    queue!(
                        out,
                        SetForegroundColor(top.map_or(Color::Reset, Color::from)),
                        SetBackgroundColor(bottom.map_or(Color::Reset, Color::from)),
                        Print('▀')
                    )?;
                }
            }
            queue!(out, ResetColor)?;
        }

        let footer = match snapshot.status {
            Status::Idle => {
                "Press Enter to start. WASD or arrows to steer, 'q' to quit".to_string()
            }
            Status::Running => "Use arrow keys or WASD to move, 'q' to quit".to_string(),
            Status::GameOver | Status::Won => format!(
                "{}   Enter to play again, 'q' to quit",
                self.hud.banner.as_deref().unwrap_or("Game over!")
            ),
        };
        queue!(
            out,
            MoveTo(0, HEADER_ROWS + snapshot.grid_size as u16),
            Print(footer)
        )?;

        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Direction;
    use crate::score_store::MemoryScoreStore;
    use crossterm::event::KeyCode;

    fn game() -> Game {
        let config = GameConfig {
            seed: Some(9),
            ..GameConfig::default()
        };
        Game::new(&config, Box::new(MemoryScoreStore::new())).unwrap()
    }

    #[test]
    fn clock_is_armed_only_while_running() {
        let mut game = game();
        assert!(!game.clock.is_armed());

        game.handle(Command::Steer(Direction::Up));
        assert_eq!(game.session().status(), Status::Idle);

        game.handle(Command::Start);
        assert_eq!(game.session().status(), Status::Running);
        assert_eq!(game.clock.interval(), Some(Duration::from_millis(150)));

        // Heading right from (7,7), the eighth tick leaves the board.
        for _ in 0..7 {
            game.tick();
            assert!(game.session().status().is_running());
        }
        game.tick();
        assert!(game.session().status().is_game_over());
        assert!(!game.clock.is_armed());
        assert!(game.hud.banner.is_some());

        game.handle(Command::Start);
        assert_eq!(game.session().status(), Status::Running);
        assert!(game.clock.is_armed());
        assert!(game.hud.banner.is_none());
    }

    #[test]
    fn quit_key_stops_the_loop() {
        let mut game = game();
        let command = command_for_key(KeyCode::Char('q')).unwrap();
        game.handle(command);
        assert!(game.quit);
    }

    #[test]
    fn colours_convert_to_terminal_rgb() {
        assert_eq!(Color::from(Rgb(1, 2, 3)), Color::Rgb { r: 1, g: 2, b: 3 });
    }
}
