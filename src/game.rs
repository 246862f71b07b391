use std::{thread::sleep, time::{Duration, Instant}};

use crate::TermCoords;
use crate::config::{Config, DEGEN_TIPS_URL, PROJECT_DESCRIPTION, PROJECT_TITLE};
use crate::host::{HostBridge, Standalone};
use crate::input::direction_for_key;
use crate::lives::SystemCalendar;
use crate::payment::{self, NoWallet};
use crate::render::{render, PixelCanvas};
use crate::session::{Phase, Session, StartError};
use crate::store::{JsonFileStore, StoreError};
use crate::term::TermManager;
use crate::world::StepOutcome;

use crossterm::event::{KeyEvent, KeyModifiers, KeyCode};
use log::{info, warn};
use thiserror::Error;

const POLL_INTERVAL_MS: u64 = 5;

const STATUS_ROW: u16 = 0;
const BOARD_TOP_LEFT: TermCoords = (0, 1);

#[derive(Error, Debug)]
pub enum GameError {
    #[error("terminal error: {0}")]
    Terminal(#[from] crossterm::ErrorKind),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(PartialEq)]
enum Flow {
    Continue,
    Quit,
}

/// The terminal front end: owns the screen, the session and the collaborators.
pub struct SnakeGame {
    config: Config,
    term: TermManager,
    session: Session<JsonFileStore, SystemCalendar>,
    host: HostBridge<Standalone>,
    wallet: NoWallet,
    canvas: PixelCanvas,
    show_context: bool,
}

impl SnakeGame {
    pub fn new(config: Config) -> Result<Self, GameError> {
        let store = JsonFileStore::open(&config.store_path)?;
        let session = Session::new(&config, store, SystemCalendar);
        let side = config.surface_size();

        Ok(SnakeGame {
            term: TermManager::new()?,
            session,
            host: HostBridge::new(Standalone),
            wallet: NoWallet,
            canvas: PixelCanvas::new(side, side),
            show_context: false,
            config,
        })
    }

    /// Takes over the terminal until the player quits, restoring it on the way out.
    pub fn run(&mut self) -> Result<(), GameError> {
        let (board_w, board_h) = self.board_extent();
        let (w, h) = self.term.size();
        if w < board_w || h < board_h {
            warn!("Terminal is {}x{}, board needs {}x{}", w, h, board_w, board_h);
        }

        self.term.setup()?;
        let result = self.main_loop();
        self.session.stop();
        self.term.restore()?;
        result
    }

    fn main_loop(&mut self) -> Result<(), GameError> {
        self.draw_frame()?;
        self.host.initialize();
        self.show_intro()?;

        loop {
            sleep(Duration::from_millis(POLL_INTERVAL_MS));

            self.host.pump_events();

            for key_ev in self.term.read_key_events_queue()? {
                if self.handle_key(&key_ev)? == Flow::Quit {
                    info!("Quit requested");
                    return Ok(());
                }
            }

            match self.session.tick(Instant::now()) {
                Some(StepOutcome::Crashed(_)) => self.game_over(false)?,
                Some(StepOutcome::Filled) => {
                    self.draw_board()?;
                    self.game_over(true)?;
                }
                Some(_) => self.draw_board()?,
                None => {}
            }
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn handle_key(&mut self, ev: &KeyEvent) -> Result<Flow, GameError> {
        if is_quit(ev) {
            return Ok(Flow::Quit);
        }

        if let Some(dir) = direction_for_key(&ev.code) {
            self.session.steer(dir);
            return Ok(Flow::Continue);
        }

        if self.session.phase() == Phase::Playing {
            return Ok(Flow::Continue);
        }

        match ev.code {
            KeyCode::Enter | KeyCode::Char(' ') => self.start()?,
            KeyCode::Char('b') => self.buy_lives()?,
            KeyCode::Char('p') => self.pin()?,
            KeyCode::Char('c') => self.toggle_context()?,
            _ => {}
        }

        Ok(Flow::Continue)
    }

    fn start(&mut self) -> Result<(), GameError> {
        match self.session.start_game(Instant::now()) {
            Ok(()) => {
                self.term.hide_message()?;
                self.draw_board()
            }
            Err(StartError::NoLivesLeft) => {
                self.draw_status()?;
                self.show_no_lives()
            }
        }
    }

    fn buy_lives(&mut self) -> Result<(), GameError> {
        let center = self.board_center();

        match payment::buy_lives(&mut self.wallet) {
            Some(tx) => self.term.show_message(center, &["Payment sent", tx.as_str(), "", "Enter to play"])?,
            None => self.term.show_message(center, &["Payment failed", "See the log for details", "", DEGEN_TIPS_URL])?,
        }

        Ok(())
    }

    fn pin(&mut self) -> Result<(), GameError> {
        if !self.host.is_pinned() {
            self.host.pin();
        }

        self.draw_status()?;
        self.term.flush()?;
        Ok(())
    }

    fn toggle_context(&mut self) -> Result<(), GameError> {
        self.show_context = !self.show_context;
        self.draw_status()?;
        self.term.flush()?;
        Ok(())
    }

    fn game_over(&mut self, win: bool) -> Result<(), GameError> {
        let title = if win {"You won!"} else {"Game over!"};
        let score = format!("Score: {}", self.session.score());
        let lives = format!("Lives left: {}", self.session.lives().remaining());
        let next = if self.session.lives().can_start() {"Enter to try again"} else {"No more lives today!"};

        let center = self.board_center();
        self.draw_status()?;
        self.term.show_message(center, &[
            title,
            score.as_str(),
            lives.as_str(),
            "",
            next,
            "Learn more about Degen!",
            DEGEN_TIPS_URL,
        ])?;

        Ok(())
    }

    fn show_intro(&mut self) -> Result<(), GameError> {
        let center = self.board_center();

        if self.session.lives().can_start() {
            self.term.show_message(center, &[
                PROJECT_TITLE,
                PROJECT_DESCRIPTION,
                "",
                "Arrow keys to move",
                "Enter to start",
                "q to quit",
            ])?;
        } else {
            self.show_no_lives()?;
        }

        Ok(())
    }

    fn show_no_lives(&mut self) -> Result<(), GameError> {
        let center = self.board_center();
        self.term.show_message(center, &[
            "No more lives today!",
            "",
            "b to buy lives",
            DEGEN_TIPS_URL,
        ])?;

        Ok(())
    }

    fn draw_frame(&mut self) -> Result<(), GameError> {
        self.term.clear()?;

        let grid = self.config.grid_size as u16;
        self.term.draw_box(BOARD_TOP_LEFT, grid * 2, grid)?;

        let footer = BOARD_TOP_LEFT.1 + grid + 2;
        self.term.print_line(footer, "Enter start  b buy lives  p pin  c context  q quit")?;

        self.draw_board()
    }

    /// Renders the world onto the canvas and puts the canvas on screen.
    fn draw_board(&mut self) -> Result<(), GameError> {
        let world = self.session.world();
        render(&mut self.canvas, self.config.cell_size, world.snake().body(), world.food());

        let origin = (BOARD_TOP_LEFT.0 + 1, BOARD_TOP_LEFT.1 + 1);
        self.term.draw_canvas(&self.canvas, origin, self.config.cell_size)?;
        self.draw_status()?;
        self.term.flush()?;
        Ok(())
    }

    fn draw_status(&mut self) -> Result<(), GameError> {
        let mut status = format!("Score: {} | Lives: {}", self.session.score(), self.session.lives().remaining());
        if self.host.is_pinned() {
            status.push_str(" | pinned");
        }
        self.term.print_line(STATUS_ROW, &status)?;

        if let Some(event) = self.host.last_event() {
            let row = BOARD_TOP_LEFT.1 + self.config.grid_size as u16 + 3;
            let line = format!("Last event: {}", event);
            self.term.print_line(row, &line)?;
        }

        let context_row = BOARD_TOP_LEFT.1 + self.config.grid_size as u16 + 4;
        let context_line = context_line(self.show_context, &self.host.context_summary());
        self.term.print_line(context_row, &context_line)?;

        Ok(())
    }

    fn board_extent(&self) -> TermCoords {
        let grid = self.config.grid_size as u16;
        (BOARD_TOP_LEFT.0 + grid * 2 + 2, BOARD_TOP_LEFT.1 + grid + 5)
    }

    fn board_center(&self) -> TermCoords {
        let grid = self.config.grid_size as u16;
        (BOARD_TOP_LEFT.0 + 1 + grid, BOARD_TOP_LEFT.1 + 1 + grid / 2)
    }
}

/// Frame context panel: the JSON when shown, a hint when hidden.
fn context_line(shown: bool, summary: &str) -> String {
    if shown {
        format!("Frame context: {}", summary)
    } else {
        "Frame context: hidden (c to show)".to_string()
    }
}

fn is_quit(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
        || ev.code == KeyCode::Char('q')
}
