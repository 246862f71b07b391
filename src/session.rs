use std::time::{Duration, Instant};

use log::{info, warn};
use thiserror::Error;

use crate::clock::Ticker;
use crate::config::Config;
use crate::input::InputMapper;
use crate::lives::{Calendar, LivesManager};
use crate::snake::Direction;
use crate::store::KeyValueStore;
use crate::world::{StepOutcome, World};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Playing,
    GameOver,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StartError {
    #[error("no lives left today")]
    NoLivesLeft,
}

/// Sole owner of the mutable game state: the world, the pending input, the
/// tick schedule and the lives counter.
pub struct Session<S, C> {
    world: World,
    input: InputMapper,
    ticker: Ticker,
    lives: LivesManager<S, C>,
    phase: Phase,
}

impl<S: KeyValueStore, C: Calendar> Session<S, C> {
    pub fn new(config: &Config, store: S, calendar: C) -> Self {
        let lives = LivesManager::load(store, calendar, config.lives_per_day);
        Session::with_world(World::new(config.grid_size), config.tick, lives)
    }

    pub fn with_world(world: World, tick: Duration, lives: LivesManager<S, C>) -> Self {
        Session { world, input: InputMapper::new(), ticker: Ticker::new(tick), lives, phase: Phase::Idle }
    }

    /// Idle/GameOver → Playing, if a life is available today.
    pub fn start_game(&mut self, now: Instant) -> Result<(), StartError> {
        self.lives.refresh();

        if !self.lives.can_start() {
            warn!("Start refused, no lives left");
            return Err(StartError::NoLivesLeft);
        }

        self.world.initialize();
        self.input.clear();
        self.ticker.start(now);
        self.phase = Phase::Playing;
        info!("Game started with {} lives left", self.lives.remaining());
        Ok(())
    }

    /// Queues a turn for the next tick. Ignored unless playing.
    pub fn steer(&mut self, direction: Direction) {
        if self.phase == Phase::Playing {
            self.input.set_direction(direction);
        }
    }

    /// Runs one step if the ticker says one is due. A terminal outcome stops
    /// the ticker and costs a life before returning.
    pub fn tick(&mut self, now: Instant) -> Option<StepOutcome> {
        if self.phase != Phase::Playing || !self.ticker.poll(now) {
            return None;
        }

        let outcome = self.world.step(&mut self.input);
        if outcome.is_terminal() {
            self.end_game();
        }

        Some(outcome)
    }

    /// Abandons a running game without charging a life.
    pub fn stop(&mut self) {
        self.ticker.stop();
        if self.phase == Phase::Playing {
            self.phase = Phase::Idle;
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn lives(&self) -> &LivesManager<S, C> {
        &self.lives
    }

    pub fn score(&self) -> u32 {
        self.world.score()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_running()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn end_game(&mut self) {
        self.ticker.stop();
        let left = self.lives.consume_life_on_game_over();
        self.phase = Phase::GameOver;
        info!("Game over with score {}, {} lives left", self.world.score(), left);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LIVES_KEY;
    use crate::snake::{Collision, Snake};
    use crate::store::MemoryStore;
    use chrono::NaiveDate;

    const TICK: Duration = Duration::from_millis(150);

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()
    }

    fn session_with(store: MemoryStore) -> Session<MemoryStore, NaiveDate> {
        let lives = LivesManager::load(store, today(), 3);
        Session::with_world(World::seeded(15, 3), TICK, lives)
    }

    #[test]
    fn start_resets_world_and_begins_ticking() {
        let mut session = session_with(MemoryStore::new());
        let t0 = Instant::now();

        session.start_game(t0).unwrap();
        assert_eq!(session.phase(), Phase::Playing);
        assert!(session.is_ticking());
        assert_eq!(session.score(), 0);
        assert_eq!(session.world().snake().len(), 1);

        assert_eq!(session.tick(t0 + TICK / 2), None);
        assert!(session.tick(t0 + TICK).is_some());
    }

    #[test]
    fn no_ticks_while_idle() {
        let mut session = session_with(MemoryStore::new());
        assert_eq!(session.tick(Instant::now() + TICK * 4), None);
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn wall_crash_costs_one_life_and_stops() {
        let mut session = session_with(MemoryStore::new());
        let t0 = Instant::now();
        session.start_game(t0).unwrap();
        session.world.replace_snake(Snake::from_cells(&[(14, 7), (13, 7)], Direction::Right));

        let outcome = session.tick(t0 + TICK);
        assert_eq!(outcome, Some(StepOutcome::Crashed(Collision::Wall)));
        assert_eq!(session.phase(), Phase::GameOver);
        assert!(!session.is_ticking());
        assert_eq!(session.lives().remaining(), 2);
        let body: Vec<_> = session.world().snake().body().iter().copied().collect();
        assert_eq!(body, vec![(14, 7), (13, 7)]);

        assert_eq!(session.tick(t0 + TICK * 2), None);
        assert_eq!(session.lives().remaining(), 2);
    }

    #[test]
    fn crashing_into_the_right_wall_from_the_start() {
        let mut session = session_with(MemoryStore::new());
        let mut now = Instant::now();
        session.start_game(now).unwrap();

        let mut outcome = None;
        for _ in 0..20 {
            now += TICK;
            outcome = session.tick(now);
            if session.phase() != Phase::Playing {
                break;
            }
        }

        // Eight cells from (7,7) to the wall; food may have grown the snake but
        // the only way out heading right is the wall.
        assert_eq!(outcome, Some(StepOutcome::Crashed(Collision::Wall)));
        assert_eq!(session.world().snake().head(), (14, 7));
    }

    #[test]
    fn steering_is_ignored_outside_play() {
        let mut session = session_with(MemoryStore::new());
        session.steer(Direction::Up);
        assert_eq!(session.input.pending(), None);

        session.start_game(Instant::now()).unwrap();
        session.steer(Direction::Up);
        assert_eq!(session.input.pending(), Some(Direction::Up));
    }

    #[test]
    fn out_of_lives_refuses_start() {
        let mut store = MemoryStore::new();
        store.set(LIVES_KEY, r#"{"date":"2024-05-02","remainingLives":0}"#).unwrap();
        let mut session = session_with(store);

        assert_eq!(session.start_game(Instant::now()), Err(StartError::NoLivesLeft));
        assert_eq!(session.phase(), Phase::Idle);
        assert!(!session.is_ticking());
    }

    #[test]
    fn restart_after_game_over_starts_fresh() {
        let mut session = session_with(MemoryStore::new());
        let t0 = Instant::now();
        session.start_game(t0).unwrap();
        session.world.replace_snake(Snake::from_cells(&[(0, 0), (1, 0), (2, 0)], Direction::Up));
        session.tick(t0 + TICK);
        assert_eq!(session.phase(), Phase::GameOver);

        session.start_game(t0 + TICK * 2).unwrap();
        assert_eq!(session.phase(), Phase::Playing);
        assert_eq!(session.score(), 0);
        let body: Vec<_> = session.world().snake().body().iter().copied().collect();
        assert_eq!(body, vec![(7, 7)]);
    }

    #[test]
    fn three_game_overs_exhaust_the_day() {
        let mut session = session_with(MemoryStore::new());
        let mut now = Instant::now();

        for expected in (0..3).rev() {
            session.start_game(now).unwrap();
            session.world.replace_snake(Snake::from_cells(&[(0, 0)], Direction::Left));
            now += TICK;
            session.tick(now);
            assert_eq!(session.lives().remaining(), expected);
        }

        assert_eq!(session.start_game(now), Err(StartError::NoLivesLeft));
    }

    #[test]
    fn stop_abandons_without_cost() {
        let mut session = session_with(MemoryStore::new());
        session.start_game(Instant::now()).unwrap();
        session.stop();
        session.stop();

        assert_eq!(session.phase(), Phase::Idle);
        assert!(!session.is_ticking());
        assert_eq!(session.lives().remaining(), 3);
    }
}
