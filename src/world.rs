use log::{debug, info};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::Coords;
use crate::input::InputMapper;
use crate::snake::{Collision, Direction, Snake};

/// What a single tick did to the world.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Moved,
    Ate { score: u32 },
    Crashed(Collision),
    /// The snake covers every cell; there is nowhere left to put food.
    Filled,
}

impl StepOutcome {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepOutcome::Crashed(_) | StepOutcome::Filled)
    }
}

/// The grid simulation: snake, food and score.
pub struct World {
    grid_size: i16,
    snake: Snake,
    food: Option<Coords>,
    score: u32,
    rng: StdRng,
}

impl World {
    pub fn new(grid_size: i16) -> Self {
        World::with_rng(grid_size, StdRng::from_entropy())
    }

    pub fn seeded(grid_size: i16, seed: u64) -> Self {
        World::with_rng(grid_size, StdRng::seed_from_u64(seed))
    }

    fn with_rng(grid_size: i16, rng: StdRng) -> Self {
        let mut world = World {
            grid_size,
            snake: Snake::new(start_cell(grid_size), Direction::Right),
            food: None,
            score: 0,
            rng,
        };
        world.initialize();
        world
    }

    /// Single-cell snake in the middle heading right, score zero, fresh food.
    pub fn initialize(&mut self) {
        self.snake = Snake::new(start_cell(self.grid_size), Direction::Right);
        self.score = 0;
        self.food = self.spawn_food();
    }

    pub fn step(&mut self, input: &mut InputMapper) -> StepOutcome {
        if let Some(dir) = input.take_pending() {
            if !self.snake.turn(dir) {
                debug!("Ignoring reversal to {:?} while heading {:?}", dir, self.snake.direction());
            }
        }

        let new_head = match self.snake.next_head(self.grid_size) {
            Ok(pos) => pos,
            Err(collision) => {
                info!("Crashed ({:?}) at {:?} with score {}", collision, self.snake.head(), self.score);
                return StepOutcome::Crashed(collision);
            }
        };

        let ate = self.food == Some(new_head);
        self.snake.advance(new_head, ate);

        if !ate {
            return StepOutcome::Moved;
        }

        self.score += 1;
        self.food = self.spawn_food();

        match self.food {
            Some(_) => StepOutcome::Ate { score: self.score },
            None => {
                info!("Board filled with score {}", self.score);
                StepOutcome::Filled
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn replace_snake(&mut self, snake: Snake) {
        self.snake = snake;
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<Coords> {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    ///////////////////////////////////////////////////////////////////////////

    // Random probing first, giving up after as many tries as there are free
    // cells; then an exact pick among the free cells.
    fn spawn_food(&mut self) -> Option<Coords> {
        let total = self.grid_size as usize * self.grid_size as usize;
        let free = total.saturating_sub(self.snake.len());

        for _ in 0..free {
            let pos = (self.rng.gen_range(0..self.grid_size), self.rng.gen_range(0..self.grid_size));
            if !self.snake.contains(&pos) {
                return Some(pos);
            }
        }

        let snake = &self.snake;
        let choices: Vec<Coords> = all_cells(self.grid_size).filter(|pos| !snake.contains(pos)).collect();
        choices.choose(&mut self.rng).copied()
    }
}

fn start_cell(grid_size: i16) -> Coords {
    (grid_size / 2, grid_size / 2)
}

fn all_cells(grid_size: i16) -> impl Iterator<Item = Coords> {
    (0..grid_size).flat_map(move |y| (0..grid_size).map(move |x| (x, y)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::Direction::*;

    fn world_with(cells: &[Coords], direction: Direction, food: Coords) -> World {
        let mut world = World::seeded(15, 7);
        world.snake = Snake::from_cells(cells, direction);
        world.food = Some(food);
        world
    }

    fn body(world: &World) -> Vec<Coords> {
        world.snake().body().iter().copied().collect()
    }

    #[test]
    fn initialize_resets_everything() {
        let mut world = world_with(&[(3, 3), (2, 3), (1, 3)], Up, (9, 9));
        world.score = 12;
        world.initialize();

        assert_eq!(body(&world), vec![(7, 7)]);
        assert_eq!(world.snake().direction(), Right);
        assert_eq!(world.score(), 0);
        let food = world.food().unwrap();
        assert_ne!(food, (7, 7));
    }

    #[test]
    fn plain_step_moves_head_and_drops_tail() {
        let mut world = world_with(&[(7, 7)], Right, (5, 5));
        let mut input = InputMapper::new();

        assert_eq!(world.step(&mut input), StepOutcome::Moved);
        assert_eq!(body(&world), vec![(8, 7)]);
        assert_eq!(world.score(), 0);
        assert_eq!(world.food(), Some((5, 5)));
    }

    #[test]
    fn eating_grows_and_scores() {
        let mut world = world_with(&[(7, 7)], Right, (8, 7));
        let mut input = InputMapper::new();

        assert_eq!(world.step(&mut input), StepOutcome::Ate { score: 1 });
        assert_eq!(body(&world), vec![(8, 7), (7, 7)]);
        let food = world.food().unwrap();
        assert!(!world.snake().contains(&food));
    }

    #[test]
    fn reversal_input_keeps_heading() {
        let mut world = world_with(&[(7, 7), (6, 7), (5, 7)], Right, (0, 0));
        let mut input = InputMapper::new();
        input.set_direction(Left);

        assert_eq!(world.step(&mut input), StepOutcome::Moved);
        assert_eq!(body(&world), vec![(8, 7), (7, 7), (6, 7)]);
        assert_eq!(input.pending(), None);
    }

    #[test]
    fn legality_checks_against_current_heading() {
        // Up then Left in the same tick: only Left is seen, and it reverses Right.
        let mut world = world_with(&[(7, 7), (6, 7)], Right, (0, 0));
        let mut input = InputMapper::new();
        input.set_direction(Up);
        input.set_direction(Left);

        world.step(&mut input);
        assert_eq!(world.snake().head(), (8, 7));
        assert_eq!(world.snake().direction(), Right);
    }

    #[test]
    fn wall_crash_leaves_world_untouched() {
        let mut world = world_with(&[(14, 7), (13, 7)], Right, (0, 0));
        let mut input = InputMapper::new();

        assert_eq!(world.step(&mut input), StepOutcome::Crashed(Collision::Wall));
        assert_eq!(body(&world), vec![(14, 7), (13, 7)]);
        assert_eq!(world.food(), Some((0, 0)));
    }

    #[test]
    fn self_crash_is_terminal() {
        let mut world = world_with(&[(5, 5), (6, 5), (6, 6), (5, 6), (4, 6)], Right, (0, 0));
        let mut input = InputMapper::new();
        input.set_direction(Down);

        let outcome = world.step(&mut input);
        assert_eq!(outcome, StepOutcome::Crashed(Collision::Body));
        assert!(outcome.is_terminal());
        assert_eq!(world.snake().len(), 5);
    }

    #[test]
    fn length_changes_only_when_eating() {
        let mut world = World::seeded(15, 99);
        let mut input = InputMapper::new();
        let turns = [Down, Left, Up, Right];

        for i in 0..200 {
            if i % 5 == 0 {
                input.set_direction(turns[(i / 5) % 4]);
            }
            let before = world.snake().len();
            match world.step(&mut input) {
                StepOutcome::Moved => assert_eq!(world.snake().len(), before),
                StepOutcome::Ate { .. } => assert_eq!(world.snake().len(), before + 1),
                StepOutcome::Crashed(_) | StepOutcome::Filled => {
                    assert_eq!(world.snake().len(), before);
                    world.initialize();
                }
            }
            if let Some(food) = world.food() {
                assert!(!world.snake().contains(&food));
            }
        }
    }

    #[test]
    fn food_lands_on_last_free_cell() {
        let mut world = World::seeded(2, 1);
        world.snake = Snake::from_cells(&[(0, 0), (1, 0), (1, 1)], Down);
        assert_eq!(world.spawn_food(), Some((0, 1)));
    }

    #[test]
    fn filling_the_board_ends_the_game() {
        let mut world = World::seeded(2, 1);
        world.snake = Snake::from_cells(&[(0, 0), (1, 0), (1, 1)], Down);
        world.food = Some((0, 1));
        let mut input = InputMapper::new();

        assert_eq!(world.step(&mut input), StepOutcome::Filled);
        assert_eq!(world.food(), None);
        assert_eq!(world.score(), 1);
        assert_eq!(world.snake().len(), 4);
    }
}
