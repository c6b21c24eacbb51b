use super::{
    action::Direction,
    config::GameConfig,
    events::GameEvent,
    state::{coordinate, CollisionType, GamePhase, GameState, Position, Snake},
};
use crate::storage::{self, KeyValueStore};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::Duration;

/// Information about a tick
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickInfo {
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
}

/// Result of a tick
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickResult {
    /// Whether the snake moved this tick
    pub advanced: bool,
    /// Whether this tick ended the game
    pub terminated: bool,
    /// Additional information about the tick
    pub info: TickInfo,
}

/// The game engine: owns one play session and the best score
pub struct GameEngine<S: KeyValueStore> {
    config: GameConfig,
    state: GameState,
    pending_direction: Option<Direction>,
    high_score: u32,
    store: S,
    events: Vec<GameEvent>,
    rng: StdRng,
}

impl<S: KeyValueStore> GameEngine<S> {
    /// Create a new game engine, loading the best score from `store`
    pub fn new(config: GameConfig, store: S) -> Self {
        Self::with_rng(config, store, StdRng::from_entropy())
    }

    /// Same as [`GameEngine::new`] with a caller-provided random source
    pub fn with_rng(config: GameConfig, store: S, rng: StdRng) -> Self {
        let high_score = storage::load_high_score(&store);
        let state = Self::initial_state(&config);

        let mut engine = Self {
            config,
            state,
            pending_direction: None,
            high_score,
            store,
            events: Vec::new(),
            rng,
        };
        engine.events.push(GameEvent::HighScoreChanged(high_score));
        engine.events.push(GameEvent::ScoreChanged(0));
        engine
    }

    fn initial_state(config: &GameConfig) -> GameState {
        GameState::new(
            Snake::new(config.start),
            config.initial_food,
            config.tile_count,
        )
    }

    /// Request a turn; returns whether it was accepted
    ///
    /// The first accepted request starts the game.
    pub fn set_direction(&mut self, requested: Direction) -> bool {
        if self.state.phase.is_finished() || !self.state.direction.accepts(requested) {
            return false;
        }

        self.pending_direction = Some(requested);

        if self.state.phase == GamePhase::NotStarted {
            log::debug!("game started moving {:?}", requested);
            self.state.phase = GamePhase::Running;
        }
        true
    }

    /// Flip between running and paused; other phases are left alone
    pub fn toggle_pause(&mut self) -> GamePhase {
        self.state.phase = match self.state.phase {
            GamePhase::Running => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Running,
            other => other,
        };
        log::debug!("pause toggled, phase is now {:?}", self.state.phase);
        self.state.phase
    }

    /// Start over with a fresh session; the best score is kept
    pub fn restart(&mut self) {
        self.state = Self::initial_state(&self.config);
        self.pending_direction = None;
        self.events.push(GameEvent::ScoreChanged(0));
        log::debug!("game restarted");
    }

    /// Execute one step of the game
    pub fn tick(&mut self) -> TickResult {
        if self.state.phase != GamePhase::Running {
            return TickResult::default();
        }

        if let Some(direction) = self.pending_direction.take() {
            self.state.direction = direction;
        }

        // Calculate new head position
        let new_head = self.state.snake.head().moved_in_direction(self.state.direction);

        // Check for collisions
        if let Some(collision_type) = self.check_collision(new_head) {
            log::info!(
                "collision ({:?}) at ({}, {}), final score {}",
                collision_type,
                new_head.x,
                new_head.y,
                self.state.score
            );
            self.finish(GamePhase::Over);

            return TickResult {
                advanced: false,
                terminated: true,
                info: TickInfo {
                    ate_food: false,
                    collision_type: Some(collision_type),
                },
            };
        }

        let ate_food = new_head == self.state.food;
        self.state.snake.advance(new_head, ate_food);
        self.state.steps += 1;

        let mut terminated = false;
        if ate_food {
            self.state.score += self.config.food_reward;
            self.events.push(GameEvent::ScoreChanged(self.state.score));

            match self.spawn_food() {
                Some(food) => self.state.food = food,
                None => {
                    log::info!("board filled, final score {}", self.state.score);
                    self.finish(GamePhase::Won);
                    terminated = true;
                }
            }
        }

        TickResult {
            advanced: true,
            terminated,
            info: TickInfo {
                ate_food,
                collision_type: None,
            },
        }
    }

    /// Delay until the next tick for the current snake length
    pub fn tick_delay(&self) -> Duration {
        self.config.speed.delay_for_length(self.state.snake.len())
    }

    /// Drain the events raised since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, pos: Position) -> Option<CollisionType> {
        // Check wall collision
        if !self.state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        // The tail has not moved yet, so it counts too
        if self.state.is_occupied_by_snake(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Pick a random empty cell, or `None` when the snake covers the board
    fn spawn_food(&mut self) -> Option<Position> {
        if self.state.free_cells() == 0 {
            return None;
        }

        let n = self.config.tile_count;
        loop {
            let x = coordinate(self.rng.gen_range(0..n));
            let y = coordinate(self.rng.gen_range(0..n));
            let pos = Position::new(x, y);

            if !self.state.is_occupied_by_snake(pos) {
                log::debug!("food placed at ({}, {})", x, y);
                return Some(pos);
            }
        }
    }

    fn finish(&mut self, phase: GamePhase) {
        self.state.phase = phase;
        self.pending_direction = None;

        let final_score = self.state.score;
        self.events.push(match phase {
            GamePhase::Won => GameEvent::Victory { final_score },
            _ => GameEvent::GameOver { final_score },
        });

        if final_score > self.high_score {
            log::info!("new high score {} (was {})", final_score, self.high_score);
            self.high_score = final_score;
            storage::save_high_score(&mut self.store, final_score);
            self.events.push(GameEvent::HighScoreChanged(final_score));
            self.events.push(GameEvent::NewRecord { score: final_score });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageError, HIGH_SCORE_KEY};

    fn engine_with(config: GameConfig) -> GameEngine<MemoryStore> {
        GameEngine::with_rng(config, MemoryStore::new(), StdRng::seed_from_u64(7))
    }

    fn snake(cells: &[(i32, i32)]) -> Snake {
        Snake::from_segments(cells.iter().map(|&(x, y)| Position::new(x, y)).collect()).unwrap()
    }

    /// Put the engine mid-game with the given body, motion and food
    fn running(
        engine: &mut GameEngine<MemoryStore>,
        cells: &[(i32, i32)],
        direction: Direction,
        food: (i32, i32),
    ) {
        engine.state.snake = snake(cells);
        engine.state.direction = direction;
        engine.state.food = Position::new(food.0, food.1);
        engine.state.phase = GamePhase::Running;
        engine.take_events();
    }

    fn assert_no_overlap(state: &GameState) {
        let segments = state.snake.segments();
        for (i, a) in segments.iter().enumerate() {
            assert!(!segments[i + 1..].contains(a), "segment {:?} repeated", a);
        }
    }

    #[test]
    fn test_initialize() {
        let mut engine = engine_with(GameConfig::default());
        let state = engine.state();

        assert_eq!(state.snake.segments(), &[Position::new(7, 7)]);
        assert_eq!(state.food, Position::new(10, 10));
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, GamePhase::NotStarted);
        assert_eq!(state.direction, Direction::None);
        assert_eq!(engine.high_score(), 0);
        assert_eq!(
            engine.take_events(),
            vec![GameEvent::HighScoreChanged(0), GameEvent::ScoreChanged(0)]
        );
    }

    #[test]
    fn test_loads_high_score() {
        let mut store = MemoryStore::new();
        store.set(HIGH_SCORE_KEY, "250").unwrap();
        let engine = GameEngine::new(GameConfig::default(), store);
        assert_eq!(engine.high_score(), 250);
    }

    #[test]
    fn test_tick_before_start_is_noop() {
        let mut engine = engine_with(GameConfig::default());
        let before = engine.state().clone();

        let result = engine.tick();

        assert!(!result.advanced);
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_first_direction_starts_game() {
        let mut engine = engine_with(GameConfig::default());

        assert!(engine.set_direction(Direction::Right));
        assert_eq!(engine.phase(), GamePhase::Running);

        let result = engine.tick();
        assert!(result.advanced);
        assert_eq!(engine.state().snake.head(), Position::new(8, 7));
        assert_eq!(engine.state().snake.len(), 1);
        assert_eq!(engine.state().steps, 1);
    }

    #[test]
    fn test_neck_rule() {
        let mut engine = engine_with(GameConfig::default());
        running(&mut engine, &[(7, 7), (6, 7)], Direction::Right, (0, 0));

        // Moving right, a "left" request is ignored
        assert!(!engine.set_direction(Direction::Left));
        engine.tick();
        assert_eq!(engine.state().direction, Direction::Right);
        assert_eq!(engine.state().snake.head(), Position::new(8, 7));

        // Moving right, "up" and "down" are accepted
        assert!(engine.set_direction(Direction::Up));
        assert!(engine.set_direction(Direction::Down));
        engine.tick();
        assert_eq!(engine.state().direction, Direction::Down);
        assert_eq!(engine.state().snake.head(), Position::new(8, 8));
    }

    #[test]
    fn test_two_quick_turns_cannot_reverse_through_neck() {
        let mut engine = engine_with(GameConfig::default());
        running(&mut engine, &[(7, 7), (6, 7), (5, 7)], Direction::Right, (0, 0));

        // "Up" is queued, but "left" is still judged against rightward motion
        assert!(engine.set_direction(Direction::Up));
        assert!(!engine.set_direction(Direction::Left));

        let result = engine.tick();
        assert!(result.advanced);
        assert_eq!(engine.state().snake.head(), Position::new(7, 6));
        assert_eq!(engine.phase(), GamePhase::Running);
    }

    #[test]
    fn test_boundary_collision_leaves_state_untouched() {
        let mut engine = engine_with(GameConfig::default());
        running(&mut engine, &[(14, 7), (13, 7)], Direction::Right, (3, 3));
        let snake_before = engine.state().snake.clone();

        let result = engine.tick();

        assert!(result.terminated);
        assert!(!result.advanced);
        assert_eq!(result.info.collision_type, Some(CollisionType::Wall));
        assert_eq!(engine.phase(), GamePhase::Over);
        assert_eq!(engine.state().snake, snake_before);
        assert_eq!(engine.state().food, Position::new(3, 3));
        assert_eq!(
            engine.take_events(),
            vec![GameEvent::GameOver { final_score: 0 }]
        );
    }

    #[test]
    fn test_self_collision() {
        let mut engine = engine_with(GameConfig::default());
        // Head at (5,5) heading right with the body curling below it
        running(
            &mut engine,
            &[(5, 5), (4, 5), (4, 6), (5, 6), (6, 6), (7, 6)],
            Direction::Right,
            (0, 0),
        );

        // Right: (6,5); Down: (6,6) is the tail, which has not moved yet
        engine.tick();
        assert_eq!(engine.phase(), GamePhase::Running);
        assert!(engine.set_direction(Direction::Down));
        let result = engine.tick();

        assert!(result.terminated);
        assert_eq!(
            result.info.collision_type,
            Some(CollisionType::SelfCollision)
        );
        assert_eq!(engine.phase(), GamePhase::Over);
    }

    #[test]
    fn test_turning_back_into_body() {
        let mut engine = engine_with(GameConfig::default());
        running(
            &mut engine,
            &[(5, 5), (4, 5), (3, 5), (2, 5)],
            Direction::Right,
            (0, 0),
        );

        // Right: (6,5), (5,5), (4,5), (3,5)
        engine.tick();
        // Down: (6,6), (6,5), (5,5), (4,5)
        engine.set_direction(Direction::Down);
        engine.tick();
        // Left: (5,6), (6,6), (6,5), (5,5)
        engine.set_direction(Direction::Left);
        engine.tick();
        // Up: (5,5) is a body segment
        engine.set_direction(Direction::Up);
        let result = engine.tick();

        assert_eq!(
            result.info.collision_type,
            Some(CollisionType::SelfCollision)
        );
        assert_eq!(engine.phase(), GamePhase::Over);
    }

    #[test]
    fn test_growth() {
        let mut engine = engine_with(GameConfig::default());
        running(&mut engine, &[(7, 7)], Direction::Right, (8, 7));

        let result = engine.tick();

        assert!(result.info.ate_food);
        assert_eq!(
            engine.state().snake.segments(),
            &[Position::new(8, 7), Position::new(7, 7)]
        );
        assert_eq!(engine.score(), 10);
        let food = engine.state().food;
        assert_ne!(food, Position::new(8, 7));
        assert!(!engine.state().snake.occupies(food));
        assert!(engine.state().is_in_bounds(food));
        assert_eq!(engine.take_events(), vec![GameEvent::ScoreChanged(10)]);
    }

    #[test]
    fn test_length_and_score_invariants_over_a_long_run() {
        let mut engine = engine_with(GameConfig::default());
        engine.set_direction(Direction::Right);

        // Sweep the board in a serpentine so the snake eats whatever it meets
        let mut prev_len = engine.state().snake.len();
        let mut prev_score = 0;
        for step in 0..400 {
            if engine.phase() != GamePhase::Running {
                break;
            }
            let head = engine.state().snake.head();
            let dir = engine.state().direction;
            let turn = match dir {
                Direction::Right if head.x == 14 => Some(Direction::Down),
                Direction::Left if head.x == 0 => Some(Direction::Down),
                Direction::Down if head.x == 14 => Some(Direction::Left),
                Direction::Down if head.x == 0 => Some(Direction::Right),
                _ => None,
            };
            if let Some(turn) = turn {
                engine.set_direction(turn);
            }

            engine.tick();
            let state = engine.state();
            let len = state.snake.len();
            assert!(len >= prev_len && len <= prev_len + 1, "step {}", step);
            assert!(state.score >= prev_score);
            assert_eq!(state.score, (len as u32 - 1) * 10);
            assert!(!state.snake.occupies(state.food) || state.phase.is_finished());
            assert_no_overlap(state);
            prev_len = len;
            prev_score = state.score;
        }
    }

    #[test]
    fn test_food_never_lands_on_snake() {
        let mut engine = engine_with(GameConfig::new(4));
        // Snake covers 15 of 16 cells; only (3,3) is free
        let mut cells = Vec::new();
        for y in 0..4 {
            for x in 0..4 {
                if (x, y) != (3, 3) {
                    cells.push((x, y));
                }
            }
        }
        running(&mut engine, &cells, Direction::Right, (0, 0));

        for _ in 0..20 {
            assert_eq!(engine.spawn_food(), Some(Position::new(3, 3)));
        }
    }

    #[test]
    fn test_filling_the_board_is_a_win() {
        let mut engine = engine_with(GameConfig::new(3));
        // Eight cells covered, head at (1,0) moving left onto the last free cell
        running(
            &mut engine,
            &[(1, 0), (2, 0), (2, 1), (1, 1), (0, 1), (0, 2), (1, 2), (2, 2)],
            Direction::Left,
            (0, 0),
        );

        let result = engine.tick();

        assert!(result.advanced);
        assert!(result.terminated);
        assert!(result.info.ate_food);
        assert_eq!(engine.phase(), GamePhase::Won);
        assert_eq!(engine.state().snake.len(), 9);
        assert_eq!(engine.high_score(), 10);
        assert_eq!(
            engine.take_events(),
            vec![
                GameEvent::ScoreChanged(10),
                GameEvent::Victory { final_score: 10 },
                GameEvent::HighScoreChanged(10),
                GameEvent::NewRecord { score: 10 },
            ]
        );
        assert!(!engine.set_direction(Direction::Down));
    }

    #[test]
    fn test_new_record_is_persisted() {
        let mut engine = engine_with(GameConfig::default());
        running(&mut engine, &[(13, 7)], Direction::Right, (14, 7));

        engine.tick();
        engine.take_events();
        engine.tick();

        assert_eq!(engine.phase(), GamePhase::Over);
        assert_eq!(engine.high_score(), 10);
        assert_eq!(
            engine.store().get(HIGH_SCORE_KEY).unwrap().as_deref(),
            Some("10")
        );
        assert_eq!(
            engine.take_events(),
            vec![
                GameEvent::GameOver { final_score: 10 },
                GameEvent::HighScoreChanged(10),
                GameEvent::NewRecord { score: 10 },
            ]
        );
    }

    #[test]
    fn test_equal_score_is_not_a_record() {
        let mut store = MemoryStore::new();
        store.set(HIGH_SCORE_KEY, "10").unwrap();
        let mut engine =
            GameEngine::with_rng(GameConfig::default(), store, StdRng::seed_from_u64(1));
        engine.state.snake = snake(&[(13, 7)]);
        engine.state.direction = Direction::Right;
        engine.state.food = Position::new(14, 7);
        engine.state.phase = GamePhase::Running;

        engine.tick();
        engine.take_events();
        engine.tick();

        assert_eq!(engine.phase(), GamePhase::Over);
        assert_eq!(engine.high_score(), 10);
        assert_eq!(
            engine.take_events(),
            vec![GameEvent::GameOver { final_score: 10 }]
        );
    }

    #[test]
    fn test_storage_write_failure_is_not_fatal() {
        struct ReadOnlyStore;

        impl KeyValueStore for ReadOnlyStore {
            fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
                Ok(None)
            }

            fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
                Err(StorageError::Io {
                    path: "scores.json".into(),
                    source: std::io::Error::new(std::io::ErrorKind::Other, "read-only"),
                })
            }
        }

        let mut engine =
            GameEngine::with_rng(GameConfig::default(), ReadOnlyStore, StdRng::seed_from_u64(3));
        engine.state.snake = snake(&[(0, 1)]);
        engine.state.food = Position::new(0, 0);
        engine.state.phase = GamePhase::Running;
        engine.set_direction(Direction::Up);

        engine.tick();
        engine.tick();

        assert_eq!(engine.phase(), GamePhase::Over);
        // Still reflected in memory
        assert_eq!(engine.high_score(), 10);
    }

    #[test]
    fn test_pause_toggle() {
        let mut engine = engine_with(GameConfig::default());

        // Ignored before the game starts
        assert_eq!(engine.toggle_pause(), GamePhase::NotStarted);

        engine.set_direction(Direction::Up);
        assert_eq!(engine.toggle_pause(), GamePhase::Paused);

        let before = engine.state().clone();
        assert!(!engine.tick().advanced);
        assert_eq!(engine.state(), &before);

        assert_eq!(engine.toggle_pause(), GamePhase::Running);
        assert!(engine.tick().advanced);
    }

    #[test]
    fn test_input_after_game_over_is_ignored() {
        let mut engine = engine_with(GameConfig::default());
        running(&mut engine, &[(0, 7)], Direction::Left, (3, 3));
        engine.tick();
        assert_eq!(engine.phase(), GamePhase::Over);

        assert!(!engine.set_direction(Direction::Up));
        assert_eq!(engine.toggle_pause(), GamePhase::Over);
        assert!(!engine.tick().advanced);
        assert_eq!(engine.phase(), GamePhase::Over);
    }

    #[test]
    fn test_restart() {
        let mut store = MemoryStore::new();
        store.set(HIGH_SCORE_KEY, "500").unwrap();
        let mut engine =
            GameEngine::with_rng(GameConfig::default(), store, StdRng::seed_from_u64(9));

        engine.set_direction(Direction::Right);
        engine.state.food = Position::new(8, 7);
        for _ in 0..10 {
            engine.tick();
        }
        assert!(engine.score() > 0);
        assert_eq!(engine.phase(), GamePhase::Over);
        engine.take_events();

        engine.restart();

        let state = engine.state();
        assert_eq!(state.snake.segments(), &[Position::new(7, 7)]);
        assert_eq!(state.food, Position::new(10, 10));
        assert_eq!(state.score, 0);
        assert_eq!(state.direction, Direction::None);
        assert_eq!(state.phase, GamePhase::NotStarted);
        assert_eq!(engine.high_score(), 500);
        assert_eq!(engine.take_events(), vec![GameEvent::ScoreChanged(0)]);
    }

    #[test]
    fn test_tick_delay_accelerates() {
        let mut engine = engine_with(GameConfig::default());
        assert_eq!(engine.tick_delay(), Duration::from_millis(295));

        let cells: Vec<(i32, i32)> = (0..15)
            .map(|x| (x, 0))
            .chain((0..15).map(|x| (x, 1)))
            .collect();
        running(&mut engine, &cells, Direction::Down, (5, 5));
        assert_eq!(engine.tick_delay(), Duration::from_millis(150));
    }
}
