use crate::game::{Action, Direction, GameConfig, GameEngine, GameState, Position, TurnAction};

/// Outcome of one environment step, as seen by the training loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Reward for the step just taken
    pub reward: f32,
    /// Whether the episode ended on this step
    pub done: bool,
    /// Current score (food eaten this episode)
    pub score: u32,
}

/// Capability contract between the learning core and a game environment.
///
/// The feature extractor and training loop only ever talk to an environment
/// through this trait, so any game exposing a head position, a heading, a
/// food position and a point-collision predicate is substitutable for the
/// built-in snake simulation.
pub trait Environment {
    /// Return the environment to its initial episode state.
    fn reset(&mut self);

    /// Apply one relative action, advance the simulation by one tick.
    fn play_step(&mut self, action: TurnAction) -> StepOutcome;

    /// Current head position.
    fn head(&self) -> Position;

    /// Current heading.
    fn direction(&self) -> Direction;

    /// Current food position.
    fn food(&self) -> Position;

    /// Whether the given point would be lethal for the head. Must be usable
    /// at arbitrary candidate points, not just the current head.
    fn is_collision(&self, point: Position) -> bool;
}

/// Snake environment for reinforcement learning.
///
/// Wraps the game engine and exposes the `Environment` capability contract
/// with a relative (straight / turn-right / turn-left) action space.
pub struct SnakeEnvironment {
    engine: GameEngine,
    state: GameState,
}

impl SnakeEnvironment {
    /// Create a new Snake environment
    pub fn new(config: GameConfig) -> Self {
        let mut engine = GameEngine::new(config);
        let state = engine.reset();
        Self { engine, state }
    }

    /// Get reference to current game state (for rendering/testing)
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[cfg(test)]
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}

impl Environment for SnakeEnvironment {
    fn reset(&mut self) {
        self.state = self.engine.reset();
    }

    fn play_step(&mut self, action: TurnAction) -> StepOutcome {
        let result = self.engine.step(&mut self.state, Action::Turn(action));
        StepOutcome {
            reward: result.reward,
            done: result.terminated,
            score: self.state.score,
        }
    }

    fn head(&self) -> Position {
        self.state.snake.head()
    }

    fn direction(&self) -> Direction {
        self.state.snake.direction
    }

    fn food(&self) -> Position {
        self.state.food
    }

    fn is_collision(&self, point: Position) -> bool {
        self.state.is_collision(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_creation() {
        let env = SnakeEnvironment::new(GameConfig::default());

        assert!(env.state().is_alive);
        assert_eq!(env.state().score, 0);
        assert_eq!(env.state().steps, 0);
    }

    #[test]
    fn test_play_step_advances_simulation() {
        let mut env = SnakeEnvironment::new(GameConfig::small());
        let head_before = env.head();

        let outcome = env.play_step(TurnAction::Straight);

        assert!(!outcome.done);
        assert_eq!(outcome.score, 0);
        assert_ne!(env.head(), head_before);
    }

    #[test]
    fn test_play_step_reports_food_reward() {
        let mut env = SnakeEnvironment::new(GameConfig::small());

        // Place food directly in front of the head
        let next = env.head().moved_in_direction(env.direction());
        env.state_mut().food = next;

        let outcome = env.play_step(TurnAction::Straight);

        assert!(outcome.reward > 0.0);
        assert_eq!(outcome.score, 1);
    }

    #[test]
    fn test_play_step_reports_death() {
        let mut env = SnakeEnvironment::new(GameConfig::small());

        // Walk straight into the right wall
        let mut outcome = env.play_step(TurnAction::Straight);
        for _ in 0..20 {
            if outcome.done {
                break;
            }
            outcome = env.play_step(TurnAction::Straight);
        }

        assert!(outcome.done);
        assert!(outcome.reward < 0.0);
    }

    #[test]
    fn test_reset_starts_fresh_episode() {
        let mut env = SnakeEnvironment::new(GameConfig::small());
        for _ in 0..3 {
            env.play_step(TurnAction::Straight);
        }
        assert!(env.state().steps > 0);

        env.reset();
        assert_eq!(env.state().steps, 0);
        assert!(env.state().is_alive);
    }

    #[test]
    fn test_is_collision_matches_game_state() {
        let env = SnakeEnvironment::new(GameConfig::small());
        let head = env.head();

        // The cell behind the head is a body segment
        let behind = head.moved_by(-1, 0);
        assert!(env.is_collision(behind));
        assert!(env.is_collision(Position::new(-1, 0)));
        assert!(!env.is_collision(head));
    }
}
