use super::{
    action::{Action, TurnAction},
    config::GameConfig,
    state::{CollisionType, GameState, Position, Snake},
};
use rand::Rng;

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Reward for this step (for RL training)
    pub reward: f32,
    /// Whether the game has terminated
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: rand::rngs::ThreadRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: rand::thread_rng(),
        }
    }

    /// Reset the game to initial state
    pub fn reset(&mut self) -> GameState {
        let center_x = (self.config.grid_width / 2) as i32;
        let center_y = (self.config.grid_height / 2) as i32;

        let snake = Snake::new(
            Position::new(center_x, center_y),
            super::action::Direction::Right,
            self.config.initial_snake_length,
        );

        let food = self.spawn_food_avoid_snake(&snake);

        GameState::new(snake, food, self.config.grid_width, self.config.grid_height)
    }

    /// Execute one step of the game
    pub fn step(&mut self, state: &mut GameState, action: Action) -> StepResult {
        if !state.is_alive {
            return StepResult {
                reward: 0.0,
                terminated: true,
                info: StepInfo {
                    ate_food: false,
                    collision_type: None,
                },
            };
        }

        // Update heading. Absolute moves ignore 180-degree reversals;
        // relative turns are always legal.
        match action {
            Action::Move(new_direction) => {
                if !state.snake.direction.is_opposite(new_direction) {
                    state.snake.direction = new_direction;
                }
            }
            Action::Turn(turn) => {
                state.snake.direction = state.snake.direction.turned(turn);
            }
            Action::Continue => {
                state.snake.direction = state.snake.direction.turned(TurnAction::Straight);
            }
        }

        // Calculate new head position
        let new_head = state.snake.head().moved_in_direction(state.snake.direction);

        // Check for collisions
        if let Some(collision_type) = self.check_collision(state, new_head) {
            state.is_alive = false;
            state.steps += 1;

            return StepResult {
                reward: self.config.death_penalty,
                terminated: true,
                info: StepInfo {
                    ate_food: false,
                    collision_type: Some(collision_type),
                },
            };
        }

        // Hunger cutoff: too many steps without food ends the episode as a
        // death, so training episodes always terminate.
        if state.steps_since_food >= self.config.hunger_budget(state.snake.len()) {
            state.is_alive = false;
            state.steps += 1;

            return StepResult {
                reward: self.config.death_penalty,
                terminated: true,
                info: StepInfo {
                    ate_food: false,
                    collision_type: Some(CollisionType::Starvation),
                },
            };
        }

        // Check if snake ate food
        let ate_food = new_head == state.food;

        // Move snake (grow if ate food)
        state.snake.move_snake(ate_food);

        // Update score and spawn new food if needed
        let mut reward = self.config.step_reward;

        if ate_food {
            state.score += 1;
            state.steps_since_food = 0;
            state.food = self.spawn_food_avoid_snake(&state.snake);
            reward += self.config.food_reward;
        } else {
            state.steps_since_food += 1;
        }

        state.steps += 1;

        StepResult {
            reward,
            terminated: false,
            info: StepInfo {
                ate_food,
                collision_type: None,
            },
        }
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<CollisionType> {
        if !state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        if state.snake.collides_with_body(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Spawn food at a random empty position
    fn spawn_food_avoid_snake(&mut self, snake: &Snake) -> Position {
        loop {
            let x = self.rng.gen_range(0..self.config.grid_width) as i32;
            let y = self.rng.gen_range(0..self.config.grid_height) as i32;
            let pos = Position::new(x, y);

            if !snake.body.contains(&pos) {
                return pos;
            }
        }
    }
}
