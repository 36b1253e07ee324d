//! Feature extraction: environment snapshot → fixed 11-element state vector
//!
//! The state is deliberately tiny. Instead of feeding the whole grid to the
//! network, the snake's situation is summarized as 11 binary features:
//!
//! - 3 danger flags: would the head collide if it moved straight, relative
//!   right, or relative left of the current heading
//! - 4 one-hot heading flags (left / right / up / down)
//! - 4 food-direction flags (food left of / right of / above / below head)
//!
//! Extraction is a pure function of the environment snapshot: it reads the
//! head, heading, food position and the collision predicate, and has no side
//! effects.

use burn::tensor::{backend::Backend, Tensor, TensorData};

use crate::game::TurnAction;
use crate::rl::environment::Environment;

/// Number of features in a state vector
pub const STATE_DIM: usize = 11;

/// Fixed-length state vector observed by the agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State(pub [f32; STATE_DIM]);

impl State {
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Danger flags in (straight, right, left) order
    pub fn danger(&self) -> (bool, bool, bool) {
        (self.0[0] == 1.0, self.0[1] == 1.0, self.0[2] == 1.0)
    }

    /// Heading one-hot flags in (left, right, up, down) order
    pub fn heading(&self) -> [f32; 4] {
        [self.0[3], self.0[4], self.0[5], self.0[6]]
    }

    /// Food-direction flags in (left, right, up, down) order
    pub fn food_direction(&self) -> [f32; 4] {
        [self.0[7], self.0[8], self.0[9], self.0[10]]
    }
}

/// Observe the environment and build the 11-element state vector.
///
/// The straight / right / left candidate points are the cells one grid unit
/// from the head along the current heading and its clockwise / counter-
/// clockwise rotations; the rotation itself lives in `Direction::turned`, so
/// all four headings share one code path and the relative-turn convention
/// cannot drift between them.
pub fn observe<E: Environment + ?Sized>(env: &E) -> State {
    let head = env.head();
    let heading = env.direction();
    let food = env.food();

    let point_straight = head.moved_in_direction(heading.turned(TurnAction::Straight));
    let point_right = head.moved_in_direction(heading.turned(TurnAction::TurnRight));
    let point_left = head.moved_in_direction(heading.turned(TurnAction::TurnLeft));

    let flag = |b: bool| if b { 1.0 } else { 0.0 };

    use crate::game::Direction::*;
    State([
        // Danger straight / right / left
        flag(env.is_collision(point_straight)),
        flag(env.is_collision(point_right)),
        flag(env.is_collision(point_left)),
        // Heading one-hot
        flag(heading == Left),
        flag(heading == Right),
        flag(heading == Up),
        flag(heading == Down),
        // Food location relative to the head (grid y grows downward)
        flag(food.x < head.x),
        flag(food.x > head.x),
        flag(food.y < head.y),
        flag(food.y > head.y),
    ])
}

/// Flatten a batch of states into a `[batch, STATE_DIM]` tensor.
pub fn batch_to_tensor<B: Backend>(states: &[State], device: &B::Device) -> Tensor<B, 2> {
    let flat: Vec<f32> = states.iter().flat_map(|s| s.0).collect();
    Tensor::from_data(TensorData::new(flat, [states.len(), STATE_DIM]), device)
}
