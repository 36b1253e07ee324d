/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
                | (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
        )
    }

    /// Returns the delta (dx, dy) for moving in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Apply a relative turn to this heading.
    ///
    /// `TurnRight` follows the clockwise order Right → Down → Left → Up
    /// (grid y grows downward), `TurnLeft` the counter-clockwise order.
    /// Every heading goes through the same match arm, so the relative-turn
    /// semantics are symmetric across all four headings by construction.
    pub fn turned(&self, turn: TurnAction) -> Direction {
        match turn {
            TurnAction::Straight => *self,
            TurnAction::TurnRight => match self {
                Direction::Right => Direction::Down,
                Direction::Down => Direction::Left,
                Direction::Left => Direction::Up,
                Direction::Up => Direction::Right,
            },
            TurnAction::TurnLeft => match self {
                Direction::Right => Direction::Up,
                Direction::Up => Direction::Left,
                Direction::Left => Direction::Down,
                Direction::Down => Direction::Right,
            },
        }
    }
}

/// Relative action the agent can take: keep heading or turn 90 degrees.
///
/// This is the discrete action space of the RL agent. A relative turn is
/// always legal (a 90-degree turn can never be a 180-degree reversal), which
/// is why the agent acts in this space rather than absolute directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnAction {
    Straight,
    TurnRight,
    TurnLeft,
}

impl TurnAction {
    /// All actions, in one-hot index order.
    pub const ALL: [TurnAction; 3] = [
        TurnAction::Straight,
        TurnAction::TurnRight,
        TurnAction::TurnLeft,
    ];

    /// One-hot index of this action (0 = straight, 1 = right, 2 = left).
    pub fn index(&self) -> usize {
        match self {
            TurnAction::Straight => 0,
            TurnAction::TurnRight => 1,
            TurnAction::TurnLeft => 2,
        }
    }

    /// Action for a one-hot index. Indices outside 0..3 fall back to straight.
    pub fn from_index(idx: usize) -> TurnAction {
        match idx {
            0 => TurnAction::Straight,
            1 => TurnAction::TurnRight,
            2 => TurnAction::TurnLeft,
            _ => TurnAction::Straight,
        }
    }

    /// One-hot encoding of this action.
    pub fn one_hot(&self) -> [f32; 3] {
        let mut v = [0.0; 3];
        v[self.index()] = 1.0;
        v
    }
}

/// Action that can be taken in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move in a specific absolute direction (human input)
    Move(Direction),
    /// Turn relative to the current heading (agent input)
    Turn(TurnAction),
    /// Continue in current direction
    Continue,
}

impl From<Direction> for Action {
    fn from(direction: Direction) -> Self {
        Action::Move(direction)
    }
}

impl From<TurnAction> for Action {
    fn from(turn: TurnAction) -> Self {
        Action::Turn(turn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_directions() {
        assert!(Direction::Up.is_opposite(Direction::Down));
        assert!(Direction::Down.is_opposite(Direction::Up));
        assert!(Direction::Left.is_opposite(Direction::Right));
        assert!(Direction::Right.is_opposite(Direction::Left));

        assert!(!Direction::Up.is_opposite(Direction::Left));
        assert!(!Direction::Up.is_opposite(Direction::Right));
    }

    #[test]
    fn test_direction_delta() {
        assert_eq!(Direction::Up.delta(), (0, -1));
        assert_eq!(Direction::Down.delta(), (0, 1));
        assert_eq!(Direction::Left.delta(), (-1, 0));
        assert_eq!(Direction::Right.delta(), (1, 0));
    }

    #[test]
    fn test_turn_right_is_clockwise() {
        assert_eq!(
            Direction::Right.turned(TurnAction::TurnRight),
            Direction::Down
        );
        assert_eq!(
            Direction::Down.turned(TurnAction::TurnRight),
            Direction::Left
        );
        assert_eq!(Direction::Left.turned(TurnAction::TurnRight), Direction::Up);
        assert_eq!(Direction::Up.turned(TurnAction::TurnRight), Direction::Right);
    }

    #[test]
    fn test_turn_left_inverts_turn_right() {
        for dir in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            assert_eq!(
                dir.turned(TurnAction::TurnRight).turned(TurnAction::TurnLeft),
                dir
            );
        }
    }

    #[test]
    fn test_straight_keeps_heading() {
        for dir in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            assert_eq!(dir.turned(TurnAction::Straight), dir);
        }
    }

    #[test]
    fn test_four_right_turns_are_identity() {
        let mut dir = Direction::Up;
        for _ in 0..4 {
            dir = dir.turned(TurnAction::TurnRight);
        }
        assert_eq!(dir, Direction::Up);
    }

    #[test]
    fn test_one_hot_round_trip() {
        for action in TurnAction::ALL {
            assert_eq!(TurnAction::from_index(action.index()), action);
            let one_hot = action.one_hot();
            assert_eq!(one_hot.iter().sum::<f32>(), 1.0);
            assert_eq!(one_hot[action.index()], 1.0);
        }
    }
}
