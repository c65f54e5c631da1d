//! Grid world: a rectangular board with one goal cell and a set of pits

use serde::{Deserialize, Serialize};
use tracing::debug;

use rlai_core::{Choose, Constant, MarkovDecisionProcess, NonTerminal, Result, RlaiError, State};

/// A cell `(x, y)` with `x` in `[0, width)` and `y` in `[0, height)`
pub type Cell = (usize, usize);

/// Moves on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridAction {
    /// `y + 1`
    Up,
    /// `y - 1`
    Down,
    /// `x - 1`
    Left,
    /// `x + 1`
    Right,
}

impl GridAction {
    /// Every action, in a fixed order
    pub const ALL: [GridAction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];
}

/// Layout of a grid world
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridWorldConfig {
    /// Number of columns
    pub width: usize,
    /// Number of rows
    pub height: usize,
    /// Where every episode starts
    pub start: Cell,
    /// Terminal cell paying `+1` on arrival
    pub goal: Cell,
    /// Terminal cells paying `-1` on arrival
    pub pits: Vec<Cell>,
}

impl Default for GridWorldConfig {
    fn default() -> Self {
        Self {
            width: 5,
            height: 5,
            start: (0, 0),
            goal: (4, 3),
            pits: vec![(1, 0), (1, 1), (1, 2), (1, 3), (3, 4), (3, 3)],
        }
    }
}

/// Reward for reaching the goal
pub const GOAL_REWARD: f64 = 1.0;
/// Reward for falling into a pit or walking off the board
pub const PENALTY: f64 = -1.0;

/// Deterministic grid world MDP.
///
/// Walking off the board ends the episode where the agent stands, with
/// [`PENALTY`]. Entering the goal pays [`GOAL_REWARD`], entering a pit pays
/// [`PENALTY`], and every other move pays nothing.
#[derive(Debug, Clone)]
pub struct GridWorld {
    config: GridWorldConfig,
}

impl GridWorld {
    /// Create a grid world, validating its layout
    pub fn new(config: GridWorldConfig) -> Result<Self> {
        let GridWorldConfig {
            width,
            height,
            start,
            goal,
            ref pits,
        } = config;

        if width == 0 || height == 0 {
            return Err(RlaiError::InvalidParameter(format!(
                "grid must be non-empty, got {width}x{height}"
            )));
        }

        if width.checked_mul(height).is_none() {
            return Err(RlaiError::InvalidParameter(format!(
                "grid of {width}x{height} cells is too large"
            )));
        }

        let in_bounds = |(x, y): Cell| x < width && y < height;
        let mut cells = [start, goal].into_iter().chain(pits.iter().copied());
        if let Some(cell) = cells.find(|&c| !in_bounds(c)) {
            return Err(RlaiError::InvalidParameter(format!(
                "cell {cell:?} lies outside the {width}x{height} grid"
            )));
        }
        if start == goal || pits.contains(&start) {
            return Err(RlaiError::InvalidParameter(format!(
                "start cell {start:?} must not be terminal"
            )));
        }
        if pits.contains(&goal) {
            return Err(RlaiError::InvalidParameter(format!(
                "goal cell {goal:?} is also a pit"
            )));
        }

        debug!(width, height, ?start, ?goal, pits = pits.len(), "created grid world");
        Ok(Self { config })
    }

    /// The layout this world was built from
    pub fn config(&self) -> &GridWorldConfig {
        &self.config
    }

    /// Every cell, column by column
    pub fn states(&self) -> Vec<Cell> {
        let mut states = Vec::with_capacity(self.config.width * self.config.height);
        for x in 0..self.config.width {
            for y in 0..self.config.height {
                states.push((x, y));
            }
        }
        states
    }

    /// Whether `cell` ends an episode
    pub fn is_terminal(&self, cell: Cell) -> bool {
        cell == self.config.goal || self.config.pits.contains(&cell)
    }

    /// Classify a cell as terminal or non-terminal
    pub fn classify(&self, cell: Cell) -> State<Cell> {
        if self.is_terminal(cell) {
            State::Terminal(cell)
        } else {
            State::NonTerminal(cell)
        }
    }

    /// Every episode starts on the configured start cell
    pub fn start_distribution(&self) -> Constant<NonTerminal<Cell>> {
        Constant::new(NonTerminal(self.config.start))
    }

    /// Start on any non-terminal cell with equal probability
    pub fn uniform_start_distribution(&self) -> Result<Choose<NonTerminal<Cell>>> {
        let cells = self
            .states()
            .into_iter()
            .filter(|&cell| !self.is_terminal(cell))
            .map(NonTerminal)
            .collect();
        Choose::new(cells)
    }

    /// The cell `action` leads to, or `None` when it leaves the board
    pub fn neighbour(&self, (x, y): Cell, action: GridAction) -> Option<Cell> {
        match action {
            GridAction::Up if y + 1 < self.config.height => Some((x, y + 1)),
            GridAction::Down if y > 0 => Some((x, y - 1)),
            GridAction::Left if x > 0 => Some((x - 1, y)),
            GridAction::Right if x + 1 < self.config.width => Some((x + 1, y)),
            _ => None,
        }
    }

    fn arrival_reward(&self, cell: Cell) -> f64 {
        if cell == self.config.goal {
            GOAL_REWARD
        } else if self.config.pits.contains(&cell) {
            PENALTY
        } else {
            0.0
        }
    }
}

impl MarkovDecisionProcess<Cell, GridAction> for GridWorld {
    type Outcome = Constant<(State<Cell>, f64)>;

    /// Moves that stay on the board. Terminal cells offer none.
    fn actions_at(&self, state: &NonTerminal<Cell>) -> Vec<GridAction> {
        let cell = state.0;
        if self.is_terminal(cell) {
            return Vec::new();
        }
        GridAction::ALL
            .into_iter()
            .filter(|&action| self.neighbour(cell, action).is_some())
            .collect()
    }

    /// Stepping from a terminal cell ends the episode in place with [`PENALTY`].
    fn step(&self, state: &NonTerminal<Cell>, action: &GridAction) -> Self::Outcome {
        let cell = state.0;
        if self.is_terminal(cell) {
            return Constant::new((State::Terminal(cell), PENALTY));
        }

        let outcome = match self.neighbour(cell, *action) {
            Some(next) => (self.classify(next), self.arrival_reward(next)),
            None => (State::Terminal(cell), PENALTY),
        };
        Constant::new(outcome)
    }
}
