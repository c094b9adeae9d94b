#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tron grid engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems inspect read-only world
//! views and answer with [`Command`] values, the world executes those commands
//! via its `apply` entry point and reports the outcome through [`Event`]
//! values. The traversal policy that decides which actor may step onto which
//! occupant lives here as well, so path search and movement share a single
//! source of truth.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name under which the controlled agent is registered.
pub const TRON_NAME: &str = "Tron";

/// Name under which the goal is registered.
pub const TOWER_NAME: &str = "IOTower";

/// Location of a single grid cell expressed as row and column coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Cardinal movement directions available on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in the order searches expand neighbours.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Direction that undoes a step in this direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Single-letter symbol used by move prompts and path reports.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Up => 'u',
            Self::Down => 'd',
            Self::Left => 'l',
            Self::Right => 'r',
        }
    }

    /// Lowercase word accepted in place of the symbol.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Parses the single-letter symbol produced by [`Direction::symbol`].
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'u' => Some(Self::Up),
            'd' => Some(Self::Down),
            'l' => Some(Self::Left),
            'r' => Some(Self::Right),
            _ => None,
        }
    }

    /// Direction leading from `from` to the orthogonally adjacent `to`.
    #[must_use]
    pub fn between(from: CellCoord, to: CellCoord) -> Option<Self> {
        let column_diff = from.column().abs_diff(to.column());
        let row_diff = from.row().abs_diff(to.row());
        if column_diff + row_diff != 1 {
            return None;
        }

        if row_diff == 1 {
            if to.row() < from.row() {
                Some(Self::Up)
            } else {
                Some(Self::Down)
            }
        } else if to.column() < from.column() {
            Some(Self::Left)
        } else {
            Some(Self::Right)
        }
    }
}

/// Unique identifier assigned to an entity by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Kinds of actors that can occupy a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// The controlled agent.
    Tron,
    /// The goal Tron tries to reach.
    IoTower,
    /// Static impassable cell content.
    Obstacle,
    /// Autonomous pursuer identified by a single character.
    GridBug,
}

impl EntityKind {
    /// Outcome of an actor of this kind entering a cell with the given occupant.
    ///
    /// `None` means the step is illegal. Terminal entries ([`Entry::Reach`] and
    /// [`Entry::Catch`]) end the game, so a path may finish on such a cell but
    /// never continue through it.
    #[must_use]
    pub const fn entry(self, occupant: Option<EntityKind>) -> Option<Entry> {
        let Some(occupant) = occupant else {
            return Some(Entry::Free);
        };

        match (self, occupant) {
            (_, Self::Obstacle) => None,
            (Self::Tron, Self::IoTower) => Some(Entry::Reach),
            (Self::Tron, Self::GridBug) => Some(Entry::Catch),
            (Self::GridBug, Self::Tron) => Some(Entry::Catch),
            _ => None,
        }
    }

    /// Reports whether an actor of this kind may step onto the given occupant.
    #[must_use]
    pub const fn can_enter(self, occupant: Option<EntityKind>) -> bool {
        self.entry(occupant).is_some()
    }
}

/// Result of a legal step according to the traversal policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Entry {
    /// The destination was empty.
    Free,
    /// Tron stepped onto the I/O Tower.
    Reach,
    /// Tron and a grid bug now share a cell.
    Catch,
}

impl Entry {
    /// Reports whether entering ends the game.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Free)
    }

    /// Game state that results from the entry.
    #[must_use]
    pub const fn resulting_state(self) -> GameState {
        match self {
            Self::Free => GameState::Running,
            Self::Reach => GameState::Win,
            Self::Catch => GameState::Lose,
        }
    }
}

/// Progress of a game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Turns are still being played.
    #[default]
    Running,
    /// Tron reached the I/O Tower.
    Win,
    /// A grid bug caught Tron.
    Lose,
}

impl GameState {
    /// Reports whether no further turns may be played.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Path search algorithms available to the pathfinder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathAlgorithm {
    /// Level-order search minimising hop count.
    #[default]
    BreadthFirst,
    /// Uniform-cost search with edge costs biased toward a reference route.
    Weighted,
}

/// Route whose cells make weighted edges cheap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceRoute {
    /// Shortest hop path from the searching entity to Tron.
    #[default]
    SearcherToTron,
    /// Tron's own shortest hop path to the I/O Tower.
    TronToTower,
}

/// Describes how the game loop treats the grid bugs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayMode {
    /// One Tron move, then every bug reports its path without moving.
    #[default]
    Preview,
    /// Full turns with bugs following breadth-first paths.
    Chase,
    /// Full turns with bugs following weighted paths.
    Intercept,
}

impl PlayMode {
    /// Maps the numeric selector `0`, `1` or `2` onto a mode.
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Preview),
            1 => Some(Self::Chase),
            2 => Some(Self::Intercept),
            _ => None,
        }
    }

    /// Algorithm used to plan bug paths in this mode.
    #[must_use]
    pub const fn algorithm(self) -> PathAlgorithm {
        match self {
            Self::Preview | Self::Chase => PathAlgorithm::BreadthFirst,
            Self::Intercept => PathAlgorithm::Weighted,
        }
    }

    /// Reports whether full turns are played, moving the bugs.
    #[must_use]
    pub const fn plays_turns(self) -> bool {
        !matches!(self, Self::Preview)
    }
}

/// Reasons a move request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum IllegalMove {
    /// The step would leave the grid.
    #[error("the move leaves the grid")]
    OffGrid,
    /// The destination holds an occupant the mover may not enter.
    #[error("the destination is blocked by {0:?}")]
    Blocked(EntityKind),
    /// The destination is not adjacent to the mover.
    #[error("the destination is not adjacent to the mover")]
    NotAdjacent,
    /// The game already reached a terminal state.
    #[error("the game is over")]
    GameOver,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests that Tron advance a single step.
    MoveTron {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Requests that a grid bug advance onto an adjacent cell.
    StepBug {
        /// Identifier of the bug attempting to move.
        bug_id: EntityId,
        /// Cell the bug wants to occupy after the step.
        to: CellCoord,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that Tron moved between two cells.
    TronMoved {
        /// Cell Tron occupied before moving.
        from: CellCoord,
        /// Cell Tron occupies after moving.
        to: CellCoord,
    },
    /// Confirms that a bug moved between two cells.
    BugAdvanced {
        /// Identifier of the bug that advanced.
        bug_id: EntityId,
        /// Cell the bug occupied before moving.
        from: CellCoord,
        /// Cell the bug occupies after moving.
        to: CellCoord,
    },
    /// Reports that a move command was rejected.
    MoveRejected {
        /// Entity whose move was refused.
        entity: EntityId,
        /// Specific reason the move failed.
        reason: IllegalMove,
    },
    /// Announces that the game entered a new state.
    GameStateChanged {
        /// State that became active after processing the command.
        state: GameState,
    },
}

/// Immutable representation of a single entity used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// Identifier allocated to the entity by the world.
    pub id: EntityId,
    /// Kind of the entity.
    pub kind: EntityKind,
    /// Character that represented the entity in the grid layout.
    pub symbol: char,
    /// Cell the entity currently occupies.
    pub cell: CellCoord,
}

impl EntitySnapshot {
    /// Name used to look the entity up.
    #[must_use]
    pub fn name(&self) -> String {
        match self.kind {
            EntityKind::Tron => TRON_NAME.to_owned(),
            EntityKind::IoTower => TOWER_NAME.to_owned(),
            EntityKind::Obstacle => "Obstacle".to_owned(),
            EntityKind::GridBug => self.symbol.to_string(),
        }
    }
}

/// Ordered cells from a searching entity to its target, both inclusive.
///
/// An empty path means the target is unreachable. A single cell means the
/// searcher already stands on the target.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    cells: Vec<CellCoord>,
}

impl Path {
    /// Wraps the provided cells.
    #[must_use]
    pub fn new(cells: Vec<CellCoord>) -> Self {
        Self { cells }
    }

    /// Path that reaches no target.
    #[must_use]
    pub const fn unreachable() -> Self {
        Self { cells: Vec::new() }
    }

    /// Cells along the path.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Reports whether no route was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of steps along the path, or `None` if no route was found.
    #[must_use]
    pub fn hop_count(&self) -> Option<usize> {
        self.cells.len().checked_sub(1)
    }

    /// Cell reached by the first step, if the path has one.
    #[must_use]
    pub fn next_hop(&self) -> Option<CellCoord> {
        self.cells.get(1).copied()
    }

    /// Reports whether the cell lies on the path.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.cells.contains(&cell)
    }

    /// Consumes the path, yielding the underlying cells.
    #[must_use]
    pub fn into_vec(self) -> Vec<CellCoord> {
        self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(3, 4);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn cell_coord_displays_row_then_column() {
        assert_eq!(CellCoord::new(2, 7).to_string(), "(2, 7)");
    }

    #[test]
    fn direction_between_neighbors() {
        let origin = CellCoord::new(3, 3);
        assert_eq!(
            Direction::between(origin, CellCoord::new(2, 3)),
            Some(Direction::Up)
        );
        assert_eq!(
            Direction::between(origin, CellCoord::new(4, 3)),
            Some(Direction::Down)
        );
        assert_eq!(
            Direction::between(origin, CellCoord::new(3, 2)),
            Some(Direction::Left)
        );
        assert_eq!(
            Direction::between(origin, CellCoord::new(3, 4)),
            Some(Direction::Right)
        );
        assert_eq!(Direction::between(origin, origin), None);
        assert_eq!(Direction::between(origin, CellCoord::new(4, 4)), None);
    }

    #[test]
    fn direction_symbols_parse_back() {
        for direction in Direction::ALL {
            assert_eq!(Direction::from_symbol(direction.symbol()), Some(direction));
            assert_eq!(direction.opposite().opposite(), direction);
        }
        assert_eq!(Direction::from_symbol('x'), None);
        assert_eq!(Direction::Left.name(), "left");
    }

    #[test]
    fn any_mover_enters_empty_cells() {
        for kind in [
            EntityKind::Tron,
            EntityKind::IoTower,
            EntityKind::Obstacle,
            EntityKind::GridBug,
        ] {
            assert_eq!(kind.entry(None), Some(Entry::Free));
            assert!(!kind.can_enter(Some(EntityKind::Obstacle)));
        }
    }

    #[test]
    fn tron_reaches_tower_and_collides_with_bugs() {
        let tron = EntityKind::Tron;
        assert_eq!(tron.entry(Some(EntityKind::IoTower)), Some(Entry::Reach));
        assert_eq!(tron.entry(Some(EntityKind::GridBug)), Some(Entry::Catch));
        assert_eq!(tron.entry(Some(EntityKind::Tron)), None);
    }

    #[test]
    fn bugs_only_enter_tron() {
        let bug = EntityKind::GridBug;
        assert_eq!(bug.entry(Some(EntityKind::Tron)), Some(Entry::Catch));
        assert_eq!(bug.entry(Some(EntityKind::GridBug)), None);
        assert_eq!(bug.entry(Some(EntityKind::IoTower)), None);
    }

    #[test]
    fn static_kinds_never_enter_occupied_cells() {
        for occupant in [EntityKind::Tron, EntityKind::GridBug, EntityKind::IoTower] {
            assert!(!EntityKind::IoTower.can_enter(Some(occupant)));
            assert!(!EntityKind::Obstacle.can_enter(Some(occupant)));
        }
    }

    #[test]
    fn terminal_entries_map_to_end_states() {
        assert!(!Entry::Free.is_terminal());
        assert_eq!(Entry::Reach.resulting_state(), GameState::Win);
        assert_eq!(Entry::Catch.resulting_state(), GameState::Lose);
        assert!(GameState::Win.is_terminal());
        assert!(!GameState::Running.is_terminal());
    }

    #[test]
    fn play_mode_selectors() {
        assert_eq!(PlayMode::from_index(0), Some(PlayMode::Preview));
        assert_eq!(
            PlayMode::from_index(2).map(PlayMode::algorithm),
            Some(PathAlgorithm::Weighted)
        );
        assert!(PlayMode::Chase.plays_turns());
        assert!(!PlayMode::Preview.plays_turns());
        assert_eq!(PlayMode::from_index(3), None);
    }

    #[test]
    fn path_accessors() {
        let path = Path::new(vec![
            CellCoord::new(0, 2),
            CellCoord::new(0, 1),
            CellCoord::new(0, 0),
        ]);
        assert_eq!(path.hop_count(), Some(2));
        assert_eq!(path.next_hop(), Some(CellCoord::new(0, 1)));
        assert!(path.contains(CellCoord::new(0, 0)));
        assert_eq!(Path::unreachable().hop_count(), None);
        assert_eq!(Path::new(vec![CellCoord::new(1, 1)]).next_hop(), None);
    }

    #[test]
    fn entity_names_follow_kind() {
        let bug = EntitySnapshot {
            id: EntityId::new(3),
            kind: EntityKind::GridBug,
            symbol: 'q',
            cell: CellCoord::new(0, 0),
        };
        assert_eq!(bug.name(), "q");
        let tower = EntitySnapshot {
            kind: EntityKind::IoTower,
            symbol: 'I',
            ..bug
        };
        assert_eq!(tower.name(), TOWER_NAME);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn path_round_trips_through_bincode() {
        let path = Path::new(vec![CellCoord::new(4, 1), CellCoord::new(4, 2)]);
        assert_round_trip(&path);
    }

    #[test]
    fn illegal_move_round_trips_through_bincode() {
        assert_round_trip(&IllegalMove::Blocked(EntityKind::Obstacle));
    }
}
