#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the Tron grid game.
//!
//! The world owns the grid topology, the entity arena and the dense
//! occupancy arena that cross-reference each other by index. All mutations
//! flow through [`apply`], which validates commands against the traversal
//! policy and reports the outcome as [`Event`] values.

mod grid;
mod layout;

use thiserror::Error;
use tracing::{debug, info};
use tron_grid_core::{
    CellCoord, Command, EntityId, EntityKind, EntitySnapshot, Event, GameState, IllegalMove,
};

pub use grid::Grid;
pub use layout::ConfigurationError;

/// Failure to resolve an entity by name.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LookupError {
    /// No entity is registered under the name.
    #[error("no entity named {0:?}")]
    NotFound(String),
}

const TRON_ID: EntityId = EntityId::new(0);
const TOWER_ID: EntityId = EntityId::new(1);
const FIRST_OTHER_ID: u32 = 2;

/// Represents the authoritative Tron grid world state.
///
/// Tron and the tower hold the first two ids. Obstacles and bugs follow in
/// `others`.
#[derive(Clone, Debug)]
pub struct World {
    grid: Grid,
    tron: Entity,
    tower: Entity,
    others: Vec<Entity>,
    occupancy: Vec<Option<EntityId>>,
    bugs: Vec<EntityId>,
    state: GameState,
}

impl World {
    /// Builds a world from `rows` symbol lines describing `columns` cells each.
    ///
    /// `T` places Tron, `I` the I/O Tower, `#` an obstacle and a space leaves
    /// the cell empty. Any other character places a grid bug named after it.
    pub fn from_rows<S: AsRef<str>>(
        rows: u32,
        columns: u32,
        lines: &[S],
    ) -> Result<Self, ConfigurationError> {
        let layout = layout::parse(rows, columns, lines)?;
        let grid = Grid::new(rows, columns);

        let mut world = Self {
            grid,
            tron: Entity::from(layout.tron),
            tower: Entity::from(layout.tower),
            others: Vec::with_capacity(layout.others.len()),
            occupancy: vec![None; grid.cell_count()],
            bugs: Vec::new(),
            state: GameState::Running,
        };
        world.occupy(TRON_ID, layout.tron.cell);
        world.occupy(TOWER_ID, layout.tower.cell);

        for (value, placement) in (FIRST_OTHER_ID..).zip(layout.others) {
            let id = EntityId::new(value);
            world.occupy(id, placement.cell);
            if placement.kind == EntityKind::GridBug {
                world.bugs.push(id);
            }
            world.others.push(Entity::from(placement));
        }

        info!(
            rows,
            columns,
            bugs = world.bugs.len(),
            "grid initialised"
        );
        Ok(world)
    }

    fn occupy(&mut self, id: EntityId, cell: CellCoord) {
        if let Some(slot) = self
            .grid
            .index(cell)
            .and_then(|index| self.occupancy.get_mut(index))
        {
            *slot = Some(id);
        }
    }

    fn other_index(id: EntityId) -> Option<usize> {
        id.get()
            .checked_sub(FIRST_OTHER_ID)
            .and_then(|offset| usize::try_from(offset).ok())
    }

    fn entity(&self, id: EntityId) -> Option<&Entity> {
        match id {
            TRON_ID => Some(&self.tron),
            TOWER_ID => Some(&self.tower),
            _ => Self::other_index(id).and_then(|index| self.others.get(index)),
        }
    }

    fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        match id {
            TRON_ID => Some(&mut self.tron),
            TOWER_ID => Some(&mut self.tower),
            _ => Self::other_index(id).and_then(|index| self.others.get_mut(index)),
        }
    }

    fn occupant_kind(&self, cell: CellCoord) -> Option<EntityKind> {
        self.grid
            .index(cell)
            .and_then(|index| self.occupancy[index])
            .and_then(|id| self.entity(id))
            .map(|entity| entity.kind)
    }

    /// Moves the entity into `destination`, keeping both arenas consistent.
    ///
    /// The source slot is cleared only while it still points at the entity,
    /// the destination slot takes the entity and the entity records its new
    /// cell. An entity displaced from `destination` keeps its recorded cell.
    fn relocate(&mut self, id: EntityId, destination: CellCoord) {
        let Some(to_index) = self.grid.index(destination) else {
            return;
        };
        let grid = self.grid;
        let Some(entity) = self.entity_mut(id) else {
            return;
        };
        let from_index = grid.index(entity.cell);
        entity.cell = destination;

        if let Some(from_index) = from_index {
            if self.occupancy[from_index] == Some(id) {
                self.occupancy[from_index] = None;
            }
        }
        self.occupancy[to_index] = Some(id);
    }

    fn step(
        &mut self,
        id: EntityId,
        destination: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> Result<(), IllegalMove> {
        if self.state.is_terminal() {
            return Err(IllegalMove::GameOver);
        }

        let Some(mover) = self.entity(id).copied() else {
            return Err(IllegalMove::OffGrid);
        };
        if !self.grid.contains(destination) {
            return Err(IllegalMove::OffGrid);
        }
        if mover.cell.manhattan_distance(destination) != 1 {
            return Err(IllegalMove::NotAdjacent);
        }

        let occupant = self.occupant_kind(destination);
        let entry = match (mover.kind.entry(occupant), occupant) {
            (Some(entry), _) => entry,
            (None, Some(kind)) => return Err(IllegalMove::Blocked(kind)),
            (None, None) => return Err(IllegalMove::OffGrid),
        };

        self.relocate(id, destination);
        let from = mover.cell;
        out_events.push(match mover.kind {
            EntityKind::Tron => Event::TronMoved {
                from,
                to: destination,
            },
            _ => Event::BugAdvanced {
                bug_id: id,
                from,
                to: destination,
            },
        });

        if entry.is_terminal() {
            self.state = entry.resulting_state();
            info!(state = ?self.state, symbol = %mover.symbol, cell = %destination, "game over");
            out_events.push(Event::GameStateChanged { state: self.state });
        }

        Ok(())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let (entity, outcome) = match command {
        Command::MoveTron { direction } => {
            let destination = world.grid.neighbor(world.tron.cell, direction);
            let outcome = match destination {
                _ if world.state.is_terminal() => Err(IllegalMove::GameOver),
                Some(destination) => world.step(TRON_ID, destination, out_events),
                None => Err(IllegalMove::OffGrid),
            };
            (TRON_ID, outcome)
        }
        Command::StepBug { bug_id, to } => {
            let is_bug = world
                .entity(bug_id)
                .is_some_and(|entity| entity.kind == EntityKind::GridBug);
            if !is_bug {
                debug!(entity = bug_id.get(), "ignored step for a non-bug entity");
                return;
            }
            (bug_id, world.step(bug_id, to, out_events))
        }
    };

    if let Err(reason) = outcome {
        debug!(entity = entity.get(), %reason, "move rejected");
        out_events.push(Event::MoveRejected { entity, reason });
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use tron_grid_core::{
        CellCoord, EntityId, EntityKind, EntitySnapshot, Entry, GameState, TOWER_NAME, TRON_NAME,
    };

    use super::{Grid, LookupError, World, TOWER_ID, TRON_ID};

    /// Current progress of the game.
    #[must_use]
    pub fn game_state(world: &World) -> GameState {
        world.state
    }

    /// Provides read-only access to the grid topology.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Snapshot of Tron.
    #[must_use]
    pub fn tron(world: &World) -> EntitySnapshot {
        world.tron.snapshot(TRON_ID)
    }

    /// Snapshot of the I/O Tower.
    #[must_use]
    pub fn tower(world: &World) -> EntitySnapshot {
        world.tower.snapshot(TOWER_ID)
    }

    /// Snapshots of every grid bug in ascending name order.
    #[must_use]
    pub fn bugs(world: &World) -> Vec<EntitySnapshot> {
        world
            .bugs
            .iter()
            .filter_map(|&id| snapshot(world, id))
            .collect()
    }

    /// Resolves `"Tron"`, `"IOTower"` or a single-character bug name.
    pub fn entity_by_name(world: &World, name: &str) -> Result<EntitySnapshot, LookupError> {
        match name {
            TRON_NAME => return Ok(tron(world)),
            TOWER_NAME => return Ok(tower(world)),
            _ => {}
        }

        let mut symbols = name.chars();
        match (symbols.next(), symbols.next()) {
            (Some(symbol), None) => bugs(world)
                .into_iter()
                .find(|bug| bug.symbol == symbol)
                .ok_or_else(|| LookupError::NotFound(name.to_owned())),
            _ => Err(LookupError::NotFound(name.to_owned())),
        }
    }

    /// Exposes a read-only view of the occupancy arena.
    #[must_use]
    pub fn occupancy_view(world: &World) -> OccupancyView<'_> {
        OccupancyView { world }
    }

    fn snapshot(world: &World, id: EntityId) -> Option<EntitySnapshot> {
        world.entity(id).map(|entity| entity.snapshot(id))
    }

    /// Read-only view into the grid and the entities occupying it.
    #[derive(Clone, Copy, Debug)]
    pub struct OccupancyView<'a> {
        world: &'a World,
    }

    impl<'a> OccupancyView<'a> {
        /// Grid topology backing the view.
        #[must_use]
        pub fn grid(&self) -> &'a Grid {
            &self.world.grid
        }

        /// Provides the dimensions of the grid as `(rows, columns)`.
        #[must_use]
        pub fn dimensions(&self) -> (u32, u32) {
            (self.world.grid.rows(), self.world.grid.columns())
        }

        /// Returns the entity occupying the provided cell, if any.
        #[must_use]
        pub fn occupant(&self, cell: CellCoord) -> Option<EntitySnapshot> {
            let index = self.world.grid.index(cell)?;
            self.world.occupancy[index].and_then(|id| snapshot(self.world, id))
        }

        /// Kind of the entity occupying the provided cell, if any.
        #[must_use]
        pub fn occupant_kind(&self, cell: CellCoord) -> Option<EntityKind> {
            self.world.occupant_kind(cell)
        }

        /// Traversal policy outcome of `mover` stepping onto `cell`.
        ///
        /// Cells outside the grid are never enterable.
        #[must_use]
        pub fn entry(&self, mover: EntityKind, cell: CellCoord) -> Option<Entry> {
            if !self.world.grid.contains(cell) {
                return None;
            }
            mover.entry(self.occupant_kind(cell))
        }

        /// Cell currently occupied by Tron.
        #[must_use]
        pub fn tron_cell(&self) -> CellCoord {
            self.world.tron.cell
        }

        /// Cell currently occupied by the I/O Tower.
        #[must_use]
        pub fn tower_cell(&self) -> CellCoord {
            self.world.tower.cell
        }

        /// Returns every cell with its occupant in row-major order.
        pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Option<EntitySnapshot>)> + 'a {
            let view = *self;
            self.world
                .grid
                .cells()
                .map(move |cell| (cell, view.occupant(cell)))
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Entity {
    kind: EntityKind,
    symbol: char,
    cell: CellCoord,
}

impl Entity {
    fn snapshot(&self, id: EntityId) -> EntitySnapshot {
        EntitySnapshot {
            id,
            kind: self.kind,
            symbol: self.symbol,
            cell: self.cell,
        }
    }
}

impl From<layout::Placement> for Entity {
    fn from(placement: layout::Placement) -> Self {
        Self {
            kind: placement.kind,
            symbol: placement.symbol,
            cell: placement.cell,
        }
    }
}
