//! Greedy per-bug pursuit of Tron.

use tracing::debug;
use tron_grid_core::{Command, EntitySnapshot};
use tron_grid_system_pathfinding::Pathfinder;
use tron_grid_world::{query, World};

/// Pure system that proposes the next step of a single grid bug.
#[derive(Clone, Copy, Debug, Default)]
pub struct Pursuit {
    pathfinder: Pathfinder,
}

impl Pursuit {
    /// Creates a planner searching with the provided pathfinder.
    #[must_use]
    pub const fn new(pathfinder: Pathfinder) -> Self {
        Self { pathfinder }
    }

    /// Pathfinder used to plan the steps.
    #[must_use]
    pub const fn pathfinder(&self) -> &Pathfinder {
        &self.pathfinder
    }

    /// Emits a step toward Tron for `bug`, or nothing when no route exists.
    ///
    /// The path is searched against the world as it stands, so bugs that
    /// already moved this turn are taken into account.
    pub fn plan(&self, world: &World, bug: &EntitySnapshot, out: &mut Vec<Command>) {
        let tron = query::tron(world);
        let path = self
            .pathfinder
            .find(query::occupancy_view(world), bug, &tron);

        match path.next_hop() {
            Some(to) => out.push(Command::StepBug { bug_id: bug.id, to }),
            None => debug!(bug = %bug.symbol, cell = %bug.cell, "bug has no step toward tron"),
        }
    }
}
