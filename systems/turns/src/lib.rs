#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn engine driving Tron's moves and the grid bugs' pursuit.
//!
//! A turn moves Tron first and, while the game is still running, lets every
//! bug step once in name order. The engine never touches world state
//! directly: it issues [`Command`] values through the world's `apply` entry
//! point and reads the outcome back from the published events.

mod pursuit;
mod report;

use tracing::{debug, info};
use tron_grid_core::{
    Command, Direction, Event, GameState, IllegalMove, Path, PathAlgorithm, PlayMode,
    ReferenceRoute,
};
use tron_grid_system_pathfinding::{self as pathfinding, Pathfinder};
use tron_grid_world::{self as world, query, LookupError, World};

pub use pursuit::Pursuit;
pub use report::PursuitReport;

/// Configuration parameters required to construct the turn engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    mode: PlayMode,
    reference_route: ReferenceRoute,
}

impl Config {
    /// Creates a new configuration using the provided mode and weighted bias.
    #[must_use]
    pub const fn new(mode: PlayMode, reference_route: ReferenceRoute) -> Self {
        Self {
            mode,
            reference_route,
        }
    }

    /// Mode selecting whether bugs move and how they search.
    #[must_use]
    pub const fn mode(&self) -> PlayMode {
        self.mode
    }

    /// Route that biases weighted searches.
    #[must_use]
    pub const fn reference_route(&self) -> ReferenceRoute {
        self.reference_route
    }
}

/// Orchestrates turns and answers path queries.
#[derive(Clone, Copy, Debug, Default)]
pub struct TurnEngine {
    mode: PlayMode,
    pursuit: Pursuit,
}

impl TurnEngine {
    /// Creates a turn engine using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        let pathfinder = Pathfinder::new(pathfinding::Config::new(
            config.mode().algorithm(),
            config.reference_route(),
        ));
        Self {
            mode: config.mode(),
            pursuit: Pursuit::new(pathfinder),
        }
    }

    /// Mode the engine was created with.
    #[must_use]
    pub const fn mode(&self) -> PlayMode {
        self.mode
    }

    /// Moves Tron one cell, returning the resulting state.
    ///
    /// Rejected moves leave the world untouched so the caller can ask again.
    pub fn request_tron_move(
        &self,
        world: &mut World,
        direction: Direction,
    ) -> Result<GameState, IllegalMove> {
        let mut events = Vec::new();
        world::apply(world, Command::MoveTron { direction }, &mut events);

        for event in &events {
            if let Event::MoveRejected { reason, .. } = event {
                return Err(*reason);
            }
        }

        Ok(query::game_state(world))
    }

    /// Steps every bug once toward Tron in name order.
    ///
    /// Processing stops at the first catch. A bug without a route stays put
    /// and does not hold up the bugs after it.
    pub fn run_pursuer_phase(&self, world: &mut World) -> GameState {
        let mut commands = Vec::new();
        let mut events = Vec::new();

        for bug in query::bugs(world) {
            if query::game_state(world).is_terminal() {
                break;
            }

            commands.clear();
            self.pursuit.plan(world, &bug, &mut commands);
            for command in commands.drain(..) {
                world::apply(world, command, &mut events);
            }
        }

        for event in &events {
            if let Event::BugAdvanced { bug_id, from, to } = event {
                debug!(bug = bug_id.get(), %from, %to, "bug advanced");
            }
        }

        query::game_state(world)
    }

    /// Plays a full turn: Tron's move, then the bugs if the mode moves them.
    ///
    /// A move that ends the game skips the pursuer phase, so reaching the
    /// tower wins even with a bug one step away.
    pub fn play_turn(
        &self,
        world: &mut World,
        direction: Direction,
    ) -> Result<GameState, IllegalMove> {
        let state = self.request_tron_move(world, direction)?;
        if state.is_terminal() || !self.mode.plays_turns() {
            return Ok(state);
        }

        let state = self.run_pursuer_phase(world);
        if state.is_terminal() {
            info!(?state, "turn ended the game");
        }
        Ok(state)
    }

    /// Path from the entity named `entity_name` to the one named `target_name`.
    pub fn compute_path(
        &self,
        world: &World,
        entity_name: &str,
        target_name: &str,
        algorithm: PathAlgorithm,
    ) -> Result<Path, LookupError> {
        let mover = query::entity_by_name(world, entity_name)?;
        let target = query::entity_by_name(world, target_name)?;
        Ok(self.pursuit.pathfinder().find_with(
            algorithm,
            query::occupancy_view(world),
            &mover,
            &target,
        ))
    }

    /// Every bug's would-be route toward Tron in name order; nothing moves.
    #[must_use]
    pub fn preview(&self, world: &World) -> Vec<PursuitReport> {
        let view = query::occupancy_view(world);
        let tron = query::tron(world);
        let pathfinder = self.pursuit.pathfinder();

        query::bugs(world)
            .iter()
            .map(|bug| PursuitReport::new(bug, pathfinder.find(view, bug, &tron)))
            .collect()
    }
}
