#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic path searches over the world's occupancy view.
//!
//! Both searches consult the traversal policy with the searching entity's
//! kind. Cells whose entry would end the game are accepted only as the final
//! cell of a path, so every returned path is executable step by step.

use std::{
    cmp::Reverse,
    collections::{BinaryHeap, VecDeque},
};

use tracing::trace;
use tron_grid_core::{
    CellCoord, EntityKind, EntitySnapshot, PathAlgorithm, Path, ReferenceRoute,
};
use tron_grid_world::{query::OccupancyView, Grid};

/// Tunables that select how paths are searched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    algorithm: PathAlgorithm,
    reference_route: ReferenceRoute,
}

impl Config {
    /// Creates a new configuration with explicit values.
    #[must_use]
    pub const fn new(algorithm: PathAlgorithm, reference_route: ReferenceRoute) -> Self {
        Self {
            algorithm,
            reference_route,
        }
    }

    /// Algorithm used by [`Pathfinder::find`].
    #[must_use]
    pub const fn algorithm(&self) -> PathAlgorithm {
        self.algorithm
    }

    /// Route whose cells make weighted edges cheap.
    #[must_use]
    pub const fn reference_route(&self) -> ReferenceRoute {
        self.reference_route
    }
}

/// Pure system that plans routes between entities.
#[derive(Clone, Copy, Debug, Default)]
pub struct Pathfinder {
    config: Config,
}

impl Pathfinder {
    /// Creates a pathfinder using the provided configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Searches a path from `mover` to `target` with the configured algorithm.
    #[must_use]
    pub fn find(
        &self,
        view: OccupancyView<'_>,
        mover: &EntitySnapshot,
        target: &EntitySnapshot,
    ) -> Path {
        self.find_with(self.config.algorithm(), view, mover, target)
    }

    /// Searches a path from `mover` to `target` with an explicit algorithm.
    #[must_use]
    pub fn find_with(
        &self,
        algorithm: PathAlgorithm,
        view: OccupancyView<'_>,
        mover: &EntitySnapshot,
        target: &EntitySnapshot,
    ) -> Path {
        let path = match algorithm {
            PathAlgorithm::BreadthFirst => breadth_first(view, mover.kind, mover.cell, target.cell),
            PathAlgorithm::Weighted => {
                let reference = self.reference_path(view, mover);
                weighted(view, mover.kind, mover.cell, target.cell, &reference)
            }
        };
        trace!(
            ?algorithm,
            mover = %mover.symbol,
            from = %mover.cell,
            to = %target.cell,
            hops = ?path.hop_count(),
            "path search finished"
        );
        path
    }

    /// Route whose cells are cheap for the weighted search started by `mover`.
    #[must_use]
    pub fn reference_path(&self, view: OccupancyView<'_>, mover: &EntitySnapshot) -> Path {
        match self.config.reference_route() {
            ReferenceRoute::SearcherToTron => {
                breadth_first(view, mover.kind, mover.cell, view.tron_cell())
            }
            ReferenceRoute::TronToTower => {
                breadth_first(view, EntityKind::Tron, view.tron_cell(), view.tower_cell())
            }
        }
    }
}

/// Level-order search returning a minimum-hop path from `from` to `to`.
///
/// Neighbours are explored up, down, left, right and every cell is enqueued
/// at most once, which fixes the tie-break between equally short paths.
#[must_use]
pub fn breadth_first(
    view: OccupancyView<'_>,
    mover: EntityKind,
    from: CellCoord,
    to: CellCoord,
) -> Path {
    let grid = view.grid();
    let (Some(start), Some(_)) = (grid.index(from), grid.index(to)) else {
        return Path::unreachable();
    };
    if from == to {
        return Path::new(vec![from]);
    }

    let mut parents: Vec<Option<CellCoord>> = vec![None; grid.cell_count()];
    let mut discovered = vec![false; grid.cell_count()];
    discovered[start] = true;

    let mut queue = VecDeque::new();
    queue.push_back(from);

    while let Some(cell) = queue.pop_front() {
        if cell == to {
            return reconstruct(grid, &parents, from, to);
        }

        for (_, neighbor) in grid.neighbors(cell) {
            let Some(index) = grid.index(neighbor) else {
                continue;
            };
            if discovered[index] || !is_steppable(view, mover, neighbor, to) {
                continue;
            }

            discovered[index] = true;
            parents[index] = Some(cell);
            queue.push_back(neighbor);
        }
    }

    Path::unreachable()
}

/// Uniform-cost search whose edge costs favour cells on `reference`.
///
/// Improved costs push a fresh frontier entry instead of updating the old
/// one. Entries that no longer match the best known cost, or whose cell was
/// already settled, are skipped when popped. Ties between equal costs are
/// broken by push order.
#[must_use]
pub fn weighted(
    view: OccupancyView<'_>,
    mover: EntityKind,
    from: CellCoord,
    to: CellCoord,
    reference: &Path,
) -> Path {
    let grid = view.grid();
    let (Some(start), Some(_)) = (grid.index(from), grid.index(to)) else {
        return Path::unreachable();
    };
    if from == to {
        return Path::new(vec![from]);
    }

    let on_reference = reference_mask(grid, reference);
    let mut costs = vec![u32::MAX; grid.cell_count()];
    let mut parents: Vec<Option<CellCoord>> = vec![None; grid.cell_count()];
    let mut settled = vec![false; grid.cell_count()];

    let mut sequence: u64 = 0;
    let mut frontier = BinaryHeap::new();
    costs[start] = 0;
    frontier.push(Reverse((0u32, sequence, start)));

    while let Some(Reverse((cost, _, index))) = frontier.pop() {
        if settled[index] || cost > costs[index] {
            continue;
        }
        settled[index] = true;

        let Some(cell) = grid.cell_at(index) else {
            continue;
        };
        if cell == to {
            return reconstruct(grid, &parents, from, to);
        }

        for (_, neighbor) in grid.neighbors(cell) {
            let Some(neighbor_index) = grid.index(neighbor) else {
                continue;
            };
            if settled[neighbor_index] || !is_steppable(view, mover, neighbor, to) {
                continue;
            }

            let candidate = cost.saturating_add(edge_cost(
                on_reference[index],
                on_reference[neighbor_index],
            ));
            if candidate < costs[neighbor_index] {
                costs[neighbor_index] = candidate;
                parents[neighbor_index] = Some(cell);
                sequence += 1;
                frontier.push(Reverse((candidate, sequence, neighbor_index)));
            }
        }
    }

    Path::unreachable()
}

/// Cost of a weighted step given whether each end lies on the reference route.
#[must_use]
pub const fn edge_cost(from_on_reference: bool, to_on_reference: bool) -> u32 {
    match (from_on_reference, to_on_reference) {
        (true, true) => 1,
        (true, false) | (false, true) => 2,
        (false, false) => 3,
    }
}

/// Reports whether `mover` may step onto `cell` while searching toward `target`.
///
/// Terminal entries are only accepted on the target itself.
#[must_use]
pub fn is_steppable(
    view: OccupancyView<'_>,
    mover: EntityKind,
    cell: CellCoord,
    target: CellCoord,
) -> bool {
    view.entry(mover, cell)
        .is_some_and(|entry| !entry.is_terminal() || cell == target)
}

fn reference_mask(grid: &Grid, reference: &Path) -> Vec<bool> {
    let mut mask = vec![false; grid.cell_count()];
    for index in reference.cells().iter().filter_map(|cell| grid.index(*cell)) {
        mask[index] = true;
    }
    mask
}

fn reconstruct(
    grid: &Grid,
    parents: &[Option<CellCoord>],
    from: CellCoord,
    to: CellCoord,
) -> Path {
    let mut cells = vec![to];
    let mut current = to;
    while current != from {
        let Some(parent) = grid.index(current).and_then(|index| parents[index]) else {
            return Path::unreachable();
        };
        cells.push(parent);
        current = parent;
    }

    cells.reverse();
    Path::new(cells)
}
