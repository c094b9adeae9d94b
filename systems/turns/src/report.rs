//! Would-be routes reported by grid bugs in preview mode.

use serde::Serialize;
use tron_grid_core::{CellCoord, Direction, EntitySnapshot, Path};

/// Would-be route of a grid bug toward Tron, computed without moving it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PursuitReport {
    bug: char,
    cell: CellCoord,
    direction: Option<Direction>,
    hops: Option<usize>,
    path: Path,
}

impl PursuitReport {
    /// Summarises `path` as planned by `bug`.
    #[must_use]
    pub fn new(bug: &EntitySnapshot, path: Path) -> Self {
        let direction = path
            .next_hop()
            .and_then(|next| Direction::between(bug.cell, next));
        Self {
            bug: bug.symbol,
            cell: bug.cell,
            direction,
            hops: path.hop_count(),
            path,
        }
    }

    /// Character naming the bug.
    #[must_use]
    pub const fn bug(&self) -> char {
        self.bug
    }

    /// Direction of the first step, `None` if the bug cannot or need not move.
    #[must_use]
    pub const fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Steps needed to reach Tron, `None` without a path.
    #[must_use]
    pub const fn hops(&self) -> Option<usize> {
        self.hops
    }

    /// Full route including the bug's own cell.
    #[must_use]
    pub const fn path(&self) -> &Path {
        &self.path
    }
}
