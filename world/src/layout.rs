//! Parses the symbol rows describing the initial grid population.

use std::collections::BTreeMap;

use thiserror::Error;
use tron_grid_core::{CellCoord, EntityKind};

const TRON_SYMBOL: char = 'T';
const TOWER_SYMBOL: char = 'I';
const OBSTACLE_SYMBOL: char = '#';
const EMPTY_SYMBOL: char = ' ';

/// Largest number of cells a grid may hold.
pub(crate) const MAX_CELLS: u64 = 1 << 20;

/// Reasons a grid description cannot start a game.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// One of the dimensions is zero.
    #[error("grid dimensions {rows}x{columns} contain no cells")]
    EmptyGrid {
        /// Requested number of rows.
        rows: u32,
        /// Requested number of columns.
        columns: u32,
    },
    /// The grid holds more cells than the world is willing to allocate.
    #[error("grid dimensions {rows}x{columns} exceed the limit of {limit} cells")]
    TooLarge {
        /// Requested number of rows.
        rows: u32,
        /// Requested number of columns.
        columns: u32,
        /// Largest supported cell count.
        limit: u64,
    },
    /// The number of symbol rows differs from the declared row count.
    #[error("expected {expected} grid rows but found {found}")]
    RowCountMismatch {
        /// Declared row count.
        expected: usize,
        /// Number of rows supplied.
        found: usize,
    },
    /// A symbol row holds more cells than the declared column count.
    #[error("row {row} has {found} cells but the grid has {expected} columns")]
    RowTooLong {
        /// Zero-based index of the offending row.
        row: u32,
        /// Declared column count.
        expected: usize,
        /// Number of symbols in the row.
        found: usize,
    },
    /// No `T` symbol was present.
    #[error("the grid does not place Tron")]
    MissingTron,
    /// No `I` symbol was present.
    #[error("the grid does not place the I/O Tower")]
    MissingTower,
    /// More than one `T` symbol was present.
    #[error("Tron is placed at both {first} and {second}")]
    DuplicateTron {
        /// Cell of the first placement.
        first: CellCoord,
        /// Cell of the repeated placement.
        second: CellCoord,
    },
    /// More than one `I` symbol was present.
    #[error("the I/O Tower is placed at both {first} and {second}")]
    DuplicateTower {
        /// Cell of the first placement.
        first: CellCoord,
        /// Cell of the repeated placement.
        second: CellCoord,
    },
    /// Two bugs share the same identifying character.
    #[error("bug '{symbol}' is placed at both {first} and {second}")]
    DuplicateBug {
        /// Character shared by both bugs.
        symbol: char,
        /// Cell of the first placement.
        first: CellCoord,
        /// Cell of the repeated placement.
        second: CellCoord,
    },
}

/// Single entity decoded from the layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Placement {
    pub(crate) kind: EntityKind,
    pub(crate) symbol: char,
    pub(crate) cell: CellCoord,
}

/// Validated population of a grid.
///
/// `others` lists obstacles in row-major order followed by bugs in
/// ascending symbol order.
#[derive(Debug)]
pub(crate) struct Layout {
    pub(crate) tron: Placement,
    pub(crate) tower: Placement,
    pub(crate) others: Vec<Placement>,
}

/// Decodes `rows` symbol lines, padding short lines with empty cells.
pub(crate) fn parse<S: AsRef<str>>(
    rows: u32,
    columns: u32,
    lines: &[S],
) -> Result<Layout, ConfigurationError> {
    if rows == 0 || columns == 0 {
        return Err(ConfigurationError::EmptyGrid { rows, columns });
    }
    if u64::from(rows) * u64::from(columns) > MAX_CELLS {
        return Err(ConfigurationError::TooLarge {
            rows,
            columns,
            limit: MAX_CELLS,
        });
    }

    let expected_rows = usize::try_from(rows).unwrap_or(usize::MAX);
    if lines.len() != expected_rows {
        return Err(ConfigurationError::RowCountMismatch {
            expected: expected_rows,
            found: lines.len(),
        });
    }

    let width = usize::try_from(columns).unwrap_or(usize::MAX);
    let mut tron: Option<CellCoord> = None;
    let mut tower: Option<CellCoord> = None;
    let mut obstacles: Vec<CellCoord> = Vec::new();
    let mut bugs: BTreeMap<char, CellCoord> = BTreeMap::new();

    for (row, line) in (0..rows).zip(lines) {
        let line: &str = line.as_ref();
        let found = line.chars().count();
        if found > width {
            return Err(ConfigurationError::RowTooLong {
                row,
                expected: width,
                found,
            });
        }

        for (column, symbol) in (0..columns).zip(line.chars()) {
            let cell = CellCoord::new(row, column);
            match symbol {
                EMPTY_SYMBOL => {}
                OBSTACLE_SYMBOL => obstacles.push(cell),
                TRON_SYMBOL => place_unique(&mut tron, cell, |first, second| {
                    ConfigurationError::DuplicateTron { first, second }
                })?,
                TOWER_SYMBOL => place_unique(&mut tower, cell, |first, second| {
                    ConfigurationError::DuplicateTower { first, second }
                })?,
                symbol => {
                    if let Some(first) = bugs.insert(symbol, cell) {
                        return Err(ConfigurationError::DuplicateBug {
                            symbol,
                            first,
                            second: cell,
                        });
                    }
                }
            }
        }
    }

    let tron = tron.ok_or(ConfigurationError::MissingTron)?;
    let tower = tower.ok_or(ConfigurationError::MissingTower)?;

    let mut others = Vec::with_capacity(obstacles.len() + bugs.len());
    others.extend(obstacles.into_iter().map(|cell| Placement {
        kind: EntityKind::Obstacle,
        symbol: OBSTACLE_SYMBOL,
        cell,
    }));
    others.extend(bugs.into_iter().map(|(symbol, cell)| Placement {
        kind: EntityKind::GridBug,
        symbol,
        cell,
    }));

    Ok(Layout {
        tron: Placement {
            kind: EntityKind::Tron,
            symbol: TRON_SYMBOL,
            cell: tron,
        },
        tower: Placement {
            kind: EntityKind::IoTower,
            symbol: TOWER_SYMBOL,
            cell: tower,
        },
        others,
    })
}

fn place_unique<F>(
    slot: &mut Option<CellCoord>,
    cell: CellCoord,
    duplicate: F,
) -> Result<(), ConfigurationError>
where
    F: FnOnce(CellCoord, CellCoord) -> ConfigurationError,
{
    match slot {
        Some(first) => Err(duplicate(*first, cell)),
        None => {
            *slot = Some(cell);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_symbol_kind() {
        let layout = parse(2, 3, &["T#b", "a I"]).expect("valid layout");
        assert_eq!(layout.tron.cell, CellCoord::new(0, 0));
        assert_eq!(layout.tower.kind, EntityKind::IoTower);
        assert_eq!(layout.tower.cell, CellCoord::new(1, 2));
        let kinds: Vec<_> = layout
            .others
            .iter()
            .map(|placement| (placement.kind, placement.symbol, placement.cell))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (EntityKind::Obstacle, '#', CellCoord::new(0, 1)),
                (EntityKind::GridBug, 'a', CellCoord::new(1, 0)),
                (EntityKind::GridBug, 'b', CellCoord::new(0, 2)),
            ]
        );
    }

    #[test]
    fn short_rows_are_padded() {
        let layout = parse(2, 4, &["TI", ""]).expect("valid layout");
        assert_eq!(layout.tower.cell, CellCoord::new(0, 1));
        assert!(layout.others.is_empty());
    }

    #[test]
    fn rejects_duplicate_bug_symbols() {
        let error = parse(2, 3, &["Ta ", " aI"]).expect_err("duplicate bug");
        assert_eq!(
            error,
            ConfigurationError::DuplicateBug {
                symbol: 'a',
                first: CellCoord::new(0, 1),
                second: CellCoord::new(1, 1),
            }
        );
    }

    #[test]
    fn rejects_missing_unique_entities() {
        assert_eq!(
            parse(1, 3, &[" I "]).expect_err("no tron"),
            ConfigurationError::MissingTron
        );
        assert_eq!(
            parse(1, 3, &[" T "]).expect_err("no tower"),
            ConfigurationError::MissingTower
        );
    }

    #[test]
    fn rejects_repeated_unique_entities() {
        assert!(matches!(
            parse(1, 4, &["TIT "]),
            Err(ConfigurationError::DuplicateTron { .. })
        ));
        assert!(matches!(
            parse(1, 4, &["TII "]),
            Err(ConfigurationError::DuplicateTower { .. })
        ));
    }

    #[test]
    fn rejects_malformed_dimensions() {
        assert_eq!(
            parse::<&str>(0, 3, &[]).expect_err("empty grid"),
            ConfigurationError::EmptyGrid {
                rows: 0,
                columns: 3
            }
        );
        assert_eq!(
            parse::<&str>(1, 4_000_000_000, &[]).expect_err("oversized grid"),
            ConfigurationError::TooLarge {
                rows: 1,
                columns: 4_000_000_000,
                limit: MAX_CELLS
            }
        );
        let blank = vec![""; 1024];
        assert_eq!(
            parse(1024, 1024, &blank).expect_err("no tron"),
            ConfigurationError::MissingTron
        );
        assert_eq!(
            parse(2, 3, &["TI "]).expect_err("missing row"),
            ConfigurationError::RowCountMismatch {
                expected: 2,
                found: 1
            }
        );
        assert_eq!(
            parse(1, 2, &["TI "]).expect_err("long row"),
            ConfigurationError::RowTooLong {
                row: 0,
                expected: 2,
                found: 3
            }
        );
    }
}
