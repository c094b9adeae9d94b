use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tron_grid_world::{ConfigurationError, World};

/// Errors that can occur while loading a grid description file.
#[derive(Debug, Error)]
pub(crate) enum GridFileError {
    /// The file could not be read.
    #[error("could not read grid file {path}")]
    Read {
        /// Location that failed to open.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The file contained no dimensions line.
    #[error("grid file is missing the dimensions line")]
    MissingDimensions,
    /// The dimensions line was not two unsigned integers.
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    /// The symbol rows do not describe a playable grid.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Reads and decodes the grid stored at `path`.
pub(crate) fn load(path: &Path) -> Result<World, GridFileError> {
    let contents = fs::read_to_string(path).map_err(|source| GridFileError::Read {
        path: path.to_owned(),
        source,
    })?;
    parse(&contents)
}

/// Decodes a `"<rows> <columns>"` line followed by that many symbol rows.
///
/// Lines after the declared rows are ignored.
pub(crate) fn parse(contents: &str) -> Result<World, GridFileError> {
    let mut lines = contents.lines().map(|line| line.trim_end_matches('\r'));
    let header = lines.next().ok_or(GridFileError::MissingDimensions)?;
    let (rows, columns) = parse_dimensions(header)?;

    let take = usize::try_from(rows).unwrap_or(usize::MAX);
    let symbol_rows: Vec<&str> = lines.take(take).collect();
    Ok(World::from_rows(rows, columns, &symbol_rows)?)
}

fn parse_dimensions(header: &str) -> Result<(u32, u32), GridFileError> {
    let invalid = || GridFileError::InvalidDimensions(header.to_owned());
    let mut fields = header.split_whitespace();

    let rows = fields
        .next()
        .and_then(|field| field.parse::<u32>().ok())
        .ok_or_else(invalid)?;
    let columns = fields
        .next()
        .and_then(|field| field.parse::<u32>().ok())
        .ok_or_else(invalid)?;
    if fields.next().is_some() {
        return Err(invalid());
    }

    Ok((rows, columns))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tron_grid_core::CellCoord;
    use tron_grid_world::query;

    #[test]
    fn parses_dimensions_and_rows() {
        let world = parse("2 3\nT a\n  I\n").expect("valid grid file");

        assert_eq!(query::grid(&world).rows(), 2);
        assert_eq!(query::grid(&world).columns(), 3);
        assert_eq!(query::tower(&world).cell, CellCoord::new(1, 2));
        assert_eq!(query::bugs(&world)[0].cell, CellCoord::new(0, 2));
    }

    #[test]
    fn pads_rows_with_stripped_trailing_blanks() {
        let world = parse("2 4\r\nT\r\n   I\r\n").expect("valid grid file");

        assert_eq!(query::tron(&world).cell, CellCoord::new(0, 0));
        assert_eq!(query::tower(&world).cell, CellCoord::new(1, 3));
    }

    #[test]
    fn rejects_malformed_headers() {
        assert!(matches!(parse(""), Err(GridFileError::MissingDimensions)));
        assert!(matches!(
            parse("three 4\n"),
            Err(GridFileError::InvalidDimensions(header)) if header == "three 4"
        ));
        assert!(matches!(
            parse("3\n"),
            Err(GridFileError::InvalidDimensions(_))
        ));
        assert!(matches!(
            parse("1 2 3\nTI\n"),
            Err(GridFileError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn surfaces_configuration_errors() {
        assert!(matches!(
            parse("2 3\nT I\n"),
            Err(GridFileError::Configuration(
                ConfigurationError::RowCountMismatch {
                    expected: 2,
                    found: 1
                }
            ))
        ));
        assert!(matches!(
            parse("1 3\naTa\n"),
            Err(GridFileError::Configuration(
                ConfigurationError::DuplicateBug { symbol: 'a', .. }
            ))
        ));
    }

    #[test]
    fn rejects_oversized_grids_before_allocating() {
        assert!(matches!(
            parse("4000000000 4000000000\nTI\n"),
            Err(GridFileError::Configuration(ConfigurationError::TooLarge {
                rows: 4_000_000_000,
                columns: 4_000_000_000,
                ..
            }))
        ));
    }

    #[test]
    fn reports_missing_files() {
        let error = load(Path::new("/nonexistent/tron-grid/board.txt"))
            .expect_err("file does not exist");

        assert!(matches!(error, GridFileError::Read { .. }));
    }
}
