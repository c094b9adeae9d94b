#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Tron grid adapters.

use std::{fmt, io::Write};

use anyhow::{Context, Result as AnyResult};
use tron_grid_core::GameState;
use tron_grid_system_turns::PursuitReport;
use tron_grid_world::query::OccupancyView;

/// Prompt shown while waiting for Tron's next move.
pub const MOVE_PROMPT: &str = "Please enter your move [u(p), d(own), l(eft), or r(ight)]: ";

const EMPTY_GLYPH: char = ' ';

/// Glyph snapshot of the grid, one character per cell in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridPresentation {
    columns: u32,
    glyphs: Vec<char>,
}

impl GridPresentation {
    /// Captures the occupants of every cell in the view.
    #[must_use]
    pub fn from_view(view: OccupancyView<'_>) -> Self {
        let (_, columns) = view.dimensions();
        let glyphs = view
            .iter()
            .map(|(_, occupant)| occupant.map_or(EMPTY_GLYPH, |entity| entity.symbol))
            .collect();

        Self { columns, glyphs }
    }
}

impl fmt::Display for GridPresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for column in 0..self.columns {
            write!(f, "{}", column % 10)?;
        }
        writeln!(f)?;

        let width = usize::try_from(self.columns).unwrap_or(usize::MAX).max(1);
        for (row, glyphs) in self.glyphs.chunks(width).enumerate() {
            write!(f, "{row} ")?;
            for glyph in glyphs {
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Formats a report as `Bug <name>: <direction> <hops> <cells>`.
///
/// A bug standing on Tron's cell omits the direction and a bug without a
/// route reports `no path`.
#[must_use]
pub fn report_line(report: &PursuitReport) -> String {
    let cells = report
        .path()
        .cells()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");

    match (report.direction(), report.hops()) {
        (Some(direction), Some(hops)) => {
            format!("Bug {}: {} {hops} {cells}", report.bug(), direction.symbol())
        }
        (None, Some(hops)) => format!("Bug {}: {hops} {cells}", report.bug()),
        (_, None) => format!("Bug {}: no path", report.bug()),
    }
}

/// Closing line announcing how the game ended, `None` while it is running.
#[must_use]
pub const fn outcome_message(state: GameState) -> Option<&'static str> {
    match state {
        GameState::Running => None,
        GameState::Win => Some("Tron reaches I/O Tower"),
        GameState::Lose => Some("A bug is not hungry any more!"),
    }
}

/// Encoding used for pursuit reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// One human-readable line per bug.
    #[default]
    Text,
    /// A pretty-printed JSON array of reports.
    Json,
}

/// Rendering backend capable of presenting a Tron grid session.
pub trait RenderingBackend {
    /// Draws the grid snapshot.
    fn present_grid(&mut self, grid: &GridPresentation) -> AnyResult<()>;

    /// Asks for the next move.
    fn present_prompt(&mut self) -> AnyResult<()>;

    /// Repeats the line the player entered.
    fn present_echo(&mut self, input: &str) -> AnyResult<()>;

    /// Separates consecutive sections of the transcript.
    fn present_break(&mut self) -> AnyResult<()>;

    /// Lists the bugs' would-be routes.
    fn present_reports(&mut self, reports: &[PursuitReport]) -> AnyResult<()>;

    /// Announces the final state; nothing is shown while the game runs.
    fn present_outcome(&mut self, state: GameState) -> AnyResult<()>;
}

/// Backend writing the session transcript to any byte sink.
#[derive(Debug)]
pub struct TextBackend<W> {
    out: W,
    report_format: ReportFormat,
}

impl<W: Write> TextBackend<W> {
    /// Creates a backend writing to `out`.
    #[must_use]
    pub const fn new(out: W, report_format: ReportFormat) -> Self {
        Self { out, report_format }
    }

    /// Consumes the backend, returning the sink.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present_grid(&mut self, grid: &GridPresentation) -> AnyResult<()> {
        write!(self.out, "{grid}").context("failed to write grid")
    }

    fn present_prompt(&mut self) -> AnyResult<()> {
        write!(self.out, "{MOVE_PROMPT}").context("failed to write prompt")?;
        self.out.flush().context("failed to flush prompt")
    }

    fn present_echo(&mut self, input: &str) -> AnyResult<()> {
        writeln!(self.out, "{input}").context("failed to echo input")
    }

    fn present_break(&mut self) -> AnyResult<()> {
        writeln!(self.out).context("failed to write separator")
    }

    fn present_reports(&mut self, reports: &[PursuitReport]) -> AnyResult<()> {
        match self.report_format {
            ReportFormat::Text => {
                for report in reports {
                    writeln!(self.out, "{}", report_line(report))
                        .context("failed to write pursuit report")?;
                }
            }
            ReportFormat::Json => {
                serde_json::to_writer_pretty(&mut self.out, reports)
                    .context("failed to encode pursuit reports")?;
                writeln!(self.out).context("failed to terminate pursuit reports")?;
            }
        }
        Ok(())
    }

    fn present_outcome(&mut self, state: GameState) -> AnyResult<()> {
        if let Some(message) = outcome_message(state) {
            writeln!(self.out, "{message}").context("failed to write outcome")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tron_grid_core::{Direction, PlayMode, ReferenceRoute};
    use tron_grid_system_turns::{Config, TurnEngine};
    use tron_grid_world::{query, World};

    fn world(rows: &[&str]) -> World {
        let columns = rows.iter().map(|row| row.len()).max().unwrap_or(0);
        World::from_rows(
            u32::try_from(rows.len()).expect("rows fit u32"),
            u32::try_from(columns).expect("columns fit u32"),
            rows,
        )
        .expect("valid layout")
    }

    fn reports(world: &World) -> Vec<PursuitReport> {
        TurnEngine::new(Config::new(PlayMode::Preview, ReferenceRoute::default())).preview(world)
    }

    fn transcript<F>(draw: F) -> String
    where
        F: FnOnce(&mut TextBackend<Vec<u8>>) -> AnyResult<()>,
    {
        let mut backend = TextBackend::new(Vec::new(), ReportFormat::Text);
        draw(&mut backend).expect("writing to memory succeeds");
        String::from_utf8(backend.into_inner()).expect("utf-8 transcript")
    }

    #[test]
    fn grid_lists_column_digits_and_row_indices() {
        let world = world(&["T #", "a I"]);
        let grid = GridPresentation::from_view(query::occupancy_view(&world));

        assert_eq!(grid.to_string(), "  012\n0 T #\n1 a I\n");
    }

    #[test]
    fn grid_keeps_the_glyphs_it_was_captured_with() {
        let mut world = world(&["T  ", "  I"]);
        let before = GridPresentation::from_view(query::occupancy_view(&world));
        let engine = TurnEngine::new(Config::new(PlayMode::Chase, ReferenceRoute::default()));

        assert_eq!(
            engine.request_tron_move(&mut world, Direction::Right),
            Ok(GameState::Running)
        );
        let after = GridPresentation::from_view(query::occupancy_view(&world));

        assert_eq!(before.to_string(), "  012\n0 T  \n1   I\n");
        assert_eq!(after.to_string(), "  012\n0  T \n1   I\n");
        assert_ne!(before, after);
    }

    #[test]
    fn column_header_wraps_after_nine() {
        let world = world(&["T          I"]);
        let grid = GridPresentation::from_view(query::occupancy_view(&world));

        let header = grid.to_string().lines().next().map(str::to_owned);
        assert_eq!(header.as_deref(), Some("  012345678901"));
    }

    #[test]
    fn report_lines_show_direction_hops_and_cells() {
        let world = world(&["T a", "  I"]);
        let lines: Vec<_> = reports(&world).iter().map(report_line).collect();

        assert_eq!(lines, vec!["Bug a: l 2 (0, 2) (0, 1) (0, 0)"]);
    }

    #[test]
    fn report_lines_cover_caught_and_stranded_bugs() {
        let mut world = world(&["T#b", "a#I"]);
        let engine = TurnEngine::new(Config::new(PlayMode::Chase, ReferenceRoute::default()));
        assert_eq!(engine.run_pursuer_phase(&mut world), GameState::Lose);

        let lines: Vec<_> = reports(&world).iter().map(report_line).collect();

        assert_eq!(lines, vec!["Bug a: 0 (0, 0)", "Bug b: no path"]);
    }

    #[test]
    fn outcome_messages_match_terminal_states() {
        assert_eq!(outcome_message(GameState::Running), None);
        assert_eq!(
            transcript(|backend| backend.present_outcome(GameState::Win)),
            "Tron reaches I/O Tower\n"
        );
        assert_eq!(
            transcript(|backend| backend.present_outcome(GameState::Lose)),
            "A bug is not hungry any more!\n"
        );
    }

    #[test]
    fn prompt_and_echo_form_one_transcript_line() {
        let output = transcript(|backend| {
            backend.present_prompt()?;
            backend.present_echo("d")?;
            backend.present_break()
        });

        assert_eq!(output, format!("{MOVE_PROMPT}d\n\n"));
    }

    #[test]
    fn json_reports_are_machine_readable() {
        let world = world(&["T a", "  I"]);
        let mut backend = TextBackend::new(Vec::new(), ReportFormat::Json);
        backend
            .present_reports(&reports(&world))
            .expect("writing to memory succeeds");

        let output = String::from_utf8(backend.into_inner()).expect("utf-8 transcript");
        let json: serde_json::Value = serde_json::from_str(&output).expect("valid json");
        assert_eq!(json[0]["bug"], "a");
        assert_eq!(json[0]["hops"], 2);
    }
}
