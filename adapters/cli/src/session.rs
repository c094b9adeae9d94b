use std::io::BufRead;

use anyhow::{bail, Context, Result as AnyResult};
use tracing::info;
use tron_grid_core::{Direction, GameState};
use tron_grid_rendering::{GridPresentation, RenderingBackend};
use tron_grid_system_turns::TurnEngine;
use tron_grid_world::{query, World};

/// Plays the game until it ends, reading moves from `input`.
///
/// Preview mode stops after the first accepted move and lists the bugs'
/// routes instead of moving them.
pub(crate) fn run<R, B>(
    world: &mut World,
    engine: &TurnEngine,
    input: &mut R,
    backend: &mut B,
) -> AnyResult<GameState>
where
    R: BufRead,
    B: RenderingBackend,
{
    present_world(world, backend)?;

    let state = loop {
        let state = play_turn(world, engine, input, backend)?;
        backend.present_break()?;
        present_world(world, backend)?;

        if !engine.mode().plays_turns() {
            backend.present_break()?;
            backend.present_reports(&engine.preview(world))?;
            break state;
        }
        if state.is_terminal() {
            break state;
        }
    };

    backend.present_outcome(state)?;
    Ok(state)
}

fn present_world<B: RenderingBackend>(world: &World, backend: &mut B) -> AnyResult<()> {
    backend.present_grid(&GridPresentation::from_view(query::occupancy_view(world)))
}

/// Prompts until a move is accepted, then plays the turn.
fn play_turn<R, B>(
    world: &mut World,
    engine: &TurnEngine,
    input: &mut R,
    backend: &mut B,
) -> AnyResult<GameState>
where
    R: BufRead,
    B: RenderingBackend,
{
    let mut line = String::new();
    loop {
        backend.present_prompt()?;
        line.clear();
        let read = input
            .read_line(&mut line)
            .context("failed to read the next move")?;
        if read == 0 {
            bail!("input closed before the game ended");
        }

        let entered = line.trim_end_matches(['\r', '\n']);
        backend.present_echo(entered)?;

        let Some(direction) = parse_move(entered) else {
            info!(input = entered, "unrecognised move");
            continue;
        };
        match engine.play_turn(world, direction) {
            Ok(state) => return Ok(state),
            Err(reason) => info!(%reason, "move rejected"),
        }
    }
}

/// Accepts a direction letter or its full name.
fn parse_move(entered: &str) -> Option<Direction> {
    let entered = entered.trim();
    let mut symbols = entered.chars();
    if let (Some(symbol), None) = (symbols.next(), symbols.next()) {
        return Direction::from_symbol(symbol);
    }

    Direction::ALL
        .into_iter()
        .find(|direction| direction.name() == entered)
}
