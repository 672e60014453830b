//! Headless 2048 runner (default binary).
//!
//! Plays a session without any screen or keyboard: either the directions
//! given on the command line, or a seeded autoplay loop until the game ends.
//! Prints a summary, then exports the prover data as JSON once the session is
//! finished and passes its export checks.
//!
//! ```text
//! zk2048 left up up right      # play these moves
//! zk2048 3 0 0 1               # same, by code
//! zk2048                       # autoplay
//! ```

use std::env;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use zk2048::core::{GridSnapshot, TurnDelta, TurnOutcome};
use zk2048::engine::{
    ActuateMeta, EngineConfig, JsonFileStore, MemoryStore, Presenter, Session, StateStore,
};
use zk2048::types::{Direction, MAX_MOVES};

/// Autoplay preference order; falls through to the next direction when one is blocked
const AUTOPLAY_ORDER: [Direction; 4] = [
    Direction::Left,
    Direction::Down,
    Direction::Right,
    Direction::Up,
];

struct LogPresenter;

impl Presenter for LogPresenter {
    fn actuate(&mut self, _grid: &GridSnapshot, meta: &ActuateMeta, delta: Option<&TurnDelta>) {
        debug!(
            score = meta.score,
            best = meta.best_score,
            merges = delta.map_or(0, |d| d.merges.len()),
            terminated = meta.terminated,
            "actuate"
        );
    }
}

fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let moves = parse_moves(&args)?;
    let config = EngineConfig::from_env();

    match config.state_dir.clone() {
        Some(dir) => {
            let store = JsonFileStore::open(&dir)
                .with_context(|| format!("opening state dir {}", dir.display()))?;
            info!(dir = %store.dir().display(), "using file store");
            run(config, store, moves)
        }
        None => run(config, MemoryStore::new(), moves),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_moves(args: &[String]) -> Result<Vec<Direction>> {
    args.iter()
        .map(|arg| Direction::from_str(arg).ok_or_else(|| anyhow!("unknown direction: {}", arg)))
        .collect()
}

fn run<S: StateStore>(config: EngineConfig, store: S, moves: Vec<Direction>) -> Result<()> {
    let mut session = Session::new(config, store, LogPresenter);

    if moves.is_empty() {
        autoplay(&mut session);
    } else {
        for dir in moves {
            if session.move_in(dir) == TurnOutcome::Ignored {
                warn!(direction = dir.as_str(), "session terminated, ignoring remaining moves");
                break;
            }
        }
    }

    let game = session.game();
    for row in game.grid().to_rows() {
        let cells: Vec<String> = row
            .iter()
            .map(|&v| if v == 0 { ".".to_string() } else { v.to_string() })
            .collect();
        println!("{}", cells.join("\t"));
    }
    info!(
        score = game.score(),
        moves = game.moves_history().len(),
        won = game.won(),
        over = game.over(),
        best = session.best_score(),
        "session finished"
    );

    let prover_out = session.config().prover_out.clone();
    let exported = match prover_out {
        Some(path) => session.write_prover_file(&path).map(|_| ()),
        None => session.export_circuit_input().and_then(|input| {
            println!("{}", serde_json::to_string_pretty(&input)?);
            Ok(())
        }),
    };
    if let Err(err) = exported {
        warn!(error = %err, "prover data withheld");
        debug!(snapshot = ?session.prover_data(), "unchecked prover snapshot");
    }
    Ok(())
}

fn autoplay<S: StateStore, P: Presenter>(session: &mut Session<S, P>) {
    while !session.game().is_game_terminated() && session.game().moves_history().len() < MAX_MOVES {
        let applied = AUTOPLAY_ORDER
            .iter()
            .any(|&dir| session.move_in(dir).is_applied());
        if !applied {
            break;
        }
    }
}
