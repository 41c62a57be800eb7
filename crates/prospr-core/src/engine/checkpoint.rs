//! Textual checkpoints for resumable branch-and-bound runs.
//!
//! A checkpoint is a `key=value` stream; `;` or `#` introduce comments and
//! blank lines are ignored. Unknown keys are skipped so the format can grow
//! without breaking older files, but a file missing a required key is
//! rejected as a whole.

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::core::models::moves::Move;

/// Environment variable naming the checkpoint cache directory. Unset or
/// empty disables checkpointing.
pub const CACHE_DIR_ENV: &str = "PROSPR_CACHE_DIR";

/// The only algorithm currently writing checkpoints.
pub(crate) const BNB_ALGORITHM: &str = "depth_first_bnb";

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("Checkpoint I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Checkpoint parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl CheckpointError {
    fn parse(line: usize, message: impl Into<String>) -> Self {
        CheckpointError::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Full snapshot of a depth-first branch-and-bound run: the lattice
/// conformation and counters plus the traversal state of the search loop.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BnbCheckpoint {
    pub current_hash: Vec<Move>,
    pub aminos_placed: u64,
    pub solutions_checked: u64,
    /// The "next move to try on return" stack, bottom to top.
    pub dfs_stack: Vec<Move>,
    /// The move the interrupted iteration would have tried next.
    pub next_move: Move,
    pub placed_amino: bool,
    pub best_score: i32,
    pub score: i32,
    pub best_hash: Vec<Move>,
    pub iterations: u64,
}

impl BnbCheckpoint {
    pub fn parse(text: &str) -> Result<Self, CheckpointError> {
        let mut entries: HashMap<&str, (usize, &str)> = HashMap::new();

        for (line_idx, raw_line) in text.lines().enumerate() {
            let line_no = line_idx + 1;
            let line = match raw_line.find([';', '#']) {
                Some(comment_start) => &raw_line[..comment_start],
                None => raw_line,
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| CheckpointError::parse(line_no, "expected key=value"))?;
            entries.insert(key.trim(), (line_no, value.trim()));
        }

        let algorithm = require(&entries, "algorithm")?;
        if algorithm.1 != BNB_ALGORITHM {
            return Err(CheckpointError::parse(
                algorithm.0,
                format!("unsupported algorithm '{}'", algorithm.1),
            ));
        }

        Ok(Self {
            current_hash: parse_moves(require(&entries, "current_hash")?)?,
            aminos_placed: parse_number(require(&entries, "aminos_placed")?)?,
            solutions_checked: parse_number(require(&entries, "solutions_checked")?)?,
            dfs_stack: parse_moves(require(&entries, "dfs_stack")?)?,
            next_move: parse_number(require(&entries, "move")?)?,
            placed_amino: parse_flag(require(&entries, "placed_amino")?)?,
            best_score: parse_number(require(&entries, "best_score")?)?,
            score: parse_number(require(&entries, "score")?)?,
            best_hash: parse_moves(require(&entries, "best_hash")?)?,
            iterations: parse_number(require(&entries, "iterations")?)?,
        })
    }

    pub fn load(path: &Path) -> Result<Self, CheckpointError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn save(&self, path: &Path) -> Result<(), CheckpointError> {
        fs::write(path, self.to_string())?;
        Ok(())
    }
}

impl fmt::Display for BnbCheckpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; prospr search checkpoint")?;
        writeln!(f, "algorithm={BNB_ALGORITHM}")?;
        writeln!(f, "current_hash={}", join_moves(&self.current_hash))?;
        writeln!(f, "aminos_placed={}", self.aminos_placed)?;
        writeln!(f, "solutions_checked={}", self.solutions_checked)?;
        writeln!(f, "dfs_stack={}", join_moves(&self.dfs_stack))?;
        writeln!(f, "move={}", self.next_move)?;
        writeln!(f, "placed_amino={}", u8::from(self.placed_amino))?;
        writeln!(f, "best_score={}", self.best_score)?;
        writeln!(f, "score={}", self.score)?;
        writeln!(f, "best_hash={}", join_moves(&self.best_hash))?;
        writeln!(f, "iterations={}", self.iterations)
    }
}

fn require<'a>(
    entries: &HashMap<&str, (usize, &'a str)>,
    key: &str,
) -> Result<(usize, &'a str), CheckpointError> {
    entries
        .get(key)
        .copied()
        .ok_or_else(|| CheckpointError::parse(0, format!("missing required key '{key}'")))
}

fn parse_moves((line, value): (usize, &str)) -> Result<Vec<Move>, CheckpointError> {
    if value.is_empty() {
        return Ok(Vec::new());
    }
    value
        .split(',')
        .map(|token| {
            token
                .trim()
                .parse()
                .map_err(|_| CheckpointError::parse(line, format!("invalid move '{token}'")))
        })
        .collect()
}

fn parse_number<T: std::str::FromStr>((line, value): (usize, &str)) -> Result<T, CheckpointError> {
    value
        .parse()
        .map_err(|_| CheckpointError::parse(line, format!("invalid number '{value}'")))
}

fn parse_flag((line, value): (usize, &str)) -> Result<bool, CheckpointError> {
    match value {
        "0" => Ok(false),
        "1" => Ok(true),
        other => Err(CheckpointError::parse(
            line,
            format!("invalid flag '{other}', expected 0 or 1"),
        )),
    }
}

fn join_moves(fold: &[Move]) -> String {
    fold.iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Resolve the checkpoint file for an algorithm/sequence pair from
/// [`CACHE_DIR_ENV`], creating the per-algorithm directory on demand.
/// Returns `None` when checkpointing is disabled or the directory cannot
/// be created.
pub fn cache_file(algorithm: &str, sequence: &str) -> Option<PathBuf> {
    let root = env::var(CACHE_DIR_ENV).ok().filter(|dir| !dir.is_empty())?;
    let dir = PathBuf::from(root).join(algorithm);
    if let Err(err) = fs::create_dir_all(&dir) {
        warn!(dir = %dir.display(), %err, "cannot create checkpoint cache directory");
        return None;
    }
    Some(dir.join(format!("{sequence}.checkpoint")))
}
