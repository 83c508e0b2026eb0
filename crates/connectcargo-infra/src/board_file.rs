//! Board documents on disk

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use connectcargo_domain::model::Board;
use connectcargo_types::Result;

const SAMPLE_BOARD: &str = include_str!("../data/sample_board.json");

/// The built-in demo board
pub fn sample_board() -> Result<Board> {
    Ok(serde_json::from_str(SAMPLE_BOARD)?)
}

/// Read a board document
pub fn load_board(path: &Path) -> Result<Board> {
    let reader = BufReader::new(File::open(path)?);
    let board: Board = serde_json::from_reader(reader)?;
    tracing::debug!(
        path = %path.display(),
        loads = board.loads.len(),
        drivers = board.drivers.len(),
        published = board.published.len(),
        "board loaded"
    );
    Ok(board)
}

/// Write a board document, replacing the file
pub fn save_board(path: &Path, board: &Board) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, board)?;
    Ok(())
}
