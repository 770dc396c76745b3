/// ASCII map loading (ambient, spec section 6's "no wire protocol" note —
/// this is the demo harness's own input format, not a core contract).
use std::fs::File;
use std::io::{BufRead, BufReader};

use crate::error::{ExploreError, Result};
use crate::types::{Cell, CellState};
use crate::grid::Grid;

/// Load a ground-truth grid from an ASCII map file.
///
/// # Format
/// - Each line is a row in the grid.
/// - `#` = Wall, `.` = Walkable, ` ` or `?` = Unknown.
/// - All lines must have the same length.
pub fn load_map_from_file(path: &str) -> Result<Grid> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let lines: Vec<String> = reader.lines().collect::<std::io::Result<_>>()?;
    parse_ascii_map(&lines)
}

/// Parse an already-read set of ASCII rows into a `Grid` (shared by the
/// file loader and tests).
pub fn parse_ascii_map(lines: &[String]) -> Result<Grid> {
    if lines.is_empty() {
        return Err(ExploreError::MapFormat("map has no rows".into()));
    }
    let width = lines[0].len();
    let height = lines.len();
    if !lines.iter().all(|l| l.len() == width) {
        return Err(ExploreError::MapFormat("inconsistent row lengths in map".into()));
    }

    let mut grid = Grid::new(width, height, CellState::Unknown);
    for (row, line) in lines.iter().enumerate() {
        for (col, ch) in line.chars().enumerate() {
            let state = match ch {
                '#' => CellState::Wall,
                '.' => CellState::Walkable,
                ' ' | '?' => CellState::Unknown,
                other => return Err(ExploreError::MapFormat(format!("invalid map character '{other}' at ({row},{col})"))),
            };
            grid.set(Cell::new(row, col), state);
        }
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wall_walkable_and_unknown_characters() {
        let lines: Vec<String> = vec!["#.?".to_string(), ". #".to_string()];
        let grid = parse_ascii_map(&lines).unwrap();
        assert_eq!(grid.get(Cell::new(0, 0)), CellState::Wall);
        assert_eq!(grid.get(Cell::new(0, 1)), CellState::Walkable);
        assert_eq!(grid.get(Cell::new(0, 2)), CellState::Unknown);
        assert_eq!(grid.get(Cell::new(1, 0)), CellState::Walkable);
        assert_eq!(grid.get(Cell::new(1, 1)), CellState::Unknown);
        assert_eq!(grid.get(Cell::new(1, 2)), CellState::Wall);
    }

    #[test]
    fn rejects_inconsistent_row_lengths() {
        let lines: Vec<String> = vec!["...".to_string(), "..".to_string()];
        assert!(parse_ascii_map(&lines).is_err());
    }

    #[test]
    fn rejects_invalid_characters() {
        let lines: Vec<String> = vec!["..x".to_string()];
        assert!(parse_ascii_map(&lines).is_err());
    }
}
