//! Static maze grid: cell classification, bounds-checked lookups and route scoring.

use std::fmt;

use hashbrown::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::MazeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CellCode {
    Wall,
    Empty,
    Route,
    Start,
    Goal,
}

impl CellCode {
    pub fn glyph(self) -> char {
        match self {
            CellCode::Wall => '#',
            CellCode::Empty => ' ',
            CellCode::Route => '.',
            CellCode::Start => 'S',
            CellCode::Goal => 'G',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '#' => Some(CellCode::Wall),
            ' ' => Some(CellCode::Empty),
            '.' => Some(CellCode::Route),
            'S' => Some(CellCode::Start),
            'G' => Some(CellCode::Goal),
            _ => None,
        }
    }
}

/// Grid coordinate: `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    width: usize,
    height: usize,
    // Row-major.
    cells: Vec<CellCode>,
    start: Position,
}

impl Maze {
    /// Build a maze from rows of cell codes.
    ///
    /// Every row must have the same length and exactly one cell must be
    /// [`CellCode::Start`].
    pub fn new(rows: Vec<Vec<CellCode>>) -> Result<Self, MazeError> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if width == 0 {
            return Err(MazeError::EmptyGrid);
        }
        let height = rows.len();

        let mut cells = Vec::with_capacity(width * height);
        let mut start: Option<Position> = None;
        for (y, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(MazeError::RaggedRow {
                    row: y,
                    expected: width,
                    found: row.len(),
                });
            }
            for (x, cell) in row.into_iter().enumerate() {
                if cell == CellCode::Start {
                    let here = Position::new(x as i32, y as i32);
                    if let Some(first) = start {
                        return Err(MazeError::DuplicateStart {
                            first,
                            second: here,
                        });
                    }
                    start = Some(here);
                }
                cells.push(cell);
            }
        }

        let start = start.ok_or(MazeError::MissingStart)?;
        Ok(Self {
            width,
            height,
            cells,
            start,
        })
    }

    /// Build a maze with an explicit start, e.g. one that begins on the goal.
    ///
    /// The grid may hold at most one START cell, and only at `start`; the
    /// start must be in bounds and not a wall.
    pub fn with_start(rows: Vec<Vec<CellCode>>, start: Position) -> Result<Self, MazeError> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if width == 0 {
            return Err(MazeError::EmptyGrid);
        }
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(MazeError::RaggedRow {
                    row: y,
                    expected: width,
                    found: row.len(),
                });
            }
            for (x, &cell) in row.iter().enumerate() {
                let here = Position::new(x as i32, y as i32);
                if cell == CellCode::Start && here != start {
                    return Err(MazeError::DuplicateStart {
                        first: start,
                        second: here,
                    });
                }
            }
        }
        let maze = Self {
            width,
            height: rows.len(),
            cells: rows.into_iter().flatten().collect(),
            start,
        };
        if maze.is_wall(start.x, start.y) {
            return Err(MazeError::InvalidStart { start });
        }
        Ok(maze)
    }

    // Callers guarantee `cells.len() == width * height` and an open start.
    pub(crate) fn from_cells(
        width: usize,
        height: usize,
        cells: Vec<CellCode>,
        start: Position,
    ) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        Self {
            width,
            height,
            cells,
            start,
        }
    }

    /// Parse the glyph alphabet used by [`fmt::Display`], one row per line.
    pub fn from_glyphs(text: &str) -> Result<Self, MazeError> {
        let mut rows = Vec::new();
        for (row, line) in text.trim_end_matches(['\n', '\r']).lines().enumerate() {
            let cells = line
                .chars()
                .enumerate()
                .map(|(col, glyph)| {
                    CellCode::from_glyph(glyph).ok_or(MazeError::UnknownGlyph { glyph, row, col })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(cells);
        }
        Self::new(rows)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Largest valid column index.
    pub fn max_x(&self) -> i32 {
        self.width as i32 - 1
    }

    /// Largest valid row index.
    pub fn max_y(&self) -> i32 {
        self.height as i32 - 1
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x <= self.max_x() && y <= self.max_y()
    }

    /// Cell at `(x, y)`. Anything off the grid reads as a wall.
    pub fn position_value(&self, x: i32, y: i32) -> CellCode {
        if !self.contains(x, y) {
            return CellCode::Wall;
        }
        self.cells[(y as usize) * self.width + (x as usize)]
    }

    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        self.position_value(x, y) == CellCode::Wall
    }

    pub fn is_goal(&self, x: i32, y: i32) -> bool {
        self.position_value(x, y) == CellCode::Goal
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CellCode]> + '_ {
        self.cells.chunks(self.width)
    }

    /// Number of reward cells, i.e. the best score any route can reach.
    pub fn route_cell_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == CellCode::Route).count()
    }

    /// One point per distinct ROUTE cell visited; revisits earn nothing.
    pub fn score_route(&self, route: &[Position]) -> u32 {
        let mut credited: HashSet<Position> = HashSet::new();
        let mut score = 0;
        for &step in route {
            if self.position_value(step.x, step.y) == CellCode::Route && credited.insert(step) {
                score += 1;
            }
        }
        score
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                write!(f, "{}", cell.glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
