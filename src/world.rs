use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// What a single grid cell holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Occupant {
    Red,
    Blue,
    Green,
    Empty,
}

impl Occupant {
    /// Every occupant value, in the order the populator draws from.
    pub const ALL: [Occupant; 4] = [
        Occupant::Red,
        Occupant::Blue,
        Occupant::Green,
        Occupant::Empty,
    ];

    pub fn is_empty(self) -> bool {
        self == Occupant::Empty
    }

    pub fn name(self) -> &'static str {
        match self {
            Occupant::Red => "red",
            Occupant::Blue => "blue",
            Occupant::Green => "green",
            Occupant::Empty => "empty",
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Occupant::Red => 'R',
            Occupant::Blue => 'B',
            Occupant::Green => 'G',
            Occupant::Empty => '.',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        Self::ALL.into_iter().find(|occupant| occupant.symbol() == symbol)
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Occupant::Red => 0,
            Occupant::Blue => 1,
            Occupant::Green => 2,
            Occupant::Empty => 3,
        }
    }
}

impl fmt::Display for Occupant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellPosition {
    pub row: usize,
    pub col: usize,
}

impl CellPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Per-kind head count of a world.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Census {
    pub red: usize,
    pub blue: usize,
    pub green: usize,
    pub empty: usize,
}

impl Census {
    pub fn count(&self, occupant: Occupant) -> usize {
        match occupant {
            Occupant::Red => self.red,
            Occupant::Blue => self.blue,
            Occupant::Green => self.green,
            Occupant::Empty => self.empty,
        }
    }

    pub fn record(&mut self, occupant: Occupant) {
        match occupant {
            Occupant::Red => self.red += 1,
            Occupant::Blue => self.blue += 1,
            Occupant::Green => self.green += 1,
            Occupant::Empty => self.empty += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.red + self.blue + self.green + self.empty
    }

    pub fn occupied(&self) -> usize {
        self.total() - self.empty
    }
}

impl fmt::Display for Census {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "red: {} blue: {} green: {} empty: {}",
            self.red, self.blue, self.green, self.empty
        )
    }
}

/// Upper bound on the number of cells a world may hold (a 4096x4096 grid).
pub const MAX_CELLS: usize = 1 << 24;

/// Largest side whose square fits in `total_cells`.
pub fn side_for_cells(total_cells: usize) -> usize {
    let fits = |side: usize| side.checked_mul(side).is_some_and(|sq| sq <= total_cells);
    let mut side = (total_cells as f64).sqrt() as usize;
    while side > 0 && !fits(side) {
        side -= 1;
    }
    while fits(side + 1) {
        side += 1;
    }
    side
}

/// Square grid of occupants, stored row-major.
///
/// Cells start out `Empty` and are filled by the populator. The grid is never
/// resized after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct World {
    side: usize,
    cells: Vec<Occupant>,
}

impl World {
    pub fn new(side: usize) -> Result<Self, ConfigError> {
        if side == 0 {
            return Err(ConfigError::NonPositiveSide(side));
        }
        let cells = side
            .checked_mul(side)
            .filter(|cells| *cells <= MAX_CELLS)
            .ok_or(ConfigError::TooManyCells {
                requested: side.saturating_mul(side),
                max: MAX_CELLS,
            })?;
        Ok(Self {
            side,
            cells: vec![Occupant::Empty; cells],
        })
    }

    /// Builds the world for a requested cell count, rounded down to a perfect square.
    pub fn with_cells(total_cells: usize) -> Result<Self, ConfigError> {
        Self::new(side_for_cells(total_cells))
    }

    /// Builds a world from explicit rows; every row must be as long as there are rows.
    pub fn from_rows<R: AsRef<[Occupant]>>(rows: &[R]) -> Result<Self, ConfigError> {
        let mut world = Self::new(rows.len())?;
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != world.side {
                return Err(ConfigError::RaggedRow {
                    row,
                    len: values.len(),
                    side: world.side,
                });
            }
            for (col, occupant) in values.iter().enumerate() {
                world.set(row, col, *occupant);
            }
        }
        Ok(world)
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn is_in_bounds(&self, row: isize, col: isize) -> bool {
        let side = self.side as isize;
        0 <= row && row < side && 0 <= col && col < side
    }

    pub fn get(&self, row: usize, col: usize) -> Occupant {
        self.cells[self.index(row, col)]
    }

    pub fn set(&mut self, row: usize, col: usize, occupant: Occupant) {
        let index = self.index(row, col);
        self.cells[index] = occupant;
    }

    pub fn get_at(&self, position: CellPosition) -> Occupant {
        self.get(position.row, position.col)
    }

    pub fn set_at(&mut self, position: CellPosition, occupant: Occupant) {
        self.set(position.row, position.col, occupant);
    }

    pub fn position_of(&self, index: usize) -> CellPosition {
        CellPosition::new(index / self.side, index % self.side)
    }

    /// Row-major walk over every cell.
    pub fn cells(&self) -> impl Iterator<Item = (CellPosition, Occupant)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, occupant)| (self.position_of(index), *occupant))
    }

    pub fn census(&self) -> Census {
        let mut census = Census::default();
        for occupant in &self.cells {
            census.record(*occupant);
        }
        census
    }

    /// One string of occupant symbols per row.
    pub fn rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.side)
            .map(|row| row.iter().map(|occupant| occupant.symbol()).collect())
            .collect()
    }

    pub fn render_text(&self) -> String {
        self.rows().join("\n")
    }

    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.side && col < self.side,
            "cell ({row}, {col}) is outside a world of side {}",
            self.side
        );
        row * self.side + col
    }
}
