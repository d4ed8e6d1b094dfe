//! Per-cell satisfaction against the 8-cell neighborhood.

use serde::{Deserialize, Serialize};

use crate::world::{CellPosition, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Satisfaction {
    Satisfied,
    Unsatisfied,
    /// The cell is empty; there is nobody to satisfy.
    NotApplicable,
}

const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SatisfactionCounts {
    pub satisfied: usize,
    pub unsatisfied: usize,
    pub not_applicable: usize,
}

/// Classification of every cell of a world, same shape as the world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SatisfactionGrid {
    side: usize,
    cells: Vec<Satisfaction>,
}

impl SatisfactionGrid {
    pub fn side(&self) -> usize {
        self.side
    }

    pub fn get(&self, row: usize, col: usize) -> Satisfaction {
        assert!(
            row < self.side && col < self.side,
            "cell ({row}, {col}) is outside a grid of side {}",
            self.side
        );
        self.cells[row * self.side + col]
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellPosition, Satisfaction)> + '_ {
        self.cells.iter().enumerate().map(move |(index, state)| {
            (
                CellPosition::new(index / self.side, index % self.side),
                *state,
            )
        })
    }

    /// Row-major positions holding `state`.
    pub fn positions(&self, state: Satisfaction) -> impl Iterator<Item = CellPosition> + '_ {
        self.iter()
            .filter(move |(_, candidate)| *candidate == state)
            .map(|(position, _)| position)
    }

    pub fn counts(&self) -> SatisfactionCounts {
        let mut counts = SatisfactionCounts::default();
        for state in &self.cells {
            match state {
                Satisfaction::Satisfied => counts.satisfied += 1,
                Satisfaction::Unsatisfied => counts.unsatisfied += 1,
                Satisfaction::NotApplicable => counts.not_applicable += 1,
            }
        }
        counts
    }
}

/// Classifies every cell of `world`. Reads the world only; never mutates it.
pub fn evaluate(world: &World, threshold: f64) -> SatisfactionGrid {
    let side = world.side();
    let mut cells = Vec::with_capacity(world.len());
    for row in 0..side {
        for col in 0..side {
            cells.push(classify(world, row, col, threshold));
        }
    }
    SatisfactionGrid { side, cells }
}

/// Classifies a single cell.
///
/// Empty neighbors count as like neighbors. A cell with no in-bounds
/// neighbors (a 1x1 world) is satisfied.
pub fn classify(world: &World, row: usize, col: usize, threshold: f64) -> Satisfaction {
    let occupant = world.get(row, col);
    if occupant.is_empty() {
        return Satisfaction::NotApplicable;
    }

    let mut neighbors = 0_u32;
    let mut alike = 0_u32;
    for (d_row, d_col) in NEIGHBOR_OFFSETS {
        let n_row = row as isize + d_row;
        let n_col = col as isize + d_col;
        if !world.is_in_bounds(n_row, n_col) {
            continue;
        }
        neighbors += 1;
        let neighbor = world.get(n_row as usize, n_col as usize);
        if neighbor == occupant || neighbor.is_empty() {
            alike += 1;
        }
    }

    if neighbors == 0 {
        return Satisfaction::Satisfied;
    }
    if f64::from(alike) / f64::from(neighbors) >= threshold {
        Satisfaction::Satisfied
    } else {
        Satisfaction::Unsatisfied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Occupant::{self, Blue as B, Empty as E, Green as G, Red as R};

    use super::Satisfaction::{NotApplicable as NA, Satisfied as S, Unsatisfied as U};

    fn reference_world() -> World {
        World::from_rows(&[[R, R, E], [E, B, E], [R, E, B]]).unwrap()
    }

    fn grid_rows(grid: &SatisfactionGrid) -> Vec<Vec<Satisfaction>> {
        (0..grid.side())
            .map(|row| (0..grid.side()).map(|col| grid.get(row, col)).collect())
            .collect()
    }

    #[test]
    fn reference_grid_at_half_threshold() {
        // (0,0): 2/3, (0,1): 4/5, (1,1): 5/8, (2,0): 2/3, (2,2): 3/3
        let grid = evaluate(&reference_world(), 0.5);
        assert_eq!(
            grid_rows(&grid),
            vec![vec![S, S, NA], vec![NA, S, NA], vec![S, NA, S]]
        );
    }

    #[test]
    fn reference_grid_at_strict_threshold() {
        let grid = evaluate(&reference_world(), 0.7);
        assert_eq!(
            grid_rows(&grid),
            vec![vec![U, S, NA], vec![NA, U, NA], vec![U, NA, S]]
        );
        assert_eq!(
            grid.counts(),
            SatisfactionCounts {
                satisfied: 2,
                unsatisfied: 3,
                not_applicable: 4,
            }
        );
    }

    #[test]
    fn threshold_comparison_is_inclusive() {
        // centre blue sees 5 like of 8
        let world = reference_world();
        assert_eq!(classify(&world, 1, 1, 0.625), S);
        assert_eq!(classify(&world, 1, 1, 0.626), U);
    }

    #[test]
    fn empty_cells_are_not_applicable() {
        let world = World::from_rows(&[[E, R], [B, E]]).unwrap();
        let grid = evaluate(&world, 1.0);
        assert_eq!(grid.get(0, 0), NA);
        assert_eq!(grid.get(1, 1), NA);
    }

    #[test]
    fn isolated_cell_is_always_satisfied() {
        for occupant in [R, B, G] {
            let world = World::from_rows(&[[occupant]]).unwrap();
            for threshold in [0.0, 0.5, 1.0] {
                assert_eq!(evaluate(&world, threshold).get(0, 0), S);
            }
        }
        let empty = World::from_rows(&[[Occupant::Empty]]).unwrap();
        assert_eq!(evaluate(&empty, 0.5).get(0, 0), NA);
    }

    #[test]
    fn surrounded_by_strangers_is_unsatisfied() {
        let world = World::from_rows(&[[B, B, B], [B, R, B], [B, B, B]]).unwrap();
        assert_eq!(classify(&world, 1, 1, 0.1), U);
        assert_eq!(classify(&world, 1, 1, 0.0), S);
    }

    #[test]
    fn positions_are_row_major() {
        let grid = evaluate(&reference_world(), 0.7);
        let unsatisfied: Vec<_> = grid.positions(U).collect();
        assert_eq!(
            unsatisfied,
            vec![
                CellPosition::new(0, 0),
                CellPosition::new(1, 1),
                CellPosition::new(2, 0),
            ]
        );
    }
}
