//! Initial random fill of a world under target proportions.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::ConfigError,
    world::{Census, Occupant, World},
};

/// Rejected draws allowed per cell before falling back to the kinds that still have room.
pub const MAX_REDRAWS: usize = 64;

const SUM_TOLERANCE: f64 = 1e-6;
// keeps 0.7 * 100 from flooring to 69
const FLOOR_EPSILON: f64 = 1e-9;

/// Target fraction of the grid for each occupant kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Proportions {
    pub red: f64,
    pub blue: f64,
    pub green: f64,
    pub empty: f64,
}

impl Default for Proportions {
    fn default() -> Self {
        Self {
            red: 0.2,
            blue: 0.2,
            green: 0.2,
            empty: 0.4,
        }
    }
}

impl Proportions {
    pub fn new(red: f64, blue: f64, green: f64, empty: f64) -> Result<Self, ConfigError> {
        let proportions = Self {
            red,
            blue,
            green,
            empty,
        };
        proportions.validate()?;
        Ok(proportions)
    }

    pub fn fraction(&self, occupant: Occupant) -> f64 {
        match occupant {
            Occupant::Red => self.red,
            Occupant::Blue => self.blue,
            Occupant::Green => self.green,
            Occupant::Empty => self.empty,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for occupant in Occupant::ALL {
            let value = self.fraction(occupant);
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::NegativeProportion {
                    kind: occupant.name(),
                    value,
                });
            }
        }
        let sum: f64 = Occupant::ALL.iter().map(|o| self.fraction(*o)).sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(ConfigError::ProportionSum(sum));
        }
        Ok(())
    }

    /// Per-kind ceilings `floor(basis * fraction)`, indexed like [`Occupant::ALL`].
    pub fn capacities(&self, basis: usize) -> [usize; 4] {
        Occupant::ALL.map(|occupant| {
            (basis as f64 * self.fraction(occupant) + FLOOR_EPSILON).floor() as usize
        })
    }

    /// Fails unless the ceilings for `basis` leave room for `cells` occupants.
    pub fn ensure_covers(&self, basis: usize, cells: usize) -> Result<(), ConfigError> {
        let capacity: usize = self.capacities(basis).iter().sum();
        if capacity < cells {
            return Err(ConfigError::InsufficientCapacity { capacity, cells });
        }
        Ok(())
    }
}

/// Fills every cell of `world` by rejection sampling.
///
/// `basis` is the cell count the proportions are applied to; usually the
/// requested size before it was rounded down to a square. Each cell draws a
/// kind uniformly and keeps it while that kind is under its ceiling.
pub fn populate<R: Rng + ?Sized>(
    world: &mut World,
    proportions: &Proportions,
    basis: usize,
    rng: &mut R,
) -> Result<Census, ConfigError> {
    proportions.validate()?;
    proportions.ensure_covers(basis, world.len())?;

    let capacities = proportions.capacities(basis);
    let mut placed = [0_usize; 4];
    let mut fallbacks = 0_usize;
    for index in 0..world.len() {
        let kind = match draw_with_redraws(&capacities, &placed, rng) {
            Some(kind) => kind,
            None => {
                fallbacks += 1;
                draw_open_kind(&capacities, &placed, rng)
            }
        };
        placed[kind] += 1;
        let position = world.position_of(index);
        world.set_at(position, Occupant::ALL[kind]);
    }

    let census = world.census();
    debug!(%census, fallbacks, "world populated");
    Ok(census)
}

fn draw_with_redraws<R: Rng + ?Sized>(
    capacities: &[usize; 4],
    placed: &[usize; 4],
    rng: &mut R,
) -> Option<usize> {
    (0..MAX_REDRAWS)
        .map(|_| rng.gen_range(0..capacities.len()))
        .find(|&kind| placed[kind] < capacities[kind])
}

// Callers guarantee at least one kind has room left.
fn draw_open_kind<R: Rng + ?Sized>(
    capacities: &[usize; 4],
    placed: &[usize; 4],
    rng: &mut R,
) -> usize {
    let open: Vec<usize> = (0..capacities.len())
        .filter(|&kind| placed[kind] < capacities[kind])
        .collect();
    open[rng.gen_range(0..open.len())]
}
