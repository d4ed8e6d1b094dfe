use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    error::{check_threshold, ConfigError},
    populate::{populate, Proportions},
    world::{side_for_cells, World, MAX_CELLS},
};

fn default_total_cells() -> usize {
    9000
}

fn default_threshold() -> f64 {
    0.7
}

/// Everything needed to set up and run one simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub seed: u64,
    /// Requested cell count; the grid uses the largest square that fits.
    #[serde(default = "default_total_cells")]
    pub total_cells: usize,
    /// Fraction of like (or empty) neighbors an occupant needs to stay put.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default)]
    pub proportions: Proportions,
    #[serde(default)]
    pub ticks: Option<u64>,
    #[serde(default)]
    pub snapshot_interval_ticks: u64,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: "neighbours".into(),
            description: None,
            seed: 7,
            total_cells: default_total_cells(),
            threshold: default_threshold(),
            proportions: Proportions::default(),
            ticks: None,
            snapshot_interval_ticks: 0,
        }
    }
}

impl Scenario {
    pub fn side(&self) -> usize {
        side_for_cells(self.total_cells)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_cells > MAX_CELLS {
            return Err(ConfigError::TooManyCells {
                requested: self.total_cells,
                max: MAX_CELLS,
            });
        }
        let side = self.side();
        if side == 0 {
            return Err(ConfigError::NonPositiveSide(side));
        }
        check_threshold(self.threshold)?;
        self.proportions.validate()?;
        self.proportions
            .ensure_covers(self.total_cells, side * side)
    }

    /// Allocates the grid and fills it under the configured proportions.
    pub fn build_world<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<World, ConfigError> {
        self.validate()?;
        let mut world = World::new(self.side())?;
        populate(&mut world, &self.proportions, self.total_cells, rng)?;
        Ok(world)
    }

    pub fn ticks(&self, override_ticks: Option<u64>) -> u64 {
        override_ticks.or(self.ticks).unwrap_or(120)
    }
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario = Self::parse(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(scenario)
    }

    pub fn parse(data: &str) -> Result<Scenario> {
        let scenario: Scenario = serde_yaml::from_str(data)?;
        scenario.validate()?;
        Ok(scenario)
    }
}
