use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::world::{Census, Occupant, World};

/// Serialized view of a world between ticks, for renderers and later inspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub scenario: String,
    pub tick: u64,
    pub side: usize,
    pub census: Census,
    pub written_at: DateTime<Utc>,
    /// One string per row, one occupant symbol per cell.
    pub rows: Vec<String>,
}

impl WorldSnapshot {
    pub fn capture(world: &World, scenario: &str, tick: u64) -> Self {
        Self {
            scenario: scenario.to_string(),
            tick,
            side: world.side(),
            census: world.census(),
            written_at: Utc::now(),
            rows: world.rows(),
        }
    }

    /// Rebuilds the world the snapshot was taken from.
    pub fn to_world(&self) -> Result<World> {
        if self.rows.len() != self.side {
            bail!(
                "snapshot has {} rows but side {}",
                self.rows.len(),
                self.side
            );
        }
        let mut world = World::new(self.side)?;
        for (row, line) in self.rows.iter().enumerate() {
            let symbols: Vec<char> = line.chars().collect();
            if symbols.len() != self.side {
                bail!("snapshot row {row} has {} cells", symbols.len());
            }
            for (col, symbol) in symbols.into_iter().enumerate() {
                let occupant = Occupant::from_symbol(symbol)
                    .with_context(|| format!("unknown occupant '{symbol}' at ({row}, {col})"))?;
                world.set(row, col, occupant);
            }
        }
        Ok(world)
    }
}

/// Writes a JSON snapshot every `interval_ticks` ticks; an interval of 0 disables it.
pub struct SnapshotWriter {
    dir: PathBuf,
    interval_ticks: u64,
}

impl SnapshotWriter {
    pub fn new(dir: impl AsRef<Path>, interval_ticks: u64) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            interval_ticks,
        }
    }

    pub fn should_write(&self, tick: u64) -> bool {
        self.interval_ticks != 0 && tick > 0 && tick % self.interval_ticks == 0
    }

    pub fn maybe_write(
        &self,
        world: &World,
        scenario_name: &str,
        tick: u64,
    ) -> Result<Option<PathBuf>> {
        if !self.should_write(tick) {
            return Ok(None);
        }
        self.write(&WorldSnapshot::capture(world, scenario_name, tick))
            .map(Some)
    }

    pub fn write(&self, snapshot: &WorldSnapshot) -> Result<PathBuf> {
        let dir = self.dir.join(&snapshot.scenario);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create snapshot dir {}", dir.display()))?;
        let path = dir.join(format!("tick_{:06}.json", snapshot.tick));
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
        Ok(path)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<WorldSnapshot> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let snapshot = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(snapshot)
    }
}
