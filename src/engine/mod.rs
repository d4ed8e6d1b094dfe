use std::path::PathBuf;

use anyhow::Result;
use rand::Rng;
use tracing::{debug, info};

use crate::{
    error::{check_threshold, ConfigError},
    relocation::{relocate, RelocationReport},
    rng::{RngManager, SimRng, RELOCATE_STREAM},
    satisfaction::{evaluate, SatisfactionCounts},
    shared::SharedWorld,
    snapshot::{SnapshotWriter, WorldSnapshot},
    world::{Census, World},
};

/// What one evaluate + relocate pass saw and did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub satisfaction: SatisfactionCounts,
    pub relocation: RelocationReport,
}

impl TickReport {
    /// Nobody wanted to move this tick.
    pub fn is_settled(&self) -> bool {
        self.relocation.movers == 0
    }
}

/// Classifies every cell against the tick-start world, then relocates the unsatisfied.
pub fn run_tick<R: Rng + ?Sized>(world: &mut World, threshold: f64, rng: &mut R) -> TickReport {
    let grid = evaluate(world, threshold);
    let relocation = relocate(world, &grid, rng);
    TickReport {
        satisfaction: grid.counts(),
        relocation,
    }
}

pub struct EngineSettings {
    pub scenario_name: String,
    pub seed: u64,
    pub threshold: f64,
    pub snapshot_interval_ticks: u64,
    pub snapshot_dir: PathBuf,
    pub stop_when_settled: bool,
}

pub struct EngineBuilder {
    settings: EngineSettings,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    pub fn stop_when_settled(mut self, stop: bool) -> Self {
        self.settings.stop_when_settled = stop;
        self
    }

    pub fn build(self) -> Result<Engine, ConfigError> {
        check_threshold(self.settings.threshold)?;
        Ok(Engine {
            rng: RngManager::new(self.settings.seed),
            tick: 0,
            snapshot_writer: SnapshotWriter::new(
                &self.settings.snapshot_dir,
                self.settings.snapshot_interval_ticks,
            ),
            settings: self.settings,
        })
    }
}

#[derive(Clone, Debug)]
pub struct TickSummary {
    pub tick: u64,
    pub report: TickReport,
    pub snapshot_path: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct RunSummary {
    pub ticks_run: u64,
    pub settled: bool,
    pub census: Census,
}

/// Drives ticks over a world with seeded randomness and optional snapshots.
pub struct Engine {
    rng: RngManager,
    tick: u64,
    snapshot_writer: SnapshotWriter,
    settings: EngineSettings,
}

impl Engine {
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// A named RNG stream derived from the engine seed.
    pub fn rng_stream(&mut self, name: &str) -> SimRng<'_> {
        self.rng.stream(name)
    }

    pub fn step(&mut self, world: &mut World) -> Result<TickSummary> {
        let report = self.advance(world);
        let snapshot_path =
            self.snapshot_writer
                .maybe_write(world, &self.settings.scenario_name, self.tick)?;
        Ok(TickSummary {
            tick: self.tick,
            report,
            snapshot_path,
        })
    }

    /// Runs one tick under the shared world's write lock.
    ///
    /// A due snapshot is captured under a read lock once the tick is done and
    /// written to disk with no lock held. If the write fails the tick still counts.
    pub fn step_shared(&mut self, world: &SharedWorld) -> Result<TickSummary> {
        let report = world.write_with(|world| self.advance(world));
        let snapshot_path = if self.snapshot_writer.should_write(self.tick) {
            let snapshot = world.read(|world| {
                WorldSnapshot::capture(world, &self.settings.scenario_name, self.tick)
            });
            Some(self.snapshot_writer.write(&snapshot)?)
        } else {
            None
        };
        Ok(TickSummary {
            tick: self.tick,
            report,
            snapshot_path,
        })
    }

    fn advance(&mut self, world: &mut World) -> TickReport {
        let report = {
            let mut rng = self.rng.stream(RELOCATE_STREAM);
            run_tick(world, self.settings.threshold, &mut rng)
        };
        self.tick += 1;
        debug!(
            tick = self.tick,
            unsatisfied = report.satisfaction.unsatisfied,
            vacancies = report.relocation.vacancies,
            relocated = report.relocation.relocated,
            "tick complete"
        );
        report
    }

    pub fn run(&mut self, world: &mut World, ticks: u64) -> Result<RunSummary> {
        self.run_with_hook(world, ticks, |_| {})
    }

    /// Runs up to `ticks` ticks, calling `hook` after each completed one.
    pub fn run_with_hook<F>(
        &mut self,
        world: &mut World,
        ticks: u64,
        mut hook: F,
    ) -> Result<RunSummary>
    where
        F: FnMut(&TickSummary),
    {
        info!(
            scenario = %self.settings.scenario_name,
            seed = self.rng.seed(),
            threshold = self.settings.threshold,
            ticks,
            census = %world.census(),
            "starting run"
        );
        let mut ticks_run = 0;
        let mut settled = false;
        for _ in 0..ticks {
            let summary = self.step(world)?;
            ticks_run += 1;
            hook(&summary);
            settled = summary.report.is_settled();
            if settled && self.settings.stop_when_settled {
                info!(tick = summary.tick, "every occupant is satisfied; stopping");
                break;
            }
        }
        let census = world.census();
        info!(ticks_run, settled, %census, "run finished");
        Ok(RunSummary {
            ticks_run,
            settled,
            census,
        })
    }
}
