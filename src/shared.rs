use std::sync::Arc;

use parking_lot::RwLock;
use rand::Rng;

use crate::{
    engine::{run_tick, TickReport},
    error::{check_threshold, ConfigError},
    world::{Census, World},
};

/// A world shared between a ticking driver and concurrent readers.
///
/// A tick holds the write lock from evaluation through the last move, so
/// readers only ever see the world between ticks.
#[derive(Clone, Debug)]
pub struct SharedWorld {
    inner: Arc<RwLock<World>>,
}

impl SharedWorld {
    pub fn new(world: World) -> Self {
        Self {
            inner: Arc::new(RwLock::new(world)),
        }
    }

    /// Runs one tick. The threshold is checked before the lock is taken.
    pub fn tick<R: Rng + ?Sized>(
        &self,
        threshold: f64,
        rng: &mut R,
    ) -> Result<TickReport, ConfigError> {
        let threshold = check_threshold(threshold)?;
        let mut world = self.inner.write();
        Ok(run_tick(&mut *world, threshold, rng))
    }

    pub fn read<T>(&self, f: impl FnOnce(&World) -> T) -> T {
        f(&*self.inner.read())
    }

    pub fn snapshot(&self) -> World {
        self.inner.read().clone()
    }

    pub fn census(&self) -> Census {
        self.read(World::census)
    }

    pub(crate) fn write_with<T>(&self, f: impl FnOnce(&mut World) -> T) -> T {
        f(&mut *self.inner.write())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::populate::{populate, Proportions};
    use crate::world::Occupant;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn readers_never_see_a_half_finished_tick() {
        let mut world = World::with_cells(900).unwrap();
        populate(
            &mut world,
            &Proportions::default(),
            900,
            &mut ChaCha8Rng::seed_from_u64(4),
        )
        .unwrap();
        let expected = world.census();
        let shared = SharedWorld::new(world);
        let done = AtomicBool::new(false);

        std::thread::scope(|scope| {
            let reader = scope.spawn(|| {
                let mut reads = 0_u32;
                while !done.load(Ordering::Acquire) || reads == 0 {
                    // a move sets the target before clearing the origin, so a
                    // torn read would show one extra occupant
                    assert_eq!(shared.census(), expected);
                    reads += 1;
                }
                reads
            });

            let mut rng = ChaCha8Rng::seed_from_u64(8);
            for _ in 0..50 {
                shared.tick(0.7, &mut rng).unwrap();
            }
            done.store(true, Ordering::Release);
            assert!(reader.join().unwrap() > 0);
        });
    }

    #[test]
    fn invalid_threshold_leaves_the_world_alone() {
        use crate::world::Occupant::{Blue as B, Empty as E, Red as R};

        let start = World::from_rows(&[[R, R, E], [E, B, E], [R, E, B]]).unwrap();
        let shared = SharedWorld::new(start.clone());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for threshold in [f64::NAN, 1.5, -0.1] {
            assert!(matches!(
                shared.tick(threshold, &mut rng),
                Err(ConfigError::InvalidThreshold(_))
            ));
        }
        assert_eq!(shared.snapshot(), start);
        assert_eq!(shared.tick(0.7, &mut rng).unwrap().relocation.relocated, 3);
    }

    #[test]
    fn snapshot_is_detached() {
        let shared = SharedWorld::new(World::new(2).unwrap());
        let copy = shared.snapshot();
        shared.write_with(|world| world.set(0, 0, Occupant::Red));
        assert!(copy.get(0, 0).is_empty());
        assert_eq!(shared.census().red, 1);
    }
}
