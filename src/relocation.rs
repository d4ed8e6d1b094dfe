use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    satisfaction::{Satisfaction, SatisfactionGrid},
    world::{CellPosition, Occupant, World},
};

/// What a relocation pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelocationReport {
    /// Unsatisfied occupants found at the start of the pass.
    pub movers: usize,
    /// Empty cells found at the start of the pass.
    pub vacancies: usize,
    pub relocated: usize,
}

/// Moves every unsatisfied occupant into a randomly chosen empty cell.
///
/// Movers are handled in row-major order. Each one takes a uniformly random
/// entry of the vacancy list, and its vacated cell replaces that entry so later
/// movers in the same pass can land there. With no vacancies the pass leaves
/// the world untouched.
pub fn relocate<R: Rng + ?Sized>(
    world: &mut World,
    satisfaction: &SatisfactionGrid,
    rng: &mut R,
) -> RelocationReport {
    assert_eq!(
        world.side(),
        satisfaction.side(),
        "satisfaction grid does not match the world"
    );

    let movers: Vec<(CellPosition, Occupant)> = satisfaction
        .positions(Satisfaction::Unsatisfied)
        .map(|position| (position, world.get_at(position)))
        .collect();
    let mut vacancies: Vec<CellPosition> = satisfaction
        .positions(Satisfaction::NotApplicable)
        .collect();

    let mut report = RelocationReport {
        movers: movers.len(),
        vacancies: vacancies.len(),
        relocated: 0,
    };
    if movers.is_empty() {
        return report;
    }
    if vacancies.is_empty() {
        warn!(movers = movers.len(), "no empty cells; nobody can move");
        return report;
    }

    for (origin, occupant) in movers {
        let slot = rng.gen_range(0..vacancies.len());
        let target = vacancies[slot];
        world.set_at(target, occupant);
        world.set_at(origin, Occupant::Empty);
        vacancies[slot] = origin;
        report.relocated += 1;
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::satisfaction::evaluate;
    use crate::world::Occupant::{Blue as B, Empty as E, Green as G, Red as R};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn full_world_is_left_alone() {
        let mut world = World::from_rows(&[[R, B, R], [B, R, B], [R, B, G]]).unwrap();
        let before = world.clone();
        let grid = evaluate(&world, 0.9);
        assert!(grid.counts().unsatisfied > 0);

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let report = relocate(&mut world, &grid, &mut rng);

        assert_eq!(world, before);
        assert_eq!(report.vacancies, 0);
        assert_eq!(report.relocated, 0);
    }

    #[test]
    fn satisfied_world_is_left_alone() {
        let mut world = World::from_rows(&[[R, R, E], [R, E, B], [E, B, B]]).unwrap();
        let before = world.clone();
        let grid = evaluate(&world, 0.3);
        assert_eq!(grid.counts().unsatisfied, 0);

        let report = relocate(&mut world, &grid, &mut ChaCha8Rng::seed_from_u64(3));
        assert_eq!(world, before);
        assert_eq!(report.movers, 0);
    }

    #[test]
    fn movers_land_on_original_vacancies_or_vacated_cells() {
        let mut world = World::from_rows(&[[R, R, E], [E, B, E], [R, E, B]]).unwrap();
        let before = world.clone();
        let grid = evaluate(&world, 0.7);

        let report = relocate(&mut world, &grid, &mut ChaCha8Rng::seed_from_u64(11));

        assert_eq!(report.movers, 3);
        assert_eq!(report.vacancies, 4);
        assert_eq!(report.relocated, 3);
        assert_eq!(world.census(), before.census());

        let mut occupied_destinations = 0;
        for (position, occupant) in before.cells() {
            match grid.get(position.row, position.col) {
                Satisfaction::Satisfied => assert_eq!(world.get_at(position), occupant),
                _ if !world.get_at(position).is_empty() => occupied_destinations += 1,
                _ => {}
            }
        }
        assert_eq!(occupied_destinations, report.movers);
    }

    #[test]
    fn vacated_cell_is_reused_within_a_pass() {
        // two unhappy reds, one vacancy: the second red takes the first one's old cell
        let mut world = World::from_rows(&[[R, B, E], [B, B, B], [B, B, R]]).unwrap();
        let grid = evaluate(&world, 0.5);
        assert_eq!(grid.counts().unsatisfied, 2);

        let report = relocate(&mut world, &grid, &mut ChaCha8Rng::seed_from_u64(5));
        assert_eq!(report.relocated, 2);
        assert_eq!(world.get(0, 2), R);
        assert_eq!(world.get(0, 0), R);
        assert_eq!(world.get(2, 2), E);
    }

    #[test]
    fn same_seed_same_result() {
        let start = World::from_rows(&[
            [R, B, G, E],
            [B, R, E, G],
            [G, E, R, B],
            [E, G, B, R],
        ])
        .unwrap();
        let grid = evaluate(&start, 0.8);

        let mut first = start.clone();
        relocate(&mut first, &grid, &mut ChaCha8Rng::seed_from_u64(99));
        let mut second = start.clone();
        relocate(&mut second, &grid, &mut ChaCha8Rng::seed_from_u64(99));

        assert_eq!(first, second);
        assert_eq!(first.census(), start.census());
    }
}
