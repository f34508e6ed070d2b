use itertools::Itertools;

use crate::opt::configuration::{CELL_EPSILON, PlacementConfiguration};

pub fn cells_do_not_overlap(config: &PlacementConfiguration) -> bool {
    config
        .placed
        .iter()
        .tuple_combinations()
        .all(|(a, b)| !a.overlaps(b))
}

pub fn cells_within_bounds(config: &PlacementConfiguration) -> bool {
    config.placed.iter().all(|c| {
        c.x >= -CELL_EPSILON
            && c.y >= -CELL_EPSILON
            && c.x_max() <= config.width + CELL_EPSILON
            && c.y_max() <= config.height + CELL_EPSILON
    })
}
