use itertools::Itertools;
use log::warn;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::config::ArrangeConfig;
use crate::opt::configuration::{Axis, AxisLock, PlacementConfiguration};
use crate::opt::generator::{PlacementItem, symmetric_pairs};

/// Layout heuristics. The order of [`Strategy::ALL`] is the generation order, which also breaks score ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Rows from the bottom, left-justified, column count chosen for the target aspect ratio
    BottomLeft,
    /// Equal-diameter pairs mirrored about the vertical centre line, leftovers centred above
    CenteredSymmetric,
    /// As few columns as possible: a tall, narrow layout
    MinWidth,
    /// As few rows as possible: a short, wide layout
    MinHeight,
    /// Column count chosen for a square bounding box
    SquareAspect,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::BottomLeft,
        Strategy::CenteredSymmetric,
        Strategy::MinWidth,
        Strategy::MinHeight,
        Strategy::SquareAspect,
    ];

    /// Lays out the (sorted) items, `None` if the lock cannot be satisfied
    pub fn layout(
        &self,
        items: &[PlacementItem],
        lock: Option<AxisLock>,
        config: &ArrangeConfig,
    ) -> Option<PlacementConfiguration> {
        if items.is_empty() {
            return None;
        }
        let n = items.len();
        let grid = |cols: usize| RowPlan::new(items, cols, config.entraxe);
        let feasible = |plan: &RowPlan| is_admitted(lock, plan.width, plan.height);

        let plan = match self {
            Strategy::CenteredSymmetric => return centered_symmetric(items, lock, config),
            Strategy::BottomLeft => (1..=n)
                .map(grid)
                .filter(feasible)
                .min_by_key(|p| OrderedFloat(aspect_cost(p.width, p.height, config.target_aspect))),
            Strategy::SquareAspect => (1..=n)
                .map(grid)
                .filter(feasible)
                .min_by_key(|p| OrderedFloat(aspect_cost(p.width, p.height, 1.0))),
            Strategy::MinWidth => (usize::min(2, n)..=n)
                .map(grid)
                .find(feasible)
                .or_else(|| Some(grid(1)).filter(feasible)),
            Strategy::MinHeight => (usize::min(2, n)..=n)
                .map(|rows| grid(n.div_ceil(rows)))
                .find(feasible)
                .or_else(|| Some(grid(n)).filter(feasible)),
        }?;

        plan.place(*self, lock)
    }
}

/// `|ln(ratio / target)|`: 0 when the box has exactly the target aspect ratio
fn aspect_cost(width: f64, height: f64, target: f64) -> f64 {
    ((width / height) / target).ln().abs()
}

fn is_admitted(lock: Option<AxisLock>, width: f64, height: f64) -> bool {
    lock.is_none_or(|l| l.admits(width, height))
}

/// Extent of the configuration: the lock value on the locked axis, the tight extent on the other
fn final_extent(lock: Option<AxisLock>, width: f64, height: f64) -> (f64, f64) {
    match lock {
        Some(AxisLock { axis: Axis::Width, value }) => (value, height),
        Some(AxisLock { axis: Axis::Height, value }) => (width, value),
        None => (width, height),
    }
}

/// Items split into rows of `cols` cells, filled from the bottom and left-justified
struct RowPlan<'a> {
    rows: Vec<&'a [PlacementItem]>,
    entraxe: f64,
    width: f64,
    height: f64,
}

impl<'a> RowPlan<'a> {
    fn new(items: &'a [PlacementItem], cols: usize, entraxe: f64) -> Self {
        let rows = items.chunks(cols).collect_vec();
        let cell = |i: &PlacementItem| i.diameter + entraxe;
        let width = rows
            .iter()
            .map(|r| r.iter().map(cell).sum::<f64>())
            .fold(0.0, f64::max);
        let height = rows
            .iter()
            .map(|r| r.iter().map(cell).fold(0.0, f64::max))
            .sum();
        RowPlan {
            rows,
            entraxe,
            width,
            height,
        }
    }

    fn place(&self, strategy: Strategy, lock: Option<AxisLock>) -> Option<PlacementConfiguration> {
        let (width, height) = final_extent(lock, self.width, self.height);
        let mut config = PlacementConfiguration::new(strategy, width, height, lock, self.entraxe);
        let mut y = 0.0;
        for row in &self.rows {
            let mut x = 0.0;
            let mut row_height: f64 = 0.0;
            for item in *row {
                let size = config.cell_size(item.diameter);
                if let Err(e) = config.place(item.id, x, y, item.diameter) {
                    warn!("[GEN] {strategy:?} produced an invalid cell: {e}");
                    return None;
                }
                x += size;
                row_height = row_height.max(size);
            }
            y += row_height;
        }
        Some(config)
    }
}

/// Pairs go `k` to a row, mirrored about the centre line. The `k` whose bounding box is closest to a square wins.
fn centered_symmetric(
    items: &[PlacementItem],
    lock: Option<AxisLock>,
    config: &ArrangeConfig,
) -> Option<PlacementConfiguration> {
    let (pairs, singles) = symmetric_pairs(items);
    let cell = |i: &PlacementItem| i.diameter + config.entraxe;

    let extent = |k: usize| {
        let (half, rows_height) = pairs.chunks(k).fold((0.0_f64, 0.0), |(half, h), row| {
            let row_half: f64 = row.iter().map(|(a, _)| cell(a)).sum();
            let row_height = row.iter().map(|(a, _)| cell(a)).fold(0.0, f64::max);
            (half.max(row_half), h + row_height)
        });
        let widest_single = singles.iter().map(cell).fold(0.0, f64::max);
        let width = f64::max(2.0 * half, widest_single);
        let height = rows_height + singles.iter().map(cell).sum::<f64>();
        (k, width, height)
    };

    let (k, width, height) = (1..=usize::max(1, pairs.len()))
        .map(extent)
        .filter(|(_, w, h)| is_admitted(lock, *w, *h))
        .min_by_key(|(_, w, h)| {
            let (fw, fh) = final_extent(lock, *w, *h);
            OrderedFloat(aspect_cost(fw, fh, 1.0))
        })?;

    let (width, height) = final_extent(lock, width, height);
    let mut placement = PlacementConfiguration::new(Strategy::CenteredSymmetric, width, height, lock, config.entraxe);
    let center_x = width / 2.0;

    let mut y = 0.0;
    let mut place = |id: usize, x: f64, y: f64, diameter: f64| match placement.place(id, x, y, diameter) {
        Ok(()) => Some(()),
        Err(e) => {
            warn!("[GEN] {:?} produced an invalid cell: {e}", Strategy::CenteredSymmetric);
            None
        }
    };
    for row in pairs.chunks(k) {
        let mut offset = 0.0;
        let mut row_height: f64 = 0.0;
        for (left, right) in row {
            let size = cell(left);
            place(left.id, center_x - offset - size, y, left.diameter)?;
            place(right.id, center_x + offset, y, right.diameter)?;
            offset += size;
            row_height = row_height.max(size);
        }
        y += row_height;
    }
    for single in &singles {
        let size = cell(single);
        place(single.id, center_x - size / 2.0, y, single.diameter)?;
        y += size;
    }
    Some(placement)
}
