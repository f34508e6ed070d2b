use std::cmp::Reverse;

use itertools::Itertools;
use log::debug;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::config::ArrangeConfig;
use crate::opt::configuration::{AxisLock, PlacementConfiguration};
use crate::opt::strategies::Strategy;

/// A batch of identical objects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectGroup {
    pub diameter: f64,
    pub quantity: usize,
}

/// A single object to place, `group_quantity` being the size of the group it was expanded from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementItem {
    pub id: usize,
    pub diameter: f64,
    pub group_quantity: usize,
}

/// Expands groups into individual items, ids are assigned in group order
pub fn expand_groups(groups: &[ObjectGroup]) -> Vec<PlacementItem> {
    groups
        .iter()
        .flat_map(|g| (0..g.quantity).map(move |_| (g.diameter, g.quantity)))
        .enumerate()
        .map(|(id, (diameter, group_quantity))| PlacementItem {
            id,
            diameter,
            group_quantity,
        })
        .collect()
}

/// Largest diameter first, ties broken toward even groups, then larger groups, then id
pub fn sort_items(items: &mut [PlacementItem]) {
    items.sort_by_key(|i| {
        (
            Reverse(OrderedFloat(i.diameter)),
            i.group_quantity % 2,
            Reverse(i.group_quantity),
            i.id,
        )
    });
}

/// Pairs consecutive items of equal diameter. Returns the pairs and the unpaired leftovers, both in input order.
pub fn symmetric_pairs(sorted: &[PlacementItem]) -> (Vec<(PlacementItem, PlacementItem)>, Vec<PlacementItem>) {
    let mut pairs = vec![];
    let mut singles = vec![];
    let mut iter = sorted.iter().copied().peekable();
    while let Some(item) = iter.next() {
        match iter.next_if(|next| next.diameter == item.diameter) {
            Some(partner) => pairs.push((item, partner)),
            None => singles.push(item),
        }
    }
    (pairs, singles)
}

/// Runs every [`Strategy`] of the registry on a batch of objects
#[derive(Debug, Clone, Copy)]
pub struct ConfigurationGenerator {
    pub config: ArrangeConfig,
}

impl ConfigurationGenerator {
    pub fn new(config: ArrangeConfig) -> Self {
        ConfigurationGenerator { config }
    }

    /// Feasible candidates, in registry order. At most one per strategy.
    pub fn generate(&self, groups: &[ObjectGroup], lock: Option<AxisLock>) -> Vec<PlacementConfiguration> {
        let mut items = expand_groups(groups);
        if items.is_empty() {
            return vec![];
        }
        sort_items(&mut items);

        Strategy::ALL
            .iter()
            .filter_map(|strategy| {
                let candidate = strategy.layout(&items, lock, &self.config);
                match &candidate {
                    Some(c) => debug!(
                        "[GEN] {strategy:?}: {:.1}x{:.1} ({} cells)",
                        c.width,
                        c.height,
                        c.placed.len()
                    ),
                    None => debug!("[GEN] {strategy:?}: infeasible under {lock:?}"),
                }
                candidate
            })
            .collect_vec()
    }
}
