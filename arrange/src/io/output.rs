use serde::{Deserialize, Serialize};

use crate::config::ArrangeConfig;
use crate::opt::{AxisLock, ObjectGroup, PlacementConfiguration};

/// Report of an automatic arrangement
#[derive(Serialize, Deserialize, Clone)]
pub struct ArrangeOutput {
    pub groups: Vec<ObjectGroup>,
    pub lock: Option<AxisLock>,
    pub configuration: PlacementConfiguration,
    pub config: ArrangeConfig,
}

