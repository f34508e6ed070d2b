use serde::{Deserialize, Serialize};

/// External representation of a saved project: a container and the bodies laid out in it
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtProject {
    pub container: ExtContainer,
    #[serde(default)]
    pub conduits: Vec<ExtConduit>,
    #[serde(default)]
    pub cables: Vec<ExtCable>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum ExtContainer {
    Rectangle { width: f64, height: f64 },
    Circle { diameter: f64 },
    OpenTrough { width: f64, height: f64 },
    /// Open trough with the dimensions of a catalog cable tray
    CableTray { name: String },
}

/// External representation of a conduit.
/// Diameters may be omitted when `family` and `code` refer to a catalog entry.
/// Without a position, the conduit is placed at the free spot closest to the container's centre.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtConduit {
    /// Unique among all conduits and cables of the project
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outer_diameter: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_diameter: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<(f64, f64)>,
    #[serde(default)]
    pub frozen: bool,
}

/// External representation of a cable, optionally routed through the conduit with id `parent`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtCable {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outer_diameter: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<(f64, f64)>,
    #[serde(default)]
    pub frozen: bool,
}
