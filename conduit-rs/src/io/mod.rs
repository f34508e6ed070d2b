/// Conduit, cable and cable tray reference tables
pub mod catalog;

/// External (serializable) representations of scenes
pub mod ext_repr;

/// All logic for converting external representations into a scene
pub mod import;

/// All logic for exporting a scene into its external representation
pub mod export;

/// SVG rendering of scenes
pub mod svg;

/// DXF drawings of scenes for CAD software
pub mod dxf;
