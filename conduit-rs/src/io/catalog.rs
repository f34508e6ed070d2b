use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use itertools::Itertools;
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// File holding the conduit table inside a catalog directory (`type;code;od;id`)
pub const CONDUITS_FILE: &str = "fourreaux.csv";
/// File holding the cable table inside a catalog directory (`fam;code;od`)
pub const CABLES_FILE: &str = "cables.csv";
/// File holding the cable tray table inside a catalog directory (`nom,largeur,hauteur`)
pub const TRAYS_FILE: &str = "chemins_de_cable.csv";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConduitSpec {
    pub family: String,
    pub code: String,
    pub outer_diameter: f64,
    pub inner_diameter: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CableSpec {
    pub family: String,
    pub code: String,
    pub outer_diameter: f64,
}

impl CableSpec {
    /// Total conductor section in mm², derived from the code (e.g. `3x2,5+1x1,5` gives 9.0)
    pub fn section(&self) -> f64 {
        section_from_code(&self.code)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraySpec {
    pub name: String,
    pub width: f64,
    pub height: f64,
}

/// Reference tables of available conduits, cables and cable trays.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub conduits: Vec<ConduitSpec>,
    pub cables: Vec<CableSpec>,
    pub trays: Vec<TraySpec>,
}

impl Catalog {
    /// Parses the three catalog tables.
    /// Rows with missing or non-positive dimensions are skipped with a warning.
    pub fn from_csv(conduits_csv: &str, cables_csv: &str, trays_csv: &str) -> Result<Self> {
        Ok(Catalog {
            conduits: parse_conduits(conduits_csv)?,
            cables: parse_cables(cables_csv)?,
            trays: parse_trays(trays_csv)?,
        })
    }

    /// Loads the catalog tables from `dir`.
    /// Every table that cannot be read or parsed is replaced by its built-in counterpart.
    pub fn load_dir(dir: &Path) -> Self {
        let builtin = Catalog::builtin();
        let conduits = load_table(dir, CONDUITS_FILE, parse_conduits).unwrap_or(builtin.conduits);
        let cables = load_table(dir, CABLES_FILE, parse_cables).unwrap_or(builtin.cables);
        let trays = load_table(dir, TRAYS_FILE, parse_trays).unwrap_or(builtin.trays);
        info!(
            "[IO] catalog loaded: {} conduits, {} cables, {} trays",
            conduits.len(),
            cables.len(),
            trays.len()
        );
        Catalog {
            conduits,
            cables,
            trays,
        }
    }

    /// Tables shipped with the library
    pub fn builtin() -> Self {
        let conduits = BUILTIN_CONDUITS
            .iter()
            .map(|&(family, code, od, id)| ConduitSpec {
                family: family.to_string(),
                code: code.to_string(),
                outer_diameter: od,
                inner_diameter: id,
            })
            .collect();
        let cables = BUILTIN_CABLES
            .iter()
            .map(|&(family, code, od)| CableSpec {
                family: family.to_string(),
                code: code.to_string(),
                outer_diameter: od,
            })
            .collect();
        let trays = BUILTIN_TRAYS
            .iter()
            .map(|&(name, width, height)| TraySpec {
                name: name.to_string(),
                width,
                height,
            })
            .collect();
        Catalog {
            conduits,
            cables,
            trays,
        }
    }

    pub fn conduit(&self, family: &str, code: &str) -> Option<&ConduitSpec> {
        self.conduits
            .iter()
            .find(|c| c.family == family && c.code == code)
    }

    pub fn cable(&self, family: &str, code: &str) -> Option<&CableSpec> {
        self.cables
            .iter()
            .find(|c| c.family == family && c.code == code)
    }

    pub fn tray(&self, name: &str) -> Option<&TraySpec> {
        self.trays.iter().find(|t| t.name == name)
    }
}

fn load_table<T>(dir: &Path, file: &str, parse: fn(&str) -> Result<Vec<T>>) -> Option<Vec<T>> {
    let path = dir.join(file);
    let table = fs::read_to_string(&path)
        .with_context(|| format!("could not read {}", path.display()))
        .and_then(|text| parse(&text));
    match table {
        Ok(rows) if !rows.is_empty() => Some(rows),
        Ok(_) => {
            warn!("[IO] {} is empty, using built-in table", path.display());
            None
        }
        Err(e) => {
            warn!("[IO] {e:#}, using built-in table");
            None
        }
    }
}

fn parse_conduits(text: &str) -> Result<Vec<ConduitSpec>> {
    let rows = parse_table(text, ';', &["type", "code", "od", "id"])?;
    Ok(rows
        .into_iter()
        .filter_map(|row| {
            let spec = ConduitSpec {
                family: row["type"].clone(),
                code: row["code"].clone(),
                outer_diameter: parse_dimension(&row["od"])?,
                inner_diameter: parse_dimension(&row["id"])?,
            };
            match spec.inner_diameter <= spec.outer_diameter {
                true => Some(spec),
                false => {
                    warn!("[IO] skipping conduit {} {}: bore exceeds outer diameter", spec.family, spec.code);
                    None
                }
            }
        })
        .collect())
}

fn parse_cables(text: &str) -> Result<Vec<CableSpec>> {
    let rows = parse_table(text, ';', &["fam", "code", "od"])?;
    Ok(rows
        .into_iter()
        .filter_map(|row| {
            Some(CableSpec {
                family: row["fam"].clone(),
                code: row["code"].clone(),
                outer_diameter: parse_dimension(&row["od"])?,
            })
        })
        .collect())
}

fn parse_trays(text: &str) -> Result<Vec<TraySpec>> {
    let rows = parse_table(text, ',', &["nom", "largeur", "hauteur"])?;
    Ok(rows
        .into_iter()
        .filter_map(|row| {
            Some(TraySpec {
                name: row["nom"].clone(),
                width: parse_dimension(&row["largeur"])?,
                height: parse_dimension(&row["hauteur"])?,
            })
        })
        .collect())
}

/// Splits a delimited table into rows keyed by header name.
/// Every `required` column is guaranteed to be present in each row (empty if the line is short).
fn parse_table(
    text: &str,
    delimiter: char,
    required: &[&str],
) -> Result<Vec<HashMap<String, String>>> {
    let mut lines = text
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty());
    let Some(header_line) = lines.next() else {
        return Ok(vec![]);
    };
    let header = header_line
        .split(delimiter)
        .map(|h| h.trim().to_string())
        .collect_vec();
    if let Some(missing) = required.iter().find(|r| !header.iter().any(|h| h == *r)) {
        return Err(anyhow!(
            "missing column '{missing}' in header '{header_line}'"
        ));
    }

    Ok(lines
        .map(|line| {
            let values = line.split(delimiter).map(str::trim).collect_vec();
            header
                .iter()
                .enumerate()
                .map(|(i, h)| (h.clone(), values.get(i).copied().unwrap_or("").to_string()))
                .collect()
        })
        .collect())
}

/// Parses a positive length, accepting a decimal comma
fn parse_dimension(value: &str) -> Option<f64> {
    let v = parse_decimal(value)?;
    match v.is_finite() && v > 0.0 {
        true => Some(v),
        false => {
            warn!("[IO] skipping catalog row with invalid dimension '{value}'");
            None
        }
    }
}

fn parse_decimal(value: &str) -> Option<f64> {
    value.trim().replace(',', ".").parse::<f64>().ok()
}

/// Sums `qty x unit` terms of a cable code. Bare numbers count as a single conductor.
/// Conductor letters are accepted as separator (`3G1.5`), unparsable parts are ignored.
pub fn section_from_code(code: &str) -> f64 {
    let cleaned = code.split_whitespace().collect::<String>();
    cleaned
        .split('+')
        .filter(|part| !part.is_empty())
        .filter_map(|part| {
            match part.split_once(|c: char| c == 'x' || c == 'X' || c == 'G' || c == 'g') {
                Some((qty, unit)) => {
                    let qty = qty.parse::<u32>().ok()?;
                    let unit = parse_decimal(unit)?;
                    Some(qty as f64 * unit)
                }
                None => parse_decimal(part),
            }
        })
        .sum()
}

const BUILTIN_CONDUITS: &[(&str, &str, f64, f64)] = &[
    ("TPC", "40", 40.0, 30.0),
    ("TPC", "50", 50.0, 37.0),
    ("TPC", "63", 63.0, 47.0),
    ("TPC", "75", 75.0, 56.0),
    ("TPC", "90", 90.0, 67.0),
    ("TPC", "110", 110.0, 82.0),
    ("TPC", "125", 125.0, 94.0),
    ("TPC", "160", 160.0, 120.0),
    ("TPC", "200", 200.0, 150.0),
    ("IRL", "16", 16.0, 13.0),
    ("IRL", "20", 20.0, 16.9),
    ("IRL", "25", 25.0, 21.4),
    ("IRL", "32", 32.0, 27.8),
    ("IRL", "40", 40.0, 35.4),
    ("IRL", "50", 50.0, 44.3),
    ("IRL", "63", 63.0, 57.3),
    ("ICTA", "16", 16.0, 10.7),
    ("ICTA", "20", 20.0, 14.1),
    ("ICTA", "25", 25.0, 18.3),
    ("ICTA", "32", 32.0, 24.3),
    ("ICTA", "40", 40.0, 31.2),
    ("ICTA", "50", 50.0, 39.6),
    ("ICTA", "63", 63.0, 52.6),
];

const BUILTIN_CABLES: &[(&str, &str, f64)] = &[
    ("U1000 R2V", "1x1,5", 6.4),
    ("U1000 R2V", "1x2,5", 6.8),
    ("U1000 R2V", "1x4", 7.2),
    ("U1000 R2V", "1x6", 8.2),
    ("U1000 R2V", "1x10", 9.2),
    ("U1000 R2V", "1x16", 10.5),
    ("U1000 R2V", "1x25", 12.5),
    ("U1000 R2V", "2x1,5", 10.5),
    ("U1000 R2V", "2x2,5", 11.5),
    ("U1000 R2V", "3x1,5", 11.0),
    ("U1000 R2V", "3x2,5", 12.5),
    ("U1000 R2V", "4x1,5", 12.0),
    ("U1000 R2V", "4x2,5", 13.0),
    ("U1000 R2V", "5x1,5", 13.0),
    ("U1000 R2V", "5x2,5", 14.5),
    ("H07RN-F", "2x1", 10.0),
    ("H07RN-F", "2x1.5", 11.0),
    ("H07RN-F", "3G1", 10.7),
    ("H07RN-F", "4G1", 12.0),
    ("H07RN-F", "5G1.5", 14.4),
];

const BUILTIN_TRAYS: &[(&str, f64, f64)] = &[
    ("Petit 100x50", 100.0, 50.0),
    ("Moyen 200x75", 200.0, 75.0),
    ("Large 300x100", 300.0, 100.0),
    ("Très Large 400x100", 400.0, 100.0),
];
