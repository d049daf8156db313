//! Ship class catalog loading and lookup.
//!
//! Classes come either from the built-in table or from a CSV file with a
//! `name,base_speed_kn,design_speed_kn` layout. Header names are matched
//! loosely so exports from spreadsheets load without hand editing.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use tracing::debug;

use crate::error::{Error, Result};

use super::{ShipClass, BUILTIN_SHIP_CLASSES};

/// Similarity score a class name needs to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Maximum number of suggestions attached to an unknown class error.
const MAX_SUGGESTIONS: usize = 3;

/// Collection of ship class definitions.
#[derive(Debug, Clone, Default)]
pub struct ShipClassCatalog {
    classes: HashMap<String, ShipClass>,
    source: Option<PathBuf>,
}

impl ShipClassCatalog {
    /// Catalog containing the built-in KCS, Bulk Carrier and Tanker classes.
    pub fn builtin() -> Self {
        let classes = BUILTIN_SHIP_CLASSES
            .iter()
            .map(|(name, base, design)| {
                (
                    normalize_name(name),
                    ShipClass {
                        name: (*name).to_string(),
                        base_speed_kn: *base,
                        design_speed_kn: *design,
                    },
                )
            })
            .collect();

        Self {
            classes,
            source: None,
        }
    }

    /// Load a ship class catalog from a CSV file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        let mut catalog = Self::from_reader(file)?;
        catalog.source = Some(path.to_path_buf());
        debug!(
            classes = catalog.classes.len(),
            "loaded ship class catalog from {}",
            path.display()
        );
        Ok(catalog)
    }

    /// Load a ship class catalog from a reader (e.g., file or in-memory buffer).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::Fields).from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|err| Error::ShipClassCatalog {
                message: format!("failed to read ship class headers: {err}"),
            })?
            .clone();

        let normalize = |s: &str| {
            s.to_ascii_lowercase()
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
                .collect::<String>()
        };

        let normalized_headers: Vec<String> = headers.iter().map(&normalize).collect();

        let synonyms: &[(&str, &[&str])] = &[
            (
                "name",
                &[
                    "name",
                    "ship_class",
                    "shipclass",
                    "class",
                    "ship_type",
                    "shiptype",
                ],
            ),
            (
                "base_speed_kn",
                &["base_speed_kn", "base_speed", "basespeed", "vref_kn", "vref"],
            ),
            (
                "design_speed_kn",
                &[
                    "design_speed_kn",
                    "design_speed",
                    "designspeed",
                    "service_speed_kn",
                    "service_speed",
                ],
            ),
        ];

        let mut index_map: BTreeMap<&str, usize> = BTreeMap::new();
        for (canon, alts) in synonyms {
            'outer: for alt in *alts {
                let alt_n = normalize(alt);
                for (i, h) in normalized_headers.iter().enumerate() {
                    if h == &alt_n {
                        index_map.insert(*canon, i);
                        break 'outer;
                    }
                }
            }
        }

        let missing: Vec<&str> = ["name", "base_speed_kn"]
            .into_iter()
            .filter(|c| !index_map.contains_key(c))
            .collect();

        if !missing.is_empty() {
            return Err(Error::ShipClassCatalog {
                message: format!(
                    "ship class data missing required columns: {}. Available: {}",
                    missing.join(", "),
                    headers.iter().collect::<Vec<_>>().join(", ")
                ),
            });
        }

        let mut classes = HashMap::new();

        let mut row_num: usize = 1;
        for result in csv_reader.records() {
            row_num += 1;
            let record = result.map_err(|e| Error::ShipClassCatalog {
                message: e.to_string(),
            })?;

            let get = |field: &str| {
                index_map
                    .get(field)
                    .and_then(|&i| record.get(i))
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
            };

            let name = get("name").unwrap_or_default().to_string();
            let parse = |field: &str, raw: &str| -> Result<f64> {
                raw.parse::<f64>().map_err(|e| Error::ShipClassCatalog {
                    message: format!(
                        "invalid {field} for ship class '{name}' at row {row_num}: {e}"
                    ),
                })
            };

            let base_speed_kn = match get("base_speed_kn") {
                Some(raw) => parse("base_speed_kn", raw)?,
                None => {
                    return Err(Error::ShipClassCatalog {
                        message: format!(
                            "missing base_speed_kn for ship class '{name}' at row {row_num}"
                        ),
                    })
                }
            };
            let design_speed_kn = match get("design_speed_kn") {
                Some(raw) => parse("design_speed_kn", raw)?,
                None => base_speed_kn,
            };

            let class = ShipClass {
                name,
                base_speed_kn,
                design_speed_kn,
            };
            class.validate()?;

            let key = normalize_name(&class.name);
            if classes.contains_key(&key) {
                return Err(Error::DuplicateShipClass { name: class.name });
            }
            classes.insert(key, class);
        }

        if classes.is_empty() {
            return Err(Error::ShipClassCatalog {
                message: "ship class data contains no classes".to_string(),
            });
        }

        Ok(Self {
            classes,
            source: None,
        })
    }

    /// Get a ship class by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&ShipClass> {
        self.classes.get(&normalize_name(name))
    }

    /// Get a ship class by name, failing with close-match suggestions when unknown.
    pub fn resolve(&self, name: &str) -> Result<&ShipClass> {
        self.get(name).ok_or_else(|| Error::UnknownShipClass {
            name: name.trim().to_string(),
            suggestions: self.suggestions_for(name),
        })
    }

    /// Class names ranked by similarity to `name`, best match first.
    pub fn suggestions_for(&self, name: &str) -> Vec<String> {
        let needle = normalize_name(name);
        let mut scored: Vec<(f64, &str)> = self
            .classes
            .iter()
            .map(|(key, class)| (strsim::jaro_winkler(&needle, key), class.name.as_str()))
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|(_, name)| name.to_string())
            .collect()
    }

    /// Get a sorted list of all class names.
    pub fn class_names(&self) -> Vec<String> {
        self.classes_sorted()
            .into_iter()
            .map(|c| c.name.clone())
            .collect()
    }

    /// Get all classes sorted by name.
    pub fn classes_sorted(&self) -> Vec<&ShipClass> {
        let mut classes: Vec<&ShipClass> = self.classes.values().collect();
        classes.sort_by(|a, b| a.name.cmp(&b.name));
        classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Get the source path if the catalog was loaded from a file.
    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

/// Normalize a class name for case-insensitive lookup.
fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
