//! Ship classes and the catalog they are resolved from.
//!
//! - [`ShipClass`] - a named hull class with its calm-water reference speeds
//! - [`ShipClassCatalog`] - the set of known classes, built in or loaded from CSV
//!
//! # Example
//!
//! ```
//! use opsimnav_lib::ship::ShipClassCatalog;
//!
//! let catalog = ShipClassCatalog::builtin();
//! let kcs = catalog.get("kcs").expect("KCS is a built-in class");
//! assert_eq!(kcs.base_speed_kn, 14.0);
//! ```

pub mod catalog;

pub use catalog::ShipClassCatalog;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Built-in classes as `(name, base_speed_kn, design_speed_kn)`.
pub const BUILTIN_SHIP_CLASSES: &[(&str, f64, f64)] = &[
    ("KCS", 14.0, 24.0),
    ("Bulk Carrier", 12.5, 14.5),
    ("Tanker", 11.0, 15.0),
];

/// A hull class that scenarios are estimated for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipClass {
    pub name: String,
    /// Reference speed in calm water at 75% engine load, used by the formula strategy.
    pub base_speed_kn: f64,
    /// Service speed assumed by the model-lookup strategy when a scenario omits one.
    pub design_speed_kn: f64,
}

impl ShipClass {
    pub fn new(name: impl Into<String>, base_speed_kn: f64, design_speed_kn: f64) -> Result<Self> {
        let class = Self {
            name: name.into().trim().to_string(),
            base_speed_kn,
            design_speed_kn,
        };
        class.validate()?;
        Ok(class)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::ShipClassCatalog {
                message: "ship class name must not be empty".to_string(),
            });
        }

        // Report text is emitted with the PDF standard Type 1 encoding.
        if !self.name.chars().all(|c| c.is_ascii() && !c.is_ascii_control()) {
            return Err(Error::ShipClassCatalog {
                message: format!("ship class name '{}' must be printable ASCII", self.name),
            });
        }

        let fields = [
            (self.base_speed_kn, "base_speed_kn"),
            (self.design_speed_kn, "design_speed_kn"),
        ];

        for (value, field) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::ShipClassCatalog {
                    message: format!(
                        "{field} for ship class '{}' must be a finite positive number",
                        self.name
                    ),
                });
            }
        }

        Ok(())
    }
}
