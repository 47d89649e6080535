use std::{
    collections::HashMap,
    fs,
    io::Read,
    path::{Path, PathBuf},
};

use csv::{ReaderBuilder, Trim};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::atlas::{fuzzy_matches, normalize_name};
use crate::error::{Error, Result};

/// Plane table compiled into the library.
const BUILTIN_PLANES: &str = include_str!("../data/planes.csv");

static BUILTIN_CATALOG: Lazy<PlaneCatalog> = Lazy::new(|| {
    PlaneCatalog::from_reader(BUILTIN_PLANES.as_bytes()).expect("embedded plane table is valid")
});

/// Upgrade tier for a plane stat. Valid levels are 0 through 4.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UpgradeLevel(u8);

impl UpgradeLevel {
    pub const MAX: u8 = 4;

    pub fn new(level: i64) -> Result<Self> {
        if !(0..=i64::from(Self::MAX)).contains(&level) {
            return Err(Error::InvalidUpgradeLevel { level });
        }
        Ok(Self(level as u8))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

/// An aircraft with its base stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub name: String,
    #[serde(default)]
    pub special: bool,
    #[serde(default)]
    pub level: Option<u32>,
    pub class: u8,
    pub capacity: u32,
    pub range: u32,
    pub speed: u32,
    pub weight: f64,
    pub cost: u32,
    #[serde(default)]
    pub full_cost: Option<u32>,
}

impl Plane {
    /// Range in miles after applying a range upgrade. Each tier adds 5%.
    pub fn effective_range(&self, upgrade: UpgradeLevel) -> u32 {
        (f64::from(self.range) * (1.0 + f64::from(upgrade.get()) / 20.0)).round() as u32
    }

    /// Speed in mph after applying a speed upgrade. Each tier adds 5%.
    pub fn effective_speed(&self, upgrade: UpgradeLevel) -> u32 {
        (f64::from(self.speed) * (1.0 + f64::from(upgrade.get()) / 20.0)).round() as u32
    }

    /// Weight after applying a weight upgrade, kept to one decimal. Each
    /// tier removes 5%.
    pub fn effective_weight(&self, upgrade: UpgradeLevel) -> f64 {
        (self.weight * (1.0 - f64::from(upgrade.get()) / 20.0) * 10.0).round() / 10.0
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::CatalogValidation {
                message: "plane name must not be empty".to_string(),
            });
        }
        if !(1..=3).contains(&self.class) {
            return Err(Error::CatalogValidation {
                message: format!("class for {} must be between 1 and 3", self.name),
            });
        }

        let fields = [
            (self.capacity, "capacity"),
            (self.range, "range"),
            (self.speed, "speed"),
        ];
        for (value, field) in fields {
            if value == 0 {
                return Err(Error::CatalogValidation {
                    message: format!("{field} for {} must be positive", self.name),
                });
            }
        }

        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(Error::CatalogValidation {
                message: format!("weight for {} must be a finite positive number", self.name),
            });
        }

        Ok(())
    }
}

/// Collection of planes loaded from a CSV table.
#[derive(Debug, Clone, Default)]
pub struct PlaneCatalog {
    planes: Vec<Plane>,
    by_key: HashMap<String, usize>,
    source: Option<PathBuf>,
}

impl PlaneCatalog {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        let mut catalog = Self::from_reader(file)?;
        catalog.source = Some(path.to_path_buf());
        Ok(catalog)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::Fields).from_reader(reader);

        let mut planes: Vec<Plane> = Vec::new();
        let mut by_key = HashMap::new();

        for record in csv_reader.deserialize::<Plane>() {
            let mut plane: Plane = record.map_err(|err| Error::CatalogValidation {
                message: err.to_string(),
            })?;
            plane.name = plane.name.trim().to_string();
            plane.validate()?;

            let key = normalize_name(&plane.name);
            if by_key.contains_key(&key) {
                return Err(Error::DuplicatePlaneName { name: key });
            }

            by_key.insert(key, planes.len());
            planes.push(plane);
        }

        debug!(count = planes.len(), "loaded plane catalog");
        Ok(Self {
            planes,
            by_key,
            source: None,
        })
    }

    /// The catalog bundled with the library.
    pub fn builtin() -> &'static PlaneCatalog {
        &BUILTIN_CATALOG
    }

    /// Lookup a plane by name, ignoring case, spacing, and punctuation.
    pub fn get(&self, name: &str) -> Option<&Plane> {
        self.by_key
            .get(&normalize_name(name))
            .map(|&index| &self.planes[index])
    }

    /// Lookup a plane by name, or fail with spelling suggestions.
    pub fn resolve(&self, name: &str) -> Result<&Plane> {
        self.get(name).ok_or_else(|| Error::UnknownPlane {
            name: name.to_string(),
            suggestions: self.fuzzy_matches(name, 3),
        })
    }

    /// Planes in table order.
    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    /// Sorted plane names.
    pub fn plane_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.planes.iter().map(|plane| plane.name.clone()).collect();
        names.sort();
        names
    }

    /// Closest matching plane names for an unresolved input.
    pub fn fuzzy_matches(&self, name: &str, limit: usize) -> Vec<String> {
        fuzzy_matches(
            name,
            self.planes.iter().map(|plane| plane.name.as_str()),
            limit,
        )
    }

    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}
