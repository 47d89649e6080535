use std::{
    cmp::Ordering,
    collections::HashMap,
    fs,
    io::Read,
    path::{Path, PathBuf},
};

use csv::{ReaderBuilder, Trim};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// City table compiled into the library.
const BUILTIN_CITIES: &str = include_str!("../data/cities.csv");

/// Minimum jaro-winkler similarity for a name to appear as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.72;

static BUILTIN_ATLAS: Lazy<CityAtlas> = Lazy::new(|| {
    CityAtlas::from_reader(BUILTIN_CITIES.as_bytes()).expect("embedded city table is valid")
});

/// A city waypoint on the route map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub class: u8,
    pub population: u32,
}

impl City {
    /// Straight-line map distance to another city, in miles.
    ///
    /// The map stores coordinates at quarter scale, so the in-game figure
    /// is the floored pixel distance times four.
    pub fn distance_to(&self, other: &City) -> u32 {
        map_distance(self.x, self.y, other.x, other.y)
    }

    /// Unscaled straight-line distance, used by payout and timing math.
    pub fn raw_distance_to(&self, other: &City) -> f64 {
        f64::from(self.distance_to(other)) / 4.0
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::CatalogValidation {
                message: "city name must not be empty".to_string(),
            });
        }
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(Error::CatalogValidation {
                message: format!("coordinates for {} must be finite", self.name),
            });
        }
        if !(1..=3).contains(&self.class) {
            return Err(Error::CatalogValidation {
                message: format!("class for {} must be between 1 and 3", self.name),
            });
        }
        Ok(())
    }
}

/// Scaled map distance between two coordinate pairs, in miles.
pub(crate) fn map_distance(x1: f64, y1: f64, x2: f64, y2: f64) -> u32 {
    let dx = x1 - x2;
    let dy = y1 - y2;
    (dx * dx + dy * dy).sqrt().floor() as u32 * 4
}

/// Collection of cities loaded from a CSV table.
///
/// Lookups go through a normalized key so user input like `"new york"`,
/// `"NewYork"` or `"St. Louis"` resolves regardless of spacing and
/// punctuation. Iteration order is table order, which downstream graph
/// construction relies on for deterministic results.
#[derive(Debug, Clone, Default)]
pub struct CityAtlas {
    cities: Vec<City>,
    by_key: HashMap<String, usize>,
    source: Option<PathBuf>,
}

impl CityAtlas {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        let mut atlas = Self::from_reader(file)?;
        atlas.source = Some(path.to_path_buf());
        Ok(atlas)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::Fields).from_reader(reader);

        let mut cities: Vec<City> = Vec::new();
        let mut by_key = HashMap::new();

        for record in csv_reader.deserialize::<City>() {
            let mut city: City = record.map_err(|err| Error::CatalogValidation {
                message: err.to_string(),
            })?;
            city.name = city.name.trim().to_string();
            city.validate()?;

            let key = normalize_name(&city.name);
            if by_key.contains_key(&key) {
                return Err(Error::DuplicateCityName { name: key });
            }

            by_key.insert(key, cities.len());
            cities.push(city);
        }

        debug!(count = cities.len(), "loaded city atlas");
        Ok(Self {
            cities,
            by_key,
            source: None,
        })
    }

    /// The atlas bundled with the library.
    pub fn builtin() -> &'static CityAtlas {
        &BUILTIN_ATLAS
    }

    /// Lookup a city by name, ignoring case, spacing, and punctuation.
    pub fn get(&self, name: &str) -> Option<&City> {
        self.by_key
            .get(&normalize_name(name))
            .map(|&index| &self.cities[index])
    }

    /// Lookup a city by name, or fail with spelling suggestions.
    pub fn resolve(&self, name: &str) -> Result<&City> {
        self.get(name).ok_or_else(|| Error::UnknownCity {
            name: name.to_string(),
            suggestions: self.fuzzy_matches(name, 3),
        })
    }

    /// Cities in table order.
    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    /// Sorted city names.
    pub fn city_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.cities.iter().map(|city| city.name.clone()).collect();
        names.sort();
        names
    }

    /// Closest matching city names for an unresolved input.
    pub fn fuzzy_matches(&self, name: &str, limit: usize) -> Vec<String> {
        fuzzy_matches(
            name,
            self.cities.iter().map(|city| city.name.as_str()),
            limit,
        )
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

/// Normalized lookup key: whitespace, dots, apostrophes, and hyphens
/// removed, remainder lowercased.
pub(crate) fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '.' | '\'' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Rank `candidates` against `name` by jaro-winkler similarity over
/// normalized keys, keeping the closest matches above the threshold.
pub(crate) fn fuzzy_matches<'a>(
    name: &str,
    candidates: impl Iterator<Item = &'a str>,
    limit: usize,
) -> Vec<String> {
    let needle = normalize_name(name);
    let mut scored: Vec<(f64, &str)> = candidates
        .map(|candidate| {
            (
                strsim::jaro_winkler(&needle, &normalize_name(candidate)),
                candidate,
            )
        })
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}
