use once_cell::sync::Lazy;
use serde::Serialize;

use crate::atlas::fuzzy_matches;
use crate::error::{Error, Result};
use crate::graph::{DirectedGraph, VertexId};

/// Numeric conversion applied along a unit edge.
pub type ConvertFn = fn(f64) -> f64;

/// Declaration row for [`UnitStore::new`]: a unit plus the conversions it
/// declares, each keyed by the target unit's name or one of its aliases.
pub type UnitEntry = (Unit, &'static [(&'static str, ConvertFn)]);

/// A measurement unit known to the converter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unit {
    pub name: &'static str,
    pub category: &'static str,
    pub aliases: &'static [&'static str],
}

impl Unit {
    /// Whether `name` matches this unit's name or one of its aliases,
    /// ignoring case.
    fn answers_to(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(name))
    }
}

/// Result of a resolved unit conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub value: f64,
    pub converted: f64,
    pub from: Unit,
    pub to: Unit,
}

/// Lookup table resolving unit pairs to conversion functions.
///
/// Units are graph vertices and conversion functions directed edge weights.
/// Only direct edges are ever queried; the table declares every supported
/// pair explicitly rather than composing conversions over multiple hops.
#[derive(Debug, Clone)]
pub struct UnitStore {
    graph: DirectedGraph<Unit, ConvertFn>,
}

impl UnitStore {
    pub fn new(entries: &[UnitEntry]) -> Self {
        let mut graph = DirectedGraph::new();

        // Register every unit before wiring conversions so forward
        // references between entries resolve.
        let ids: Vec<VertexId> = entries
            .iter()
            .map(|(unit, _)| graph.add_vertex(unit.clone()))
            .collect();

        for ((_, conversions), &source) in entries.iter().zip(&ids) {
            for &(target_name, conversion) in conversions.iter() {
                for target in graph.find(|unit| unit.answers_to(target_name)) {
                    graph.add_edge(source, target, conversion);
                }
            }
        }

        Self { graph }
    }

    /// The production unit table.
    pub fn builtin() -> &'static UnitStore {
        static STORE: Lazy<UnitStore> = Lazy::new(|| UnitStore::new(BUILTIN_UNITS));
        &STORE
    }

    /// All units matching `name` or one of its aliases, ignoring case.
    pub fn units(&self, name: &str) -> Vec<VertexId> {
        self.graph.find(|unit| unit.answers_to(name))
    }

    /// The unit registered under `id`.
    pub fn unit(&self, id: VertexId) -> Option<&Unit> {
        self.graph.get(id)
    }

    /// Direct conversion between two registered units, if one exists.
    ///
    /// Same-unit queries return `None`: no self-edges are ever created, so
    /// callers are expected to special-case that before asking.
    pub fn conversion(&self, from: VertexId, to: VertexId) -> Option<ConvertFn> {
        self.graph.weight(from, to).copied()
    }

    /// Units in registration order.
    pub fn unit_list(&self) -> Vec<&Unit> {
        self.graph.vertices().map(|(_, unit)| unit).collect()
    }

    /// Categories in first-appearance order.
    pub fn categories(&self) -> Vec<&'static str> {
        let mut categories: Vec<&'static str> = Vec::new();
        for (_, unit) in self.graph.vertices() {
            if !categories.contains(&unit.category) {
                categories.push(unit.category);
            }
        }
        categories
    }

    /// Convert `value` from one named unit to another.
    pub fn convert(&self, value: f64, from: &str, to: &str) -> Result<Conversion> {
        let (from_id, from_unit) = self.lookup(from).ok_or_else(|| self.unknown(from))?;
        let (to_id, to_unit) = self.lookup(to).ok_or_else(|| self.unknown(to))?;

        if from_id == to_id {
            return Err(Error::SameUnit {
                name: from_unit.name.to_string(),
            });
        }

        let Some(conversion) = self.conversion(from_id, to_id) else {
            return Err(Error::MismatchedUnits {
                from: from_unit.name.to_string(),
                to: to_unit.name.to_string(),
            });
        };

        Ok(Conversion {
            value,
            converted: apply(conversion, value),
            from: from_unit.clone(),
            to: to_unit.clone(),
        })
    }

    fn lookup(&self, name: &str) -> Option<(VertexId, &Unit)> {
        let id = self.units(name).into_iter().next()?;
        let unit = self.graph.get(id)?;
        Some((id, unit))
    }

    fn unknown(&self, name: &str) -> Error {
        Error::UnknownUnit {
            name: name.to_string(),
            suggestions: fuzzy_matches(
                name,
                self.graph.vertices().map(|(_, unit)| unit.name),
                3,
            ),
        }
    }
}

impl Default for UnitStore {
    fn default() -> Self {
        Self::new(&[])
    }
}

/// Apply a conversion function, rounding the result to two decimals.
///
/// The epsilon nudge counteracts representation error sitting just below a
/// rounding boundary (e.g. 2.675 stored as 2.67499...).
pub fn apply(conversion: ConvertFn, value: f64) -> f64 {
    ((conversion(value) + f64::EPSILON) * 100.0).round() / 100.0
}

static BUILTIN_UNITS: &[UnitEntry] = &[
    // Temperature
    (
        Unit {
            name: "Celsius",
            category: "Temperature",
            aliases: &["C"],
        },
        &[("F", |t| t * 9.0 / 5.0 + 32.0), ("K", |t| t + 272.15)],
    ),
    (
        Unit {
            name: "Fahrenheit",
            category: "Temperature",
            aliases: &["F"],
        },
        &[
            ("C", |t| (t - 32.0) * 5.0 / 9.0),
            ("K", |t| (t - 32.0) * 5.0 / 9.0 + 273.15),
        ],
    ),
    (
        Unit {
            name: "Kelvin",
            category: "Temperature",
            aliases: &["K"],
        },
        &[
            ("C", |t| t - 273.15),
            ("F", |t| (t - 273.15) * 9.0 / 5.0 + 32.0),
        ],
    ),
    // Length
    (
        Unit {
            name: "Meters",
            category: "Length",
            aliases: &["Meter", "Metre", "Metres", "m"],
        },
        &[
            ("km", |l| l / 1000.0),
            ("ft", |l| l / 0.3048),
            ("mi", |l| l / 1609.344),
        ],
    ),
    (
        Unit {
            name: "Kilometers",
            category: "Length",
            aliases: &["Kilometer", "Kilometre", "Kilometres", "km"],
        },
        &[
            ("m", |l| l * 1000.0),
            ("ft", |l| l / 0.0003048),
            ("mi", |l| l / 1.609344),
        ],
    ),
    (
        Unit {
            name: "Feet",
            category: "Length",
            aliases: &["Foot", "ft"],
        },
        &[
            ("m", |l| l * 0.3048),
            ("km", |l| l * 0.0003048),
            ("mi", |l| l / 5280.0),
        ],
    ),
    (
        Unit {
            name: "Miles",
            category: "Length",
            aliases: &["Mile", "mi"],
        },
        &[
            ("m", |l| l * 1609.344),
            ("km", |l| l * 1.609344),
            ("ft", |l| l * 5280.0),
        ],
    ),
    // Mass
    (
        Unit {
            name: "Kilograms",
            category: "Mass",
            aliases: &["Kilogram", "kg", "kgs"],
        },
        &[("lb", |m| m * 2.20462262), ("oz", |m| m * 35.2739619)],
    ),
    (
        Unit {
            name: "Pounds",
            category: "Mass",
            aliases: &["Pound", "lb", "lbs"],
        },
        &[("kg", |m| m * 0.45359237), ("oz", |m| m * 16.0)],
    ),
    (
        Unit {
            name: "Ounces",
            category: "Mass",
            aliases: &["Ounce", "oz"],
        },
        &[("kg", |m| m * 0.02834952), ("lb", |m| m * 0.0625)],
    ),
    // Volume
    (
        Unit {
            name: "Liters",
            category: "Volume",
            aliases: &["Liter", "Litre", "Litres", "l"],
        },
        &[("gal", |v| v * 0.264172), ("floz", |v| v * 33.814)],
    ),
    (
        Unit {
            name: "Gallons",
            category: "Volume",
            aliases: &["Gallon", "gal"],
        },
        &[("l", |v| v / 0.264172), ("floz", |v| v * 128.0)],
    ),
    (
        Unit {
            name: "FluidOunces",
            category: "Volume",
            aliases: &["FluidOunce", "FluidOz", "floz"],
        },
        &[("l", |v| v * 0.0295735), ("gal", |v| v * 0.0078125)],
    ),
];
