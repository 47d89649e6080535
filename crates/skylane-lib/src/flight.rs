use serde::Serialize;

use crate::atlas::{City, CityAtlas};
use crate::error::{Error, Result};
use crate::plane::{PlaneCatalog, UpgradeLevel};

/// Upgrade loadout applied to a flight.
#[derive(Debug, Clone, Copy, Default)]
pub struct Upgrades {
    pub range: UpgradeLevel,
    pub speed: UpgradeLevel,
    pub weight: UpgradeLevel,
}

/// Request for flight statistics along an explicit city path.
#[derive(Debug, Clone)]
pub struct FlightStatsRequest {
    /// Ordered city names, at least two.
    pub cities: Vec<String>,
    pub plane: String,
    pub upgrades: Upgrades,
}

/// Computed statistics for a flight along an explicit city path.
///
/// Payout assumes a full flight of coin jobs, which carries a 25% bonus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightStats {
    pub plane: String,
    pub path: Vec<String>,
    /// Scaled distance of each leg, in miles.
    pub legs: Vec<u32>,
    pub total_distance: u32,
    pub longest_leg: u32,
    pub payout: u32,
    pub loss: u32,
    pub profit: i64,
    pub profit_per_hour: f64,
    pub flight_time_seconds: f64,
    pub effective_range: u32,
    pub effective_speed: u32,
    pub effective_weight: f64,
}

/// Compute the economics of flying `request.cities` in order.
///
/// Every leg must fit within the plane's effective range; the first leg
/// that does not is reported as a typed error.
pub fn compute_flight_stats(
    atlas: &CityAtlas,
    catalog: &PlaneCatalog,
    request: &FlightStatsRequest,
) -> Result<FlightStats> {
    let plane = catalog.resolve(&request.plane)?;

    let mut cities: Vec<&City> = Vec::with_capacity(request.cities.len());
    for name in &request.cities {
        cities.push(atlas.resolve(name)?);
    }
    if cities.len() < 2 {
        return Err(Error::InvalidFlightPath {
            message: "a flight path needs at least two cities".to_string(),
        });
    }

    let effective_range = plane.effective_range(request.upgrades.range);
    let effective_speed = plane.effective_speed(request.upgrades.speed);
    let effective_weight = plane.effective_weight(request.upgrades.weight);

    let mut legs = Vec::with_capacity(cities.len() - 1);
    for pair in cities.windows(2) {
        let distance = pair[0].distance_to(pair[1]);
        if distance > effective_range {
            return Err(Error::LegOutOfRange {
                from: pair[0].name.clone(),
                to: pair[1].name.clone(),
                distance,
                range: effective_range,
            });
        }
        legs.push(distance);
    }

    let total_distance: u32 = legs.iter().sum();
    let longest_leg = legs.iter().copied().max().unwrap_or(0);

    // Payout scales with the direct origin-to-destination distance, not the
    // flown path; detours cost time but not ticket value.
    let direct_distance = cities[0].raw_distance_to(cities[cities.len() - 1]);
    let coin_value = (1.25 * (direct_distance + 50.0)).ceil() as u32;
    let payout = coin_value * plane.capacity;

    let total_raw_distance = f64::from(total_distance) / 4.0;
    let loss =
        (total_raw_distance * (f64::from(effective_speed) * effective_weight / 400.0)).floor() as u32;
    let profit = i64::from(payout) - i64::from(loss);

    let flight_time_seconds = total_raw_distance * 700.0 / f64::from(effective_speed);
    let profit_per_hour = profit as f64 * 3600.0 / flight_time_seconds;

    Ok(FlightStats {
        plane: plane.name.clone(),
        path: cities.iter().map(|city| city.name.clone()).collect(),
        legs,
        total_distance,
        longest_leg,
        payout,
        loss,
        profit,
        profit_per_hour,
        flight_time_seconds,
        effective_range,
        effective_speed,
        effective_weight,
    })
}
