use serde::Serialize;
use tracing::debug;

use crate::atlas::{map_distance, City, CityAtlas};
use crate::error::{Error, Result};
use crate::graph::{DirectedGraph, VertexId};
use crate::plane::{PlaneCatalog, UpgradeLevel};

/// Vertex payload for a per-query flight graph.
///
/// `heuristic` is the straight-line map distance to the destination,
/// computed once at graph construction. Actual travel distance can never
/// undercut the straight line, which keeps the A* estimate admissible.
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub heuristic: u32,
}

/// High-level flight routing request.
#[derive(Debug, Clone)]
pub struct FlightRequest {
    pub origin: String,
    pub destination: String,
    pub plane: String,
    pub range_upgrade: UpgradeLevel,
}

impl FlightRequest {
    /// Convenience constructor for an unupgraded plane.
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        plane: impl Into<String>,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            plane: plane.into(),
            range_upgrade: UpgradeLevel::default(),
        }
    }
}

/// Planned flight returned by the library.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightPlan {
    pub plane: String,
    pub effective_range: u32,
    /// City names from origin to destination inclusive.
    pub steps: Vec<String>,
    /// Scaled distance of each hop, in miles.
    pub legs: Vec<u32>,
    pub total_distance: u32,
}

impl FlightPlan {
    /// Number of hops in the flight.
    pub fn hop_count(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }
}

/// Build the flight graph for one query: every city compatible with the
/// plane class becomes a waypoint, and any ordered pair within a single
/// hop of the effective range gets a directed edge weighted by distance.
///
/// The distance function is symmetric, so the graph is effectively
/// undirected, but both orderings are registered explicitly.
pub fn build_flight_graph(
    atlas: &CityAtlas,
    plane_class: u8,
    effective_range: u32,
    destination: &City,
) -> DirectedGraph<Waypoint, u32> {
    let mut graph = DirectedGraph::new();

    for city in atlas.cities() {
        if city.class >= plane_class {
            graph.add_vertex(Waypoint {
                name: city.name.clone(),
                x: city.x,
                y: city.y,
                heuristic: city.distance_to(destination),
            });
        }
    }

    let coordinates: Vec<(VertexId, f64, f64)> = graph
        .vertices()
        .map(|(id, waypoint)| (id, waypoint.x, waypoint.y))
        .collect();
    for &(from, x1, y1) in &coordinates {
        for &(to, x2, y2) in &coordinates {
            let distance = map_distance(x1, y1, x2, y2);
            if distance > 0 && distance <= effective_range {
                graph.add_edge(from, to, distance);
            }
        }
    }

    debug!(
        vertices = graph.len(),
        range = effective_range,
        "built flight graph"
    );
    graph
}

/// A* search over a flight graph.
///
/// Returns the city names from origin to destination inclusive, or `None`
/// when the open set runs dry before the destination is reached, meaning no
/// path exists under the given constraints.
///
/// The open set is scanned linearly and ties on `g + h` resolve to the
/// earliest entry, so results are deterministic for a fixed atlas order. A
/// binary heap would improve the asymptotics but reorder equal-score
/// expansions; waypoint counts are small enough that the scan is fine.
pub fn a_star(
    graph: &DirectedGraph<Waypoint, u32>,
    origin: &str,
    destination: &str,
) -> Option<Vec<String>> {
    let start = graph.find(|waypoint| waypoint.name == origin).into_iter().next()?;

    // Search scratch state lives beside the graph, keyed by vertex index,
    // so the graph itself stays immutable across invocations.
    let mut path_length: Vec<u64> = vec![u64::MAX; graph.len()];
    let mut came_from: Vec<Option<VertexId>> = vec![None; graph.len()];
    let mut open: Vec<VertexId> = vec![start];
    path_length[start.index()] = 0;

    while !open.is_empty() {
        let mut lowest = 0;
        for index in 1..open.len() {
            if estimated_total(graph, &path_length, open[index])
                < estimated_total(graph, &path_length, open[lowest])
            {
                lowest = index;
            }
        }
        let current = open[lowest];

        if graph
            .get(current)
            .is_some_and(|waypoint| waypoint.name == destination)
        {
            return Some(reconstruct(graph, &came_from, current));
        }

        open.remove(lowest);

        for &(neighbor, leg) in graph.edges(current) {
            let tentative = path_length[current.index()].saturating_add(u64::from(leg));
            if tentative < path_length[neighbor.index()] {
                path_length[neighbor.index()] = tentative;
                came_from[neighbor.index()] = Some(current);
                if !open.contains(&neighbor) {
                    open.push(neighbor);
                }
            }
        }
    }

    // Open set is empty but the destination was never reached.
    None
}

/// `f = g + h` for the open-set scan. Unvisited vertices saturate to the
/// maximum, mirroring an infinite path length.
fn estimated_total(
    graph: &DirectedGraph<Waypoint, u32>,
    path_length: &[u64],
    id: VertexId,
) -> u64 {
    let heuristic = graph
        .get(id)
        .map_or(0, |waypoint| u64::from(waypoint.heuristic));
    path_length[id.index()].saturating_add(heuristic)
}

fn reconstruct(
    graph: &DirectedGraph<Waypoint, u32>,
    came_from: &[Option<VertexId>],
    goal: VertexId,
) -> Vec<String> {
    let mut names = Vec::new();
    let mut current = Some(goal);
    while let Some(id) = current {
        if let Some(waypoint) = graph.get(id) {
            names.push(waypoint.name.clone());
        }
        current = came_from[id.index()];
    }
    names.reverse();
    names
}

/// Compute the shortest flight path satisfying the request.
pub fn plan_flight(
    atlas: &CityAtlas,
    catalog: &PlaneCatalog,
    request: &FlightRequest,
) -> Result<FlightPlan> {
    let plane = catalog.resolve(&request.plane)?;
    let origin = atlas.resolve(&request.origin)?;
    let destination = atlas.resolve(&request.destination)?;

    let effective_range = plane.effective_range(request.range_upgrade);
    let graph = build_flight_graph(atlas, plane.class, effective_range, destination);

    let Some(steps) = a_star(&graph, &origin.name, &destination.name) else {
        return Err(Error::RouteNotFound {
            origin: origin.name.clone(),
            destination: destination.name.clone(),
        });
    };

    let mut legs = Vec::with_capacity(steps.len().saturating_sub(1));
    for pair in steps.windows(2) {
        let from = atlas.resolve(&pair[0])?;
        let to = atlas.resolve(&pair[1])?;
        legs.push(from.distance_to(to));
    }
    let total_distance: u32 = legs.iter().sum();

    Ok(FlightPlan {
        plane: plane.name.clone(),
        effective_range,
        steps,
        legs,
        total_distance,
    })
}
