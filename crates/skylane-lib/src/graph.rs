use std::fmt;

/// Stable handle to a vertex within a [`DirectedGraph`].
///
/// Identifiers are assigned in insertion order and are only meaningful for
/// the graph that issued them. Two vertices with structurally equal payloads
/// are still distinct nodes with distinct identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexId(usize);

impl VertexId {
    /// Position of the vertex in insertion order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A directed, weighted graph over arbitrary vertex payloads.
///
/// Vertices live in an arena indexed by [`VertexId`]; adjacency is kept as
/// per-vertex edge lists in insertion order. The structure is
/// write-once-then-query: there are no removal operations, and both
/// consumers in this crate build a graph, run their queries, and drop it.
#[derive(Debug, Clone)]
pub struct DirectedGraph<V, W> {
    vertices: Vec<V>,
    adjacency: Vec<Vec<(VertexId, W)>>,
}

impl<V, W> DirectedGraph<V, W> {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            adjacency: Vec::new(),
        }
    }

    /// Register `payload` as a new vertex with an empty outgoing-edge set.
    pub fn add_vertex(&mut self, payload: V) -> VertexId {
        let id = VertexId(self.vertices.len());
        self.vertices.push(payload);
        self.adjacency.push(Vec::new());
        id
    }

    /// Store `weight` as the directed edge `from -> to`, replacing any
    /// previous weight for that exact ordered pair.
    ///
    /// When either endpoint does not name a vertex of this graph the call
    /// is a silent no-op. Callers must only pass identifiers obtained from
    /// [`DirectedGraph::add_vertex`] on the same graph instance.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId, weight: W) {
        if from.0 >= self.vertices.len() || to.0 >= self.vertices.len() {
            return;
        }
        let edges = &mut self.adjacency[from.0];
        if let Some(existing) = edges.iter_mut().find(|(target, _)| *target == to) {
            existing.1 = weight;
        } else {
            edges.push((to, weight));
        }
    }

    /// All vertices whose payload satisfies `predicate`, in insertion order.
    pub fn find(&self, mut predicate: impl FnMut(&V) -> bool) -> Vec<VertexId> {
        self.vertices
            .iter()
            .enumerate()
            .filter(|(_, payload)| predicate(payload))
            .map(|(index, _)| VertexId(index))
            .collect()
    }

    /// Outgoing `(target, weight)` pairs for `v`, in insertion order.
    ///
    /// Identifiers that do not name a vertex of this graph yield an empty
    /// slice.
    pub fn edges(&self, v: VertexId) -> &[(VertexId, W)] {
        self.adjacency.get(v.0).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Weight of the directed edge `from -> to`, if such an edge exists.
    pub fn weight(&self, from: VertexId, to: VertexId) -> Option<&W> {
        self.adjacency
            .get(from.0)?
            .iter()
            .find(|(target, _)| *target == to)
            .map(|(_, weight)| weight)
    }

    /// Whether `v` names a vertex of this graph.
    pub fn contains(&self, v: VertexId) -> bool {
        v.0 < self.vertices.len()
    }

    /// Payload stored for `v`.
    pub fn get(&self, v: VertexId) -> Option<&V> {
        self.vertices.get(v.0)
    }

    /// All vertices with their payloads, in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &V)> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(index, payload)| (VertexId(index), payload))
    }

    /// Number of registered vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

impl<V, W> Default for DirectedGraph<V, W> {
    fn default() -> Self {
        Self::new()
    }
}
