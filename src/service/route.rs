//! Shortest routes over the stargate network.
//!
//! The graph is loaded once from the static data and never changes afterwards, so
//! a `RegionGraph` can be shared freely between tasks. Every query is a
//! breadth-first search, the network is unweighted.

use std::collections::{HashMap, HashSet};

use crate::error::route::RouteError;

/// Route searches give up after this many jumps.
///
/// The longest route in New Eden is well under 100 jumps, reaching this
/// ceiling means the jump table is corrupt.
pub const MAX_ROUTE_JUMPS: usize = 250;

/// Directed stargate graph keyed by solar system ID.
#[derive(Debug, Clone, Default)]
pub struct RegionGraph {
    outgoing: HashMap<i64, Vec<i64>>,
    incoming: HashMap<i64, Vec<i64>>,
}

impl RegionGraph {
    /// Build the graph from `(from, to)` stargate connections.
    ///
    /// Adjacency lists are sorted and deduplicated so searches visit neighbours
    /// in a fixed order and always return the same route.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (i64, i64)>,
    {
        let mut outgoing: HashMap<i64, Vec<i64>> = HashMap::new();
        let mut incoming: HashMap<i64, Vec<i64>> = HashMap::new();

        for (from, to) in edges {
            outgoing.entry(from).or_default().push(to);
            incoming.entry(to).or_default().push(from);
        }

        for neighbours in outgoing.values_mut().chain(incoming.values_mut()) {
            neighbours.sort_unstable();
            neighbours.dedup();
        }

        Self { outgoing, incoming }
    }

    /// Solar systems reachable in one jump from `solar_system_id`
    pub fn outgoing_edges(&self, solar_system_id: i64) -> &[i64] {
        self.outgoing
            .get(&solar_system_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn incoming_edges(&self, solar_system_id: i64) -> &[i64] {
        self.incoming
            .get(&solar_system_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Find the shortest route from `source` to `destination`.
    ///
    /// The returned route starts at `source` and stops one jump short of
    /// `destination`, so its length is the number of jumps. An empty route means
    /// either `source == destination` or that no route exists, callers tell the
    /// two apart by comparing the endpoints.
    ///
    /// The search expands outward from `destination` along incoming stargates,
    /// remembering for each discovered system the next system toward the
    /// destination, until `source` is discovered.
    ///
    /// # Errors
    /// - `RouteError::SearchExhausted` - No route was found within
    ///   [`MAX_ROUTE_JUMPS`] jumps while systems were still left to explore
    pub fn find_shortest_path(&self, source: i64, destination: i64) -> Result<Vec<i64>, RouteError> {
        if source == destination {
            return Ok(Vec::new());
        }

        let mut toward: HashMap<i64, i64> = HashMap::new();
        let mut visited: HashSet<i64> = HashSet::from([destination]);
        let mut frontier = vec![destination];
        let mut depth = 0;

        while !frontier.is_empty() {
            if depth >= MAX_ROUTE_JUMPS {
                return Err(RouteError::SearchExhausted {
                    origin: source,
                    destination,
                    max_jumps: MAX_ROUTE_JUMPS,
                });
            }
            depth += 1;

            let mut next_frontier = Vec::new();
            for &system in &frontier {
                for &previous in self.incoming_edges(system) {
                    if !visited.insert(previous) {
                        continue;
                    }

                    toward.insert(previous, system);
                    if previous == source {
                        return Ok(Self::walk(source, destination, &toward));
                    }
                    next_frontier.push(previous);
                }
            }

            frontier = next_frontier;
        }

        Ok(Vec::new())
    }

    fn walk(source: i64, destination: i64, toward: &HashMap<i64, i64>) -> Vec<i64> {
        let mut route = Vec::new();
        let mut current = source;

        while current != destination {
            route.push(current);
            match toward.get(&current) {
                Some(&next) => current = next,
                None => break,
            }
        }

        route
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Bidirectional chain 0 - 1 - 2 - ... - `length`
    fn chain(length: i64) -> RegionGraph {
        RegionGraph::from_edges((0..length).flat_map(|i| [(i, i + 1), (i + 1, i)]))
    }

    #[test]
    fn route_excludes_destination() {
        let graph = chain(4);

        assert_eq!(graph.find_shortest_path(0, 4), Ok(vec![0, 1, 2, 3]));
        assert_eq!(graph.find_shortest_path(4, 1), Ok(vec![4, 3, 2]));
    }

    #[test]
    fn adjacent_systems_are_one_jump() {
        let graph = chain(1);

        assert_eq!(graph.find_shortest_path(0, 1), Ok(vec![0]));
    }

    #[test]
    fn same_system_is_zero_jumps() {
        let graph = chain(3);

        assert_eq!(graph.find_shortest_path(2, 2), Ok(vec![]));
        // Systems missing from the graph still resolve to themselves
        assert_eq!(graph.find_shortest_path(99, 99), Ok(vec![]));
    }

    #[test]
    fn disconnected_systems_are_unreachable() {
        let graph = RegionGraph::from_edges([(1, 2), (2, 1), (10, 11), (11, 10)]);

        assert_eq!(graph.find_shortest_path(1, 11), Ok(vec![]));
        assert_eq!(graph.find_shortest_path(1, 404), Ok(vec![]));
    }

    #[test]
    fn follows_edge_direction() {
        let graph = RegionGraph::from_edges([(1, 2), (2, 3)]);

        assert_eq!(graph.find_shortest_path(1, 3), Ok(vec![1, 2]));
        assert_eq!(graph.find_shortest_path(3, 1), Ok(vec![]));
    }

    #[test]
    fn picks_shortest_of_several_routes() {
        // 1 -> 2 -> 3 -> 4 -> 5 and a shortcut 1 -> 6 -> 5
        let graph = RegionGraph::from_edges([(1, 2), (2, 3), (3, 4), (4, 5), (1, 6), (6, 5)]);

        assert_eq!(graph.find_shortest_path(1, 5), Ok(vec![1, 6]));
    }

    #[test]
    fn equal_length_routes_are_deterministic() {
        // Diamond with two routes of length 2
        let edges = [(1, 3), (1, 2), (2, 4), (3, 4)];
        let reversed: Vec<_> = edges.iter().rev().copied().collect();

        let first = RegionGraph::from_edges(edges).find_shortest_path(1, 4);
        let second = RegionGraph::from_edges(reversed).find_shortest_path(1, 4);

        assert_eq!(first, second);
        assert_eq!(first.map(|route| route.len()), Ok(2));
    }

    #[test]
    fn duplicate_edges_are_ignored() {
        let graph = RegionGraph::from_edges([(1, 2), (1, 2), (1, 3)]);

        assert_eq!(graph.outgoing_edges(1), &[2, 3]);
        assert!(graph.outgoing_edges(404).is_empty());
    }

    #[test]
    fn route_at_ceiling_is_found() {
        let graph = chain(MAX_ROUTE_JUMPS as i64);

        let route = graph.find_shortest_path(0, MAX_ROUTE_JUMPS as i64);

        assert_eq!(route.map(|route| route.len()), Ok(MAX_ROUTE_JUMPS));
    }

    #[test]
    fn route_beyond_ceiling_is_an_error() {
        let graph = chain(300);

        let result = graph.find_shortest_path(0, 300);

        assert_eq!(
            result,
            Err(RouteError::SearchExhausted {
                origin: 0,
                destination: 300,
                max_jumps: MAX_ROUTE_JUMPS,
            })
        );
    }
}
