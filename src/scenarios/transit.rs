//! # Traffic Control
//!
//! A directed street network answers single-source queries with Dijkstra and Bellman-Ford and
//! all-pairs queries with Floyd-Warshall; the cheapest road network connecting all junctions is a
//! minimum spanning forest of the same streets taken as undirected. Registered routes are stored in
//! a trie for lookup and autocompletion.
//!
//! A second, undirected arterial network is used for emergency routing with A*, and a table of
//! distances between bus stops for greedy bus route planning.

use std::io::Write;

use itertools::Itertools;
use tracing::{info, warn};

use super::*;
use crate::{algo::*, collections::Trie, prelude::*, sorting::merge_sort_by_key};

/// A vehicle currently on the road
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitVehicle {
    pub id: String,
    /// Registered route the vehicle follows, e.g. `A->B->C`
    pub route: String,
    pub current: Node,
    pub next_stop: Node,
    /// Minutes until `next_stop` is reached
    pub eta_minutes: u32,
    /// Occupancy in percent
    pub occupancy: u8,
}

#[derive(Debug, Clone)]
pub struct TrafficControl {
    streets: AdjArray<i64>,
    arterials: AdjArrayUndir<u32>,
    bus_stops: DistanceMatrix<u32>,
    routes: Trie,
    vehicles: Vec<TransitVehicle>,
}

impl TrafficControl {
    pub fn new(streets: AdjArray<i64>, arterials: AdjArrayUndir<u32>, bus_stops: DistanceMatrix<u32>) -> Self {
        Self {
            streets,
            arterials,
            bus_stops,
            routes: Trie::new(),
            vehicles: Vec::new(),
        }
    }

    pub fn sample() -> Self {
        let streets = AdjArray::from_edges(
            6,
            [(0, 1, 7), (0, 2, 9), (1, 3, 15), (2, 3, 11), (2, 5, 2), (3, 4, 6), (5, 4, 9)],
        );
        let arterials = AdjArrayUndir::from_edges(
            6,
            [(0, 1, 4), (1, 2, 3), (2, 3, 6), (3, 4, 2), (4, 5, 5), (0, 5, 10)],
        );
        let bus_stops = DistanceMatrix::from_rows(vec![
            vec![0, 4, 6, 7, 8],
            vec![4, 0, 2, 5, 7],
            vec![6, 2, 0, 3, 4],
            vec![7, 5, 3, 0, 2],
            vec![8, 7, 4, 2, 0],
        ]);

        let mut control = Self::new(streets, arterials, bus_stops);
        for route in ["A->B->C", "A->B->D", "A->C->D"] {
            control.register_route(route);
        }
        for (id, route, current, next_stop, eta_minutes, occupancy) in [
            ("Bus101", "A->B->C", 0, 1, 3, 75),
            ("Bus102", "B->C->D", 1, 2, 5, 50),
            ("Train1", "X->Y->Z", 2, 3, 7, 90),
        ] {
            control.vehicles.push(TransitVehicle {
                id: id.to_string(),
                route: route.to_string(),
                current,
                next_stop,
                eta_minutes,
                occupancy,
            });
        }
        control
    }

    /// Replaces the street network, e.g. by one read from an edge-list file
    pub fn with_streets(mut self, streets: AdjArray<i64>) -> Self {
        self.streets = streets;
        self
    }

    pub fn streets(&self) -> &AdjArray<i64> {
        &self.streets
    }

    /// Street distances from `source` (Dijkstra).
    /// Returns [`Error::NegativeWeight`] if any street has a negative length.
    pub fn distances(&self, source: Node) -> Result<Vec<Option<i64>>> {
        self.streets.check_node(source)?;
        if let Some(WeightedEdge(u, v, w)) = self.streets.weighted_edges(false).find(|e| e.2 < 0) {
            warn!(u, v, w, "negative street length");
            return Err(Error::NegativeWeight { u, v });
        }
        Ok(self.streets.dijkstra(source).distances().to_vec())
    }

    /// Street distances from `source` (Bellman-Ford); also supports negative lengths
    pub fn distances_bellman_ford(&self, source: Node) -> Result<Vec<Option<i64>>> {
        self.streets.check_node(source)?;
        Ok(self.streets.bellman_ford(source)?.distances().to_vec())
    }

    /// Distances between all pairs of junctions (Floyd-Warshall)
    pub fn all_distances(&self) -> DistanceMatrix<i64> {
        self.streets.floyd_warshall()
    }

    /// Cheapest set of streets (taken as two-way roads) that connects all junctions
    pub fn route_network(&self) -> SpanningForest<i64> {
        kruskal(self.streets.number_of_nodes(), self.streets.weighted_edges(false))
    }

    /// Registers a route; returns *false* if it was already known
    pub fn register_route(&mut self, route: &str) -> bool {
        self.routes.insert(route)
    }

    pub fn has_route(&self, route: &str) -> bool {
        self.routes.contains(route)
    }

    /// All registered routes starting with `prefix`, in lexicographic order
    pub fn autocomplete(&self, prefix: &str) -> Vec<String> {
        self.routes.autocomplete(prefix)
    }

    pub fn vehicles(&self) -> &[TransitVehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, id: &str) -> Result<&TransitVehicle> {
        self.vehicles
            .iter()
            .find(|v| v.id == id)
            .ok_or_else(|| Error::UnknownVehicle(id.to_string()))
    }

    /// Adds a vehicle; it must follow a registered route
    pub fn add_vehicle(&mut self, vehicle: TransitVehicle) -> Result<()> {
        self.streets.check_node(vehicle.current)?;
        self.streets.check_node(vehicle.next_stop)?;
        if self.vehicles.iter().any(|v| v.id == vehicle.id) {
            return Err(Error::Duplicate(vehicle.id));
        }
        if !self.has_route(&vehicle.route) {
            return Err(Error::UnknownItem(vehicle.route));
        }
        self.vehicles.push(vehicle);
        Ok(())
    }

    /// Vehicles ordered by their arrival at the next stop (stable on ties)
    pub fn vehicles_by_eta(&self) -> Vec<&TransitVehicle> {
        let mut sorted = self.vehicles.iter().collect_vec();
        merge_sort_by_key(&mut sorted, |v| v.eta_minutes);
        sorted
    }

    /// Greedy bus route over all stops starting at `start`
    pub fn bus_route(&self, start: Node) -> Result<NearestNeighborTour> {
        self.bus_stops.check_node(start)?;
        let stops = self.bus_stops.vertices().filter(|&s| s != start).collect_vec();
        Ok(nearest_neighbor_tour(&self.bus_stops, start, &stops))
    }

    pub fn bus_route_length(&self, route: &[Node]) -> Option<u32> {
        route_length(route, &self.bus_stops)
    }

    /// Arterial distances from `source` (Dijkstra)
    pub fn arterial_distances(&self, source: Node) -> Result<Vec<Option<u32>>> {
        self.arterials.check_node(source)?;
        Ok(self.arterials.dijkstra(source).distances().to_vec())
    }

    /// Fastest arterial path for an emergency vehicle (A* guided by the junction-number difference)
    pub fn emergency_route(&self, start: Node, goal: Node) -> Result<Option<AStarPath<u32>>> {
        self.arterials.check_node(start)?;
        self.arterials.check_node(goal)?;

        let path = self.arterials.a_star(start, goal, |u| goal.abs_diff(u));
        if let Some(p) = &path {
            info!(start, goal, cost = p.cost, "emergency route found");
        }
        Ok(path)
    }
}

impl Scenario for TrafficControl {
    const NAME: &'static str = "transit";

    fn write_report<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let n = self.streets.number_of_nodes();

        section(out, "Dijkstra")?;
        match self.distances(0) {
            Ok(dist) => {
                for (u, d) in dist.into_iter().enumerate() {
                    writeln!(out, "node {u}: {}", format_distance(d))?;
                }
            }
            Err(e) => writeln!(out, "{e}")?,
        }

        section(out, "Bellman-Ford")?;
        match self.distances_bellman_ford(0) {
            Ok(dist) => {
                for (u, d) in dist.into_iter().enumerate() {
                    writeln!(out, "node {u}: {}", format_distance(d))?;
                }
            }
            Err(e) => writeln!(out, "{e}")?,
        }

        section(out, "Floyd-Warshall")?;
        let all = self.all_distances();
        for u in 0..n {
            writeln!(out, "{}", all.row(u).iter().map(|&d| format_distance(d)).join(" "))?;
        }

        section(out, "Route network (Kruskal)")?;
        let forest = self.route_network();
        writeln!(
            out,
            "total cost {} over {} roads, {} component(s)",
            forest.total_weight,
            forest.edges.len(),
            forest.components
        )?;

        let prefix = "A->B->";
        section(out, "Route autocomplete")?;
        writeln!(out, "{prefix}: {}", self.autocomplete(prefix).join(", "))?;

        section(out, "Vehicles")?;
        for v in self.vehicles_by_eta() {
            writeln!(
                out,
                "{} on {} | at {} next {} | eta {} min | occupancy {}%",
                v.id, v.route, v.current, v.next_stop, v.eta_minutes, v.occupancy
            )?;
        }

        section(out, "Arterial distances")?;
        for (u, d) in self.arterial_distances(0)?.into_iter().enumerate() {
            writeln!(out, "node {u}: {}", format_distance(d))?;
        }

        section(out, "Emergency route (A*)")?;
        let goal = self.arterials.number_of_nodes().saturating_sub(1);
        match self.emergency_route(0, goal)? {
            Some(p) => writeln!(out, "0 -> {goal}: cost {} via {}", p.cost, format_path(&p.path))?,
            None => writeln!(out, "0 -> {goal}: unreachable")?,
        }

        section(out, "Bus route (nearest neighbour)")?;
        let tour = self.bus_route(0)?;
        writeln!(
            out,
            "{} (length {})",
            format_path(&tour.route),
            format_distance(self.bus_route_length(&tour.route))
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::EdgeListRead;

    #[test]
    fn single_source_agree() {
        let control = TrafficControl::sample();
        let expected = vec![Some(0), Some(7), Some(9), Some(20), Some(20), Some(11)];

        assert_eq!(control.distances(0).unwrap(), expected);
        assert_eq!(control.distances_bellman_ford(0).unwrap(), expected);

        let all = control.all_distances();
        assert_eq!(all.row(0).to_vec(), expected);
        assert_eq!(all.get(4, 0), None);
        assert!(control.distances(6).is_err());
    }

    #[test]
    fn negative_street_cycle() {
        let streets = AdjArray::from_edges(3, [(0, 1, 2), (1, 2, -3), (2, 1, 1)]);
        let control = TrafficControl::sample().with_streets(streets);

        assert!(matches!(
            control.distances_bellman_ford(0),
            Err(Error::NegativeCycle { .. })
        ));
    }

    #[test]
    fn negative_street_length() {
        let streets = AdjArray::<i64>::try_read_edge_list("p sp 3 2\n1 2 5\n2 3 -2\n".as_bytes()).unwrap();
        let mut control = TrafficControl::sample().with_streets(streets);

        assert!(matches!(control.distances(0), Err(Error::NegativeWeight { u: 1, v: 2 })));
        assert_eq!(
            control.distances_bellman_ford(0).unwrap(),
            vec![Some(0), Some(5), Some(3)]
        );

        let mut out = Vec::new();
        control.write_report(&mut out).unwrap();
        let report = String::from_utf8(out).unwrap();
        assert!(report.contains("edge (1, 2) has a negative weight"));
        assert!(report.contains("== Bellman-Ford ==\nnode 0: 0\nnode 1: 5\nnode 2: 3"));
    }

    #[test]
    fn route_network_cost() {
        let forest = TrafficControl::sample().route_network();
        assert_eq!(forest.total_weight, 33);
        assert_eq!(forest.edges.len(), 5);
        assert!(forest.is_spanning_tree());
    }

    #[test]
    fn routes() {
        let mut control = TrafficControl::sample();
        assert_eq!(control.autocomplete("A->B->"), vec!["A->B->C", "A->B->D"]);
        assert!(control.has_route("A->C->D"));
        assert!(!control.has_route("A->C"));
        assert!(!control.register_route("A->B->C"));
        assert_eq!(control.autocomplete("Z"), Vec::<String>::new());
    }

    #[test]
    fn vehicles() {
        let mut control = TrafficControl::sample();
        assert_eq!(control.vehicle("Bus102").unwrap().eta_minutes, 5);
        assert!(matches!(control.vehicle("Tram9"), Err(Error::UnknownVehicle(_))));

        let tram = TransitVehicle {
            id: "Tram9".into(),
            route: "A->C->D".into(),
            current: 3,
            next_stop: 4,
            eta_minutes: 1,
            occupancy: 20,
        };
        control.add_vehicle(tram.clone()).unwrap();
        assert!(matches!(control.add_vehicle(tram), Err(Error::Duplicate(_))));

        let order = control.vehicles_by_eta().iter().map(|v| v.id.as_str()).collect_vec();
        assert_eq!(order, vec!["Tram9", "Bus101", "Bus102", "Train1"]);
    }

    #[test]
    fn bus_and_emergency_routes() {
        let control = TrafficControl::sample();

        let tour = control.bus_route(0).unwrap();
        assert_eq!(tour.route, vec![0, 1, 2, 3, 4]);
        assert!(tour.skipped.is_empty());
        assert_eq!(control.bus_route_length(&tour.route), Some(11));

        assert_eq!(
            control.arterial_distances(0).unwrap(),
            vec![Some(0), Some(4), Some(7), Some(13), Some(15), Some(10)]
        );

        let path = control.emergency_route(0, 5).unwrap().unwrap();
        assert_eq!(path.cost, 10);
        assert_eq!(path.path, vec![0, 5]);

        let path = control.emergency_route(1, 3).unwrap().unwrap();
        assert_eq!(path.cost, 9);
        assert_eq!(path.path, vec![1, 2, 3]);
    }

    #[test]
    fn report() {
        let mut out = Vec::new();
        TrafficControl::sample().write_report(&mut out).unwrap();
        let report = String::from_utf8(out).unwrap();

        assert!(report.contains("total cost 33"));
        assert!(report.contains("A->B->: A->B->C, A->B->D"));
        assert!(report.contains("0 -> 5: cost 10 via 0 5"));
        assert!(report.contains("0 1 2 3 4 (length 11)"));
    }
}
