//! # Freight Planning
//!
//! Shipments between nodes of a highway network are assigned to a fleet of trucks and every truck
//! gets a round trip from its depot.
//!
//! 1. All-pairs distances are computed once with Dijkstra from every node.
//! 2. Shipments are taken by descending priority (heavier first among equal priority). Each goes to
//!    the truck with enough remaining capacity whose route grows the least when the shipment is
//!    appended: `d(last, pickup) + d(pickup, delivery) + d(delivery, depot) - d(last, depot)`,
//!    where an empty route starts at the depot. The first truck wins ties.
//! 3. Each route is built greedily with the nearest-neighbour heuristic over all pickups and
//!    deliveries of the truck, closed at the depot and improved with 2-opt.
//!
//! Metrics (distance, cost, fuel, CO2, driving time) only count trucks that carry something.

use std::io::Write;

use itertools::Itertools;
use tracing::{debug, info, warn};

use super::*;
use crate::{algo::*, collections::PriorityQueue, prelude::*};

/// Kilograms of CO2 emitted per litre of diesel
pub const CO2_PER_LITRE_DIESEL: f64 = 2.68;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Shipment {
    pub id: u32,
    pub pickup: Node,
    pub delivery: Node,
    /// Tonnes
    pub weight: f64,
    /// Higher is more urgent
    pub priority: u32,
    /// Hour of the day from which the goods are ready
    pub ready_hours: f64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Truck {
    pub id: u32,
    pub depot: Node,
    /// Tonnes
    pub capacity: f64,
    pub cost_per_km: f64,
    /// Litres of diesel per km
    pub fuel_per_km: f64,
}

impl Truck {
    pub fn new(id: u32, depot: Node, capacity: f64, cost_per_km: f64, fuel_per_km: f64) -> Self {
        Self {
            id,
            depot,
            capacity,
            cost_per_km,
            fuel_per_km,
        }
    }
}

/// Shipments and route of one truck
#[derive(Debug, Clone, PartialEq)]
pub struct TruckPlan {
    pub truck: Truck,
    /// Shipment ids in assignment order
    pub shipments: Vec<u32>,
    pub load: f64,
    /// Round trip starting and ending at the depot
    pub route: Vec<Node>,
    /// Length of `route` in km, `None` if a leg is unreachable
    pub distance: Option<f64>,
}

impl TruckPlan {
    fn new(truck: Truck) -> Self {
        Self {
            truck,
            shipments: Vec::new(),
            load: 0.0,
            route: Vec::new(),
            distance: Some(0.0),
        }
    }

    pub fn is_used(&self) -> bool {
        !self.shipments.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FleetPlan {
    /// One plan per truck in fleet order
    pub trucks: Vec<TruckPlan>,
    /// Shipments no truck could take
    pub unassigned: Vec<u32>,
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Metrics {
    pub trucks_used: usize,
    pub distance_km: f64,
    pub cost: f64,
    pub fuel_litres: f64,
    pub co2_kg: f64,
    pub drive_hours: f64,
    pub delivered: usize,
    pub unassigned: usize,
}

#[derive(Debug, Clone)]
pub struct FreightNetwork {
    highways: AdjArrayUndir<f64>,
    distances: DistanceMatrix<f64>,
    shipments: Vec<Shipment>,
    trucks: Vec<Truck>,
    extra_truck: Option<Truck>,
    two_opt_limit: usize,
    speed_kmph: f64,
}

impl FreightNetwork {
    /// Creates an empty plan on `highways` (weights in km)
    pub fn new(highways: AdjArrayUndir<f64>) -> Self {
        let distances = highways.all_pairs_dijkstra();
        Self {
            highways,
            distances,
            shipments: Vec::new(),
            trucks: Vec::new(),
            extra_truck: None,
            two_opt_limit: 200,
            speed_kmph: 40.0,
        }
    }

    /// Eight junctions, seven shipments and three trucks; the what-if adds a fourth, larger truck
    pub fn sample() -> Self {
        let highways = AdjArrayUndir::from_edges(
            8,
            [
                (0, 1, 10.0),
                (0, 2, 15.0),
                (1, 3, 12.0),
                (2, 3, 10.0),
                (1, 2, 5.0),
                (3, 4, 7.0),
                (2, 5, 20.0),
                (4, 6, 11.0),
                (5, 6, 9.0),
                (6, 7, 8.0),
            ],
        );
        let mut network = Self::new(highways);
        network.shipments = [
            (1, 0, 4, 2.5, 10, 8.0),
            (2, 1, 5, 3.0, 8, 9.0),
            (3, 2, 6, 5.0, 9, 8.0),
            (4, 0, 7, 1.0, 5, 10.0),
            (5, 3, 5, 4.0, 7, 6.0),
            (6, 1, 6, 2.0, 6, 7.0),
            (7, 2, 4, 1.5, 4, 9.0),
        ]
        .into_iter()
        .map(|(id, pickup, delivery, weight, priority, ready_hours)| Shipment {
            id,
            pickup,
            delivery,
            weight,
            priority,
            ready_hours,
        })
        .collect();
        network.trucks = vec![
            Truck::new(1, 0, 8.0, 1.5, 0.25),
            Truck::new(2, 1, 6.0, 1.2, 0.20),
            Truck::new(3, 2, 10.0, 1.7, 0.30),
        ];

        network.what_if_truck(Truck::new(4, 0, 12.0, 1.6, 0.28))
    }

    /// Maximum number of 2-opt moves per route (default `200`)
    pub fn two_opt_limit(mut self, limit: usize) -> Self {
        self.two_opt_limit = limit;
        self
    }

    /// Average speed used for driving times (default `40` km/h)
    pub fn speed_kmph(mut self, speed: f64) -> Self {
        self.speed_kmph = speed;
        self
    }

    /// Truck added to the fleet in the what-if part of the report
    pub fn what_if_truck(mut self, truck: Truck) -> Self {
        self.extra_truck = Some(truck);
        self
    }

    pub fn highways(&self) -> &AdjArrayUndir<f64> {
        &self.highways
    }

    pub fn distances(&self) -> &DistanceMatrix<f64> {
        &self.distances
    }

    pub fn shipments(&self) -> &[Shipment] {
        &self.shipments
    }

    pub fn trucks(&self) -> &[Truck] {
        &self.trucks
    }

    pub fn add_shipment(&mut self, shipment: Shipment) -> Result<()> {
        self.highways.check_node(shipment.pickup)?;
        self.highways.check_node(shipment.delivery)?;
        if self.shipments.iter().any(|s| s.id == shipment.id) {
            return Err(Error::Duplicate(format!("shipment {}", shipment.id)));
        }
        self.shipments.push(shipment);
        Ok(())
    }

    pub fn add_truck(&mut self, truck: Truck) -> Result<()> {
        self.highways.check_node(truck.depot)?;
        if self.trucks.iter().any(|t| t.id == truck.id) {
            return Err(Error::Duplicate(format!("truck {}", truck.id)));
        }
        self.trucks.push(truck);
        Ok(())
    }

    /// Extra route length if `shipment` is appended to the stops of `plan`; `None` if unreachable
    fn marginal_cost(&self, plan: &TruckPlan, shipment: &Shipment) -> Option<f64> {
        let d = |u, v| self.distances.get(u, v);
        let depot = plan.truck.depot;
        let last = plan.route.last().copied().unwrap_or(depot);

        let appended = d(last, shipment.pickup)? + d(shipment.pickup, shipment.delivery)? + d(shipment.delivery, depot)?;
        let closing = if plan.route.is_empty() { 0.0 } else { d(last, depot)? };
        Some(appended - closing)
    }

    /// Assigns all shipments and builds the route of every truck
    pub fn plan(&self) -> FleetPlan {
        let mut plans = self.trucks.iter().copied().map(TruckPlan::new).collect_vec();
        let mut unassigned = Vec::new();

        let mut queue: PriorityQueue<(u32, f64), &Shipment> =
            self.shipments.iter().map(|s| ((s.priority, s.weight), s)).collect();

        while let Some((_, shipment)) = queue.pop() {
            let mut best: Option<(usize, f64)> = None;
            for (i, plan) in plans.iter().enumerate() {
                if plan.load + shipment.weight > plan.truck.capacity {
                    continue;
                }
                let Some(cost) = self.marginal_cost(plan, shipment) else {
                    continue;
                };
                if best.is_none_or(|(_, c)| cost < c) {
                    best = Some((i, cost));
                }
            }

            let Some((i, cost)) = best else {
                warn!(shipment = shipment.id, weight = shipment.weight, "shipment left unassigned");
                unassigned.push(shipment.id);
                continue;
            };

            let plan = &mut plans[i];
            plan.shipments.push(shipment.id);
            plan.load += shipment.weight;
            // provisional stop sequence, replaced by the optimised route below
            plan.route.extend([shipment.pickup, shipment.delivery]);
            debug!(shipment = shipment.id, truck = plan.truck.id, cost, "shipment assigned");
        }

        for plan in &mut plans {
            self.build_route(plan);
        }

        FleetPlan {
            trucks: plans,
            unassigned,
        }
    }

    fn build_route(&self, plan: &mut TruckPlan) {
        let depot = plan.truck.depot;
        if plan.shipments.is_empty() {
            plan.route = vec![depot];
            plan.distance = Some(0.0);
            return;
        }

        let stops = std::mem::take(&mut plan.route);
        let tour = nearest_neighbor_tour(&self.distances, depot, &stops);
        if !tour.skipped.is_empty() {
            warn!(truck = plan.truck.id, skipped = ?tour.skipped, "stops unreachable from depot");
        }

        let mut route = tour.route;
        route.push(depot);
        let moves = TwoOpt::new()
            .iteration_limit(self.two_opt_limit)
            .min_gain(1e-9)
            .run(&mut route, &self.distances);

        plan.distance = route_length(&route, &self.distances);
        plan.route = route;
        info!(truck = plan.truck.id, moves, distance = ?plan.distance, "route planned");
    }

    /// Aggregated figures of a plan
    pub fn metrics(&self, plan: &FleetPlan) -> Metrics {
        let mut m = Metrics {
            unassigned: plan.unassigned.len(),
            ..Default::default()
        };

        for p in plan.trucks.iter().filter(|p| p.is_used()) {
            let km = p.distance.unwrap_or(0.0);
            let fuel = km * p.truck.fuel_per_km;

            m.trucks_used += 1;
            m.delivered += p.shipments.len();
            m.distance_km += km;
            m.cost += km * p.truck.cost_per_km;
            m.fuel_litres += fuel;
            m.co2_kg += fuel * CO2_PER_LITRE_DIESEL;
        }
        m.drive_hours = m.distance_km / self.speed_kmph;
        m
    }

    /// Plans again with `truck` added to the fleet; the fleet itself is left unchanged
    pub fn what_if(&self, truck: Truck) -> Result<(FleetPlan, Metrics)> {
        let mut extended = self.clone();
        extended.add_truck(truck)?;
        let plan = extended.plan();
        let metrics = extended.metrics(&plan);
        Ok((plan, metrics))
    }
}

fn write_metrics<W: Write>(out: &mut W, m: &Metrics) -> Result<()> {
    writeln!(out, "trucks used: {}", m.trucks_used)?;
    writeln!(out, "distance: {:.1} km ({:.1} h)", m.distance_km, m.drive_hours)?;
    writeln!(out, "cost: {:.2}", m.cost)?;
    writeln!(out, "fuel: {:.2} L, CO2: {:.2} kg", m.fuel_litres, m.co2_kg)?;
    writeln!(out, "delivered: {}, unassigned: {}", m.delivered, m.unassigned)?;
    Ok(())
}

impl Scenario for FreightNetwork {
    const NAME: &'static str = "freight";

    fn write_report<W: Write>(&mut self, out: &mut W) -> Result<()> {
        section(out, "Shipments")?;
        for s in &self.shipments {
            writeln!(
                out,
                "#{} [priority {}] {} t from {} to {}, ready {:.0}h",
                s.id, s.priority, s.weight, s.pickup, s.delivery, s.ready_hours
            )?;
        }

        let plan = self.plan();
        section(out, "Assignment and routes")?;
        for p in &plan.trucks {
            writeln!(
                out,
                "truck {} (depot {}, capacity {} t): shipments [{}], load {} t",
                p.truck.id,
                p.truck.depot,
                p.truck.capacity,
                p.shipments.iter().join(", "),
                p.load
            )?;
            writeln!(out, "  route {} ({} km)", format_path(&p.route), format_distance(p.distance))?;
        }
        if !plan.unassigned.is_empty() {
            writeln!(out, "unassigned: {}", plan.unassigned.iter().join(", "))?;
        }

        section(out, "Metrics")?;
        write_metrics(out, &self.metrics(&plan))?;

        if let Some(truck) = self.extra_truck {
            section(out, &format!("What-if: add truck {} ({} t at depot {})", truck.id, truck.capacity, truck.depot))?;
            let (plan, metrics) = self.what_if(truck)?;
            for p in &plan.trucks {
                writeln!(out, "truck {}: {} shipments, load {} t", p.truck.id, p.shipments.len(), p.load)?;
            }
            write_metrics(out, &metrics)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn sample_fleet_is_valid() {
        let sample = FreightNetwork::sample();
        let mut n = FreightNetwork::new(sample.highways().clone());
        for &s in sample.shipments() {
            n.add_shipment(s).unwrap();
        }
        for &t in sample.trucks() {
            n.add_truck(t).unwrap();
        }
        assert_eq!((n.shipments().len(), n.trucks().len()), (7, 3));
        assert!(n.add_truck(sample.trucks()[0]).is_err());
    }

    #[test]
    fn highway_distances() {
        let n = FreightNetwork::sample();
        let row = n.distances().row(0).iter().map(|d| d.unwrap()).collect_vec();
        assert_eq!(row, vec![0.0, 10.0, 15.0, 22.0, 29.0, 35.0, 40.0, 48.0]);
        assert_eq!(n.distances().get(3, 5), Some(27.0));
        assert_eq!(n.distances().get(2, 6), Some(28.0));
    }

    #[test]
    fn priority_assignment() {
        let n = FreightNetwork::sample();
        let plan = n.plan();

        let assigned = plan.trucks.iter().map(|p| (p.truck.id, p.shipments.clone(), p.load)).collect_vec();
        assert_eq!(
            assigned,
            vec![(1, vec![1, 3], 7.5), (2, vec![2, 6, 4], 6.0), (3, vec![5, 7], 5.5)]
        );
        assert!(plan.unassigned.is_empty());

        for p in &plan.trucks {
            assert_eq!(p.route.first(), Some(&p.truck.depot));
            assert_eq!(p.route.last(), Some(&p.truck.depot));
            assert!(p.load <= p.truck.capacity);
        }
        assert_eq!(plan.trucks[0].distance, Some(83.0));
    }

    #[test]
    fn fleet_metrics() {
        let n = FreightNetwork::sample();
        let m = n.metrics(&n.plan());

        assert_eq!(m.trucks_used, 3);
        assert_eq!(m.delivered, 7);
        assert_eq!(m.unassigned, 0);
        assert!(approx(m.distance_km, 240.0));
        assert!(approx(m.cost, 341.4));
        assert!(approx(m.fuel_litres, 57.85));
        assert!(approx(m.co2_kg, 57.85 * CO2_PER_LITRE_DIESEL));
        assert!(approx(m.drive_hours, 6.0));
    }

    #[test]
    fn what_if_extra_truck() {
        let n = FreightNetwork::sample();
        let (plan, metrics) = n.what_if(Truck::new(4, 0, 12.0, 1.6, 0.28)).unwrap();

        // the new truck ties with truck 2 for shipment 4 and loses
        assert!(!plan.trucks[3].is_used());
        assert_eq!(plan.trucks[3].route, vec![0]);
        assert_eq!(metrics.trucks_used, 3);
        assert_eq!(n.trucks().len(), 3);

        assert!(matches!(n.what_if(Truck::new(1, 0, 1.0, 1.0, 1.0)), Err(Error::Duplicate(_))));
    }

    #[test]
    fn capacity_limits() {
        let highways = AdjArrayUndir::from_edges(3, [(0, 1, 4.0), (1, 2, 6.0)]);
        let mut n = FreightNetwork::new(highways);
        n.add_truck(Truck::new(1, 0, 3.0, 1.0, 0.1)).unwrap();
        for (id, weight, priority) in [(1, 2.0, 1), (2, 2.0, 5), (3, 4.0, 9)] {
            n.add_shipment(Shipment {
                id,
                pickup: 1,
                delivery: 2,
                weight,
                priority,
                ready_hours: 0.0,
            })
            .unwrap();
        }

        let plan = n.plan();
        assert_eq!(plan.trucks[0].shipments, vec![2]);
        assert_eq!(plan.unassigned, vec![3, 1]);
        assert_eq!(plan.trucks[0].distance, Some(20.0));
    }

    #[test]
    fn invalid_records() {
        let mut n = FreightNetwork::sample();
        let mut s = n.shipments()[0];
        assert!(matches!(n.add_shipment(s), Err(Error::Duplicate(_))));
        s.id = 99;
        s.delivery = 8;
        assert!(matches!(n.add_shipment(s), Err(Error::NodeOutOfRange { node: 8, .. })));
        assert!(n.add_truck(Truck::new(9, 12, 1.0, 1.0, 1.0)).is_err());
    }

    #[test]
    fn report() {
        let mut out = Vec::new();
        FreightNetwork::sample().write_report(&mut out).unwrap();
        let report = String::from_utf8(out).unwrap();

        assert!(report.contains("truck 1 (depot 0, capacity 8 t): shipments [1, 3], load 7.5 t"));
        assert!(report.contains("distance: 240.0 km (6.0 h)"));
        assert!(report.contains("truck 4: 0 shipments, load 0 t"));
    }
}
