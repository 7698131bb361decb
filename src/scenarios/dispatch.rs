//! # Hospital Dispatch
//!
//! Patients are triaged by severity (critical first, arrival order among equals). Ambulances are
//! placed on a directed road network; an incident is served by the *available* ambulance with the
//! shortest driving distance. Bed, ICU, ventilator and blood stock complete the picture.

use std::{collections::BTreeMap, fmt, io::Write};

use tracing::{info, warn};

use super::*;
use crate::{algo::*, collections::PriorityQueue, prelude::*};

/// Triage level of a patient
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Normal = 1,
    Urgent = 2,
    Critical = 3,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patient {
    pub name: String,
    pub condition: String,
    pub severity: Severity,
}

impl Patient {
    pub fn new(name: impl Into<String>, condition: impl Into<String>, severity: Severity) -> Self {
        Self {
            name: name.into(),
            condition: condition.into(),
            severity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ambulance {
    pub id: String,
    /// Current position on the road network
    pub location: Node,
    pub available: bool,
}

/// Outcome of a successful dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub ambulance: String,
    pub distance: u32,
    /// Route from the ambulance to the incident, both included
    pub route: Vec<Node>,
}

/// Hospital capacity and blood bank
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resources {
    pub beds: u32,
    pub icu_beds: u32,
    pub ventilators: u32,
    /// Units per blood group
    pub blood: BTreeMap<String, u32>,
}

#[derive(Debug, Clone)]
pub struct Hospital {
    roads: AdjArray<u32>,
    ambulances: Vec<Ambulance>,
    triage: PriorityQueue<Severity, Patient>,
    resources: Resources,
}

impl Hospital {
    /// Creates a hospital without ambulances or patients on the given road network
    pub fn new(roads: AdjArray<u32>, resources: Resources) -> Self {
        Self {
            roads,
            ambulances: Vec::new(),
            triage: PriorityQueue::new(),
            resources,
        }
    }

    /// Six junctions, three ambulances (one out of service) and three waiting patients
    pub fn sample() -> Self {
        let roads = AdjArray::from_edges(
            6,
            [(0, 1, 7), (1, 2, 5), (1, 3, 3), (2, 4, 4), (3, 4, 6), (4, 5, 2)],
        );
        let resources = Resources {
            beds: 50,
            icu_beds: 10,
            ventilators: 7,
            blood: [("A+", 5), ("A-", 4), ("B+", 3), ("O+", 8), ("O-", 2)]
                .into_iter()
                .map(|(g, u)| (g.to_string(), u))
                .collect(),
        };

        let mut hospital = Self::new(roads, resources);
        hospital.ambulances = [("AMB1", 0, true), ("AMB2", 3, true), ("AMB3", 5, false)]
            .into_iter()
            .map(|(id, location, available)| Ambulance {
                id: id.to_string(),
                location,
                available,
            })
            .collect();

        hospital.admit(Patient::new("Rahul", "Heart Attack", Severity::Critical));
        hospital.admit(Patient::new("Asha", "Accident Injury", Severity::Urgent));
        hospital.admit(Patient::new("John", "Fever", Severity::Normal));
        hospital
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn ambulances(&self) -> &[Ambulance] {
        &self.ambulances
    }

    /// Adds an ambulance to the fleet
    pub fn add_ambulance(&mut self, id: impl Into<String>, location: Node, available: bool) -> Result<()> {
        let id = id.into();
        self.roads.check_node(location)?;
        if self.ambulances.iter().any(|a| a.id == id) {
            return Err(Error::Duplicate(id));
        }
        self.ambulances.push(Ambulance {
            id,
            location,
            available,
        });
        Ok(())
    }

    /// Puts a patient into the triage queue
    pub fn admit(&mut self, patient: Patient) {
        self.triage.push(patient.severity, patient);
    }

    pub fn waiting_patients(&self) -> usize {
        self.triage.len()
    }

    /// Removes and returns the most severe patient that waited longest
    pub fn next_patient(&mut self) -> Option<Patient> {
        self.triage.pop().map(|(_, p)| p)
    }

    /// Empties the triage queue in treatment order
    pub fn triage_order(&mut self) -> Vec<Patient> {
        self.triage.drain_sorted().into_iter().map(|(_, p)| p).collect()
    }

    /// The available ambulance closest to `incident` (first in the fleet on ties) without
    /// dispatching it. Returns `Ok(None)` if no available ambulance can reach the incident.
    pub fn nearest_available(&self, incident: Node) -> Result<Option<Assignment>> {
        self.roads.check_node(incident)?;

        let mut best: Option<Assignment> = None;
        for amb in self.ambulances.iter().filter(|a| a.available) {
            let Some((distance, route)) = self.roads.shortest_route(amb.location, incident) else {
                continue;
            };
            if best.as_ref().is_none_or(|b| distance < b.distance) {
                best = Some(Assignment {
                    ambulance: amb.id.clone(),
                    distance,
                    route,
                });
            }
        }
        Ok(best)
    }

    /// Sends the nearest available ambulance to `incident` and marks it as busy
    pub fn dispatch(&mut self, incident: Node) -> Result<Option<Assignment>> {
        let Some(assignment) = self.nearest_available(incident)? else {
            warn!(incident, "no ambulance available");
            return Ok(None);
        };

        if let Some(amb) = self.ambulances.iter_mut().find(|a| a.id == assignment.ambulance) {
            amb.available = false;
        }
        info!(
            ambulance = %assignment.ambulance,
            incident,
            distance = assignment.distance,
            "ambulance dispatched"
        );
        Ok(Some(assignment))
    }

    /// Marks an ambulance as available again at `location`
    pub fn release(&mut self, id: &str, location: Node) -> Result<()> {
        self.roads.check_node(location)?;
        let amb = self
            .ambulances
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| Error::UnknownVehicle(id.to_string()))?;
        amb.location = location;
        amb.available = true;
        Ok(())
    }

    /// Units of a blood group in stock (`0` for unknown groups)
    pub fn blood_available(&self, group: &str) -> u32 {
        self.resources.blood.get(group).copied().unwrap_or(0)
    }

    /// Takes `units` of a blood group out of stock
    pub fn reserve_blood(&mut self, group: &str, units: u32) -> Result<()> {
        let stock = self
            .resources
            .blood
            .get_mut(group)
            .ok_or_else(|| Error::UnknownItem(group.to_string()))?;

        if *stock < units {
            warn!(group, requested = units, available = *stock, "blood stock too low");
            return Err(Error::InsufficientStock {
                item: group.to_string(),
                requested: units,
                available: *stock,
            });
        }
        *stock -= units;
        Ok(())
    }
}

impl Scenario for Hospital {
    const NAME: &'static str = "dispatch";

    fn write_report<W: Write>(&mut self, out: &mut W) -> Result<()> {
        section(out, "Patient triage")?;
        for p in self.triage_order() {
            writeln!(out, "{} | {} | severity {}", p.name, p.condition, p.severity)?;
        }

        let incident = 4;
        section(out, "Nearest ambulance")?;
        match self.dispatch(incident)? {
            Some(a) => writeln!(
                out,
                "{} -> incident at {incident}: distance {} via {}",
                a.ambulance,
                a.distance,
                format_path(&a.route)
            )?,
            None => writeln!(out, "no ambulance available")?,
        }

        section(out, "Resources")?;
        let r = &self.resources;
        writeln!(out, "beds {} | icu {} | ventilators {}", r.beds, r.icu_beds, r.ventilators)?;
        for (group, units) in &r.blood {
            writeln!(out, "{group}: {units}")?;
        }

        let needed = "O+";
        section(out, "Blood match")?;
        let verdict = if self.blood_available(needed) > 0 { "available" } else { "not available" };
        writeln!(out, "{needed}: {verdict}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    #[test]
    fn sample_fleet_is_valid() {
        let sample = Hospital::sample();
        let mut h = Hospital::new(sample.roads.clone(), sample.resources.clone());
        for a in sample.ambulances() {
            h.add_ambulance(a.id.clone(), a.location, a.available).unwrap();
        }
        assert_eq!(h.ambulances(), sample.ambulances());
        assert!(matches!(h.add_ambulance("AMB1", 1, true), Err(Error::Duplicate(_))));
        assert!(matches!(h.add_ambulance("AMB4", 6, true), Err(Error::NodeOutOfRange { .. })));
    }

    #[test]
    fn triage_by_severity_then_arrival() {
        let mut h = Hospital::sample();
        h.admit(Patient::new("Mia", "Stroke", Severity::Critical));
        h.admit(Patient::new("Leo", "Cut", Severity::Normal));

        let order = h.triage_order().into_iter().map(|p| p.name).collect_vec();
        assert_eq!(order, vec!["Rahul", "Mia", "Asha", "John", "Leo"]);
        assert_eq!(h.next_patient(), None);
    }

    #[test]
    fn dispatch_nearest_available() {
        let mut h = Hospital::sample();

        let first = h.dispatch(4).unwrap().unwrap();
        assert_eq!(first.ambulance, "AMB2");
        assert_eq!(first.distance, 6);
        assert_eq!(first.route, vec![3, 4]);

        let second = h.dispatch(4).unwrap().unwrap();
        assert_eq!(second.ambulance, "AMB1");
        assert_eq!(second.distance, 16);

        // AMB3 is out of service
        assert_eq!(h.dispatch(4).unwrap(), None);

        h.release("AMB2", 4).unwrap();
        assert_eq!(h.nearest_available(5).unwrap().unwrap().distance, 2);
        assert!(matches!(h.release("AMB9", 0), Err(Error::UnknownVehicle(_))));
    }

    #[test]
    fn invalid_nodes() {
        let mut h = Hospital::sample();
        assert!(matches!(h.dispatch(6), Err(Error::NodeOutOfRange { node: 6, n: 6 })));
        assert!(h.add_ambulance("AMB4", 9, true).is_err());
        assert!(matches!(h.add_ambulance("AMB1", 0, true), Err(Error::Duplicate(_))));
    }

    #[test]
    fn blood_bank() {
        let mut h = Hospital::sample();
        assert_eq!(h.blood_available("O+"), 8);
        assert_eq!(h.blood_available("AB-"), 0);

        h.reserve_blood("O+", 5).unwrap();
        assert_eq!(h.blood_available("O+"), 3);
        assert!(matches!(
            h.reserve_blood("O+", 4),
            Err(Error::InsufficientStock { requested: 4, available: 3, .. })
        ));
        assert!(matches!(h.reserve_blood("AB-", 1), Err(Error::UnknownItem(_))));
    }

    #[test]
    fn report() {
        let mut out = Vec::new();
        Hospital::sample().write_report(&mut out).unwrap();
        let report = String::from_utf8(out).unwrap();

        assert!(report.contains("Rahul | Heart Attack | severity 3"));
        assert!(report.contains("AMB2 -> incident at 4: distance 6 via 3 4"));
        assert!(report.contains("O+: available"));
    }
}
