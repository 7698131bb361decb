//! # Emergency Alerts
//!
//! Reports are scanned for emergency keywords (each with a severity), the reachability of the safe
//! zone and the fastest evacuation time are computed on two small networks, and all resulting alerts
//! are emitted highest severity first.

use std::io::Write;

use fxhash::FxHashMap;
use tracing::{info, warn};

use super::*;
use crate::{algo::*, collections::PriorityQueue, prelude::*, text::SignatureScanner};

/// Severity of the alert raised when the safe zone is reachable
pub const SAFE_ZONE_SEVERITY: u8 = 6;
/// Severity of the evacuation time alert
pub const EVACUATION_SEVERITY: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub severity: u8,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct AlertCenter {
    levels: FxHashMap<String, u8>,
    scanner: SignatureScanner,
    /// Directed corridors towards the safe zone
    safe_routes: AdjArray,
    /// Directed evacuation routes weighted by minutes
    evacuation: AdjArray<u32>,
    alerts: PriorityQueue<u8, Alert>,
}

impl AlertCenter {
    pub fn new(safe_routes: AdjArray, evacuation: AdjArray<u32>) -> Self {
        Self {
            levels: FxHashMap::default(),
            scanner: SignatureScanner::new(),
            safe_routes,
            evacuation,
            alerts: PriorityQueue::new(),
        }
    }

    /// Five emergency keywords and two four-node chains ending in the safe zone / exit `3`
    pub fn sample() -> Self {
        let safe_routes = AdjArray::from_edges(4, [(0, 1), (1, 2), (2, 3)]);
        let evacuation = AdjArray::from_edges(4, [(0, 1, 4), (1, 2, 3), (2, 3, 2)]);

        let mut center = Self::new(safe_routes, evacuation);
        for (keyword, severity) in [("FIRE", 10), ("EARTHQUAKE", 9), ("FLOOD", 8), ("MEDICAL", 7), ("ACCIDENT", 6)] {
            center.set_level(keyword, severity);
        }
        center
    }

    /// Registers a keyword or changes its severity
    pub fn set_level(&mut self, keyword: &str, severity: u8) {
        if self.levels.insert(keyword.to_string(), severity).is_none() {
            self.scanner.add_signature(keyword, keyword);
        }
    }

    pub fn severity_of(&self, keyword: &str) -> Result<u8> {
        self.levels
            .get(keyword)
            .copied()
            .ok_or_else(|| Error::UnknownItem(keyword.to_string()))
    }

    /// Queues an alert
    pub fn raise(&mut self, severity: u8, message: impl Into<String>) {
        let message = message.into();
        info!(severity, message = %message, "alert raised");
        self.alerts.push(severity, Alert { severity, message });
    }

    /// Raises an alert for every known keyword contained in `report`; returns the keywords found
    pub fn detect(&mut self, report: &str) -> Vec<String> {
        let found: Vec<(String, u8)> = self
            .scanner
            .detected(report)
            .into_iter()
            .filter_map(|k| Some((k.to_string(), *self.levels.get(k)?)))
            .collect();

        for (keyword, severity) in &found {
            self.raise(*severity, format!("Emergency detected: {keyword}"));
        }
        found.into_iter().map(|(k, _)| k).collect()
    }

    /// Checks whether the safe zone can be reached from `from`; raises an alert if so
    pub fn check_safe_zone(&mut self, from: Node, zone: Node) -> Result<bool> {
        self.safe_routes.check_node(from)?;
        self.safe_routes.check_node(zone)?;

        let reachable = self.safe_routes.is_reachable(from, zone);
        if reachable {
            self.raise(SAFE_ZONE_SEVERITY, format!("Safe zone {zone} reachable from {from}"));
        } else {
            warn!(from, zone, "safe zone unreachable");
        }
        Ok(reachable)
    }

    /// Fastest evacuation time from `from` to `exit`; raises an alert if the exit is reachable
    pub fn evacuation_time(&mut self, from: Node, exit: Node) -> Result<Option<u32>> {
        self.evacuation.check_node(from)?;
        self.evacuation.check_node(exit)?;

        let minutes = self.evacuation.dijkstra(from).distance_to(exit);
        match minutes {
            Some(m) => self.raise(EVACUATION_SEVERITY, format!("Fastest evacuation time to exit: {m}")),
            None => warn!(from, exit, "exit unreachable"),
        }
        Ok(minutes)
    }

    pub fn pending(&self) -> usize {
        self.alerts.len()
    }

    /// Removes all queued alerts, highest severity first (raise order among equals)
    pub fn drain(&mut self) -> Vec<Alert> {
        self.alerts.drain_sorted().into_iter().map(|(_, a)| a).collect()
    }
}

impl Scenario for AlertCenter {
    const NAME: &'static str = "alerts";

    fn write_report<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let report = "Smoke detected! Possible FIRE in Block A.";
        section(out, "Keyword scan")?;
        let found = self.detect(report);
        if found.is_empty() {
            writeln!(out, "no emergency keyword found")?;
        }
        for keyword in found {
            writeln!(out, "{keyword} (severity {})", self.severity_of(&keyword)?)?;
        }

        section(out, "Routes")?;
        let safe = self.check_safe_zone(0, 3)?;
        writeln!(out, "safe zone reachable: {}", if safe { "yes" } else { "no" })?;
        let minutes = self.evacuation_time(0, 3)?;
        writeln!(out, "evacuation time: {}", format_distance(minutes))?;

        section(out, "Alerts (high to low severity)")?;
        for a in self.drain() {
            writeln!(out, "severity {} | {}", a.severity, a.message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    #[test]
    fn keyword_detection() {
        let mut c = AlertCenter::sample();
        assert_eq!(c.detect("Smoke detected! Possible FIRE in Block A."), vec!["FIRE"]);
        assert_eq!(c.detect("FLOOD after EARTHQUAKE"), vec!["EARTHQUAKE", "FLOOD"]);
        assert!(c.detect("all quiet, fire drill at noon").is_empty());
        assert_eq!(c.pending(), 3);

        assert_eq!(c.severity_of("MEDICAL").unwrap(), 7);
        assert!(matches!(c.severity_of("TSUNAMI"), Err(Error::UnknownItem(_))));
    }

    #[test]
    fn routes() {
        let mut c = AlertCenter::sample();
        assert!(c.check_safe_zone(0, 3).unwrap());
        assert!(!c.check_safe_zone(3, 0).unwrap());
        assert_eq!(c.evacuation_time(0, 3).unwrap(), Some(9));
        assert_eq!(c.evacuation_time(2, 0).unwrap(), None);
        assert!(c.evacuation_time(0, 4).is_err());
        assert_eq!(c.pending(), 2);
    }

    #[test]
    fn drained_by_severity() {
        let mut c = AlertCenter::sample();
        c.raise(5, "first five");
        c.detect("FIRE");
        c.check_safe_zone(0, 3).unwrap();
        c.raise(5, "second five");

        let order = c.drain().into_iter().map(|a| a.severity).collect_vec();
        assert_eq!(order, vec![10, 6, 5, 5]);
        assert_eq!(c.pending(), 0);
    }

    #[test]
    fn changed_level() {
        let mut c = AlertCenter::sample();
        c.set_level("FIRE", 3);
        c.detect("FIRE");
        assert_eq!(c.drain()[0].severity, 3);
    }

    #[test]
    fn report() {
        let mut out = Vec::new();
        AlertCenter::sample().write_report(&mut out).unwrap();
        let report = String::from_utf8(out).unwrap();

        let fire = report.find("severity 10 | Emergency detected: FIRE").unwrap();
        let safe = report.find("severity 6 | Safe zone 3 reachable from 0").unwrap();
        let evac = report.find("severity 5 | Fastest evacuation time to exit: 9").unwrap();
        assert!(fire < safe && safe < evac);
    }
}
