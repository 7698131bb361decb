//! # Threat Detection
//!
//! Counts failed logins per source address, scans log lines for known malware signatures with KMP,
//! ranks the most suspicious sources with a heap and checks whether an attacker on one host can
//! move laterally to another host of a directed network.

use std::io::Write;

use fxhash::FxHashMap;
use itertools::Itertools;
use tracing::{info, warn};

use super::*;
use crate::{
    algo::*,
    collections::PriorityQueue,
    prelude::*,
    text::{SignatureMatch, SignatureScanner},
};

#[derive(Debug, Clone)]
pub struct SecurityMonitor {
    failed: FxHashMap<String, u32>,
    successful: u32,
    scanner: SignatureScanner,
    network: AdjArray,
    brute_force_threshold: u32,
}

impl SecurityMonitor {
    pub fn new(network: AdjArray) -> Self {
        Self {
            failed: FxHashMap::default(),
            successful: 0,
            scanner: SignatureScanner::new(),
            network,
            brute_force_threshold: 2,
        }
    }

    /// Five login attempts, one malware signature and a four host network where host `3` is only
    /// reachable through host `2`
    pub fn sample() -> Self {
        let network = AdjArray::from_edges(4, [(0, 1), (1, 0), (1, 2), (2, 1), (2, 3)]);
        let mut monitor = Self::new(network);
        monitor.add_signature("trojan", "malware.exe");

        for (ip, success) in [
            ("192.168.1.5", false),
            ("192.168.1.5", false),
            ("10.0.0.2", false),
            ("10.0.0.2", true),
            ("172.16.0.9", false),
        ] {
            monitor.record_login(ip, success);
        }
        monitor
    }

    /// Failed attempts from one source at which it is reported as brute-forcing (default `2`)
    pub fn brute_force_threshold(mut self, attempts: u32) -> Self {
        self.brute_force_threshold = attempts;
        self
    }

    pub fn record_login(&mut self, ip: &str, success: bool) {
        if success {
            self.successful += 1;
            return;
        }

        let attempts = self.failed.entry(ip.to_string()).or_default();
        *attempts += 1;
        if *attempts == self.brute_force_threshold {
            warn!(ip, attempts = *attempts, "possible brute force");
        }
    }

    pub fn failed_attempts(&self, ip: &str) -> u32 {
        self.failed.get(ip).copied().unwrap_or(0)
    }

    pub fn successful_logins(&self) -> u32 {
        self.successful
    }

    /// The `k` sources with the most failed logins (smaller address first on ties)
    pub fn suspicious_sources(&self, k: usize) -> Vec<(&str, u32)> {
        let heap: PriorityQueue<u32, &str> = self
            .failed
            .iter()
            .sorted_by(|a, b| a.0.cmp(b.0))
            .map(|(ip, &n)| (n, ip.as_str()))
            .collect();

        heap.peek_top(k).into_iter().map(|(&n, &ip)| (ip, n)).collect()
    }

    /// Sources whose failed logins reached the brute force threshold
    pub fn brute_force_suspects(&self) -> Vec<&str> {
        self.failed
            .iter()
            .filter(|&(_, &n)| n >= self.brute_force_threshold)
            .map(|(ip, _)| ip.as_str())
            .sorted()
            .collect()
    }

    pub fn add_signature(&mut self, name: impl Into<String>, pattern: &str) {
        self.scanner.add_signature(name, pattern);
    }

    /// Names of all signatures found in a log line
    pub fn scan<'a>(&'a self, log: &str) -> Vec<&'a str> {
        let found = self.scanner.detected(log);
        if !found.is_empty() {
            warn!(signatures = ?found, "malware signature detected");
        }
        found
    }

    /// All signature occurrences in a log line
    pub fn scan_positions(&self, log: &str) -> Vec<SignatureMatch<'_>> {
        self.scanner.scan(log)
    }

    /// Returns *true* if an attacker on `from` can reach `to`
    pub fn can_reach(&self, from: Node, to: Node) -> Result<bool> {
        self.network.check_node(from)?;
        self.network.check_node(to)?;
        Ok(self.network.is_reachable(from, to))
    }

    /// Path with the fewest hops an attacker on `from` would take to `to`
    pub fn lateral_movement(&self, from: Node, to: Node) -> Result<Option<Vec<Node>>> {
        self.network.check_node(from)?;
        self.network.check_node(to)?;

        let path = self.network.hop_path(from, to);
        if let Some(path) = &path {
            info!(from, to, hops = path.len() - 1, "lateral movement possible");
        }
        Ok(path)
    }
}

impl Scenario for SecurityMonitor {
    const NAME: &'static str = "security";

    fn write_report<W: Write>(&mut self, out: &mut W) -> Result<()> {
        section(out, "Failed logins")?;
        for (ip, n) in self.failed.iter().sorted() {
            writeln!(out, "{ip}: {n}")?;
        }
        writeln!(out, "successful logins: {}", self.successful)?;

        let log = "User downloaded malware.exe from suspicious site";
        section(out, "Malware scan")?;
        let found = self.scan(log);
        if found.is_empty() {
            writeln!(out, "no signature detected")?;
        }
        for m in self.scan_positions(log) {
            writeln!(out, "signature {} detected at {}", m.name, m.positions.iter().join(", "))?;
        }

        section(out, "Suspicious sources")?;
        for (ip, n) in self.suspicious_sources(3) {
            writeln!(out, "{ip} ({n} failed attempts)")?;
        }
        writeln!(out, "brute force suspects: {}", self.brute_force_suspects().join(", "))?;

        section(out, "Lateral movement")?;
        match self.lateral_movement(0, 3)? {
            Some(path) => writeln!(out, "0 -> 3 possible via {}", format_path(&path))?,
            None => writeln!(out, "0 -> 3 not possible")?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_tracking() {
        let mut m = SecurityMonitor::sample();
        assert_eq!(m.failed_attempts("192.168.1.5"), 2);
        assert_eq!(m.failed_attempts("10.0.0.2"), 1);
        assert_eq!(m.failed_attempts("8.8.8.8"), 0);
        assert_eq!(m.successful_logins(), 1);

        assert_eq!(
            m.suspicious_sources(2),
            vec![("192.168.1.5", 2), ("10.0.0.2", 1)]
        );
        assert_eq!(m.brute_force_suspects(), vec!["192.168.1.5"]);

        m.record_login("172.16.0.9", false);
        assert_eq!(m.brute_force_suspects(), vec!["172.16.0.9", "192.168.1.5"]);
    }

    #[test]
    fn custom_threshold() {
        let m = SecurityMonitor::sample().brute_force_threshold(1);
        assert_eq!(m.brute_force_suspects().len(), 3);
    }

    #[test]
    fn signatures() {
        let mut m = SecurityMonitor::sample();
        m.add_signature("miner", "xmrig");

        assert_eq!(m.scan("User downloaded malware.exe from suspicious site"), vec!["trojan"]);
        assert!(m.scan("routine backup finished").is_empty());

        let hits = m.scan_positions("xmrig started; malware.exe spawned xmrig");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].name, "trojan");
        assert_eq!(hits[1].positions, vec![0, 35]);
    }

    #[test]
    fn lateral_movement() {
        let m = SecurityMonitor::sample();
        assert_eq!(m.lateral_movement(0, 3).unwrap(), Some(vec![0, 1, 2, 3]));
        assert_eq!(m.lateral_movement(3, 0).unwrap(), None);
        assert!(m.can_reach(1, 3).unwrap());
        assert!(!m.can_reach(3, 2).unwrap());
        assert!(matches!(m.can_reach(0, 4), Err(Error::NodeOutOfRange { node: 4, n: 4 })));
    }

    #[test]
    fn report() {
        let mut out = Vec::new();
        SecurityMonitor::sample().write_report(&mut out).unwrap();
        let report = String::from_utf8(out).unwrap();

        assert!(report.contains("signature trojan detected at 16"));
        assert!(report.contains("192.168.1.5 (2 failed attempts)"));
        assert!(report.contains("0 -> 3 possible via 0 1 2 3"));
    }
}
