//! # Event Venue
//!
//! A public square with a daily event schedule, a register of advertisers and their budgets, an ad
//! rotation ordered by priority and crowd evacuation routes with the fewest street segments.

use std::io::Write;

use fxhash::FxHashMap;
use itertools::Itertools;
use tracing::info;

use super::*;
use crate::{algo::*, collections::PriorityQueue, prelude::*};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSlot {
    pub name: String,
    pub minutes: u32,
}

#[derive(Debug, Clone)]
pub struct Venue {
    events: Vec<EventSlot>,
    budgets: FxHashMap<String, u64>,
    ads: PriorityQueue<u32, String>,
    /// One-way walkways between gathering points
    walkways: AdjArray,
}

impl Venue {
    pub fn new(walkways: AdjArray) -> Self {
        Self {
            events: Vec::new(),
            budgets: FxHashMap::default(),
            ads: PriorityQueue::new(),
            walkways,
        }
    }

    /// Five events, four advertisers with one ad each and a walkway network towards exit `6`
    pub fn sample() -> Self {
        let walkways = AdjArray::from_edges(20, [(1, 2), (1, 3), (2, 4), (3, 4), (3, 5), (4, 6), (5, 6)]);
        let mut venue = Self::new(walkways);

        for (name, minutes) in [
            ("Music Concert", 120),
            ("Food Festival", 180),
            ("Street Show", 60),
            ("Tech Expo", 240),
            ("Art Exhibition", 90),
        ] {
            venue.add_event(name, minutes);
        }

        for (name, budget, priority) in [
            ("Coca-Cola", 500_000, 90),
            ("Nike", 350_000, 70),
            ("Dominos", 200_000, 85),
            ("RelianceDigital", 425_000, 95),
        ] {
            venue.budgets.insert(name.to_string(), budget);
            venue.ads.push(priority, name.to_string());
        }
        venue
    }

    pub fn add_event(&mut self, name: impl Into<String>, minutes: u32) {
        self.events.push(EventSlot {
            name: name.into(),
            minutes,
        });
    }

    pub fn events(&self) -> &[EventSlot] {
        &self.events
    }

    pub fn total_schedule_minutes(&self) -> u32 {
        self.events.iter().map(|e| e.minutes).sum()
    }

    pub fn register_advertiser(&mut self, name: &str, budget: u64) -> Result<()> {
        if self.budgets.contains_key(name) {
            return Err(Error::Duplicate(name.to_string()));
        }
        self.budgets.insert(name.to_string(), budget);
        Ok(())
    }

    pub fn budget_of(&self, name: &str) -> Result<u64> {
        self.budgets
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownItem(name.to_string()))
    }

    /// Registered advertisers with their budgets, ordered by name
    pub fn advertisers(&self) -> Vec<(&str, u64)> {
        self.budgets
            .iter()
            .map(|(name, &budget)| (name.as_str(), budget))
            .sorted()
            .collect()
    }

    /// Queues an ad of a registered advertiser
    pub fn schedule_ad(&mut self, advertiser: &str, priority: u32) -> Result<()> {
        self.budget_of(advertiser)?;
        self.ads.push(priority, advertiser.to_string());
        Ok(())
    }

    pub fn queued_ads(&self) -> usize {
        self.ads.len()
    }

    /// Empties the ad rotation, highest priority first
    pub fn display_order(&mut self) -> Vec<(String, u32)> {
        self.ads.drain_sorted().into_iter().map(|(p, name)| (name, p)).collect()
    }

    /// Walkway route from the crowd at `from` to `exit` passing the fewest gathering points
    pub fn evacuation_route(&self, from: Node, exit: Node) -> Result<Option<Vec<Node>>> {
        self.walkways.check_node(from)?;
        self.walkways.check_node(exit)?;

        let route = self.walkways.hop_path(from, exit);
        if let Some(route) = &route {
            info!(from, exit, segments = route.len() - 1, "evacuation route planned");
        }
        Ok(route)
    }
}

impl Scenario for Venue {
    const NAME: &'static str = "venue";

    fn write_report<W: Write>(&mut self, out: &mut W) -> Result<()> {
        section(out, "Event schedule")?;
        for e in &self.events {
            writeln!(out, "{} - {} min", e.name, e.minutes)?;
        }
        writeln!(out, "total: {} min", self.total_schedule_minutes())?;

        section(out, "Advertisers")?;
        for (name, budget) in self.advertisers() {
            writeln!(out, "{name}: {budget}")?;
        }

        section(out, "Ad display order")?;
        for (name, priority) in self.display_order() {
            writeln!(out, "{name} (priority {priority})")?;
        }

        section(out, "Evacuation route")?;
        match self.evacuation_route(1, 6)? {
            Some(route) => writeln!(out, "{}", format_path(&route))?,
            None => writeln!(out, "no route to the exit")?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    #[test]
    fn schedule_and_budgets() {
        let mut v = Venue::sample();
        assert_eq!(v.events().len(), 5);
        assert_eq!(v.total_schedule_minutes(), 690);

        assert_eq!(v.budget_of("Nike").unwrap(), 350_000);
        assert!(matches!(v.budget_of("Pepsi"), Err(Error::UnknownItem(_))));
        assert!(matches!(v.register_advertiser("Nike", 1), Err(Error::Duplicate(_))));
        assert_eq!(v.advertisers()[0], ("Coca-Cola", 500_000));

        assert!(v.schedule_ad("Pepsi", 99).is_err());
        assert_eq!(v.queued_ads(), 4);
    }

    #[test]
    fn sample_advertisers_are_valid() {
        let sample = Venue::sample();
        let mut v = Venue::new(AdjArray::new(1));
        for (name, budget) in sample.advertisers() {
            v.register_advertiser(name, budget).unwrap();
        }
        for (name, priority) in sample.clone().display_order() {
            v.schedule_ad(&name, priority).unwrap();
        }
        assert_eq!(v.advertisers(), sample.advertisers());
        assert_eq!(v.queued_ads(), sample.queued_ads());
    }

    #[test]
    fn ads_by_priority() {
        let mut v = Venue::sample();
        v.register_advertiser("Pepsi", 100_000).unwrap();
        v.schedule_ad("Pepsi", 90).unwrap();

        let order = v.display_order().into_iter().map(|(name, _)| name).collect_vec();
        assert_eq!(order, vec!["RelianceDigital", "Coca-Cola", "Pepsi", "Dominos", "Nike"]);
        assert_eq!(v.queued_ads(), 0);
    }

    #[test]
    fn evacuation() {
        let v = Venue::sample();
        assert_eq!(v.evacuation_route(1, 6).unwrap(), Some(vec![1, 2, 4, 6]));
        assert_eq!(v.evacuation_route(5, 6).unwrap(), Some(vec![5, 6]));
        assert_eq!(v.evacuation_route(6, 1).unwrap(), None);
        assert!(v.evacuation_route(1, 20).is_err());
    }

    #[test]
    fn report() {
        let mut out = Vec::new();
        Venue::sample().write_report(&mut out).unwrap();
        let report = String::from_utf8(out).unwrap();

        assert!(report.contains("total: 690 min"));
        assert!(report.contains("RelianceDigital (priority 95)\nCoca-Cola (priority 90)"));
        assert!(report.contains("1 2 4 6"));
    }
}
