//! # Smart City
//!
//! City zones with water, energy, waste and pollution figures. Water usage over a range of zones is
//! answered by a segment tree, emergency travel times and the order in which a flood spreads come
//! from a chain of roads between consecutive zones. Pollution readings are indexed in an AVL tree and
//! zones that share infrastructure are merged into districts with union-find.

use std::io::Write;

use fxhash::FxHashMap;
use itertools::Itertools;
use tracing::{debug, info};

use super::*;
use crate::{
    algo::*,
    collections::{AvlMap, SegmentTree, UnionFind},
    prelude::*,
    sorting::merge_sort_by,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    pub id: Node,
    pub name: String,
    /// Litres per day
    pub water: u64,
    /// kWh per day
    pub energy: u32,
    /// Waste level in percent of collection capacity
    pub waste: u32,
    /// Air quality index
    pub pollution: u32,
}

#[derive(Debug, Clone)]
pub struct City {
    zones: Vec<Zone>,
    index: FxHashMap<String, Node>,
    water: SegmentTree<u64>,
    roads: AdjArrayUndir<u32>,
    /// Pollution value -> number of readings
    pollution: AvlMap<u32, u32>,
    districts: UnionFind,
}

impl City {
    /// Creates a city whose consecutive zones are connected by roads of `road_minutes`.
    /// Zone ids are reassigned to their position.
    pub fn new(mut zones: Vec<Zone>, road_minutes: u32) -> Self {
        for (i, z) in zones.iter_mut().enumerate() {
            z.id = i as Node;
        }

        let n = zones.len() as NumNodes;
        let roads = AdjArrayUndir::from_edges(n, (1..n).map(|v| (v - 1, v, road_minutes)));
        let water = SegmentTree::from_slice(&zones.iter().map(|z| z.water).collect_vec());
        let index = zones.iter().map(|z| (z.name.clone(), z.id)).collect();

        let mut city = Self {
            water,
            roads,
            index,
            pollution: AvlMap::new(),
            districts: UnionFind::new(zones.len()),
            zones,
        };
        for p in city.zones.iter().map(|z| z.pollution).collect_vec() {
            city.record_pollution(p);
        }
        city
    }

    /// Five zones along one main road, five minutes apart
    pub fn sample() -> Self {
        let zones = [
            ("Central", 1200, 540, 30, 72),
            ("North", 800, 320, 18, 45),
            ("East", 950, 610, 25, 88),
            ("South", 700, 280, 15, 39),
            ("West", 1100, 450, 22, 61),
        ]
        .into_iter()
        .map(|(name, water, energy, waste, pollution)| Zone {
            id: 0,
            name: name.to_string(),
            water,
            energy,
            waste,
            pollution,
        })
        .collect();

        Self::new(zones, 5)
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn zone(&self, id: Node) -> Result<&Zone> {
        let id = self.roads.check_node(id)?;
        Ok(&self.zones[id as usize])
    }

    pub fn zone_id(&self, name: &str) -> Result<Node> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownItem(name.to_string()))
    }

    /// Total water usage of the zones `first..=last`
    pub fn water_usage(&self, first: Node, last: Node) -> Result<u64> {
        let (l, r) = (first as usize, last as usize);
        if l > r || r >= self.zones.len() {
            return Err(Error::InvalidRange {
                start: l,
                end: r + 1,
                len: self.zones.len(),
            });
        }
        Ok(self.water.query(l..=r))
    }

    /// Updates the water usage of a zone
    pub fn set_water(&mut self, id: Node, litres: u64) -> Result<()> {
        let id = self.roads.check_node(id)?;
        self.zones[id as usize].water = litres;
        self.water.update(id as usize, litres);
        debug!(zone = id, litres, "water usage updated");
        Ok(())
    }

    /// Travel times from `source` to every zone
    pub fn emergency_distances(&self, source: Node) -> Result<Vec<Option<u32>>> {
        self.roads.check_node(source)?;
        Ok(self.roads.dijkstra(source).distances().to_vec())
    }

    /// Zones grouped by the number of roads a flood starting in `source` needs to reach them
    pub fn flood_order(&self, source: Node) -> Result<Vec<Vec<Node>>> {
        self.roads.check_node(source)?;
        Ok(self.roads.bfs_layers(source))
    }

    /// Zones by descending energy use (stable among equals)
    pub fn zones_by_energy(&self) -> Vec<&Zone> {
        let mut zones = self.zones.iter().collect_vec();
        merge_sort_by(&mut zones, |a, b| b.energy.cmp(&a.energy));
        zones
    }

    pub fn record_pollution(&mut self, value: u32) {
        match self.pollution.get_mut(&value) {
            Some(count) => *count += 1,
            None => {
                self.pollution.insert(value, 1);
            }
        }
    }

    /// Distinct pollution readings in ascending order with their number of occurrences
    pub fn pollution_index(&self) -> Vec<(u32, u32)> {
        self.pollution.iter().map(|(&v, &c)| (v, c)).collect()
    }

    /// Lowest and highest pollution reading
    pub fn pollution_extremes(&self) -> Option<(u32, u32)> {
        Some((*self.pollution.first()?.0, *self.pollution.last()?.0))
    }

    /// Merges the districts of two zones and returns the representative zone of the merged district
    pub fn connect(&mut self, a: Node, b: Node) -> Result<Node> {
        self.roads.check_node(a)?;
        self.roads.check_node(b)?;
        if self.districts.union(a as usize, b as usize) {
            info!(a, b, "zones connected");
        }
        Ok(self.districts.find(a as usize) as Node)
    }

    pub fn connected(&mut self, a: Node, b: Node) -> Result<bool> {
        self.roads.check_node(a)?;
        self.roads.check_node(b)?;
        Ok(self.districts.same_set(a as usize, b as usize))
    }

    pub fn number_of_districts(&self) -> usize {
        self.districts.number_of_sets()
    }
}

impl Scenario for City {
    const NAME: &'static str = "city";

    fn write_report<W: Write>(&mut self, out: &mut W) -> Result<()> {
        section(out, "Zones")?;
        for z in &self.zones {
            writeln!(
                out,
                "{} {} | water {} L | energy {} kWh | waste {}% | pollution {}",
                z.id, z.name, z.water, z.energy, z.waste, z.pollution
            )?;
        }

        section(out, "Water usage")?;
        writeln!(out, "zones 1-3: {} L", self.water_usage(1, 3)?)?;
        self.set_water(2, 500)?;
        writeln!(out, "zones 1-3 after East saves water: {} L", self.water_usage(1, 3)?)?;

        let source = self.zone_id("Central")?;
        section(out, "Emergency distances from Central")?;
        for (z, d) in self.zones.iter().zip(self.emergency_distances(source)?) {
            writeln!(out, "{}: {}", z.name, format_distance(d))?;
        }

        section(out, "Flood spread from East")?;
        for (wave, zones) in self.flood_order(self.zone_id("East")?)?.iter().enumerate() {
            writeln!(out, "wave {wave}: {}", format_path(zones))?;
        }

        section(out, "Energy ranking")?;
        for z in self.zones_by_energy() {
            writeln!(out, "{} {} kWh", z.name, z.energy)?;
        }

        section(out, "Pollution index")?;
        self.record_pollution(61);
        for (value, count) in self.pollution_index() {
            writeln!(out, "{value} x{count}")?;
        }

        section(out, "Districts")?;
        for (a, b) in [(0, 1), (3, 4), (1, 4)] {
            let root = self.connect(a, b)?;
            writeln!(out, "connect {a} {b}: representative {root}")?;
        }
        writeln!(out, "{} districts", self.number_of_districts())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    #[test]
    fn water_ranges() {
        let mut city = City::sample();
        assert_eq!(city.water_usage(1, 3).unwrap(), 2450);
        assert_eq!(city.water_usage(0, 4).unwrap(), 4750);
        assert_eq!(city.water_usage(2, 2).unwrap(), 950);

        city.set_water(2, 500).unwrap();
        assert_eq!(city.water_usage(1, 3).unwrap(), 2000);
        assert_eq!(city.zone(2).unwrap().water, 500);

        assert!(matches!(city.water_usage(3, 1), Err(Error::InvalidRange { .. })));
        assert!(matches!(city.water_usage(0, 5), Err(Error::InvalidRange { end: 6, len: 5, .. })));
        assert!(city.set_water(5, 1).is_err());
    }

    #[test]
    fn roads() {
        let city = City::sample();
        assert_eq!(
            city.emergency_distances(0).unwrap(),
            vec![Some(0), Some(5), Some(10), Some(15), Some(20)]
        );
        assert_eq!(city.flood_order(2).unwrap(), vec![vec![2], vec![1, 3], vec![0, 4]]);
        assert!(city.flood_order(7).is_err());
    }

    #[test]
    fn lookups_and_ranking() {
        let city = City::sample();
        assert_eq!(city.zone_id("South").unwrap(), 3);
        assert!(matches!(city.zone_id("Harbour"), Err(Error::UnknownItem(_))));

        let ranking = city.zones_by_energy().into_iter().map(|z| z.name.as_str()).collect_vec();
        assert_eq!(ranking, vec!["East", "Central", "West", "North", "South"]);
    }

    #[test]
    fn pollution() {
        let mut city = City::sample();
        city.record_pollution(61);
        city.record_pollution(12);

        assert_eq!(
            city.pollution_index(),
            vec![(12, 1), (39, 1), (45, 1), (61, 2), (72, 1), (88, 1)]
        );
        assert_eq!(city.pollution_extremes(), Some((12, 88)));
    }

    #[test]
    fn districts() {
        let mut city = City::sample();
        assert_eq!(city.number_of_districts(), 5);

        assert_eq!(city.connect(0, 1).unwrap(), 0);
        assert_eq!(city.connect(3, 4).unwrap(), 3);
        assert_eq!(city.connect(1, 4).unwrap(), 0);
        // already connected
        assert_eq!(city.connect(4, 0).unwrap(), 0);

        assert_eq!(city.number_of_districts(), 2);
        assert!(city.connected(0, 4).unwrap());
        assert!(!city.connected(0, 2).unwrap());
        assert!(city.connect(0, 9).is_err());
    }

    #[test]
    fn report() {
        let mut out = Vec::new();
        City::sample().write_report(&mut out).unwrap();
        let report = String::from_utf8(out).unwrap();

        assert!(report.contains("zones 1-3: 2450 L"));
        assert!(report.contains("zones 1-3 after East saves water: 2000 L"));
        assert!(report.contains("West: 20"));
        assert!(report.contains("wave 1: 1 3"));
        assert!(report.contains("61 x2"));
        assert!(report.contains("2 districts"));
    }
}
