//! # Flood Monitoring
//!
//! Water level sensors report readings into a live queue. A max-heap keeps the highest level seen,
//! readings are sorted into a level trend and the spread of a flood over a terrain grid is
//! simulated with a breadth-first flood fill (`0` cells are low ground that floods).

use std::{collections::VecDeque, io::Write};

use fxhash::FxHashMap;
use itertools::Itertools;
use tracing::{debug, warn};

use super::*;
use crate::{
    Error,
    algo::{FloodFill, flood_fill},
    collections::PriorityQueue,
    repr::{Cell, Grid},
    sorting::selection_sort_by,
};

pub type SensorId = u32;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Reading {
    pub sensor: SensorId,
    /// Water level in metres
    pub level: f64,
    /// Rainfall in millimetres
    pub rainfall: f64,
    pub time: u64,
}

#[derive(Debug, Clone)]
pub struct FloodMonitor {
    locations: FxHashMap<SensorId, String>,
    live: VecDeque<Reading>,
    levels: PriorityQueue<f64, SensorId>,
    /// Terrain: `0` is low ground, everything else stays dry unless it is the source of the flood
    area: Grid<u8>,
    warning_level: f64,
}

impl FloodMonitor {
    pub fn new(area: Grid<u8>) -> Self {
        Self {
            locations: FxHashMap::default(),
            live: VecDeque::new(),
            levels: PriorityQueue::new(),
            area,
            warning_level: 5.0,
        }
    }

    /// Two sensors, three readings and a 3x3 low-lying area around a single raised cell
    pub fn sample() -> Self {
        let area = Grid::from_rows(vec![vec![0, 0, 0], vec![0, 1, 0], vec![0, 0, 0]]);
        let mut monitor = Self::new(area);
        monitor.locations = [(101, "River Bank"), (102, "Dam Gate")]
            .into_iter()
            .map(|(id, location)| (id, location.to_string()))
            .collect();

        for (sensor, level, rainfall, time) in [(101, 3.5, 10.0, 100), (102, 4.8, 20.0, 110), (101, 5.5, 30.0, 120)] {
            monitor.push(Reading {
                sensor,
                level,
                rainfall,
                time,
            });
        }
        monitor
    }

    /// Level in metres from which readings raise a warning (default `5.0`)
    pub fn warning_level(mut self, metres: f64) -> Self {
        self.warning_level = metres;
        self
    }

    pub fn register_sensor(&mut self, id: SensorId, location: impl Into<String>) -> Result<()> {
        if self.locations.contains_key(&id) {
            return Err(Error::Duplicate(id.to_string()));
        }
        self.locations.insert(id, location.into());
        Ok(())
    }

    pub fn location(&self, id: SensorId) -> Result<&str> {
        self.locations
            .get(&id)
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownItem(format!("sensor {id}")))
    }

    /// Records a reading of a registered sensor
    pub fn record(&mut self, reading: Reading) -> Result<()> {
        let location = self.location(reading.sensor)?;
        if reading.level >= self.warning_level {
            warn!(sensor = reading.sensor, location, level = reading.level, "water level above warning mark");
        } else {
            debug!(sensor = reading.sensor, level = reading.level, "reading recorded");
        }

        self.push(reading);
        Ok(())
    }

    fn push(&mut self, reading: Reading) {
        self.levels.push(reading.level, reading.sensor);
        self.live.push_back(reading);
    }

    /// Readings not processed yet, oldest first
    pub fn live_readings(&self) -> impl Iterator<Item = &Reading> + '_ {
        self.live.iter()
    }

    /// Takes the oldest unprocessed reading off the live queue
    pub fn next_reading(&mut self) -> Option<Reading> {
        self.live.pop_front()
    }

    /// Highest level recorded so far and the sensor that measured it
    pub fn highest_level(&self) -> Option<(f64, SensorId)> {
        self.levels.peek().map(|(&level, &sensor)| (level, sensor))
    }

    /// Levels of the live readings in ascending order
    pub fn level_trend(&self) -> Vec<f64> {
        let mut levels = self.live.iter().map(|r| r.level).collect_vec();
        selection_sort_by(&mut levels, f64::total_cmp);
        levels
    }

    /// Live readings at or above the warning level
    pub fn above_warning(&self) -> Vec<&Reading> {
        self.live.iter().filter(|r| r.level >= self.warning_level).collect()
    }

    pub fn area(&self) -> &Grid<u8> {
        &self.area
    }

    /// Floods the area starting at `source`
    pub fn simulate_flood(&self, source: Cell) -> Result<FloodFill> {
        let flood = flood_fill(&self.area, source, |&h| h == 0)?;
        debug!(cells = flood.len(), waves = flood.number_of_waves(), "flood simulated");
        Ok(flood)
    }
}

impl Scenario for FloodMonitor {
    const NAME: &'static str = "flood";

    fn write_report<W: Write>(&mut self, out: &mut W) -> Result<()> {
        section(out, "Live readings")?;
        for r in self.live_readings() {
            writeln!(
                out,
                "t={} sensor {} ({}): level {} m, rain {} mm",
                r.time,
                r.sensor,
                self.location(r.sensor)?,
                r.level,
                r.rainfall
            )?;
        }

        section(out, "Highest level")?;
        if let Some((level, sensor)) = self.highest_level() {
            writeln!(out, "{level} m at {}", self.location(sensor)?)?;
        }
        for r in self.above_warning() {
            writeln!(out, "warning: {} m at t={}", r.level, r.time)?;
        }

        section(out, "Level trend")?;
        writeln!(out, "{}", self.level_trend().iter().join(" "))?;

        section(out, "Flood spread from (1, 1)")?;
        let flood = self.simulate_flood((1, 1))?;
        for r in 0..self.area.rows() {
            let row = (0..self.area.cols()).map(|c| u8::from(flood.is_flooded((r, c)))).join(" ");
            writeln!(out, "{row}")?;
        }
        writeln!(out, "{} cells flooded in {} waves", flood.len(), flood.number_of_waves())?;

        section(out, "Processing")?;
        while let Some(r) = self.next_reading() {
            writeln!(out, "processed reading t={}", r.time)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    #[test]
    fn sensors_and_readings() {
        let mut m = FloodMonitor::sample();
        assert_eq!(m.location(101).unwrap(), "River Bank");
        assert!(matches!(m.location(103), Err(Error::UnknownItem(_))));
        assert!(matches!(m.register_sensor(102, "Weir"), Err(Error::Duplicate(_))));

        assert_eq!(m.highest_level(), Some((5.5, 101)));
        assert_eq!(m.level_trend(), vec![3.5, 4.8, 5.5]);
        assert_eq!(m.above_warning().len(), 1);

        let bad = Reading {
            sensor: 7,
            level: 1.0,
            rainfall: 0.0,
            time: 130,
        };
        assert!(m.record(bad).is_err());
        assert_eq!(m.live_readings().count(), 3);

        assert_eq!(m.next_reading().unwrap().time, 100);
        assert_eq!(m.level_trend(), vec![4.8, 5.5]);
        // the heap keeps the maximum of all readings
        assert_eq!(m.highest_level(), Some((5.5, 101)));
    }

    #[test]
    fn sample_readings_are_valid() {
        let sample = FloodMonitor::sample();
        let mut m = FloodMonitor::new(sample.area().clone());
        for id in [101, 102] {
            m.register_sensor(id, sample.location(id).unwrap()).unwrap();
        }
        for &r in sample.live_readings() {
            m.record(r).unwrap();
        }
        assert_eq!(m.live_readings().collect_vec(), sample.live_readings().collect_vec());
        assert_eq!(m.highest_level(), sample.highest_level());
    }

    #[test]
    fn warning_level() {
        let m = FloodMonitor::sample().warning_level(4.0);
        assert_eq!(m.above_warning().iter().map(|r| r.time).collect_vec(), vec![110, 120]);
    }

    #[test]
    fn flood_spread() {
        let m = FloodMonitor::sample();
        let flood = m.simulate_flood((1, 1)).unwrap();
        assert_eq!(flood.len(), 9);
        assert_eq!(flood.number_of_waves(), 3);

        let corner = m.simulate_flood((0, 0)).unwrap();
        assert_eq!(corner.len(), 8);
        assert!(!corner.is_flooded((1, 1)));

        assert!(matches!(m.simulate_flood((3, 0)), Err(Error::CellOutOfRange { .. })));
    }

    #[test]
    fn report() {
        let mut out = Vec::new();
        FloodMonitor::sample().write_report(&mut out).unwrap();
        let report = String::from_utf8(out).unwrap();

        assert!(report.contains("5.5 m at River Bank"));
        assert!(report.contains("3.5 4.8 5.5"));
        assert!(report.contains("1 1 1\n1 1 1\n1 1 1"));
        assert!(report.contains("9 cells flooded in 3 waves"));
    }
}
