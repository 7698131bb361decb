//! # Parking Lot
//!
//! A multi-floor lot split into zones. The distance of a slot from the entrance grows with its
//! floor, zone and position in the zone: `(floor + 1) * 10 + (zone + 1) * 5 + position`.
//!
//! Vehicles get the nearest free slot. Some slots are reserved for priority vehicles (VIPs and
//! drivers with disabilities): priority vehicles take the nearest free priority slot and fall back
//! to regular slots when all priority slots are taken, regular vehicles never use priority slots.

use std::io::Write;

use fxhash::FxHashMap;
use itertools::Itertools;
use tracing::{info, warn};

use super::*;
use crate::{Error, collections::MinPriorityQueue, sorting::merge_sort_by_key};

/// Slot ids start at `1`
pub type SlotId = u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub id: SlotId,
    pub floor: u32,
    pub zone: u32,
    /// Distance from the entrance
    pub distance: u32,
    pub priority: bool,
    pub occupant: Option<String>,
}

impl Slot {
    pub fn is_free(&self) -> bool {
        self.occupant.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct ParkingLot {
    slots: Vec<Slot>,
    plates: FxHashMap<String, SlotId>,
}

impl ParkingLot {
    pub fn new(floors: u32, zones: u32, slots_per_zone: u32) -> Self {
        let mut slots = Vec::with_capacity((floors * zones * slots_per_zone) as usize);
        for floor in 0..floors {
            for zone in 0..zones {
                for pos in 0..slots_per_zone {
                    slots.push(Slot {
                        id: slots.len() as SlotId + 1,
                        floor,
                        zone,
                        distance: (floor + 1) * 10 + (zone + 1) * 5 + pos,
                        priority: false,
                        occupant: None,
                    });
                }
            }
        }

        Self {
            slots,
            plates: FxHashMap::default(),
        }
    }

    /// Two floors with three zones of five slots; the first slot of every zone on the ground floor
    /// is a priority slot
    pub fn sample() -> Self {
        let mut lot = Self::new(2, 3, 5);
        for slot in lot.slots.iter_mut().filter(|s| s.floor == 0) {
            slot.priority = (slot.id - 1) % 5 == 0;
        }
        lot
    }

    fn slot_index(&self, id: SlotId) -> Result<usize> {
        let idx = (id as usize).wrapping_sub(1);
        if idx < self.slots.len() {
            Ok(idx)
        } else {
            Err(Error::UnknownItem(format!("slot {id}")))
        }
    }

    pub fn slot(&self, id: SlotId) -> Result<&Slot> {
        Ok(&self.slots[self.slot_index(id)?])
    }

    /// Reserves a slot for priority vehicles or releases the reservation
    pub fn set_priority(&mut self, id: SlotId, priority: bool) -> Result<()> {
        let idx = self.slot_index(id)?;
        self.slots[idx].priority = priority;
        Ok(())
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn occupied(&self) -> usize {
        self.plates.len()
    }

    /// Nearest free slot of the requested kind (lowest id among equally distant slots)
    fn nearest_of_kind(&self, priority: bool) -> Option<&Slot> {
        let mut heap: MinPriorityQueue<u32, SlotId> = self
            .slots
            .iter()
            .filter(|s| s.is_free() && s.priority == priority)
            .map(|s| (s.distance, s.id))
            .collect();

        let (_, id) = heap.pop()?;
        self.slots.get(id as usize - 1)
    }

    /// The slot a vehicle would get without parking it
    pub fn nearest_free(&self, priority: bool) -> Option<&Slot> {
        if priority {
            self.nearest_of_kind(true).or_else(|| self.nearest_of_kind(false))
        } else {
            self.nearest_of_kind(false)
        }
    }

    /// Parks a vehicle in the nearest suitable slot
    pub fn park(&mut self, plate: &str, priority: bool) -> Result<&Slot> {
        if self.plates.contains_key(plate) {
            return Err(Error::AlreadyParked(plate.to_string()));
        }

        let Some(id) = self.nearest_free(priority).map(|s| s.id) else {
            warn!(plate, priority, "lot is full");
            return Err(Error::NoSlotAvailable(plate.to_string()));
        };

        let idx = self.slot_index(id)?;
        self.slots[idx].occupant = Some(plate.to_string());
        self.plates.insert(plate.to_string(), id);

        let slot = &self.slots[idx];
        info!(plate, slot = slot.id, floor = slot.floor + 1, zone = slot.zone + 1, "vehicle parked");
        Ok(slot)
    }

    /// Removes a vehicle and returns the slot it occupied
    pub fn remove(&mut self, plate: &str) -> Result<SlotId> {
        let id = self
            .plates
            .remove(plate)
            .ok_or_else(|| Error::UnknownVehicle(plate.to_string()))?;
        let idx = self.slot_index(id)?;
        self.slots[idx].occupant = None;
        info!(plate, slot = id, "vehicle left");
        Ok(id)
    }

    /// Slot of a parked vehicle
    pub fn find(&self, plate: &str) -> Option<&Slot> {
        let &id = self.plates.get(plate)?;
        self.slots.get(id as usize - 1)
    }

    /// All free slots, nearest first (lower id first among equally distant slots)
    pub fn free_slots(&self) -> Vec<&Slot> {
        let mut free = self.slots.iter().filter(|s| s.is_free()).collect_vec();
        merge_sort_by_key(&mut free, |s| s.distance);
        free
    }
}

impl Scenario for ParkingLot {
    const NAME: &'static str = "parking";

    fn write_report<W: Write>(&mut self, out: &mut W) -> Result<()> {
        section(out, "Arrivals")?;
        for (plate, priority) in [
            ("KA01AB1234", false),
            ("KA02CD5678", true),
            ("KA03EF9012", false),
            ("KA04GH3456", true),
        ] {
            let slot = self.park(plate, priority)?;
            writeln!(
                out,
                "{plate}{} -> slot {} (floor {}, zone {}, distance {})",
                if priority { " [priority]" } else { "" },
                slot.id,
                slot.floor + 1,
                slot.zone + 1,
                slot.distance
            )?;
        }

        section(out, "Departures")?;
        let left = self.remove("KA01AB1234")?;
        writeln!(out, "KA01AB1234 left slot {left}")?;

        section(out, "Search")?;
        for plate in ["KA03EF9012", "KA01AB1234"] {
            match self.find(plate) {
                Some(s) => writeln!(out, "{plate}: slot {} (floor {}, zone {})", s.id, s.floor + 1, s.zone + 1)?,
                None => writeln!(out, "{plate}: not found")?,
            }
        }

        section(out, "Nearest free slots")?;
        writeln!(out, "{} of {} occupied", self.occupied(), self.capacity())?;
        for s in self.free_slots().into_iter().take(5) {
            writeln!(out, "slot {} (floor {}, zone {}, distance {})", s.id, s.floor + 1, s.zone + 1, s.distance)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout() {
        let lot = ParkingLot::new(2, 3, 5);
        assert_eq!(lot.capacity(), 30);
        assert_eq!(lot.slot(1).unwrap().distance, 15);
        assert_eq!(lot.slot(15).unwrap().distance, 29);
        assert_eq!(lot.slot(16).unwrap().distance, 25);
        assert_eq!(lot.slot(30).unwrap().distance, 39);
        assert!(lot.slot(0).is_err());
        assert!(lot.slot(31).is_err());
    }

    #[test]
    fn sample_priority_slots() {
        let lot = ParkingLot::sample();
        let priority = lot.free_slots().into_iter().filter(|s| s.priority).map(|s| s.id).sorted().collect_vec();
        assert_eq!(priority, vec![1, 6, 11]);
        assert!(lot.slot(6).unwrap().priority);
        assert!(!lot.slot(16).unwrap().priority);
    }

    #[test]
    fn regular_and_priority_vehicles() {
        let mut lot = ParkingLot::sample();

        assert_eq!(lot.park("car", false).unwrap().id, 2);
        assert_eq!(lot.park("vip", true).unwrap().id, 1);
        assert_eq!(lot.park("vip2", true).unwrap().id, 6);
        assert_eq!(lot.park("vip3", true).unwrap().id, 11);
        // priority slots exhausted, fall back to the nearest regular slot
        assert_eq!(lot.park("vip4", true).unwrap().id, 3);

        assert!(matches!(lot.park("car", false), Err(Error::AlreadyParked(_))));
        assert_eq!(lot.find("vip2").unwrap().zone, 1);
        assert_eq!(lot.occupied(), 5);
    }

    #[test]
    fn equal_distances_prefer_lower_id() {
        let mut lot = ParkingLot::new(2, 3, 5);
        for i in 0..10 {
            lot.park(&format!("c{i}"), false).unwrap();
        }
        // slots 11 (floor 1, zone 3) and 16 (floor 2, zone 1) are both at distance 25
        assert_eq!(lot.park("x", false).unwrap().id, 11);
        assert_eq!(lot.park("y", false).unwrap().id, 16);
        assert_eq!(lot.park("z", false).unwrap().id, 12);
    }

    #[test]
    fn remove_and_full_lot() {
        let mut lot = ParkingLot::new(1, 1, 2);
        lot.set_priority(2, true).unwrap();

        lot.park("a", false).unwrap();
        assert!(matches!(lot.park("b", false), Err(Error::NoSlotAvailable(_))));
        assert_eq!(lot.park("c", true).unwrap().id, 2);

        assert_eq!(lot.remove("a").unwrap(), 1);
        assert!(lot.find("a").is_none());
        assert!(matches!(lot.remove("a"), Err(Error::UnknownVehicle(_))));
        assert_eq!(lot.park("b", false).unwrap().id, 1);
    }

    #[test]
    fn free_slots_sorted() {
        let mut lot = ParkingLot::sample();
        lot.park("a", false).unwrap();

        let free = lot.free_slots();
        assert_eq!(free.len(), 29);
        assert!(free.windows(2).all(|w| w[0].distance <= w[1].distance));
        assert_eq!(free[0].id, 1);
        assert_eq!(free[1].id, 3);
    }

    #[test]
    fn report() {
        let mut out = Vec::new();
        ParkingLot::sample().write_report(&mut out).unwrap();
        let report = String::from_utf8(out).unwrap();

        assert!(report.contains("KA02CD5678 [priority] -> slot 1 (floor 1, zone 1, distance 15)"));
        assert!(report.contains("KA01AB1234 left slot 2"));
        assert!(report.contains("KA01AB1234: not found"));
        assert!(report.contains("3 of 30 occupied"));
    }
}
