//! # Service Counters
//!
//! A bank and a government office share one hall. Normal customers join the shortest counter
//! queue of their service right away. Seniors and VIPs wait in a priority queue instead and are
//! moved to counters (highest priority first) before each service round. In a service round every
//! counter serves the customer at the front of its queue, which takes a fixed amount of time.

use std::{collections::VecDeque, fmt, io::Write};

use itertools::Itertools;
use tracing::{debug, info};

use super::*;
use crate::{Error, collections::PriorityQueue};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Service {
    Bank,
    Government,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Bank => write!(f, "bank"),
            Service::Government => write!(f, "government"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CustomerPriority {
    Normal,
    /// Seniors and pregnant customers
    Assisted,
    Vip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: u32,
    pub name: String,
    pub priority: CustomerPriority,
    pub service: Service,
    /// Tick of the hall clock at which the customer arrived
    pub arrival: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Counter {
    pub id: u32,
    queue: VecDeque<Customer>,
    /// Minutes spent serving customers
    pub busy_minutes: u32,
    pub served: u32,
}

impl Counter {
    fn new(id: u32) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn queue(&self) -> impl Iterator<Item = &Customer> + '_ {
        self.queue.iter()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }
}

/// Counters and priority waiting line of one service
#[derive(Debug, Clone)]
struct Desk {
    counters: Vec<Counter>,
    waiting: PriorityQueue<CustomerPriority, Customer>,
}

impl Desk {
    fn new(counters: u32) -> Self {
        Self {
            counters: (1..=counters).map(Counter::new).collect(),
            waiting: PriorityQueue::new(),
        }
    }

    /// Appends the customer to the shortest queue (lowest counter id on ties).
    /// Desks always have at least one counter.
    fn assign(&mut self, customer: Customer) -> u32 {
        let idx = self
            .counters
            .iter()
            .position_min_by_key(|c| c.queue.len())
            .unwrap_or_default();
        let counter = &mut self.counters[idx];
        debug!(customer = %customer.name, counter = counter.id, "assigned to counter");
        counter.queue.push_back(customer);
        counter.id
    }

    fn flush_waiting(&mut self) {
        while let Some((_, customer)) = self.waiting.pop() {
            self.assign(customer);
        }
    }
}

/// Customer served in a service round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Served {
    pub service: Service,
    pub counter: u32,
    pub customer: Customer,
}

#[derive(Debug, Clone)]
pub struct ServiceHall {
    bank: Desk,
    government: Desk,
    next_id: u32,
    clock: u32,
    service_minutes: u32,
}

impl ServiceHall {
    /// Creates an empty hall; both services need at least one counter
    pub fn new(bank_counters: u32, government_counters: u32) -> Result<Self> {
        for (service, counters) in [(Service::Bank, bank_counters), (Service::Government, government_counters)] {
            if counters == 0 {
                return Err(Error::NoCounter(service.to_string()));
            }
        }
        Ok(Self::with_desks(Desk::new(bank_counters), Desk::new(government_counters)))
    }

    fn with_desks(bank: Desk, government: Desk) -> Self {
        Self {
            bank,
            government,
            next_id: 1,
            clock: 0,
            service_minutes: 5,
        }
    }

    /// Three bank and two government counters with six customers in line
    pub fn sample() -> Self {
        let mut hall = Self::with_desks(Desk::new(3), Desk::new(2));
        for (name, priority, service) in [
            ("Ravi", CustomerPriority::Normal, Service::Bank),
            ("Meera", CustomerPriority::Assisted, Service::Bank),
            ("Arjun", CustomerPriority::Vip, Service::Government),
            ("Kiran", CustomerPriority::Normal, Service::Government),
            ("Priya", CustomerPriority::Normal, Service::Bank),
            ("Sam", CustomerPriority::Vip, Service::Bank),
        ] {
            hall.add_customer(name, priority, service);
        }
        hall
    }

    /// Minutes a counter needs per customer (5 by default)
    pub fn service_minutes(mut self, minutes: u32) -> Self {
        self.service_minutes = minutes;
        self
    }

    fn desk(&self, service: Service) -> &Desk {
        match service {
            Service::Bank => &self.bank,
            Service::Government => &self.government,
        }
    }

    fn desk_mut(&mut self, service: Service) -> &mut Desk {
        match service {
            Service::Bank => &mut self.bank,
            Service::Government => &mut self.government,
        }
    }

    pub fn counters(&self, service: Service) -> &[Counter] {
        &self.desk(service).counters
    }

    /// Number of priority customers not yet moved to a counter
    pub fn waiting_priority(&self, service: Service) -> usize {
        self.desk(service).waiting.len()
    }

    /// Registers a new customer and returns their id
    pub fn add_customer(&mut self, name: impl Into<String>, priority: CustomerPriority, service: Service) -> u32 {
        let customer = Customer {
            id: self.next_id,
            name: name.into(),
            priority,
            service,
            arrival: self.clock,
        };
        self.next_id += 1;
        self.clock += 1;

        let id = customer.id;
        let desk = self.desk_mut(service);
        if priority > CustomerPriority::Normal {
            desk.waiting.push(priority, customer);
        } else {
            desk.assign(customer);
        }
        id
    }

    /// Moves all waiting priority customers to counters and lets every counter serve the customer
    /// at the front of its queue
    pub fn serve_round(&mut self) -> Vec<Served> {
        let minutes = self.service_minutes;
        let mut served = Vec::new();

        for service in [Service::Bank, Service::Government] {
            let desk = self.desk_mut(service);
            desk.flush_waiting();

            for counter in &mut desk.counters {
                let Some(customer) = counter.queue.pop_front() else {
                    continue;
                };
                counter.busy_minutes += minutes;
                counter.served += 1;
                served.push(Served {
                    service,
                    counter: counter.id,
                    customer,
                });
            }
        }

        info!(served = served.len(), "service round finished");
        served
    }

    /// Removes a customer that leaves the hall before being served
    pub fn remove_customer(&mut self, id: u32) -> Result<Customer> {
        for desk in [&mut self.bank, &mut self.government] {
            for counter in &mut desk.counters {
                if let Some(pos) = counter.queue.iter().position(|c| c.id == id) {
                    if let Some(customer) = counter.queue.remove(pos) {
                        info!(customer = %customer.name, counter = counter.id, "customer left");
                        return Ok(customer);
                    }
                }
            }

            let mut left = None;
            desk.waiting.retain(|_, c| {
                if c.id == id {
                    left = Some(c.clone());
                    false
                } else {
                    true
                }
            });
            if let Some(customer) = left {
                info!(customer = %customer.name, "priority customer left");
                return Ok(customer);
            }
        }

        Err(Error::UnknownCustomer(id.to_string()))
    }

    /// Average time the customers currently queued at counters still have to wait until their
    /// service starts. The front customer of a queue is served next; every customer ahead adds one
    /// service time. `None` if nobody is queued.
    pub fn average_waiting_time(&self, service: Service) -> Option<f64> {
        let (customers, minutes) = self
            .desk(service)
            .counters
            .iter()
            .flat_map(|c| 0..c.queue.len())
            .fold((0u32, 0u32), |(n, total), ahead| {
                (n + 1, total + ahead as u32 * self.service_minutes)
            });

        (customers > 0).then(|| minutes as f64 / customers as f64)
    }
}

impl Scenario for ServiceHall {
    const NAME: &'static str = "counters";

    fn write_report<W: Write>(&mut self, out: &mut W) -> Result<()> {
        section(out, "Queues")?;
        for service in [Service::Bank, Service::Government] {
            for c in self.counters(service) {
                writeln!(
                    out,
                    "{service} counter {}: {}",
                    c.id,
                    c.queue().map(|c| c.name.as_str()).join(", ")
                )?;
            }
            writeln!(out, "{service} priority line: {}", self.waiting_priority(service))?;
        }

        section(out, "Service round")?;
        for s in self.serve_round() {
            let tag = if s.customer.priority > CustomerPriority::Normal { " (priority)" } else { "" };
            writeln!(out, "{} counter {} served {}{tag}", s.service, s.counter, s.customer.name)?;
        }

        self.add_customer("Nisha", CustomerPriority::Normal, Service::Bank);
        let leaving = self.add_customer("Omar", CustomerPriority::Normal, Service::Bank);
        section(out, "Customer leaves")?;
        let left = self.remove_customer(leaving)?;
        writeln!(out, "{} (id {}) left the {} hall", left.name, left.id, left.service)?;

        section(out, "Average waiting time")?;
        for service in [Service::Bank, Service::Government] {
            match self.average_waiting_time(service) {
                Some(t) => writeln!(out, "{service}: {t:.1} min")?,
                None => writeln!(out, "{service}: no customers in queue")?,
            }
        }
        Ok(())
    }
}
