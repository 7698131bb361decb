//! # Dynamic Pricing
//!
//! A restaurant catalog whose prices follow demand, stock, the time of day and the days left until
//! perishable items expire. Orders pass through an incoming queue and a processing queue; orders
//! that cannot be fulfilled end up on a failed stack (most recent first). Restocking picks the item
//! with the lowest stock and the nearest supplier on an undirected delivery network.
//!
//! The price of an item at hour `h` is
//! ```text
//! base * (1 + α·min(cap, sold) − β·max(1, stock) + γ·time(h) − δ·expiry)
//! ```
//! rounded to cents and never below the floor price. `time(h)` is `0.10` during lunch (11-14),
//! `0.15` during dinner (19-22), `-0.12` late at night (23-5) and `0` otherwise. `δ` only applies to
//! perishable items; `expiry` is `0.40` if the item expires within a day and `0.05` per day below a
//! week otherwise.

use std::{collections::VecDeque, io::Write};

use fxhash::FxHashMap;
use itertools::Itertools;
use tracing::{debug, info, warn};

use super::*;
use crate::{
    algo::*,
    collections::{AvlMap, BstMap, MinPriorityQueue, PriorityQueue},
    prelude::*,
    sorting::{SortAlgorithm, binary_search_by_key},
};

pub type ItemId = u32;

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub base_price: f64,
    pub stock: u32,
    /// Units sold today
    pub sold_today: u32,
    pub perishable: bool,
    /// Days until the item expires
    pub expiry_days: u32,
    /// Last computed dynamic price
    pub price: f64,
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>, base_price: f64, stock: u32, perishable: bool, expiry_days: u32) -> Self {
        Self {
            id,
            name: name.into(),
            base_price,
            stock,
            sold_today: 0,
            perishable,
            expiry_days,
            price: base_price,
        }
    }
}

/// Coefficients of the dynamic pricing formula
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PricingModel {
    demand_sensitivity: f64,
    stock_sensitivity: f64,
    time_sensitivity: f64,
    expiry_sensitivity: f64,
    demand_cap: u32,
    floor_price: f64,
}

impl Default for PricingModel {
    fn default() -> Self {
        Self {
            demand_sensitivity: 0.02,
            stock_sensitivity: 0.001,
            time_sensitivity: 0.05,
            expiry_sensitivity: 0.05,
            demand_cap: 200,
            floor_price: 0.1,
        }
    }
}

impl PricingModel {
    /// Weight of units sold today (α, default `0.02`)
    pub fn demand_sensitivity(mut self, alpha: f64) -> Self {
        self.demand_sensitivity = alpha;
        self
    }

    /// Weight of units in stock (β, default `0.001`)
    pub fn stock_sensitivity(mut self, beta: f64) -> Self {
        self.stock_sensitivity = beta;
        self
    }

    /// Weight of the time-of-day factor (γ, default `0.05`)
    pub fn time_sensitivity(mut self, gamma: f64) -> Self {
        self.time_sensitivity = gamma;
        self
    }

    /// Weight of the expiry discount of perishable items (δ, default `0.05`)
    pub fn expiry_sensitivity(mut self, delta: f64) -> Self {
        self.expiry_sensitivity = delta;
        self
    }

    /// Units sold beyond the cap do not raise the price further (default `200`)
    pub fn demand_cap(mut self, cap: u32) -> Self {
        self.demand_cap = cap;
        self
    }

    /// Lowest price an item can get (default `0.1`)
    pub fn floor_price(mut self, floor: f64) -> Self {
        self.floor_price = floor;
        self
    }

    pub fn time_factor(hour: u32) -> f64 {
        match hour {
            11..=14 => 0.10,
            19..=22 => 0.15,
            h if h >= 22 || h <= 5 => -0.12,
            _ => 0.0,
        }
    }

    pub fn expiry_factor(item: &Item) -> f64 {
        if !item.perishable {
            0.0
        } else if item.expiry_days <= 1 {
            0.40
        } else {
            7u32.saturating_sub(item.expiry_days) as f64 * 0.05
        }
    }

    /// Dynamic price of `item` at `hour`, rounded to cents
    pub fn price(&self, item: &Item, hour: u32) -> f64 {
        let delta = if item.perishable { self.expiry_sensitivity } else { 0.0 };
        let demand = item.sold_today.min(self.demand_cap) as f64;
        let stock = item.stock.max(1) as f64;

        let factor = 1.0 + self.demand_sensitivity * demand - self.stock_sensitivity * stock
            + self.time_sensitivity * Self::time_factor(hour)
            - delta * Self::expiry_factor(item);

        let price = (item.base_price * factor).max(self.floor_price);
        (price * 100.0).round() / 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: u32,
    pub item: ItemId,
    pub quantity: u32,
    /// Hour of the shop clock at which the order was placed
    pub hour: u32,
    pub customer: String,
}

#[derive(Debug, Clone)]
pub struct Shop {
    catalog: FxHashMap<ItemId, Item>,
    names: FxHashMap<String, ItemId>,
    bst_index: BstMap<ItemId, String>,
    avl_index: AvlMap<ItemId, String>,
    /// Node `0` is the shop, all other nodes are suppliers; weights are delivery minutes
    suppliers: AdjArrayUndir<u32>,
    incoming: VecDeque<Order>,
    processing: VecDeque<Order>,
    failed: Vec<Order>,
    next_order: u32,
    hour: u32,
    model: PricingModel,
}

impl Shop {
    pub fn new(suppliers: AdjArrayUndir<u32>, model: PricingModel) -> Self {
        Self {
            catalog: FxHashMap::default(),
            names: FxHashMap::default(),
            bst_index: BstMap::new(),
            avl_index: AvlMap::new(),
            suppliers,
            incoming: VecDeque::new(),
            processing: VecDeque::new(),
            failed: Vec::new(),
            next_order: 1,
            hour: 12,
            model,
        }
    }

    /// Seven menu items and five suppliers, clock at noon
    pub fn sample() -> Self {
        let suppliers = AdjArrayUndir::from_edges(6, [(0, 1, 15), (1, 2, 20), (0, 3, 12), (3, 4, 25), (2, 5, 30)]);
        let mut shop = Self::new(suppliers, PricingModel::default());
        for item in [
            Item::new(101, "Veg Burger", 100.0, 50, true, 3),
            Item::new(102, "Chicken Burger", 150.0, 40, true, 5),
            Item::new(103, "French Fries", 60.0, 30, true, 2),
            Item::new(104, "Margherita Pizza", 250.0, 20, true, 4),
            Item::new(105, "Coke", 40.0, 100, false, 365),
            Item::new(106, "Pasta", 180.0, 25, true, 6),
            Item::new(107, "Salad", 120.0, 15, true, 1),
        ] {
            shop.add_item(item);
        }
        shop
    }

    /// Adds an item or replaces the item with the same id
    pub fn add_item(&mut self, item: Item) {
        if let Some(old) = self.catalog.get(&item.id) {
            self.names.remove(&old.name);
        }
        self.names.insert(item.name.clone(), item.id);
        self.bst_index.insert(item.id, item.name.clone());
        self.avl_index.insert(item.id, item.name.clone());
        self.catalog.insert(item.id, item);
    }

    pub fn item(&self, id: ItemId) -> Result<&Item> {
        self.catalog.get(&id).ok_or_else(|| Error::UnknownItem(id.to_string()))
    }

    pub fn item_by_name(&self, name: &str) -> Result<&Item> {
        let id = self.names.get(name).ok_or_else(|| Error::UnknownItem(name.to_string()))?;
        self.item(*id)
    }

    /// All items ordered by id
    pub fn items(&self) -> Vec<&Item> {
        self.catalog.values().sorted_by_key(|it| it.id).collect()
    }

    /// Looks an item up by binary search over the id-ordered catalog
    pub fn search(&self, id: ItemId) -> Option<&Item> {
        let items = self.items();
        binary_search_by_key(&items, &id, |it| it.id).map(|i| items[i])
    }

    /// In-order listing of the unbalanced index and its height
    pub fn bst_listing(&self) -> (Vec<(ItemId, &str)>, usize) {
        let listing = self.bst_index.iter().map(|(&id, name)| (id, name.as_str())).collect();
        (listing, self.bst_index.height())
    }

    /// In-order listing of the balanced index and its height
    pub fn avl_listing(&self) -> (Vec<(ItemId, &str)>, usize) {
        let listing = self.avl_index.iter().map(|(&id, name)| (id, name.as_str())).collect();
        (listing, self.avl_index.height())
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn set_hour(&mut self, hour: u32) {
        self.hour = hour % 24;
    }

    /// Moves the clock forward by one hour and returns the new hour
    pub fn advance_hour(&mut self) -> u32 {
        self.hour = (self.hour + 1) % 24;
        self.hour
    }

    /// Queues an order and returns its id. Orders are validated when they are processed.
    pub fn place_order(&mut self, item: ItemId, quantity: u32, customer: impl Into<String>) -> u32 {
        let id = self.next_order;
        self.next_order += 1;
        self.incoming.push_back(Order {
            id,
            item,
            quantity,
            hour: self.hour,
            customer: customer.into(),
        });
        id
    }

    pub fn pending_orders(&self) -> usize {
        self.incoming.len() + self.processing.len()
    }

    /// Moves all incoming orders to processing and fulfils them in order. Orders for unknown items
    /// or with insufficient stock are pushed onto the failed stack.
    pub fn process_orders(&mut self) -> Vec<(u32, Result<()>)> {
        self.processing.extend(self.incoming.drain(..));

        let mut outcomes = Vec::with_capacity(self.processing.len());
        while let Some(order) = self.processing.pop_front() {
            let outcome = self.fulfil(&order);
            if outcome.is_err() {
                self.failed.push(order.clone());
            }
            outcomes.push((order.id, outcome));
        }
        outcomes
    }

    fn fulfil(&mut self, order: &Order) -> Result<()> {
        let item = self
            .catalog
            .get_mut(&order.item)
            .ok_or_else(|| Error::UnknownItem(order.item.to_string()))?;

        if item.stock < order.quantity {
            warn!(order = order.id, item = %item.name, stock = item.stock, "order backordered");
            return Err(Error::InsufficientStock {
                item: item.name.clone(),
                requested: order.quantity,
                available: item.stock,
            });
        }

        item.stock -= order.quantity;
        item.sold_today += order.quantity;
        info!(order = order.id, item = %item.name, quantity = order.quantity, "order fulfilled");
        Ok(())
    }

    /// Failed orders, most recent first
    pub fn failed_orders(&self) -> impl Iterator<Item = &Order> + '_ {
        self.failed.iter().rev()
    }

    /// Puts all failed orders back into the incoming queue (oldest first); returns their number
    pub fn requeue_failed(&mut self) -> usize {
        let n = self.failed.len();
        self.incoming.extend(self.failed.drain(..));
        n
    }

    /// Recomputes the price of every item for the current hour
    pub fn recompute_prices(&mut self) {
        for item in self.catalog.values_mut() {
            item.price = self.model.price(item, self.hour);
        }
        debug!(hour = self.hour, "prices recomputed");
    }

    /// The `k` best selling items (lower id first among equal sales)
    pub fn top_demand(&self, k: usize) -> Vec<&Item> {
        let heap: PriorityQueue<u32, ItemId> = self.items().into_iter().map(|it| (it.sold_today, it.id)).collect();
        heap.peek_top(k).into_iter().filter_map(|(_, id)| self.catalog.get(id)).collect()
    }

    /// The `k` cheapest items at their current price
    pub fn cheapest(&self, k: usize) -> Vec<&Item> {
        let heap: MinPriorityQueue<f64, ItemId> = self.items().into_iter().map(|it| (it.price, it.id)).collect();
        heap.peek_top(k).into_iter().filter_map(|(_, id)| self.catalog.get(id)).collect()
    }

    /// Supplier closest to the shop and its delivery time in minutes
    pub fn nearest_supplier(&self) -> Option<(Node, u32)> {
        self.suppliers.dijkstra(0).closest(|v| v != 0)
    }

    /// Adds `units` to the item with the lowest stock (lowest id on ties) and returns it
    pub fn restock_lowest(&mut self, units: u32) -> Option<&Item> {
        let id = self.catalog.values().min_by_key(|it| (it.stock, it.id))?.id;
        let item = self.catalog.get_mut(&id)?;
        item.stock += units;
        info!(item = %item.name, stock = item.stock, "restocked");
        Some(item)
    }

    /// All items by descending price, sorted with the given algorithm
    pub fn by_price(&self, algo: SortAlgorithm) -> Vec<&Item> {
        let mut items = self.items();
        algo.sort_by(&mut items, |a, b| b.price.total_cmp(&a.price));
        items
    }
}

fn write_item<W: Write>(out: &mut W, it: &Item) -> Result<()> {
    writeln!(
        out,
        "{} | {} | base {:.2} | price {:.2} | stock {} | sold {}",
        it.id, it.name, it.base_price, it.price, it.stock, it.sold_today
    )?;
    Ok(())
}

impl Scenario for Shop {
    const NAME: &'static str = "pricing";

    fn write_report<W: Write>(&mut self, out: &mut W) -> Result<()> {
        section(out, "Catalog")?;
        for it in self.items() {
            write_item(out, it)?;
        }

        section(out, "Orders")?;
        for (item, quantity, customer) in [(101, 5, "Asha"), (107, 20, "Ravi"), (999, 1, "Mia"), (105, 10, "Tom")] {
            self.place_order(item, quantity, customer);
        }
        for (id, outcome) in self.process_orders() {
            match outcome {
                Ok(()) => writeln!(out, "order {id}: fulfilled")?,
                Err(e) => writeln!(out, "order {id}: failed ({e})")?,
            }
        }

        section(out, &format!("Prices at {}:00", self.hour))?;
        self.recompute_prices();
        for it in self.items() {
            write_item(out, it)?;
        }

        section(out, "Top demand")?;
        for it in self.top_demand(3) {
            writeln!(out, "{} sold {} at {:.2}", it.name, it.sold_today, it.price)?;
        }

        section(out, "Replenishment")?;
        match self.nearest_supplier() {
            Some((node, minutes)) => writeln!(out, "nearest supplier: node {node} ({minutes} min)")?,
            None => writeln!(out, "no supplier reachable")?,
        }
        if let Some(it) = self.restock_lowest(50) {
            writeln!(out, "restocked {} to {}", it.name, it.stock)?;
        }

        section(out, "Sorted by price")?;
        for algo in [SortAlgorithm::Quick, SortAlgorithm::Merge, SortAlgorithm::Heap] {
            let top = self.by_price(algo).into_iter().take(3).map(|it| it.name.as_str()).join(", ");
            writeln!(out, "{}: {top}", algo.name())?;
        }

        section(out, "Indexes")?;
        let (bst, bst_height) = self.bst_listing();
        let (avl, avl_height) = self.avl_listing();
        writeln!(out, "bst (height {bst_height}): {}", bst.iter().map(|(id, _)| id).join(" "))?;
        writeln!(out, "avl (height {avl_height}): {}", avl.iter().map(|(id, _)| id).join(" "))?;
        match self.search(104) {
            Some(it) => writeln!(out, "search 104: {}", it.name)?,
            None => writeln!(out, "search 104: not found")?,
        }

        section(out, "Cheapest")?;
        for it in self.cheapest(6) {
            writeln!(out, "{} {:.2} (stock {})", it.name, it.price, it.stock)?;
        }

        section(out, "Failed orders")?;
        for o in self.failed_orders() {
            writeln!(out, "order {} item {} qty {} ({})", o.id, o.item, o.quantity, o.customer)?;
        }

        let hour = self.advance_hour();
        writeln!(out, "\nclock advanced to {hour}:00")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn pricing_formula() {
        let shop = Shop::sample();
        let model = PricingModel::default();

        assert!(approx(model.price(shop.item(105).unwrap(), 12), 36.2));
        assert!(approx(model.price(shop.item(107).unwrap(), 12), 116.4));

        // late night discount, no expiry discount for coke
        assert!(approx(model.price(shop.item(105).unwrap(), 23), 35.76));

        let free = Item::new(1, "Sample", 1.0, 5000, false, 30);
        assert!(approx(model.price(&free, 8), 0.1));
    }

    #[test]
    fn time_and_expiry_factors() {
        assert_eq!(PricingModel::time_factor(11), 0.10);
        assert_eq!(PricingModel::time_factor(22), 0.15);
        assert_eq!(PricingModel::time_factor(23), -0.12);
        assert_eq!(PricingModel::time_factor(3), -0.12);
        assert_eq!(PricingModel::time_factor(16), 0.0);

        let mut it = Item::new(1, "Bread", 10.0, 5, true, 1);
        assert_eq!(PricingModel::expiry_factor(&it), 0.40);
        it.expiry_days = 5;
        assert!(approx(PricingModel::expiry_factor(&it), 0.10));
        it.expiry_days = 9;
        assert_eq!(PricingModel::expiry_factor(&it), 0.0);
    }

    #[test]
    fn order_pipeline() {
        let mut shop = Shop::sample();
        let a = shop.place_order(101, 5, "Asha");
        let b = shop.place_order(107, 20, "Ravi");
        let c = shop.place_order(999, 1, "Mia");
        assert_eq!(shop.pending_orders(), 3);

        let outcomes = shop.process_orders();
        assert_eq!(outcomes.iter().map(|(id, _)| *id).collect_vec(), vec![a, b, c]);
        assert!(outcomes[0].1.is_ok());
        assert!(matches!(
            outcomes[1].1,
            Err(Error::InsufficientStock { requested: 20, available: 15, .. })
        ));
        assert!(matches!(outcomes[2].1, Err(Error::UnknownItem(_))));

        assert_eq!(shop.item(101).unwrap().stock, 45);
        assert_eq!(shop.item(101).unwrap().sold_today, 5);
        assert_eq!(shop.failed_orders().map(|o| o.id).collect_vec(), vec![c, b]);

        shop.restock_lowest(10);
        assert_eq!(shop.requeue_failed(), 2);
        let retried = shop.process_orders();
        assert!(retried[0].1.is_ok());
        assert_eq!(shop.item_by_name("Salad").unwrap().stock, 5);
        assert_eq!(shop.failed_orders().count(), 1);
    }

    #[test]
    fn heaps_and_sorting() {
        let mut shop = Shop::sample();
        shop.place_order(103, 4, "a");
        shop.place_order(106, 4, "b");
        shop.place_order(105, 9, "c");
        shop.process_orders();
        shop.recompute_prices();

        let top = shop.top_demand(3).into_iter().map(|it| it.id).collect_vec();
        assert_eq!(top, vec![105, 103, 106]);

        let cheap = shop.cheapest(2).into_iter().map(|it| it.id).collect_vec();
        assert_eq!(cheap, vec![105, 103]);

        let expected = shop.by_price(SortAlgorithm::Merge).into_iter().map(|it| it.id).collect_vec();
        assert_eq!(expected[0], 104);
        for algo in SortAlgorithm::ALL {
            let prices = shop.by_price(algo).into_iter().map(|it| it.price).collect_vec();
            assert!(prices.windows(2).all(|w| w[0] >= w[1]), "{}", algo.name());
        }
    }

    #[test]
    fn supplier_and_restock() {
        let mut shop = Shop::sample();
        assert_eq!(shop.nearest_supplier(), Some((3, 12)));

        let restocked = shop.restock_lowest(50).unwrap();
        assert_eq!((restocked.id, restocked.stock), (107, 65));
        assert_eq!(shop.restock_lowest(50).unwrap().id, 104);
    }

    #[test]
    fn lookups_and_indexes() {
        let mut shop = Shop::sample();
        assert_eq!(shop.item_by_name("Coke").unwrap().id, 105);
        assert!(matches!(shop.item_by_name("Latte"), Err(Error::UnknownItem(_))));
        assert_eq!(shop.search(106).unwrap().name, "Pasta");
        assert!(shop.search(100).is_none());

        shop.add_item(Item::new(105, "Cola", 45.0, 80, false, 365));
        assert!(shop.item_by_name("Coke").is_err());
        assert_eq!(shop.item_by_name("Cola").unwrap().base_price, 45.0);

        let (bst, bst_height) = shop.bst_listing();
        let (avl, avl_height) = shop.avl_listing();
        assert_eq!(bst, avl);
        assert_eq!(bst.len(), 7);
        assert!(bst.iter().any(|&(id, name)| id == 105 && name == "Cola"));
        // ids arrive sorted: the plain BST degenerates into a list
        assert_eq!(bst_height, 7);
        assert_eq!(avl_height, 3);
    }

    #[test]
    fn clock_wraps() {
        let mut shop = Shop::sample();
        shop.set_hour(23);
        assert_eq!(shop.advance_hour(), 0);
        assert_eq!(shop.hour(), 0);
    }

    #[test]
    fn report() {
        let mut out = Vec::new();
        Shop::sample().write_report(&mut out).unwrap();
        let report = String::from_utf8(out).unwrap();

        assert!(report.contains("order 1: fulfilled"));
        assert!(report.contains("order 3: failed (unknown item `999`)"));
        assert!(report.contains("nearest supplier: node 3 (12 min)"));
        assert!(report.contains("restocked Salad to 65"));
        assert!(report.contains("clock advanced to 13:00"));
    }
}
