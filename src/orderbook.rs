use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info, warn};

use crate::arena::{Arena, LevelQueue};
use crate::level::{LevelAction, LevelDataCache};
use crate::orders::{Order, OrderId, OrderType, Price, Quantity, Side};
use crate::trade::{Trade, TradeInfo, Trades};

/// Where an admitted order lives: which side's map, which price level
/// within it, and its stable index into the shared [`Arena`].
struct OrderLocation {
    side: Side,
    price: Price,
    index: usize,
}

/// `{id, side, price, quantity}` — re-admit a resting order under a new
/// price/quantity, preserving its original [`OrderType`]. Semantically
/// "cancel then re-add"; the re-added order loses its time priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderModify {
    pub id: OrderId,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
}

/// Unifies forward (ascending) and reverse (descending) `BTreeMap` key
/// iteration without boxing, so the hot feasibility check in
/// `can_fully_fill` never allocates.
enum PriceIter<'a> {
    Fwd(std::collections::btree_map::Keys<'a, Price, LevelQueue>),
    Rev(std::iter::Rev<std::collections::btree_map::Keys<'a, Price, LevelQueue>>),
}

impl<'a> Iterator for PriceIter<'a> {
    type Item = &'a Price;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            PriceIter::Fwd(iter) => iter.next(),
            PriceIter::Rev(iter) => iter.next(),
        }
    }
}

/// A price and the aggregated remaining quantity resting there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelInfo {
    pub price: Price,
    pub quantity: Quantity,
}

/// A consistent snapshot of both sides of the book: bids in descending
/// price order, asks in ascending price order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderBookLevelInfo {
    pub bids: Vec<LevelInfo>,
    pub asks: Vec<LevelInfo>,
}

/// The price-keyed order queues, the id-index, and the level-data cache for
/// a single instrument. Not thread-safe on its own — [`crate::OrderBookEngine`]
/// wraps it behind a single mutex, matching the reference implementation's
/// one-lock-for-everything design.
#[derive(Default)]
pub struct OrderBook {
    bids: BTreeMap<Price, LevelQueue>,
    asks: BTreeMap<Price, LevelQueue>,
    arena: Arena,
    orders_by_id: HashMap<OrderId, OrderLocation>,
    level_data: LevelDataCache,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> usize {
        self.orders_by_id.len()
    }

    fn levels(&self, side: Side) -> &BTreeMap<Price, LevelQueue> {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    /// True iff an order resting at `price` on `side` would cross the
    /// opposite side's best price.
    pub fn can_match(&self, price: Price, side: Side) -> bool {
        match side {
            Side::Buy => self
                .asks
                .first_key_value()
                .is_some_and(|(&best_ask, _)| price >= best_ask),
            Side::Sell => self
                .bids
                .last_key_value()
                .is_some_and(|(&best_bid, _)| price <= best_bid),
        }
    }

    /// True iff a walk of the opposite side from best toward worst,
    /// stopping before prices that no longer cross `price`, accumulates at
    /// least `quantity`. Reads only `LevelData` aggregates, never per-order
    /// quantities, so this is sub-linear in order count.
    pub fn can_fully_fill(&self, price: Price, quantity: Quantity, side: Side) -> bool {
        if !self.can_match(price, side) {
            return false;
        }

        let mut needed = quantity;
        let opposite = self.levels(side.opposite());

        let crosses = |level_price: Price| match side {
            Side::Buy => level_price <= price,
            Side::Sell => level_price >= price,
        };

        let prices = match side {
            Side::Buy => PriceIter::Fwd(opposite.keys()),
            Side::Sell => PriceIter::Rev(opposite.keys().rev()),
        };

        for &level_price in prices {
            if !crosses(level_price) {
                break;
            }
            let available = self.level_data.get(level_price).map_or(0, |d| d.total_quantity);
            if available >= needed {
                return true;
            }
            needed -= available;
        }
        false
    }

    /// Appends `order` to the tail of its `(side, price)` queue, indexes it
    /// by id, and publishes `Add` to the level-data cache.
    fn insert(&mut self, order: Order) {
        let side = order.side;
        let price = order.price;
        let quantity = order.initial_quantity;
        let id = order.id;

        let levels = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        let queue = levels.entry(price).or_default();
        let index = self.arena.push_back(queue, order);

        self.orders_by_id
            .insert(id, OrderLocation { side, price, index });
        self.level_data.update(price, quantity, LevelAction::Add);
    }

    /// Removes an order from its level queue and the id-index, erasing the
    /// price entry if the level emptied. Does not touch the level-data
    /// cache; callers report the quantity delta themselves (see `remove`
    /// and `match_orders`, which need different quantities: `remove`'s
    /// callers want the order's still-accurate remaining quantity, while a
    /// just-filled order's remaining quantity is already zeroed by the
    /// time `match_orders` removes it).
    fn unlink_order(&mut self, order_id: OrderId) -> Option<Order> {
        let location = self.orders_by_id.remove(&order_id)?;
        let levels = match location.side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        let queue = levels
            .get_mut(&location.price)
            .expect("level exists for a still-indexed order");
        let order = self.arena.unlink(queue, location.index);
        if queue.is_empty() {
            levels.remove(&location.price);
        }
        Some(order)
    }

    /// Removes an order and publishes `action` to the level-data cache with
    /// its (still-accurate) remaining quantity. Used for cancels and the
    /// FAK residual-cancel, where the order hasn't been touched since it was
    /// indexed; not used for a full-fill removal inside `match_orders`,
    /// where the remaining quantity is already zero by the time of removal.
    fn remove(&mut self, order_id: OrderId, action: LevelAction) -> Option<Order> {
        let order = self.unlink_order(order_id)?;
        self.level_data
            .update(order.price, order.remaining_quantity, action);
        Some(order)
    }

    /// Admits `order`. Returns the trades produced by matching it, which may
    /// be empty (duplicate id, a failed FAK/FOK/Market precheck, or simply
    /// no resting liquidity to cross).
    pub fn add(&mut self, mut order: Order) -> Trades {
        if self.orders_by_id.contains_key(&order.id) {
            warn!(order_id = order.id, "order rejected: duplicate id");
            return Trades::new();
        }

        if order.order_type == OrderType::Market {
            let worst_opposite = match order.side {
                Side::Buy => self.asks.last_key_value().map(|(&p, _)| p),
                Side::Sell => self.bids.first_key_value().map(|(&p, _)| p),
            };
            match worst_opposite {
                Some(price) => order
                    .promote_to_limit(price)
                    .expect("order is Market, promotion precondition holds"),
                None => {
                    warn!(
                        order_id = order.id,
                        "order rejected: market order with no opposite-side liquidity"
                    );
                    return Trades::new();
                }
            }
        }

        if order.order_type == OrderType::FillAndKill
            && !self.can_match(order.price, order.side)
        {
            warn!(order_id = order.id, "order rejected: FillAndKill cannot cross");
            return Trades::new();
        }

        if order.order_type == OrderType::FillOrKill
            && !self.can_fully_fill(order.price, order.remaining_quantity, order.side)
        {
            warn!(order_id = order.id, "order rejected: FillOrKill cannot fully fill");
            return Trades::new();
        }

        let order_id = order.id;
        let order_type = order.order_type;
        debug!(
            order_id,
            side = ?order.side,
            order_type = ?order_type,
            price = order.price,
            quantity = order.remaining_quantity,
            "admitting order"
        );
        self.insert(order);

        let trades = self.match_orders();

        if order_type == OrderType::FillAndKill && self.orders_by_id.contains_key(&order_id) {
            debug!(order_id, "cancelling FillAndKill residual");
            self.remove(order_id, LevelAction::Remove);
        }

        trades
    }

    /// Cancels `order_id` if it is resting; a no-op for an unknown id.
    pub fn cancel(&mut self, order_id: OrderId) {
        match self.remove(order_id, LevelAction::Remove) {
            Some(_) => debug!(order_id, "order cancelled"),
            None => debug!(order_id, "cancel ignored: unknown id"),
        }
    }

    /// Cancel then re-admit with the original order's type, new `{side,
    /// price, quantity}`. Unknown id yields no trades.
    pub fn modify(&mut self, request: OrderModify) -> Trades {
        let Some(location) = self.orders_by_id.get(&request.id) else {
            return Trades::new();
        };
        let order_type = self.arena.get(location.index).order_type;
        self.cancel(request.id);
        self.add(Order::new_limit(
            order_type,
            request.id,
            request.side,
            request.price,
            request.quantity,
        ))
    }

    /// A consistent point-in-time view of both sides.
    pub fn snapshot(&self) -> OrderBookLevelInfo {
        let level_info = |price: Price, queue: &LevelQueue| LevelInfo {
            price,
            quantity: self.arena.iter(queue).map(|o| o.remaining_quantity).sum(),
        };

        OrderBookLevelInfo {
            bids: self
                .bids
                .iter()
                .rev()
                .map(|(&price, queue)| level_info(price, queue))
                .collect(),
            asks: self
                .asks
                .iter()
                .map(|(&price, queue)| level_info(price, queue))
                .collect(),
        }
    }

    /// Order ids of every resting `GoodForDay` order, for the expiry task.
    pub fn good_for_day_ids(&self) -> Vec<OrderId> {
        self.orders_by_id
            .iter()
            .filter(|(_, loc)| self.arena.get(loc.index).order_type == OrderType::GoodForDay)
            .map(|(&id, _)| id)
            .collect()
    }

    /// Matches crossing levels until the book is no longer crossed or one
    /// side runs dry. Trades are emitted best-price first, FIFO within a
    /// level.
    fn match_orders(&mut self) -> Trades {
        let mut trades = Trades::new();

        while let (Some((&bid_price, _)), Some((&ask_price, _))) =
            (self.bids.last_key_value(), self.asks.first_key_value())
        {
            if bid_price < ask_price {
                break;
            }

            loop {
                let bid_queue = self.bids.get_mut(&bid_price).unwrap();
                let ask_queue = self.asks.get_mut(&ask_price).unwrap();
                let (Some(bid_idx), Some(ask_idx)) =
                    (bid_queue.front_index(), ask_queue.front_index())
                else {
                    break;
                };

                let bid_remaining = self.arena.get(bid_idx).remaining_quantity;
                let ask_remaining = self.arena.get(ask_idx).remaining_quantity;
                let quantity = bid_remaining.min(ask_remaining);

                self.arena
                    .get_mut(bid_idx)
                    .fill(quantity)
                    .expect("quantity is bounded by bid.remaining_quantity");
                self.arena
                    .get_mut(ask_idx)
                    .fill(quantity)
                    .expect("quantity is bounded by ask.remaining_quantity");

                let bid = *self.arena.get(bid_idx);
                let ask = *self.arena.get(ask_idx);

                if bid.is_filled() {
                    self.unlink_order(bid.id);
                    self.level_data.update(bid_price, quantity, LevelAction::Remove);
                } else {
                    self.level_data.update(bid_price, quantity, LevelAction::Match);
                }
                if ask.is_filled() {
                    self.unlink_order(ask.id);
                    self.level_data.update(ask_price, quantity, LevelAction::Remove);
                } else {
                    self.level_data.update(ask_price, quantity, LevelAction::Match);
                }

                info!(
                    bid_id = bid.id,
                    ask_id = ask.id,
                    price = bid.price,
                    quantity,
                    "trade"
                );
                trades.push(Trade {
                    bid: TradeInfo {
                        order_id: bid.id,
                        price: bid.price,
                        quantity,
                    },
                    ask: TradeInfo {
                        order_id: ask.id,
                        price: ask.price,
                        quantity,
                    },
                });

                if bid.is_filled() || ask.is_filled() {
                    let bid_drained = !self.bids.contains_key(&bid_price);
                    let ask_drained = !self.asks.contains_key(&ask_price);
                    if bid_drained || ask_drained {
                        break;
                    }
                }
            }
        }

        trades
    }
}
