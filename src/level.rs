use std::collections::HashMap;

use crate::orders::{Price, Quantity};

/// Which kind of book event a `LevelDataCache::update` call reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelAction {
    /// An order was admitted at this price. `quantity` is its initial size.
    Add,
    /// An order left the book without matching (cancel, expiry, or the
    /// order that fully filled it is reported separately). `quantity` is
    /// its remaining size at removal.
    Remove,
    /// An order was partially filled and stays resting. `quantity` is the
    /// traded fraction.
    Match,
}

/// Per-price aggregate: total resting quantity and resting order count.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LevelData {
    pub total_quantity: Quantity,
    pub count: u32,
}

/// Maintains `LevelData` per price so the feasibility predicate can answer
/// "how much sits at this price?" without walking every order.
#[derive(Debug, Default)]
pub struct LevelDataCache {
    data: HashMap<Price, LevelData>,
}

impl LevelDataCache {
    pub fn get(&self, price: Price) -> Option<LevelData> {
        self.data.get(&price).copied()
    }

    /// Applies `action` at `price`, removing the entry once its count hits
    /// zero.
    pub fn update(&mut self, price: Price, quantity: Quantity, action: LevelAction) {
        let entry = self.data.entry(price).or_default();
        match action {
            LevelAction::Add => {
                entry.count += 1;
                entry.total_quantity += quantity;
            }
            LevelAction::Remove => {
                entry.count -= 1;
                entry.total_quantity -= quantity;
            }
            LevelAction::Match => {
                entry.total_quantity -= quantity;
            }
        }
        if entry.count == 0 {
            self.data.remove(&price);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_match_then_remove_tracks_aggregate() {
        let mut cache = LevelDataCache::default();
        cache.update(100, 10, LevelAction::Add);
        assert_eq!(
            cache.get(100),
            Some(LevelData {
                total_quantity: 10,
                count: 1
            })
        );

        cache.update(100, 4, LevelAction::Match);
        assert_eq!(
            cache.get(100),
            Some(LevelData {
                total_quantity: 6,
                count: 1
            })
        );

        cache.update(100, 6, LevelAction::Remove);
        assert_eq!(cache.get(100), None);
    }

    #[test]
    fn two_orders_at_a_price_keep_independent_counts() {
        let mut cache = LevelDataCache::default();
        cache.update(100, 5, LevelAction::Add);
        cache.update(100, 5, LevelAction::Add);
        assert_eq!(cache.get(100).unwrap().count, 2);

        cache.update(100, 5, LevelAction::Remove);
        let remaining = cache.get(100).unwrap();
        assert_eq!(remaining.count, 1);
        assert_eq!(remaining.total_quantity, 5);
    }
}
