use crate::errors::EngineError;

/// Price in ticks, not currency units. Signed so a level's price can be
/// compared uniformly across both sides of the book.
pub type Price = i32;
/// Resting/remaining size, always non-negative.
pub type Quantity = u32;
/// Caller-supplied identity. The engine never mints ids itself.
pub type OrderId = u64;

/// Which side of the book an order rests on or crosses against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// The side an incoming order of this side would match against.
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Admission and residual-handling semantics for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderType {
    /// Rests until filled or cancelled.
    GoodTillCancel,
    /// As `GoodTillCancel`, but swept by the expiry task at the daily cutoff.
    GoodForDay,
    /// Any quantity left after the single matching pass is cancelled.
    FillAndKill,
    /// Admitted only if it can be filled in full immediately, else rejected.
    FillOrKill,
    /// Promoted to a `GoodTillCancel` limit at the opposite side's worst
    /// resting price on admission; rejected if that side is empty.
    Market,
}

/// A single order's identity plus its mutable fill state.
///
/// Invariant: `0 <= remaining_quantity <= initial_quantity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub side: Side,
    pub order_type: OrderType,
    /// Limit price. Unspecified for a fresh `Market` order until
    /// `promote_to_limit` sets it — nothing reads it before that happens.
    pub price: Price,
    pub initial_quantity: Quantity,
    pub remaining_quantity: Quantity,
}

impl Order {
    /// A resting limit-like order: `GoodTillCancel`, `GoodForDay`,
    /// `FillAndKill`, or `FillOrKill`.
    pub fn new_limit(
        order_type: OrderType,
        id: OrderId,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Self {
        Self {
            id,
            side,
            order_type,
            price,
            initial_quantity: quantity,
            remaining_quantity: quantity,
        }
    }

    /// A fresh `Market` order. Its price is meaningless until `add` promotes
    /// it via [`Order::promote_to_limit`].
    pub fn new_market(id: OrderId, side: Side, quantity: Quantity) -> Self {
        Self {
            id,
            side,
            order_type: OrderType::Market,
            price: 0,
            initial_quantity: quantity,
            remaining_quantity: quantity,
        }
    }

    pub fn filled_quantity(&self) -> Quantity {
        self.initial_quantity - self.remaining_quantity
    }

    pub fn is_filled(&self) -> bool {
        self.remaining_quantity == 0
    }

    /// Decreases `remaining_quantity` by `quantity`. Fails if `quantity`
    /// exceeds what remains — a logic fault, since the matching core never
    /// requests more than `min(bid.remaining, ask.remaining)`.
    pub fn fill(&mut self, quantity: Quantity) -> Result<(), EngineError> {
        if quantity > self.remaining_quantity {
            return Err(EngineError::FillExceedsRemaining {
                order_id: self.id,
                requested: quantity,
                remaining: self.remaining_quantity,
            });
        }
        self.remaining_quantity -= quantity;
        Ok(())
    }

    /// Transitions a `Market` order into a resting `GoodTillCancel` limit at
    /// `price`. Legal only while `order_type == Market`.
    pub fn promote_to_limit(&mut self, price: Price) -> Result<(), EngineError> {
        if self.order_type != OrderType::Market {
            return Err(EngineError::PromoteNonMarketOrder { order_id: self.id });
        }
        self.price = price;
        self.order_type = OrderType::GoodTillCancel;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_decreases_remaining_and_tracks_filled() {
        let mut order = Order::new_limit(OrderType::GoodTillCancel, 1, Side::Buy, 100, 10);
        order.fill(4).unwrap();
        assert_eq!(order.remaining_quantity, 6);
        assert_eq!(order.filled_quantity(), 4);
        assert!(!order.is_filled());
    }

    #[test]
    fn fill_to_zero_marks_filled() {
        let mut order = Order::new_limit(OrderType::GoodTillCancel, 1, Side::Buy, 100, 10);
        order.fill(10).unwrap();
        assert!(order.is_filled());
    }

    #[test]
    fn fill_beyond_remaining_is_a_logic_fault() {
        let mut order = Order::new_limit(OrderType::GoodTillCancel, 1, Side::Buy, 100, 5);
        let err = order.fill(6).unwrap_err();
        assert_eq!(
            err,
            EngineError::FillExceedsRemaining {
                order_id: 1,
                requested: 6,
                remaining: 5,
            }
        );
    }

    #[test]
    fn promote_market_order_becomes_good_till_cancel() {
        let mut order = Order::new_market(1, Side::Buy, 10);
        order.promote_to_limit(105).unwrap();
        assert_eq!(order.order_type, OrderType::GoodTillCancel);
        assert_eq!(order.price, 105);
    }

    #[test]
    fn promote_non_market_order_is_rejected() {
        let mut order = Order::new_limit(OrderType::GoodTillCancel, 1, Side::Buy, 100, 10);
        let err = order.promote_to_limit(105).unwrap_err();
        assert_eq!(err, EngineError::PromoteNonMarketOrder { order_id: 1 });
    }
}
