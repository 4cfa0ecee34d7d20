use crate::orders::{OrderId, Price, Quantity};

/// One side's view of a trade: the resting order's id, its own resting
/// price, and the quantity it filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeInfo {
    pub order_id: OrderId,
    pub price: Price,
    pub quantity: Quantity,
}

/// A single match between a bid and an ask. Both sides carry the same
/// quantity; prices can differ only in the sense that each is the resting
/// price of its own order (at rest these are equal for a crossing pair — see
/// the matching core's termination condition).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trade {
    pub bid: TradeInfo,
    pub ask: TradeInfo,
}

pub type Trades = Vec<Trade>;
