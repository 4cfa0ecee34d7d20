use thiserror::Error;

use crate::orders::{OrderId, Quantity};

/// Usage faults from the order model: caller contract violations, not
/// business rejections. The matching core treats a violation here as an
/// invariant break and panics rather than propagating it; callers that touch
/// `Order::fill`/`Order::promote_to_limit` directly may handle the `Result`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    #[error("order {order_id} cannot be filled for {requested} units, only {remaining} remain")]
    FillExceedsRemaining {
        order_id: OrderId,
        requested: Quantity,
        remaining: Quantity,
    },

    #[error("order {order_id} cannot be promoted to a limit order, only Market orders can")]
    PromoteNonMarketOrder { order_id: OrderId },
}
