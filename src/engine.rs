use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;

use crate::config::EngineConfig;
use crate::expiry;
use crate::orderbook::{OrderBook, OrderBookLevelInfo, OrderModify};
use crate::orders::{Order, OrderId};
use crate::trade::Trades;

/// State shared between [`OrderBookEngine`] and its background expiry
/// thread. `cvar` is bound to `book`: the expiry task waits on it holding
/// `book`'s lock, and [`OrderBookEngine::drop`] notifies it to wake early on
/// shutdown.
pub(crate) struct Shared {
    pub(crate) book: Mutex<OrderBook>,
    pub(crate) cvar: Condvar,
    pub(crate) shutdown: AtomicBool,
    pub(crate) config: EngineConfig,
}

/// A single-instrument matching engine: an [`OrderBook`] behind one
/// exclusive lock, plus a background thread that sweeps `GoodForDay` orders
/// at the configured daily cutoff. Matches the reference implementation's
/// one-lock-for-everything concurrency model — there's no reader/writer
/// split, since every public operation here can mutate the book.
pub struct OrderBookEngine {
    shared: Arc<Shared>,
    expiry_thread: Option<JoinHandle<()>>,
}

impl OrderBookEngine {
    pub fn new(config: EngineConfig) -> Self {
        let shared = Arc::new(Shared {
            book: Mutex::new(OrderBook::new()),
            cvar: Condvar::new(),
            shutdown: AtomicBool::new(false),
            config,
        });
        let expiry_thread = {
            let shared = Arc::clone(&shared);
            std::thread::spawn(move || expiry::run(shared))
        };
        Self {
            shared,
            expiry_thread: Some(expiry_thread),
        }
    }

    /// Admits `order`, returning the trades it produced.
    pub fn add(&self, order: Order) -> Trades {
        self.shared.book.lock().expect("book mutex poisoned").add(order)
    }

    /// Cancels a resting order; a no-op for an unknown id.
    pub fn cancel(&self, order_id: OrderId) {
        self.shared.book.lock().expect("book mutex poisoned").cancel(order_id);
    }

    /// Cancels and re-admits a resting order under a new price/quantity.
    pub fn modify(&self, request: OrderModify) -> Trades {
        self.shared
            .book
            .lock()
            .expect("book mutex poisoned")
            .modify(request)
    }

    /// Number of resting orders.
    pub fn size(&self) -> usize {
        self.shared.book.lock().expect("book mutex poisoned").size()
    }

    /// A consistent point-in-time view of both sides of the book.
    pub fn snapshot(&self) -> OrderBookLevelInfo {
        self.shared.book.lock().expect("book mutex poisoned").snapshot()
    }
}

impl Default for OrderBookEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Drop for OrderBookEngine {
    fn drop(&mut self) {
        self.shared.shutdown.store(true, Ordering::Release);
        self.shared.cvar.notify_all();
        if let Some(handle) = self.expiry_thread.take() {
            let _ = handle.join();
        }
    }
}
