use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveTime, TimeZone};
use tracing::{debug, info};

use crate::engine::Shared;

/// Grace period after the computed cutoff before sweeping, so a wakeup that
/// lands a few milliseconds early (spurious wakeup, scheduler jitter) doesn't
/// skip a whole day's cutoff.
const CUTOFF_GRACE: Duration = Duration::from_millis(100);

/// Seconds until the next occurrence of `cutoff_hour:00:00` local time,
/// rolling over to tomorrow if that time has already passed today.
fn seconds_until_next_cutoff(cutoff_hour: u32) -> u64 {
    let now = Local::now();
    let cutoff_time = NaiveTime::from_hms_opt(cutoff_hour, 0, 0).expect("cutoff_hour is 0-23");
    let mut cutoff = now.date_naive().and_time(cutoff_time);
    if cutoff <= now.naive_local() {
        cutoff += chrono::Duration::days(1);
    }
    let cutoff = Local.from_local_datetime(&cutoff).single().unwrap_or(now);
    (cutoff - now).num_seconds().max(0) as u64
}

/// Runs until `shared.shutdown` is set, waking at each day's cutoff to sweep
/// resting `GoodForDay` orders. Survives spurious wakeups and a cutoff with
/// zero expired orders; never exits on its own short of shutdown.
pub(crate) fn run(shared: Arc<Shared>) {
    loop {
        let wait_secs = seconds_until_next_cutoff(shared.config.daily_cutoff_hour);
        debug!(wait_secs, "expiry task sleeping until next cutoff");

        let guard = shared.book.lock().expect("book mutex poisoned");
        let (guard, timeout) = shared
            .cvar
            .wait_timeout(guard, Duration::from_secs(wait_secs) + CUTOFF_GRACE)
            .expect("book mutex poisoned");
        drop(guard);

        if shared.shutdown.load(Ordering::Acquire) {
            info!("expiry task shutting down");
            return;
        }
        if timeout.timed_out() {
            sweep(&shared);
        }
    }
}

fn sweep(shared: &Arc<Shared>) {
    let ids = {
        let book = shared.book.lock().expect("book mutex poisoned");
        book.good_for_day_ids()
    };
    if ids.is_empty() {
        return;
    }
    info!(count = ids.len(), "expiring GoodForDay orders at daily cutoff");
    let mut book = shared.book.lock().expect("book mutex poisoned");
    for id in ids {
        book.cancel(id);
    }
}
