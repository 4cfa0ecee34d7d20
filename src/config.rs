/// Tunables for a single [`crate::OrderBookEngine`] instance.
///
/// The reference implementation hardcodes the daily cutoff at 16:00 local
/// time; this struct keeps the same default while letting embedders override
/// it instead of editing a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Hour of the day (0-23, local time) at which `GoodForDay` orders expire.
    pub daily_cutoff_hour: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            daily_cutoff_hour: 16,
        }
    }
}
