use soroban_sdk::{contractclient, contracttype, Env};

/// A single oracle observation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PriceData {
    /// Monotonically increasing round counter.
    pub round_id: u32,
    /// USD price of one whole token, scaled by `10^decimals()`.
    pub answer: i128,
    /// Ledger timestamp the answer was recorded at.
    pub timestamp: u64,
}

/// Read-only surface of the USD price oracle consumed by `fund`.
///
/// Live networks point this at a deployed feed; tests and development
/// networks use the `mock-price-feed` contract in this workspace.
#[contractclient(name = "PriceFeedClient")]
pub trait PriceFeed {
    /// The most recent observation.
    fn latest_round_data(env: Env) -> PriceData;

    /// Decimal scale of [`PriceData::answer`].
    fn decimals(env: Env) -> u32;

    /// Interface version reported by the feed.
    fn version(env: Env) -> u32;
}
