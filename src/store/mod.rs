pub mod memory;

pub use memory::MemoryRateStore;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::rate_provider::CurrencyCode;

/// A dated rate observation as held by a quote store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateRecord {
    pub valuation_date: NaiveDate,
    pub rate_value: Decimal,
}

/// Storage backend for locally known exchange rates.
///
/// An `Err` means the store itself failed; a missing row is `Ok(None)` or
/// an empty vector.
#[async_trait]
pub trait RateStore: Send + Sync {
    /// Looks up the rate for a pair on an exact date.
    async fn find(
        &self,
        source: &CurrencyCode,
        target: &CurrencyCode,
        valuation_date: NaiveDate,
    ) -> Result<Option<RateRecord>>;

    /// Returns the most recent rate known for a pair.
    async fn latest(
        &self,
        source: &CurrencyCode,
        target: &CurrencyCode,
    ) -> Result<Option<RateRecord>>;

    /// Returns all rates for a pair dated on or after `start_date`, ordered
    /// by date ascending.
    async fn find_range(
        &self,
        source: &CurrencyCode,
        target: &CurrencyCode,
        start_date: NaiveDate,
    ) -> Result<Vec<RateRecord>>;
}
