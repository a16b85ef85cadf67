//! In-memory rate store backed by per-pair date-ordered maps.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{RateRecord, RateStore};
use crate::rate_provider::CurrencyCode;

type PairKey = (CurrencyCode, CurrencyCode);

/// Thread-safe in-memory store. Rates for each currency pair live in a
/// `BTreeMap` keyed by valuation date, so latest and range lookups come
/// back in date order without sorting.
pub struct MemoryRateStore {
    rates: RwLock<HashMap<PairKey, BTreeMap<NaiveDate, Decimal>>>,
}

impl MemoryRateStore {
    pub fn new() -> Self {
        Self {
            rates: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts or replaces the rate for a pair on a date.
    pub fn insert(
        &self,
        source: CurrencyCode,
        target: CurrencyCode,
        valuation_date: NaiveDate,
        rate_value: Decimal,
    ) {
        let mut rates = self.rates.write().unwrap();
        rates
            .entry((source, target))
            .or_default()
            .insert(valuation_date, rate_value);
    }
}

impl Default for MemoryRateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateStore for MemoryRateStore {
    async fn find(
        &self,
        source: &CurrencyCode,
        target: &CurrencyCode,
        valuation_date: NaiveDate,
    ) -> Result<Option<RateRecord>> {
        let rates = self.rates.read().unwrap();
        Ok(rates
            .get(&(source.clone(), target.clone()))
            .and_then(|tree| tree.get(&valuation_date))
            .map(|rate_value| RateRecord {
                valuation_date,
                rate_value: *rate_value,
            }))
    }

    async fn latest(
        &self,
        source: &CurrencyCode,
        target: &CurrencyCode,
    ) -> Result<Option<RateRecord>> {
        let rates = self.rates.read().unwrap();
        Ok(rates
            .get(&(source.clone(), target.clone()))
            .and_then(|tree| tree.iter().next_back())
            .map(|(valuation_date, rate_value)| RateRecord {
                valuation_date: *valuation_date,
                rate_value: *rate_value,
            }))
    }

    async fn find_range(
        &self,
        source: &CurrencyCode,
        target: &CurrencyCode,
        start_date: NaiveDate,
    ) -> Result<Vec<RateRecord>> {
        let rates = self.rates.read().unwrap();
        Ok(rates
            .get(&(source.clone(), target.clone()))
            .map(|tree| {
                tree.range(start_date..)
                    .map(|(valuation_date, rate_value)| RateRecord {
                        valuation_date: *valuation_date,
                        rate_value: *rate_value,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}
