//! Priority-ordered provider dispatch with first-success fallback.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::ProviderDescriptor;
use crate::error::{ExchangeError, ExchangeResult, ProviderError};
use crate::rate_provider::{CashFlow, CurrencyCode, ExchangeRateQuote, RateProvider, TwrResult};

struct ChainEntry {
    descriptor: ProviderDescriptor,
    provider: Arc<dyn RateProvider>,
}

/// Dispatches each request across the configured providers in descending
/// priority order and returns the first usable answer. A provider that is
/// unavailable or has no data hands over to the next one; only when every
/// provider has been tried does the chain report exhaustion.
pub struct ProviderChain {
    entries: Vec<ChainEntry>,
}

impl ProviderChain {
    /// Builds a chain from configured descriptors. Inactive entries are
    /// dropped; entries with equal priority keep their configured order.
    pub fn new(providers: Vec<(ProviderDescriptor, Arc<dyn RateProvider>)>) -> Self {
        let mut entries: Vec<ChainEntry> = providers
            .into_iter()
            .filter(|(descriptor, _)| descriptor.is_active)
            .map(|(descriptor, provider)| ChainEntry {
                descriptor,
                provider,
            })
            .collect();
        entries.sort_by_key(|entry| std::cmp::Reverse(entry.descriptor.priority));
        ProviderChain { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Provider names in dispatch order.
    pub fn provider_names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|entry| entry.provider.name())
            .collect()
    }

    pub async fn get_exchange_rate(
        &self,
        source: &CurrencyCode,
        target: &CurrencyCode,
        valuation_date: Option<NaiveDate>,
    ) -> ExchangeResult<ExchangeRateQuote> {
        for entry in &self.entries {
            let name = entry.provider.name();
            match entry
                .provider
                .get_exchange_rate(source, target, valuation_date)
                .await
            {
                Ok(quote) => {
                    debug!("Provider {} answered for {}/{}", name, source, target);
                    return Ok(quote);
                }
                Err(ProviderError::NotFound) => {
                    debug!("Provider {} has no rate for {}/{}", name, source, target);
                }
                Err(ProviderError::Unavailable(reason)) => {
                    warn!("Provider {} unavailable: {}", name, reason);
                }
                Err(ProviderError::Unsupported) => {
                    debug!("Provider {} does not support rate lookups", name);
                }
            }
        }

        Err(ExchangeError::AllProvidersExhausted {
            operation: "exchange rate",
            source_currency: source.clone(),
            target_currency: target.clone(),
        })
    }

    /// Returns the first non-empty series any provider produces.
    pub async fn get_historical_rates(
        &self,
        source: &CurrencyCode,
        target: &CurrencyCode,
        start_date: NaiveDate,
    ) -> ExchangeResult<Vec<ExchangeRateQuote>> {
        for entry in &self.entries {
            let name = entry.provider.name();
            match entry
                .provider
                .get_historical_rates(source, target, start_date)
                .await
            {
                Ok(quotes) if quotes.is_empty() => {
                    debug!("Provider {} returned an empty series for {}/{}", name, source, target);
                }
                Ok(quotes) => {
                    debug!("Provider {} answered with {} quotes", name, quotes.len());
                    return Ok(quotes);
                }
                Err(ProviderError::NotFound) => {
                    debug!("Provider {} has no series for {}/{}", name, source, target);
                }
                Err(ProviderError::Unavailable(reason)) => {
                    warn!("Provider {} unavailable: {}", name, reason);
                }
                Err(ProviderError::Unsupported) => {
                    debug!("Provider {} does not support series lookups", name);
                }
            }
        }

        Err(ExchangeError::AllProvidersExhausted {
            operation: "historical rates",
            source_currency: source.clone(),
            target_currency: target.clone(),
        })
    }

    /// Asks the first TWR-capable provider; providers without the
    /// capability are skipped without logging noise.
    pub async fn calculate_twr(
        &self,
        source: &CurrencyCode,
        target: &CurrencyCode,
        starting_amount: Decimal,
        start_date: NaiveDate,
        cash_flows: &[CashFlow],
    ) -> ExchangeResult<TwrResult> {
        for entry in &self.entries {
            let name = entry.provider.name();
            if !entry.provider.supports_twr() {
                debug!("Provider {} does not support TWR, skipping", name);
                continue;
            }
            match entry
                .provider
                .calculate_twr(source, target, starting_amount, start_date, cash_flows)
                .await
            {
                Ok(result) => {
                    debug!("Provider {} computed the TWR", name);
                    return Ok(result);
                }
                Err(ProviderError::Unsupported) => {
                    debug!("Provider {} declined the TWR", name);
                }
                Err(ProviderError::NotFound) => {
                    debug!("Provider {} has no series for {}/{}", name, source, target);
                }
                Err(ProviderError::Unavailable(reason)) => {
                    warn!("Provider {} unavailable: {}", name, reason);
                }
            }
        }

        Err(ExchangeError::AllProvidersExhausted {
            operation: "TWR",
            source_currency: source.clone(),
            target_currency: target.clone(),
        })
    }
}
