use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::rate_provider::{CashFlow, CurrencyCode, ExchangeRateQuote, RateProvider, TwrResult};
use crate::store::{RateRecord, RateStore};
use crate::twr;

/// Serves rates from the locally configured store. Never touches the
/// network, so it also acts as the offline fallback in the chain.
pub struct LocalProvider {
    store: Arc<dyn RateStore>,
}

impl LocalProvider {
    pub fn new(store: Arc<dyn RateStore>) -> Self {
        LocalProvider { store }
    }

    fn to_quote(
        &self,
        source: &CurrencyCode,
        target: &CurrencyCode,
        record: RateRecord,
    ) -> ExchangeRateQuote {
        ExchangeRateQuote {
            source_currency: source.clone(),
            exchanged_currency: target.clone(),
            valuation_date: record.valuation_date,
            rate_value: record.rate_value,
            provider: self.name().to_string(),
        }
    }
}

#[async_trait]
impl RateProvider for LocalProvider {
    fn name(&self) -> &str {
        "local"
    }

    async fn get_exchange_rate(
        &self,
        source: &CurrencyCode,
        target: &CurrencyCode,
        valuation_date: Option<NaiveDate>,
    ) -> ProviderResult<ExchangeRateQuote> {
        let record = match valuation_date {
            Some(date) => self.store.find(source, target, date).await,
            None => self.store.latest(source, target).await,
        }
        .map_err(|e| ProviderError::Unavailable(format!("store error: {e}")))?;

        record
            .map(|r| self.to_quote(source, target, r))
            .ok_or(ProviderError::NotFound)
    }

    async fn get_historical_rates(
        &self,
        source: &CurrencyCode,
        target: &CurrencyCode,
        start_date: NaiveDate,
    ) -> ProviderResult<Vec<ExchangeRateQuote>> {
        let today = Utc::now().date_naive();
        let records = self
            .store
            .find_range(source, target, start_date)
            .await
            .map_err(|e| ProviderError::Unavailable(format!("store error: {e}")))?;

        // The series spans start through today; forward-dated rows stay out.
        let quotes = records
            .into_iter()
            .filter(|record| record.valuation_date <= today)
            .map(|record| self.to_quote(source, target, record))
            .collect();
        Ok(quotes)
    }

    fn supports_twr(&self) -> bool {
        true
    }

    async fn calculate_twr(
        &self,
        source: &CurrencyCode,
        target: &CurrencyCode,
        starting_amount: Decimal,
        start_date: NaiveDate,
        cash_flows: &[CashFlow],
    ) -> ProviderResult<TwrResult> {
        let quotes = self.get_historical_rates(source, target, start_date).await?;
        debug!("Computing TWR over {} local quotes", quotes.len());
        Ok(twr::calculate(starting_amount, &quotes, cash_flows))
    }
}
