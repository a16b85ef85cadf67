//! Day-by-day assembly of historical series across the provider chain.

use chrono::{Duration, NaiveDate, Utc};
use tracing::debug;

use crate::error::{ExchangeError, ExchangeResult};
use crate::providers::ProviderChain;
use crate::rate_provider::{CurrencyCode, ExchangeRateQuote};

/// Builds sparse per-day series by asking the whole chain once per day.
/// A day where every provider comes up empty is left out of the result,
/// never zero-filled.
pub struct HistoricalSeriesBuilder<'a> {
    chain: &'a ProviderChain,
}

impl<'a> HistoricalSeriesBuilder<'a> {
    pub fn new(chain: &'a ProviderChain) -> Self {
        HistoricalSeriesBuilder { chain }
    }

    /// Collects quotes for each day from `start_date` through `end_date`
    /// (today when omitted), in ascending date order.
    pub async fn build(
        &self,
        source: &CurrencyCode,
        target: &CurrencyCode,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> ExchangeResult<Vec<ExchangeRateQuote>> {
        self.build_with_progress(source, target, start_date, end_date, &|| ())
            .await
    }

    /// Same as [`build`](Self::build), invoking `on_day` after each day is
    /// resolved, found or not.
    pub async fn build_with_progress(
        &self,
        source: &CurrencyCode,
        target: &CurrencyCode,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        on_day: &(dyn Fn()),
    ) -> ExchangeResult<Vec<ExchangeRateQuote>> {
        let end_date = end_date.unwrap_or_else(|| Utc::now().date_naive());
        let mut series = Vec::new();
        let mut current = start_date;

        while current <= end_date {
            match self
                .chain
                .get_exchange_rate(source, target, Some(current))
                .await
            {
                Ok(quote) => series.push(quote),
                Err(ExchangeError::AllProvidersExhausted { .. }) => {
                    debug!("No provider had {}/{} on {}, omitting day", source, target, current);
                }
                Err(err) => return Err(err),
            }
            on_day();
            current = current + Duration::days(1);
        }

        Ok(series)
    }
}
