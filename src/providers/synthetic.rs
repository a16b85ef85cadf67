use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

use crate::error::ProviderResult;
use crate::rate_provider::{CashFlow, CurrencyCode, ExchangeRateQuote, RateProvider, TwrResult};
use crate::twr;

/// Pseudo-random rate source for demos and offline testing.
///
/// Rates are uniform in [0.5, 1.5] with six decimal places. The generator
/// is seeded, so the same seed and call sequence reproduce the same rates.
pub struct SyntheticProvider {
    rng: Mutex<StdRng>,
}

impl SyntheticProvider {
    pub fn new(seed: u64) -> Self {
        SyntheticProvider {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn next_rate(&self) -> Decimal {
        let mut rng = self.rng.lock().unwrap();
        Decimal::new(rng.gen_range(500_000..=1_500_000), 6)
    }
}

#[async_trait]
impl RateProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    async fn get_exchange_rate(
        &self,
        source: &CurrencyCode,
        target: &CurrencyCode,
        valuation_date: Option<NaiveDate>,
    ) -> ProviderResult<ExchangeRateQuote> {
        let valuation_date = valuation_date.unwrap_or_else(|| Utc::now().date_naive());
        Ok(ExchangeRateQuote {
            source_currency: source.clone(),
            exchanged_currency: target.clone(),
            valuation_date,
            rate_value: self.next_rate(),
            provider: self.name().to_string(),
        })
    }

    async fn get_historical_rates(
        &self,
        source: &CurrencyCode,
        target: &CurrencyCode,
        start_date: NaiveDate,
    ) -> ProviderResult<Vec<ExchangeRateQuote>> {
        let today = Utc::now().date_naive();
        let mut rates = Vec::new();
        let mut current = start_date;

        while current <= today {
            let quote = self.get_exchange_rate(source, target, Some(current)).await?;
            rates.push(quote);
            current = current + Duration::days(1);
        }

        Ok(rates)
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
        Ok(twr::calculate(starting_amount, &quotes, cash_flows))
    }
}
