//! Provider capability surface for currency exchange rates.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{ExchangeError, ProviderError, ProviderResult};

/// An ISO 4217 style currency code: exactly three ASCII letters, stored
/// uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Validates and normalizes a raw code. Surrounding whitespace is
    /// trimmed and the result is uppercased.
    pub fn parse(code: &str) -> Result<Self, ExchangeError> {
        let trimmed = code.trim();
        if trimmed.len() == 3 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(CurrencyCode(trimmed.to_ascii_uppercase()))
        } else {
            Err(ExchangeError::InvalidInput(format!(
                "currency code '{code}' must be exactly three letters"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single dated exchange rate observation.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRateQuote {
    pub source_currency: CurrencyCode,
    pub exchanged_currency: CurrencyCode,
    pub valuation_date: NaiveDate,
    pub rate_value: Decimal,
    /// Name of the provider that produced this quote.
    pub provider: String,
}

/// An external amount added to the running balance on a given date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CashFlow {
    pub date: NaiveDate,
    pub amount: Decimal,
}

/// Output of a time-weighted return calculation: the balance after each
/// cash flow and the compounded return over the whole series.
#[derive(Debug, Clone, PartialEq)]
pub struct TwrResult {
    pub twr_values: Vec<Decimal>,
    pub final_twr: Decimal,
}

/// A source of exchange rate data.
///
/// Implementations answer point quotes and day-by-day historical series;
/// providers that can also compute a time-weighted return over their own
/// series advertise it through [`supports_twr`](Self::supports_twr).
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Short identifier used to tag quotes and log lines.
    fn name(&self) -> &str;

    /// Fetches the rate for a currency pair. A `valuation_date` of `None`
    /// means the most recent rate the provider knows.
    async fn get_exchange_rate(
        &self,
        source: &CurrencyCode,
        target: &CurrencyCode,
        valuation_date: Option<NaiveDate>,
    ) -> ProviderResult<ExchangeRateQuote>;

    /// Fetches one quote per day from `start_date` through today. Days
    /// without data are omitted; the result is ordered by date ascending.
    async fn get_historical_rates(
        &self,
        source: &CurrencyCode,
        target: &CurrencyCode,
        start_date: NaiveDate,
    ) -> ProviderResult<Vec<ExchangeRateQuote>>;

    /// Whether this provider implements [`calculate_twr`](Self::calculate_twr).
    fn supports_twr(&self) -> bool {
        false
    }

    /// Computes a time-weighted return over this provider's own quote
    /// series starting at `start_date`.
    async fn calculate_twr(
        &self,
        _source: &CurrencyCode,
        _target: &CurrencyCode,
        _starting_amount: Decimal,
        _start_date: NaiveDate,
        _cash_flows: &[CashFlow],
    ) -> ProviderResult<TwrResult> {
        Err(ProviderError::Unsupported)
    }
}
