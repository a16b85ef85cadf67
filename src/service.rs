//! Application facade: input validation in front of the provider chain.

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{ExchangeError, ExchangeResult};
use crate::providers::ProviderChain;
use crate::rate_provider::{CashFlow, CurrencyCode, ExchangeRateQuote, TwrResult};
use crate::series::HistoricalSeriesBuilder;

/// Result of converting an amount at the most recent known rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub quote: ExchangeRateQuote,
    pub amount: Decimal,
    /// `amount` times the rate, rounded to two decimal places.
    pub converted_amount: Decimal,
}

/// Validates requests and dispatches them to the provider chain. Invalid
/// input is rejected here, before any provider is consulted.
pub struct ExchangeRateService {
    chain: ProviderChain,
    allowed_currencies: HashSet<CurrencyCode>,
}

impl std::fmt::Debug for ExchangeRateService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeRateService")
            .field("allowed_currencies", &self.allowed_currencies)
            .finish_non_exhaustive()
    }
}

impl ExchangeRateService {
    pub fn new(
        chain: ProviderChain,
        allowed_currencies: impl IntoIterator<Item = CurrencyCode>,
    ) -> Self {
        ExchangeRateService {
            chain,
            allowed_currencies: allowed_currencies.into_iter().collect(),
        }
    }

    pub fn chain(&self) -> &ProviderChain {
        &self.chain
    }

    fn currency(&self, code: &str) -> ExchangeResult<CurrencyCode> {
        let code = CurrencyCode::parse(code)?;
        if !self.allowed_currencies.contains(&code) {
            return Err(ExchangeError::InvalidInput(format!(
                "currency {code} is not in the configured currency list"
            )));
        }
        Ok(code)
    }

    fn currency_pair(
        &self,
        source: &str,
        target: &str,
    ) -> ExchangeResult<(CurrencyCode, CurrencyCode)> {
        Ok((self.currency(source)?, self.currency(target)?))
    }

    /// Fetches the rate for a pair, for a specific day or the latest known.
    pub async fn get_rate(
        &self,
        source: &str,
        target: &str,
        valuation_date: Option<NaiveDate>,
    ) -> ExchangeResult<ExchangeRateQuote> {
        let (source, target) = self.currency_pair(source, target)?;
        self.chain
            .get_exchange_rate(&source, &target, valuation_date)
            .await
    }

    /// Converts an amount at the latest rate, rounded to two decimals.
    pub async fn convert(
        &self,
        source: &str,
        target: &str,
        amount: Decimal,
    ) -> ExchangeResult<Conversion> {
        let (source, target) = self.currency_pair(source, target)?;
        let quote = self.chain.get_exchange_rate(&source, &target, None).await?;
        let converted_amount = (amount * quote.rate_value).round_dp(2);
        Ok(Conversion {
            quote,
            amount,
            converted_amount,
        })
    }

    /// Builds a per-day series for the pair. See
    /// [`HistoricalSeriesBuilder`] for the gap semantics.
    pub async fn get_series(
        &self,
        source: &str,
        target: &str,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> ExchangeResult<Vec<ExchangeRateQuote>> {
        self.get_series_with_progress(source, target, start_date, end_date, &|| ())
            .await
    }

    pub async fn get_series_with_progress(
        &self,
        source: &str,
        target: &str,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        on_day: &(dyn Fn()),
    ) -> ExchangeResult<Vec<ExchangeRateQuote>> {
        let (source, target) = self.currency_pair(source, target)?;
        if let Some(end_date) = end_date {
            if start_date > end_date {
                return Err(ExchangeError::InvalidInput(format!(
                    "start date {start_date} is after end date {end_date}"
                )));
            }
        }
        HistoricalSeriesBuilder::new(&self.chain)
            .build_with_progress(&source, &target, start_date, end_date, on_day)
            .await
    }

    /// Computes a time-weighted return via the first capable provider.
    /// Cash flows must already be ordered by date ascending.
    pub async fn calculate_twr(
        &self,
        source: &str,
        target: &str,
        starting_amount: Decimal,
        start_date: NaiveDate,
        cash_flows: &[CashFlow],
    ) -> ExchangeResult<TwrResult> {
        let (source, target) = self.currency_pair(source, target)?;
        for window in cash_flows.windows(2) {
            if window[1].date < window[0].date {
                return Err(ExchangeError::InvalidInput(
                    "cash flows must be ordered by date ascending".to_string(),
                ));
            }
        }
        self.chain
            .calculate_twr(&source, &target, starting_amount, start_date, cash_flows)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderDescriptor;
    use crate::providers::LocalProvider;
    use crate::rate_provider::RateProvider;
    use crate::store::MemoryRateStore;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn eur() -> CurrencyCode {
        CurrencyCode::parse("EUR").unwrap()
    }

    fn usd() -> CurrencyCode {
        CurrencyCode::parse("USD").unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn service_with_store(store: Arc<MemoryRateStore>) -> ExchangeRateService {
        let chain = ProviderChain::new(vec![(
            ProviderDescriptor {
                name: "local".to_string(),
                priority: 1,
                is_active: true,
            },
            Arc::new(LocalProvider::new(store)) as Arc<dyn RateProvider>,
        )]);
        ExchangeRateService::new(chain, [eur(), usd()])
    }

    fn seeded_service() -> ExchangeRateService {
        let store = Arc::new(MemoryRateStore::new());
        store.insert(eur(), usd(), date(1), dec!(1.10));
        service_with_store(store)
    }

    #[tokio::test]
    async fn test_codes_are_normalized_before_dispatch() {
        let service = seeded_service();

        let quote = service.get_rate("eur", " usd ", Some(date(1))).await.unwrap();

        assert_eq!(quote.rate_value, dec!(1.10));
        assert_eq!(quote.source_currency, eur());
    }

    #[tokio::test]
    async fn test_unknown_currency_is_rejected_before_providers() {
        let service = seeded_service();

        let err = service.get_rate("AUD", "USD", None).await.unwrap_err();

        assert!(matches!(err, ExchangeError::InvalidInput(_)));
        assert!(err.to_string().contains("not in the configured"));
    }

    #[tokio::test]
    async fn test_malformed_currency_is_rejected() {
        let service = seeded_service();

        let err = service.get_rate("EURO", "USD", None).await.unwrap_err();

        assert!(matches!(err, ExchangeError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_convert_rounds_to_two_decimals() {
        let service = seeded_service();

        let conversion = service.convert("EUR", "USD", dec!(123.456)).await.unwrap();

        // 123.456 * 1.10 = 135.8016
        assert_eq!(conversion.converted_amount, dec!(135.80));
        assert_eq!(conversion.amount, dec!(123.456));
        assert_eq!(conversion.quote.rate_value, dec!(1.10));
    }

    #[tokio::test]
    async fn test_inverted_series_range_is_rejected() {
        let service = seeded_service();

        let err = service
            .get_series("EUR", "USD", date(5), Some(date(1)))
            .await
            .unwrap_err();

        assert!(matches!(err, ExchangeError::InvalidInput(_)));
        assert!(err.to_string().contains("after end date"));
    }

    #[tokio::test]
    async fn test_unordered_cash_flows_are_rejected() {
        let service = seeded_service();
        let flows = vec![
            CashFlow {
                date: date(3),
                amount: dec!(100),
            },
            CashFlow {
                date: date(2),
                amount: dec!(50),
            },
        ];

        let err = service
            .calculate_twr("EUR", "USD", dec!(1000), date(1), &flows)
            .await
            .unwrap_err();

        assert!(matches!(err, ExchangeError::InvalidInput(_)));
        assert!(err.to_string().contains("ordered by date"));
    }

    #[tokio::test]
    async fn test_same_day_cash_flows_are_allowed() {
        let service = seeded_service();
        let flows = vec![
            CashFlow {
                date: date(2),
                amount: dec!(100),
            },
            CashFlow {
                date: date(2),
                amount: dec!(-40),
            },
        ];

        let result = service
            .calculate_twr("EUR", "USD", dec!(1000), date(1), &flows)
            .await
            .unwrap();

        // 1000 * 1.10 + 100, then (1200 * 1.10) - 40.
        assert_eq!(result.twr_values, vec![dec!(1200), dec!(1280)]);
        assert_eq!(result.final_twr, dec!(0.10));
    }

    #[tokio::test]
    async fn test_twr_is_idempotent_for_a_deterministic_provider() {
        let service = seeded_service();
        let flows = vec![CashFlow {
            date: date(2),
            amount: dec!(100),
        }];

        let first = service
            .calculate_twr("EUR", "USD", dec!(1000), date(1), &flows)
            .await
            .unwrap();
        let second = service
            .calculate_twr("EUR", "USD", dec!(1000), date(1), &flows)
            .await
            .unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_twr_matches_single_flow_example() {
        let service = seeded_service();
        let flows = vec![CashFlow {
            date: date(2),
            amount: dec!(100),
        }];

        let result = service
            .calculate_twr("EUR", "USD", dec!(1000), date(1), &flows)
            .await
            .unwrap();

        assert_eq!(result.twr_values, vec![dec!(1200)]);
        assert_eq!(result.final_twr, dec!(0.10));
    }
}
