use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::error::{ProviderError, ProviderResult};
use crate::rate_provider::{CashFlow, CurrencyCode, ExchangeRateQuote, RateProvider, TwrResult};
use crate::twr;

/// Adapter for the Fixer HTTP API.
///
/// Latest rates come from `{base_url}/latest`, historical rates from
/// `{base_url}/{YYYY-MM-DD}`. Every request carries the access key.
pub struct FixerProvider {
    base_url: String,
    access_key: String,
}

impl FixerProvider {
    pub fn new(base_url: &str, access_key: &str) -> Self {
        FixerProvider {
            base_url: base_url.to_string(),
            access_key: access_key.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct FixerResponse {
    success: bool,
    date: Option<String>,
    #[serde(default)]
    rates: HashMap<String, Decimal>,
    error: Option<FixerApiError>,
}

#[derive(Deserialize, Debug)]
struct FixerApiError {
    code: Option<u32>,
    #[serde(rename = "type")]
    kind: Option<String>,
    info: Option<String>,
}

impl FixerApiError {
    fn describe(&self) -> String {
        let kind = self
            .kind
            .as_deref()
            .or(self.info.as_deref())
            .unwrap_or("unknown error");
        match self.code {
            Some(code) => format!("{kind} (code {code})"),
            None => kind.to_string(),
        }
    }
}

#[async_trait]
impl RateProvider for FixerProvider {
    fn name(&self) -> &str {
        "fixer"
    }

    #[instrument(
        name = "FixerRateFetch",
        skip(self),
        fields(source = %source, target = %target)
    )]
    async fn get_exchange_rate(
        &self,
        source: &CurrencyCode,
        target: &CurrencyCode,
        valuation_date: Option<NaiveDate>,
    ) -> ProviderResult<ExchangeRateQuote> {
        let endpoint = match valuation_date {
            Some(date) => format!("{}/{}", self.base_url, date.format("%Y-%m-%d")),
            None => format!("{}/latest", self.base_url),
        };
        debug!("Requesting exchange rate from {}", endpoint);

        let client = reqwest::Client::builder().user_agent("fxr/1.0").build()?;
        let response = client
            .get(&endpoint)
            .query(&[
                ("access_key", self.access_key.as_str()),
                ("base", source.as_str()),
                ("symbols", target.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Unavailable(format!(
                "HTTP error: {} for pair: {}/{}",
                response.status(),
                source,
                target
            )));
        }

        let text = response.text().await?;

        let data: FixerResponse = serde_json::from_str(&text)
            .map_err(|e| ProviderError::Unavailable(format!("Failed to parse API response: {e}")))?;

        if !data.success {
            let reason = data
                .error
                .map(|e| e.describe())
                .unwrap_or_else(|| "API reported failure without details".to_string());
            return Err(ProviderError::Unavailable(format!("API error: {reason}")));
        }

        let rate_value = data
            .rates
            .get(target.as_str())
            .copied()
            .ok_or(ProviderError::NotFound)?;

        // Dated requests echo the requested day; /latest trusts the API date.
        let valuation_date = match valuation_date {
            Some(date) => date,
            None => data
                .date
                .as_deref()
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
                .ok_or_else(|| {
                    ProviderError::Unavailable("API response is missing a usable date".to_string())
                })?,
        };

        Ok(ExchangeRateQuote {
            source_currency: source.clone(),
            exchanged_currency: target.clone(),
            valuation_date,
            rate_value,
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
            match self.get_exchange_rate(source, target, Some(current)).await {
                Ok(quote) => rates.push(quote),
                Err(ProviderError::NotFound) => {
                    debug!("No rate for {}/{} on {}", source, target, current);
                }
                Err(err) => {
                    warn!("Skipping {} for {}/{}: {}", current, source, target, err);
                }
            }
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
        debug!("Computing TWR over {} fetched quotes", quotes.len());
        Ok(twr::calculate(starting_amount, &quotes, cash_flows))
    }
}
