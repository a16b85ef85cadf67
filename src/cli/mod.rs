//! Command implementations and shared argument parsing.

pub mod convert;
pub mod currencies;
pub mod rate;
pub mod series;
pub mod setup;
pub mod twr;
pub mod ui;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{ExchangeError, ExchangeResult};
use crate::rate_provider::CashFlow;

/// Parses a `YYYY-MM-DD` command line date.
pub fn parse_date(value: &str) -> ExchangeResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ExchangeError::InvalidInput(format!("invalid date '{value}', expected YYYY-MM-DD"))
    })
}

/// Parses a decimal amount.
pub fn parse_amount(value: &str) -> ExchangeResult<Decimal> {
    value
        .parse::<Decimal>()
        .map_err(|_| ExchangeError::InvalidInput(format!("invalid amount '{value}'")))
}

/// Parses `YYYY-MM-DD:AMOUNT` cash flow arguments and orders them by date.
pub fn parse_cash_flows(values: &[String]) -> ExchangeResult<Vec<CashFlow>> {
    let mut flows = Vec::with_capacity(values.len());
    for value in values {
        let (date, amount) = value.split_once(':').ok_or_else(|| {
            ExchangeError::InvalidInput(format!(
                "invalid cash flow '{value}', expected YYYY-MM-DD:AMOUNT"
            ))
        })?;
        flows.push(CashFlow {
            date: parse_date(date)?,
            amount: parse_amount(amount)?,
        });
    }
    flows.sort_by_key(|flow| flow.date);
    Ok(flows)
}
