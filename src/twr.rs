//! Time-weighted return over a dated quote series.

use rust_decimal::Decimal;

use crate::rate_provider::{CashFlow, ExchangeRateQuote, TwrResult};

/// Computes the balance trajectory and final return for a quote series.
///
/// `quotes` and `cash_flows` must both be ordered by date ascending. At
/// each cash flow the balance is multiplied by every quote dated on or
/// before that flow, including quotes already applied at earlier flows,
/// and the flow amount is then added. The final return compounds the
/// whole series once: the product of all rate values minus one. An empty
/// series therefore yields a final return of zero.
pub fn calculate(
    starting_amount: Decimal,
    quotes: &[ExchangeRateQuote],
    cash_flows: &[CashFlow],
) -> TwrResult {
    let mut twr_values = Vec::with_capacity(cash_flows.len());
    let mut balance = starting_amount;

    for flow in cash_flows {
        for quote in quotes {
            if quote.valuation_date <= flow.date {
                balance *= quote.rate_value;
            }
        }
        balance += flow.amount;
        twr_values.push(balance);
    }

    let compounded = quotes
        .iter()
        .fold(Decimal::ONE, |acc, quote| acc * quote.rate_value);

    TwrResult {
        twr_values,
        final_twr: compounded - Decimal::ONE,
    }
}
