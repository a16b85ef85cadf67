use super::ui;
use crate::service::ExchangeRateService;
use anyhow::Result;
use comfy_table::Cell;

/// Fetches and displays a single rate, latest or for a specific day.
pub async fn run(
    service: &ExchangeRateService,
    source: &str,
    target: &str,
    date: Option<&str>,
) -> Result<()> {
    let valuation_date = date.map(super::parse_date).transpose()?;
    let quote = service.get_rate(source, target, valuation_date).await?;

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Pair"),
        ui::header_cell("Date"),
        ui::header_cell("Rate"),
        ui::header_cell("Provider"),
    ]);
    table.add_row(vec![
        Cell::new(format!(
            "{}/{}",
            quote.source_currency, quote.exchanged_currency
        )),
        Cell::new(quote.valuation_date.to_string()),
        ui::decimal_cell(quote.rate_value),
        Cell::new(&quote.provider),
    ]);

    println!("{table}");
    Ok(())
}
