use super::ui;
use crate::service::ExchangeRateService;
use anyhow::Result;
use comfy_table::Cell;

/// Converts an amount at the latest known rate and displays the result.
pub async fn run(
    service: &ExchangeRateService,
    source: &str,
    target: &str,
    amount: &str,
) -> Result<()> {
    let amount = super::parse_amount(amount)?;
    let conversion = service.convert(source, target, amount).await?;
    let quote = &conversion.quote;

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Amount"),
        ui::header_cell("From"),
        ui::header_cell("To"),
        ui::header_cell("Converted"),
        ui::header_cell("Rate"),
        ui::header_cell("Date"),
        ui::header_cell("Provider"),
    ]);
    table.add_row(vec![
        ui::decimal_cell(conversion.amount),
        Cell::new(quote.source_currency.as_str()),
        Cell::new(quote.exchanged_currency.as_str()),
        ui::decimal_cell(conversion.converted_amount),
        ui::decimal_cell(quote.rate_value),
        Cell::new(quote.valuation_date.to_string()),
        Cell::new(&quote.provider),
    ]);

    println!("{table}");
    Ok(())
}
