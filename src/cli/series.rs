use super::ui;
use crate::service::ExchangeRateService;
use anyhow::Result;
use chrono::Utc;
use comfy_table::Cell;

/// Displays a day-by-day rate series for a pair. Days without quotes are
/// simply absent from the table.
pub async fn run(
    service: &ExchangeRateService,
    source: &str,
    target: &str,
    start: &str,
    end: Option<&str>,
) -> Result<()> {
    let start_date = super::parse_date(start)?;
    let end_date = end.map(super::parse_date).transpose()?;

    let span_end = end_date.unwrap_or_else(|| Utc::now().date_naive());
    let total_days = (span_end - start_date).num_days() + 1;
    let pb = ui::new_progress_bar(total_days.max(0) as u64, false);

    let series = service
        .get_series_with_progress(source, target, start_date, end_date, &|| pb.inc(1))
        .await;
    pb.finish_and_clear();
    let series = series?;

    if series.is_empty() {
        println!("No rates found for {source}/{target} in this range.");
        return Ok(());
    }

    println!(
        "\n{}",
        ui::style_text(
            &format!(
                "{}/{}",
                series[0].source_currency, series[0].exchanged_currency
            ),
            ui::StyleType::Title
        )
    );

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Rate"),
        ui::header_cell("Provider"),
    ]);
    for quote in &series {
        table.add_row(vec![
            Cell::new(quote.valuation_date.to_string()),
            ui::decimal_cell(quote.rate_value),
            Cell::new(&quote.provider),
        ]);
    }

    println!("{table}");
    println!(
        "{}",
        ui::style_text(
            &format!("{} day(s) with quotes", series.len()),
            ui::StyleType::Subtle
        )
    );
    Ok(())
}
