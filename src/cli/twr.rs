use super::ui;
use crate::service::ExchangeRateService;
use anyhow::Result;
use comfy_table::Cell;
use rust_decimal::Decimal;

/// Computes and displays a time-weighted return over a rate series.
pub async fn run(
    service: &ExchangeRateService,
    source: &str,
    target: &str,
    amount: &str,
    start: &str,
    flows: &[String],
) -> Result<()> {
    let starting_amount = super::parse_amount(amount)?;
    let start_date = super::parse_date(start)?;
    let cash_flows = super::parse_cash_flows(flows)?;

    let result = service
        .calculate_twr(source, target, starting_amount, start_date, &cash_flows)
        .await?;

    if !cash_flows.is_empty() {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("#"),
            ui::header_cell("Date"),
            ui::header_cell("Cash Flow"),
            ui::header_cell("Balance"),
        ]);
        for (index, (flow, balance)) in cash_flows.iter().zip(&result.twr_values).enumerate() {
            table.add_row(vec![
                Cell::new((index + 1).to_string()),
                Cell::new(flow.date.to_string()),
                ui::decimal_cell(flow.amount),
                ui::decimal_cell(*balance),
            ]);
        }
        println!("{table}");
    }

    let percent = (result.final_twr * Decimal::ONE_HUNDRED).round_dp(2);
    let styled_percent = if result.final_twr >= Decimal::ZERO {
        ui::style_text(&format!("{percent}%"), ui::StyleType::TotalValue)
    } else {
        ui::style_text(&format!("{percent}%"), ui::StyleType::Error)
    };
    println!(
        "\n{} {}",
        ui::style_text("Final TWR:", ui::StyleType::TotalLabel),
        styled_percent
    );
    Ok(())
}
