use super::ui;
use crate::config::CurrencyConfig;
use anyhow::Result;
use comfy_table::Cell;

/// Lists the currencies the configuration allows.
pub fn run(currencies: &[CurrencyConfig]) -> Result<()> {
    if currencies.is_empty() {
        println!("No currencies configured.");
        return Ok(());
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Name"),
        ui::header_cell("Symbol"),
    ]);
    for currency in currencies {
        table.add_row(vec![
            Cell::new(&currency.code),
            Cell::new(&currency.name),
            Cell::new(&currency.symbol),
        ]);
    }

    println!("{table}");
    Ok(())
}
