//! Example: Create an xlsx file, then read it back

use plain_sheets::prelude::*;

fn main() -> XlsxResult<()> {
    let mut workbook = Workbook::create("Inventory")?;
    let sheet = workbook.default_worksheet_mut();

    // Header row
    sheet.cell_mut("1", "A").set_string("Item");
    sheet.cell_mut("1", "B").set_string("Count");
    sheet.cell_mut("1", "C").set_string("Price");

    // Data rows
    let items = [("Bolts", 120, "0.15"), ("Nuts", 300, "0.05"), ("Washers", 95, "0.02")];
    for (i, (name, count, price)) in items.iter().enumerate() {
        let row = (i + 2).to_string();
        sheet.cell_mut(&row, "A").set_string(*name);
        sheet.cell_mut(&row, "B").set_i32(*count);
        if let Ok(price) = price.parse::<Decimal>() {
            sheet.cell_mut(&row, "C").set_number(price);
        }
    }

    let summary = workbook.add_worksheet("Summary")?;
    if let Some(sheet) = workbook.worksheet_mut(summary) {
        sheet.cell_mut("1", "A").set_string("Item");
        sheet.cell_mut("1", "B").set_i64(3);
    }

    let path = std::env::temp_dir().join("plain-sheets-example.xlsx");
    workbook.save_as(&path)?;
    println!("Created {}", path.display());

    let loaded = Workbook::load(&path)?;
    for sheet in loaded.worksheets() {
        println!("{} ({} cells)", sheet.name(), sheet.cell_count());
        for (_, address, cell) in sheet.iter_cells() {
            println!("  {} = {}", address, cell.text().unwrap_or_default());
        }
    }

    Ok(())
}
