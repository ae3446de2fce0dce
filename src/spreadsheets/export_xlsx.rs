use crate::domain::table::{cell, SheetTable};
use crate::errors::ServerError;
use rust_xlsxwriter::Workbook;

/// Columns holding derived numbers; written as numbers when they parse.
fn is_numeric_column(name: &str) -> bool {
    name.ends_with("_円") || name.ends_with("_数値") || name.ends_with("_数字") || name == "徒歩_分"
}

/// Render a stored worksheet as an XLSX workbook with one sheet.
pub fn sheet_to_xlsx(table: &SheetTable, worksheet_name: &str) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(worksheet_name)
        .map_err(|e| ServerError::XlsxError(format!("Invalid worksheet name '{worksheet_name}': {e}")))?;

    for (col, header) in table.header.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, header)
            .map_err(|e| {
                ServerError::XlsxError(format!("Failed to write header '{}': {}", header, e))
            })?;
    }

    let numeric: Vec<bool> = table.header.iter().map(|h| is_numeric_column(h)).collect();

    for (i, row) in table.rows.iter().enumerate() {
        let r = (i + 1) as u32;
        for (col, is_numeric) in numeric.iter().enumerate() {
            let value = cell(row, col);
            let number = is_numeric.then(|| value.parse::<f64>().ok()).flatten();

            let written = match number {
                Some(n) => worksheet.write_number(r, col as u16, n).map(|_| ()),
                None => worksheet.write_string(r, col as u16, value).map(|_| ()),
            };
            written.map_err(|e| {
                ServerError::XlsxError(format!("Failed to write row {r} column {col}: {e}"))
            })?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {}", e)))
}
