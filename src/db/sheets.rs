// db/sheets.rs
//
// A named spreadsheet holding named worksheets, each a flat grid of strings.
// Writes always clear the worksheet first; there is no partial update.
use crate::domain::table::SheetTable;
use crate::errors::ServerError;
use rusqlite::{params, Connection, OptionalExtension};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRef {
    pub spreadsheet: String,
    pub worksheet: String,
}

impl SheetRef {
    pub fn new(spreadsheet: impl Into<String>, worksheet: impl Into<String>) -> Self {
        Self {
            spreadsheet: spreadsheet.into(),
            worksheet: worksheet.into(),
        }
    }
}

impl std::fmt::Display for SheetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.spreadsheet, self.worksheet)
    }
}

fn worksheet_id(conn: &Connection, sheet: &SheetRef) -> Result<Option<i64>, ServerError> {
    conn.query_row(
        "SELECT id FROM worksheets WHERE spreadsheet = ? AND title = ?",
        params![sheet.spreadsheet, sheet.worksheet],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("worksheet lookup failed: {e}")))
}

/// Clear the worksheet (creating it if absent) and write header + rows.
/// Returns the number of data rows written.
pub fn replace_sheet(
    conn: &mut Connection,
    sheet: &SheetRef,
    table: &SheetTable,
    now: i64,
) -> Result<usize, ServerError> {
    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(format!("begin failed: {e}")))?;

    tx.execute(
        "INSERT INTO worksheets (spreadsheet, title, updated_at) VALUES (?, ?, ?)
         ON CONFLICT (spreadsheet, title) DO UPDATE SET updated_at = excluded.updated_at",
        params![sheet.spreadsheet, sheet.worksheet, now],
    )
    .map_err(|e| ServerError::DbError(format!("upsert worksheet failed: {e}")))?;

    let id = worksheet_id(&tx, sheet)?.ok_or(ServerError::InternalError)?;

    tx.execute("DELETE FROM sheet_rows WHERE worksheet_id = ?", params![id])
        .map_err(|e| ServerError::DbError(format!("clear worksheet failed: {e}")))?;

    {
        let mut stmt = tx
            .prepare("INSERT INTO sheet_rows (worksheet_id, row_index, cells) VALUES (?, ?, ?)")
            .map_err(|e| ServerError::DbError(e.to_string()))?;

        let all_rows = std::iter::once(&table.header).chain(table.rows.iter());
        for (index, cells) in all_rows.enumerate() {
            let json = serde_json::to_string(cells)
                .map_err(|e| ServerError::DbError(format!("encode row {index} failed: {e}")))?;
            stmt.execute(params![id, index as i64, json])
                .map_err(|e| ServerError::DbError(format!("insert row {index} failed: {e}")))?;
        }
    }

    tx.commit()
        .map_err(|e| ServerError::DbError(format!("commit failed: {e}")))?;

    Ok(table.rows.len())
}

/// Read a worksheet back. `None` when the worksheet has never been written.
pub fn read_sheet(conn: &Connection, sheet: &SheetRef) -> Result<Option<SheetTable>, ServerError> {
    let Some(id) = worksheet_id(conn, sheet)? else {
        return Ok(None);
    };

    let mut stmt = conn
        .prepare("SELECT cells FROM sheet_rows WHERE worksheet_id = ? ORDER BY row_index")
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map(params![id], |row| row.get::<_, String>(0))
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut grid: Vec<Vec<String>> = Vec::new();
    for r in rows {
        let json = r.map_err(|e| ServerError::DbError(e.to_string()))?;
        let cells: Vec<String> = serde_json::from_str(&json)
            .map_err(|e| ServerError::DbError(format!("decode row failed: {e}")))?;
        grid.push(cells);
    }

    let mut grid = grid.into_iter();
    let header = grid.next().unwrap_or_default();
    Ok(Some(SheetTable {
        header,
        rows: grid.collect(),
    }))
}
