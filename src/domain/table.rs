/// A flat header + rows grid, as stored in one worksheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Short rows read as empty cells.
pub fn cell(row: &[String], column: usize) -> &str {
    row.get(column).map(String::as_str).unwrap_or("")
}
