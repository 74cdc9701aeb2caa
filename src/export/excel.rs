//! Excel export: serialize a rendered results table into an xlsx workbook.

use rust_xlsxwriter::Workbook;

use crate::error::ExportError;

/// Header row plus body rows scraped from a rendered table region.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }
}

/// Interpret a rendered cell as a number, tolerating the display
/// formatting ("1,234.50"). "N/A" and non-numeric text stay as strings.
fn numeric_cell(text: &str) -> Option<f64> {
    let cleaned = text.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

/// Build an xlsx workbook with a single "Data" sheet from the table.
///
/// Numeric-looking cells are written as numbers so the spreadsheet sorts
/// and sums correctly; everything else is written as text.
pub fn build_workbook(data: &TableData) -> Result<Vec<u8>, ExportError> {
    let workbook_err = |e: rust_xlsxwriter::XlsxError| ExportError::Workbook(e.to_string());

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Data").map_err(workbook_err)?;

    for (col, header) in data.headers.iter().enumerate() {
        sheet
            .write_string(0, col as u16, header)
            .map_err(workbook_err)?;
    }

    for (row_idx, row) in data.rows.iter().enumerate() {
        let row_num = (row_idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            match numeric_cell(cell) {
                Some(number) => sheet
                    .write_number(row_num, col as u16, number)
                    .map(|_| ())
                    .map_err(workbook_err)?,
                None => sheet
                    .write_string(row_num, col as u16, cell)
                    .map(|_| ())
                    .map_err(workbook_err)?,
            }
        }
    }

    workbook.save_to_buffer().map_err(workbook_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TableData {
        TableData {
            headers: vec!["Region".to_string(), "Sales".to_string()],
            rows: vec![
                vec!["North".to_string(), "1,234.50".to_string()],
                vec!["South".to_string(), "N/A".to_string()],
            ],
        }
    }

    #[test]
    fn test_numeric_cell_strips_display_formatting() {
        assert_eq!(numeric_cell("1,234.50"), Some(1234.5));
        assert_eq!(numeric_cell("  42 "), Some(42.0));
        assert_eq!(numeric_cell("-7.25"), Some(-7.25));
        assert_eq!(numeric_cell("N/A"), None);
        assert_eq!(numeric_cell("North"), None);
        assert_eq!(numeric_cell(""), None);
    }

    #[test]
    fn test_build_workbook_produces_xlsx_bytes() {
        let bytes = build_workbook(&sample()).unwrap();
        // xlsx is a zip archive; check the magic instead of the full body
        assert!(bytes.len() > 4);
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_build_workbook_empty_table() {
        let bytes = build_workbook(&TableData::default()).unwrap();
        assert!(!bytes.is_empty());
    }
}
