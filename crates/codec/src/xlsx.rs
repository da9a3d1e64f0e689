use crate::{CodecError, Result};
use calamine::{Data, Reader, Xlsx};
use cleansheet_core::{CellValue, Table};
use rust_xlsxwriter::Workbook;
use std::io::Cursor;

fn xlsx_err<E: std::fmt::Display>(e: E) -> CodecError {
    CodecError::Xlsx(e.to_string())
}

/// Convert calamine Data to CellValue
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        // Excel stores dates as days since 1899-12-30
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(format!("#ERROR: {e:?}")),
    }
}

/// Decode XLSX bytes, reading the first worksheet.
pub(crate) fn decode(bytes: &[u8]) -> Result<Table> {
    let mut workbook: Xlsx<Cursor<Vec<u8>>> =
        Xlsx::new(Cursor::new(bytes.to_vec())).map_err(xlsx_err)?;

    let sheet_names = workbook.sheet_names().to_vec();
    let Some(first) = sheet_names.first() else {
        return Ok(Table::new());
    };

    let range = workbook.worksheet_range(first).map_err(xlsx_err)?;

    let mut rows = Vec::new();
    for row in range.rows() {
        rows.push(row.iter().map(data_to_cell_value).collect());
    }

    Ok(Table::from_rows(rows))
}

/// Encode a table as XLSX bytes with a single worksheet.
pub(crate) fn encode(table: &Table) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (row_idx, row) in table.rows().iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            let row_num = u32::try_from(row_idx).map_err(|_| xlsx_err("row index overflow"))?;
            let col_num = u16::try_from(col_idx).map_err(|_| xlsx_err("column index overflow"))?;

            match cell {
                CellValue::Null => {} // Leave empty
                CellValue::Bool(b) => {
                    worksheet
                        .write_boolean(row_num, col_num, *b)
                        .map_err(xlsx_err)?;
                }
                CellValue::Int(i) => {
                    // Excel stores all numbers as f64; integers beyond 2^53
                    // lose precision
                    worksheet
                        .write_number(row_num, col_num, *i as f64)
                        .map_err(xlsx_err)?;
                }
                CellValue::Float(f) => {
                    worksheet
                        .write_number(row_num, col_num, *f)
                        .map_err(xlsx_err)?;
                }
                CellValue::String(s) => {
                    worksheet
                        .write_string(row_num, col_num, s)
                        .map_err(xlsx_err)?;
                }
            }
        }
    }

    workbook.save_to_buffer().map_err(xlsx_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_through_buffer() {
        let table = Table::from_rows(vec![
            vec![
                CellValue::String("name".to_string()),
                CellValue::String("score".to_string()),
            ],
            vec![CellValue::String("Ann".to_string()), CellValue::Int(41)],
            vec![CellValue::String("Bea".to_string()), CellValue::Bool(true)],
        ]);

        let bytes = encode(&table).unwrap();
        let loaded = decode(&bytes).unwrap();

        assert_eq!(loaded.row_count(), 3);
        assert_eq!(loaded.cell(0, 0), &CellValue::String("name".to_string()));
        // Int comes back as Float: Excel stores all numbers as f64
        assert_eq!(loaded.cell(1, 1), &CellValue::Float(41.0));
        assert_eq!(loaded.cell(2, 1), &CellValue::Bool(true));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode(b"this is not a zip archive").is_err());
    }

    #[test]
    fn test_encode_empty_table() {
        let bytes = encode(&Table::new()).unwrap();
        assert!(!bytes.is_empty()); // still a valid workbook
    }
}
