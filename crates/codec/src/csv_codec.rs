use crate::{CodecError, Result};
use cleansheet_core::{CellValue, Table};

/// Decode CSV bytes into a table with cell type inference.
///
/// The reader is flexible: rows may have different field counts and are
/// kept ragged. Blank lines are skipped, matching the upload behavior the
/// frontend expects.
pub(crate) fn decode(bytes: &[u8]) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Vec<CellValue> = record.iter().map(CellValue::parse).collect();

        // A blank line parses as a single null field
        if row.is_empty() || (row.len() == 1 && row[0].is_null()) {
            continue;
        }
        rows.push(row);
    }

    Ok(Table::from_rows(rows))
}

/// Encode a table as CSV bytes.
pub(crate) fn encode(table: &Table) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for row in table.rows() {
        let record: Vec<String> = row.iter().map(CellValue::as_str).collect();
        writer.write_record(&record)?;
    }

    writer
        .into_inner()
        .map_err(|e| CodecError::Io(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_with_inference() {
        let table = decode(b"name,age,active\nAlice,30,true\nBob,2.5,no").unwrap();

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.cell(0, 0), &CellValue::String("name".to_string()));
        assert_eq!(table.cell(1, 1), &CellValue::Int(30));
        assert_eq!(table.cell(1, 2), &CellValue::Bool(true));
        assert_eq!(table.cell(2, 1), &CellValue::Float(2.5));
        assert_eq!(table.cell(2, 2), &CellValue::Bool(false));
    }

    #[test]
    fn test_decode_skips_blank_lines() {
        let table = decode(b"a,b\n\nc,d\n").unwrap();
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_decode_keeps_rows_with_empty_fields() {
        // ",," is a real row of nulls, not a blank line
        let table = decode(b"a,b,c\n,,\n").unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(1, 0), &CellValue::Null);
    }

    #[test]
    fn test_decode_ragged_rows() {
        let table = decode(b"a,b,c\nd\ne,f,g,h\n").unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.rows()[1].len(), 1);
        assert_eq!(table.width(), 4);
    }

    #[test]
    fn test_encode() {
        let table = Table::from_rows(vec![
            vec![
                CellValue::String("name".to_string()),
                CellValue::String("age".to_string()),
            ],
            vec![CellValue::String("Ann".to_string()), CellValue::Int(41)],
            vec![CellValue::Null, CellValue::Bool(true)],
        ]);

        let bytes = encode(&table).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "name,age\nAnn,41\n,true\n");
    }

    #[test]
    fn test_roundtrip() {
        let original = decode(b"name,count\nwidget,7\n").unwrap();
        let bytes = encode(&original).unwrap();
        let restored = decode(&bytes).unwrap();
        assert_eq!(original, restored);
    }
}
