//! Reads utility bill rows from an uploaded CSV file
//!
//! Columns: apartment id, electricity, water, internet. The first line is a
//! header. Rows whose first cell is blank are skipped and blank amounts
//! count as 0.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::application::services::UtilityBillRow;
use crate::domain::{DomainError, DomainResult};

const COLUMNS: [&str; 3] = ["electricity", "water", "internet"];

fn invalid(line: usize, column: &str, value: &str) -> DomainError {
    DomainError::Validation(format!("Row {}: invalid {} '{}'", line, column, value))
}

pub fn parse_rows(data: &[u8]) -> DomainResult<Vec<UtilityBillRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record =
            record.map_err(|e| DomainError::Validation(format!("Malformed CSV file: {}", e)))?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(index + 2);

        let first = record.get(0).unwrap_or_default();
        if first.is_empty() {
            continue;
        }
        let apartment_id = first
            .parse::<i64>()
            .map_err(|_| invalid(line, "apartment id", first))?;

        let mut amounts = [Decimal::ZERO; 3];
        for (slot, (column, amount)) in COLUMNS.iter().zip(amounts.iter_mut()).enumerate() {
            let raw = record.get(slot + 1).unwrap_or_default();
            if !raw.is_empty() {
                *amount = Decimal::from_str(raw).map_err(|_| invalid(line, column, raw))?;
            }
        }
        let [electricity, water, internet] = amounts;

        rows.push(UtilityBillRow {
            line,
            apartment_id,
            electricity,
            water,
            internet,
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn header_and_blank_rows_are_skipped() {
        let csv = "apartment,electricity,water,internet\n\
                   101,350000,120000.5,200000\n\
                   ,,,\n\
                   \n\
                   102, 90000 ,,150000\n";
        let rows = parse_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[0].apartment_id, 101);
        assert_eq!(rows[0].water, dec!(120000.5));
        assert_eq!(rows[1].apartment_id, 102);
        assert_eq!(rows[1].electricity, dec!(90000));
        assert_eq!(rows[1].water, Decimal::ZERO);
    }

    #[test]
    fn bad_cell_names_row_and_column() {
        let csv = "apartment,electricity,water,internet\n101,abc,1,1\n";
        let err = parse_rows(csv.as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "Row 2: invalid electricity 'abc'");

        let csv = "apartment,electricity,water,internet\nA-1,1,1,1\n";
        let err = parse_rows(csv.as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "Row 2: invalid apartment id 'A-1'");
    }

    #[test]
    fn header_only_file_has_no_rows() {
        let rows = parse_rows(b"apartment,electricity,water,internet\n").unwrap();
        assert!(rows.is_empty());
    }
}
