use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::table::BookTable;

const HEADER: [&str; 5] = [
    "Book_Name",
    "Book_Price",
    "Book_Rating",
    "Price_Range",
    "Rating_Category",
];

/// Write the table as CSV: fixed header, one row per book, missing values
/// as empty fields, no index column.
pub fn write_csv(table: &BookTable, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("create csv: {}", path.display()))?;
    write_to(table, file)?;
    info!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

fn write_to<W: Write>(table: &BookTable, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    if table.is_empty() {
        // serialize() emits the header from the first row, so an empty
        // table needs it written explicitly.
        writer.write_record(HEADER).context("write csv header")?;
    }
    for row in table.rows() {
        writer.serialize(row).context("write csv row")?;
    }
    writer.flush().context("flush csv")?;
    Ok(())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::RawColumns;
    use crate::table;

    fn render(table: &BookTable) -> String {
        let mut buf = Vec::new();
        write_to(table, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn header_and_rows() {
        let raw = RawColumns {
            titles: vec!["Book A ...".into(), "Book B".into()],
            prices: vec!["£10.00".into(), "£50.00".into()],
            ratings: vec![2, 5],
        };
        let t = table::build_table(raw).unwrap();
        let csv = render(&t);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("Book_Name,Book_Price,Book_Rating,Price_Range,Rating_Category")
        );
        assert_eq!(lines.next(), Some("Book A,10.0,2,Cheap,Low"));
        assert_eq!(lines.next(), Some("Book B,50.0,5,Expensive,High"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn missing_price_is_empty_fields() {
        let raw = RawColumns {
            titles: vec!["Odd One".into()],
            prices: vec!["not a price".into()],
            ratings: vec![3],
        };
        let t = table::build_table(raw).unwrap();
        let csv = render(&t);
        assert_eq!(csv.lines().nth(1), Some("Odd One,,3,,Average"));
    }

    #[test]
    fn empty_table_still_has_header() {
        let t = table::BookTable::from_columns(vec![], vec![], vec![]).unwrap();
        let csv = render(&t);
        assert_eq!(
            csv.trim_end(),
            "Book_Name,Book_Price,Book_Rating,Price_Range,Rating_Category"
        );
    }

    #[test]
    fn titles_with_commas_are_quoted() {
        let raw = RawColumns {
            titles: vec!["One, Two, Three".into()],
            prices: vec!["£12.50".into()],
            ratings: vec![4],
        };
        let t = table::build_table(raw).unwrap();
        let csv = render(&t);
        assert_eq!(csv.lines().nth(1), Some("\"One, Two, Three\",12.5,4,Cheap,High"));
    }
}
