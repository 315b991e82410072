//! Records command - display everything in the record store

use crate::store::{RecordStore, Row};
use clap::Args;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

#[derive(Args, Debug)]
pub struct RecordsCommand {
    /// Print raw comma separated rows instead of a table
    #[arg(long)]
    csv: bool,
}

impl RecordsCommand {
    pub fn exec(&self, store: &impl RecordStore) -> anyhow::Result<()> {
        let rows = stored_rows(store)?;
        print_records(&rows, self.csv);
        Ok(())
    }
}

/// All rows of the store, or none if nothing has been submitted yet
fn stored_rows(store: &impl RecordStore) -> anyhow::Result<Vec<Row>> {
    if !store.exists() {
        log::info!("No record store yet, nothing to list");
        return Ok(Vec::new());
    }
    Ok(store.read_all()?)
}

/// Prints store rows, header first, as a table or as comma separated lines
pub fn print_records(rows: &[Row], csv: bool) {
    if rows.is_empty() {
        println!("No records found.");
        return;
    }

    if csv {
        for row in rows {
            println!("{}", row.join(", "));
        }
        return;
    }

    let mut builder = Builder::default();
    for row in rows {
        builder.push_record(row.iter().cloned());
    }
    let table = builder
        .build()
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Record;
    use crate::store::CsvRecordStore;
    use rust_decimal_macros::dec;

    #[test]
    fn missing_store_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvRecordStore::new(dir.path().join("user_data.csv"));
        assert!(stored_rows(&store).unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn existing_store_lists_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvRecordStore::new(dir.path().join("user_data.csv"));
        store
            .append(&Record::new("user001", "900101145678", dec!(60000), dec!(10000)))
            .unwrap();

        let rows = stored_rows(&store).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], "ID");
        assert_eq!(rows[1][0], "user001");
    }
}
