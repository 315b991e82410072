//! Schema command - print the relief input format and the record store layout

use crate::core::{CsvColumns, Record, ReliefInputs, ReliefKind};
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema, csv-header or csv-fields
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for relief inputs
    JsonSchema,
    /// Header row of the record store
    CsvHeader,
    /// Record store column descriptions and relief limits
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::CsvHeader => self.print_csv_header(),
            SchemaFormat::CsvFields => self.print_csv_fields(),
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        let schema = schema_for!(ReliefInputs);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_csv_header(&self) -> anyhow::Result<()> {
        println!("{}", Record::header().join(","));
        Ok(())
    }

    fn print_csv_fields(&self) -> anyhow::Result<()> {
        println!("Record Store Format");
        println!("===================");
        println!();
        for column in Record::columns() {
            println!("{:12}  {}", column.name, column.description);
        }
        println!();
        println!("Relief limits (RM)");
        for kind in ReliefKind::ALL {
            println!("{:24}  {:.2}", kind.display(), kind.limit());
        }
        println!();
        println!("Children relief is per child, for at most 12 children");
        Ok(())
    }
}
