mod cmd;
mod core;
mod store;
mod workflow;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::cmd::{
    calc::CalcCommand, next_id::NextIdCommand, records::RecordsCommand, schema::SchemaCommand,
    submit::SubmitCommand,
};
use crate::store::CsvRecordStore;

#[derive(Debug, Parser)]
#[command(name = "mytax", version)]
#[command(about = "Malaysian personal income tax calculator and submission records")]
struct Opts {
    /// CSV file holding submitted tax records
    #[arg(short, long, global = true, default_value = "user_data.csv")]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Register or log in, then calculate and store a tax submission
    Submit(SubmitCommand),
    /// Calculate relief and tax payable without storing anything
    Calc(CalcCommand),
    /// Display all stored tax records
    Records(RecordsCommand),
    /// Print the user id the next new user would receive
    NextId(NextIdCommand),
    /// Print the relief input schema or the record store layout
    Schema(SchemaCommand),
}

fn main() {
    pretty_env_logger::init();

    let opts = Opts::parse();
    if let Err(err) = run(opts) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run(opts: Opts) -> anyhow::Result<()> {
    let store = CsvRecordStore::new(opts.store);
    log::debug!("Using record store {}", store.path().display());

    match opts.command {
        Command::Submit(submit) => submit.exec(&store),
        Command::Calc(calc) => calc.exec(),
        Command::Records(records) => records.exec(&store),
        Command::NextId(next_id) => next_id.exec(&store),
        Command::Schema(schema) => schema.exec(),
    }
}
