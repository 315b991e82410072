//! Calc command - compute relief and tax without touching the record store

use crate::cmd::read_reliefs;
use crate::core::{calculate_total_relief, relief_breakdown, ReliefInputs, TaxAssessment};
use crate::workflow::parse_amount;
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct CalcCommand {
    /// Annual income (RM)
    #[arg(short, long, value_parser = parse_income)]
    income: Decimal,

    /// Total relief already worked out (RM), instead of relief inputs
    #[arg(short, long, value_parser = parse_relief, conflicts_with = "reliefs")]
    relief: Option<Decimal>,

    /// JSON file with relief inputs ("-" for stdin); defaults apply when omitted
    #[arg(short = 'f', long)]
    reliefs: Option<PathBuf>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

fn parse_income(s: &str) -> Result<Decimal, crate::core::ValidationError> {
    parse_amount("income", s)
}

fn parse_relief(s: &str) -> Result<Decimal, crate::core::ValidationError> {
    parse_amount("relief", s)
}

#[derive(Debug, Serialize)]
struct CalcOutput {
    income: String,
    reliefs: Vec<ReliefLine>,
    total_relief: String,
    net_income: String,
    bracket: String,
    tax_payable: String,
}

#[derive(Debug, Serialize)]
struct ReliefLine {
    relief: String,
    amount: String,
}

impl CalcCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let (total_relief, reliefs) = match (self.relief, &self.reliefs) {
            (Some(total), _) => (total, Vec::new()),
            (None, Some(path)) => {
                let inputs = read_reliefs(path)?;
                (calculate_total_relief(&inputs), relief_breakdown(&inputs))
            }
            (None, None) => {
                let inputs = ReliefInputs::default();
                (calculate_total_relief(&inputs), relief_breakdown(&inputs))
            }
        };
        let assessment = TaxAssessment::new(self.income, total_relief);
        log::debug!("Assessment: {:?}", assessment);

        let output = CalcOutput {
            income: format!("{:.2}", assessment.income),
            reliefs: reliefs
                .iter()
                .map(|(kind, amount)| ReliefLine {
                    relief: kind.display().to_string(),
                    amount: format!("{:.2}", amount),
                })
                .collect(),
            total_relief: format!("{:.2}", assessment.total_relief),
            net_income: format!("{:.2}", assessment.net_income),
            bracket: assessment.bracket.display().to_string(),
            tax_payable: format!("{:.2}", assessment.tax_payable),
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_text(&output);
        }
        Ok(())
    }
}

fn print_text(output: &CalcOutput) {
    println!();
    println!("TAX CALCULATION");
    println!();
    println!("  Income:      RM {}", output.income);
    for line in &output.reliefs {
        println!("    {:24} RM {}", line.relief, line.amount);
    }
    println!("  Relief:      RM {}", output.total_relief);
    println!("  Net income:  RM {}", output.net_income);
    println!("  Bracket:     {}", output.bracket);
    println!();
    println!("TAX PAYABLE: RM {}", output.tax_payable);
    println!();
}
