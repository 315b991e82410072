//! Submission workflow - resolve the user, check credentials, collect reliefs,
//! compute tax and append the record

use crate::core::{
    calculate_total_relief, relief_breakdown, validate_registration, verify_credential, Record,
    ReliefInputs, ReliefKind, ValidationError,
};
use crate::store::{RecordStore, Row, StoreError};
use rust_decimal::Decimal;
use std::io::{self, BufRead, Write};

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to read input: {0}")]
    Prompt(#[from] io::Error),
}

/// Source of answers for the interactive workflow
pub trait Prompter {
    /// Shows `question` and returns the answer without its line ending
    fn ask(&mut self, question: &str) -> io::Result<String>;

    fn say(&mut self, message: &str) -> io::Result<()>;
}

/// Prompts on stdout and reads answers from stdin
pub struct StdioPrompter<R, W> {
    input: R,
    output: W,
}

impl StdioPrompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        StdioPrompter {
            input: io::stdin().lock(),
            output: io::stdout(),
        }
    }
}

impl<R: BufRead, W: Write> Prompter for StdioPrompter<R, W> {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input ended before all questions were answered",
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn say(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message)
    }
}

/// How the user got access to their id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Login,
    Registration,
}

/// Answers supplied up front instead of being prompted for
#[derive(Debug, Clone, Default)]
pub struct SubmissionOptions {
    pub user_id: Option<String>,
    pub reliefs: Option<ReliefInputs>,
    pub show_records: Option<bool>,
}

/// Outcome of a completed submission
#[derive(Debug)]
pub struct Submission {
    pub record: Record,
    pub access: Access,
    /// Whether the record was appended to the store
    pub saved: bool,
    pub reliefs: Vec<(ReliefKind, Decimal)>,
    /// All store rows, when the user asked to see them
    pub records: Option<Vec<Row>>,
}

pub struct SubmissionWorkflow<'a, S, P> {
    store: &'a S,
    prompter: &'a mut P,
}

impl<'a, S: RecordStore, P: Prompter> SubmissionWorkflow<'a, S, P> {
    pub fn new(store: &'a S, prompter: &'a mut P) -> Self {
        SubmissionWorkflow { store, prompter }
    }

    pub fn run(&mut self, options: SubmissionOptions) -> Result<Submission, SubmissionError> {
        let user_id = self.resolve_user_id(options.user_id)?;

        let (identity_number, access) = if self.store.is_registered(&user_id)? {
            self.prompter.say("User found. Please log in.")?;
            (self.login()?, Access::Login)
        } else {
            self.prompter.say("New user registration")?;
            (self.register()?, Access::Registration)
        };

        let income = self.ask_amount("income", "Enter your annual income (RM): ")?;
        let inputs = match options.reliefs {
            Some(inputs) => inputs,
            None => self.collect_reliefs()?,
        };

        let total_relief = calculate_total_relief(&inputs);
        let record = Record::new(user_id, identity_number, income, total_relief);
        self.prompter
            .say(&format!("Total relief: RM {:.2}", record.total_relief()))?;
        self.prompter
            .say(&format!("Tax payable: RM {:.2}", record.tax_payable()))?;

        // ids are unique in the store, so a returning user's assessment is shown but not stored
        let saved = access == Access::Registration;
        if saved {
            self.store.append(&record)?;
            self.prompter.say("Data saved.")?;
        } else {
            self.prompter.say(&format!(
                "{} already has a submission on record; this assessment was not saved.",
                record.id()
            ))?;
        }

        let show_records = match options.show_records {
            Some(show) => show,
            None => self.ask_yes_no("Do you want to view all tax records? (y/n): ", false)?,
        };
        let records = if show_records {
            Some(self.store.read_all()?)
        } else {
            None
        };

        Ok(Submission {
            record,
            access,
            saved,
            reliefs: relief_breakdown(&inputs),
            records,
        })
    }

    fn resolve_user_id(&mut self, given: Option<String>) -> Result<String, SubmissionError> {
        let user_id = match given {
            Some(id) => id,
            None => self
                .prompter
                .ask("Enter your User ID (leave blank to auto-generate): ")?,
        };
        let user_id = user_id.trim();
        if !user_id.is_empty() {
            return Ok(user_id.to_string());
        }
        let generated = self.store.next_id()?;
        self.prompter
            .say(&format!("Auto-generated User ID: {}", generated))?;
        Ok(generated)
    }

    fn login(&mut self) -> Result<String, SubmissionError> {
        let identity_number = self.prompter.ask("Enter your 12-digit IC number: ")?;
        let password = self
            .prompter
            .ask("Enter your password (last 4 digits of IC): ")?;
        if !verify_credential(&identity_number, &password) {
            return Err(ValidationError::LoginFailed.into());
        }
        self.prompter.say("Login successful!")?;
        Ok(identity_number)
    }

    fn register(&mut self) -> Result<String, SubmissionError> {
        let identity_number = self.prompter.ask("Enter your 12-digit IC number: ")?;
        // reject a bad IC number before asking for a password derived from it
        if let Err(e @ ValidationError::IdentityLength { .. }) =
            validate_registration(&identity_number, "")
        {
            return Err(e.into());
        }
        let password = self
            .prompter
            .ask("Set your password (must be last 4 digits of IC): ")?;
        validate_registration(&identity_number, &password)?;
        self.prompter.say("Registration successful!")?;
        Ok(identity_number)
    }

    fn collect_reliefs(&mut self) -> Result<ReliefInputs, SubmissionError> {
        Ok(ReliefInputs {
            individual: self.ask_yes_no("Claim individual relief? (Y/n): ", true)?,
            spouse_income: self.ask_optional_amount(
                "spouse income",
                "Spouse's annual income (RM): ",
            )?,
            num_children: self.ask_count("Number of children: ")?,
            medical_expenses: self
                .ask_optional_amount("medical expenses", "Medical expenses (RM): ")?,
            lifestyle_expenses: self
                .ask_optional_amount("lifestyle expenses", "Lifestyle expenses (RM): ")?,
            education_fees: self.ask_optional_amount("education fees", "Education fees (RM): ")?,
            parental_support: self
                .ask_optional_amount("parental support", "Parental support (RM): ")?,
            disabled: self.ask_yes_no("Are you registered as disabled? (y/N): ", false)?,
            breastfeeding_equipment: self
                .ask_yes_no("Bought breastfeeding equipment? (y/N): ", false)?,
            sports_equipment: self.ask_yes_no("Bought sports equipment? (y/N): ", false)?,
            books: self.ask_yes_no("Bought books? (y/N): ", false)?,
            insurance_premium: self.ask_yes_no("Paid insurance premiums? (y/N): ", false)?,
        })
    }

    fn ask_amount(&mut self, field: &'static str, question: &str) -> Result<Decimal, SubmissionError> {
        let answer = self.prompter.ask(question)?;
        parse_amount(field, &answer).map_err(Into::into)
    }

    fn ask_optional_amount(
        &mut self,
        field: &'static str,
        question: &str,
    ) -> Result<Decimal, SubmissionError> {
        let answer = self.prompter.ask(question)?;
        if answer.trim().is_empty() {
            return Ok(Decimal::ZERO);
        }
        parse_amount(field, &answer).map_err(Into::into)
    }

    fn ask_count(&mut self, question: &str) -> Result<u32, SubmissionError> {
        let answer = self.prompter.ask(question)?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Ok(0);
        }
        answer.parse().map_err(|_| {
            ValidationError::InvalidAmount {
                field: "number of children",
                value: answer.to_string(),
            }
            .into()
        })
    }

    fn ask_yes_no(&mut self, question: &str, default: bool) -> Result<bool, SubmissionError> {
        let answer = self.prompter.ask(question)?;
        Ok(match answer.trim().to_lowercase().as_str() {
            "" => default,
            "y" | "yes" => true,
            _ => false,
        })
    }
}

/// Parses a non-negative amount of money
pub fn parse_amount(field: &'static str, value: &str) -> Result<Decimal, ValidationError> {
    let value = value.trim();
    match value.parse::<Decimal>() {
        Ok(amount) if amount >= Decimal::ZERO => Ok(amount),
        Ok(_) => Err(ValidationError::NegativeAmount {
            field,
            value: value.to_string(),
        }),
        Err(_) => Err(ValidationError::InvalidAmount {
            field,
            value: value.to_string(),
        }),
    }
}
