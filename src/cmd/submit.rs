//! Submit command - interactive registration or login followed by a tax submission

use crate::cmd::{read_reliefs, records::print_records};
use crate::core::ReliefInputs;
use crate::store::CsvRecordStore;
use crate::workflow::{StdioPrompter, SubmissionOptions, SubmissionWorkflow};
use clap::Args;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct SubmitCommand {
    /// User id to submit for; prompted for when omitted, blank generates a new id
    #[arg(short, long)]
    user_id: Option<String>,

    /// JSON file with relief inputs, instead of answering relief questions.
    /// Stdin is not accepted here since it carries the answers to the prompts.
    #[arg(short = 'f', long)]
    reliefs: Option<PathBuf>,

    /// Show all stored records afterwards without asking
    #[arg(long)]
    show_records: bool,
}

impl SubmitCommand {
    pub fn exec(&self, store: &CsvRecordStore) -> anyhow::Result<()> {
        let reliefs = self.reliefs.as_deref().map(read_relief_file).transpose()?;
        let options = SubmissionOptions {
            user_id: self.user_id.clone(),
            reliefs,
            show_records: self.show_records.then_some(true),
        };

        println!("Welcome to the Malaysia Tax Input System");
        let mut prompter = StdioPrompter::stdio();
        let submission = SubmissionWorkflow::new(store, &mut prompter).run(options)?;
        log::info!(
            "{:?} for {}: income {}, {} relief components, saved: {}",
            submission.access,
            submission.record.id(),
            submission.record.income(),
            submission.reliefs.len(),
            submission.saved
        );

        if let Some(rows) = submission.records {
            println!();
            println!("All tax records:");
            print_records(&rows, false);
        }
        Ok(())
    }
}

fn read_relief_file(path: &Path) -> anyhow::Result<ReliefInputs> {
    if path.as_os_str() == "-" {
        anyhow::bail!(
            "--reliefs - is not supported by submit, stdin is needed for the prompts; pass a file path"
        )
    }
    read_reliefs(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relief_file_from_stdin_rejected() {
        let err = read_relief_file(Path::new("-")).unwrap_err();
        assert!(err.to_string().contains("not supported by submit"));
    }

    #[test]
    fn relief_file_read_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reliefs.json");
        std::fs::write(&path, r#"{ "num_children": 2 }"#).unwrap();
        let reliefs = read_relief_file(&path).unwrap();
        assert_eq!(reliefs.num_children, 2);
    }
}
