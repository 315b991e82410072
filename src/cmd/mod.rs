pub mod calc;
pub mod next_id;
pub mod records;
pub mod schema;
pub mod submit;

use crate::core::ReliefInputs;
use anyhow::Context;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Read relief inputs (JSON) from a file (or stdin with "-")
pub fn read_reliefs(path: &Path) -> anyhow::Result<ReliefInputs> {
    if path.as_os_str() == "-" {
        read_reliefs_from_stdin()
    } else {
        let file = File::open(path)
            .with_context(|| format!("cannot open relief inputs {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("invalid relief inputs in {}", path.display()))
    }
}

fn read_reliefs_from_stdin() -> anyhow::Result<ReliefInputs> {
    let mut buffer = Vec::new();
    io::stdin().lock().read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No relief inputs received. Provide a file or pipe JSON to stdin.");
    }

    serde_json::from_slice(&buffer).context("invalid relief inputs on stdin")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::fs;

    #[test]
    fn reads_relief_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reliefs.json");
        fs::write(&path, r#"{ "individual": false, "medical_expenses": 1200.50 }"#).unwrap();

        let inputs = read_reliefs(&path).unwrap();
        assert!(!inputs.individual);
        assert_eq!(inputs.medical_expenses, dec!(1200.50));
    }

    #[test]
    fn missing_relief_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        let err = read_reliefs(&path).unwrap_err();
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn malformed_relief_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reliefs.json");
        fs::write(&path, r#"{ "num_children": "many" }"#).unwrap();
        assert!(read_reliefs(&path).is_err());
    }
}
