pub mod credential;
pub mod record;
pub mod relief;
pub mod tax;

// Flat public surface for domain types and functions.
pub use credential::{validate_registration, verify_credential, ValidationError};
pub use record::{compare_sequences, next_user_id, user_id_sequence, CsvColumns, Record};
pub use relief::{calculate_total_relief, relief_breakdown, ReliefInputs, ReliefKind};
pub use tax::{calculate_tax, TaxAssessment};
