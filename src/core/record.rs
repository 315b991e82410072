use crate::core::calculate_tax;
use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Ordering;

const USER_ID_PREFIX: &str = "user";

/// A CSV column of a record type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub description: &'static str,
}

/// Types which are written as CSV rows with a fixed set of columns
pub trait CsvColumns {
    fn columns() -> &'static [Column];

    fn header() -> Vec<&'static str> {
        Self::columns().iter().map(|c| c.name).collect()
    }
}

/// One tax submission, as persisted in the record store.
///
/// `tax_payable` is always derived from `income` and `total_relief` on construction.
#[derive(Debug, Clone, PartialEq, Serialize, mytax_derive::CsvColumns)]
pub struct Record {
    /// User identifier, e.g. user007
    #[serde(rename = "ID")]
    id: String,
    /// 12 character identity card number
    #[serde(rename = "IC Number")]
    identity_number: String,
    /// Annual income
    #[serde(rename = "Income")]
    income: Decimal,
    /// Sum of all relief components claimed
    #[serde(rename = "Tax Relief")]
    total_relief: Decimal,
    /// Tax due on income less relief
    #[serde(rename = "Tax Payable")]
    tax_payable: Decimal,
}

impl Record {
    pub fn new(
        id: impl Into<String>,
        identity_number: impl Into<String>,
        income: Decimal,
        total_relief: Decimal,
    ) -> Self {
        Record {
            id: id.into(),
            identity_number: identity_number.into(),
            income,
            total_relief,
            tax_payable: calculate_tax(income, total_relief),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn income(&self) -> Decimal {
        self.income
    }

    pub fn total_relief(&self) -> Decimal {
        self.total_relief
    }

    pub fn tax_payable(&self) -> Decimal {
        self.tax_payable
    }

    /// Field values in column order, formatted as they are written to the store
    #[cfg(test)]
    pub fn fields(&self) -> [String; 5] {
        [
            self.id.clone(),
            self.identity_number.clone(),
            self.income.to_string(),
            self.total_relief.to_string(),
            self.tax_payable.to_string(),
        ]
    }
}

/// Sequence digits of a generated user id (`user` followed only by digits),
/// without leading zeros. Sequences are kept as text so any length is accepted.
pub fn user_id_sequence(id: &str) -> Option<&str> {
    let digits = id.strip_prefix(USER_ID_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match digits.trim_start_matches('0') {
        "" => Some("0"),
        trimmed => Some(trimmed),
    }
}

/// Numeric ordering of two sequences as returned by `user_id_sequence`
pub fn compare_sequences(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// The user id after `max_sequence`, zero padded to at least 3 digits.
/// With no existing sequence this is `user001`.
pub fn next_user_id(max_sequence: Option<&str>) -> String {
    let mut digits: Vec<u8> = max_sequence.unwrap_or("0").bytes().collect();
    let mut carry = true;
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            carry = false;
            break;
        }
    }
    if carry {
        digits.insert(0, b'1');
    }
    let digits: String = digits.into_iter().map(char::from).collect();
    format!("{USER_ID_PREFIX}{digits:0>3}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn tax_derived_on_construction() {
        let record = Record::new("user001", "900101145678", dec!(60000), dec!(10000));
        assert_eq!(record.tax_payable(), dec!(5000));
    }

    #[test]
    fn columns_follow_store_header() {
        assert_eq!(
            Record::header(),
            vec!["ID", "IC Number", "Income", "Tax Relief", "Tax Payable"]
        );
        assert_eq!(Record::columns()[0].description, "User identifier, e.g. user007");
    }

    #[test]
    fn fields_are_unrounded() {
        let record = Record::new("user002", "900101145678", dec!(50000.015), dec!(0));
        assert_eq!(
            record.fields(),
            [
                "user002".to_string(),
                "900101145678".to_string(),
                "50000.015".to_string(),
                "0".to_string(),
                "5000.00300".to_string(),
            ]
        );
    }

    #[test]
    fn user_ids_padded_to_three_digits() {
        assert_eq!(next_user_id(None), "user001");
        assert_eq!(next_user_id(Some("0")), "user001");
        assert_eq!(next_user_id(Some("41")), "user042");
        assert_eq!(next_user_id(Some("998")), "user999");
        assert_eq!(next_user_id(Some("999")), "user1000");
    }

    #[test]
    fn next_user_id_beyond_u64() {
        assert_eq!(
            next_user_id(Some("18446744073709551615")),
            "user18446744073709551616"
        );
        assert_eq!(
            next_user_id(Some("99999999999999999999")),
            "user100000000000000000000"
        );
    }

    #[test]
    fn user_id_sequence_parsing() {
        assert_eq!(user_id_sequence("user001"), Some("1"));
        assert_eq!(user_id_sequence("user1000"), Some("1000"));
        assert_eq!(user_id_sequence("user000"), Some("0"));
        assert_eq!(
            user_id_sequence("user18446744073709551615"),
            Some("18446744073709551615")
        );
        assert_eq!(user_id_sequence("user"), None);
        assert_eq!(user_id_sequence("userABC"), None);
        assert_eq!(user_id_sequence("user+5"), None);
        assert_eq!(user_id_sequence("user 5"), None);
        assert_eq!(user_id_sequence("admin001"), None);
        assert_eq!(user_id_sequence("ID"), None);
    }

    #[test]
    fn sequences_compare_numerically() {
        assert_eq!(compare_sequences("9", "10"), Ordering::Less);
        assert_eq!(compare_sequences("123", "122"), Ordering::Greater);
        assert_eq!(compare_sequences("18446744073709551616", "999"), Ordering::Greater);
        assert_eq!(compare_sequences("7", "7"), Ordering::Equal);
    }
}
