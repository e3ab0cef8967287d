use crate::domain::action::Action;
use crate::error::{LoanError, Result};
use std::io::Read;

/// Reads submitted actions from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over
/// `Result<Action>`. It handles whitespace trimming and flexible record
/// lengths automatically.
pub struct ActionReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ActionReader<R> {
    /// Creates a new `ActionReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes actions.
    pub fn actions(self) -> impl Iterator<Item = Result<Action>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(LoanError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::action::ActionKind;
    use crate::domain::loan::{LoanId, Party};
    use rust_decimal_macros::dec;

    #[test]
    fn test_reader_valid_stream() {
        let data = "kind, caller, loan, amount\nrequest, alice, , 10\napprove, owner, 1, 15";
        let reader = ActionReader::new(data.as_bytes());
        let results: Vec<Result<Action>> = reader.actions().collect();

        assert_eq!(results.len(), 2);
        let first = results[0].as_ref().unwrap();
        assert_eq!(first.kind, ActionKind::Request);
        assert_eq!(first.caller, Party::from("alice"));
        assert_eq!(first.amount, Some(dec!(10)));

        let second = results[1].as_ref().unwrap();
        assert_eq!(second.loan, Some(LoanId::new(1)));
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = "kind, caller, loan, amount\nrefinance, alice, 1, 10";
        let reader = ActionReader::new(data.as_bytes());
        let results: Vec<Result<Action>> = reader.actions().collect();

        assert!(results[0].is_err());
    }
}
