use super::loan::{LoanId, Party};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Request,
    Approve,
    Accept,
    Close,
    Decline,
}

/// An externally submitted action against the loan book.
///
/// `caller` is the verified identity supplied by the execution environment.
/// `loan` is absent for `request` (the registry allocates the id) and
/// `amount` is only meaningful for `request` and `approve`.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Action {
    pub kind: ActionKind,
    pub caller: Party,
    pub loan: Option<LoanId>,
    pub amount: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_request_deserialization() {
        let csv = "kind, caller, loan, amount\nrequest, alice, , 10";
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(csv.as_bytes());
        let mut iter = reader.deserialize();

        let result: Action = iter.next().unwrap().expect("Failed to deserialize action");
        assert_eq!(result.kind, ActionKind::Request);
        assert_eq!(result.caller, Party::from("alice"));
        assert_eq!(result.loan, None);
        assert_eq!(result.amount, Some(dec!(10)));
    }

    #[test]
    fn test_approve_deserialization() {
        let csv = "kind, caller, loan, amount\napprove, owner, 3, 15";
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(csv.as_bytes());
        let mut iter = reader.deserialize();

        let result: Action = iter.next().unwrap().unwrap();
        assert_eq!(result.kind, ActionKind::Approve);
        assert_eq!(result.loan, Some(LoanId::new(3)));
        assert_eq!(result.amount, Some(dec!(15)));
    }

    #[test]
    fn test_accept_deserialization_without_amount() {
        let csv = "kind, caller, loan, amount\naccept, alice, 3, ";
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(csv.as_bytes());
        let mut iter = reader.deserialize();

        let result: Action = iter.next().unwrap().unwrap();
        assert_eq!(result.kind, ActionKind::Accept);
        assert_eq!(result.loan, Some(LoanId::new(3)));
        assert_eq!(result.amount, None);
    }
}
