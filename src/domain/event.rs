use super::loan::{Amount, LoanId, Party};
use serde::Serialize;

/// Event record emitted by the lifecycle engine, one per successful action.
///
/// Events form an immutable, ordered, append-only output stream for
/// external observers; the engine itself never reads them back. The
/// `amount` on `RequestAccepted` is the full escrowed amount the lender
/// committed, not the borrower payout.
#[derive(Debug, Serialize, PartialEq, Clone)]
#[serde(tag = "event")]
pub enum LoanEvent {
    AddNewLoanRequest {
        borrower: Party,
        amount: Amount,
        loan_id: LoanId,
    },
    RequestApproved {
        borrower: Party,
        loan_id: LoanId,
        amount: Amount,
    },
    RequestAccepted {
        borrower: Party,
        loan_id: LoanId,
        amount: Amount,
    },
    RequestClosed {
        loan_id: LoanId,
    },
    RequestRejected {
        loan_id: LoanId,
    },
}

impl LoanEvent {
    /// The loan this event refers to.
    pub fn loan_id(&self) -> LoanId {
        match self {
            Self::AddNewLoanRequest { loan_id, .. }
            | Self::RequestApproved { loan_id, .. }
            | Self::RequestAccepted { loan_id, .. }
            | Self::RequestClosed { loan_id }
            | Self::RequestRejected { loan_id } => *loan_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_event_serialization_is_tagged() {
        let event = LoanEvent::AddNewLoanRequest {
            borrower: Party::from("alice"),
            amount: Amount::new(dec!(10)).unwrap(),
            loan_id: LoanId::new(1),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event\":\"AddNewLoanRequest\""));
        assert!(json.contains("\"borrower\":\"alice\""));
        assert!(json.contains("\"loan_id\":1"));
    }

    #[test]
    fn test_event_loan_id() {
        let event = LoanEvent::RequestClosed {
            loan_id: LoanId::new(7),
        };
        assert_eq!(event.loan_id(), LoanId::new(7));
    }
}
