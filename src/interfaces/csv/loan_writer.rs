use crate::domain::loan::{Loan, Party};
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

/// Writes the final loan table as CSV to any `Write` sink.
///
/// Rows are sorted by loan id and amounts are normalized (trailing zeros
/// stripped) so the output is deterministic.
pub struct LoanWriter<W: Write> {
    writer: csv::Writer<W>,
}

#[derive(Serialize)]
struct LoanRow {
    loan: u64,
    borrower: String,
    lender: Option<String>,
    requested: Decimal,
    approved: Option<Decimal>,
    escrow: Decimal,
    state: &'static str,
}

impl From<&Loan> for LoanRow {
    fn from(loan: &Loan) -> Self {
        Self {
            loan: loan.id.as_u64(),
            borrower: loan.borrower.to_string(),
            lender: loan.lender.as_ref().map(|lender| lender.to_string()),
            requested: loan.requested.value().normalize(),
            approved: loan.approved.map(|a| a.value().normalize()),
            escrow: loan.escrow.0.normalize(),
            state: loan.state.as_str(),
        }
    }
}

impl<W: Write> LoanWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_loans(&mut self, mut loans: Vec<Loan>) -> Result<()> {
        loans.sort_by_key(|loan| loan.id);
        for loan in &loans {
            self.writer.serialize(LoanRow::from(loan))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
