use crate::application::registry::LoanRegistry;
use crate::domain::action::{Action, ActionKind};
use crate::domain::event::LoanEvent;
use crate::domain::loan::{Amount, Balance, Loan, LoanId, LoanState, Party};
use crate::domain::ports::LedgerBox;
use crate::error::{LoanError, Result};
use rust_decimal::Decimal;

/// The loan lifecycle state machine and escrow accounting layer.
///
/// Validates caller identity and state preconditions, executes fund
/// movements through the [`Ledger`](crate::domain::ports::Ledger)
/// capability, mutates loans via the registry and returns the emitted
/// event. The engine keeps no state of its own between calls and awaits
/// every storage and ledger operation, so actions apply strictly one at a
/// time. Each action validates everything first, then commits the state
/// change, then runs the outbound transfer legs: a transfer can never
/// observe pre-commit state.
pub struct LoanEngine {
    owner: Party,
    registry: LoanRegistry,
    ledger: LedgerBox,
}

impl LoanEngine {
    /// Creates an engine with `owner` as the single privileged
    /// lender identity.
    pub fn new(owner: Party, registry: LoanRegistry, ledger: LedgerBox) -> Self {
        Self {
            owner,
            registry,
            ledger,
        }
    }

    /// Dispatches a submitted action to the matching operation.
    pub async fn submit(&self, action: Action) -> Result<LoanEvent> {
        match action.kind {
            ActionKind::Request => {
                let amount = action
                    .amount
                    .ok_or_else(|| LoanError::MalformedAction("request needs an amount".into()))?;
                self.request(&action.caller, amount).await
            }
            ActionKind::Approve => {
                let id = require_loan(&action)?;
                let funds = action
                    .amount
                    .ok_or_else(|| LoanError::MalformedAction("approve needs an amount".into()))?;
                self.approve(&action.caller, id, funds).await
            }
            ActionKind::Accept => self.accept(&action.caller, require_loan(&action)?).await,
            ActionKind::Close => self.close(&action.caller, require_loan(&action)?).await,
            ActionKind::Decline => self.decline(&action.caller, require_loan(&action)?).await,
        }
    }

    /// Creates a new loan request for the caller. No funds move.
    pub async fn request(&self, caller: &Party, amount: Decimal) -> Result<LoanEvent> {
        let amount = Amount::new(amount)?;
        let loan = self.registry.create(caller.clone(), amount).await?;
        Ok(LoanEvent::AddNewLoanRequest {
            borrower: loan.borrower,
            amount,
            loan_id: loan.id,
        })
    }

    /// Escrows the attached funds against a requested loan. Only the owner
    /// may approve; the escrowed amount may be below, equal to, or above
    /// the requested amount.
    pub async fn approve(&self, caller: &Party, id: LoanId, funds: Decimal) -> Result<LoanEvent> {
        let mut loan = self.registry.get(id).await?;
        if caller != &self.owner {
            return Err(LoanError::Unauthorized {
                caller: caller.clone(),
                action: "approve",
            });
        }
        if loan.state != LoanState::Requested {
            return Err(LoanError::InvalidState { state: loan.state });
        }
        let funds = Amount::new(funds)?;

        loan.approve(caller.clone(), funds);
        let borrower = loan.borrower.clone();
        self.registry.update(loan).await?;

        Ok(LoanEvent::RequestApproved {
            borrower,
            loan_id: id,
            amount: funds,
        })
    }

    /// Draws the escrowed funds: the borrower receives at most the
    /// requested amount and any surplus returns to the lender, both legs
    /// in the same atomic step. The emitted amount is the full escrow,
    /// for audit.
    pub async fn accept(&self, caller: &Party, id: LoanId) -> Result<LoanEvent> {
        let mut loan = self.registry.get(id).await?;
        if caller != &loan.borrower {
            return Err(LoanError::Unauthorized {
                caller: caller.clone(),
                action: "accept",
            });
        }
        if loan.state != LoanState::Approved {
            return Err(LoanError::InvalidState { state: loan.state });
        }
        let (lender, escrowed) = funding_of(&loan)?;

        let (payout, refund) = loan.disbursement();
        let borrower = loan.borrower.clone();
        loan.settle(LoanState::Accepted);
        self.registry.update(loan).await?;

        self.ledger.transfer(&borrower, payout).await?;
        if refund > Balance::ZERO {
            self.ledger.transfer(&lender, refund).await?;
        }

        Ok(LoanEvent::RequestAccepted {
            borrower,
            loan_id: id,
            amount: escrowed,
        })
    }

    /// The borrower's unilateral withdrawal path, valid before or after
    /// funding. Any escrowed funds return in full to the lender.
    pub async fn close(&self, caller: &Party, id: LoanId) -> Result<LoanEvent> {
        let mut loan = self.registry.get(id).await?;
        if caller != &loan.borrower {
            return Err(LoanError::Unauthorized {
                caller: caller.clone(),
                action: "close",
            });
        }
        self.release(&mut loan, LoanState::Closed).await?;
        Ok(LoanEvent::RequestClosed { loan_id: id })
    }

    /// The lender's unilateral rejection path, valid before or after
    /// funding. Any escrowed funds return in full to the lender.
    pub async fn decline(&self, caller: &Party, id: LoanId) -> Result<LoanEvent> {
        let mut loan = self.registry.get(id).await?;
        if caller != &self.owner {
            return Err(LoanError::Unauthorized {
                caller: caller.clone(),
                action: "decline",
            });
        }
        self.release(&mut loan, LoanState::Declined).await?;
        Ok(LoanEvent::RequestRejected { loan_id: id })
    }

    /// Shared close/decline tail: settles the loan into `next` and refunds
    /// the full escrow to the lender if the loan was funded.
    async fn release(&self, loan: &mut Loan, next: LoanState) -> Result<()> {
        let refund = match loan.state {
            LoanState::Requested => Balance::ZERO,
            LoanState::Approved => loan.escrow,
            state => return Err(LoanError::InvalidState { state }),
        };
        let lender = loan.lender.clone();

        loan.settle(next);
        self.registry.update(loan.clone()).await?;

        if refund > Balance::ZERO {
            if let Some(lender) = lender {
                self.ledger.transfer(&lender, refund).await?;
            }
        }
        Ok(())
    }

    /// Reads back a single loan record.
    pub async fn loan(&self, id: LoanId) -> Result<Loan> {
        self.registry.get(id).await
    }

    /// Consumes the engine and returns the final state of all loans.
    pub async fn into_loans(self) -> Result<Vec<Loan>> {
        self.registry.all().await
    }
}

fn require_loan(action: &Action) -> Result<LoanId> {
    action
        .loan
        .ok_or_else(|| LoanError::MalformedAction("action needs a loan id".into()))
}

fn funding_of(loan: &Loan) -> Result<(Party, Amount)> {
    match loan.funding() {
        Some((lender, amount)) => Ok((lender.clone(), amount)),
        None => Err(LoanError::Storage(format!(
            "loan {} is approved but has no funding record",
            loan.id
        ))),
    }
}
