use super::loan::{Balance, Loan, LoanId, Party};
use crate::error::Result;
use async_trait::async_trait;

/// Storage port backing the loan registry.
#[async_trait]
pub trait LoanStore: Send + Sync {
    async fn store(&self, loan: Loan) -> Result<()>;
    async fn get(&self, id: LoanId) -> Result<Option<Loan>>;
    async fn all(&self) -> Result<Vec<Loan>>;
    /// Highest identifier ever stored, if any. Used to recover the
    /// registry's allocation counter on open.
    async fn last_id(&self) -> Result<Option<LoanId>>;
}

/// Outbound payment capability. The engine invokes it exactly once per
/// outbound leg per action, and only after the state change is committed.
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn transfer(&self, to: &Party, amount: Balance) -> Result<()>;
}

pub type LoanStoreBox = Box<dyn LoanStore>;
pub type LedgerBox = Box<dyn Ledger>;
