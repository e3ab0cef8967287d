use crate::domain::loan::{Balance, Loan, LoanId, Party};
use crate::domain::ports::{Ledger, LoanStore};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for loan records.
///
/// Uses `Arc<RwLock<HashMap<LoanId, Loan>>>` to allow shared concurrent
/// access. `Clone` shares the underlying map, which lets tests keep a
/// handle to a store they have handed to the registry.
#[derive(Default, Clone)]
pub struct InMemoryLoanStore {
    loans: Arc<RwLock<HashMap<LoanId, Loan>>>,
}

impl InMemoryLoanStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LoanStore for InMemoryLoanStore {
    async fn store(&self, loan: Loan) -> Result<()> {
        let mut loans = self.loans.write().await;
        loans.insert(loan.id, loan);
        Ok(())
    }

    async fn get(&self, id: LoanId) -> Result<Option<Loan>> {
        let loans = self.loans.read().await;
        Ok(loans.get(&id).cloned())
    }

    async fn all(&self) -> Result<Vec<Loan>> {
        let loans = self.loans.read().await;
        Ok(loans.values().cloned().collect())
    }

    async fn last_id(&self) -> Result<Option<LoanId>> {
        let loans = self.loans.read().await;
        Ok(loans.keys().max().copied())
    }
}

/// An in-memory ledger that accumulates the funds credited to each party.
///
/// Stands in for the external payments collaborator; `Clone` shares the
/// balances so callers can inspect what each party has received.
#[derive(Default, Clone)]
pub struct InMemoryLedger {
    credits: Arc<RwLock<HashMap<Party, Balance>>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total funds transferred to `party` so far.
    pub async fn received(&self, party: &Party) -> Balance {
        let credits = self.credits.read().await;
        credits.get(party).copied().unwrap_or(Balance::ZERO)
    }
}

#[async_trait]
impl Ledger for InMemoryLedger {
    async fn transfer(&self, to: &Party, amount: Balance) -> Result<()> {
        let mut credits = self.credits.write().await;
        let credited = credits.entry(to.clone()).or_insert(Balance::ZERO);
        *credited += amount;
        Ok(())
    }
}
