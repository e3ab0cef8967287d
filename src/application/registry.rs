use crate::domain::loan::{Amount, Loan, LoanId, Party};
use crate::domain::ports::LoanStoreBox;
use crate::error::{LoanError, Result};
use std::sync::atomic::{AtomicU64, Ordering};

/// Single source of truth for loan records.
///
/// Allocates identifiers and stores `Loan` records; carries no business
/// validation. Identifiers are monotonic and never reused: the counter is
/// seeded from the store's high-water mark on open, so a persistent run
/// never reissues an id.
pub struct LoanRegistry {
    store: LoanStoreBox,
    next_id: AtomicU64,
}

impl LoanRegistry {
    /// Opens the registry over a storage backend, recovering the
    /// identifier counter from previously stored loans.
    pub async fn open(store: LoanStoreBox) -> Result<Self> {
        let next = store
            .last_id()
            .await?
            .map(|id| id.as_u64() + 1)
            .unwrap_or(1);
        Ok(Self {
            store,
            next_id: AtomicU64::new(next),
        })
    }

    /// Allocates the next id and stores a new loan in state Requested.
    pub async fn create(&self, borrower: Party, requested: Amount) -> Result<Loan> {
        let id = LoanId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let loan = Loan::new(id, borrower, requested);
        self.store.store(loan.clone()).await?;
        Ok(loan)
    }

    pub async fn get(&self, id: LoanId) -> Result<Loan> {
        self.store.get(id).await?.ok_or(LoanError::NotFound(id))
    }

    /// Replaces the stored record. The engine calls this at most once per
    /// action, after all validation passed.
    pub async fn update(&self, loan: Loan) -> Result<()> {
        self.store.store(loan).await
    }

    pub async fn all(&self) -> Result<Vec<Loan>> {
        self.store.all().await
    }
}
