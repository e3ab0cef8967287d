use crate::domain::loan::{Loan, LoanId};
use crate::domain::ports::LoanStore;
use crate::error::{LoanError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing loan records.
pub const CF_LOANS: &str = "loans";

/// A persistent loan store implementation using RocksDB.
///
/// Loans are keyed by their big-endian id and stored as JSON, so iterating
/// the column family yields them in id order and the registry can recover
/// its allocation counter from the last key.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbLoanStore {
    db: Arc<DB>,
}

impl RocksDbLoanStore {
    /// Opens or creates a RocksDB instance at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_loans = ColumnFamilyDescriptor::new(CF_LOANS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_loans])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db
            .cf_handle(CF_LOANS)
            .ok_or_else(|| LoanError::Storage("loans column family not found".to_string()))
    }
}

#[async_trait]
impl LoanStore for RocksDbLoanStore {
    async fn store(&self, loan: Loan) -> Result<()> {
        let cf = self.cf()?;
        let key = loan.id.as_u64().to_be_bytes();
        let value = serde_json::to_vec(&loan)?;
        self.db.put_cf(cf, key, value)?;
        Ok(())
    }

    async fn get(&self, id: LoanId) -> Result<Option<Loan>> {
        let cf = self.cf()?;
        let key = id.as_u64().to_be_bytes();
        match self.db.get_cf(cf, key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn all(&self) -> Result<Vec<Loan>> {
        let cf = self.cf()?;
        let mut loans = Vec::new();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item?;
            loans.push(serde_json::from_slice(&value)?);
        }
        Ok(loans)
    }

    async fn last_id(&self) -> Result<Option<LoanId>> {
        let cf = self.cf()?;
        let mut iter = self.db.iterator_cf(cf, rocksdb::IteratorMode::End);
        match iter.next() {
            Some(item) => {
                let (key, _value) = item?;
                let bytes: [u8; 8] = key.as_ref().try_into().map_err(|_| {
                    LoanError::Storage("loan key is not a u64".to_string())
                })?;
                Ok(Some(LoanId::new(u64::from_be_bytes(bytes))))
            }
            None => Ok(None),
        }
    }
}
