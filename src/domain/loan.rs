use crate::error::{LoanError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Unique identifier of a loan, allocated monotonically by the registry.
///
/// Identifiers are never reused for the lifetime of the system, including
/// across restarts when a persistent store is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LoanId(u64);

impl LoanId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A verified caller identity, supplied by the execution environment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Party(String);

impl Party {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Party {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated positive monetary amount.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(LoanError::InvalidAmount(value))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = LoanError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl From<Amount> for Balance {
    fn from(amount: Amount) -> Self {
        Self(amount.0)
    }
}

/// A running monetary balance. Unlike [`Amount`] it may be zero.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Balance(pub Decimal);

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Self(value)
    }
}

impl Add for Balance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Balance {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for Balance {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Balance {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

/// Lifecycle state of a loan.
///
/// Valid transitions:
/// - Requested → Approved (approve)
/// - Requested → Closed (close) / Declined (decline)
/// - Approved → Accepted (accept) / Closed (close) / Declined (decline)
///
/// Accepted, Closed and Declined are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanState {
    Requested,
    Approved,
    Accepted,
    Declined,
    Closed,
}

impl LoanState {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::Approved => "approved",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Closed => "closed",
        }
    }

    /// Returns true if no further transitions are permitted.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted | Self::Declined | Self::Closed)
    }
}

impl fmt::Display for LoanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single borrower's funding request and its lifecycle state.
///
/// `escrow` holds the funds committed by the lender between approval and
/// resolution; it is always either zero or exactly the approved amount, and
/// is drained together with the transition into a terminal state.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Loan {
    pub id: LoanId,
    pub borrower: Party,
    pub lender: Option<Party>,
    pub requested: Amount,
    pub approved: Option<Amount>,
    pub escrow: Balance,
    pub state: LoanState,
}

impl Loan {
    pub fn new(id: LoanId, borrower: Party, requested: Amount) -> Self {
        Self {
            id,
            borrower,
            lender: None,
            requested,
            approved: None,
            escrow: Balance::ZERO,
            state: LoanState::Requested,
        }
    }

    /// Records the lender's escrowed funds and moves the loan to Approved.
    ///
    /// The escrowed amount is independent of the requested amount; the
    /// accept path reconciles the difference.
    pub fn approve(&mut self, lender: Party, amount: Amount) {
        self.lender = Some(lender);
        self.approved = Some(amount);
        self.escrow = amount.into();
        self.state = LoanState::Approved;
    }

    /// Lender identity and escrowed amount of a funded loan.
    pub fn funding(&self) -> Option<(&Party, Amount)> {
        match (&self.lender, self.approved) {
            (Some(lender), Some(amount)) => Some((lender, amount)),
            _ => None,
        }
    }

    /// Splits the current escrow into the borrower payout and the lender
    /// refund: the borrower receives at most the requested amount, any
    /// surplus goes back to the lender. The two legs always sum to the
    /// full escrow.
    pub fn disbursement(&self) -> (Balance, Balance) {
        let requested: Balance = self.requested.into();
        let payout = if self.escrow > requested {
            requested
        } else {
            self.escrow
        };
        (payout, self.escrow - payout)
    }

    /// Drains the escrow and moves the loan into a terminal state.
    pub fn settle(&mut self, next: LoanState) {
        self.escrow = Balance::ZERO;
        self.state = next;
    }
}
