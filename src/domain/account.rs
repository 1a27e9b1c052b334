use serde::{Deserialize, Serialize};

use super::{Cents, TaxId, Transaction};

/// Sequential account number, branch-scoped, starting at 1. Never reused.
pub type AccountNumber = u32;

/// Mutable account state: the balance, the session withdrawal counter and
/// the append-only transaction log. All mutation goes through the ledger
/// operations, which validate before applying.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub branch: String,
    pub number: AccountNumber,
    /// Non-owning link to the holder; the directory resolves it.
    pub holder: TaxId,
    pub balance_cents: Cents,
    /// Withdrawals performed this session. Never resets within a process.
    pub withdrawals_made: u32,
    pub transactions: Vec<Transaction>,
}

impl Account {
    /// A freshly opened account: zero balance, zero withdrawals, empty log.
    pub fn open(branch: impl Into<String>, number: AccountNumber, holder: TaxId) -> Self {
        Self {
            branch: branch.into(),
            number,
            holder,
            balance_cents: 0,
            withdrawals_made: 0,
            transactions: Vec::new(),
        }
    }
}
