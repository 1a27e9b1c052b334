use chrono::NaiveDate;

use crate::domain::{
    self, Account, AccountNumber, Address, Cents, Holder, WithdrawalPolicy,
};
use crate::registry::Directory;

use super::{AccountStatement, AppError};

/// Application service providing high-level operations for one branch.
/// This is the primary interface for any client (CLI, tests, etc.).
pub struct Teller {
    directory: Directory,
    policy: WithdrawalPolicy,
}

/// Result of opening an account
#[derive(Debug, Clone)]
pub struct AccountOpened {
    pub branch: String,
    pub number: AccountNumber,
    pub holder_name: String,
}

/// Result of a deposit
#[derive(Debug, Clone)]
pub struct DepositReceipt {
    pub number: AccountNumber,
    pub amount_cents: Cents,
    pub balance_cents: Cents,
}

/// Result of a withdrawal
#[derive(Debug, Clone)]
pub struct WithdrawalResult {
    pub number: AccountNumber,
    pub amount_cents: Cents,
    pub balance_cents: Cents,
    pub withdrawals_made: u32,
    pub session_limit: u32,
}

/// One row of the account listing
#[derive(Debug, Clone)]
pub struct AccountSummary {
    pub branch: String,
    pub number: AccountNumber,
    pub holder_name: String,
    pub balance_cents: Cents,
}

impl Teller {
    /// Create a teller for the given branch with the given limits.
    pub fn new(directory: Directory, policy: WithdrawalPolicy) -> Self {
        Self { directory, policy }
    }

    pub fn policy(&self) -> WithdrawalPolicy {
        self.policy
    }

    pub fn branch(&self) -> &str {
        self.directory.branch()
    }

    // ========================
    // Holder operations
    // ========================

    /// Register a new holder.
    pub fn register_holder(
        &mut self,
        raw_tax_id: &str,
        name: impl Into<String>,
        birth_date: NaiveDate,
        address: Address,
    ) -> Result<Holder, AppError> {
        let holder = self
            .directory
            .register_holder(raw_tax_id, name, birth_date, address)?;
        Ok(holder.clone())
    }

    /// Look up a holder by tax id.
    pub fn find_holder(&self, raw_tax_id: &str) -> Option<&Holder> {
        self.directory.find_holder(raw_tax_id)
    }

    // ========================
    // Account operations
    // ========================

    /// Open an account for an existing holder.
    pub fn open_account(&mut self, raw_tax_id: &str) -> Result<AccountOpened, AppError> {
        let (branch, number) = {
            let account = self.directory.open_account(raw_tax_id)?;
            (account.branch.clone(), account.number)
        };
        let holder_name = self
            .directory
            .find_holder(raw_tax_id)
            .map(|h| h.name.clone())
            .unwrap_or_default();

        Ok(AccountOpened {
            branch,
            number,
            holder_name,
        })
    }

    /// List all accounts in creation order.
    pub fn list_accounts(&self) -> Vec<AccountSummary> {
        self.directory
            .list_accounts()
            .map(|account| AccountSummary {
                branch: account.branch.clone(),
                number: account.number,
                holder_name: self.holder_name(account),
                balance_cents: account.balance_cents,
            })
            .collect()
    }

    /// Whether an account with this number exists.
    pub fn has_account(&self, number: AccountNumber) -> bool {
        self.directory.account(number).is_some()
    }

    // ========================
    // Ledger operations
    // ========================

    /// Deposit into an account.
    pub fn deposit(
        &mut self,
        number: AccountNumber,
        amount_cents: Cents,
    ) -> Result<DepositReceipt, AppError> {
        let account = self
            .directory
            .account_mut(number)
            .ok_or(AppError::AccountNotFound(number))?;

        let balance_cents = domain::deposit(account, amount_cents)?;

        Ok(DepositReceipt {
            number,
            amount_cents,
            balance_cents,
        })
    }

    /// Withdraw from an account under the teller's configured policy.
    pub fn withdraw(
        &mut self,
        number: AccountNumber,
        amount_cents: Cents,
    ) -> Result<WithdrawalResult, AppError> {
        let policy = self.policy;
        let account = self
            .directory
            .account_mut(number)
            .ok_or(AppError::AccountNotFound(number))?;

        let receipt = domain::withdraw(account, amount_cents, &policy)?;

        Ok(WithdrawalResult {
            number,
            amount_cents,
            balance_cents: receipt.balance_cents,
            withdrawals_made: receipt.withdrawals_made,
            session_limit: policy.session_limit,
        })
    }

    /// Build the statement view for an account.
    pub fn statement(&self, number: AccountNumber) -> Result<AccountStatement, AppError> {
        let account = self
            .directory
            .account(number)
            .ok_or(AppError::AccountNotFound(number))?;

        Ok(AccountStatement::for_account(
            account,
            self.holder_name(account),
        ))
    }

    /// Snapshot of every account, for export.
    pub fn accounts(&self) -> Vec<Account> {
        self.directory.list_accounts().cloned().collect()
    }

    fn holder_name(&self, account: &Account) -> String {
        self.directory
            .find_holder(account.holder.as_str())
            .map(|h| h.name.clone())
            .unwrap_or_default()
    }
}

impl Default for Teller {
    fn default() -> Self {
        Self::new(Directory::default(), WithdrawalPolicy::default())
    }
}
