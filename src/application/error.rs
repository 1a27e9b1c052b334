use thiserror::Error;

use crate::domain::{AccountNumber, LedgerError};
use crate::registry::DirectoryError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Registry(#[from] DirectoryError),

    #[error("Account not found: {0}")]
    AccountNotFound(AccountNumber),
}
