use chrono::Utc;

use super::{Account, Cents, Transaction, TransactionKind, format_cents};

/// Default per-withdrawal cap: R$ 500.00.
pub const DEFAULT_WITHDRAWAL_CAP_CENTS: Cents = 50000;
/// Default number of withdrawals allowed per session.
pub const DEFAULT_SESSION_LIMIT: u32 = 3;

/// Withdrawal limits supplied by the caller on every withdrawal, so a
/// single engine serves per-account or per-product policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawalPolicy {
    pub per_withdrawal_cap_cents: Cents,
    pub session_limit: u32,
}

impl Default for WithdrawalPolicy {
    fn default() -> Self {
        Self {
            per_withdrawal_cap_cents: DEFAULT_WITHDRAWAL_CAP_CENTS,
            session_limit: DEFAULT_SESSION_LIMIT,
        }
    }
}

/// Outcome of a successful withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawalReceipt {
    pub balance_cents: Cents,
    pub withdrawals_made: u32,
}

/// Credit the account. Amounts must be positive; there is no upper bound
/// on deposit size. Returns the new balance.
pub fn deposit(account: &mut Account, amount_cents: Cents) -> Result<Cents, LedgerError> {
    if amount_cents <= 0 {
        return Err(LedgerError::InvalidAmount);
    }

    account.balance_cents += amount_cents;
    account
        .transactions
        .push(Transaction::new(TransactionKind::Deposit, amount_cents, Utc::now()));
    Ok(account.balance_cents)
}

/// Debit the account, subject to the policy.
///
/// The session-limit check comes first, before amount validity: once the
/// counter is exhausted the caller must see `LimitReached` no matter what
/// amount was requested. A withdrawal of exactly the cap succeeds.
///
/// Validation happens before any mutation, so a failed withdrawal leaves
/// balance, counter and log untouched.
pub fn withdraw(
    account: &mut Account,
    amount_cents: Cents,
    policy: &WithdrawalPolicy,
) -> Result<WithdrawalReceipt, LedgerError> {
    if account.withdrawals_made >= policy.session_limit {
        return Err(LedgerError::LimitReached {
            limit: policy.session_limit,
        });
    }
    if amount_cents <= 0 {
        return Err(LedgerError::InvalidAmount);
    }
    if amount_cents > policy.per_withdrawal_cap_cents {
        return Err(LedgerError::ExceedsWithdrawalCap {
            cap: policy.per_withdrawal_cap_cents,
            requested: amount_cents,
        });
    }
    if amount_cents > account.balance_cents {
        return Err(LedgerError::InsufficientFunds {
            balance: account.balance_cents,
            requested: amount_cents,
        });
    }

    account.balance_cents -= amount_cents;
    account.withdrawals_made += 1;
    account
        .transactions
        .push(Transaction::new(TransactionKind::Withdrawal, amount_cents, Utc::now()));

    Ok(WithdrawalReceipt {
        balance_cents: account.balance_cents,
        withdrawals_made: account.withdrawals_made,
    })
}

/// Every movement on the account in insertion order. Lazy and restartable:
/// call again for a fresh pass over the log.
pub fn statement(account: &Account) -> impl Iterator<Item = &Transaction> {
    account.transactions.iter()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    InvalidAmount,
    ExceedsWithdrawalCap { cap: Cents, requested: Cents },
    InsufficientFunds { balance: Cents, requested: Cents },
    LimitReached { limit: u32 },
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerError::InvalidAmount => {
                write!(f, "amount must be positive")
            }
            LedgerError::ExceedsWithdrawalCap { cap, requested } => {
                write!(
                    f,
                    "withdrawal of {} exceeds the {} per-withdrawal cap",
                    format_cents(*requested),
                    format_cents(*cap)
                )
            }
            LedgerError::InsufficientFunds { balance, requested } => {
                write!(
                    f,
                    "withdrawal of {} exceeds the available balance of {}",
                    format_cents(*requested),
                    format_cents(*balance)
                )
            }
            LedgerError::LimitReached { limit } => {
                write!(f, "session withdrawal limit reached ({})", limit)
            }
        }
    }
}

impl std::error::Error for LedgerError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaxId;

    fn test_account() -> Account {
        Account::open("0001", 1, TaxId::normalize("11122233344").unwrap())
    }

    #[test]
    fn test_deposit_increases_balance_and_logs() {
        let mut account = test_account();

        let balance = deposit(&mut account, 20000).unwrap();

        assert_eq!(balance, 20000);
        assert_eq!(account.balance_cents, 20000);
        assert_eq!(account.transactions.len(), 1);
        assert_eq!(account.transactions[0].kind, TransactionKind::Deposit);
        assert_eq!(account.transactions[0].amount_cents, 20000);
    }

    #[test]
    fn test_deposit_rejects_non_positive_amounts() {
        let mut account = test_account();

        assert_eq!(deposit(&mut account, 0), Err(LedgerError::InvalidAmount));
        assert_eq!(deposit(&mut account, -100), Err(LedgerError::InvalidAmount));
        assert_eq!(account.balance_cents, 0);
        assert!(account.transactions.is_empty());
    }

    #[test]
    fn test_deposit_has_no_upper_bound() {
        let mut account = test_account();
        assert!(deposit(&mut account, 1_000_000_00).is_ok());
    }

    #[test]
    fn test_withdraw_decreases_balance_and_counts() {
        let mut account = test_account();
        deposit(&mut account, 20000).unwrap();

        let receipt = withdraw(&mut account, 5000, &WithdrawalPolicy::default()).unwrap();

        assert_eq!(receipt.balance_cents, 15000);
        assert_eq!(receipt.withdrawals_made, 1);
        assert_eq!(account.transactions.len(), 2);
        assert_eq!(account.transactions[1].kind, TransactionKind::Withdrawal);
        // Magnitude is stored positive; the sign lives in the kind
        assert_eq!(account.transactions[1].amount_cents, 5000);
        assert_eq!(account.transactions[1].signed_cents(), -5000);
    }

    #[test]
    fn test_withdraw_rejects_non_positive_amounts() {
        let mut account = test_account();
        deposit(&mut account, 20000).unwrap();

        let result = withdraw(&mut account, 0, &WithdrawalPolicy::default());

        assert_eq!(result, Err(LedgerError::InvalidAmount));
        assert_eq!(account.balance_cents, 20000);
        assert_eq!(account.withdrawals_made, 0);
        assert_eq!(account.transactions.len(), 1);
    }

    #[test]
    fn test_withdraw_insufficient_funds_leaves_state_unchanged() {
        let mut account = test_account();
        deposit(&mut account, 20000).unwrap();

        // 500.00 is at the cap boundary, so the cap check passes and the
        // balance check is the one that fails
        let result = withdraw(&mut account, 50000, &WithdrawalPolicy::default());

        assert_eq!(
            result,
            Err(LedgerError::InsufficientFunds {
                balance: 20000,
                requested: 50000,
            })
        );
        assert_eq!(account.balance_cents, 20000);
        assert_eq!(account.withdrawals_made, 0);
        assert_eq!(account.transactions.len(), 1);
    }

    #[test]
    fn test_withdraw_cap_boundary() {
        let mut account = test_account();
        deposit(&mut account, 100000).unwrap();
        let policy = WithdrawalPolicy::default();

        // Exactly the cap succeeds
        assert!(withdraw(&mut account, 50000, &policy).is_ok());

        // One cent above fails without touching state
        let balance_before = account.balance_cents;
        let result = withdraw(&mut account, 50001, &policy);
        assert_eq!(
            result,
            Err(LedgerError::ExceedsWithdrawalCap {
                cap: 50000,
                requested: 50001,
            })
        );
        assert_eq!(account.balance_cents, balance_before);
        assert_eq!(account.withdrawals_made, 1);
    }

    #[test]
    fn test_session_limit_exhaustion() {
        let mut account = test_account();
        deposit(&mut account, 100000).unwrap();
        let policy = WithdrawalPolicy::default();

        for expected_count in 1..=3 {
            let receipt = withdraw(&mut account, 10000, &policy).unwrap();
            assert_eq!(receipt.withdrawals_made, expected_count);
        }

        assert_eq!(account.balance_cents, 70000);
        assert_eq!(
            withdraw(&mut account, 10000, &policy),
            Err(LedgerError::LimitReached { limit: 3 })
        );
        assert_eq!(account.balance_cents, 70000);
        assert_eq!(account.withdrawals_made, 3);
        assert_eq!(account.transactions.len(), 4);
    }

    #[test]
    fn test_limit_check_precedes_amount_validation() {
        let mut account = test_account();
        deposit(&mut account, 100000).unwrap();
        let policy = WithdrawalPolicy::default();

        for _ in 0..3 {
            withdraw(&mut account, 10000, &policy).unwrap();
        }

        // Even an invalid amount must report the exhausted limit
        assert_eq!(
            withdraw(&mut account, -1, &policy),
            Err(LedgerError::LimitReached { limit: 3 })
        );
        assert_eq!(
            withdraw(&mut account, 0, &policy),
            Err(LedgerError::LimitReached { limit: 3 })
        );
    }

    #[test]
    fn test_custom_policy() {
        let mut account = test_account();
        deposit(&mut account, 100000).unwrap();
        let policy = WithdrawalPolicy {
            per_withdrawal_cap_cents: 10000,
            session_limit: 1,
        };

        assert!(withdraw(&mut account, 10000, &policy).is_ok());
        assert_eq!(
            withdraw(&mut account, 100, &policy),
            Err(LedgerError::LimitReached { limit: 1 })
        );
    }

    #[test]
    fn test_balance_never_negative() {
        let mut account = test_account();
        let policy = WithdrawalPolicy::default();

        deposit(&mut account, 7500).unwrap();
        let _ = withdraw(&mut account, 5000, &policy);
        let _ = withdraw(&mut account, 5000, &policy);
        let _ = withdraw(&mut account, 2500, &policy);

        assert!(account.balance_cents >= 0);
        assert_eq!(account.balance_cents, 0);
    }

    #[test]
    fn test_statement_order_and_restartability() {
        let mut account = test_account();
        let policy = WithdrawalPolicy::default();

        deposit(&mut account, 20000).unwrap();
        withdraw(&mut account, 5000, &policy).unwrap();
        deposit(&mut account, 1000).unwrap();

        let kinds: Vec<_> = statement(&account).map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TransactionKind::Deposit,
                TransactionKind::Withdrawal,
                TransactionKind::Deposit,
            ]
        );

        // A second pass yields the same entries
        let again: Vec<_> = statement(&account).map(|t| t.kind).collect();
        assert_eq!(kinds, again);
    }

    #[test]
    fn test_statement_length_counts_successes_only() {
        let mut account = test_account();
        let policy = WithdrawalPolicy::default();

        deposit(&mut account, 20000).unwrap();
        let _ = deposit(&mut account, -5);
        let _ = withdraw(&mut account, 999999, &policy);
        withdraw(&mut account, 5000, &policy).unwrap();

        assert_eq!(statement(&account).count(), 2);
    }
}
