// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use caixa::application::Teller;
use caixa::domain::{AccountNumber, Address, WithdrawalPolicy};
use caixa::registry::Directory;
use chrono::NaiveDate;

pub const ANA_TAX_ID: &str = "111.222.333-44";
pub const BRUNO_TAX_ID: &str = "55566677788";

pub fn birth_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1990, 3, 14).unwrap()
}

pub fn sample_address() -> Address {
    Address::new("Rua das Flores", "42", "Centro", "Recife", "PE")
}

/// Teller with default branch and limits and no registered holders.
pub fn new_teller() -> Teller {
    Teller::default()
}

/// Teller with custom withdrawal limits.
pub fn teller_with_policy(policy: WithdrawalPolicy) -> Teller {
    Teller::new(Directory::default(), policy)
}

/// Teller with one registered holder (Ana) and one open account.
pub fn teller_with_account() -> (Teller, AccountNumber) {
    let mut teller = new_teller();
    teller
        .register_holder(ANA_TAX_ID, "Ana Lima", birth_date(), sample_address())
        .unwrap();
    let opened = teller.open_account(ANA_TAX_ID).unwrap();
    (teller, opened.number)
}

/// Teller with one account funded with the given amount.
pub fn funded_teller(amount_cents: i64) -> (Teller, AccountNumber) {
    let (mut teller, number) = teller_with_account();
    teller.deposit(number, amount_cents).unwrap();
    (teller, number)
}
