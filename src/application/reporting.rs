use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{self, Account, AccountNumber, Cents, TransactionKind, format_cents};

/// Statement view of one account: every movement in chronological order
/// plus the current balance. Storage stays typed; turning this into text
/// is a separate, stateless step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountStatement {
    pub branch: String,
    pub number: AccountNumber,
    pub holder_name: String,
    pub entries: Vec<StatementEntry>,
    pub balance_cents: Cents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementEntry {
    pub kind: TransactionKind,
    /// Signed effect on the balance: positive deposits, negative withdrawals.
    pub signed_cents: Cents,
    pub timestamp: DateTime<Utc>,
}

impl AccountStatement {
    pub fn for_account(account: &Account, holder_name: String) -> Self {
        let entries = domain::statement(account)
            .map(|t| StatementEntry {
                kind: t.kind,
                signed_cents: t.signed_cents(),
                timestamp: t.timestamp,
            })
            .collect();

        Self {
            branch: account.branch.clone(),
            number: account.number,
            holder_name,
            entries,
            balance_cents: account.balance_cents,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Render a statement as teller-facing text. An account with no movements
/// gets its own line instead of an empty table.
pub fn render_statement(statement: &AccountStatement) -> String {
    let mut out = String::new();

    out.push_str("====== STATEMENT ======\n");
    out.push_str(&format!(
        "Branch {}  Account {:04}  Holder: {}\n",
        statement.branch, statement.number, statement.holder_name
    ));

    if statement.is_empty() {
        out.push_str("No movements recorded.\n");
    } else {
        for entry in &statement.entries {
            out.push_str(&render_entry(entry));
            out.push('\n');
        }
    }

    out.push_str("-----------------------\n");
    out.push_str(&format!("BALANCE: R$ {}\n", format_cents(statement.balance_cents)));
    out.push_str("=======================\n");

    out
}

fn render_entry(entry: &StatementEntry) -> String {
    let label = match entry.kind {
        TransactionKind::Deposit => "DEPOSIT",
        TransactionKind::Withdrawal => "WITHDRAWAL",
    };
    let sign = if entry.signed_cents < 0 { "-" } else { "" };
    format!(
        "{} | {:<10} | {}R$ {}",
        entry.timestamp.format("%d/%m/%Y %H:%M:%S"),
        label,
        sign,
        format_cents(entry.signed_cents.abs())
    )
}
