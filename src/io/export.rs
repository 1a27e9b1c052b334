use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::Teller;
use crate::domain::{Account, AccountNumber, format_cents};

/// Snapshot of every account in the branch, for JSON export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub branch: String,
    pub accounts: Vec<Account>,
}

/// Exporter for turning ledger data into CSV or JSON.
pub struct Exporter<'a> {
    teller: &'a Teller,
}

impl<'a> Exporter<'a> {
    pub fn new(teller: &'a Teller) -> Self {
        Self { teller }
    }

    /// Export one account's statement to CSV format.
    /// Returns the number of entry records written (excluding the header).
    pub fn export_statement_csv<W: Write>(
        &self,
        number: AccountNumber,
        writer: W,
    ) -> Result<usize> {
        let statement = self.teller.statement(number)?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        // Write header
        csv_writer.write_record(["timestamp", "kind", "amount_cents", "amount"])?;

        let mut count = 0;
        for entry in &statement.entries {
            csv_writer.write_record([
                entry.timestamp.to_rfc3339(),
                entry.kind.as_str().to_string(),
                entry.signed_cents.to_string(),
                format_cents(entry.signed_cents),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export all accounts as a JSON snapshot.
    pub fn export_accounts_json<W: Write>(&self, mut writer: W) -> Result<BranchSnapshot> {
        let snapshot = BranchSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            branch: self.teller.branch().to_string(),
            accounts: self.teller.accounts(),
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
