use std::fs::File;
use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;

use crate::application::{AppError, Teller, render_statement};
use crate::domain::{
    AccountNumber, Address, Cents, DEFAULT_SESSION_LIMIT, WithdrawalPolicy, format_cents, parse_cents,
};
use crate::io::Exporter;
use crate::registry::{DEFAULT_BRANCH, Directory};

/// Caixa - Single-Branch Banking Teller
#[derive(Parser)]
#[command(name = "caixa")]
#[command(about = "An interactive teller over an in-memory single-branch banking ledger")]
#[command(version)]
pub struct Cli {
    /// Branch code stamped on every account
    #[arg(short, long, default_value = DEFAULT_BRANCH)]
    pub branch: String,

    /// Per-withdrawal cap (e.g., "500.00" or "500")
    #[arg(long, default_value = "500.00")]
    pub withdrawal_cap: String,

    /// Withdrawals allowed per session
    #[arg(long, default_value_t = DEFAULT_SESSION_LIMIT)]
    pub session_limit: u32,
}

const MENU: &str = "
[d]  Deposit
[s]  Withdraw
[e]  Statement
[nu] New holder
[nc] New account
[lc] List accounts
[sc] Select account
[ex] Export statement to CSV
[q]  Quit
";

impl Cli {
    pub fn run(self) -> Result<()> {
        let cap = parse_cents(&self.withdrawal_cap)
            .context("Invalid withdrawal cap format. Use '500.00' or '500'")?;
        let policy = WithdrawalPolicy {
            per_withdrawal_cap_cents: cap,
            session_limit: self.session_limit,
        };
        let teller = Teller::new(Directory::new(self.branch), policy);

        let stdin = io::stdin();
        run_session(teller, stdin.lock(), io::stdout())
    }
}

/// The interactive menu loop. All prompting, free-text parsing and message
/// rendering happens here; the teller only ever sees parsed values.
pub fn run_session<R: BufRead, W: Write>(mut teller: Teller, mut input: R, mut out: W) -> Result<()> {
    writeln!(out, "Welcome to Caixa (branch {})", teller.branch())?;

    let mut selected: Option<AccountNumber> = None;

    loop {
        writeln!(out, "{}", MENU)?;
        let Some(option) = prompt(&mut input, &mut out, "Choose an option: ")? else {
            break; // stdin closed
        };

        match option.to_lowercase().as_str() {
            "d" => {
                let Some(number) = require_selected(selected, &mut out)? else {
                    continue;
                };
                let Some(amount) = prompt_amount(&mut input, &mut out, "Deposit amount: ")? else {
                    continue;
                };
                match teller.deposit(number, amount) {
                    Ok(receipt) => writeln!(
                        out,
                        "Deposited {} | Balance: {}",
                        format_cents(receipt.amount_cents),
                        format_cents(receipt.balance_cents)
                    )?,
                    Err(err) => report(&mut out, &err)?,
                }
            }

            "s" => {
                let Some(number) = require_selected(selected, &mut out)? else {
                    continue;
                };
                let Some(amount) = prompt_amount(&mut input, &mut out, "Withdrawal amount: ")?
                else {
                    continue;
                };
                match teller.withdraw(number, amount) {
                    Ok(result) => writeln!(
                        out,
                        "Withdrew {} | Balance: {} | Withdrawals: {}/{}",
                        format_cents(result.amount_cents),
                        format_cents(result.balance_cents),
                        result.withdrawals_made,
                        result.session_limit
                    )?,
                    Err(err) => report(&mut out, &err)?,
                }
            }

            "e" => {
                let Some(number) = require_selected(selected, &mut out)? else {
                    continue;
                };
                match teller.statement(number) {
                    Ok(statement) => write!(out, "\n{}", render_statement(&statement))?,
                    Err(err) => report(&mut out, &err)?,
                }
            }

            "nu" => {
                if let Err(err) = register_holder(&mut teller, &mut input, &mut out)? {
                    report(&mut out, &err)?;
                }
            }

            "nc" => {
                let Some(tax_id) = prompt(&mut input, &mut out, "Holder tax id: ")? else {
                    break;
                };
                match teller.open_account(&tax_id) {
                    Ok(opened) => writeln!(
                        out,
                        "Account created. Branch {}  Account {:04}  Holder: {}",
                        opened.branch, opened.number, opened.holder_name
                    )?,
                    Err(err) => report(&mut out, &err)?,
                }
            }

            "lc" => {
                let accounts = teller.list_accounts();
                if accounts.is_empty() {
                    writeln!(out, "No accounts registered.")?;
                } else {
                    for summary in accounts {
                        writeln!(
                            out,
                            "Branch: {}  | Account: {:04}  | Holder: {}  | Balance: {}",
                            summary.branch,
                            summary.number,
                            summary.holder_name,
                            format_cents(summary.balance_cents)
                        )?;
                    }
                }
            }

            "sc" => {
                let Some(raw) = prompt(&mut input, &mut out, "Account number (e.g., 1, 2, 3): ")?
                else {
                    break;
                };
                match raw.parse::<AccountNumber>() {
                    Ok(number) if teller.has_account(number) => {
                        selected = Some(number);
                        writeln!(out, "Account {:04} selected.", number)?;
                    }
                    Ok(number) => report(&mut out, &AppError::AccountNotFound(number))?,
                    Err(_) => writeln!(out, "Invalid account number.")?,
                }
            }

            "ex" => {
                let Some(number) = require_selected(selected, &mut out)? else {
                    continue;
                };
                let Some(path) = prompt(&mut input, &mut out, "Output file: ")? else {
                    break;
                };
                match export_statement(&teller, number, &path) {
                    Ok(count) => writeln!(out, "Exported {} entries to {}", count, path)?,
                    Err(err) => writeln!(out, "Export failed: {}", err)?,
                }
            }

            "q" => {
                writeln!(out, "Goodbye!")?;
                break;
            }

            _ => writeln!(out, "Invalid option. Try again.")?,
        }
    }

    Ok(())
}

/// Collect the holder registration form. The inner Result carries the
/// teller's validation outcome; the outer one is I/O.
fn register_holder<R: BufRead, W: Write>(
    teller: &mut Teller,
    input: &mut R,
    out: &mut W,
) -> Result<std::result::Result<(), AppError>> {
    writeln!(out, "\n=== New holder ===")?;

    let Some(tax_id) = prompt(input, out, "Tax id (digits only): ")? else {
        return Ok(Ok(()));
    };
    let Some(name) = prompt(input, out, "Full name: ")? else {
        return Ok(Ok(()));
    };
    let Some(birth_date) = prompt_birth_date(input, out)? else {
        return Ok(Ok(()));
    };
    let Some(street) = prompt(input, out, "Street: ")? else {
        return Ok(Ok(()));
    };
    let Some(number) = prompt(input, out, "Number: ")? else {
        return Ok(Ok(()));
    };
    let Some(district) = prompt(input, out, "District: ")? else {
        return Ok(Ok(()));
    };
    let Some(city) = prompt(input, out, "City: ")? else {
        return Ok(Ok(()));
    };
    let Some(state) = prompt(input, out, "State (two letters): ")? else {
        return Ok(Ok(()));
    };

    let address = Address::new(street, number, district, city, state);
    match teller.register_holder(&tax_id, name, birth_date, address) {
        Ok(holder) => {
            writeln!(out, "Holder {} registered ({}).", holder.name, holder.tax_id)?;
            Ok(Ok(()))
        }
        Err(err) => Ok(Err(err)),
    }
}

/// Read one trimmed line. `None` means stdin was closed.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> Result<Option<String>> {
    write!(out, "{}", label)?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Prompt for a money amount. Returns `Ok(None)` when the text does not
/// parse, after telling the user; the caller re-shows the menu.
fn prompt_amount<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
) -> Result<Option<Cents>> {
    let Some(raw) = prompt(input, out, label)? else {
        return Ok(None);
    };
    match parse_cents(&raw) {
        Ok(cents) => Ok(Some(cents)),
        Err(_) => {
            writeln!(out, "Invalid amount. Use '50.00', '50' or '50,00'.")?;
            Ok(None)
        }
    }
}

fn prompt_birth_date<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> Result<Option<NaiveDate>> {
    let Some(raw) = prompt(input, out, "Birth date (dd/mm/yyyy): ")? else {
        return Ok(None);
    };
    match NaiveDate::parse_from_str(&raw, "%d/%m/%Y") {
        Ok(date) => Ok(Some(date)),
        Err(_) => {
            writeln!(out, "Invalid date. Use dd/mm/yyyy.")?;
            Ok(None)
        }
    }
}

fn require_selected<W: Write>(
    selected: Option<AccountNumber>,
    out: &mut W,
) -> Result<Option<AccountNumber>> {
    if selected.is_none() {
        writeln!(out, "Select an account first ([sc]) or create one ([nc]).")?;
    }
    Ok(selected)
}

fn report<W: Write>(out: &mut W, err: &AppError) -> Result<()> {
    writeln!(out, "Operation refused: {}", err)?;
    Ok(())
}

fn export_statement(teller: &Teller, number: AccountNumber, path: &str) -> Result<usize> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path))?;
    Exporter::new(teller).export_statement_csv(number, file)
}
