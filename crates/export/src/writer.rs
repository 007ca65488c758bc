use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use ynab_monarch_import::Conversion;

pub const TRANSACTIONS_FILE: &str = "transactions_mapped.csv";
pub const BALANCES_FILE: &str = "balances_mapped.csv";
pub const UNMAPPED_FILE: &str = "unmapped_categories.csv";
pub const ACCOUNT_TRANSACTIONS_FILE: &str = "transactions.csv";
pub const ACCOUNT_BALANCES_FILE: &str = "balances.csv";

const TRANSACTION_COLUMNS: [&str; 10] = [
    "Date",
    "Description",
    "Original Description",
    "Amount",
    "Transaction Type",
    "Category",
    "Account Name",
    "Labels",
    "Notes",
    "Split Group ID",
];
const BALANCE_COLUMNS: [&str; 3] = ["Date", "Account", "Balance"];
const ACCOUNT_TRANSACTION_COLUMNS: [&str; 8] = [
    "Date",
    "Merchant",
    "Category",
    "Account",
    "Original Statement",
    "Notes",
    "Amount",
    "Tags",
];
const ACCOUNT_BALANCE_COLUMNS: [&str; 2] = ["Date", "Balance"];
const UNMAPPED_COLUMNS: [&str; 2] = ["Category Group", "Category"];

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write { path: PathBuf, source: csv::Error },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Write,
    /// Compute everything, write only the unmapped-categories report.
    ValidateOnly,
}

/// What a run produced, for reporting back to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub transactions: usize,
    pub balances: usize,
    pub accounts: usize,
    pub split_groups: usize,
    pub unmapped: usize,
    pub files: Vec<PathBuf>,
}

/// Directory name for an account's own tables.
pub fn account_dir_name(account: &str) -> String {
    account.replace([':', ' '], "_")
}

/// Write a conversion to `out_dir`.
///
/// An empty conversion writes nothing at all. In [`Mode::ValidateOnly`] only
/// the unmapped-categories report is written, and only when non-empty.
pub fn export(out_dir: &Path, conversion: &Conversion, mode: Mode) -> Result<ExportSummary, ExportError> {
    let mut summary = ExportSummary {
        transactions: conversion.transactions.len(),
        balances: conversion.balances.global.len(),
        accounts: conversion.per_account.len(),
        split_groups: conversion.split_group_count,
        unmapped: conversion.unmapped.len(),
        files: Vec::new(),
    };

    if conversion.is_empty() {
        tracing::warn!("Register has no transactions; no output written");
        return Ok(summary);
    }

    create_dir(out_dir)?;

    if mode == Mode::Write {
        let path = out_dir.join(TRANSACTIONS_FILE);
        write_table(&path, &TRANSACTION_COLUMNS, &conversion.transactions)?;
        summary.files.push(path);

        let path = out_dir.join(BALANCES_FILE);
        write_table(&path, &BALANCE_COLUMNS, &conversion.balances.global)?;
        summary.files.push(path);

        for account in &conversion.per_account {
            let dir = out_dir.join(account_dir_name(&account.account));
            create_dir(&dir)?;

            let path = dir.join(ACCOUNT_TRANSACTIONS_FILE);
            write_table(&path, &ACCOUNT_TRANSACTION_COLUMNS, &account.rows)?;
            summary.files.push(path);

            let entries = conversion
                .balances
                .account(&account.account)
                .map(|series| series.entries.as_slice())
                .unwrap_or_default();
            let path = dir.join(ACCOUNT_BALANCES_FILE);
            write_table(&path, &ACCOUNT_BALANCE_COLUMNS, entries)?;
            summary.files.push(path);
        }
    }

    if !conversion.unmapped.is_empty() {
        let path = out_dir.join(UNMAPPED_FILE);
        write_table(&path, &UNMAPPED_COLUMNS, &conversion.unmapped)?;
        tracing::warn!(
            "{} unmapped categories written to {}",
            conversion.unmapped.len(),
            path.display()
        );
        summary.files.push(path);
    }

    Ok(summary)
}

fn create_dir(path: &Path) -> Result<(), ExportError> {
    std::fs::create_dir_all(path).map_err(|source| ExportError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

fn write_table<T: Serialize>(
    path: &Path,
    columns: &[&str],
    rows: impl IntoIterator<Item = T>,
) -> Result<(), ExportError> {
    write_csv(path, columns, rows).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}

/// The header is written explicitly so that empty tables still carry one.
fn write_csv<T: Serialize>(
    path: &Path,
    columns: &[&str],
    rows: impl IntoIterator<Item = T>,
) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(columns)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
