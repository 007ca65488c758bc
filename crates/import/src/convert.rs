use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use ynab_monarch_core::{Money, RegisterRow, TransactionType};

use crate::balance::{derive_balances, Balances};
use crate::mapping::{CategoryMapper, Resolution};
use crate::split::SplitGroups;

/// Payees YNAB generates for transfers between budget accounts.
pub const TRANSFER_PREFIX: &str = "Transfer :";
/// Payees YNAB generates for opening balances and reconciliation fixes.
pub const ADJUSTMENT_MARKERS: [&str; 2] = ["Starting Balance", "Reconciliation Balance Adjustment"];

pub const TRANSFERS_GROUP: &str = "Transfers";
pub const TRANSFER_CATEGORY: &str = "Transfer";
pub const ADJUSTMENT_CATEGORY: &str = "Balance Adjustments";

/// A row of the consolidated Monarch transaction import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Original Description")]
    pub original_description: String,
    #[serde(rename = "Amount")]
    pub amount: Money,
    #[serde(rename = "Transaction Type")]
    pub transaction_type: TransactionType,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Account Name")]
    pub account_name: String,
    #[serde(rename = "Labels")]
    pub labels: String,
    #[serde(rename = "Notes")]
    pub notes: String,
    #[serde(rename = "Split Group ID")]
    pub split_group_id: String,
}

/// The same transaction in Monarch's single-account import layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountTransactionRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Merchant")]
    pub merchant: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Account")]
    pub account: String,
    #[serde(rename = "Original Statement")]
    pub original_statement: String,
    #[serde(rename = "Notes")]
    pub notes: String,
    #[serde(rename = "Amount")]
    pub amount: Money,
    #[serde(rename = "Tags")]
    pub tags: String,
}

impl From<&TransactionRow> for AccountTransactionRow {
    fn from(tx: &TransactionRow) -> Self {
        AccountTransactionRow {
            date: tx.date.clone(),
            merchant: tx.description.clone(),
            category: tx.category.clone(),
            account: tx.account_name.clone(),
            original_statement: tx.original_description.clone(),
            notes: tx.notes.clone(),
            amount: tx.amount,
            tags: tx.labels.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountTransactions {
    pub account: String,
    pub rows: Vec<AccountTransactionRow>,
}

/// A YNAB (group, category) pair no mapping rule covered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct UnmappedCategory {
    #[serde(rename = "Category Group")]
    pub group: String,
    #[serde(rename = "Category")]
    pub category: String,
}

/// Everything derived from one register snapshot.
#[derive(Debug, Clone, Default)]
pub struct Conversion {
    pub transactions: Vec<TransactionRow>,
    pub per_account: Vec<AccountTransactions>,
    pub balances: Balances,
    pub unmapped: BTreeSet<UnmappedCategory>,
    pub split_group_count: usize,
}

impl Conversion {
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

pub fn convert(rows: &[RegisterRow], mapper: &CategoryMapper) -> Conversion {
    let splits = SplitGroups::build(rows);

    let mut conversion = Conversion::default();
    let mut account_index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let resolution = resolve_row(row, mapper);
        if !resolution.matched {
            conversion.unmapped.insert(UnmappedCategory {
                group: row.category_group().to_string(),
                category: row.category().to_string(),
            });
        }

        let payee = display_payee(row.payee());
        let amount = row.signed_amount();
        let tx = TransactionRow {
            date: row.date(),
            description: payee.clone(),
            original_description: payee,
            amount,
            transaction_type: amount.transaction_type(),
            category: resolution.category.to_string(),
            account_name: row.account().to_string(),
            labels: resolution.labels(),
            notes: row.memo().to_string(),
            split_group_id: splits
                .id_for(row)
                .map(|id| id.to_string())
                .unwrap_or_default(),
        };

        let idx = *account_index
            .entry(tx.account_name.clone())
            .or_insert_with(|| {
                conversion.per_account.push(AccountTransactions {
                    account: tx.account_name.clone(),
                    rows: Vec::new(),
                });
                conversion.per_account.len() - 1
            });
        conversion.per_account[idx].rows.push(AccountTransactionRow::from(&tx));
        conversion.transactions.push(tx);
    }

    conversion.balances = derive_balances(rows);
    conversion.split_group_count = conversion
        .transactions
        .iter()
        .map(|tx| tx.split_group_id.as_str())
        .filter(|id| !id.is_empty())
        .collect::<HashSet<_>>()
        .len();

    if !conversion.unmapped.is_empty() {
        tracing::warn!(
            "{} YNAB categories matched no mapping rule",
            conversion.unmapped.len()
        );
    }
    tracing::debug!(
        "Converted {} transactions ({} split groups)",
        conversion.transactions.len(),
        conversion.split_group_count
    );
    conversion
}

/// Transfers and balance adjustments get fixed categories; everything else
/// goes through the mapping rules.
fn resolve_row<'a>(row: &RegisterRow, mapper: &'a CategoryMapper) -> Resolution<'a> {
    let payee = row.payee();
    if payee.starts_with(TRANSFER_PREFIX) {
        return Resolution::forced(TRANSFERS_GROUP, TRANSFER_CATEGORY);
    }
    if ADJUSTMENT_MARKERS.iter().any(|m| payee.contains(m)) {
        return Resolution::forced(TRANSFERS_GROUP, ADJUSTMENT_CATEGORY);
    }
    mapper.resolve(row.category_group(), row.category(), row.memo())
}

/// `Transfer : Savings` becomes `Transfer: Savings`.
fn display_payee(payee: &str) -> String {
    if payee.starts_with(TRANSFER_PREFIX) {
        payee.replace(TRANSFER_PREFIX, "Transfer:").trim().to_string()
    } else {
        payee.to_string()
    }
}
