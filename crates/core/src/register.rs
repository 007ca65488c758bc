use serde::{Deserialize, Serialize};

use super::date::normalize_date;
use super::money::{parse_money, Money};

/// One line of a YNAB register export, exactly as read. Columns missing from
/// the export deserialize as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRow {
    #[serde(rename = "Account", default)]
    account: String,
    #[serde(rename = "Date", default)]
    date: String,
    #[serde(rename = "Payee", default)]
    payee: String,
    #[serde(rename = "Memo", default)]
    memo: String,
    #[serde(rename = "Category Group", default)]
    category_group: String,
    #[serde(rename = "Category", default)]
    category: String,
    #[serde(rename = "Inflow", default)]
    inflow: String,
    #[serde(rename = "Outflow", default)]
    outflow: String,
}

impl RegisterRow {
    pub fn new(account: &str, date: &str, payee: &str) -> Self {
        RegisterRow {
            account: account.to_string(),
            date: date.to_string(),
            payee: payee.to_string(),
            ..Default::default()
        }
    }

    pub fn with_memo(mut self, memo: &str) -> Self {
        self.memo = memo.to_string();
        self
    }

    pub fn with_category(mut self, group: &str, category: &str) -> Self {
        self.category_group = group.to_string();
        self.category = category.to_string();
        self
    }

    pub fn with_inflow(mut self, inflow: &str) -> Self {
        self.inflow = inflow.to_string();
        self
    }

    pub fn with_outflow(mut self, outflow: &str) -> Self {
        self.outflow = outflow.to_string();
        self
    }

    pub fn account(&self) -> &str {
        self.account.trim()
    }

    pub fn raw_date(&self) -> &str {
        &self.date
    }

    /// The row date as `YYYY-MM-DD`, or the raw text if it is in no known layout.
    pub fn date(&self) -> String {
        normalize_date(&self.date)
    }

    pub fn payee(&self) -> &str {
        self.payee.trim()
    }

    pub fn memo(&self) -> &str {
        self.memo.trim()
    }

    pub fn category_group(&self) -> &str {
        self.category_group.trim()
    }

    pub fn category(&self) -> &str {
        self.category.trim()
    }

    pub fn inflow(&self) -> Money {
        parse_money(&self.inflow)
    }

    pub fn outflow(&self) -> Money {
        parse_money(&self.outflow)
    }

    /// Inflow minus outflow.
    pub fn signed_amount(&self) -> Money {
        self.inflow() - self.outflow()
    }
}
