use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use ynab_monarch_core::{Money, RegisterRow};

/// End-of-day balance of one account, for the consolidated balance table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Account")]
    pub account: String,
    #[serde(rename = "Balance")]
    pub balance: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyBalance {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Balance")]
    pub balance: Money,
}

/// One account's balances: one entry per date with activity, ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountBalanceSeries {
    pub account: String,
    pub entries: Vec<DailyBalance>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Balances {
    pub global: Vec<BalanceRow>,
    pub per_account: Vec<AccountBalanceSeries>,
}

impl Balances {
    pub fn account(&self, name: &str) -> Option<&AccountBalanceSeries> {
        self.per_account.iter().find(|s| s.account == name)
    }
}

/// Running balances per account, keeping only the last balance of each day.
///
/// Accounts appear in the order they first occur in the register. Rows on the
/// same date keep their register order, so the end-of-day balance is the
/// cumulative sum after the last of them.
pub fn derive_balances(rows: &[RegisterRow]) -> Balances {
    let mut order: Vec<&str> = Vec::new();
    let mut by_account: HashMap<&str, Vec<(String, Money)>> = HashMap::new();

    for row in rows {
        let account = row.account();
        by_account
            .entry(account)
            .or_insert_with(|| {
                order.push(account);
                Vec::new()
            })
            .push((row.date(), row.signed_amount()));
    }

    let mut balances = Balances::default();
    for account in order {
        let Some(mut items) = by_account.remove(account) else {
            continue;
        };
        items.sort_by(|a, b| a.0.cmp(&b.0));

        let mut running = Money::zero();
        let mut end_of_day: BTreeMap<String, Money> = BTreeMap::new();
        for (date, amount) in items {
            running = running + amount;
            end_of_day.insert(date, running);
        }

        let entries: Vec<DailyBalance> = end_of_day
            .into_iter()
            .map(|(date, balance)| DailyBalance { date, balance })
            .collect();

        balances.global.extend(entries.iter().map(|e| BalanceRow {
            date: e.date.clone(),
            account: account.to_string(),
            balance: e.balance,
        }));
        balances.per_account.push(AccountBalanceSeries {
            account: account.to_string(),
            entries,
        });
    }

    tracing::debug!(
        "Derived {} daily balances across {} accounts",
        balances.global.len(),
        balances.per_account.len()
    );
    balances
}
