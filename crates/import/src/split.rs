use std::collections::HashMap;
use std::fmt;
use ynab_monarch_core::{Money, RegisterRow};

use crate::util::short_digest;

/// YNAB exports a split transaction as several rows sharing account, date
/// and payee, with nothing else tying them together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SplitGroupKey {
    pub account: String,
    pub date: String,
    pub payee: String,
}

impl SplitGroupKey {
    pub fn for_row(row: &RegisterRow) -> Self {
        SplitGroupKey {
            account: row.account().to_string(),
            date: row.date(),
            payee: row.payee().to_string(),
        }
    }
}

/// Everything a split ID is derived from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SplitContentKey {
    pub account: String,
    pub date: String,
    pub payee: String,
    pub total: Money,
    pub row_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SplitGroupId(String);

impl SplitGroupId {
    /// `SPLIT-<yyyymmdd>-<hex8>`, where the hex is the leading eight
    /// characters of the SHA-256 of `date|account|payee|total|row_count`.
    pub fn derive(key: &SplitContentKey) -> Self {
        let base = format!(
            "{}|{}|{}|{}|{}",
            key.date, key.account, key.payee, key.total, key.row_count
        );
        SplitGroupId(format!(
            "SPLIT-{}-{}",
            key.date.replace('-', ""),
            short_digest(&base)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SplitGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Split groups detected across a whole register.
#[derive(Debug, Clone, Default)]
pub struct SplitGroups {
    counts: HashMap<SplitGroupKey, usize>,
    ids: HashMap<SplitGroupKey, SplitGroupId>,
    by_content: HashMap<SplitContentKey, SplitGroupId>,
}

impl SplitGroups {
    pub fn build(rows: &[RegisterRow]) -> Self {
        let mut members: HashMap<SplitGroupKey, Vec<Money>> = HashMap::new();
        for row in rows {
            members
                .entry(SplitGroupKey::for_row(row))
                .or_default()
                .push(row.signed_amount());
        }

        let mut groups = SplitGroups::default();
        for (key, amounts) in members {
            let row_count = amounts.len();
            if row_count > 1 {
                let content = SplitContentKey {
                    account: key.account.clone(),
                    date: key.date.clone(),
                    payee: key.payee.clone(),
                    total: amounts.into_iter().sum(),
                    row_count,
                };
                let id = SplitGroupId::derive(&content);
                groups.ids.insert(key.clone(), id.clone());
                groups.by_content.insert(content, id);
            }
            groups.counts.insert(key, row_count);
        }

        tracing::debug!("Detected {} split groups", groups.ids.len());
        groups
    }

    /// Number of register rows sharing this account, date and payee.
    pub fn count(&self, key: &SplitGroupKey) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// The split this row belongs to, if it shares its key with other rows.
    pub fn id_for(&self, row: &RegisterRow) -> Option<&SplitGroupId> {
        self.ids.get(&SplitGroupKey::for_row(row))
    }

    pub fn by_content_key(&self, key: &SplitContentKey) -> Option<&SplitGroupId> {
        self.by_content.get(key)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
