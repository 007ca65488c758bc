pub mod balance;
pub mod convert;
pub mod mapping;
pub mod register;
pub mod split;
pub(crate) mod util;

pub use balance::{derive_balances, AccountBalanceSeries, BalanceRow, Balances, DailyBalance};
pub use convert::{
    convert, AccountTransactionRow, AccountTransactions, Conversion, TransactionRow,
    UnmappedCategory,
};
pub use mapping::{CategoryMapper, MappingConfig, MappingError, MappingRule, Resolution};
pub use register::{load_register, read_register, RegisterError};
pub use split::{SplitContentKey, SplitGroupId, SplitGroupKey, SplitGroups};

