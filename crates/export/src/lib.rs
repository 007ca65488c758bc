pub mod writer;

pub use writer::{
    account_dir_name, export, ExportError, ExportSummary, Mode, ACCOUNT_BALANCES_FILE,
    ACCOUNT_TRANSACTIONS_FILE, BALANCES_FILE, TRANSACTIONS_FILE, UNMAPPED_FILE,
};
