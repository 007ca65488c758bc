pub mod date;
pub mod money;
pub mod register;

pub use date::{normalize_date, parse_date};
pub use money::{parse_money, Money, TransactionType};
pub use register::RegisterRow;
