//! extracto-core: domain types shared by the statement engine

pub mod period;
pub mod time;
pub mod transaction;

pub use period::{Period, PeriodSource, month_from_spanish};
pub use time::{clamp_to_month, days_in_month, iso_date};
pub use transaction::{Category, Direction, Transaction};
