pub mod cost;
pub mod savings;
