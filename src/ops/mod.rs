pub mod day;
pub mod order;
pub mod recur;
pub mod undo;
