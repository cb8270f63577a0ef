pub mod cause_lists;
pub mod connection;
pub mod queries;
