pub mod case_query;
pub mod cause_list;
pub mod court;
pub mod error;
