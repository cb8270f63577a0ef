use serde::{Deserialize, Serialize};
use validator::Validate;

use super::court::CourtType;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CaseLookup {
    #[validate(length(min = 1, max = 64, message = "Case type must be 1-64 characters"))]
    pub case_type: String,
    #[validate(length(min = 1, max = 64, message = "Case number must be 1-64 characters"))]
    pub case_number: String,
    #[validate(range(min = 1900, max = 2100, message = "Year must be between 1900 and 2100"))]
    pub year: i32,
    pub court_type: CourtType,
}

/// Case fields as returned by a portal lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseDetails {
    pub parties: String,
    pub filing_date: String,
    pub next_hearing_date: String,
    pub case_status: String,
    pub judgment_url: Option<String>,
}

/// A stored lookup: the `queries` row joined with its `case_details` row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseQuery {
    pub id: i64,
    pub case_type: String,
    pub case_number: String,
    pub year: i64,
    pub court_type: String,
    pub timestamp: Option<chrono::NaiveDateTime>,
    pub raw_response: Option<String>,
    pub details: Option<CaseDetails>,
}
