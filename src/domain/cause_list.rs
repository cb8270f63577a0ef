use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CauseListEntry {
    pub case_number: String,
    pub case_type: String,
    pub parties: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseList {
    pub court: String,
    pub date: String,
    pub cases: Vec<CauseListEntry>,
}

impl CauseList {
    pub fn contains_case(&self, case_number: &str) -> bool {
        self.cases.iter().any(|case| case.case_number == case_number)
    }
}

/// A row of the `cause_lists` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseListRecord {
    pub id: Option<i64>,
    pub court_type: String,
    pub list_date: String,
    pub pdf_path: String,
    pub raw_data: Option<String>,
    pub created_at: Option<chrono::NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseListCheck {
    pub found: bool,
    pub date: String,
    pub court: String,
    pub case_number: String,
}
