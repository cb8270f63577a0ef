use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CourtType {
    HighCourt,
    #[default]
    DistrictCourt,
}

impl CourtType {
    /// Lenient form parsing: anything that is not `high_court` is a district court.
    pub fn from_form(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("high_court") => CourtType::HighCourt,
            _ => CourtType::DistrictCourt,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            CourtType::HighCourt => "high_court",
            CourtType::DistrictCourt => "district_court",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CourtType::HighCourt => "High Court",
            CourtType::DistrictCourt => "District Court",
        }
    }
}

impl fmt::Display for CourtType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}
