use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{error, info};
use validator::Validate;

use super::court_scraper::CourtScraper;
use crate::domain::case_query::{CaseDetails, CaseLookup, CaseQuery};
use crate::domain::court::CourtType;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::db::queries::QueryRepository;

const DEFAULT_HISTORY_LIMIT: i64 = 50;

/// Raw lookup form fields, exactly as submitted.
#[derive(Debug, Default, Deserialize)]
pub struct CaseSearchForm {
    pub case_type: Option<String>,
    pub case_number: Option<String>,
    pub year: Option<String>,
    pub court_type: Option<String>,
}

impl CaseSearchForm {
    pub fn into_lookup(self) -> Result<CaseLookup> {
        let (Some(case_type), Some(case_number), Some(year)) = (
            present(self.case_type),
            present(self.case_number),
            present(self.year),
        ) else {
            return Err(AppError::ValidationError(
                "All fields are required".to_string(),
            ));
        };

        let year: i32 = year
            .parse()
            .map_err(|_| AppError::ValidationError("Year must be a number".to_string()))?;

        let lookup = CaseLookup {
            case_type,
            case_number,
            year,
            court_type: CourtType::from_form(self.court_type.as_deref()),
        };
        lookup.validate()?;
        Ok(lookup)
    }
}

pub(crate) fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub struct CaseLookupUseCase {
    scraper: Arc<CourtScraper>,
    repository: Arc<QueryRepository>,
}

impl CaseLookupUseCase {
    pub fn new(scraper: Arc<CourtScraper>, repository: Arc<QueryRepository>) -> Self {
        Self {
            scraper,
            repository,
        }
    }

    pub async fn search(&self, form: CaseSearchForm, today: NaiveDate) -> Result<CaseDetails> {
        let lookup = form.into_lookup()?;

        let scraped = self.scraper.scrape(&lookup, today).await?;

        let query_id = self
            .repository
            .record_lookup(&lookup, Some(&scraped.raw_response), &scraped.details)
            .await
            .map_err(|err| {
                error!(
                    error = %err,
                    case_number = %lookup.case_number,
                    "Failed to record case lookup"
                );
                err
            })?;

        info!(
            query_id,
            court = %lookup.court_type,
            case_type = %lookup.case_type,
            case_number = %lookup.case_number,
            year = lookup.year,
            "Case lookup recorded"
        );

        Ok(scraped.details)
    }

    pub async fn history(&self, limit: Option<i64>) -> Result<Vec<CaseQuery>> {
        let limit = match limit {
            Some(value) if value > 0 => value,
            _ => DEFAULT_HISTORY_LIMIT,
        };
        self.repository.list_recent(limit).await
    }

    pub async fn get(&self, query_id: i64) -> Result<CaseQuery> {
        self.repository.get(query_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::PortalConfig;
    use crate::infrastructure::db::connection::init_court_db;
    use crate::infrastructure::portal::testing::{FailingFetcher, StaticFetcher};
    use crate::infrastructure::portal::PortalFetcher;

    fn form(case_type: &str, case_number: &str, year: &str, court: Option<&str>) -> CaseSearchForm {
        CaseSearchForm {
            case_type: Some(case_type.to_string()),
            case_number: Some(case_number.to_string()),
            year: Some(year.to_string()),
            court_type: court.map(str::to_string),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    async fn use_case(
        fetcher: Arc<dyn PortalFetcher>,
    ) -> (CaseLookupUseCase, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let pool = init_court_db(&tmp.path().join("court.db")).await.unwrap();
        let scraper = Arc::new(CourtScraper::new(fetcher, PortalConfig::default()));
        let repository = Arc::new(QueryRepository::new(pool));
        (CaseLookupUseCase::new(scraper, repository), tmp)
    }

    #[test]
    fn test_missing_fields() {
        let mut incomplete = form("WP", "12", "2023", None);
        incomplete.case_number = None;
        let err = incomplete.into_lookup().unwrap_err();
        assert_eq!(err.message(), "All fields are required");

        let blank = form("WP", "   ", "2023", None);
        assert_eq!(blank.into_lookup().unwrap_err().message(), "All fields are required");
    }

    #[test]
    fn test_year_must_be_number() {
        let err = form("WP", "12", "twenty", None).into_lookup().unwrap_err();
        assert!(matches!(err, AppError::ValidationError(ref msg) if msg == "Year must be a number"));
    }

    #[test]
    fn test_year_out_of_range() {
        let err = form("WP", "12", "99999", None).into_lookup().unwrap_err();
        assert_eq!(err.message(), "Year must be between 1900 and 2100");
    }

    #[test]
    fn test_court_type_defaults_to_district() {
        let lookup = form("WP", "12", "2023", None).into_lookup().unwrap();
        assert_eq!(lookup.court_type, CourtType::DistrictCourt);
        let lookup = form("WP", "12", "2023", Some("high_court")).into_lookup().unwrap();
        assert_eq!(lookup.court_type, CourtType::HighCourt);
    }

    #[tokio::test]
    async fn test_search_records_query_and_details() {
        let (use_case, _tmp) = use_case(Arc::new(StaticFetcher::new("<html>portal</html>"))).await;

        let details = use_case
            .search(form("WP", "12", "2023", Some("high_court")), today())
            .await
            .unwrap();
        assert_eq!(details.case_status, "Pending");
        assert_eq!(details.next_hearing_date, "2024-01-08");

        let history = use_case.history(None).await.unwrap();
        assert_eq!(history.len(), 1);
        let stored = &history[0];
        assert_eq!(stored.case_type, "WP");
        assert_eq!(stored.court_type, "high_court");
        assert_eq!(stored.raw_response.as_deref(), Some("<html>portal</html>"));
        assert_eq!(stored.details.as_ref(), Some(&details));

        assert_eq!(use_case.get(stored.id).await.unwrap().case_number, "12");
    }

    #[tokio::test]
    async fn test_portal_failure_records_nothing() {
        let (use_case, _tmp) = use_case(Arc::new(FailingFetcher)).await;

        let result = use_case.search(form("WP", "12", "2023", None), today()).await;
        assert!(matches!(result, Err(AppError::PortalError(_))));
        assert!(use_case.history(Some(10)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_validation_failure_skips_portal() {
        let fetcher = Arc::new(StaticFetcher::new(""));
        let (use_case, _tmp) = use_case(fetcher.clone()).await;

        let result = use_case.search(form("WP", "12", "abc", None), today()).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
        assert!(fetcher.requested.lock().unwrap().is_empty());
    }
}
