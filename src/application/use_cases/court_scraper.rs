//! Court portal scraping.
//!
//! Each lookup performs a real GET of the portal landing page so the raw
//! response can be archived, but the structured fields are fixed demonstration
//! values: the portal's session tokens and result markup are not parsed.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::domain::case_query::{CaseDetails, CaseLookup};
use crate::domain::cause_list::{CauseList, CauseListEntry};
use crate::domain::court::CourtType;
use crate::domain::error::Result;
use crate::infrastructure::config::PortalConfig;
use crate::infrastructure::portal::PortalFetcher;

static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Case details plus the raw portal page they were derived from.
#[derive(Debug, Clone)]
pub struct ScrapedCase {
    pub details: CaseDetails,
    pub raw_response: String,
}

#[derive(Debug, Clone)]
pub struct ScrapedCauseList {
    pub list: CauseList,
    pub raw_response: String,
}

pub struct CourtScraper {
    fetcher: Arc<dyn PortalFetcher>,
    portal: PortalConfig,
}

impl CourtScraper {
    pub fn new(fetcher: Arc<dyn PortalFetcher>, portal: PortalConfig) -> Self {
        Self { fetcher, portal }
    }

    pub async fn scrape(&self, lookup: &CaseLookup, today: NaiveDate) -> Result<ScrapedCase> {
        match lookup.court_type {
            CourtType::HighCourt => self.scrape_high_court(lookup, today).await,
            CourtType::DistrictCourt => self.scrape_district_court(lookup, today).await,
        }
    }

    pub async fn scrape_high_court(
        &self,
        lookup: &CaseLookup,
        today: NaiveDate,
    ) -> Result<ScrapedCase> {
        let raw_response = self.fetch_portal(CourtType::HighCourt).await?;
        debug!(
            case_type = %lookup.case_type,
            case_number = %lookup.case_number,
            year = lookup.year,
            "High court lookup"
        );

        Ok(ScrapedCase {
            details: CaseDetails {
                parties: "Petitioner: John Doe vs Respondent: State of Example".to_string(),
                filing_date: "2023-05-15".to_string(),
                next_hearing_date: format_date(today + Duration::days(7)),
                case_status: "Pending".to_string(),
                judgment_url: None,
            },
            raw_response,
        })
    }

    pub async fn scrape_district_court(
        &self,
        lookup: &CaseLookup,
        today: NaiveDate,
    ) -> Result<ScrapedCase> {
        let raw_response = self.fetch_portal(CourtType::DistrictCourt).await?;
        debug!(
            case_type = %lookup.case_type,
            case_number = %lookup.case_number,
            year = lookup.year,
            "District court lookup"
        );

        Ok(ScrapedCase {
            details: CaseDetails {
                parties: "Applicant: Jane Smith vs Opponent: ABC Corporation".to_string(),
                filing_date: "2023-06-20".to_string(),
                next_hearing_date: format_date(today + Duration::days(5)),
                case_status: "Hearing".to_string(),
                judgment_url: None,
            },
            raw_response,
        })
    }

    pub async fn fetch_cause_list(
        &self,
        court: CourtType,
        date: NaiveDate,
    ) -> Result<ScrapedCauseList> {
        let raw_response = self.fetch_portal(court).await?;

        let cases = [
            ("CR123/2023", "Criminal", "State vs John Doe"),
            ("CV456/2023", "Civil", "Smith vs Jones"),
            ("FA789/2023", "Family", "Doe vs Doe"),
        ]
        .into_iter()
        .map(|(case_number, case_type, parties)| CauseListEntry {
            case_number: case_number.to_string(),
            case_type: case_type.to_string(),
            parties: parties.to_string(),
        })
        .collect();

        Ok(ScrapedCauseList {
            list: CauseList {
                court: court.display_name().to_string(),
                date: format_date(date),
                cases,
            },
            raw_response,
        })
    }

    async fn fetch_portal(&self, court: CourtType) -> Result<String> {
        let url = self.portal.url_for(court);
        let body = self.fetcher.fetch(url).await.map_err(|err| {
            warn!(court = %court, url = %url, error = %err, "Portal request failed");
            err
        })?;

        match page_title(&body) {
            Some(title) => debug!(court = %court, title = %title, "Portal page fetched"),
            None => debug!(court = %court, bytes = body.len(), "Portal page fetched without title"),
        }

        Ok(body)
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn page_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|el| el.text().collect::<Vec<_>>().join(" ").trim().to_string())
        .filter(|title| !title.is_empty())
}
