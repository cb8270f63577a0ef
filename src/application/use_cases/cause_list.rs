use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use serde::Deserialize;
use tracing::{error, info};

use super::case_lookup::present;
use super::cause_list_render::{render_cause_list_html, render_cause_list_pdf};
use super::court_scraper::{format_date, CourtScraper, DATE_FORMAT};
use crate::domain::cause_list::{CaseListCheck, CauseList, CauseListRecord};
use crate::domain::court::CourtType;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::db::cause_lists::CauseListRepository;
use crate::infrastructure::storage::{pdf_file_name, write_pdf};

const DEFAULT_HISTORY_LIMIT: i64 = 50;

#[derive(Debug, Default, Deserialize)]
pub struct CauseListForm {
    pub court_type: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CaseCheckForm {
    pub case_number: Option<String>,
    pub court_type: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug)]
pub struct CauseListDownload {
    pub file_name: String,
    pub pdf: Vec<u8>,
    pub list: CauseList,
    pub record: CauseListRecord,
}

/// A blank date means tomorrow's list.
pub fn parse_list_date(value: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(raw) => NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
            AppError::ValidationError("Invalid date format. Use YYYY-MM-DD".to_string())
        }),
        None => Ok(today + Duration::days(1)),
    }
}

pub struct CauseListUseCase {
    scraper: Arc<CourtScraper>,
    repository: Arc<CauseListRepository>,
    pdf_dir: PathBuf,
}

impl CauseListUseCase {
    pub fn new(
        scraper: Arc<CourtScraper>,
        repository: Arc<CauseListRepository>,
        pdf_dir: PathBuf,
    ) -> Self {
        Self {
            scraper,
            repository,
            pdf_dir,
        }
    }

    pub async fn download(&self, form: CauseListForm, today: NaiveDate) -> Result<CauseListDownload> {
        let court = CourtType::from_form(form.court_type.as_deref());
        let date = parse_list_date(form.date.as_deref(), today)?;

        let scraped = self.scraper.fetch_cause_list(court, date).await?;
        let pdf = render_cause_list_pdf(&scraped.list)?;

        let file_name = pdf_file_name(court, date);
        let pdf_path = write_pdf(&self.pdf_dir, &file_name, &pdf).map_err(|err| {
            error!(
                error = %err,
                pdf_dir = %self.pdf_dir.display(),
                file_name = %file_name,
                "Failed to write cause list PDF"
            );
            AppError::IoError(format!("Failed to write cause list PDF: {}", err))
        })?;

        let mut record = CauseListRecord {
            id: None,
            court_type: court.slug().to_string(),
            list_date: format_date(date),
            pdf_path: pdf_path.display().to_string(),
            raw_data: Some(scraped.raw_response),
            created_at: None,
        };
        self.repository.insert(&mut record).await?;

        info!(
            cause_list_id = record.id,
            court = %court,
            date = %record.list_date,
            bytes = pdf.len(),
            "Cause list generated"
        );

        Ok(CauseListDownload {
            file_name,
            pdf,
            list: scraped.list,
            record,
        })
    }

    pub async fn check_case(&self, form: CaseCheckForm, today: NaiveDate) -> Result<CaseListCheck> {
        let Some(case_number) = present(form.case_number) else {
            return Err(AppError::ValidationError(
                "Case number is required".to_string(),
            ));
        };
        let court = CourtType::from_form(form.court_type.as_deref());
        let date = parse_list_date(form.date.as_deref(), today)?;

        let scraped = self.scraper.fetch_cause_list(court, date).await?;
        let found = scraped.list.contains_case(&case_number);

        Ok(CaseListCheck {
            found,
            date: format_date(date),
            court: court.slug().to_string(),
            case_number,
        })
    }

    pub async fn preview(&self, form: CauseListForm, today: NaiveDate) -> Result<String> {
        let court = CourtType::from_form(form.court_type.as_deref());
        let date = parse_list_date(form.date.as_deref(), today)?;

        let scraped = self.scraper.fetch_cause_list(court, date).await?;
        Ok(render_cause_list_html(&scraped.list))
    }

    pub async fn history(&self, limit: Option<i64>) -> Result<Vec<CauseListRecord>> {
        let limit = match limit {
            Some(value) if value > 0 => value,
            _ => DEFAULT_HISTORY_LIMIT,
        };
        self.repository.list_recent(limit).await
    }
}
