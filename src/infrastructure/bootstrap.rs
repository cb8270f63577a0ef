use std::sync::{Arc, Mutex};

use tracing::error;

use crate::application::{CaseLookupUseCase, CauseListUseCase, CourtScraper};
use crate::domain::error::Result;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::db::cause_lists::CauseListRepository;
use crate::infrastructure::db::connection::init_court_db;
use crate::infrastructure::db::queries::QueryRepository;
use crate::infrastructure::portal::{HttpPortalFetcher, OfflinePortalFetcher, PortalFetcher};
use crate::infrastructure::storage::ensure_pdf_dir;
use crate::interfaces::http::{add_log, HttpState, LogEntry};

pub async fn setup(config: &AppConfig, logs: Arc<Mutex<Vec<LogEntry>>>) -> Result<HttpState> {
    let pdf_dir = ensure_pdf_dir(&config.storage.pdf_dir).map_err(|err| {
        error!(
            error = %err,
            pdf_dir = %config.storage.pdf_dir.display(),
            "Failed to create PDF dir"
        );
        err
    })?;

    let pool = init_court_db(&config.database.path).await.map_err(|err| {
        error!(
            error = %err,
            db_path = %config.database.path.display(),
            "Failed to initialize database"
        );
        err
    })?;
    add_log(
        &logs,
        "INFO",
        "Database",
        &format!("Database ready at {}", config.database.path.display()),
    );

    let fetcher = portal_fetcher(config, &logs)?;
    let scraper = Arc::new(CourtScraper::new(fetcher, config.portal.clone()));

    let case_lookup = Arc::new(CaseLookupUseCase::new(
        scraper.clone(),
        Arc::new(QueryRepository::new(pool.clone())),
    ));
    let cause_lists = Arc::new(CauseListUseCase::new(
        scraper,
        Arc::new(CauseListRepository::new(pool)),
        pdf_dir,
    ));

    Ok(HttpState {
        case_lookup,
        cause_lists,
        logs,
    })
}

fn portal_fetcher(
    config: &AppConfig,
    logs: &Arc<Mutex<Vec<LogEntry>>>,
) -> Result<Arc<dyn PortalFetcher>> {
    if config.portal.offline {
        add_log(
            logs,
            "WARN",
            "Portal",
            "Portal offline mode enabled; no network requests will be made",
        );
        return Ok(Arc::new(OfflinePortalFetcher));
    }

    add_log(
        logs,
        "INFO",
        "Portal",
        &format!(
            "Using portals high_court={} district_court={} (timeout={}s)",
            config.portal.high_court_url,
            config.portal.district_court_url,
            config.portal.timeout_secs
        ),
    );
    Ok(Arc::new(HttpPortalFetcher::new(&config.portal)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::application::use_cases::case_lookup::CaseSearchForm;

    #[tokio::test]
    async fn test_setup_offline() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.database.path = tmp.path().join("db").join("court_data.db");
        config.storage.pdf_dir = tmp.path().join("static").join("pdfs");
        config.portal.offline = true;

        let logs = Arc::new(Mutex::new(Vec::new()));
        let state = setup(&config, logs.clone()).await.unwrap();
        assert!(config.storage.pdf_dir.is_dir());
        assert!(config.database.path.is_file());

        let details = state
            .case_lookup
            .search(
                CaseSearchForm {
                    case_type: Some("OS".to_string()),
                    case_number: Some("5".to_string()),
                    year: Some("2022".to_string()),
                    court_type: None,
                },
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(details.case_status, "Hearing");

        let logs = logs.lock().unwrap();
        assert!(logs.iter().any(|entry| entry.source == "Portal" && entry.level == "WARN"));
    }
}
