use crate::application::use_cases::case_lookup::CaseSearchForm;
use crate::application::use_cases::cause_list::{CaseCheckForm, CauseListForm};
use crate::application::{CaseLookupUseCase, CauseListUseCase};
use crate::domain::error::AppError;
use actix_cors::Cors;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};

mod form;

pub use form::FormFields;

const INDEX_HTML: &str = include_str!("../../../resources/templates/index.html");
const MAX_LOG_ENTRIES: usize = 100;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct HttpState {
    pub case_lookup: Arc<CaseLookupUseCase>,
    pub cause_lists: Arc<CauseListUseCase>,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn log_failure(data: &HttpState, source: &str, action: &str, err: AppError) -> AppError {
    let level = match &err {
        AppError::ValidationError(_) | AppError::NotFound(_) => "WARN",
        _ => "ERROR",
    };
    add_log(&data.logs, level, source, &format!("{} failed: {}", action, err));
    err
}

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

#[post("/search_case")]
async fn search_case(
    data: web::Data<HttpState>,
    form: FormFields<CaseSearchForm>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    add_log(
        &data.logs,
        "INFO",
        "CaseLookup",
        &format!(
            "Searching case (case_type={:?} case_number={:?} year={:?} court_type={:?})",
            form.case_type, form.case_number, form.year, form.court_type
        ),
    );

    let details = data
        .case_lookup
        .search(form, today())
        .await
        .map_err(|e| log_failure(&data, "CaseLookup", "Case search", e))?;
    Ok(HttpResponse::Ok().json(details))
}

#[post("/download_cause_list")]
async fn download_cause_list(
    data: web::Data<HttpState>,
    form: FormFields<CauseListForm>,
) -> Result<HttpResponse, AppError> {
    let download = data
        .cause_lists
        .download(form.into_inner(), today())
        .await
        .map_err(|e| log_failure(&data, "CauseList", "Cause list download", e))?;

    add_log(
        &data.logs,
        "INFO",
        "CauseList",
        &format!(
            "Cause list saved to {} ({} bytes)",
            download.record.pdf_path,
            download.pdf.len()
        ),
    );
    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(download.file_name)],
        })
        .body(download.pdf))
}

#[post("/check_case_in_cause_list")]
async fn check_case_in_cause_list(
    data: web::Data<HttpState>,
    form: FormFields<CaseCheckForm>,
) -> Result<HttpResponse, AppError> {
    let check = data
        .cause_lists
        .check_case(form.into_inner(), today())
        .await
        .map_err(|e| log_failure(&data, "CauseList", "Cause list check", e))?;

    add_log(
        &data.logs,
        "INFO",
        "CauseList",
        &format!(
            "Case {} {} in {} list for {}",
            check.case_number,
            if check.found { "found" } else { "not found" },
            check.court,
            check.date
        ),
    );
    Ok(HttpResponse::Ok().json(check))
}

#[get("/cause_list/preview")]
async fn preview_cause_list(
    data: web::Data<HttpState>,
    query: web::Query<CauseListForm>,
) -> Result<HttpResponse, AppError> {
    let html = data
        .cause_lists
        .preview(query.into_inner(), today())
        .await
        .map_err(|e| log_failure(&data, "CauseList", "Cause list preview", e))?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

#[get("/history")]
async fn lookup_history(
    data: web::Data<HttpState>,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse, AppError> {
    let queries = data
        .case_lookup
        .history(query.limit)
        .await
        .map_err(|e| log_failure(&data, "History", "Listing lookups", e))?;
    Ok(HttpResponse::Ok().json(queries))
}

#[get("/history/{query_id}")]
async fn lookup_detail(
    data: web::Data<HttpState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let query = data
        .case_lookup
        .get(path.into_inner())
        .await
        .map_err(|e| log_failure(&data, "History", "Fetching lookup", e))?;
    Ok(HttpResponse::Ok().json(query))
}

#[get("/cause_lists")]
async fn cause_list_history(
    data: web::Data<HttpState>,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse, AppError> {
    let records = data
        .cause_lists
        .history(query.limit)
        .await
        .map_err(|e| log_failure(&data, "History", "Listing cause lists", e))?;
    Ok(HttpResponse::Ok().json(records))
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> Result<HttpResponse, AppError> {
    let logs = data
        .logs
        .lock()
        .map_err(|_| AppError::Internal("Log buffer is poisoned".to_string()))?;
    Ok(HttpResponse::Ok().json(&*logs))
}

/// Registers every route; shared by the server and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(format!("Invalid query string: {}", err)).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(format!("Invalid path: {}", err)).into()
    }))
    .service(index)
    .service(search_case)
    .service(download_cause_list)
    .service(check_case_in_cause_list)
    .service(preview_cause_list)
    .service(
        web::scope("/api")
            .service(lookup_history)
            .service(lookup_detail)
            .service(cause_list_history)
            .service(get_logs),
    );
}

pub fn add_log_entry(
    logs: &Mutex<Vec<LogEntry>>,
    level: &str,
    source: &str,
    message: &str,
) -> LogEntry {
    match level {
        "ERROR" => error!(source = %source, "{}", message),
        "WARN" => warn!(source = %source, "{}", message),
        _ => info!(source = %source, "{}", message),
    }

    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    let mut logs = logs.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    logs.push(entry.clone());
    if logs.len() > MAX_LOG_ENTRIES {
        logs.remove(0);
    }
    entry
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    add_log_entry(logs, level, source, message);
}

pub fn start_server(state: HttpState, host: &str, port: u16) -> std::io::Result<Server> {
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(actix_web::middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((host, port))?
    .run();

    Ok(server)
}
