use crate::domain::case_query::{CaseDetails, CaseLookup, CaseQuery};
use crate::domain::error::{AppError, Result};
use sqlx::SqlitePool;

const SELECT_LOOKUPS: &str = "SELECT q.id, q.case_type, q.case_number, q.year, q.court_type, q.timestamp, q.raw_response,
        d.id AS detail_id, d.parties, d.filing_date, d.next_hearing_date, d.case_status, d.judgment_url
     FROM queries q
     LEFT JOIN case_details d ON d.query_id = q.id";

pub struct QueryRepository {
    pool: SqlitePool,
}

impl QueryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts the query row and its case detail in one transaction, returning the query id.
    pub async fn record_lookup(
        &self,
        lookup: &CaseLookup,
        raw_response: Option<&str>,
        details: &CaseDetails,
    ) -> Result<i64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to begin transaction: {e}")))?;

        let result = sqlx::query(
            "INSERT INTO queries (case_type, case_number, year, court_type, raw_response)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&lookup.case_type)
        .bind(&lookup.case_number)
        .bind(lookup.year)
        .bind(lookup.court_type.slug())
        .bind(raw_response)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to insert query: {e}")))?;

        let query_id = result.last_insert_rowid();

        sqlx::query(
            "INSERT INTO case_details (query_id, parties, filing_date, next_hearing_date, case_status, judgment_url)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(query_id)
        .bind(&details.parties)
        .bind(&details.filing_date)
        .bind(&details.next_hearing_date)
        .bind(&details.case_status)
        .bind(&details.judgment_url)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to insert case details: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to commit lookup: {e}")))?;

        Ok(query_id)
    }

    pub async fn get(&self, query_id: i64) -> Result<CaseQuery> {
        let sql = format!("{SELECT_LOOKUPS} WHERE q.id = ?");
        let row = sqlx::query_as::<_, CaseQueryEntity>(&sql)
            .bind(query_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to fetch query: {e}")))?;

        match row {
            Some(row) => Ok(row.into()),
            None => Err(AppError::NotFound(format!("Query not found: {}", query_id))),
        }
    }

    pub async fn list_recent(&self, limit: i64) -> Result<Vec<CaseQuery>> {
        let sql = format!("{SELECT_LOOKUPS} ORDER BY q.id DESC LIMIT ?");
        let rows = sqlx::query_as::<_, CaseQueryEntity>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to list queries: {e}")))?;

        Ok(rows.into_iter().map(|row| row.into()).collect())
    }
}

#[derive(sqlx::FromRow)]
struct CaseQueryEntity {
    id: i64,
    case_type: String,
    case_number: String,
    year: i64,
    court_type: String,
    timestamp: Option<chrono::NaiveDateTime>,
    raw_response: Option<String>,
    detail_id: Option<i64>,
    parties: Option<String>,
    filing_date: Option<String>,
    next_hearing_date: Option<String>,
    case_status: Option<String>,
    judgment_url: Option<String>,
}

impl From<CaseQueryEntity> for CaseQuery {
    fn from(entity: CaseQueryEntity) -> Self {
        let details = entity.detail_id.map(|_| CaseDetails {
            parties: entity.parties.unwrap_or_default(),
            filing_date: entity.filing_date.unwrap_or_default(),
            next_hearing_date: entity.next_hearing_date.unwrap_or_default(),
            case_status: entity.case_status.unwrap_or_default(),
            judgment_url: entity.judgment_url,
        });
        Self {
            id: entity.id,
            case_type: entity.case_type,
            case_number: entity.case_number,
            year: entity.year,
            court_type: entity.court_type,
            timestamp: entity.timestamp,
            raw_response: entity.raw_response,
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::court::CourtType;
    use crate::infrastructure::db::connection::init_court_db;

    fn lookup(case_number: &str) -> CaseLookup {
        CaseLookup {
            case_type: "WP".to_string(),
            case_number: case_number.to_string(),
            year: 2023,
            court_type: CourtType::HighCourt,
        }
    }

    fn details() -> CaseDetails {
        CaseDetails {
            parties: "Petitioner: John Doe vs Respondent: State of Example".to_string(),
            filing_date: "2023-05-15".to_string(),
            next_hearing_date: "2024-01-08".to_string(),
            case_status: "Pending".to_string(),
            judgment_url: None,
        }
    }

    #[tokio::test]
    async fn test_record_and_fetch_lookup() {
        let tmp = tempfile::tempdir().unwrap();
        let pool = init_court_db(&tmp.path().join("court.db")).await.unwrap();
        let repo = QueryRepository::new(pool);

        let id = repo
            .record_lookup(&lookup("101"), Some("<html></html>"), &details())
            .await
            .unwrap();

        let stored = repo.get(id).await.unwrap();
        assert_eq!(stored.case_number, "101");
        assert_eq!(stored.court_type, "high_court");
        assert_eq!(stored.year, 2023);
        assert_eq!(stored.raw_response.as_deref(), Some("<html></html>"));
        assert!(stored.timestamp.is_some());
        assert_eq!(stored.details, Some(details()));
    }

    #[tokio::test]
    async fn test_list_recent_newest_first() {
        let tmp = tempfile::tempdir().unwrap();
        let pool = init_court_db(&tmp.path().join("court.db")).await.unwrap();
        let repo = QueryRepository::new(pool);

        for number in ["1", "2", "3"] {
            repo.record_lookup(&lookup(number), None, &details())
                .await
                .unwrap();
        }

        let recent = repo.list_recent(2).await.unwrap();
        let numbers: Vec<&str> = recent.iter().map(|q| q.case_number.as_str()).collect();
        assert_eq!(numbers, vec!["3", "2"]);
    }

    #[tokio::test]
    async fn test_failed_detail_insert_rolls_back_query() {
        let tmp = tempfile::tempdir().unwrap();
        let pool = init_court_db(&tmp.path().join("court.db")).await.unwrap();
        sqlx::query(
            "CREATE TRIGGER reject_details BEFORE INSERT ON case_details
             BEGIN SELECT RAISE(ABORT, 'details rejected'); END",
        )
        .execute(&pool)
        .await
        .unwrap();
        let repo = QueryRepository::new(pool);

        let result = repo.record_lookup(&lookup("7"), None, &details()).await;
        assert!(
            matches!(result, Err(AppError::DatabaseError(ref msg)) if msg.contains("details rejected"))
        );
        assert!(repo.list_recent(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let pool = init_court_db(&tmp.path().join("court.db")).await.unwrap();
        let repo = QueryRepository::new(pool);

        assert!(matches!(repo.get(99).await, Err(AppError::NotFound(_))));
    }
}
