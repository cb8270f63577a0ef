use crate::domain::cause_list::CauseListRecord;
use crate::domain::error::{AppError, Result};
use sqlx::SqlitePool;

pub struct CauseListRepository {
    pool: SqlitePool,
}

impl CauseListRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, record: &mut CauseListRecord) -> Result<()> {
        let result = sqlx::query(
            "INSERT INTO cause_lists (court_type, list_date, pdf_path, raw_data)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&record.court_type)
        .bind(&record.list_date)
        .bind(&record.pdf_path)
        .bind(&record.raw_data)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to save cause list: {e}")))?;

        record.id = Some(result.last_insert_rowid());
        Ok(())
    }

    pub async fn list_recent(&self, limit: i64) -> Result<Vec<CauseListRecord>> {
        sqlx::query_as::<_, CauseListEntity>(
            "SELECT id, court_type, list_date, pdf_path, raw_data, created_at
             FROM cause_lists ORDER BY id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to list cause lists: {e}")))
        .map(|entities| entities.into_iter().map(|e| e.into()).collect())
    }
}

#[derive(sqlx::FromRow)]
struct CauseListEntity {
    id: i64,
    court_type: String,
    list_date: String,
    pdf_path: String,
    raw_data: Option<String>,
    created_at: Option<chrono::NaiveDateTime>,
}

impl From<CauseListEntity> for CauseListRecord {
    fn from(e: CauseListEntity) -> Self {
        Self {
            id: Some(e.id),
            court_type: e.court_type,
            list_date: e.list_date,
            pdf_path: e.pdf_path,
            raw_data: e.raw_data,
            created_at: e.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::db::connection::init_court_db;

    #[tokio::test]
    async fn test_insert_assigns_id() {
        let tmp = tempfile::tempdir().unwrap();
        let pool = init_court_db(&tmp.path().join("court.db")).await.unwrap();
        let repo = CauseListRepository::new(pool);

        let mut record = CauseListRecord {
            id: None,
            court_type: "district_court".to_string(),
            list_date: "2024-02-01".to_string(),
            pdf_path: "static/pdfs/cause_list_district_court_20240201.pdf".to_string(),
            raw_data: Some("<html/>".to_string()),
            created_at: None,
        };
        repo.insert(&mut record).await.unwrap();
        assert!(record.id.is_some());

        let listed = repo.list_recent(10).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].list_date, "2024-02-01");
        assert_eq!(listed[0].id, record.id);
        assert!(listed[0].created_at.is_some());
    }
}
