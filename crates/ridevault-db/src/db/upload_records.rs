//! Upload record store.
//!
//! One record per issued credential, created `pending` and mutated only by
//! the notification collaborator afterwards. Session uploads are addressed
//! by `(session_id, upload_id)`; legacy uploads carry secondary lookups by
//! student email and by calendar date. `retain_until` is the TTL marker the
//! storage layer sweeps on.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use ridevault_core::models::{UploadMode, UploadStatus};
use ridevault_core::AppError;
use sqlx::{PgPool, Row};
use std::str::FromStr;
use uuid::Uuid;

/// Durable record of one in-flight or finished upload.
#[derive(Debug, Clone)]
pub struct UploadRecord {
    pub upload_id: Uuid,
    pub session_id: Option<Uuid>,
    pub uploader_id: Option<Uuid>,
    pub uploader_role: Option<String>,
    pub student_email: Option<String>,
    pub student_name: Option<String>,
    pub trainer_name: Option<String>,
    pub session_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub original_file_name: String,
    pub stored_file_name: String,
    pub file_size: i64,
    pub content_type: String,
    pub object_key: String,
    pub bucket: String,
    pub upload_mode: UploadMode,
    pub chunk_size: Option<i64>,
    pub status: UploadStatus,
    pub error_message: Option<String>,
    pub download_count: i32,
    pub created_at: DateTime<Utc>,
    pub retain_until: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for UploadRecord {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        let mode: String = row.get("upload_mode");
        let status: String = row.get("status");
        Ok(UploadRecord {
            upload_id: row.get("upload_id"),
            session_id: row.get("session_id"),
            uploader_id: row.get("uploader_id"),
            uploader_role: row.get("uploader_role"),
            student_email: row.get("student_email"),
            student_name: row.get("student_name"),
            trainer_name: row.get("trainer_name"),
            session_date: row.get("session_date"),
            notes: row.get("notes"),
            original_file_name: row.get("original_file_name"),
            stored_file_name: row.get("stored_file_name"),
            file_size: row.get("file_size"),
            content_type: row.get("content_type"),
            object_key: row.get("object_key"),
            bucket: row.get("bucket"),
            upload_mode: UploadMode::from_str(&mode)
                .map_err(|e| sqlx::Error::Decode(e.into()))?,
            chunk_size: row.get("chunk_size"),
            status: UploadStatus::from_str(&status)
                .map_err(|e| sqlx::Error::Decode(e.into()))?,
            error_message: row.get("error_message"),
            download_count: row.get("download_count"),
            created_at: row.get("created_at"),
            retain_until: row.get("retain_until"),
        })
    }
}

/// Durable store for upload records.
///
/// Handlers depend on this trait rather than on a concrete pool so tests can
/// substitute an in-memory store.
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Persist a freshly issued upload record. Exactly one record exists per
    /// issued credential.
    async fn create(&self, record: &UploadRecord) -> Result<(), AppError>;

    /// Fetch a record by upload id.
    async fn get(&self, upload_id: Uuid) -> Result<Option<UploadRecord>, AppError>;

    /// Fetch a record by its session-scoped composite key.
    async fn get_for_session(
        &self,
        session_id: Uuid,
        upload_id: Uuid,
    ) -> Result<Option<UploadRecord>, AppError>;

    /// All records for one training session.
    async fn list_by_session(&self, session_id: Uuid) -> Result<Vec<UploadRecord>, AppError>;

    /// Secondary lookup by student identity (legacy uploads).
    async fn list_by_student_email(&self, email: &str) -> Result<Vec<UploadRecord>, AppError>;

    /// Secondary lookup by training-date range, inclusive (legacy uploads).
    async fn list_by_date_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<UploadRecord>, AppError>;

    /// Mark an upload completed once the object-storage write is observed.
    async fn mark_completed(&self, upload_id: Uuid) -> Result<(), AppError>;

    /// Mark an upload failed.
    async fn mark_failed(
        &self,
        upload_id: Uuid,
        error_message: Option<String>,
    ) -> Result<(), AppError>;

    /// Remove pending records whose retention marker has passed. Returns the
    /// number of rows removed.
    async fn delete_expired(&self) -> Result<u64, AppError>;
}

/// Postgres-backed upload store
#[derive(Clone)]
pub struct PgUploadStore {
    pool: PgPool,
}

impl PgUploadStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str = r#"
    upload_id, session_id, uploader_id, uploader_role, student_email,
    student_name, trainer_name, session_date, notes, original_file_name,
    stored_file_name, file_size, content_type, object_key, bucket,
    upload_mode, chunk_size, status, error_message, download_count,
    created_at, retain_until
"#;

#[async_trait]
impl UploadStore for PgUploadStore {
    async fn create(&self, record: &UploadRecord) -> Result<(), AppError> {
        // Dynamic queries: no DATABASE_URL/sqlx prepare needed at build time.
        sqlx::query(
            r#"
            INSERT INTO upload_records (
                upload_id, session_id, uploader_id, uploader_role, student_email,
                student_name, trainer_name, session_date, notes, original_file_name,
                stored_file_name, file_size, content_type, object_key, bucket,
                upload_mode, chunk_size, status, error_message, download_count,
                created_at, retain_until
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22
            )
            "#,
        )
        .bind(record.upload_id)
        .bind(record.session_id)
        .bind(record.uploader_id)
        .bind(record.uploader_role.as_deref())
        .bind(record.student_email.as_deref())
        .bind(record.student_name.as_deref())
        .bind(record.trainer_name.as_deref())
        .bind(record.session_date)
        .bind(record.notes.as_deref())
        .bind(&record.original_file_name)
        .bind(&record.stored_file_name)
        .bind(record.file_size)
        .bind(&record.content_type)
        .bind(&record.object_key)
        .bind(&record.bucket)
        .bind(record.upload_mode.as_str())
        .bind(record.chunk_size)
        .bind(record.status.as_str())
        .bind(record.error_message.as_deref())
        .bind(record.download_count)
        .bind(record.created_at)
        .bind(record.retain_until)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, upload_id: Uuid) -> Result<Option<UploadRecord>, AppError> {
        let row = sqlx::query_as::<_, UploadRecord>(&format!(
            "SELECT {} FROM upload_records WHERE upload_id = $1",
            SELECT_COLUMNS
        ))
        .bind(upload_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn get_for_session(
        &self,
        session_id: Uuid,
        upload_id: Uuid,
    ) -> Result<Option<UploadRecord>, AppError> {
        let row = sqlx::query_as::<_, UploadRecord>(&format!(
            "SELECT {} FROM upload_records WHERE session_id = $1 AND upload_id = $2",
            SELECT_COLUMNS
        ))
        .bind(session_id)
        .bind(upload_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list_by_session(&self, session_id: Uuid) -> Result<Vec<UploadRecord>, AppError> {
        let rows = sqlx::query_as::<_, UploadRecord>(&format!(
            "SELECT {} FROM upload_records WHERE session_id = $1 ORDER BY created_at",
            SELECT_COLUMNS
        ))
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn list_by_student_email(&self, email: &str) -> Result<Vec<UploadRecord>, AppError> {
        let rows = sqlx::query_as::<_, UploadRecord>(&format!(
            "SELECT {} FROM upload_records WHERE student_email = $1 ORDER BY created_at",
            SELECT_COLUMNS
        ))
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn list_by_date_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<UploadRecord>, AppError> {
        let rows = sqlx::query_as::<_, UploadRecord>(&format!(
            "SELECT {} FROM upload_records
             WHERE session_date >= $1 AND session_date <= $2
             ORDER BY session_date, created_at",
            SELECT_COLUMNS
        ))
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn mark_completed(&self, upload_id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE upload_records SET status = 'completed' WHERE upload_id = $1",
        )
        .bind(upload_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn mark_failed(
        &self,
        upload_id: Uuid,
        error_message: Option<String>,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE upload_records SET status = 'failed', error_message = $2 WHERE upload_id = $1",
        )
        .bind(upload_id)
        .bind(error_message)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_expired(&self) -> Result<u64, AppError> {
        let result = sqlx::query(
            "DELETE FROM upload_records WHERE retain_until < NOW() AND status = 'pending'",
        )
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
