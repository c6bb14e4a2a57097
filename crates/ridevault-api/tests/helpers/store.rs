//! In-memory UploadStore for integration tests.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use ridevault_core::models::UploadStatus;
use ridevault_core::AppError;
use ridevault_db::{UploadRecord, UploadStore};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use uuid::Uuid;

/// Vec-backed store; `set_fail` simulates durable-store unavailability.
pub struct MemoryUploadStore {
    records: Mutex<Vec<UploadRecord>>,
    fail_creates: AtomicBool,
}

impl MemoryUploadStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            fail_creates: AtomicBool::new(false),
        }
    }

    /// Make subsequent create calls fail, as if the store were down.
    pub fn set_fail(&self, fail: bool) {
        self.fail_creates.store(fail, Ordering::SeqCst);
    }

    pub async fn all(&self) -> Vec<UploadRecord> {
        self.records.lock().await.clone()
    }

    pub async fn count(&self) -> usize {
        self.records.lock().await.len()
    }
}

#[async_trait]
impl UploadStore for MemoryUploadStore {
    async fn create(&self, record: &UploadRecord) -> Result<(), AppError> {
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(AppError::Internal(
                "simulated durable-store outage".to_string(),
            ));
        }
        self.records.lock().await.push(record.clone());
        Ok(())
    }

    async fn get(&self, upload_id: Uuid) -> Result<Option<UploadRecord>, AppError> {
        Ok(self
            .records
            .lock()
            .await
            .iter()
            .find(|r| r.upload_id == upload_id)
            .cloned())
    }

    async fn get_for_session(
        &self,
        session_id: Uuid,
        upload_id: Uuid,
    ) -> Result<Option<UploadRecord>, AppError> {
        Ok(self
            .records
            .lock()
            .await
            .iter()
            .find(|r| r.session_id == Some(session_id) && r.upload_id == upload_id)
            .cloned())
    }

    async fn list_by_session(&self, session_id: Uuid) -> Result<Vec<UploadRecord>, AppError> {
        Ok(self
            .records
            .lock()
            .await
            .iter()
            .filter(|r| r.session_id == Some(session_id))
            .cloned()
            .collect())
    }

    async fn list_by_student_email(&self, email: &str) -> Result<Vec<UploadRecord>, AppError> {
        Ok(self
            .records
            .lock()
            .await
            .iter()
            .filter(|r| r.student_email.as_deref() == Some(email))
            .cloned()
            .collect())
    }

    async fn list_by_date_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<UploadRecord>, AppError> {
        Ok(self
            .records
            .lock()
            .await
            .iter()
            .filter(|r| {
                r.session_date
                    .map(|d| d >= from && d <= to)
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    async fn mark_completed(&self, upload_id: Uuid) -> Result<(), AppError> {
        let mut records = self.records.lock().await;
        if let Some(record) = records.iter_mut().find(|r| r.upload_id == upload_id) {
            record.status = UploadStatus::Completed;
        }
        Ok(())
    }

    async fn mark_failed(
        &self,
        upload_id: Uuid,
        error_message: Option<String>,
    ) -> Result<(), AppError> {
        let mut records = self.records.lock().await;
        if let Some(record) = records.iter_mut().find(|r| r.upload_id == upload_id) {
            record.status = UploadStatus::Failed;
            record.error_message = error_message;
        }
        Ok(())
    }

    async fn delete_expired(&self) -> Result<u64, AppError> {
        let mut records = self.records.lock().await;
        let now = Utc::now();
        let before = records.len();
        records.retain(|r| !(r.status == UploadStatus::Pending && r.retain_until < now));
        Ok((before - records.len()) as u64)
    }
}
