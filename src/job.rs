//! Invoice job record and state tracking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// One invoice request from source to finished PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceJob {
    pub job_id: String,
    pub source: String,
    pub listing_id: Option<Uuid>,
    pub recipient: Option<String>,
    pub status: JobStatus,
    pub invoice_number: Option<String>,
    pub output_path: Option<String>,
    pub byte_len: Option<usize>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Rendering,
    Complete,
    Failed,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "queued"),
            JobStatus::Rendering => write!(f, "rendering"),
            JobStatus::Complete => write!(f, "complete"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

impl InvoiceJob {
    pub fn new(source: String, recipient: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            job_id: Uuid::new_v4().to_string(),
            source,
            listing_id: None,
            recipient,
            status: JobStatus::Queued,
            invoice_number: None,
            output_path: None,
            byte_len: None,
            created_at: now,
            updated_at: now,
            error: None,
        }
    }

    pub fn start_rendering(&mut self, listing_id: Option<Uuid>) {
        self.listing_id = listing_id;
        self.status = JobStatus::Rendering;
        self.updated_at = Utc::now();
    }

    pub fn mark_complete(&mut self, invoice_number: String, byte_len: usize, output_path: Option<String>) {
        self.status = JobStatus::Complete;
        self.invoice_number = Some(invoice_number);
        self.byte_len = Some(byte_len);
        self.output_path = output_path;
        self.updated_at = Utc::now();
        self.error = None;
    }

    pub fn mark_failed(&mut self, error: String) {
        self.status = JobStatus::Failed;
        self.updated_at = Utc::now();
        self.error = Some(error);
    }

    pub fn processing_duration_ms(&self) -> Option<i64> {
        if self.status == JobStatus::Complete || self.status == JobStatus::Failed {
            Some(self.updated_at.signed_duration_since(self.created_at).num_milliseconds())
        } else {
            None
        }
    }
}
