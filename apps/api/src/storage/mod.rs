//! Storage collaborator — optional archival of generated PDFs.
//!
//! Handlers only see `Arc<dyn ObjectStore>`. When no backend is configured the
//! `DisabledStore` is injected instead, so uploads are skipped without any
//! special casing at the call site.

pub mod s3;
pub mod supabase;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::StorageConfig;

pub use s3::S3Store;
pub use supabase::SupabaseStore;

/// Every generated CV is stored under this prefix.
pub const GENERATED_PREFIX: &str = "generated";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("S3 upload failed: {0}")]
    S3(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Storage rejected upload (status {status}): {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), StorageError>;

    /// Human-readable backend description for startup logs.
    fn describe(&self) -> String;
}

/// Used when storage credentials are absent. Uploads succeed without doing anything.
pub struct DisabledStore;

#[async_trait]
impl ObjectStore for DisabledStore {
    async fn put(&self, key: &str, _body: Bytes, _content_type: &str) -> Result<(), StorageError> {
        debug!("Storage disabled; skipping upload of {key}");
        Ok(())
    }

    fn describe(&self) -> String {
        "disabled".to_string()
    }
}

/// Object key for a generated PDF.
pub fn generated_key(filename: &str) -> String {
    format!("{GENERATED_PREFIX}/{filename}")
}

/// Picks the backend from configuration: S3 first, then Supabase, else disabled.
pub async fn build_store(config: &StorageConfig) -> Arc<dyn ObjectStore> {
    if let Some(s3) = &config.s3 {
        return Arc::new(S3Store::connect(s3, &config.bucket).await);
    }
    if let Some(supabase) = &config.supabase {
        return Arc::new(SupabaseStore::new(supabase, &config.bucket));
    }
    warn!("Storage credentials not set; storage disabled, PDFs will still be generated");
    Arc::new(DisabledStore)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SupabaseSettings;

    #[test]
    fn test_generated_key() {
        assert_eq!(
            generated_key("CV_Jane_Doe_20240101_120000.pdf"),
            "generated/CV_Jane_Doe_20240101_120000.pdf"
        );
    }

    #[tokio::test]
    async fn test_disabled_store_accepts_uploads() {
        let store = DisabledStore;
        store
            .put("generated/x.pdf", Bytes::from_static(b"%PDF-"), "application/pdf")
            .await
            .unwrap();
        assert_eq!(store.describe(), "disabled");
    }

    #[tokio::test]
    async fn test_build_store_without_credentials_is_disabled() {
        let store = build_store(&StorageConfig {
            bucket: "cvs".to_string(),
            ..Default::default()
        })
        .await;
        assert_eq!(store.describe(), "disabled");
    }

    #[tokio::test]
    async fn test_build_store_prefers_supabase_when_s3_absent() {
        let store = build_store(&StorageConfig {
            bucket: "cvs".to_string(),
            s3: None,
            supabase: Some(SupabaseSettings {
                url: "https://abc.supabase.co/".to_string(),
                service_role_key: "secret".to_string(),
            }),
        })
        .await;
        assert_eq!(store.describe(), "supabase bucket 'cvs' at https://abc.supabase.co/");
    }
}
