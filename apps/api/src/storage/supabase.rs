use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header::CONTENT_TYPE, Client};
use tracing::info;

use crate::config::SupabaseSettings;
use crate::storage::{ObjectStore, StorageError};

/// Supabase Storage via its REST API, authenticated with the service-role key.
pub struct SupabaseStore {
    http: Client,
    base_url: String,
    service_role_key: String,
    bucket: String,
}

impl SupabaseStore {
    pub fn new(settings: &SupabaseSettings, bucket: &str) -> Self {
        SupabaseStore {
            http: Client::new(),
            base_url: settings.url.clone(),
            service_role_key: settings.service_role_key.clone(),
            bucket: bucket.to_string(),
        }
    }

    /// `<project url>storage/v1/object/<bucket>/<key>`; the project URL already ends with `/`.
    fn object_url(&self, key: &str) -> String {
        format!(
            "{}storage/v1/object/{}/{}",
            self.base_url,
            self.bucket,
            key.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl ObjectStore for SupabaseStore {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), StorageError> {
        let response = self
            .http
            .post(self.object_url(key))
            .bearer_auth(&self.service_role_key)
            .header("apikey", &self.service_role_key)
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!("Uploaded {key} to Supabase bucket '{}'", self.bucket);
        Ok(())
    }

    fn describe(&self) -> String {
        format!("supabase bucket '{}' at {}", self.bucket, self.base_url)
    }
}
