//! Managed object-store client for property images.
//!
//! Thin REST wrapper: binary upload, public URL retrieval, delete. Every
//! call is synchronous from the caller's perspective and surfaces failures
//! immediately; there are no retries.

use reqwest::header::CONTENT_TYPE;

use crate::errors::AppError;

#[derive(Debug, Clone)]
pub struct StorageClient {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
    bucket: String,
}

impl StorageClient {
    pub fn new(base_url: &str, service_key: &str, bucket: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
            bucket: bucket.to_string(),
        }
    }

    /// Object path for a stored property image.
    pub fn object_path(propiedad_id: i64, nombre_archivo: &str) -> String {
        format!("propiedad_{propiedad_id}/{nombre_archivo}")
    }

    /// Public URL the frontend can fetch without credentials.
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, path
        )
    }

    /// Upload bytes and return the object's public URL.
    pub async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError> {
        let url = format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, path);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Storage upload failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "Storage upload failed ({status}): {body}"
            )));
        }

        Ok(self.public_url(path))
    }

    /// Delete an object. Callers treat failures as best-effort.
    pub async fn delete(&self, path: &str) -> Result<(), AppError> {
        let url = format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, path);
        let response = self
            .http
            .delete(&url)
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Storage delete failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::Upstream(format!("Storage delete failed ({status})")));
        }
        Ok(())
    }
}

/// Make an uploaded filename safe for use as an object key segment.
pub fn sanitize_filename(original: &str) -> String {
    let cleaned: String = original
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "archivo".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_url_shape() {
        let client = StorageClient::new("https://proj.example.co/", "key", "propiedades");
        assert_eq!(
            client.public_url("propiedad_7/foto.jpg"),
            "https://proj.example.co/storage/v1/object/public/propiedades/propiedad_7/foto.jpg"
        );
    }

    #[test]
    fn object_path_is_per_property() {
        assert_eq!(
            StorageClient::object_path(12, "abc_casa.jpg"),
            "propiedad_12/abc_casa.jpg"
        );
    }

    #[test]
    fn filename_sanitization() {
        assert_eq!(sanitize_filename("casa azul.jpg"), "casa_azul.jpg");
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_filename("fachada-01.png"), "fachada-01.png");
        assert_eq!(sanitize_filename(""), "archivo");
    }
}
