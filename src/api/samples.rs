//! Sample endpoints

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::{decode, document, documents, validate_paging, ApiRequest, Transport};
use crate::error::{ClientError, Result};
use crate::list::{Document, PaginatedList};

/// Payload for creating a sample
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct NewSample {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isolate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub srna: bool,
    /// Id of the host subtraction the reads are screened against
    pub subtraction: String,
    /// One file for single-end libraries, two for paired-end
    pub files: Vec<String>,
}

impl NewSample {
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(ClientError::Validation("sample name must not be empty".into()));
        }

        if self.subtraction.is_empty() {
            return Err(ClientError::Validation("a subtraction host is required".into()));
        }

        if !(1..=2).contains(&self.files.len()) {
            return Err(ClientError::Validation(format!(
                "a sample needs one or two read files, got {}",
                self.files.len()
            )));
        }

        Ok(())
    }
}

/// Editable sample fields; unset fields are left alone
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct SampleUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isolate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl SampleUpdate {
    pub fn validate(&self) -> Result<()> {
        if matches!(&self.name, Some(name) if name.is_empty()) {
            return Err(ClientError::Validation("sample name must not be empty".into()));
        }
        Ok(())
    }
}

/// Sample access settings; unset fields are left alone
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct RightsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_read: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_write: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_read: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_write: Option<bool>,
}

/// Analysis workflows a sample can be run through
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    PathoscopeBowtie,
    Nuvs,
}

#[derive(Serialize)]
struct AnalyzeRequest {
    algorithm: Algorithm,
}

/// Sample endpoints bound to a transport
#[derive(Clone)]
pub struct SamplesApi {
    transport: Arc<dyn Transport>,
}

impl SamplesApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Fetch a page of samples, optionally filtered by name or owner
    pub async fn find(&self, term: Option<&str>, page: u32, per_page: u32) -> Result<PaginatedList> {
        validate_paging(page, per_page)?;

        let mut request = ApiRequest::get("/api/samples")
            .query("page", page)
            .query("per_page", per_page);

        if let Some(term) = term.filter(|t| !t.is_empty()) {
            request = request.query("find", term);
        }

        decode(self.transport.send(request).await?)
    }

    pub async fn get(&self, sample_id: &str) -> Result<Document> {
        let value = self.transport.send(ApiRequest::get(format!("/api/samples/{}", sample_id))).await?;
        document(value)
    }

    pub async fn create(&self, sample: &NewSample) -> Result<Document> {
        sample.validate()?;
        let request = ApiRequest::post("/api/samples").json(sample)?;
        document(self.transport.send(request).await?)
    }

    pub async fn update(&self, sample_id: &str, update: &SampleUpdate) -> Result<Document> {
        update.validate()?;
        let request = ApiRequest::patch(format!("/api/samples/{}", sample_id)).json(update)?;
        document(self.transport.send(request).await?)
    }

    pub async fn update_rights(&self, sample_id: &str, update: &RightsUpdate) -> Result<Document> {
        let request = ApiRequest::patch(format!("/api/samples/{}/rights", sample_id)).json(update)?;
        document(self.transport.send(request).await?)
    }

    pub async fn remove(&self, sample_id: &str) -> Result<()> {
        self.transport
            .send(ApiRequest::delete(format!("/api/samples/{}", sample_id)))
            .await?;
        Ok(())
    }

    pub async fn list_analyses(&self, sample_id: &str) -> Result<Value> {
        self.transport
            .send(ApiRequest::get(format!("/api/samples/{}/analyses", sample_id)))
            .await
    }

    /// Start an analysis job for the sample
    pub async fn analyze(&self, sample_id: &str, algorithm: Algorithm) -> Result<Document> {
        let request = ApiRequest::post(format!("/api/samples/{}/analyses", sample_id))
            .json(&AnalyzeRequest { algorithm })?;
        document(self.transport.send(request).await?)
    }

    /// Uploaded read files that can be attached to a new sample
    pub async fn find_read_files(&self) -> Result<Vec<Document>> {
        let request = ApiRequest::get("/api/files").query("type", "reads");
        documents(self.transport.send(request).await?)
    }

    /// Subtractions that are ready to be used as sample hosts
    pub async fn find_ready_hosts(&self) -> Result<Vec<Document>> {
        let request = ApiRequest::get("/api/subtractions")
            .query("ready", true)
            .query("is_host", true);
        documents(self.transport.send(request).await?)
    }
}
