//! HMM profile endpoints

use std::sync::Arc;

use serde_json::json;

use super::{decode, document, ApiRequest, Transport};
use crate::error::{ClientError, Result};
use crate::list::{Document, PaginatedList};

#[derive(Clone)]
pub struct HmmApi {
    transport: Arc<dyn Transport>,
}

impl HmmApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Fetch a page of HMM profiles, optionally filtered by name
    pub async fn find(&self, term: Option<&str>, page: u32) -> Result<PaginatedList> {
        if page < 1 {
            return Err(ClientError::Validation("page must be at least 1".into()));
        }

        let mut request = ApiRequest::get("/api/hmms").query("page", page);

        if let Some(term) = term.filter(|t| !t.is_empty()) {
            request = request.query("find", term);
        }

        decode(self.transport.send(request).await?)
    }

    pub async fn get(&self, hmm_id: &str) -> Result<Document> {
        document(self.transport.send(ApiRequest::get(format!("/api/hmms/{}", hmm_id))).await?)
    }

    /// Install the profiles from a published release
    pub async fn install(&self, release_id: u64) -> Result<Document> {
        let request = ApiRequest::post("/api/hmms/install").json(&json!({ "release_id": release_id }))?;
        document(self.transport.send(request).await?)
    }

    /// Remove unreferenced profiles and the installed profile file
    pub async fn purge(&self) -> Result<()> {
        self.transport.send(ApiRequest::delete("/api/hmms")).await?;
        Ok(())
    }
}
