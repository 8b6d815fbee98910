//! Client session
//!
//! A `Client` is the handle the view layer holds. It owns the transport and
//! the cached list for each collection, and is passed explicitly to whatever
//! needs to issue requests or read lists.

use std::sync::{Arc, Mutex};

use crate::api::{HmmApi, HttpTransport, SamplesApi, Transport, UsersApi};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::list::{ListStore, PaginatedList, UNPAGINATED_PER_PAGE};
use crate::realtime::{Interface, Router};

pub struct Client {
    config: ClientConfig,
    samples_api: SamplesApi,
    hmm_api: HmmApi,
    users_api: UsersApi,
    samples: ListStore,
    samples_term: Mutex<Option<String>>,
    hmms: ListStore,
    users: ListStore,
}

impl Client {
    /// Create a client over any transport
    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            samples_api: SamplesApi::new(transport.clone()),
            hmm_api: HmmApi::new(transport.clone()),
            users_api: UsersApi::new(transport),
            samples: ListStore::new("samples", config.samples_sort.clone()),
            samples_term: Mutex::new(None),
            hmms: ListStore::new("hmm", config.hmm_sort.clone()),
            users: ListStore::new("users", config.users_sort.clone()),
            config,
        }
    }

    /// Create a client talking HTTP to `config.base_url`
    pub fn connect(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.clone())?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn samples_api(&self) -> &SamplesApi {
        &self.samples_api
    }

    pub fn hmm_api(&self) -> &HmmApi {
        &self.hmm_api
    }

    pub fn users_api(&self) -> &UsersApi {
        &self.users_api
    }

    pub fn samples(&self) -> &ListStore {
        &self.samples
    }

    pub fn hmms(&self) -> &ListStore {
        &self.hmms
    }

    pub fn users(&self) -> &ListStore {
        &self.users
    }

    /// Fetch a page of samples into the samples list
    ///
    /// The term is remembered so later refetches stay on the same search.
    pub async fn list_samples(&self, term: Option<&str>, page: u32) -> Result<()> {
        let incoming = self.samples_api.find(term, page, self.config.per_page).await?;
        *self.lock_samples_term()? = term.map(str::to_string);
        self.samples.apply_page(incoming)
    }

    /// Search term of the last samples fetch
    pub fn samples_term(&self) -> Option<String> {
        self.lock_samples_term().ok().and_then(|term| term.clone())
    }

    /// Fetch a page of HMM profiles into the HMM list
    pub async fn list_hmms(&self, term: Option<&str>, page: u32) -> Result<()> {
        let incoming = self.hmm_api.find(term, page).await?;
        self.hmms.apply_page(incoming)
    }

    /// Fetch all users into the users list as a single page
    pub async fn list_users(&self) -> Result<()> {
        let documents = self.users_api.list().await?;
        let count = documents.len() as u64;

        let mut incoming = PaginatedList::page_of(1, UNPAGINATED_PER_PAGE, documents);
        incoming.total_count = Some(count);
        incoming.found_count = Some(count);

        self.users.apply_page(incoming)
    }

    /// Delete a sample and refetch the page at the tail of the list
    ///
    /// Refetching the current page realigns the cached list with the server's
    /// page boundaries, which shifted when the sample went away.
    pub async fn remove_sample(&self, sample_id: &str) -> Result<()> {
        self.samples_api.remove(sample_id).await?;
        let term = self.samples_term();
        self.list_samples(term.as_deref(), self.samples.page()).await
    }

    /// Router delivering push messages into this client's lists
    pub fn router(&self) -> Router {
        Router::new()
            .with(Interface::Samples, self.samples.clone())
            .with(Interface::Hmm, self.hmms.clone())
            .with(Interface::Users, self.users.clone())
    }

    fn lock_samples_term(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>> {
        self.samples_term
            .lock()
            .map_err(|_| ClientError::InvalidOperation("Failed to acquire lock".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::RecordingTransport;
    use serde_json::json;

    fn page(page: u32, ids: &[&str]) -> serde_json::Value {
        let documents: Vec<_> = ids.iter().map(|id| json!({"id": id, "created_at": id})).collect();
        json!({"documents": documents, "page": page, "per_page": 2, "found_count": 10})
    }

    #[tokio::test]
    async fn test_list_samples_pages() {
        let transport = Arc::new(RecordingTransport::replying(vec![
            page(1, &["s9", "s8"]),
            page(2, &["s7", "s6"]),
        ]));
        let config = ClientConfig {
            per_page: 2,
            ..ClientConfig::default()
        };
        let client = Client::new(config, transport.clone());

        client.list_samples(None, 1).await.unwrap();
        client.list_samples(None, 2).await.unwrap();

        let cached = client.samples().snapshot().unwrap();
        assert_eq!(cached.documents.len(), 4);
        assert_eq!(cached.page, 2);
        assert!(transport.last().query.contains(&("per_page".to_string(), "2".to_string())));
    }

    #[tokio::test]
    async fn test_remove_sample_refetches_tail_page() {
        let transport = Arc::new(RecordingTransport::replying(vec![
            page(1, &["s9", "s8"]),
            page(2, &["s7", "s6"]),
            serde_json::Value::Null,
            page(2, &["s6", "s5"]),
        ]));
        let client = Client::new(ClientConfig { per_page: 2, ..ClientConfig::default() }, transport.clone());

        client.list_samples(None, 1).await.unwrap();
        client.list_samples(None, 2).await.unwrap();
        client.remove_sample("s7").await.unwrap();

        let ids: Vec<_> = client
            .samples()
            .documents()
            .unwrap()
            .iter()
            .filter_map(|d| d.id().cloned())
            .collect();
        assert_eq!(ids, vec![json!("s9"), json!("s8"), json!("s6"), json!("s5")]);
    }

    #[tokio::test]
    async fn test_list_users_and_push() {
        let transport = Arc::new(RecordingTransport::replying(vec![json!([{"id": "bob"}, {"id": "dave"}])]));
        let client = Client::new(ClientConfig::default(), transport);

        client.list_users().await.unwrap();
        assert_eq!(client.users().snapshot().unwrap().found_count, Some(2));

        // The users list is not paginated, so inserts never push anyone out
        client
            .router()
            .handle_text(r#"{"interface": "users", "operation": "insert", "data": {"id": "alice"}}"#)
            .unwrap();

        let ids: Vec<_> = client
            .users()
            .documents()
            .unwrap()
            .iter()
            .filter_map(|d| d.id().cloned())
            .collect();
        assert_eq!(ids, vec![json!("alice"), json!("bob"), json!("dave")]);
    }

    #[tokio::test]
    async fn test_remove_sample_keeps_search_term() {
        let transport = Arc::new(RecordingTransport::replying(vec![
            page(1, &["g2", "g1"]),
            serde_json::Value::Null,
            page(1, &["g2", "g0"]),
        ]));
        let client = Client::new(ClientConfig { per_page: 2, ..ClientConfig::default() }, transport.clone());

        client.list_samples(Some("grape"), 1).await.unwrap();
        client.remove_sample("g1").await.unwrap();

        let refetch = transport.last();
        assert_eq!(refetch.path, "/api/samples");
        assert!(refetch.query.contains(&("find".to_string(), "grape".to_string())));
        assert!(refetch.query.contains(&("page".to_string(), "1".to_string())));
        assert_eq!(client.samples_term().as_deref(), Some("grape"));

        // A plain fetch clears the remembered term
        let transport = Arc::new(RecordingTransport::replying(vec![
            page(1, &["g2"]),
            page(1, &["s1"]),
            serde_json::Value::Null,
            page(1, &["s1"]),
        ]));
        let client = Client::new(ClientConfig { per_page: 2, ..ClientConfig::default() }, transport.clone());
        client.list_samples(Some("grape"), 1).await.unwrap();
        client.list_samples(None, 1).await.unwrap();
        client.remove_sample("s0").await.unwrap();
        assert!(!transport.last().query.iter().any(|(key, _)| key == "find"));
    }
}
