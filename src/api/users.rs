//! User administration endpoints

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;

use super::{document, documents, ApiRequest, Transport};
use crate::error::{ClientError, Result};
use crate::list::Document;

/// Payload for creating a user
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewUser {
    pub user_id: String,
    pub password: String,
    /// Require a password change at next login
    pub force_reset: bool,
}

impl NewUser {
    pub fn validate(&self) -> Result<()> {
        if self.user_id.is_empty() {
            return Err(ClientError::Validation("user id must not be empty".into()));
        }
        if self.password.is_empty() {
            return Err(ClientError::Validation("password must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct UsersApi {
    transport: Arc<dyn Transport>,
}

impl UsersApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn list(&self) -> Result<Vec<Document>> {
        documents(self.transport.send(ApiRequest::get("/api/users")).await?)
    }

    pub async fn get(&self, user_id: &str) -> Result<Document> {
        document(self.transport.send(ApiRequest::get(format!("/api/users/{}", user_id))).await?)
    }

    pub async fn create(&self, user: &NewUser) -> Result<Document> {
        user.validate()?;
        let request = ApiRequest::post("/api/users").json(user)?;
        document(self.transport.send(request).await?)
    }

    pub async fn set_password(&self, user_id: &str, password: &str) -> Result<Document> {
        if password.is_empty() {
            return Err(ClientError::Validation("password must not be empty".into()));
        }
        self.edit(user_id, json!({ "password": password })).await
    }

    pub async fn set_primary_group(&self, user_id: &str, group_id: &str) -> Result<Document> {
        self.edit(user_id, json!({ "primary_group": group_id })).await
    }

    pub async fn set_force_reset(&self, user_id: &str, enabled: bool) -> Result<Document> {
        self.edit(user_id, json!({ "force_reset": enabled })).await
    }

    pub async fn add_to_group(&self, user_id: &str, group_id: &str) -> Result<Document> {
        let request = ApiRequest::post(format!("/api/users/{}/groups", user_id))
            .json(&json!({ "group_id": group_id }))?;
        document(self.transport.send(request).await?)
    }

    pub async fn remove_from_group(&self, user_id: &str, group_id: &str) -> Result<()> {
        let request = ApiRequest::delete(format!("/api/users/{}/groups/{}", user_id, group_id));
        self.transport.send(request).await?;
        Ok(())
    }

    async fn edit(&self, user_id: &str, update: serde_json::Value) -> Result<Document> {
        let request = ApiRequest::patch(format!("/api/users/{}", user_id)).json(&update)?;
        document(self.transport.send(request).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::RecordingTransport;
    use reqwest::Method;

    fn api(responses: usize) -> (Arc<RecordingTransport>, UsersApi) {
        let replies = (0..responses).map(|_| json!({"id": "bob"})).collect();
        let transport = Arc::new(RecordingTransport::replying(replies));
        (transport.clone(), UsersApi::new(transport))
    }

    #[tokio::test]
    async fn test_create_user() {
        let (transport, users) = api(1);
        let user = NewUser {
            user_id: "bob".into(),
            password: "hunter22".into(),
            force_reset: true,
        };

        users.create(&user).await.unwrap();

        let request = transport.last();
        assert_eq!(request.method, Method::POST);
        assert_eq!(
            request.body,
            Some(json!({"user_id": "bob", "password": "hunter22", "force_reset": true}))
        );

        let blank = NewUser { password: String::new(), ..user };
        assert!(matches!(users.create(&blank).await, Err(ClientError::Validation(_))));
    }

    #[tokio::test]
    async fn test_user_edits() {
        let (transport, users) = api(4);

        users.set_primary_group("bob", "technicians").await.unwrap();
        assert_eq!(transport.last().method, Method::PATCH);
        assert_eq!(transport.last().path, "/api/users/bob");
        assert_eq!(transport.last().body, Some(json!({"primary_group": "technicians"})));

        users.set_force_reset("bob", false).await.unwrap();
        assert_eq!(transport.last().body, Some(json!({"force_reset": false})));

        users.set_password("bob", "new-secret").await.unwrap();
        assert_eq!(transport.last().body, Some(json!({"password": "new-secret"})));
        assert!(users.set_password("bob", "").await.is_err());

        users.add_to_group("bob", "administrator").await.unwrap();
        assert_eq!(transport.last().method, Method::POST);
        assert_eq!(transport.last().path, "/api/users/bob/groups");

        users.remove_from_group("bob", "administrator").await.unwrap();
        assert_eq!(transport.last().method, Method::DELETE);
        assert_eq!(transport.last().path, "/api/users/bob/groups/administrator");
    }
}
