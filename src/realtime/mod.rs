//! Push notifications from the server
//!
//! The server announces collection changes as JSON messages of the form
//! `{"interface": "samples", "operation": "update", "data": {...}}`. This
//! module decodes them and applies each one to the matching `ListStore`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ClientError, Result};
use crate::list::{Document, ListStore};

/// Collection a push message refers to
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Interface {
    Samples,
    Hmm,
    Users,
    Analyses,
    Other(String),
}

impl From<String> for Interface {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "samples" => Interface::Samples,
            "hmm" => Interface::Hmm,
            "users" => Interface::Users,
            "analyses" => Interface::Analyses,
            _ => Interface::Other(raw),
        }
    }
}

impl From<Interface> for String {
    fn from(interface: Interface) -> Self {
        match interface {
            Interface::Samples => "samples".into(),
            Interface::Hmm => "hmm".into(),
            Interface::Users => "users".into(),
            Interface::Analyses => "analyses".into(),
            Interface::Other(raw) => raw,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Insert,
    Update,
    Remove,
}

/// A raw push message
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PushMessage {
    pub interface: Interface,
    pub operation: Operation,
    #[serde(default)]
    pub data: Value,
}

/// A push message with its payload checked against its operation
#[derive(Clone, Debug, PartialEq)]
pub enum PushEvent {
    Insert(Document),
    Update(Document),
    Remove(Vec<Value>),
}

impl PushMessage {
    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| ClientError::Realtime(e.to_string()))
    }

    /// Check the payload shape: a document for inserts and updates, a list of ids for removals
    pub fn event(&self) -> Result<PushEvent> {
        match (self.operation, &self.data) {
            (Operation::Insert, Value::Object(fields)) => Ok(PushEvent::Insert(Document::new(fields.clone()))),
            (Operation::Update, Value::Object(fields)) => Ok(PushEvent::Update(Document::new(fields.clone()))),
            (Operation::Remove, Value::Array(ids)) => Ok(PushEvent::Remove(ids.clone())),
            (Operation::Remove, Value::String(_) | Value::Number(_)) => {
                Ok(PushEvent::Remove(vec![self.data.clone()]))
            }
            (operation, data) => Err(ClientError::Realtime(format!(
                "unexpected payload for {:?}: {}",
                operation, data
            ))),
        }
    }
}

/// Routes push messages to the stores that cache each collection
#[derive(Clone, Default)]
pub struct Router {
    stores: HashMap<Interface, ListStore>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route messages for `interface` into `store`
    pub fn register(&mut self, interface: Interface, store: ListStore) {
        self.stores.insert(interface, store);
    }

    pub fn with(mut self, interface: Interface, store: ListStore) -> Self {
        self.register(interface, store);
        self
    }

    /// Decode and apply a raw message
    ///
    /// Returns whether a store was changed. Messages for collections nobody
    /// registered are skipped.
    pub fn handle_text(&self, raw: &str) -> Result<bool> {
        let message = PushMessage::parse(raw).map_err(|e| {
            log::warn!("Dropping undecodable push message: {}", e);
            e
        })?;
        self.handle(&message)
    }

    pub fn handle(&self, message: &PushMessage) -> Result<bool> {
        let Some(store) = self.stores.get(&message.interface) else {
            log::debug!("No store for interface {:?}; ignoring", message.interface);
            return Ok(false);
        };

        let event = message.event().map_err(|e| {
            log::warn!("[{}] {}", store.name(), e);
            e
        })?;

        match event {
            PushEvent::Insert(document) => store.insert(document)?,
            PushEvent::Update(document) => store.edit(document)?,
            PushEvent::Remove(ids) => store.remove(ids)?,
        }

        Ok(true)
    }
}
