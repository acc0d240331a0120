use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Add,
    Remove,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Add => "add",
            ActionKind::Remove => "remove",
        }
    }
}

impl std::str::FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" => Ok(ActionKind::Add),
            "remove" => Ok(ActionKind::Remove),
            other => Err(format!("unknown schedule action: {other}")),
        }
    }
}

/// A call to the schedule collaborator. The response markup replaces the
/// content of the element whose id is `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleRequest {
    pub kind: ActionKind,
    pub path: String,
    pub params: Vec<(String, String)>,
    pub target: String,
}

impl ScheduleRequest {
    pub fn form_body(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[derive(Debug, Clone)]
struct Endpoint {
    kind: ActionKind,
    path: String,
}

/// Maps trigger class markers to the schedule action they issue.
#[derive(Debug, Clone)]
pub struct ActionRegistry {
    triggers: BTreeMap<String, Endpoint>,
    id_param: String,
    target: String,
}

impl ActionRegistry {
    pub fn new(id_param: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            triggers: BTreeMap::new(),
            id_param: id_param.into(),
            target: target.into(),
        }
    }

    pub fn register(
        &mut self,
        class: impl Into<String>,
        kind: ActionKind,
        path: impl Into<String>,
    ) -> &mut Self {
        let class = class.into();
        let path = path.into();
        debug!(class = %class, kind = kind.as_str(), path = %path, "registered trigger");
        self.triggers.insert(class, Endpoint { kind, path });
        self
    }

    pub fn trigger_classes(&self) -> impl Iterator<Item = &str> {
        self.triggers.keys().map(String::as_str)
    }

    /// Request for an explicit action kind, used when the caller already knows
    /// which trigger fired.
    pub fn request(&self, kind: ActionKind, event_id: &str) -> Option<ScheduleRequest> {
        let event_id = event_id.trim();
        if event_id.is_empty() {
            return None;
        }
        let endpoint = self.triggers.values().find(|e| e.kind == kind)?;
        Some(self.build(endpoint, event_id))
    }

    /// Looks the element's classes up in the registry. The first registered
    /// class wins; an element without an event id resolves to nothing.
    pub fn resolve<'a, I>(&self, classes: I, event_id: Option<&str>) -> Option<ScheduleRequest>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let event_id = event_id.map(str::trim).filter(|id| !id.is_empty())?;
        let endpoint = classes
            .into_iter()
            .find_map(|class| self.triggers.get(class))?;
        trace!(event_id, kind = endpoint.kind.as_str(), "resolved trigger");
        Some(self.build(endpoint, event_id))
    }

    fn build(&self, endpoint: &Endpoint, event_id: &str) -> ScheduleRequest {
        ScheduleRequest {
            kind: endpoint.kind,
            path: endpoint.path.clone(),
            params: vec![(self.id_param.clone(), event_id.to_string())],
            target: self.target.clone(),
        }
    }
}

/// Where the search box sends the visitor.
pub fn search_location(path: &str, keywords: &str) -> String {
    format!("{path}?keywords={}", urlencoding::encode(keywords.trim()))
}

/// Only Enter submits the search box.
pub fn is_submit_key(key: &str) -> bool {
    key == "Enter"
}
