use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub topic: String,
}

/// 生成器輸出的單筆資源，保留原始欄位不做修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateResource {
    pub data: Map<String, Value>,
}

impl CandidateResource {
    pub fn new(data: Map<String, Value>) -> Self {
        Self { data }
    }

    /// `url` 欄位的原始值；可能不是字串
    pub fn url_value(&self) -> Option<&Value> {
        self.data.get("url")
    }

    pub fn url(&self) -> Option<&str> {
        self.url_value().and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.data.get("title").and_then(Value::as_str)
    }

    pub fn kind(&self) -> Option<&str> {
        self.data.get("type").and_then(Value::as_str)
    }
}

/// 通過連線檢查的資源，加上原始 payload 的其他頂層欄位
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidatedResourceSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<CandidateResource>>,
    #[serde(flatten)]
    pub passthrough: Map<String, Value>,
}

impl ValidatedResourceSet {
    pub fn with_resources(resources: Vec<CandidateResource>, passthrough: Map<String, Value>) -> Self {
        Self {
            resources: Some(resources),
            passthrough,
        }
    }

    /// payload 沒有 `resources` 陣列時，原封不動回傳
    pub fn passthrough(payload: Map<String, Value>) -> Self {
        Self {
            resources: None,
            passthrough: payload,
        }
    }

    pub fn resources(&self) -> &[CandidateResource] {
        self.resources.as_deref().unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.resources().len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources().is_empty()
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredResource {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub url: String,
}

impl From<&CandidateResource> for StoredResource {
    fn from(candidate: &CandidateResource) -> Self {
        Self {
            kind: candidate.kind().unwrap_or_default().to_string(),
            title: candidate.title().unwrap_or_default().to_string(),
            url: candidate.url().unwrap_or_default().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTicket {
    pub topic: String,
    pub resources: Vec<StoredResource>,
}

impl NewTicket {
    pub fn from_validated(topic: impl Into<String>, set: &ValidatedResourceSet) -> Self {
        Self {
            topic: topic.into(),
            resources: set.resources().iter().map(StoredResource::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: u64,
    pub user_id: u64,
    pub topic: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed: bool,
    pub resources: Vec<StoredResource>,
}

/// 列表用，不含資源
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketSummary {
    pub id: u64,
    pub topic: String,
    pub created_at: DateTime<Utc>,
    pub completed: bool,
}

impl From<&Ticket> for TicketSummary {
    fn from(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id,
            topic: ticket.topic.clone(),
            created_at: ticket.created_at,
            completed: ticket.completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidate(value: Value) -> CandidateResource {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_candidate_accessors() {
        let resource = candidate(json!({"type": "動画", "title": "T1", "url": "https://ok.example"}));

        assert_eq!(resource.kind(), Some("動画"));
        assert_eq!(resource.title(), Some("T1"));
        assert_eq!(resource.url(), Some("https://ok.example"));
    }

    #[test]
    fn test_non_string_url_is_not_a_url() {
        let resource = candidate(json!({"title": "T", "url": 42}));

        assert!(resource.url_value().is_some());
        assert_eq!(resource.url(), None);
    }

    #[test]
    fn test_validated_set_serializes_resources_and_passthrough() {
        let mut passthrough = Map::new();
        passthrough.insert("topic".to_string(), json!("Rust"));
        let set = ValidatedResourceSet::with_resources(
            vec![candidate(json!({"title": "T1", "url": "https://ok.example", "extra": true}))],
            passthrough,
        );

        assert_eq!(
            set.to_json(),
            json!({
                "resources": [{"title": "T1", "url": "https://ok.example", "extra": true}],
                "topic": "Rust"
            })
        );
    }

    #[test]
    fn test_passthrough_set_serializes_payload_unchanged() {
        let payload = json!({"resources": "none today", "note": "n/a"});
        let set = ValidatedResourceSet::passthrough(payload.as_object().unwrap().clone());

        assert!(set.is_empty());
        assert_eq!(set.to_json(), payload);
    }

    #[test]
    fn test_new_ticket_from_validated_set() {
        let set = ValidatedResourceSet::with_resources(
            vec![candidate(json!({"type": "記事", "url": "https://ok.example"}))],
            Map::new(),
        );

        let ticket = NewTicket::from_validated("Rust", &set);

        assert_eq!(ticket.topic, "Rust");
        assert_eq!(
            ticket.resources,
            vec![StoredResource {
                kind: "記事".to_string(),
                title: String::new(),
                url: "https://ok.example".to_string(),
            }]
        );
    }
}
