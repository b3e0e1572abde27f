//! Answer contract types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A span of the answer text backed by one or more sources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Citation {
    pub start_index: Option<Value>,
    pub end_index: Option<Value>,
    pub sources: Vec<Value>,
}

/// A document chunk the answer drew on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reference {
    pub title: String,
    pub uri: String,
    pub content: String,
}

/// A generated answer. `answer_text` may embed product detail markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnswerResponse {
    pub answer_text: String,
    pub citations: Vec<Citation>,
    pub references: Vec<Reference>,
    pub related_questions: Vec<String>,
    pub query_understanding_info: Value,
    pub state: String,
}

impl Default for AnswerResponse {
    fn default() -> Self {
        Self {
            answer_text: String::new(),
            citations: Vec::new(),
            references: Vec::new(),
            related_questions: Vec::new(),
            query_understanding_info: Value::Object(Default::default()),
            state: String::new(),
        }
    }
}
