use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_UPLOAD_MESSAGE: &str = "File uploaded successfully";
pub const NO_RESPONSE_MESSAGE: &str = "No response received";

#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest<'a> {
    pub query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub message: String,
    pub extract_path: Option<String>,
}

impl UploadReceipt {
    pub fn from_body(body: &Value) -> Self {
        let message = body
            .get("message")
            .and_then(|v| v.as_str())
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_UPLOAD_MESSAGE)
            .to_string();
        let extract_path = body
            .get("extract_path")
            .and_then(|v| v.as_str())
            .map(String::from);
        Self {
            message,
            extract_path,
        }
    }
}

/// What the analyze endpoint answered with.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzeResult {
    Text(String),
    Structured(Value),
}

impl AnalyzeResult {
    /// Missing, null and falsy values all collapse to the "no response"
    /// placeholder. Scalars other than strings are shown as text.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(s)) if !s.is_empty() => AnalyzeResult::Text(s.clone()),
            Some(v) if v.is_object() || v.is_array() => AnalyzeResult::Structured(v.clone()),
            Some(Value::Bool(true)) => AnalyzeResult::Text("true".to_string()),
            Some(Value::Number(n)) if n.as_f64() != Some(0.0) => {
                AnalyzeResult::Text(n.to_string())
            }
            _ => AnalyzeResult::Text(NO_RESPONSE_MESSAGE.to_string()),
        }
    }

    /// Text for the response pane: structured payloads are pretty-printed
    /// with two-space indentation in the order the server sent them.
    pub fn display_text(&self) -> String {
        match self {
            AnalyzeResult::Text(text) => text.clone(),
            AnalyzeResult::Structured(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, AnalyzeResult::Structured(_))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChunkRef {
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub chunk_id: Option<Value>,
}

impl ChunkRef {
    pub fn label(&self) -> String {
        let file = self.file.as_deref().unwrap_or("<unknown>");
        match &self.chunk_id {
            Some(Value::String(id)) => format!("{file}#{id}"),
            Some(Value::Null) | None => file.to_string(),
            Some(id) => format!("{file}#{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeReply {
    pub result: AnalyzeResult,
    pub sources: Vec<ChunkRef>,
}

impl AnalyzeReply {
    pub fn from_body(body: &Value) -> Self {
        let sources = body
            .get("retrieved_docs")
            .and_then(|v| v.as_array())
            .map(|docs| {
                docs.iter()
                    .filter_map(|d| serde_json::from_value(d.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();
        Self {
            result: AnalyzeResult::from_value(body.get("response")),
            sources,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoredChunk {
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub chunk_id: Option<Value>,
    #[serde(default)]
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChunkListing {
    pub total_chunks: u64,
    #[serde(default)]
    pub chunks: Vec<StoredChunk>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn upload_receipt_falls_back_to_default_message() {
        let receipt = UploadReceipt::from_body(&json!({}));
        assert_eq!(receipt.message, DEFAULT_UPLOAD_MESSAGE);

        let receipt = UploadReceipt::from_body(&json!({ "message": "" }));
        assert_eq!(receipt.message, DEFAULT_UPLOAD_MESSAGE);

        let receipt = UploadReceipt::from_body(&json!({
            "message": "Code uploaded",
            "extract_path": "temp/project"
        }));
        assert_eq!(receipt.message, "Code uploaded");
        assert_eq!(receipt.extract_path.as_deref(), Some("temp/project"));
    }

    #[test]
    fn falsy_responses_become_placeholder() {
        for value in [json!(null), json!(""), json!(false), json!(0)] {
            assert_eq!(
                AnalyzeResult::from_value(Some(&value)),
                AnalyzeResult::Text(NO_RESPONSE_MESSAGE.to_string())
            );
        }
        assert_eq!(
            AnalyzeResult::from_value(None),
            AnalyzeResult::Text(NO_RESPONSE_MESSAGE.to_string())
        );
    }

    #[test]
    fn scalar_responses_are_text() {
        assert_eq!(
            AnalyzeResult::from_value(Some(&json!(42))),
            AnalyzeResult::Text("42".to_string())
        );
        assert_eq!(
            AnalyzeResult::from_value(Some(&json!(true))),
            AnalyzeResult::Text("true".to_string())
        );
    }

    #[test]
    fn structured_display_keeps_server_key_order() {
        let body: Value =
            serde_json::from_str(r#"{"response": {"zeta": 1, "alpha": ["a", "b"]}}"#)
                .expect("valid json");
        let reply = AnalyzeReply::from_body(&body);
        assert!(reply.result.is_structured());
        assert_eq!(
            reply.result.display_text(),
            "{\n  \"zeta\": 1,\n  \"alpha\": [\n    \"a\",\n    \"b\"\n  ]\n}"
        );
    }

    #[test]
    fn text_display_is_verbatim() {
        let result = AnalyzeResult::Text("  spaced\n  lines ".to_string());
        assert_eq!(result.display_text(), "  spaced\n  lines ");
    }

    #[test]
    fn reply_collects_sources() {
        let body = json!({
            "response": "ok",
            "retrieved_docs": [
                { "file": "src/main.py", "chunk_id": 3 },
                { "file": "src/util.py" },
                "not-a-doc"
            ]
        });
        let reply = AnalyzeReply::from_body(&body);
        let labels: Vec<String> = reply.sources.iter().map(ChunkRef::label).collect();
        assert_eq!(labels, vec!["src/main.py#3", "src/util.py"]);
    }

    #[test]
    fn query_request_omits_unset_top_k() {
        let body = serde_json::to_value(QueryRequest {
            query: "what does main do?",
            top_k: None,
        })
        .expect("serialize");
        assert_eq!(body, json!({ "query": "what does main do?" }));
    }
}
