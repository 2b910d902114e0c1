use crate::domain::ports::PayloadExtractor;
use crate::utils::error::ExtractionError;
use serde_json::{Map, Value};

/// 取第一個 `{` 到最後一個 `}` 之間的內容當作 JSON。
/// 假設輸出中只有一個頂層物件，且前後的說明文字沒有大括號。
#[derive(Debug, Clone, Copy, Default)]
pub struct BraceSpanExtractor;

impl BraceSpanExtractor {
    pub fn new() -> Self {
        Self
    }

    fn locate_span(raw_text: &str) -> Option<&str> {
        let start = raw_text.find('{')?;
        let end = raw_text.rfind('}')?;
        if end < start {
            return None;
        }
        Some(&raw_text[start..=end])
    }
}

impl PayloadExtractor for BraceSpanExtractor {
    fn extract(&self, raw_text: &str) -> Result<Map<String, Value>, ExtractionError> {
        let span = Self::locate_span(raw_text).ok_or(ExtractionError::NoPayloadFound)?;
        tracing::debug!("Located payload span of {} bytes", span.len());

        serde_json::from_str::<Map<String, Value>>(span).map_err(ExtractionError::MalformedPayload)
    }
}
