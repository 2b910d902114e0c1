use crate::domain::model::{NewTicket, Ticket, TicketSummary, ValidatedResourceSet};
use crate::utils::error::{ExtractionError, GeneratorError, PipelineError, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};

pub trait ConfigProvider: Send + Sync {
    fn generator_model(&self) -> &str;
    fn generator_base_url(&self) -> &str;
    fn api_key(&self) -> Option<&str>;
    fn generator_timeout_seconds(&self) -> u64;
    fn check_timeout_seconds(&self) -> u64;
    fn concurrent_checks(&self) -> usize;
    fn max_redirects(&self) -> usize;
    fn target_count(&self) -> usize;
    fn target_language(&self) -> &str;
    fn ticket_store_path(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedText {
    pub text: String,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_content(&self, prompt: &str) -> std::result::Result<GeneratedText, GeneratorError>;
}

/// 從非結構化文字中取出內嵌的 JSON 物件
pub trait PayloadExtractor: Send + Sync {
    fn extract(&self, raw_text: &str) -> std::result::Result<Map<String, Value>, ExtractionError>;
}

/// 不會回傳錯誤：任何失敗都視為無法連線
#[async_trait]
pub trait ReachabilityChecker: Send + Sync {
    async fn is_reachable(&self, url: &str) -> bool;
}

#[async_trait]
pub trait ResourceValidator: Send + Sync {
    async fn validate(&self, raw_text: &str) -> std::result::Result<ValidatedResourceSet, PipelineError>;
}

pub trait TicketStore: Send + Sync {
    fn save_ticket(
        &self,
        user_id: u64,
        ticket: NewTicket,
    ) -> impl std::future::Future<Output = Result<u64>> + Send;
    fn list_tickets(
        &self,
        user_id: u64,
    ) -> impl std::future::Future<Output = Result<Vec<TicketSummary>>> + Send;
    fn get_ticket(
        &self,
        user_id: u64,
        ticket_id: u64,
    ) -> impl std::future::Future<Output = Result<Ticket>> + Send;
    fn toggle_completed(
        &self,
        user_id: u64,
        ticket_id: u64,
    ) -> impl std::future::Future<Output = Result<Ticket>> + Send;
}
