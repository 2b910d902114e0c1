use crate::core::{
    CandidateResource, PayloadExtractor, ReachabilityChecker, ResourceValidator,
    ValidatedResourceSet,
};
use crate::utils::error::PipelineError;
use futures::future::BoxFuture;
use futures::{stream, FutureExt, StreamExt};
use serde_json::Value;

pub const DEFAULT_CONCURRENT_CHECKS: usize = 25;

/// 擷取 payload 後逐筆檢查 URL，只保留可連線的資源。
/// 檢查可並行，但輸出順序與生成器輸出一致。
pub struct ResourceValidationPipeline<E: PayloadExtractor, R: ReachabilityChecker> {
    extractor: E,
    checker: R,
    concurrent_checks: usize,
}

impl<E: PayloadExtractor, R: ReachabilityChecker> ResourceValidationPipeline<E, R> {
    pub fn new(extractor: E, checker: R) -> Self {
        Self {
            extractor,
            checker,
            concurrent_checks: DEFAULT_CONCURRENT_CHECKS,
        }
    }

    /// 1 表示逐筆依序檢查
    pub fn with_concurrent_checks(mut self, concurrent_checks: usize) -> Self {
        self.concurrent_checks = concurrent_checks.max(1);
        self
    }

    async fn check_candidate(&self, candidate: &CandidateResource) -> bool {
        match candidate.url_value() {
            None => {
                tracing::debug!("Dropping candidate without url: {:?}", candidate.title());
                false
            }
            Some(Value::String(url)) => {
                let reachable = self.checker.is_reachable(url).await;
                if !reachable {
                    tracing::debug!("Dropping unreachable url: {}", url);
                }
                reachable
            }
            Some(other) => {
                tracing::debug!("Dropping candidate with non-string url: {}", other);
                false
            }
        }
    }
}

#[async_trait::async_trait]
impl<E: PayloadExtractor, R: ReachabilityChecker> ResourceValidator
    for ResourceValidationPipeline<E, R>
{
    async fn validate(&self, raw_text: &str) -> Result<ValidatedResourceSet, PipelineError> {
        let mut payload = self.extractor.extract(raw_text)?;

        let items = match payload.remove("resources") {
            Some(Value::Array(items)) => items,
            other => {
                // `resources` 不存在或不是陣列：原樣回傳
                if let Some(value) = other {
                    payload.insert("resources".to_string(), value);
                }
                tracing::debug!("Payload has no resources list, passing through");
                return Ok(ValidatedResourceSet::passthrough(payload));
            }
        };

        let total = items.len();
        let candidates: Vec<CandidateResource> = items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(data) => Some(CandidateResource::new(data)),
                other => {
                    tracing::debug!("Dropping non-object resource entry: {}", other);
                    None
                }
            })
            .collect();

        let checks: Vec<BoxFuture<'_, bool>> = candidates
            .iter()
            .map(|candidate| self.check_candidate(candidate).boxed())
            .collect();
        let verdicts: Vec<bool> = stream::iter(checks)
            .buffered(self.concurrent_checks)
            .collect()
            .await;

        let resources: Vec<CandidateResource> = candidates
            .into_iter()
            .zip(verdicts)
            .filter_map(|(candidate, reachable)| reachable.then_some(candidate))
            .collect();

        tracing::info!("Validated {}/{} generated resources", resources.len(), total);

        Ok(ValidatedResourceSet::with_resources(resources, payload))
    }
}
