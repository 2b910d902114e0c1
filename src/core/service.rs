use crate::core::extractor::BraceSpanExtractor;
use crate::core::generator::GeminiClient;
use crate::core::pipeline::ResourceValidationPipeline;
use crate::core::prompt::PromptBuilder;
use crate::core::reachability::HttpReachabilityChecker;
use crate::core::{ConfigProvider, ResourceValidator, TextGenerator, ValidatedResourceSet};
use crate::domain::model::GenerationRequest;
use crate::utils::error::{Result, ServiceError};
use crate::utils::validation::validate_non_empty_string;
use std::sync::Arc;
use std::time::Duration;

/// 啟動時建立一次；之後唯讀
pub enum GeneratorHandle<G: TextGenerator> {
    Ready(Arc<G>),
    Unavailable { reason: String },
}

impl<G: TextGenerator> GeneratorHandle<G> {
    pub fn ready(generator: G) -> Self {
        GeneratorHandle::Ready(Arc::new(generator))
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        GeneratorHandle::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, GeneratorHandle::Ready(_))
    }
}

impl<G: TextGenerator> Clone for GeneratorHandle<G> {
    fn clone(&self) -> Self {
        match self {
            GeneratorHandle::Ready(generator) => GeneratorHandle::Ready(Arc::clone(generator)),
            GeneratorHandle::Unavailable { reason } => GeneratorHandle::Unavailable {
                reason: reason.clone(),
            },
        }
    }
}

pub struct ContentGenerationService<G: TextGenerator, V: ResourceValidator> {
    generator: GeneratorHandle<G>,
    validator: V,
    prompt: PromptBuilder,
}

pub type DefaultGenerationService = ContentGenerationService<
    GeminiClient,
    ResourceValidationPipeline<BraceSpanExtractor, HttpReachabilityChecker>,
>;

impl<G: TextGenerator, V: ResourceValidator> ContentGenerationService<G, V> {
    pub fn new(generator: GeneratorHandle<G>, validator: V, prompt: PromptBuilder) -> Self {
        Self {
            generator,
            validator,
            prompt,
        }
    }

    pub fn is_available(&self) -> bool {
        self.generator.is_ready()
    }

    fn parse_request(topic: &str) -> std::result::Result<GenerationRequest, ServiceError> {
        validate_non_empty_string("topic", topic).map_err(|_| ServiceError::InvalidRequest {
            message: "A topic of interest is required".to_string(),
        })?;
        Ok(GenerationRequest {
            topic: topic.to_string(),
        })
    }

    /// 生成器只呼叫一次，其輸出一律重新驗證，不採信生成器自稱的 URL 檢查
    pub async fn generate(&self, topic: &str) -> std::result::Result<ValidatedResourceSet, ServiceError> {
        let generator = match &self.generator {
            GeneratorHandle::Ready(generator) => generator,
            GeneratorHandle::Unavailable { reason } => {
                tracing::error!("Generation requested but generator is unavailable: {}", reason);
                return Err(ServiceError::ServiceUnavailable {
                    reason: reason.clone(),
                });
            }
        };

        let request = Self::parse_request(topic)?;
        let prompt = self.prompt.build(&request.topic);

        let generated = generator.generate_content(&prompt).await.map_err(|e| {
            tracing::error!("Generator call failed for topic '{}': {}", request.topic, e);
            ServiceError::from(e)
        })?;

        let validated = self.validator.validate(&generated.text).await.map_err(|e| {
            tracing::error!("Generator output rejected for topic '{}': {}", request.topic, e);
            ServiceError::from(e)
        })?;

        tracing::info!(
            "Generated {} verified resources for topic '{}'",
            validated.len(),
            request.topic
        );
        Ok(validated)
    }
}

impl DefaultGenerationService {
    /// 沒有 API key 時服務仍可建立，但每次呼叫都回傳 `ServiceUnavailable`
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let checker = HttpReachabilityChecker::new(
            Duration::from_secs(config.check_timeout_seconds()),
            config.max_redirects(),
        )?;
        let pipeline = ResourceValidationPipeline::new(BraceSpanExtractor::new(), checker)
            .with_concurrent_checks(config.concurrent_checks());

        let generator = match config.api_key() {
            None => {
                tracing::warn!("No generator API key configured; content generation is disabled");
                GeneratorHandle::unavailable("generator API key not configured")
            }
            Some(api_key) => match GeminiClient::new(
                api_key,
                Duration::from_secs(config.generator_timeout_seconds()),
            ) {
                Ok(client) => GeneratorHandle::ready(
                    client
                        .with_model(config.generator_model())
                        .with_base_url(config.generator_base_url()),
                ),
                Err(e) => {
                    tracing::warn!("Failed to initialize generator client: {}", e);
                    GeneratorHandle::unavailable(e.to_string())
                }
            },
        };

        let prompt = PromptBuilder::new(config.target_count(), config.target_language());
        Ok(Self::new(generator, pipeline, prompt))
    }
}
