pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::JsonFileTicketStore;
pub use config::Settings;
pub use crate::core::{
    extractor::BraceSpanExtractor,
    generator::GeminiClient,
    pipeline::ResourceValidationPipeline,
    prompt::PromptBuilder,
    reachability::HttpReachabilityChecker,
    service::{ContentGenerationService, DefaultGenerationService, GeneratorHandle},
};
pub use domain::model::{CandidateResource, NewTicket, Ticket, ValidatedResourceSet};
pub use utils::error::{Result, ServiceError, TrackerError};
