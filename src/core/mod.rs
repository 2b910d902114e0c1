pub mod extractor;
pub mod generator;
pub mod pipeline;
pub mod prompt;
pub mod reachability;
pub mod service;

pub use crate::domain::model::{CandidateResource, GenerationRequest, ValidatedResourceSet};
pub use crate::domain::ports::{
    ConfigProvider, GeneratedText, PayloadExtractor, ReachabilityChecker, ResourceValidator,
    TextGenerator, TicketStore,
};
pub use crate::utils::error::Result;
