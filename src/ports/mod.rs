//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ProfileRepository` - profile persistence
//! - `AIProvider` - external text generation
//! - `SessionValidator` - bearer token validation

mod ai_provider;
mod profile_repository;
mod session_validator;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, GenerationPurpose,
    Message, MessageRole, ProviderInfo, RequestMetadata, TokenUsage,
};
pub use profile_repository::ProfileRepository;
pub use session_validator::SessionValidator;
