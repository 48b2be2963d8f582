//! Services
//!
//! Prompt construction, model fallback and the travel advisor itself.

pub mod advisor;
pub mod fallback;
pub mod prompt;
pub mod prompt_generator;

pub use advisor::{AdvisorReply, TravelAdvisor};
pub use fallback::{FallbackConfig, FallbackError, ModelFallbackChain};
pub use prompt::build_system_prompt;
pub use prompt_generator::{
    generate_base_prompt, generate_quick_prompts, has_valid_selections, FocusType,
    PromptGeneratorOptions,
};
