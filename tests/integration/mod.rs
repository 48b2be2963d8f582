//! Integration Tests Module
//!
//! Integration tests for the FlexiTrip advisor: response normalization,
//! recommendation extraction, settings loading and the advisor turn against an
//! in-memory provider.

use std::sync::Once;

// Contract recovery of raw completions
mod normalizer_test;

// Recommendation extraction from hints and prose
mod extractor_test;

// Settings files and environment overrides
mod settings_test;

// System prompt and prompt generator
mod prompt_test;

// Advisor turns, fallback and simulated streaming
mod advisor_test;

static TRACING: Once = Once::new();

/// Route `tracing` output through the test harness. `RUST_LOG` selects levels.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}
