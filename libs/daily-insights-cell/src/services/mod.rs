pub mod fallback;
pub mod gemini;
pub mod parser;
pub mod prompt;
pub mod synthesizer;

pub use fallback::fallback_insights;
pub use gemini::{GeminiProvider, GenerationProvider};
pub use synthesizer::InsightSynthesizer;
