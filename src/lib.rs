// Library surface for the reader core, headless/integration tests and reuse.
// The terminal presentation layer lives in the binary (main.rs, ui.rs).
pub mod alignment;
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod render;
pub mod runtime;
pub mod source;
pub mod surface;
pub mod timing;
pub mod tokenizer;

pub use engine::{create_session, Engine, Phase, StateSnapshot, StepOutcome};
pub use error::{EngineError, Result};
pub use render::{Glyph, Progress, RenderInstruction};
pub use tokenizer::{tokenize, WordSequence};
