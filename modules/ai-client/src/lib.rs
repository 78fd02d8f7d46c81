pub mod error;
pub mod gemini;
pub mod reply;
pub mod traits;

pub use error::AiError;
pub use gemini::Gemini;
pub use reply::{json_payload, preview};
pub use traits::{Message, MessageRole, TextGenerator};
