//! Query understanding and routing
//!
//! The deterministic side of the assistant: a keyword intent classifier, a
//! regex entity extractor with an LLM fallback for the queries the patterns
//! miss, per-user profile storage, the price alert scan, and the agent that
//! ties query -> pipeline -> answer together.

pub mod agent;
pub mod alerts;
pub mod extract;
pub mod intent;
pub mod profile;

pub use agent::{AgentAnswer, KrishiAgent};
pub use alerts::{AlertCenter, AlertNotice};
pub use extract::{EntityExtractor, QueryEntities};
pub use intent::QueryIntent;
pub use profile::InMemoryProfileStore;
