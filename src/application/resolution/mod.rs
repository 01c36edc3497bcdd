//! Resolution orchestrators.
//!
//! - `ArchetypeResolver` - remote classification with one retry and a local
//!   fallback, guarded by a single-flight latch
//! - `ProphecyResolver` - same shape for the narrative keyed by category
//! - `SessionRegistry` - owns one pair of resolvers per onboarding session

mod archetype_resolver;
mod prophecy_resolver;
mod retry;
mod session;
mod settings;
mod single_flight;

pub use archetype_resolver::ArchetypeResolver;
pub use prophecy_resolver::ProphecyResolver;
pub use retry::RetryPolicy;
pub use session::{ResolutionSession, SessionRegistry};
pub use settings::ResolutionSettings;
pub use single_flight::SingleFlightGuard;
