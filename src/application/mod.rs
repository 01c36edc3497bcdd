//! Application layer - orchestration over domain logic and ports.
//!
//! The resolvers here own the only suspension points of the engine (the two
//! remote calls) and the per-session single-flight state.

pub mod resolution;

pub use resolution::{
    ArchetypeResolver, ProphecyResolver, ResolutionSession, ResolutionSettings, RetryPolicy,
    SessionRegistry, SingleFlightGuard,
};
