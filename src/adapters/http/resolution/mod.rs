//! HTTP adapter for archetype and prophecy resolution endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ApiError, ArchetypeResponse, ErrorResponse, ProphecyResponse, ResolveArchetypeRequest,
    ResolveProphecyRequest,
};
pub use routes::resolution_routes;
