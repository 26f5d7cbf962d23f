//! HTTP transport and concurrent logo candidate validation.
//!
//! This crate provides:
//! - [`http`]: construction of the shared, keep-alive HTTP client
//! - [`validator`]: bounded-concurrency, deadline-limited image probing
//! - [`permits`]: the instrumented permit pool used by the validator

pub mod http;
pub mod permits;
pub mod validator;

pub use http::{HttpOptions, USER_AGENT, build_http_client};
pub use permits::{PermitPool, PoolPermit};
pub use validator::{
    CandidateValidator, DEFAULT_BATCH_DEADLINE, DEFAULT_MAX_CONCURRENT, ValidatorOptions,
};
