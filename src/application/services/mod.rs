//! Business logic services for the application layer.

pub mod code_generator;
pub mod rate_limiter;
pub mod shorten_service;

pub use code_generator::{CodeGenerator, CodeOrigin, GeneratedCode};
pub use rate_limiter::{Admission, FixedWindowLimiter};
pub use shorten_service::ShortenService;
