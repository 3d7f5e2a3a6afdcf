//! Version resolution layer
//!
//! This module decides which version applies to a requesting module and in
//! what form to report it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Resolver   │────▶│  DistStore  │     │    Tuple    │
//! │ (identity,  │     │ (metadata)  │     │ (comparable │
//! │  fallback)  │     └─────────────┘     │    form)    │
//! └─────────────┘                         └─────────────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │RepoProvider │
//! │ (describe)  │
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`resolve`]: requester identity, override check, fallback walk
//! - [`tuple`]: descriptor-to-comparable-tuple parsing

pub mod resolve;
pub mod tuple;
