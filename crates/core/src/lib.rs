//! Core library for vibeshift
//!
//! This crate implements the **Functional Core** of the vibeshift application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`vibeshift_core`** (this crate): Pure transformation functions with zero I/O
//! - **`vibeshift`**: HTTP server, HTTP client, provider calls and terminal output
//!   (the Imperative Shell)
//!
//! All functions in this crate are deterministic and free of side effects, so
//! they are tested with plain fixture data and no mocking.
//!
//! # Module Organization
//!
//! - [`types`]: Request/response values, styles, languages and response modes
//! - [`samples`]: The built-in example library
//! - [`prompt`]: Prompt construction for a transformation
//! - [`completion`]: Chat completion request bodies and response parsing
//! - [`stream`]: UTF-8-safe re-assembly of streamed bytes
//! - [`extract`]: Markdown fence stripping for batch responses
//! - [`controller`]: Client-side session state machine
//! - [`error`]: The transformation error taxonomy
//!
//! # Example Usage
//!
//! ```rust
//! use vibeshift_core::prompt::build_prompt;
//! use vibeshift_core::types::TransformRequest;
//!
//! let request = TransformRequest::new("print('hi')", "Gen Z", "Python");
//! let transform = request.validate().unwrap();
//! let prompt = build_prompt(&transform);
//!
//! assert!(prompt.user.ends_with("Original code:\nprint('hi')"));
//! ```

pub mod completion;
pub mod controller;
pub mod error;
pub mod extract;
pub mod prompt;
pub mod samples;
pub mod stream;
pub mod types;

pub use error::TransformError;
