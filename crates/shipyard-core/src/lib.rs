//! Document loading and deterministic JSON emission.
//!
//! This crate implements the load → emit half of Shipyard:
//!
//! - YAML input parsed into a typed [`Document`] tree
//! - Pretty JSON output with sorted keys and a fixed indentation width
//! - Distinct error kinds for IO, parse, and serialization failures
//!
//! # Quick Start
//!
//! ```no_run
//! use shipyard_core::{load, to_pretty_json, EmitOptions};
//!
//! # fn example() -> Result<(), shipyard_core::DocumentError> {
//! let document = load("spaceships.yaml")?;
//! println!("{}", to_pretty_json(&document, &EmitOptions::default())?);
//! # Ok(())
//! # }
//! ```
//!
//! # Output Shape
//!
//! | Option | Default | Effect |
//! |--------|---------|--------|
//! | `indent` | `4` | Spaces per nesting level |
//! | `ensure_ascii` | `true` | Escape non-ASCII characters as `\uXXXX` |

pub mod document;
pub mod emit;
pub mod error;
pub mod loader;

pub use document::{Document, Number};
pub use emit::{emit, to_pretty_json, EmitOptions, DEFAULT_INDENT};
pub use error::{DocumentError, DocumentResult};
pub use loader::{load, load_reader, load_str, STDIN_PATH};
