// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Application-state layer for a molecular structure viewer.
//!
//! Molstore holds the viewer's UI state (display style, color scheme,
//! selection, hover state, the loaded molecule's summary) and mediates
//! every call into an external 3D molecular-rendering engine. The engine
//! itself (structure parsing, geometry generation, rendering) is a black
//! box behind the [`engine::RenderEngine`] trait.
//!
//! # Key entry points
//!
//! - [`session::Session`] - the controller owning the engine and the store
//! - [`store::ViewerState`] - the single source of truth for viewer state
//! - [`engine::RenderEngine`] - the narrow rendering-engine capability trait
//! - [`options::ViewerOptions`] - startup configuration with TOML presets
//!
//! # Architecture
//!
//! All state lives in one [`store::ViewerState`], mutated only through
//! named transitions. The [`session::Session`] translates engine hover
//! signals and UI actions into those transitions and issues imperative
//! commands (load, clear, add representation, highlight, snapshot) back
//! to the engine. Structure loads are tokenized: each load bumps a
//! monotonic counter and only the completion matching the latest token
//! commits its molecule summary, so a superseded load can never clobber
//! a newer one.

pub mod engine;
pub mod error;
pub mod events;
pub mod options;
pub mod session;
pub mod store;
