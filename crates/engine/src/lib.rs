//! Event-sequence assertion engine
//!
//! This crate drives a path store through a test session:
//! - EventRecorder: append-only log of triggered writes
//! - TypeAssertionCollector: trail of successful type-level assertions
//! - Assertion checks: value, category, shape, array and fire-count
//! - EventTest: the chainable session facade
//! - TypeSignature: trail folded into a TypeScript-style interface
//!
//! The engine only talks to state through the `PathStore` trait.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assertions;
pub mod collector;
pub mod recorder;
pub mod session;
pub mod signature;

pub use collector::TypeAssertionCollector;
pub use recorder::EventRecorder;
pub use session::EventTest;
pub use signature::{SignatureNode, TypeSignature};
