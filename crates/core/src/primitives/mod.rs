//! Record types produced by an event-test session
//!
//! - `EventLogEntry`: one mutation issued through `trigger`
//! - `TypeAssertion`: one successful type, shape or array-shape assertion
//!
//! Both are immutable once created and are handed out only as copies.

pub mod event;
pub mod type_assertion;

pub use event::EventLogEntry;
pub use type_assertion::TypeAssertion;
