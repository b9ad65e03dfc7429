//! Capability system: operation descriptors, groups and the directory
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌─────────────────┐     ┌────────────────────┐
//! │    Directory     │────▶│ CapabilityGroup │────▶│ RemoteCollaborator │
//! │ (name → group)   │     │ validate + route│     │  (Greenfield API)  │
//! └──────────────────┘     └─────────────────┘     └────────────────────┘
//! ```
//!
//! Each operation is registered as a descriptor paired with a handler, either
//! a declarative [`Route`] or a custom closure. The directory is built once at
//! startup and never changes afterwards.

mod definition;
mod directory;
mod group;
mod route;

pub use definition::*;
pub use directory::CapabilityDirectory;
pub use group::{Arguments, CapabilityGroup, CustomHandler, GroupBuilder, Invocation};
pub use route::{Prepare, Route};
pub(crate) use route::scalar_text;
