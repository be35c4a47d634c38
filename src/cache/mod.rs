//! Two-level set-associative cache hierarchy with FIFO line replacement.

mod fifo;
mod hierarchy;
mod set;
mod set_associative;

pub use fifo::SlotRing;
pub use hierarchy::{AccessOutcome, CacheHierarchy, CacheLevel, HierarchyStats};
pub use set::{CacheLine, CacheSet, Install};
pub use set_associative::{AddressParts, CacheGeometry, CacheStats, Probe, SetAssociativeCache};
