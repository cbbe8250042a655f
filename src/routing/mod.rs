//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Rule compilation (every load):
//!     six-field record
//!     → rule.rs (trim, classify, compile pattern)
//!     → ruleset.rs (group by host, sort by weight, freeze)
//!     → store.rs (atomic publish)
//!
//! Incoming Request (host, path)
//!     → router.rs (host lookup in the live snapshot)
//!     → matcher.rs (exact or pattern match, target rewrite)
//!     → Return: Redirect or NotFound
//! ```
//!
//! # Design Decisions
//! - Rule sets are immutable; reloads swap the whole set
//! - Patterns use a linear-time regex engine
//! - Deterministic: same input always resolves to the same rule
//! - First match wins (ordered by weight)

pub mod matcher;
pub mod router;
pub mod rule;
pub mod ruleset;
pub mod store;

pub use matcher::PathMatch;
pub use router::{NotFound, Redirect, RedirectRequest, Redirector, Resolution};
pub use rule::Rule;
pub use ruleset::{RuleBatch, RuleSet, RuleSetSummary};
pub use store::RuleStore;
