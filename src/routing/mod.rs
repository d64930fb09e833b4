//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Navigation request (path or name + params)
//!     → router.rs (turn into a Location)
//!     → table.rs (first-match lookup, not-found policy)
//!     → pattern.rs (segment match, parameter binding)
//!     → history.rs (push / replace entry)
//!     → ActiveRoute published to subscribers
//!
//! Route Compilation (at startup):
//!     RouteConfig[]
//!     → Compile patterns
//!     → Check unique names, unambiguous patterns
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex (segment matching only)
//! - Deterministic: same path always matches same route
//! - First match wins (table order)

pub mod error;
pub mod history;
pub mod location;
pub mod pattern;
pub mod router;
pub mod table;
pub mod view;

pub use error::RouteError;
pub use history::{History, HistoryEntry, MemoryHistory};
pub use location::Location;
pub use pattern::{MatchOptions, PathPattern};
pub use router::{ActiveRoute, NavigationOutcome, NavigationTarget, Router};
pub use table::{Resolution, RouteEntry, RouteMatch, RouteTable};
pub use view::{Params, View};
