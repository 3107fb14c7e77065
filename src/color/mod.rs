//! Terminal color handling
//!
//! Configured colors are 24-bit hex strings; the viewer draws with the
//! 256-color palette so output looks the same on terminals without
//! truecolor support.

mod escapes;
mod mapper;

pub use escapes::{escape_ranges, overlaps_escape};
pub use mapper::{hex_escape, RESET};
