//! Document rendering for report cards.

/// Printable HTML report card
pub mod html;
