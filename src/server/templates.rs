//! HTML template for the browser UI.
//!
//! The page is embedded at compile time using `include_str!`.

/// The task board page with the chat widget.
pub const INDEX_TEMPLATE: &str = include_str!("templates/index.html");
