//! Askama templates for the board page.

use askama::Template;

/// One station as the board page renders it.
pub struct StationView {
    pub name: String,
    pub major: bool,
    pub selectable: bool,
}

/// The board page.
#[derive(Template)]
#[template(path = "index.html")]
pub struct BoardTemplate {
    /// All stations, in line order.
    pub stations: Vec<StationView>,
    /// The end-of-line station.
    pub convergence: String,
    /// Pre-selected station from the previous session, or empty.
    pub last_selected: String,
}
