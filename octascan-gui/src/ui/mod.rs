//! UI rendering modules.
//!
//! - `control_panel`: left sidebar with buttons, status, and the table
//! - `main_view`: central panel with the image and A-scan plots

mod control_panel;
mod main_view;
