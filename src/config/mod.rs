// Configuration module - responsive sizing vocabulary for the dashboard grid

pub mod sizes;

pub use sizes::{Breakpoint, WidgetSize};
