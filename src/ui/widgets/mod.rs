//! Custom widgets

pub mod stat_bar;

pub use stat_bar::StatBar;
