//! 功能元件模組

pub mod grid_overview;

pub use grid_overview::GridOverviewGenerator;
