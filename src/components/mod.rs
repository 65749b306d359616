//! UI components.

pub mod territory_map;
