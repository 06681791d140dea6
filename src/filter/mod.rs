//! Filtering primitives for feature tables.

pub mod controls;

pub use controls::{
    remove_control_spots, remove_control_spots_with_stats, ControlDenylist, FilterResult,
    DEFAULT_CONTROL_SPOTS,
};
