//! Replicate aggregation within a single array.

pub mod replicates;

pub use replicates::{
    average_replicates, average_replicates_with_stats, parse_signal, ReplicateStats,
};
