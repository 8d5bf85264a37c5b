//! Structural constructions that build subcircuits of arbitrary width out of
//! a single operation `f`: [`map`], [`bitwise`], and [`ripple`].

pub mod bitwise;
pub mod map;
pub mod ripple;

pub use bitwise::{combine_bitwise, fork_bundler, split_bitwise};
pub use map::make_bitwise_map;
pub use ripple::{
    make_bitwise_ripple, make_bitwise_ripple_map, make_ripple, make_ripple_map,
    ripple_bundle_positions,
};

pub use map::make_map;

/// Whether a ripple construction's accumulator sits before or after the data
/// bundle in both interfaces, and whether it is threaded low-to-high or
/// high-to-low across the `n` instances.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    TopToBottom,
    BottomToUp,
}
