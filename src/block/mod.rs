//! Block and pack types.
//!
//! - [`Block`] - one fixed-size view into a pack's buffer, tagged with its
//!   destination offset in the output
//! - [`Pack`] - a batch of contiguous blocks sharing one owned read buffer

mod pack;

pub use pack::{Block, Pack};
