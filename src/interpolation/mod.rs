//! The interpolation pipeline: align each station's readings per hour, combine
//! the stations spatially, then resample in time.

pub mod aligner;
pub mod spatial;
pub mod temporal;
