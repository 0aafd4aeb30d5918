pub mod stats;
pub mod tracks;
