pub mod aggregator;
pub mod filter;

pub use aggregator::*;
pub use filter::*;
