pub mod trace;

pub use trace::{TimingsData, TraceData};
