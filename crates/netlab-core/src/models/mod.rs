//! Data models exchanged with the demo endpoint and front-ends.

mod post;
mod timed_fetch;

pub use post::*;
pub use timed_fetch::*;
