//! Content sources, the resolver fallback chain, and the playback
//! candidate selector.

pub mod error;
pub mod lk21;
pub mod mock;
pub mod playback;
pub mod proxy;
pub mod resolver;
pub mod source;
