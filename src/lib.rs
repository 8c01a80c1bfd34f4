mod diff;
mod error;
mod event;
mod matcher;
mod mirror;
mod utils;
mod vec;

pub use diff::*;
pub use error::*;
pub use event::*;
pub use matcher::*;
pub use mirror::*;
pub use vec::*;
