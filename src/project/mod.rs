//! Reading resolution contexts from the file system.

mod cache;
mod locator;
mod reader;

pub use cache::ParseCache;
pub use locator::{SourceLocator, StaticLocator};
pub use reader::ResolutionContextReader;
