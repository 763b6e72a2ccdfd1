pub mod config;
pub mod decode;
pub mod error;
pub mod fs;
pub mod funcs;
pub mod namespace;
pub mod settings;
pub mod value;

// Re-export commonly used types
pub use config::{ColorModel, ImageConfig};
pub use decode::{ConfigDecoder, Format, SniffingDecoder};
pub use error::{Error, Result};
pub use fs::{Filesystem, MemoryFs, OsFs};
pub use namespace::{CacheStats, Namespace};
pub use settings::Settings;
pub use value::Value;
