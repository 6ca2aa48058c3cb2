//! Shared identifiers, geometry and error types for the extension
//! compatibility runtime.

pub mod errors;
pub mod id;
pub mod types;

pub use errors::{ConfigError, CrxError, PortError, WindowError};
pub use id::{new_id, ContextId, PortId};
pub use types::{Color, Point, Rect, Size};
