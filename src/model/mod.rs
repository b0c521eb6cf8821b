//! Domain model types (pure).

pub mod error;
pub mod key_action;
pub mod record;

pub use error::{AppError, InputError, ParseError};
pub use key_action::KeyAction;
pub use record::{MalformedRecord, ParsedRecord, Record, RecordField};
