pub mod dot;
pub mod json_compact;
pub mod unreachable;

pub use dot::DotFormatter;
pub use json_compact::JsonCompactFormatter;
pub use unreachable::UnreachableFormatter;
