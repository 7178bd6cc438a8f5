pub mod document;
pub mod mime;

pub use document::DocumentSlot;
pub use mime::AcceptedMimeType;
