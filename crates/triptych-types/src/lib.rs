pub mod message;
pub mod wire;

pub use message::{Attachment, Column, Message, MessageFilter, MessageId, SortOrder};
