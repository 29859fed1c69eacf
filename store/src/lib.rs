//! # Message store
//!
//! Data model and storage seam for chat messages. The embedding pipeline
//! consumes this crate through the [`MessageStore`] trait; [`MemoryStore`]
//! is the built-in backend for tests and embedded deployments.

pub mod error;
pub mod memory;
pub mod message;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use message::{Message, MessageAttachment, NewMessage, PendingMessage};
pub use store::MessageStore;
