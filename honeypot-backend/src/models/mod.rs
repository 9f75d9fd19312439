pub mod message;

pub use message::{MessageRequest, MessageResponse};
