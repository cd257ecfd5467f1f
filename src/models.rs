pub mod chat;
pub mod content;
pub mod donations;
pub mod impact;
pub mod payments;
pub mod recommendation;
