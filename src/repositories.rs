pub mod conversations;
pub mod sessions;
pub mod upi;
