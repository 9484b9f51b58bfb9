pub mod actor;
pub mod identity;
pub mod message;

pub use actor::Actor;
pub use identity::Identity;
pub use message::Message;
