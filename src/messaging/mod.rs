mod bus;
mod types;

pub use bus::{MessageBus, MAX_MESSAGES_PER_FRAME};
pub use types::SynthMessage;
