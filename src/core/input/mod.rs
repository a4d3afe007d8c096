mod mapping;

pub use mapping::{KeyId, KeyboardMapping};
