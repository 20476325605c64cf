pub mod artifacts;
pub mod message;
pub mod mode;

pub use artifacts::{CardColor, Flashcard, FlashcardSet, RevisionNotesContent};
pub use message::{ChatMessage, MessageRole};
pub use mode::{ChatMode, UnknownChatMode};
