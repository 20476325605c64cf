pub mod chat;
pub mod flashcards;
pub mod folders;
pub mod health;
pub mod resources;
pub mod revision_notes;
pub mod topics;
