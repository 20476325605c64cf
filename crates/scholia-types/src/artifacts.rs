use serde::{Deserialize, Serialize};

/// Confidence colour the tutor assigns to a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardColor {
    Red,
    Yellow,
    Green,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    pub concept: String,
    pub explanation: String,
    pub color: CardColor,
}

/// Flashcards generated for one topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashcardSet {
    pub topic: String,
    pub flashcards: Vec<Flashcard>,
}

/// Structured revision notes.
///
/// Field names follow the tutor service wire format and are kept as-is in
/// storage and API responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionNotesContent {
    pub title: String,
    pub introduction: String,
    pub core_concepts: Vec<String>,
    pub example_or_use_case: String,
    pub common_confusions: Vec<String>,
    pub memory_tips: String,
}
