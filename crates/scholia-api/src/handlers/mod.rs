pub mod cascade;
pub mod input;
pub mod study;
pub mod turn;
