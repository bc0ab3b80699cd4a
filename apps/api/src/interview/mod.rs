// Interview configurations and their generated question sets.

pub mod events;
pub mod form;
pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod service;
