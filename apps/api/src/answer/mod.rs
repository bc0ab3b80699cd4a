// Answer capture, AI scoring and feedback reports.

pub mod feedback;
pub mod handlers;
pub mod prompts;
pub mod recording;
pub mod report;
pub mod service;
pub mod transcript;
