pub mod answer;
pub mod interview;
pub mod user;
