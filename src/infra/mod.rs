pub mod github;
pub mod openai;
pub mod smtp;
