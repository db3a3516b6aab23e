pub mod changeset;
pub mod diff;
pub mod email;
pub mod prompt;
pub mod repo;
pub mod transcript;
pub mod window;
