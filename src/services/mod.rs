pub mod generation;
pub mod history;
pub mod mail;

pub use generation::GenerationService;
pub use history::HistoryService;
pub use mail::MailService;
