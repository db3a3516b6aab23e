/// One outbound message; built fresh per pipeline run and discarded after
/// the send attempt.
#[derive(Debug, Clone)]
pub struct Email {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}
