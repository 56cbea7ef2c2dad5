use chrono::{DateTime, Local};
use uuid::Uuid;

use crate::budget::CallBudget;
use crate::models::Message;

/// State for one interactive session: the call budget, which lives as long
/// as the process, and the transcript of the query in flight.
#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub started_at: DateTime<Local>,
    pub budget: CallBudget,
    transcript: Vec<Message>,
}

impl Session {
    pub fn new(max_calls: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Local::now(),
            budget: CallBudget::new(max_calls),
            transcript: Vec::new(),
        }
    }

    /// Drop the previous query's transcript and seed a fresh one with the
    /// user's query. Queries do not share context.
    pub fn begin_query(&mut self, query: &str) {
        self.transcript.clear();
        self.transcript.push(Message::User(query.to_string()));
    }

    pub fn push(&mut self, message: Message) {
        self.transcript.push(message);
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }
}
