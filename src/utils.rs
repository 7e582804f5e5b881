pub mod fake_event_sender;
pub mod keyword_scorer;
