use serde::Deserialize;

#[derive(Deserialize)]
pub struct CountQuery {
	pub count: Option<u32>,
}

#[derive(Deserialize)]
pub struct EditMessageRequest {
	pub body: String,
	pub expected_version: i64,
}

#[derive(Deserialize)]
pub struct ModerationRequest {
	pub moderated: bool,
}
