use super::{FromPayload, Payload};

#[derive(Debug, Clone)]
pub struct NoteCreate {
    pub content: String,
}

impl FromPayload for NoteCreate {
    fn from_payload(p: &mut Payload<'_>) -> Self {
        Self {
            content: p.required_text("content"),
        }
    }
}
