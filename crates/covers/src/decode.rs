use crate::error::DecodeError;
use crate::model::BookCover;

/// Turns a successful response body into a [`BookCover`].
pub trait CoverDecoder: Send + Sync {
    fn decode(&self, body: &[u8]) -> Result<BookCover, DecodeError>;
}

/// Decodes the JSON documents served by the cover service.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCoverDecoder;

impl CoverDecoder for JsonCoverDecoder {
    fn decode(&self, body: &[u8]) -> Result<BookCover, DecodeError> {
        let cover: BookCover = serde_json::from_slice(body)?;
        if cover.id.is_empty() {
            return Err(DecodeError {
                message: "cover id is empty".to_string(),
                source: None,
            });
        }
        Ok(cover)
    }
}
