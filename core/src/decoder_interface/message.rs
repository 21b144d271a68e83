use serde::{Deserialize, Serialize};

/// A decoded pager message as handed over by the decoder.
///
/// Fields are private so the pipeline cannot alter a message once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagerMessage {
    payload: String,
    is_valid: bool,
    hash: u64,
}

impl PagerMessage {
    pub fn new(payload: impl Into<String>, is_valid: bool, hash: u64) -> Self {
        Self {
            payload: payload.into(),
            is_valid,
            hash,
        }
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Content fingerprint computed by the decoder.
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Payload length in characters.
    pub fn payload_len(&self) -> usize {
        self.payload.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_len_counts_characters_not_bytes() {
        let message = PagerMessage::new("Zürich ÜBUNG", true, 1);
        assert_eq!(message.payload_len(), 12);
        assert!(message.payload().len() > 12);
    }

    #[test]
    fn message_deserializes_from_decoder_json() {
        let message: PagerMessage =
            serde_json::from_str(r#"{"payload":"TEST","is_valid":false,"hash":42}"#).unwrap();
        assert_eq!(message.payload(), "TEST");
        assert!(!message.is_valid());
        assert_eq!(message.hash(), 42);
    }
}
