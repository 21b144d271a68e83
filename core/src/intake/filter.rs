use crate::decoder_interface::PagerMessage;
use crate::prelude::IntakeConfig;

/// Shortest payload, in characters, that is worth keeping.
pub const MIN_PAYLOAD_LEN: usize = 50;

/// False only when bad decodes are hidden and the decoder flagged this one.
pub fn passes_validity(config: &IntakeConfig, message: &PagerMessage) -> bool {
    !config.hide_bad_decodes || message.is_valid()
}

pub fn meets_length_floor(message: &PagerMessage) -> bool {
    message.payload_len() >= MIN_PAYLOAD_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(len: usize) -> String {
        "A".repeat(len)
    }

    #[test]
    fn validity_filter_respects_setting() {
        let bad = PagerMessage::new(payload(60), false, 1);
        let mut config = IntakeConfig::default();
        assert!(!passes_validity(&config, &bad));

        config.hide_bad_decodes = false;
        assert!(passes_validity(&config, &bad));
    }

    #[test]
    fn length_floor_is_inclusive_at_fifty() {
        assert!(!meets_length_floor(&PagerMessage::new(payload(49), true, 1)));
        assert!(meets_length_floor(&PagerMessage::new(payload(50), true, 1)));
        assert!(!meets_length_floor(&PagerMessage::new("", true, 1)));
    }
}
