use std::sync::{Arc, Mutex};

use log::debug;
use pocsag_core::decoder_interface::{BaudRate, DecoderControl, FilterDepths};
use pocsag_core::PagerMessage;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::generator::template::{dispatch_page, payload_hash, INCIDENTS, STREETS, UNITS};

const NOISE: [char; 6] = ['~', '#', '\u{7f}', '?', '@', '^'];
const FRAGMENTS: [&str; 3] = ["", "TEST PAGE", "#000000 ENGINE 7 RESPOND"];
const RECENT_LIMIT: usize = 8;

/// Shape of the synthetic decoder output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficConfig {
    pub messages: usize,
    pub seed: u64,
    /// Share of messages that repeat a recent one byte for byte.
    pub repeat_ratio: f64,
    /// Share of messages that repeat a recent one with noise at either end.
    pub noisy_repeat_ratio: f64,
    /// Share of decodes flagged invalid before filter depth is applied.
    pub invalid_ratio: f64,
    /// Share of truncated or empty payloads.
    pub fragment_ratio: f64,
    pub interval_ms: u64,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            messages: 40,
            seed: 0,
            repeat_ratio: 0.15,
            noisy_repeat_ratio: 0.1,
            invalid_ratio: 0.1,
            fragment_ratio: 0.1,
            interval_ms: 0,
        }
    }
}

/// Filter depths shared between the configuration surface and the decoder thread.
#[derive(Debug, Clone, Default)]
pub struct DepthControl {
    depths: Arc<Mutex<FilterDepths>>,
}

impl DepthControl {
    pub fn current(&self) -> FilterDepths {
        self.depths.lock().map(|depths| *depths).unwrap_or_default()
    }
}

impl DecoderControl for DepthControl {
    fn set_filter_depth(&mut self, rate: BaudRate, depth: i32) {
        debug!("decoder filter depth {} baud -> {}", rate.bits_per_second(), depth);
        if let Ok(mut depths) = self.depths.lock() {
            depths.set(rate, depth);
        }
    }
}

/// Seeded stand-in for the POCSAG decoder.
pub struct TrafficGenerator {
    config: TrafficConfig,
    decoder: DepthControl,
    rng: StdRng,
    serial: u32,
    recent: Vec<String>,
}

impl TrafficGenerator {
    pub fn new(config: TrafficConfig, decoder: DepthControl) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            decoder,
            rng,
            serial: 0,
            recent: Vec::with_capacity(RECENT_LIMIT),
        }
    }

    pub fn next_message(&mut self) -> PagerMessage {
        let payload = self.next_payload();
        let invalid_ratio = self.effective_invalid_ratio();
        let is_valid = !self.rng.gen_bool(invalid_ratio);
        PagerMessage::new(payload.clone(), is_valid, payload_hash(&payload))
    }

    fn next_payload(&mut self) -> String {
        let roll: f64 = self.rng.gen();
        let config = &self.config;
        let repeat_cut = config.repeat_ratio;
        let noisy_cut = repeat_cut + config.noisy_repeat_ratio;
        let fragment_cut = noisy_cut + config.fragment_ratio;

        if roll < repeat_cut {
            if let Some(previous) = self.recent.choose(&mut self.rng) {
                return previous.clone();
            }
        } else if roll < noisy_cut {
            if let Some(previous) = self.recent.choose(&mut self.rng).cloned() {
                return self.add_noise(&previous);
            }
        } else if roll < fragment_cut {
            if let Some(fragment) = FRAGMENTS.choose(&mut self.rng) {
                return (*fragment).to_string();
            }
        }

        let page = self.fresh_page();
        if self.recent.len() == RECENT_LIMIT {
            self.recent.remove(0);
        }
        self.recent.push(page.clone());
        page
    }

    fn fresh_page(&mut self) -> String {
        self.serial += 1;
        let unit = UNITS.choose(&mut self.rng).copied().unwrap_or("ENGINE 1");
        let incident = INCIDENTS.choose(&mut self.rng).copied().unwrap_or("ALARM");
        let street = STREETS.choose(&mut self.rng).copied().unwrap_or("MAIN ST");
        let number = self.rng.gen_range(1..=999);
        dispatch_page(self.serial, unit, incident, number, street)
    }

    fn add_noise(&mut self, payload: &str) -> String {
        let noise: String = (0..self.rng.gen_range(1..=3))
            .filter_map(|_| NOISE.choose(&mut self.rng).copied())
            .collect();
        if self.rng.gen_bool(0.5) {
            format!("{noise}{payload}")
        } else {
            format!("{payload}{noise}")
        }
    }

    /// Deeper filtering on a rate means fewer corrupt decodes get through.
    fn effective_invalid_ratio(&mut self) -> f64 {
        let rate = BaudRate::ALL
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(BaudRate::Pocsag1200);
        let depth = self.decoder.current().depth_for(rate).max(0) as f64;
        (self.config.invalid_ratio / (1.0 + depth)).clamp(0.0, 1.0)
    }
}

impl Iterator for TrafficGenerator {
    type Item = PagerMessage;

    fn next(&mut self) -> Option<PagerMessage> {
        Some(self.next_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pocsag_core::decoder_interface::forward_filter_depths;
    use pocsag_core::intake::duplicate::fuzzy_key;

    fn quiet() -> TrafficConfig {
        TrafficConfig {
            repeat_ratio: 0.0,
            noisy_repeat_ratio: 0.0,
            invalid_ratio: 0.0,
            fragment_ratio: 0.0,
            ..TrafficConfig::default()
        }
    }

    #[test]
    fn same_seed_yields_same_traffic() {
        let config = TrafficConfig {
            seed: 42,
            ..TrafficConfig::default()
        };
        let first: Vec<_> = TrafficGenerator::new(config.clone(), DepthControl::default())
            .take(25)
            .collect();
        let second: Vec<_> = TrafficGenerator::new(config, DepthControl::default())
            .take(25)
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn clean_traffic_is_valid_and_long_enough() {
        for message in TrafficGenerator::new(quiet(), DepthControl::default()).take(50) {
            assert!(message.is_valid());
            assert!(message.payload_len() >= 50);
            assert_eq!(message.hash(), payload_hash(message.payload()));
        }
    }

    #[test]
    fn fragments_fall_below_length_floor() {
        let config = TrafficConfig {
            fragment_ratio: 1.0,
            ..quiet()
        };
        for message in TrafficGenerator::new(config, DepthControl::default()).take(10) {
            assert!(message.payload_len() < 50);
        }
    }

    #[test]
    fn noisy_repeats_keep_the_original_interior() {
        let config = TrafficConfig {
            noisy_repeat_ratio: 1.0,
            seed: 3,
            ..quiet()
        };
        let messages: Vec<_> = TrafficGenerator::new(config, DepthControl::default())
            .take(6)
            .collect();
        let original = messages[0].payload();

        for repeat in &messages[1..] {
            assert_ne!(repeat.payload(), original);
            assert_ne!(repeat.hash(), messages[0].hash());
            assert!(repeat.payload().contains(original));
            let key = fuzzy_key(repeat.payload()).unwrap();
            assert!(original.contains(key));
        }
    }

    #[test]
    fn filter_depth_suppresses_invalid_decodes() {
        let config = TrafficConfig {
            invalid_ratio: 1.0,
            ..quiet()
        };
        let undamped: Vec<_> = TrafficGenerator::new(config.clone(), DepthControl::default())
            .take(20)
            .collect();
        assert!(undamped.iter().all(|message| !message.is_valid()));

        let mut decoder = DepthControl::default();
        forward_filter_depths(
            &FilterDepths {
                pocsag512: 9,
                pocsag1200: 9,
                pocsag2400: 9,
            },
            &mut decoder,
        );
        let damped: Vec<_> = TrafficGenerator::new(config, decoder).take(200).collect();
        assert!(damped.iter().any(|message| message.is_valid()));
    }
}
