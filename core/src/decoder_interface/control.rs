use serde::{Deserialize, Serialize};

/// POCSAG transmission rates the decoder listens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaudRate {
    Pocsag512,
    Pocsag1200,
    Pocsag2400,
}

impl BaudRate {
    pub const ALL: [BaudRate; 3] = [
        BaudRate::Pocsag512,
        BaudRate::Pocsag1200,
        BaudRate::Pocsag2400,
    ];

    pub fn bits_per_second(&self) -> u32 {
        match self {
            BaudRate::Pocsag512 => 512,
            BaudRate::Pocsag1200 => 1200,
            BaudRate::Pocsag2400 => 2400,
        }
    }
}

/// Per-rate filter depth knobs. Opaque to the intake pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterDepths {
    pub pocsag512: i32,
    pub pocsag1200: i32,
    pub pocsag2400: i32,
}

impl FilterDepths {
    pub fn depth_for(&self, rate: BaudRate) -> i32 {
        match rate {
            BaudRate::Pocsag512 => self.pocsag512,
            BaudRate::Pocsag1200 => self.pocsag1200,
            BaudRate::Pocsag2400 => self.pocsag2400,
        }
    }

    pub fn set(&mut self, rate: BaudRate, depth: i32) {
        match rate {
            BaudRate::Pocsag512 => self.pocsag512 = depth,
            BaudRate::Pocsag1200 => self.pocsag1200 = depth,
            BaudRate::Pocsag2400 => self.pocsag2400 = depth,
        }
    }
}

/// Settings surface of the external decoder.
pub trait DecoderControl {
    fn set_filter_depth(&mut self, rate: BaudRate, depth: i32);
}

/// Pushes every configured depth to the decoder unchanged.
pub fn forward_filter_depths(depths: &FilterDepths, decoder: &mut dyn DecoderControl) {
    for rate in BaudRate::ALL {
        decoder.set_filter_depth(rate, depths.depth_for(rate));
    }
}
