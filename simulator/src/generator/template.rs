use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub const UNITS: [&str; 6] = [
    "ENGINE 7",
    "LADDER 12",
    "MEDIC 3",
    "RESCUE 1",
    "BRUSH 4",
    "TANKER 9",
];

pub const INCIDENTS: [&str; 6] = [
    "STRUCTURE FIRE",
    "CARDIAC ARREST",
    "MVA WITH INJURIES",
    "ALARM ACTIVATION",
    "GAS LEAK INSIDE",
    "FALL VICTIM",
];

pub const STREETS: [&str; 6] = [
    "HARBOUR RD",
    "MILL LANE",
    "STATION ST",
    "QUARRY WAY",
    "NORTH AVE",
    "CHURCH HILL",
];

/// Alphanumeric dispatch page in the fixed layout most brigades send.
pub fn dispatch_page(serial: u32, unit: &str, incident: &str, number: u16, street: &str) -> String {
    format!("#{serial:06} {unit} RESPOND {incident} AT {number} {street} - ACK VIA RADIO")
}

/// Fingerprint the decoder attaches to a payload.
pub fn payload_hash(payload: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    payload.hash(&mut hasher);
    hasher.finish()
}
