pub mod catalog; // Read-only musical data: note table, kits, presets
pub mod dsp;
pub mod engine; // Persistent master bus and voice lifecycle
pub mod events;
pub mod record;
pub mod scope;
pub mod sequencer; // Step clocks for drums and melodies
pub mod station; // The narrow facade UI collaborators talk to
pub mod voices; // Percussive synthesis recipes

pub const MAX_BLOCK_SIZE: usize = 2048;
