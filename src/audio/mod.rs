pub mod midi_event;
pub mod speaker;
pub mod tone;
pub mod tone_player;
pub mod tone_sequencer;
