// Purpose - external interfaces: MIDI decoding and event conversion

pub mod converter;
pub mod midi;

pub use converter::midi_to_message;
pub use midi::MidiEvent;
