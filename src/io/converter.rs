use crate::{
    io::midi::{MidiEvent, CC_ALL_NOTES_OFF},
    synth::message::ControlMessage,
};

/// Map a MIDI event to an engine message.
///
/// `channel` of `None` listens on every channel. A note-on with velocity 0
/// is a note-off. Everything except notes and "All Notes Off" is ignored.
pub fn midi_to_message(midi: MidiEvent, channel: Option<u8>) -> Option<ControlMessage> {
    if channel.is_some_and(|c| c != midi.channel()) {
        return None;
    }

    match midi {
        MidiEvent::NoteOn { key, velocity: 0, .. } | MidiEvent::NoteOff { key, .. } => {
            Some(ControlMessage::NoteOff { note: key })
        }
        MidiEvent::NoteOn { key, velocity, .. } => Some(ControlMessage::NoteOn {
            note: key,
            velocity,
        }),
        MidiEvent::ControlChange {
            controller: CC_ALL_NOTES_OFF,
            ..
        } => Some(ControlMessage::AllNotesOff),
        _ => None,
    }
}
