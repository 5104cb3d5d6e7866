/// Decoded channel-voice MIDI message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    PitchBend { channel: u8, value: i16 },
    ProgramChange { channel: u8, program: u8 },
}

/// Controller number for "All Notes Off" (channel mode message).
pub const CC_ALL_NOTES_OFF: u8 = 123;

impl MidiEvent {
    /// Decode one message from raw bytes. Running status and SysEx are not handled.
    pub fn parse(data: &[u8]) -> Option<Self> {
        let (&status, rest) = data.split_first()?;
        let channel = status & 0x0F;

        match (status & 0xF0, rest) {
            (0x80, [key, velocity, ..]) => Some(MidiEvent::NoteOff {
                channel,
                key: key & 0x7F,
                velocity: velocity & 0x7F,
            }),
            (0x90, [key, velocity, ..]) => Some(MidiEvent::NoteOn {
                channel,
                key: key & 0x7F,
                velocity: velocity & 0x7F,
            }),
            (0xB0, [controller, value, ..]) => Some(MidiEvent::ControlChange {
                channel,
                controller: controller & 0x7F,
                value: value & 0x7F,
            }),
            (0xC0, [program, ..]) => Some(MidiEvent::ProgramChange {
                channel,
                program: program & 0x7F,
            }),
            (0xE0, [lsb, msb, ..]) => {
                let raw = ((*msb as i16 & 0x7F) << 7) | (*lsb as i16 & 0x7F);
                Some(MidiEvent::PitchBend {
                    channel,
                    value: raw - 8192,
                })
            }
            _ => None,
        }
    }

    pub fn channel(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { channel, .. }
            | MidiEvent::NoteOff { channel, .. }
            | MidiEvent::ControlChange { channel, .. }
            | MidiEvent::PitchBend { channel, .. }
            | MidiEvent::ProgramChange { channel, .. } => channel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_note_messages() {
        assert_eq!(
            MidiEvent::parse(&[0x93, 60, 100]),
            Some(MidiEvent::NoteOn {
                channel: 3,
                key: 60,
                velocity: 100
            })
        );
        assert_eq!(
            MidiEvent::parse(&[0x80, 60, 0]),
            Some(MidiEvent::NoteOff {
                channel: 0,
                key: 60,
                velocity: 0
            })
        );
    }

    #[test]
    fn pitch_bend_is_centered() {
        assert_eq!(
            MidiEvent::parse(&[0xE0, 0x00, 0x40]),
            Some(MidiEvent::PitchBend {
                channel: 0,
                value: 0
            })
        );
        assert_eq!(
            MidiEvent::parse(&[0xE1, 0x7F, 0x7F]),
            Some(MidiEvent::PitchBend {
                channel: 1,
                value: 8191
            })
        );
    }

    #[test]
    fn rejects_truncated_and_unknown() {
        assert_eq!(MidiEvent::parse(&[]), None);
        assert_eq!(MidiEvent::parse(&[0x90, 60]), None);
        assert_eq!(MidiEvent::parse(&[0xF8]), None);
    }
}
