use kluster_dsp::{
    dsp::oscillator::Waveform,
    io::{midi_to_message, MidiEvent},
    synth::message::Slot,
    EngineConfig, SynthEngine,
};

const SAMPLE_RATE: f32 = 48_000.0;

fn engine() -> (SynthEngine, kluster_dsp::EngineHandle) {
    SynthEngine::new(EngineConfig::default().with_sample_rate(SAMPLE_RATE))
}

#[test]
fn factory_patch_plays_and_stays_bounded() {
    let (mut engine, mut handle) = engine();
    let mut block = vec![0.0f32; 512];

    engine.render(&mut block);
    assert!(block.iter().all(|&s| s == 0.0));

    handle.note_on(60, 127).expect("queue has room");
    let mut peak = 0.0f32;
    for _ in 0..40 {
        engine.render(&mut block);
        assert!(block.iter().all(|s| s.is_finite() && s.abs() <= 1.0));
        peak = block.iter().fold(peak, |p, s| p.max(s.abs()));
    }
    assert!(peak > 0.05, "peak {peak}");
}

#[test]
fn toggling_a_route_within_one_block_changes_nothing() {
    let (mut plain, mut plain_handle) = engine();
    let (mut toggled, mut toggled_handle) = engine();
    plain_handle.note_on(57, 100).expect("queue has room");
    toggled_handle.note_on(57, 100).expect("queue has room");

    let mut a = vec![0.0f32; 256];
    let mut b = vec![0.0f32; 256];
    plain.render(&mut a);
    toggled.render(&mut b);

    toggled_handle.toggle_route("filter1ToDelay1").expect("queue has room");
    toggled_handle.toggle_route("filter1ToDelay1").expect("queue has room");

    for _ in 0..8 {
        plain.render(&mut a);
        toggled.render(&mut b);
        assert_eq!(a, b);
    }
}

#[test]
fn disconnected_lane_goes_silent() {
    let (mut engine, mut handle) = engine();
    handle.set_route("osc1ToFilter1", false).expect("known route");
    handle.set_route("osc2ToFilter2", false).expect("known route");
    handle.note_on(60, 127).expect("queue has room");

    let mut block = vec![0.0f32; 1_024];
    engine.render(&mut block);
    assert!(block.iter().all(|&s| s == 0.0));
}

#[test]
fn noise_lanes_are_reproducible_with_a_seed() {
    let config = EngineConfig::default()
        .with_sample_rate(SAMPLE_RATE)
        .with_noise_seed(42);
    let (mut first, mut first_handle) = SynthEngine::new(config);
    let (mut second, mut second_handle) = SynthEngine::new(config);

    for handle in [&mut first_handle, &mut second_handle] {
        handle.set_waveform(Slot::One, Waveform::Noise).expect("queue has room");
        handle.note_on(48, 90).expect("queue has room");
    }

    let mut a = vec![0.0f32; 512];
    let mut b = vec![0.0f32; 512];
    first.render(&mut a);
    second.render(&mut b);
    assert_eq!(a, b);
    assert!(a.iter().any(|&s| s != 0.0));
}

#[test]
fn midi_bytes_drive_the_engine() {
    let (mut engine, mut handle) = engine();
    let mut block = vec![0.0f32; 256];

    for bytes in [[0x90u8, 64, 100], [0x91, 67, 100]] {
        let event = MidiEvent::parse(&bytes).expect("valid note on");
        if let Some(msg) = midi_to_message(event, Some(0)) {
            handle.send_message(msg).expect("queue has room");
        }
    }
    engine.render(&mut block);
    assert!(engine.oscillator(Slot::One).is_playing());
    assert!(engine.oscillator(Slot::One).active_notes().contains(64));
    assert!(!engine.oscillator(Slot::One).active_notes().contains(67));

    // Velocity zero releases
    let event = MidiEvent::parse(&[0x90, 64, 0]).expect("valid note on");
    let msg = midi_to_message(event, None).expect("note message");
    handle.send_message(msg).expect("queue has room");
    engine.render(&mut block);
    assert!(!engine.oscillator(Slot::One).is_playing());
}
