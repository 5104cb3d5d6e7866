//! kluster - plays a short phrase through the default output device
//!
//! Run with: cargo run --bin kluster
//! Set RUST_LOG=kluster=debug to watch routing and preset changes.

use std::{thread, time::Duration};

use color_eyre::eyre::{eyre, Result, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use kluster_dsp::{
    dsp::{delay::TimeDivision, lfo::LfoShape, oscillator::Waveform},
    graph::envelope::EnvelopeLfo,
    synth::message::{FilterSetting, ParamTarget, Slot},
    EngineConfig, EngineHandle, SynthEngine,
};

const BPM: f32 = 112.0;

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;
    log::info!("output: {sample_rate} Hz, {channels} channels");

    let (mut engine, mut handle) =
        SynthEngine::new(EngineConfig::default().with_sample_rate(sample_rate));
    let stats = engine.stats();
    let error_stats = engine.stats();

    patch(&mut handle)?;

    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _| engine.render_interleaved(data, channels),
        move |err| {
            error_stats.record_dropout();
            log::error!("audio stream error: {err}");
        },
        None,
    )?;
    stream.play()?;

    play_phrase(&mut handle)?;
    thread::sleep(Duration::from_secs(2));

    log::info!(
        "rendered {} blocks ({} frames), {} dropouts",
        stats.blocks_rendered(),
        stats.frames_rendered(),
        stats.dropouts()
    );
    Ok(())
}

fn patch(handle: &mut EngineHandle) -> Result<()> {
    handle.set_waveform(Slot::One, Waveform::Sawtooth)?;
    handle.set_waveform(Slot::Two, Waveform::Pulse)?;
    handle.set_param(ParamTarget::Filter(Slot::One, FilterSetting::Resonance), 0.8)?;
    handle.set_filter_lfo(Slot::Two, LfoShape::Triangle)?;
    handle.set_envelope_lfo(Slot::Two, EnvelopeLfo::Sine)?;
    handle.set_delay_division(Slot::One, TimeDivision::EighthTriplet, BPM)?;
    handle.set_delay_division(Slot::Two, TimeDivision::Quarter, BPM)?;
    handle.set_route("env1ToFilter1", true)?;
    handle.set_route("env2ToFilter2", true)?;
    handle.set_route_weight("env2ToFilter2", 0.4)?;
    handle.set_master_volume(0.4)?;
    Ok(())
}

fn play_phrase(handle: &mut EngineHandle) -> Result<()> {
    let beat = Duration::from_secs_f32(60.0 / BPM);
    let phrase: [(u8, u32); 8] = [
        (48, 2),
        (55, 1),
        (60, 1),
        (63, 2),
        (62, 1),
        (58, 1),
        (55, 2),
        (48, 4),
    ];

    for (note, beats) in phrase {
        handle.note_on(note, 100)?;
        thread::sleep(beat * beats / 2);
        handle.note_off(note)?;
        thread::sleep(beat * beats / 2);
    }
    Ok(())
}
