//! Integration tests for the control/audio split.
//!
//! Verifies that the renderer picks up published coefficients and reset
//! requests at block boundaries, that unchanged parameters publish nothing,
//! and that the pair works across real threads.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use vonic_core::{
    ChainPosition, Channel, ChannelProcessor, CoefficientSet, ParameterSnapshot, Slope, design,
};
use vonic_engine::{EngineError, EqParam, Equalizer, ParameterStore};

const SAMPLE_RATE: f64 = 48000.0;
const BLOCK: usize = 128;

fn impulse() -> [f32; BLOCK] {
    let mut buf = [0.0_f32; BLOCK];
    buf[0] = 1.0;
    buf
}

#[test]
fn published_coefficients_apply_at_next_block() {
    let params = ParameterStore::new();
    let mut eq = Equalizer::new(params.clone());
    eq.prepare(SAMPLE_RATE, BLOCK).unwrap();
    let (mut ctl, mut render) = eq.into_realtime(16);

    let initial = *render.processor().coefficients();

    params.set(EqParam::LowCutFrequency, 120.0);
    params.set(EqParam::LowCutSlope, 3.0);
    assert!(ctl.update_filters().unwrap());

    // Nothing changes until the renderer runs a block
    assert_eq!(*render.processor().coefficients(), initial);

    let mut l = [0.0_f32; BLOCK];
    let mut r = [0.0_f32; BLOCK];
    render.process(&mut l, &mut r).unwrap();

    let expected = design(&params.snapshot(), SAMPLE_RATE).unwrap();
    assert_eq!(*render.processor().coefficients(), expected);
    assert_eq!(
        render
            .processor()
            .chain(Channel::Left)
            .low_cut()
            .active_sections(),
        Slope::Db48.sections()
    );
}

#[test]
fn unchanged_parameters_publish_nothing() {
    let params = ParameterStore::new();
    let mut eq = Equalizer::new(params.clone());
    eq.prepare(SAMPLE_RATE, BLOCK).unwrap();
    let (mut ctl, _render) = eq.into_realtime(16);

    assert!(!ctl.update_filters().unwrap());
    params.set(EqParam::PeakGain, -6.0);
    assert!(ctl.update_filters().unwrap());
    assert!(!ctl.update_filters().unwrap());
    assert_eq!(ctl.pending(), 1);
}

#[test]
fn reset_request_matches_fresh_processor() {
    let snapshot = ParameterSnapshot {
        peak_frequency_hz: 1000.0,
        peak_gain_db: 6.0,
        low_cut_frequency_hz: 80.0,
        high_cut_frequency_hz: 12000.0,
        ..Default::default()
    };
    let params = ParameterStore::from_snapshot(&snapshot);
    let mut eq = Equalizer::new(params);
    eq.prepare(SAMPLE_RATE, BLOCK).unwrap();
    let (mut ctl, mut render) = eq.into_realtime(16);

    let mut l = [0.5_f32; BLOCK];
    let mut r = [-0.5_f32; BLOCK];
    render.process(&mut l, &mut r).unwrap();

    ctl.reset().unwrap();
    let mut l = impulse();
    let mut r = impulse();
    render.process(&mut l, &mut r).unwrap();

    let mut fresh = ChannelProcessor::new();
    fresh.prepare(SAMPLE_RATE, BLOCK).unwrap();
    fresh.update_from_parameters(&snapshot).unwrap();
    let mut fl = impulse();
    let mut fr = impulse();
    fresh.process(&mut fl, &mut fr).unwrap();

    assert_eq!(l, fl);
    assert_eq!(r, fr);
}

#[test]
fn controller_prepare_changes_rate() {
    let params = ParameterStore::new();
    params.set(EqParam::HighCutFrequency, 10000.0);
    let mut eq = Equalizer::new(params.clone());
    eq.prepare(SAMPLE_RATE, BLOCK).unwrap();
    let (mut ctl, mut render) = eq.into_realtime(16);

    ctl.prepare(22050.0, 64).unwrap();
    assert_eq!(ctl.sample_rate(), Some(22050.0));

    let mut l = [0.0_f32; 64];
    let mut r = [0.0_f32; 64];
    render.process(&mut l, &mut r).unwrap();
    assert_eq!(render.processor().sample_rate(), Some(22050.0));
    assert_eq!(render.processor().max_block_size(), Some(64));
    assert_eq!(
        *render.processor().coefficients(),
        design(&params.snapshot(), 22050.0).unwrap()
    );

    // The old block size no longer fits
    let mut l = [0.0_f32; BLOCK];
    let mut r = [0.0_f32; BLOCK];
    assert!(render.process(&mut l, &mut r).is_err());
}

#[test]
fn invalid_prepare_sends_nothing() {
    let mut eq = Equalizer::new(ParameterStore::new());
    eq.prepare(SAMPLE_RATE, BLOCK).unwrap();
    let (mut ctl, _render) = eq.into_realtime(16);

    // Default high cut (20 kHz) is above Nyquist at 32 kHz
    let err = ctl.prepare(32000.0, BLOCK).unwrap_err();
    assert!(err.is_invalid_parameter());
    assert_eq!(ctl.pending(), 0);
    assert_eq!(ctl.sample_rate(), Some(SAMPLE_RATE));
}

#[test]
fn stalled_renderer_reports_queue_full() {
    let params = ParameterStore::new();
    let mut eq = Equalizer::new(params.clone());
    eq.prepare(SAMPLE_RATE, BLOCK).unwrap();
    let (mut ctl, _render) = eq.into_realtime(2);

    params.set(EqParam::PeakGain, 1.0);
    ctl.update_filters().unwrap();
    params.set(EqParam::PeakGain, 2.0);
    ctl.update_filters().unwrap();
    params.set(EqParam::PeakGain, 3.0);
    assert!(matches!(
        ctl.update_filters(),
        Err(EngineError::QueueFull { capacity: 2 })
    ));
}

#[test]
fn published_set_is_applied_verbatim() {
    let mut eq = Equalizer::new(ParameterStore::new());
    eq.prepare(SAMPLE_RATE, BLOCK).unwrap();
    let (mut ctl, mut render) = eq.into_realtime(4);

    let custom = ParameterSnapshot {
        peak_frequency_hz: 2500.0,
        peak_gain_db: -4.0,
        high_cut_slope: Slope::Db36,
        ..Default::default()
    };
    let set = design(&custom, SAMPLE_RATE).unwrap();
    ctl.publish(set).unwrap();
    assert_eq!(ctl.pending(), 1);

    let mut l = [0.0_f32; BLOCK];
    let mut r = [0.0_f32; BLOCK];
    render.process(&mut l, &mut r).unwrap();
    assert_eq!(*render.processor().coefficients(), set);
    assert_eq!(
        render.processor().chain(Channel::Right).high_cut().active_sections(),
        3
    );

    // Passthrough set turns the chain flat
    ctl.publish(CoefficientSet::passthrough()).unwrap();
    let mut l = impulse();
    let mut r = impulse();
    render.process(&mut l, &mut r).unwrap();
    assert_eq!(l, impulse());
    assert_eq!(r, impulse());
}

#[test]
fn band_bypass_survives_published_coefficients() {
    let params = ParameterStore::new();
    let mut eq = Equalizer::new(params.clone());
    eq.prepare(SAMPLE_RATE, BLOCK).unwrap();
    let (mut ctl, mut render) = eq.into_realtime(8);

    let (left, right) = render.processor_mut().chains_mut();
    for chain in [left, right] {
        chain.set_all_bypassed(true);
    }

    params.set(EqParam::LowCutFrequency, 400.0);
    params.set(EqParam::LowCutSlope, 2.0);
    params.set(EqParam::HighCutFrequency, 3000.0);
    params.set(EqParam::PeakGain, 9.0);
    assert!(ctl.update_filters().unwrap());

    let mut l = impulse();
    let mut r = impulse();
    render.process(&mut l, &mut r).unwrap();

    let chain = render.processor().chain(Channel::Left);
    assert_eq!(chain.low_cut().active_sections(), 0);
    assert_eq!(chain.high_cut().active_sections(), 0);
    assert!(chain.peak().is_bypassed());
    assert_eq!(l, impulse());
    assert_eq!(r, impulse());
}

#[test]
fn equalizer_keeps_band_bypass_across_updates() {
    let params = ParameterStore::new();
    let mut eq = Equalizer::new(params.clone());
    eq.prepare(SAMPLE_RATE, BLOCK).unwrap();
    eq.processor_mut()
        .chain_mut(Channel::Left)
        .set_band_bypassed(ChainPosition::LowCut, true);

    params.set(EqParam::LowCutFrequency, 250.0);
    params.set(EqParam::LowCutSlope, 3.0);
    let mut l = [0.0_f32; BLOCK];
    let mut r = [0.0_f32; BLOCK];
    eq.process(&mut l, &mut r).unwrap();

    let left = eq.processor().chain(Channel::Left);
    let right = eq.processor().chain(Channel::Right);
    assert_eq!(left.low_cut().active_sections(), 0);
    assert_eq!(right.low_cut().active_sections(), Slope::Db48.sections());
}

#[test]
fn control_and_audio_threads() {
    let params = ParameterStore::new();
    let mut eq = Equalizer::new(params.clone());
    eq.prepare(SAMPLE_RATE, BLOCK).unwrap();
    let (mut ctl, mut render) = eq.into_realtime(64);
    let done = AtomicBool::new(false);

    thread::scope(|s| {
        s.spawn(|| {
            for step in 0..200 {
                params.set(EqParam::PeakGain, (step % 48) as f32 - 24.0);
                params.set(EqParam::PeakFrequency, 100.0 + step as f32 * 50.0);
                // A full ring just means the renderer is behind; retry next step
                match ctl.update_filters() {
                    Ok(_) | Err(EngineError::QueueFull { .. }) => {}
                    Err(err) => panic!("unexpected: {err}"),
                }
            }
            done.store(true, Ordering::Release);
        });

        s.spawn(|| {
            let mut l = [0.0_f32; BLOCK];
            let mut r = [0.0_f32; BLOCK];
            while !done.load(Ordering::Acquire) {
                for (i, (a, b)) in l.iter_mut().zip(r.iter_mut()).enumerate() {
                    *a = (i as f32 * 0.1).sin();
                    *b = *a;
                }
                render.process(&mut l, &mut r).unwrap();
                assert!(l.iter().chain(r.iter()).all(|x| x.is_finite()));
            }
            render.apply_pending();
        });
    });
}
