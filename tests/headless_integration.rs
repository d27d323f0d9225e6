use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use zone_reader::{
    clock::{Clock, ManualClock},
    config::Config,
    engine::{Engine, Phase, StepOutcome},
    runtime::{EventLoop, ReaderEvent, ScriptedEvents},
    surface::CellSurface,
    tokenize,
};

fn reader(text: &str, clock: &ManualClock) -> Engine<CellSurface, ManualClock> {
    Engine::with_clock(
        tokenize(text),
        CellSurface::new(0, 60),
        clock.clone(),
        &Config::default(),
    )
}

// Headless integration using the runtime + engine without a TTY.
// Keys come from a script; every Wake advances the manual clock by 10ms,
// so word timing is deterministic.
#[test]
fn headless_reading_flow_completes() {
    let clock = ManualClock::new();
    let mut engine = reader("the quick brown fox jumps", &clock);

    let mut events = EventLoop::new(
        ScriptedEvents::new([ReaderEvent::Key(KeyEvent::new(
            KeyCode::Char(' '),
            KeyModifiers::NONE,
        ))]),
        Duration::from_millis(100),
    );

    let mut shown = Vec::new();
    for _ in 0..1_000u32 {
        match events.wait(engine.time_until_next_step()).unwrap() {
            ReaderEvent::Key(key) if key.code == KeyCode::Char(' ') => engine.play(),
            ReaderEvent::Key(_) | ReaderEvent::Resize { .. } => {}
            ReaderEvent::Wake => clock.advance(Duration::from_millis(10)),
        }
        if let StepOutcome::Rendered { instruction, .. } = engine.tick() {
            shown.push(instruction.word());
        }
        if engine.phase() == Phase::Complete {
            break;
        }
    }

    assert_eq!(shown, vec!["the", "quick", "brown", "fox", "jumps"]);
    assert_eq!(engine.progress().percent(), 100);
    // 3-letter words get 180ms, 5-letter words 200ms: 180 + 200 + 200 + 180
    assert!(clock.now() >= Duration::from_millis(760));
    // the loop never waited longer than the word on screen
    assert!(events
        .source()
        .waits()
        .iter()
        .all(|w| *w <= Duration::from_millis(200)));
}

#[test]
fn headless_pause_resume_and_rate_change() {
    let clock = ManualClock::new();
    let mut engine = reader("alpha beta gamma delta", &clock);

    engine.play();
    assert!(matches!(engine.tick(), StepOutcome::Rendered { .. }));

    engine.pause();
    clock.advance(Duration::from_secs(10));
    assert!(matches!(engine.tick(), StepOutcome::NotDue));
    assert_eq!(engine.get_state().position, 1);

    engine.set_rate(600.0).unwrap();
    engine.play();
    let outcome = engine.tick();
    match outcome {
        StepOutcome::Rendered {
            instruction,
            next_delay,
            ..
        } => {
            assert_eq!(instruction.word(), "beta");
            // "beta" is 4 chars: 100ms * 0.95
            assert_eq!(next_delay, Some(Duration::from_millis(95)));
        }
        other => panic!("expected a rendered step, got {other:?}"),
    }
}

#[test]
fn headless_empty_selection_is_complete() {
    let clock = ManualClock::new();
    let mut engine = reader(" \n ", &clock);
    assert_eq!(engine.phase(), Phase::Complete);
    engine.play();
    clock.advance(Duration::from_secs(1));
    assert!(matches!(engine.tick(), StepOutcome::NotDue));
    assert_eq!(engine.progress().percent(), 100);
}
