//! RSVP playback engine.
//!
//! The engine owns the word sequence and the playback state and is driven
//! cooperatively: callers poll [`Engine::tick`] (or deliver a ticket to
//! [`Engine::fire`]) and at most one scheduled step is ever pending. Every
//! state transition that invalidates playback bumps the step generation, so
//! a ticket issued before `pause`, `reset` or a fresh `play` can never
//! advance the new session.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::alignment::{align, DisplaySurface};
use crate::clock::{Clock, SystemClock};
use crate::config::{Config, RateLimits};
use crate::error::{EngineError, Result};
use crate::render::{layout_word, Progress, RenderInstruction};
use crate::timing::{word_delay, word_len};
use crate::tokenizer::{tokenize, WordSequence};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Idle,
    Playing,
    Paused,
    Complete,
}

/// Identifies one scheduled step: the session it belongs to and the
/// generation of playback it was scheduled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StepTicket {
    session: u64,
    generation: u64,
}

/// The single in-flight step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingStep {
    pub ticket: StepTicket,
    pub due_at: Duration,
}

/// Mutable playback state. Only engine operations write to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackState {
    pub position: usize,
    pub rate: u32,
    pub phase: Phase,
    pending: Option<PendingStep>,
    generation: u64,
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn pending(&self) -> Option<PendingStep> {
        self.pending
    }
}

/// Synchronous snapshot returned by [`Engine::get_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateSnapshot {
    pub position: usize,
    pub length: usize,
    pub rate: u32,
    pub is_playing: bool,
    pub phase: Phase,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Nothing pending, or the pending step is not due yet.
    NotDue,
    /// The ticket does not match the pending step; nothing changed.
    Stale,
    /// A word was shown. `next_delay` is `None` when it was the last word.
    Rendered {
        instruction: RenderInstruction,
        progress: Progress,
        next_delay: Option<Duration>,
    },
    /// The sequence was already exhausted; the engine is now Complete.
    Completed,
}

type RenderCallback = Box<dyn FnMut(&RenderInstruction, Progress)>;

pub struct Engine<S: DisplaySurface, C: Clock = SystemClock> {
    session: u64,
    words: WordSequence,
    state: PlaybackState,
    limits: RateLimits,
    fixation_ratio: f64,
    surface: S,
    clock: C,
    listeners: Vec<RenderCallback>,
}

/// Tokenize `source_text` and build an engine over it on the wall clock.
pub fn create_session<S: DisplaySurface>(
    source_text: &str,
    surface: S,
    config: &Config,
) -> Engine<S, SystemClock> {
    Engine::with_clock(tokenize(source_text), surface, SystemClock::new(), config)
}

impl<S: DisplaySurface, C: Clock> Engine<S, C> {
    pub fn with_clock(words: WordSequence, surface: S, clock: C, config: &Config) -> Self {
        let session = NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed);
        let config = config.clone().sanitized();
        let limits = config.rate_limits();
        let phase = if words.is_empty() {
            Phase::Complete
        } else {
            Phase::Idle
        };
        info!(session, words = words.len(), wpm = config.wpm, "created reading session");

        Self {
            session,
            state: PlaybackState {
                position: 0,
                rate: limits.clamp(config.wpm),
                phase,
                pending: None,
                generation: 0,
            },
            words,
            limits,
            fixation_ratio: config.fixation_ratio,
            surface,
            clock,
            listeners: Vec::new(),
        }
    }

    /// Idle/Paused -> Playing. The first step is due immediately.
    pub fn play(&mut self) {
        match self.state.phase {
            Phase::Playing => {}
            Phase::Complete => debug!(session = self.session, "play ignored, already complete"),
            Phase::Idle | Phase::Paused => {
                if self.words.is_empty() {
                    self.state.phase = Phase::Complete;
                    return;
                }
                self.state.phase = Phase::Playing;
                self.schedule(Duration::ZERO);
                debug!(session = self.session, position = self.state.position, "playing");
            }
        }
    }

    /// Playing -> Paused, cancelling the pending step.
    pub fn pause(&mut self) {
        if self.state.phase != Phase::Playing {
            return;
        }
        self.cancel_pending();
        self.state.phase = Phase::Paused;
        debug!(session = self.session, position = self.state.position, "paused");
    }

    /// Any state -> Idle at position 0. An empty sequence stays Complete.
    pub fn reset(&mut self) {
        self.cancel_pending();
        self.state.position = 0;
        self.state.phase = if self.words.is_empty() {
            Phase::Complete
        } else {
            Phase::Idle
        };
        debug!(session = self.session, "reset");
    }

    /// Change the reading rate. Finite positive values are rounded and
    /// clamped into the configured range; anything else is rejected and the
    /// previous rate kept. Only the next scheduled step sees the new rate.
    pub fn set_rate(&mut self, wpm: f64) -> Result<u32> {
        if !wpm.is_finite() || wpm <= 0.0 {
            warn!(session = self.session, requested = wpm, "rejected reading rate");
            return Err(EngineError::InvalidRate { requested: wpm });
        }
        let rounded = wpm.round().clamp(1.0, f64::from(u32::MAX)) as u32;
        self.state.rate = self.limits.clamp(rounded);
        debug!(session = self.session, wpm = self.state.rate, "rate changed");
        Ok(self.state.rate)
    }

    /// Register a listener notified after every rendered step.
    pub fn on_render<F>(&mut self, callback: F)
    where
        F: FnMut(&RenderInstruction, Progress) + 'static,
    {
        self.listeners.push(Box::new(callback));
    }

    /// Run the pending step if it is due.
    pub fn tick(&mut self) -> StepOutcome {
        match self.state.pending {
            Some(pending) if self.clock.now() >= pending.due_at => self.fire(pending.ticket),
            _ => StepOutcome::NotDue,
        }
    }

    /// Deliver a scheduled step. Tickets that are not the pending one, or
    /// that arrive while not playing, are dropped without side effects.
    pub fn fire(&mut self, ticket: StepTicket) -> StepOutcome {
        let current = self.state.pending.map(|p| p.ticket);
        if current != Some(ticket) || self.state.phase != Phase::Playing {
            debug!(session = self.session, ?ticket, "dropping stale step");
            return StepOutcome::Stale;
        }
        self.state.pending = None;
        self.step()
    }

    fn step(&mut self) -> StepOutcome {
        let Some(word) = self.words.get(self.state.position) else {
            self.state.phase = Phase::Complete;
            return StepOutcome::Completed;
        };
        let len = word_len(word);
        let instruction = self.render_word(self.state.position);

        self.state.position += 1;
        let progress = self.progress();
        for listener in &mut self.listeners {
            listener(&instruction, progress);
        }

        let next_delay = if self.state.position >= self.words.len() {
            self.state.phase = Phase::Complete;
            info!(session = self.session, words = self.words.len(), "reading complete");
            None
        } else {
            let delay = word_delay(len, self.state.rate);
            self.schedule(delay);
            Some(delay)
        };

        StepOutcome::Rendered {
            instruction,
            progress,
            next_delay,
        }
    }

    fn render_word(&mut self, index: usize) -> RenderInstruction {
        let characters = layout_word(self.words.get(index).unwrap_or_default());
        self.surface.mount(&characters);
        let alignment = align(&self.surface, self.fixation_ratio);
        RenderInstruction {
            word_index: index,
            characters,
            horizontal_offset: alignment.offset,
        }
    }

    /// Re-mount and re-align the most recently shown word, e.g. after the
    /// surface was resized. Does not advance or notify listeners.
    pub fn realign(&mut self) -> Option<RenderInstruction> {
        let index = self.state.position.checked_sub(1)?;
        Some(self.render_word(index))
    }

    fn schedule(&mut self, delay: Duration) {
        self.state.generation += 1;
        self.state.pending = Some(PendingStep {
            ticket: StepTicket {
                session: self.session,
                generation: self.state.generation,
            },
            due_at: self.clock.now() + delay,
        });
    }

    fn cancel_pending(&mut self) {
        self.state.generation += 1;
        self.state.pending = None;
    }

    pub fn get_state(&self) -> StateSnapshot {
        StateSnapshot {
            position: self.state.position,
            length: self.words.len(),
            rate: self.state.rate,
            is_playing: self.state.is_playing(),
            phase: self.state.phase,
        }
    }

    pub fn progress(&self) -> Progress {
        Progress::new(self.state.position, self.words.len())
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn rate(&self) -> u32 {
        self.state.rate
    }

    pub fn rate_limits(&self) -> RateLimits {
        self.limits
    }

    pub fn pending(&self) -> Option<PendingStep> {
        self.state.pending
    }

    /// Time left until the pending step is due, zero if overdue.
    pub fn time_until_next_step(&self) -> Option<Duration> {
        self.state
            .pending
            .map(|p| p.due_at.saturating_sub(self.clock.now()))
    }

    pub fn words(&self) -> &WordSequence {
        &self.words
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn session_id(&self) -> u64 {
        self.session
    }
}
