use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

/// Input the reader loop reacts to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReaderEvent {
    Key(KeyEvent),
    Resize { width: u16, height: u16 },
    /// The wait ran out with no input. Due steps should run now.
    Wake,
}

/// Somewhere reader input comes from.
pub trait ReaderEventSource {
    /// Wait up to `timeout` for input. `Ok(None)` when nothing arrived or
    /// the input is not something the reader handles.
    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<ReaderEvent>>;
}

/// Reads the terminal directly with crossterm's `poll`/`read`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermEventSource;

impl ReaderEventSource for CrosstermEventSource {
    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<ReaderEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        Ok(match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => Some(ReaderEvent::Key(key)),
            Event::Resize(width, height) => Some(ReaderEvent::Resize { width, height }),
            _ => None,
        })
    }
}

/// Replays a fixed list of events and never blocks. Once the list is
/// drained every wait comes back empty.
#[derive(Debug, Default)]
pub struct ScriptedEvents {
    queue: VecDeque<ReaderEvent>,
    waits: Vec<Duration>,
}

impl ScriptedEvents {
    pub fn new(events: impl IntoIterator<Item = ReaderEvent>) -> Self {
        Self {
            queue: events.into_iter().collect(),
            waits: Vec::new(),
        }
    }

    pub fn push(&mut self, event: ReaderEvent) {
        self.queue.push_back(event);
    }

    /// Timeouts requested so far, oldest first.
    pub fn waits(&self) -> &[Duration] {
        &self.waits
    }
}

impl ReaderEventSource for ScriptedEvents {
    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<ReaderEvent>> {
        self.waits.push(timeout);
        Ok(self.queue.pop_front())
    }
}

/// Waits for input, but never past the next scheduled word.
pub struct EventLoop<E: ReaderEventSource> {
    source: E,
    idle_wait: Duration,
}

impl<E: ReaderEventSource> EventLoop<E> {
    /// `idle_wait` bounds how long a wait lasts when nothing is scheduled.
    pub fn new(source: E, idle_wait: Duration) -> Self {
        Self { source, idle_wait }
    }

    /// Next input, or [`ReaderEvent::Wake`] once `next_step` (or the idle
    /// bound, whichever is sooner) has passed.
    pub fn wait(&mut self, next_step: Option<Duration>) -> io::Result<ReaderEvent> {
        let timeout = next_step.map_or(self.idle_wait, |due| due.min(self.idle_wait));
        Ok(self
            .source
            .poll_event(timeout)?
            .unwrap_or(ReaderEvent::Wake))
    }

    pub fn source(&self) -> &E {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut E {
        &mut self.source
    }
}
