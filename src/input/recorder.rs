//! Recording and replaying input.
//!
//! An [`EventRecorder`] timestamps the events an application drains each frame. The resulting
//! [`Recording`] is stored with `bincode` and can later be fed back through an
//! [`EventReplayer`], which injects each event into an [`InputContext`] once its offset has
//! passed.

use crate::error::Result;
use crate::input::context::InputContext;
use crate::input::Event;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::time::Instant;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedEvent {
    pub event: Event,
    /// The offset in ns from the start of the recording
    pub ns_offset: u128,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recording {
    pub events: Vec<RecordedEvent>,
    pub initial_display_size: (usize, usize),
    /// Length of the recording. Set when the recording is finished.
    pub duration_ns_offset: u128,
}

impl Recording {
    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = BufReader::new(File::open(path)?);
        Ok(bincode::deserialize_from(file)?)
    }

    /// Writes the recording, creating missing parent directories.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = BufWriter::new(File::create(path)?);
        bincode::serialize_into(file, self)?;
        log::info!("saved {} events to {}", self.events.len(), path.display());
        Ok(())
    }
}

/// Collects events with their offset from the start of the recording.
#[derive(Debug)]
pub struct EventRecorder {
    recording: Recording,
    start: Instant,
}

impl EventRecorder {
    /// Starts recording now.
    pub fn start(display_size: (usize, usize)) -> Self {
        Self {
            recording: Recording {
                initial_display_size: display_size,
                ..Recording::default()
            },
            start: Instant::now(),
        }
    }

    pub fn record(&mut self, event: Event) {
        let ns_offset = self.start.elapsed().as_nanos();
        self.recording.events.push(RecordedEvent { event, ns_offset });
    }

    /// Records every event of a frame, e.g. the result of
    /// [`Display::events`](crate::rendering::display::Display::events).
    pub fn record_all<'a>(&mut self, events: impl IntoIterator<Item = &'a Event>) {
        for event in events {
            self.record(event.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.recording.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recording.events.is_empty()
    }

    /// Stops recording and returns the result.
    pub fn finish(mut self) -> Recording {
        self.recording.duration_ns_offset = self.start.elapsed().as_nanos();
        self.recording
    }
}

/// Plays a [`Recording`] back in real time.
#[derive(Debug)]
pub struct EventReplayer {
    recording: Recording,
    start: Instant,
    /// The amount of events in `recording` that have been replayed and can be skipped.
    finished_events: usize,
}

impl EventReplayer {
    /// Starts replaying now.
    pub fn new(recording: Recording) -> Self {
        Self::starting_at(recording, Instant::now())
    }

    pub fn starting_at(recording: Recording, start: Instant) -> Self {
        Self {
            recording,
            start,
            finished_events: 0,
        }
    }

    /// Injects every event due at `now` that has not been injected yet. Returns how many.
    pub fn replay_until(&mut self, now: Instant, context: &InputContext) -> usize {
        let ns_offset = now.saturating_duration_since(self.start).as_nanos();
        let due = self.recording.events[self.finished_events..]
            .iter()
            .take_while(|recorded| recorded.ns_offset <= ns_offset)
            .count();
        let events = &self.recording.events[self.finished_events..self.finished_events + due];
        context.inject(events.iter().map(|recorded| recorded.event.clone()));
        self.finished_events += due;
        due
    }

    pub fn is_finished(&self) -> bool {
        self.finished_events == self.recording.events.len()
    }
}
