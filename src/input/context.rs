//! State shared between the input worker and the display.

use crate::input::keys::Key;
use crate::input::{Event, KeyPhase, KeyboardEvent};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Event queue, pressed-key table and pending resize behind one shared handle.
///
/// The worker appends, the display drains. Every operation takes a lock for its whole duration,
/// so appending and draining never interleave and no event is lost or returned twice.
#[derive(Debug, Default)]
pub struct InputContext {
    queue: Mutex<Vec<Event>>,
    pressed: Mutex<HashMap<Key, bool>>,
    pending_resize: Mutex<Option<(u16, u16)>>,
    closed: AtomicBool,
}

/// A poisoned lock only means another thread panicked while holding it; the data is still a
/// plain queue or table.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl InputContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `event` unless an equal event is already queued.
    ///
    /// Returns whether the event was appended.
    pub fn push(&self, event: Event) -> bool {
        let mut queue = lock(&self.queue);
        if queue.contains(&event) {
            return false;
        }
        queue.push(event);
        true
    }

    /// Removes and returns every queued event, in arrival order.
    pub fn drain(&self) -> Vec<Event> {
        std::mem::take(&mut *lock(&self.queue))
    }

    /// Number of queued events.
    pub fn queued(&self) -> usize {
        lock(&self.queue).len()
    }

    /// Marks `key` pressed and queues a key-down event.
    pub fn key_down(&self, key: Key) {
        lock(&self.pressed).insert(key, true);
        self.push(KeyboardEvent::down(key).into());
    }

    /// Marks `key` released and queues a key-up event, if it was pressed.
    pub fn key_up(&self, key: Key) {
        let was_pressed = lock(&self.pressed)
            .get_mut(&key)
            .map(|pressed| std::mem::replace(pressed, false))
            .unwrap_or(false);
        if was_pressed {
            self.push(KeyboardEvent::up(key).into());
        }
    }

    /// Clears every pressed flag without queuing anything.
    pub fn release_all(&self) {
        lock(&self.pressed).values_mut().for_each(|pressed| *pressed = false);
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        lock(&self.pressed).get(&key).copied().unwrap_or(false)
    }

    /// A copy of the pressed-key table. Keys that were never seen are absent.
    pub fn pressed(&self) -> HashMap<Key, bool> {
        lock(&self.pressed).clone()
    }

    /// Records a new terminal size, replacing any size not yet taken.
    pub fn post_resize(&self, cols: u16, rows: u16) {
        *lock(&self.pending_resize) = Some((cols, rows));
    }

    pub fn take_resize(&self) -> Option<(u16, u16)> {
        lock(&self.pending_resize).take()
    }

    /// Asks the worker to stop. It notices within one poll interval.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Queues events as if they had been read from the terminal.
    ///
    /// Keyboard events also update the pressed-key table.
    pub fn inject(&self, events: impl IntoIterator<Item = Event>) {
        for event in events {
            if let Event::Keyboard(keyboard) = &event {
                let pressed = keyboard.phase == KeyPhase::Down;
                lock(&self.pressed).insert(keyboard.key, pressed);
            }
            self.push(event);
        }
    }
}
