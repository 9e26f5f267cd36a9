use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::error::{AppError, AppResult};

use super::bridge::{NavigationBridge, PopEvent};
use super::record::NavRecord;

/// The host's single opaque state slot plus its two write primitives.
/// Implementations may fail; the codec above them swallows those failures.
pub trait HistorySlot {
    fn read_state(&self) -> AppResult<Option<Value>>;
    fn push_state(&self, state: Value) -> AppResult<()>;
    fn replace_state(&self, state: Value) -> AppResult<()>;
}

/// In-process stand-in for the host's session-history stack.
pub struct SessionHistory {
    entries: Vec<Value>,
    cursor: usize,
    capacity: usize,
}

impl SessionHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: vec![Value::Null],
            cursor: 0,
            capacity: capacity.max(2),
        }
    }

    pub fn state(&self) -> Option<&Value> {
        match &self.entries[self.cursor] {
            Value::Null => None,
            value => Some(value),
        }
    }

    /// Discards any forward tail; at capacity the oldest entry falls off.
    pub fn push(&mut self, state: Value) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(state);
        if self.entries.len() > self.capacity {
            self.entries.remove(0);
        }
        self.cursor = self.entries.len() - 1;
    }

    pub fn replace(&mut self, state: Value) {
        self.entries[self.cursor] = state;
    }

    pub fn back(&mut self) -> Option<Value> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.entries[self.cursor].clone())
    }

    pub fn forward(&mut self) -> Option<Value> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.entries[self.cursor].clone())
    }

    pub fn can_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

/// Shared handle over the stack that also plays the host's part: traversal
/// through `back`/`forward` delivers the newly-current slot to the bridge.
#[derive(Clone)]
pub struct SessionHost {
    inner: Rc<RefCell<SessionHistory>>,
    bridge: NavigationBridge,
}

impl SessionHost {
    pub fn new(capacity: usize, bridge: NavigationBridge) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SessionHistory::new(capacity))),
            bridge,
        }
    }

    pub fn bridge(&self) -> &NavigationBridge {
        &self.bridge
    }

    pub fn back(&self) -> bool {
        let state = self.inner.borrow_mut().back();
        self.deliver(state)
    }

    pub fn forward(&self) -> bool {
        let state = self.inner.borrow_mut().forward();
        self.deliver(state)
    }

    pub fn can_back(&self) -> bool {
        self.inner.borrow().can_back()
    }

    pub fn can_forward(&self) -> bool {
        self.inner.borrow().can_forward()
    }

    pub fn depth(&self) -> usize {
        self.inner.borrow().depth()
    }

    pub fn cursor(&self) -> usize {
        self.inner.borrow().cursor()
    }

    // The stack borrow is released before fan-out so listeners are free to
    // issue replace writes against the entry they just landed on.
    fn deliver(&self, state: Option<Value>) -> bool {
        let Some(state) = state else {
            return false;
        };
        let state = match state {
            Value::Null => None,
            value => Some(value),
        };
        self.bridge.emit(&PopEvent { state });
        true
    }
}

impl HistorySlot for SessionHost {
    fn read_state(&self) -> AppResult<Option<Value>> {
        let history = self
            .inner
            .try_borrow()
            .map_err(|_| AppError::host_unavailable("history stack is mid-mutation"))?;
        Ok(history.state().cloned())
    }

    fn push_state(&self, state: Value) -> AppResult<()> {
        let mut history = self
            .inner
            .try_borrow_mut()
            .map_err(|_| AppError::host_unavailable("history stack is mid-mutation"))?;
        history.push(state);
        Ok(())
    }

    fn replace_state(&self, state: Value) -> AppResult<()> {
        let mut history = self
            .inner
            .try_borrow_mut()
            .map_err(|_| AppError::host_unavailable("history stack is mid-mutation"))?;
        history.replace(state);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum WriteKind {
    Append,
    Replace,
}

impl fmt::Display for WriteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Append => f.write_str("append"),
            Self::Replace => f.write_str("replace"),
        }
    }
}

/// Best-effort reader/writer of `NavRecord`s against the opaque slot. Writes
/// merge the partial over the current occupant; callers never see an error.
#[derive(Clone)]
pub struct HistoryStateCodec {
    slot: Rc<dyn HistorySlot>,
}

impl HistoryStateCodec {
    pub fn new(slot: Rc<dyn HistorySlot>) -> Self {
        Self { slot }
    }

    pub fn read(&self) -> NavRecord {
        match self.slot.read_state() {
            Ok(state) => NavRecord::decode(state.as_ref()),
            Err(err) => {
                log::debug!("history slot read failed: {err}");
                NavRecord::default()
            }
        }
    }

    /// Merge-then-push: creates a new, back-reversible entry.
    pub fn append(&self, partial: NavRecord) {
        self.write(partial, WriteKind::Append);
    }

    /// Merge-then-overwrite: mutates the current entry in place.
    pub fn replace(&self, partial: NavRecord) {
        self.write(partial, WriteKind::Replace);
    }

    fn write(&self, partial: NavRecord, kind: WriteKind) {
        let merged = partial.merged_over(self.read()).to_value();
        let written = match kind {
            WriteKind::Append => self.slot.push_state(merged),
            WriteKind::Replace => self.slot.replace_state(merged),
        };
        if let Err(err) = written {
            log::debug!("history {kind} write failed: {err}");
        }
    }
}
