//! Battle notifications and their delivery.
//!
//! Notifications are delivered synchronously, at the point where a note
//! changes state, through an [`EventSink`]. [`EventBus`] fans them out to
//! registered listeners in registration order; [`EventLog`] records them.

use serde::Serialize;

use crate::judge::Judgement;
use crate::scheduler::LiveNote;

/// Notification emitted by the scheduler or the judgement engine
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BattleEvent {
    /// Note entered the live set
    NoteSpawned(LiveNote),
    /// Note left the live set after resolution
    NoteProcessed(LiveNote),
    /// Scheduler resolved a note whose window elapsed without input
    NoteAutoMiss(LiveNote),
    /// Tap judged from a press
    JudgeResult { judgement: Judgement, note: LiveNote },
    /// Hold finished by release, completion or interruption
    HoldComplete { judgement: Judgement, note: LiveNote },
    /// Engine-side bookkeeping of an auto-missed note
    AutoMiss(LiveNote),
    PlayerDamaged { amount: f64 },
}

impl BattleEvent {
    /// Note carried by this event, if any
    pub fn note(&self) -> Option<&LiveNote> {
        match self {
            Self::NoteSpawned(note)
            | Self::NoteProcessed(note)
            | Self::NoteAutoMiss(note)
            | Self::AutoMiss(note) => Some(note),
            Self::JudgeResult { note, .. } | Self::HoldComplete { note, .. } => Some(note),
            Self::PlayerDamaged { .. } => None,
        }
    }
}

/// Receiver of battle notifications
pub trait EventSink {
    fn emit(&mut self, event: BattleEvent);
}

/// Listener-registration hub
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Box<dyn FnMut(&BattleEvent)>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&BattleEvent) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl EventSink for EventBus {
    fn emit(&mut self, event: BattleEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}

/// Records every notification in delivery order
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<BattleEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Take the recorded events, leaving the log empty
    pub fn drain(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn count_where(&self, predicate: impl Fn(&BattleEvent) -> bool) -> usize {
        self.events.iter().filter(|e| predicate(e)).count()
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: BattleEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_bus_delivers_in_registration_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        let first = Rc::clone(&seen);
        bus.subscribe(move |_| first.borrow_mut().push("first"));
        let second = Rc::clone(&seen);
        bus.subscribe(move |_| second.borrow_mut().push("second"));

        bus.emit(BattleEvent::PlayerDamaged { amount: 1.0 });
        assert_eq!(bus.listener_count(), 2);
        assert_eq!(*seen.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_log_records_and_drains() {
        let mut log = EventLog::new();
        log.emit(BattleEvent::PlayerDamaged { amount: 1.0 });
        log.emit(BattleEvent::PlayerDamaged { amount: 2.0 });
        assert_eq!(log.len(), 2);
        assert_eq!(
            log.count_where(|e| matches!(e, BattleEvent::PlayerDamaged { amount } if *amount > 1.5)),
            1
        );

        let drained = log.drain();
        assert_eq!(drained.len(), 2);
        assert!(log.is_empty());
    }
}
