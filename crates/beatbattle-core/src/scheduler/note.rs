use serde::Serialize;
use strum::IntoStaticStr;

use crate::chart::BeatEvent;
use crate::judge::Judgement;

/// Index of a note's source event in the chart's time order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NoteId(pub usize);

impl std::fmt::Display for NoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle state of a live note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, IntoStaticStr)]
pub enum NoteState {
    /// Visible, not yet inside its judgement window
    Spawned,
    /// Inside its judgement window, waiting for a press
    PressPending,
    /// Hold pressed and being sustained
    Holding,
    Resolved,
}

impl NoteState {
    /// Whether a press can still be matched against the note
    pub fn accepts_press(&self) -> bool {
        matches!(self, Self::Spawned | Self::PressPending)
    }
}

/// How a note was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Resolution {
    Judged(Judgement),
    AutoMiss,
}

impl Resolution {
    pub fn judgement(&self) -> Judgement {
        match self {
            Self::Judged(judgement) => *judgement,
            Self::AutoMiss => Judgement::Miss,
        }
    }
}

/// Runtime view of a chart event between spawn and removal
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LiveNote {
    pub id: NoteId,
    pub event: BeatEvent,
    pub state: NoteState,
    pub spawn_time: f64,
    /// Event's absolute time
    pub judge_window_center: f64,
    /// Zero for taps
    pub hold_duration: f64,
    pub resolved_time: Option<f64>,
    pub resolution: Option<Resolution>,
}

impl LiveNote {
    pub(crate) fn spawn(id: NoteId, event: BeatEvent, center: f64, hold_duration: f64, now: f64) -> Self {
        Self {
            id,
            event,
            state: NoteState::Spawned,
            spawn_time: now,
            judge_window_center: center,
            hold_duration,
            resolved_time: None,
            resolution: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.state == NoteState::Resolved
    }

    /// Signed offset of a press at `time` (positive = late)
    pub fn offset(&self, time: f64) -> f64 {
        time - self.judge_window_center
    }

    pub(crate) fn resolve(&mut self, resolution: Resolution, time: f64) {
        self.state = NoteState::Resolved;
        self.resolution = Some(resolution);
        self.resolved_time = Some(time);
    }
}
