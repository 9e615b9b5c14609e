use std::fmt::Display;

use crate::models::RecommendationId;

/// Mutations a moderator can trigger on a single recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Approve,
    Delete,
}

impl ActionKind {
    /// Button label
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::Approve => "Approve",
            ActionKind::Delete => "Delete",
        }
    }
}

impl Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionKind::Approve => write!(f, "approve"),
            ActionKind::Delete => write!(f, "delete"),
        }
    }
}

/// Per-action state machine: `Idle -> InFlight(id) -> Idle`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InFlight {
    #[default]
    Idle,
    Running(RecommendationId),
}

impl InFlight {
    /// Starts tracking `id`, returning the id it displaced, if any.
    ///
    /// Only one id is tracked per action kind. Starting a second request
    /// while one is outstanding moves the busy marker to the new item.
    pub fn begin(&mut self, id: RecommendationId) -> Option<RecommendationId> {
        match std::mem::replace(self, InFlight::Running(id)) {
            InFlight::Idle => None,
            InFlight::Running(previous) => Some(previous),
        }
    }

    /// Returns to idle if `id` is the tracked one. A request that was
    /// displaced by a newer one must not clear the newer marker.
    pub fn finish(&mut self, id: &RecommendationId) -> bool {
        if self.is_busy(id) {
            *self = InFlight::Idle;
            true
        } else {
            false
        }
    }

    pub fn is_busy(&self, id: &RecommendationId) -> bool {
        matches!(self, InFlight::Running(current) if current == id)
    }

    pub fn current(&self) -> Option<&RecommendationId> {
        match self {
            InFlight::Idle => None,
            InFlight::Running(id) => Some(id),
        }
    }
}

/// One in-flight tracker per action kind, independent of each other
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionTracker {
    approving: InFlight,
    deleting: InFlight,
}

impl ActionTracker {
    pub fn get(&self, kind: ActionKind) -> &InFlight {
        match kind {
            ActionKind::Approve => &self.approving,
            ActionKind::Delete => &self.deleting,
        }
    }

    pub fn get_mut(&mut self, kind: ActionKind) -> &mut InFlight {
        match kind {
            ActionKind::Approve => &mut self.approving,
            ActionKind::Delete => &mut self.deleting,
        }
    }

    pub fn is_busy(&self, kind: ActionKind, id: &RecommendationId) -> bool {
        self.get(kind).is_busy(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_by_default() {
        let tracker = ActionTracker::default();
        let id = RecommendationId::new("1");
        assert!(!tracker.is_busy(ActionKind::Approve, &id));
        assert!(!tracker.is_busy(ActionKind::Delete, &id));
        assert_eq!(tracker.get(ActionKind::Approve).current(), None);
    }

    #[test]
    fn test_begin_and_finish() {
        let mut state = InFlight::default();
        let id = RecommendationId::new("1");

        assert_eq!(state.begin(id.clone()), None);
        assert!(state.is_busy(&id));
        assert!(!state.is_busy(&RecommendationId::new("2")));

        assert!(state.finish(&id));
        assert_eq!(state, InFlight::Idle);
    }

    #[test]
    fn test_newer_request_is_not_cleared_by_older_one() {
        let mut state = InFlight::default();
        let first = RecommendationId::new("1");
        let second = RecommendationId::new("2");

        state.begin(first.clone());
        assert_eq!(state.begin(second.clone()), Some(first.clone()));

        assert!(!state.finish(&first));
        assert!(state.is_busy(&second));

        assert!(state.finish(&second));
        assert_eq!(state.current(), None);
    }

    #[test]
    fn test_action_kinds_are_tracked_independently() {
        let mut tracker = ActionTracker::default();
        let id = RecommendationId::new("1");

        tracker.get_mut(ActionKind::Approve).begin(id.clone());

        assert!(tracker.is_busy(ActionKind::Approve, &id));
        assert!(!tracker.is_busy(ActionKind::Delete, &id));
    }
}
