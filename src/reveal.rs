//! Scroll reveal bookkeeping.
//!
//! The browser reports intersections in batches. [`RevealRegistry`] turns a
//! batch into delayed [`RevealEffect`]s, and each element's [`RevealView`]
//! folds those effects into render state. Neither type touches the DOM.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

pub const PROGRESS_DELAY_MS: u32 = 500;
pub const COUNTER_DELAY_MS: u32 = 300;
pub const MARKER_DELAY_MS: u32 = 200;
pub const MARKER_ANIMATION: &str = "bounceIn 0.8s cubic-bezier(0.4, 0, 0.2, 1) forwards";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RevealKind {
    SkillCard,
    ProgressBar,
    Counter,
    TimelineItem,
    Generic,
}

impl RevealKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SkillCard => "skill-card",
            Self::ProgressBar => "progress-bar",
            Self::Counter => "counter",
            Self::TimelineItem => "timeline-item",
            Self::Generic => "generic",
        }
    }

    /// Class applied before the element is revealed. Timeline items alternate
    /// sides by their position in the timeline.
    pub fn entrance_class(self, position: usize) -> &'static str {
        match self {
            Self::TimelineItem if position % 2 == 0 => "slide-in-left",
            Self::TimelineItem => "slide-in-right",
            _ => "fade-in",
        }
    }

    pub fn entrance_delay(self, position: usize) -> Option<String> {
        match self {
            Self::SkillCard => Some(format!("{:.1}s", position as f64 * 0.1)),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RevealId(pub u32);

impl RevealId {
    pub const ATTRIBUTE: &'static str = "data-reveal-id";

    pub fn parse(value: &str) -> Option<Self> {
        value.trim().parse::<u32>().ok().map(Self)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RevealEffect {
    MarkVisible,
    SetWidth(String),
    AnimateCounter,
    BounceMarker,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduledEffect {
    pub target: RevealId,
    pub delay_ms: u32,
    pub effect: RevealEffect,
}

/// One entry of an intersection batch. `id` is `None` when the reported
/// element carries no readable registration id; it still occupies its
/// position for stagger purposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntersectionReport {
    pub id: Option<RevealId>,
    pub intersecting: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RevealBatch {
    pub effects: Vec<ScheduledEffect>,
    /// Elements that fired in this batch and should no longer be observed.
    pub settled: Vec<RevealId>,
}

#[derive(Clone, Debug)]
struct Observed {
    kind: RevealKind,
    width: Option<String>,
    fired: bool,
}

#[derive(Clone, Debug)]
pub struct RevealRegistry {
    stagger_ms: u32,
    next_id: u32,
    entries: BTreeMap<RevealId, Observed>,
}

impl RevealRegistry {
    pub fn new(stagger_ms: u32) -> Self {
        Self {
            stagger_ms,
            next_id: 0,
            entries: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, kind: RevealKind, width: Option<String>) -> RevealId {
        let id = RevealId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.insert(
            id,
            Observed {
                kind,
                width,
                fired: false,
            },
        );
        id
    }

    pub fn unregister(&mut self, id: RevealId) -> bool {
        self.entries.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_fired(&self, id: RevealId) -> bool {
        self.entries.get(&id).is_some_and(|entry| entry.fired)
    }

    /// Plans effects for a batch in the order the browser reported it.
    pub fn on_intersections(&mut self, batch: &[IntersectionReport]) -> RevealBatch {
        let mut planned = RevealBatch::default();

        for (index, report) in batch.iter().enumerate() {
            if !report.intersecting {
                continue;
            }
            let Some(id) = report.id else {
                continue;
            };
            let Some(entry) = self.entries.get_mut(&id) else {
                continue;
            };
            if entry.fired {
                continue;
            }

            entry.fired = true;
            planned.settled.push(id);
            planned.effects.extend(plan_reveal(
                id,
                entry.kind,
                entry.width.as_deref(),
                index,
                self.stagger_ms,
            ));
        }

        planned
    }
}

pub fn plan_reveal(
    id: RevealId,
    kind: RevealKind,
    width: Option<&str>,
    batch_index: usize,
    stagger_ms: u32,
) -> Vec<ScheduledEffect> {
    let stagger = u32::try_from(batch_index)
        .unwrap_or(u32::MAX)
        .saturating_mul(stagger_ms);
    let mut effects = vec![ScheduledEffect {
        target: id,
        delay_ms: stagger,
        effect: RevealEffect::MarkVisible,
    }];

    let follow_up = match kind {
        RevealKind::ProgressBar => width.map(|width| {
            (PROGRESS_DELAY_MS, RevealEffect::SetWidth(width.to_string()))
        }),
        RevealKind::Counter => Some((COUNTER_DELAY_MS, RevealEffect::AnimateCounter)),
        RevealKind::TimelineItem => Some((MARKER_DELAY_MS, RevealEffect::BounceMarker)),
        RevealKind::SkillCard | RevealKind::Generic => None,
    };

    if let Some((delay_ms, effect)) = follow_up {
        effects.push(ScheduledEffect {
            target: id,
            delay_ms,
            effect,
        });
    }

    effects
}

/// Render state of one observed element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RevealView {
    pub visible: bool,
    pub width: Option<String>,
    pub counter_started: bool,
    pub marker_bounced: bool,
}

impl RevealView {
    /// Returns whether anything changed. Every effect is idempotent.
    pub fn apply(&mut self, effect: RevealEffect) -> bool {
        match effect {
            RevealEffect::MarkVisible => !std::mem::replace(&mut self.visible, true),
            RevealEffect::SetWidth(width) => {
                if self.width.as_deref() == Some(width.as_str()) {
                    return false;
                }
                self.width = Some(width);
                true
            }
            RevealEffect::AnimateCounter => !std::mem::replace(&mut self.counter_started, true),
            RevealEffect::BounceMarker => !std::mem::replace(&mut self.marker_bounced, true),
        }
    }

    pub fn class(&self) -> Option<&'static str> {
        self.visible.then_some("visible")
    }

    /// Progress bars render at `0%` until their width arrives.
    pub fn width_or_zero(&self) -> &str {
        self.width.as_deref().unwrap_or("0%")
    }
}

/// Set by a timer's callback once it has run.
pub type FiredFlag = Rc<Cell<bool>>;

/// Timers owned per reveal target. A timer is dropped when its target
/// unregisters, or by the next [`PendingTimers::hold`] after it has fired.
#[derive(Debug)]
pub struct PendingTimers<T> {
    held: BTreeMap<RevealId, Vec<(FiredFlag, T)>>,
}

impl<T> Default for PendingTimers<T> {
    fn default() -> Self {
        Self {
            held: BTreeMap::new(),
        }
    }
}

impl<T> PendingTimers<T> {
    pub fn hold(&mut self, target: RevealId, fired: FiredFlag, timer: T) {
        self.release_fired();
        self.held.entry(target).or_default().push((fired, timer));
    }

    pub fn release_fired(&mut self) {
        self.held.retain(|_, timers| {
            timers.retain(|(fired, _)| !fired.get());
            !timers.is_empty()
        });
    }

    /// Drops every timer of `target`, cancelling those still pending.
    pub fn release(&mut self, target: RevealId) -> usize {
        self.held.remove(&target).map_or(0, |timers| timers.len())
    }

    pub fn len(&self) -> usize {
        self.held.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(id: RevealId) -> IntersectionReport {
        IntersectionReport {
            id: Some(id),
            intersecting: true,
        }
    }

    #[test]
    fn batch_position_drives_stagger() {
        let mut registry = RevealRegistry::new(100);
        let first = registry.register(RevealKind::Generic, None);
        let second = registry.register(RevealKind::SkillCard, None);
        let third = registry.register(RevealKind::Generic, None);

        let batch = registry.on_intersections(&[hit(third), hit(first), hit(second)]);

        let visible_delays: Vec<(RevealId, u32)> = batch
            .effects
            .iter()
            .filter(|scheduled| scheduled.effect == RevealEffect::MarkVisible)
            .map(|scheduled| (scheduled.target, scheduled.delay_ms))
            .collect();
        assert_eq!(visible_delays, vec![(third, 0), (first, 100), (second, 200)]);
        assert_eq!(batch.settled, vec![third, first, second]);
    }

    #[test]
    fn non_intersecting_entries_still_take_a_position() {
        let mut registry = RevealRegistry::new(100);
        let hidden = registry.register(RevealKind::Generic, None);
        let shown = registry.register(RevealKind::Generic, None);

        let batch = registry.on_intersections(&[
            IntersectionReport {
                id: Some(hidden),
                intersecting: false,
            },
            IntersectionReport {
                id: None,
                intersecting: true,
            },
            hit(shown),
        ]);

        assert_eq!(
            batch.effects,
            vec![ScheduledEffect {
                target: shown,
                delay_ms: 200,
                effect: RevealEffect::MarkVisible,
            }]
        );
        assert!(!registry.has_fired(hidden));
    }

    #[test]
    fn kinds_schedule_their_follow_up_animation() {
        let id = RevealId(4);

        let progress = plan_reveal(id, RevealKind::ProgressBar, Some("85%"), 0, 100);
        assert_eq!(
            progress[1],
            ScheduledEffect {
                target: id,
                delay_ms: 500,
                effect: RevealEffect::SetWidth("85%".to_string()),
            }
        );

        let counter = plan_reveal(id, RevealKind::Counter, None, 1, 100);
        assert_eq!(counter[0].delay_ms, 100);
        assert_eq!(counter[1].delay_ms, 300);
        assert_eq!(counter[1].effect, RevealEffect::AnimateCounter);

        let timeline = plan_reveal(id, RevealKind::TimelineItem, None, 0, 100);
        assert_eq!(timeline[1].delay_ms, 200);
        assert_eq!(timeline[1].effect, RevealEffect::BounceMarker);

        assert_eq!(plan_reveal(id, RevealKind::SkillCard, None, 0, 100).len(), 1);
        assert_eq!(plan_reveal(id, RevealKind::ProgressBar, None, 0, 100).len(), 1);
    }

    #[test]
    fn fired_elements_never_fire_again() {
        let mut registry = RevealRegistry::new(100);
        let counter = registry.register(RevealKind::Counter, None);

        let first = registry.on_intersections(&[hit(counter)]);
        assert_eq!(first.effects.len(), 2);
        assert!(registry.has_fired(counter));

        let again = registry.on_intersections(&[hit(counter)]);
        assert!(again.effects.is_empty());
        assert!(again.settled.is_empty());
    }

    #[test]
    fn unregistered_elements_are_ignored() {
        let mut registry = RevealRegistry::new(100);
        let id = registry.register(RevealKind::Generic, None);
        assert!(registry.unregister(id));
        assert!(registry.is_empty());

        assert!(registry.on_intersections(&[hit(id)]).effects.is_empty());
        assert!(!registry.unregister(id));
    }

    #[test]
    fn marking_visible_twice_matches_marking_once() {
        let mut once = RevealView::default();
        assert!(once.apply(RevealEffect::MarkVisible));

        let mut twice = once.clone();
        assert!(!twice.apply(RevealEffect::MarkVisible));
        assert_eq!(once, twice);
        assert_eq!(twice.class(), Some("visible"));
    }

    #[test]
    fn width_effect_is_idempotent() {
        let mut view = RevealView::default();
        assert_eq!(view.width_or_zero(), "0%");

        assert!(view.apply(RevealEffect::SetWidth("70%".to_string())));
        assert!(!view.apply(RevealEffect::SetWidth("70%".to_string())));
        assert_eq!(view.width_or_zero(), "70%");
    }

    #[test]
    fn entrance_classes_alternate_for_timeline() {
        assert_eq!(RevealKind::TimelineItem.entrance_class(0), "slide-in-left");
        assert_eq!(RevealKind::TimelineItem.entrance_class(1), "slide-in-right");
        assert_eq!(RevealKind::Counter.entrance_class(1), "fade-in");
        assert_eq!(RevealKind::SkillCard.entrance_delay(3).as_deref(), Some("0.3s"));
        assert_eq!(RevealKind::Generic.entrance_delay(3), None);
    }

    #[test]
    fn ids_round_trip_through_the_attribute_value() {
        assert_eq!(RevealId::parse(" 12 "), Some(RevealId(12)));
        assert_eq!(RevealId::parse("x"), None);
    }

    #[test]
    fn fired_timers_are_released_on_next_hold() {
        let mut timers = PendingTimers::default();
        let visible = FiredFlag::default();
        let follow_up = FiredFlag::default();
        timers.hold(RevealId(0), visible.clone(), "visible");
        timers.hold(RevealId(0), follow_up.clone(), "follow-up");
        assert_eq!(timers.len(), 2);

        visible.set(true);
        follow_up.set(true);
        timers.hold(RevealId(1), FiredFlag::default(), "other");

        assert_eq!(timers.len(), 1);
        assert_eq!(timers.release(RevealId(0)), 0);
    }

    #[test]
    fn unregistered_target_drops_pending_timers() {
        let mut timers = PendingTimers::default();
        timers.hold(RevealId(3), FiredFlag::default(), ());
        timers.hold(RevealId(3), FiredFlag::default(), ());
        timers.hold(RevealId(4), FiredFlag::default(), ());

        assert_eq!(timers.release(RevealId(3)), 2);
        assert_eq!(timers.len(), 1);

        timers.release(RevealId(4));
        assert!(timers.is_empty());
    }
}
