//! Thin adapters between the pure page logic and the browser: storage,
//! theme application, scroll measurement, the shared intersection observer,
//! and the hooks components use to reach them.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use gloo_events::EventListener;
use gloo_render::{request_animation_frame, AnimationFrame};
use gloo_timers::callback::Timeout;
use js_sys::{Array, Function, Reflect};
use serde_json::json;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, ScrollBehavior, ScrollToOptions, Storage,
};
use yew::prelude::*;

use crate::coalesce::FrameCoalescer;
use crate::config::PageConfig;
use crate::log::{log_event, LogLevel};
use crate::nav::anchor_scroll_top;
use crate::reveal::{
    IntersectionReport, PendingTimers, RevealEffect, RevealId, RevealKind, RevealRegistry,
    RevealView, ScheduledEffect,
};
use crate::theme::{KeyValueStore, StoreError, Theme, DARK_CLASS};

pub struct LocalStorageStore {
    storage: Option<Storage>,
}

impl LocalStorageStore {
    pub fn open() -> Self {
        Self {
            storage: window().and_then(|w| w.local_storage().ok().flatten()),
        }
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let storage = self.storage.as_ref().ok_or(StoreError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|error| StoreError::Rejected(js_error_message(&error)))
    }
}

fn js_error_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|message| message.as_string())
        })
        .unwrap_or_else(|| "unknown error".to_string())
}

pub fn apply_theme(theme: Theme) {
    if let Some(body) = window().and_then(|w| w.document()).and_then(|d| d.body()) {
        let _ = body
            .class_list()
            .toggle_with_force(DARK_CLASS, theme.body_class().is_some());
    }
}

fn prefers_reduced_motion() -> bool {
    window()
        .and_then(|w| {
            w.match_media("(prefers-reduced-motion: reduce)")
                .ok()
                .flatten()
        })
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

pub fn apply_theme_with_transition(theme: Theme) {
    if prefers_reduced_motion() {
        apply_theme(theme);
        return;
    }

    let Some(document) = window().and_then(|w| w.document()) else {
        apply_theme(theme);
        return;
    };

    let document_js: JsValue = document.into();
    let Ok(start_view_transition) =
        Reflect::get(&document_js, &JsValue::from_str("startViewTransition"))
    else {
        apply_theme(theme);
        return;
    };

    let Some(start_view_transition) = start_view_transition.dyn_ref::<Function>() else {
        apply_theme(theme);
        return;
    };

    // The transition runs the callback later, so JS owns it.
    let callback = Closure::once_into_js(move || apply_theme(theme));

    if start_view_transition.call1(&document_js, &callback).is_err() {
        apply_theme(theme);
    }
}

pub fn viewport_size() -> (f64, f64) {
    let Some(win) = window() else {
        return (1280.0, 720.0);
    };

    let width = win
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(1280.0);
    let height = win
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(720.0);

    (width, height)
}

pub fn scroll_y() -> f64 {
    window().and_then(|w| w.scroll_y().ok()).unwrap_or(0.0)
}

pub fn section_top(id: &str) -> Option<f64> {
    let element = window()?
        .document()?
        .get_element_by_id(id)?
        .dyn_into::<HtmlElement>()
        .ok()?;
    Some(f64::from(element.offset_top()))
}

/// Smooth-scrolls to the section; `false` when it does not exist.
pub fn scroll_to_section(id: &str, nav_height: f64) -> bool {
    let (Some(win), Some(top)) = (window(), section_top(id)) else {
        return false;
    };

    let options = ScrollToOptions::new();
    options.set_top(anchor_scroll_top(top, nav_height));
    options.set_behavior(ScrollBehavior::Smooth);
    win.scroll_to_with_scroll_to_options(&options);
    true
}

pub fn random_unit() -> f64 {
    js_sys::Math::random()
}

/// Owns the page's single `IntersectionObserver` and every reveal timer.
/// Dropping the hub disconnects the observer and cancels pending timers.
pub struct RevealHub {
    config: Rc<PageConfig>,
    observer: Option<IntersectionObserver>,
    registry: RefCell<RevealRegistry>,
    targets: RefCell<HashMap<RevealId, (Element, Callback<RevealEffect>)>>,
    timers: RefCell<PendingTimers<Timeout>>,
    _on_intersect: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl RevealHub {
    pub fn new(config: Rc<PageConfig>) -> Rc<Self> {
        Rc::new_cyclic(|weak: &Weak<Self>| {
            let hub = weak.clone();
            let on_intersect = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
                move |entries: Array, _observer: IntersectionObserver| {
                    if let Some(hub) = hub.upgrade() {
                        hub.on_entries(&entries);
                    }
                },
            );

            let options = IntersectionObserverInit::new();
            options.set_threshold(&JsValue::from_f64(config.reveal_threshold));
            options.set_root_margin(&config.reveal_root_margin);
            let observer = IntersectionObserver::new_with_options(
                on_intersect.as_ref().unchecked_ref(),
                &options,
            )
            .ok();

            if observer.is_none() {
                log_event(
                    &config,
                    LogLevel::Warn,
                    "reveal_observer_unavailable",
                    json!({ "fallback": "reveal_immediately" }),
                );
            }

            Self {
                registry: RefCell::new(RevealRegistry::new(config.reveal_stagger_ms)),
                config,
                observer,
                targets: RefCell::new(HashMap::new()),
                timers: RefCell::new(PendingTimers::default()),
                _on_intersect: on_intersect,
            }
        })
    }

    pub fn register(
        &self,
        kind: RevealKind,
        width: Option<String>,
        element: Element,
        listener: Callback<RevealEffect>,
    ) -> RevealId {
        let id = self.registry.borrow_mut().register(kind, width);
        let _ = element.set_attribute(RevealId::ATTRIBUTE, &id.0.to_string());

        if let Some(observer) = &self.observer {
            observer.observe(&element);
        }
        self.targets.borrow_mut().insert(id, (element, listener));

        if self.observer.is_none() {
            let batch = self.registry.borrow_mut().on_intersections(&[IntersectionReport {
                id: Some(id),
                intersecting: true,
            }]);
            self.schedule(batch.effects);
        }

        log_event(
            &self.config,
            LogLevel::Debug,
            "reveal_registered",
            json!({ "id": id.0, "kind": kind.as_str() }),
        );
        id
    }

    pub fn unregister(&self, id: RevealId) {
        self.registry.borrow_mut().unregister(id);
        self.timers.borrow_mut().release(id);
        if let Some((element, _)) = self.targets.borrow_mut().remove(&id) {
            if let Some(observer) = &self.observer {
                observer.unobserve(&element);
            }
        }
    }

    fn on_entries(&self, entries: &Array) {
        let reports: Vec<IntersectionReport> = entries
            .iter()
            .map(|value| match value.dyn_into::<IntersectionObserverEntry>() {
                Ok(entry) => IntersectionReport {
                    id: entry
                        .target()
                        .get_attribute(RevealId::ATTRIBUTE)
                        .as_deref()
                        .and_then(RevealId::parse),
                    intersecting: entry.is_intersecting(),
                },
                Err(_) => IntersectionReport {
                    id: None,
                    intersecting: false,
                },
            })
            .collect();

        let batch = self.registry.borrow_mut().on_intersections(&reports);

        if let Some(observer) = &self.observer {
            let targets = self.targets.borrow();
            for id in &batch.settled {
                if let Some((element, _)) = targets.get(id) {
                    observer.unobserve(element);
                }
            }
        }

        if !batch.settled.is_empty() {
            log_event(
                &self.config,
                LogLevel::Debug,
                "reveal_batch",
                json!({
                    "reported": reports.len(),
                    "revealed": batch.settled.len(),
                }),
            );
        }

        self.schedule(batch.effects);
    }

    fn schedule(&self, effects: Vec<ScheduledEffect>) {
        let targets = self.targets.borrow();
        let mut timers = self.timers.borrow_mut();

        for scheduled in effects {
            let Some((_, listener)) = targets.get(&scheduled.target) else {
                continue;
            };
            let listener = listener.clone();
            let effect = scheduled.effect;
            let fired = Rc::new(Cell::new(false));
            let flag = fired.clone();
            let timer = Timeout::new(scheduled.delay_ms, move || {
                flag.set(true);
                listener.emit(effect);
            });
            timers.hold(scheduled.target, fired, timer);
        }
    }
}

impl Drop for RevealHub {
    fn drop(&mut self) {
        if let Some(observer) = &self.observer {
            observer.disconnect();
        }
    }
}

#[derive(Clone)]
pub struct RevealHandle(pub Rc<RevealHub>);

impl PartialEq for RevealHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Reducible for RevealView {
    type Action = RevealEffect;

    fn reduce(self: Rc<Self>, effect: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        if next.apply(effect) {
            Rc::new(next)
        } else {
            self
        }
    }
}

/// Registers the element behind the returned `NodeRef` with the page's
/// reveal hub for as long as the component is mounted.
#[hook]
pub fn use_reveal(
    kind: RevealKind,
    width: Option<AttrValue>,
) -> (NodeRef, UseReducerHandle<RevealView>) {
    let hub = use_context::<RevealHandle>();
    let node = use_node_ref();
    let view = use_reducer(RevealView::default);

    {
        let node = node.clone();
        let dispatcher = view.dispatcher();
        use_effect_with(hub, move |hub| {
            let registration = hub.clone().and_then(|hub| {
                let element = node.cast::<Element>()?;
                let listener =
                    Callback::from(move |effect: RevealEffect| dispatcher.dispatch(effect));
                let id = hub
                    .0
                    .register(kind, width.map(|value| value.to_string()), element, listener);
                Some((hub, id))
            });

            move || {
                if let Some((hub, id)) = registration {
                    hub.0.unregister(id);
                }
            }
        });
    }

    (node, view)
}

struct FrameSlot<T> {
    coalescer: FrameCoalescer<T>,
    frame: Option<AnimationFrame>,
}

impl<T> Default for FrameSlot<T> {
    fn default() -> Self {
        Self {
            coalescer: FrameCoalescer::default(),
            frame: None,
        }
    }
}

/// Returns a callback that forwards only the latest value per animation frame.
#[hook]
pub fn use_frame_coalesced<T: 'static>(on_frame: Callback<T>) -> Callback<T> {
    let latest = use_mut_ref(|| on_frame.clone());
    *latest.borrow_mut() = on_frame;
    let slot = use_mut_ref(FrameSlot::<T>::default);

    {
        let slot = slot.clone();
        use_effect_with((), move |_| {
            move || {
                let mut slot = slot.borrow_mut();
                slot.frame.take();
                slot.coalescer.reset();
            }
        });
    }

    use_callback((), move |value: T, _| {
        if !slot.borrow_mut().coalescer.offer(value) {
            return;
        }

        let frame_slot = slot.clone();
        let latest = latest.clone();
        let frame = request_animation_frame(move |_| {
            let value = {
                let mut frame_slot = frame_slot.borrow_mut();
                frame_slot.frame.take();
                frame_slot.coalescer.take()
            };
            let on_frame = latest.borrow().clone();
            if let Some(value) = value {
                on_frame.emit(value);
            }
        });
        slot.borrow_mut().frame = Some(frame);
    })
}

/// Calls `on_scroll` with the vertical scroll position once on mount and
/// then at most once per animation frame while the page scrolls.
#[hook]
pub fn use_window_scroll(on_scroll: Callback<f64>) {
    let coalesced = use_frame_coalesced(on_scroll);

    use_effect_with(coalesced, |coalesced| {
        coalesced.emit(scroll_y());

        let listener = window().map(|win| {
            let coalesced = coalesced.clone();
            EventListener::new(&win, "scroll", move |_| coalesced.emit(scroll_y()))
        });

        move || drop(listener)
    });
}
