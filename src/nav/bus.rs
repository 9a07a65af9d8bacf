//! Publish/subscribe with hierarchical dispatch.
//!
//! Handlers are plain function pointers over a context type `C` (the
//! session). Publishing copies the matching handlers out of the bus before
//! calling them, so a handler may freely subscribe, unsubscribe or publish
//! again; nested publishes run to completion before the outer one resumes.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::PathBuf;

use tracing::{debug, trace};

use super::view::ViewId;
use crate::host::RegionId;

/// Names of the events exchanged between panels, views and the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    ViewLoaded,
    FocusChanged,
    CursorMoved,
    CursorAdjusted,
    RegionFocused,
    OptionChanged,
}

/// Type tag of an event emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmitterKind {
    Emitter,
    Panel,
    LeftPanel,
    MainPanel,
    RightPanel,
    View,
    DirectoryView,
    FileView,
    MessageView,
    EmptyView,
    Region,
    Session,
}

impl EmitterKind {
    /// Direct supertypes in declaration order.
    pub fn bases(self) -> &'static [EmitterKind] {
        use EmitterKind::*;
        match self {
            Emitter => &[],
            Panel | View | Region | Session => &[Emitter],
            LeftPanel | MainPanel | RightPanel => &[Panel],
            DirectoryView | FileView | MessageView => &[View],
            EmptyView => &[MessageView, View],
        }
    }

    /// Every supertype, nearest first, each listed once.
    pub fn ancestors(self) -> Vec<EmitterKind> {
        let mut out: Vec<EmitterKind> = Vec::new();
        let mut queue: Vec<EmitterKind> = self.bases().to_vec();
        let mut i = 0;
        while i < queue.len() {
            let kind = queue[i];
            i += 1;
            if out.contains(&kind) {
                continue;
            }
            out.push(kind);
            queue.extend_from_slice(kind.bases());
        }
        out
    }
}

/// Identity of a managed object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstanceId {
    Panel(RegionId),
    View(ViewId),
    Region(RegionId),
    Session,
}

/// Who published an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Emitter {
    pub kind: EmitterKind,
    pub instance: Option<InstanceId>,
}

impl Emitter {
    pub fn instance(kind: EmitterKind, id: InstanceId) -> Self {
        Self {
            kind,
            instance: Some(id),
        }
    }

    pub fn kind(kind: EmitterKind) -> Self {
        Self {
            kind,
            instance: None,
        }
    }
}

/// Second half of a subscription key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Events published without an emitter.
    Global,
    Instance(InstanceId),
    Kind(EmitterKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventKey {
    pub name: EventName,
    pub target: Target,
}

impl EventKey {
    pub fn new(name: EventName, target: Target) -> Self {
        Self { name, target }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    None,
    Region(RegionId),
    ViewLoaded { panel: RegionId, view: ViewId },
    FocusChanged { view: ViewId, item: Option<PathBuf> },
    CursorAdjusted { view: ViewId },
    Option { key: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub name: EventName,
    pub emitter: Option<Emitter>,
    pub payload: Payload,
}

impl Event {
    pub fn global(name: EventName, payload: Payload) -> Self {
        Self {
            name,
            emitter: None,
            payload,
        }
    }

    pub fn new(emitter: Emitter, name: EventName, payload: Payload) -> Self {
        Self {
            name,
            emitter: Some(emitter),
            payload,
        }
    }
}

/// A named callback. The name identifies it for `unsubscribe`.
pub struct Handler<C> {
    pub name: &'static str,
    pub func: fn(&mut C, &Event),
}

impl<C> Handler<C> {
    pub fn new(name: &'static str, func: fn(&mut C, &Event)) -> Self {
        Self { name, func }
    }
}

impl<C> Clone for Handler<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Handler<C> {}

impl<C> fmt::Debug for Handler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handler").field(&self.name).finish()
    }
}

/// An object with a static table of event handlers.
pub trait Subscriber<C> {
    fn manage_id(&self) -> InstanceId;
    fn subscriptions(&self) -> Vec<(EventKey, Handler<C>)>;
}

pub struct EventBus<C> {
    handlers: HashMap<EventKey, Vec<Handler<C>>>,
    managed: HashSet<InstanceId>,
}

impl<C> Default for EventBus<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for EventBus<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("keys", &self.handlers.len())
            .field("managed", &self.managed)
            .finish()
    }
}

impl<C> EventBus<C> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            managed: HashSet::new(),
        }
    }

    pub fn subscribe(&mut self, key: EventKey, handler: Handler<C>) {
        debug!(?key, handler = handler.name, "subscribe");
        self.handlers.entry(key).or_default().push(handler);
    }

    /// Remove the handler called `name` from `key`. Returns whether one was removed.
    pub fn unsubscribe(&mut self, key: EventKey, name: &str) -> bool {
        let Some(list) = self.handlers.get_mut(&key) else {
            return false;
        };
        let Some(pos) = list.iter().position(|h| h.name == name) else {
            return false;
        };
        list.remove(pos);
        if list.is_empty() {
            self.handlers.remove(&key);
        }
        debug!(?key, handler = name, "unsubscribe");
        true
    }

    /// Subscribe every handler of `subscriber`, once per instance.
    ///
    /// Returns `false` if the instance was already managed.
    pub fn manage(&mut self, subscriber: &dyn Subscriber<C>) -> bool {
        let id = subscriber.manage_id();
        if !self.managed.insert(id) {
            return false;
        }
        for (key, handler) in subscriber.subscriptions() {
            self.subscribe(key, handler);
        }
        true
    }

    pub fn is_managed(&self, id: InstanceId) -> bool {
        self.managed.contains(&id)
    }

    pub fn handler_count(&self, key: &EventKey) -> usize {
        self.handlers.get(key).map(Vec::len).unwrap_or(0)
    }

    /// Handlers an event reaches, in delivery order.
    pub fn route(&self, event: &Event) -> Vec<Handler<C>> {
        let mut targets = Vec::new();
        match event.emitter {
            None => targets.push(Target::Global),
            Some(emitter) => {
                if let Some(id) = emitter.instance {
                    targets.push(Target::Instance(id));
                }
                targets.push(Target::Kind(emitter.kind));
                if emitter.instance.is_some() {
                    targets.extend(emitter.kind.ancestors().into_iter().map(Target::Kind));
                }
            }
        }
        targets
            .into_iter()
            .filter_map(|target| self.handlers.get(&EventKey::new(event.name, target)))
            .flatten()
            .copied()
            .collect()
    }
}

/// Anything that owns an event bus over itself.
pub trait BusContext: Sized {
    fn bus(&self) -> &EventBus<Self>;
}

/// Deliver `event` to every handler it routes to, depth-first.
pub fn publish<C: BusContext>(ctx: &mut C, event: Event) {
    let handlers = ctx.bus().route(&event);
    debug!(name = ?event.name, emitter = ?event.emitter, handlers = handlers.len(), "publish");
    for handler in handlers {
        trace!(handler = handler.name, "fire");
        (handler.func)(ctx, &event);
    }
}
