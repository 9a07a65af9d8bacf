//! Panels and the rules that keep the three of them in step.
//!
//! The main panel shows the current directory. The left panel follows it
//! with the parent directory, focused on the directory just shown in main.
//! The right panel previews whatever the main focus selects.

use std::path::Path;

use tracing::{debug, warn};

use crate::host::{Host, RegionId};

use super::bus::{
    publish, Emitter, EmitterKind, Event, EventKey, EventName, Handler, InstanceId, Payload,
    Subscriber, Target,
};
use super::session::Session;
use super::view::ViewId;

/// A display region plus the view it currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panel {
    region: RegionId,
    view: Option<ViewId>,
}

impl Panel {
    pub fn new(region: RegionId) -> Self {
        Self { region, view: None }
    }

    pub fn region(&self) -> RegionId {
        self.region
    }

    pub fn view(&self) -> Option<ViewId> {
        self.view
    }

    pub fn emitter_kind(&self) -> EmitterKind {
        match self.region {
            RegionId::Left => EmitterKind::LeftPanel,
            RegionId::Main => EmitterKind::MainPanel,
            RegionId::Right => EmitterKind::RightPanel,
        }
    }

    pub fn emitter(&self) -> Emitter {
        Emitter::instance(self.emitter_kind(), InstanceId::Panel(self.region))
    }
}

impl<H: Host> Subscriber<Session<H>> for Panel {
    fn manage_id(&self) -> InstanceId {
        InstanceId::Panel(self.region)
    }

    fn subscriptions(&self) -> Vec<(EventKey, Handler<Session<H>>)> {
        let from_main = |name| EventKey::new(name, Target::Kind(EmitterKind::MainPanel));
        match self.region {
            RegionId::Left => vec![(
                from_main(EventName::ViewLoaded),
                Handler::new("left.follow_main", left_follow_main::<H>),
            )],
            RegionId::Main => vec![
                (
                    EventKey::new(
                        EventName::CursorMoved,
                        Target::Instance(InstanceId::Region(RegionId::Main)),
                    ),
                    Handler::new("main.cursor_moved", main_cursor_moved::<H>),
                ),
                (
                    EventKey::new(EventName::CursorAdjusted, Target::Kind(EmitterKind::View)),
                    Handler::new("main.snap_cursor", main_snap_cursor::<H>),
                ),
            ],
            RegionId::Right => vec![
                (
                    from_main(EventName::FocusChanged),
                    Handler::new("right.preview_focus", right_preview_focus::<H>),
                ),
                (
                    from_main(EventName::ViewLoaded),
                    Handler::new("right.empty_directory", right_empty_directory::<H>),
                ),
            ],
        }
    }
}

impl<H: Host> Session<H> {
    /// Show view `id` in `region`.
    ///
    /// Loading the view a panel already shows does nothing. Otherwise the
    /// previous view is unloaded, the new one is bound, initialized and
    /// drawn as owed, and `view_loaded` is published before the region
    /// cursor is moved to the view's cursor.
    pub fn load_view(&mut self, region: RegionId, id: ViewId) {
        let previous = self.panel(region).view;
        if previous == Some(id) {
            return;
        }
        if let Some(prev) = previous {
            let shown_elsewhere = self
                .panels
                .iter()
                .any(|p| p.region != region && p.view == Some(prev));
            if !shown_elsewhere {
                if let Some(view) = self.cache.get_mut(prev) {
                    view.unload(&mut self.host);
                }
            }
        }

        let Some(view) = self.cache.get_mut(id) else {
            warn!(view = id.0, "load of unknown view");
            return;
        };
        self.host.bind_surface(region, view.surface);
        view.prepare(&*self.fs, &self.options, &mut self.host);
        view.configure_region(&mut self.host, region);
        let cursor = view.cursor();
        debug!(region = region.label(), view = id.0, key = ?view.key, "view loaded");

        let panel = self.panel_mut(region);
        panel.view = Some(id);
        let emitter = panel.emitter();
        publish(
            self,
            Event::new(
                emitter,
                EventName::ViewLoaded,
                Payload::ViewLoaded { panel: region, view: id },
            ),
        );
        if let Some((line, col)) = cursor {
            self.host.set_cursor(region, line, col);
        }
    }

    /// Load the view for `key` into `region`, creating it if needed.
    pub fn load_key(&mut self, region: RegionId, key: Option<&Path>) -> ViewId {
        let key = key.map(Path::to_path_buf);
        let id = self.cache.get_or_create(&key, &*self.fs, &mut self.host);
        self.load_view(region, id);
        id
    }

    /// Re-run whatever the panel's view owes, without swapping views.
    ///
    /// With `force` the view re-reads its source first.
    pub fn refresh_panel(&mut self, region: RegionId, force: bool) {
        let Some(id) = self.panel(region).view else {
            return;
        };
        let Some(view) = self.cache.get_mut(id) else {
            return;
        };
        if force {
            view.mark(super::view::Dirty::Init);
        }
        view.prepare(&*self.fs, &self.options, &mut self.host);
        view.configure_region(&mut self.host, region);
        if let Some((line, col)) = view.cursor() {
            self.host.set_cursor(region, line, col);
        }
    }
}

fn loaded_view(event: &Event) -> Option<ViewId> {
    match event.payload {
        Payload::ViewLoaded { view, .. } => Some(view),
        _ => None,
    }
}

/// Show the parent of the new main view, focused on the main directory.
fn left_follow_main<H: Host>(s: &mut Session<H>, event: &Event) {
    let Some(main_id) = loaded_view(event) else {
        return;
    };
    let Some(path) = s.cache.get(main_id).and_then(|v| v.key.clone()) else {
        s.load_key(RegionId::Left, None);
        return;
    };
    let Some(parent) = path.parent() else {
        // The filesystem root has nothing to its left.
        s.load_key(RegionId::Left, None);
        return;
    };
    let id = s.load_key(RegionId::Left, Some(parent));
    let Some(view) = s.cache.get_mut(id) else {
        return;
    };
    let surface = view.surface;
    if let Some(dir) = view.as_directory_mut() {
        if dir.is_filtered() {
            dir.clear_filter();
            s.host.set_folds(surface, &[]);
        }
        dir.set_focused_item_by_path(&path);
        if let Some(focus) = dir.focus() {
            s.host.set_cursor(RegionId::Left, focus, 0);
        }
    }
}

/// Track the main cursor with the directory focus.
fn main_cursor_moved<H: Host>(s: &mut Session<H>, _event: &Event) {
    let Some(id) = s.panel(RegionId::Main).view else {
        return;
    };
    let (line, _) = s.host.cursor(RegionId::Main);
    let Some(view) = s.cache.get_mut(id) else {
        return;
    };
    let emitter = Emitter::instance(view.emitter_kind(), InstanceId::View(id));
    let (adjusted, focus, item) = match view.as_directory_mut() {
        Some(dir) => {
            let adjusted = dir.set_cursor(line);
            (
                adjusted,
                dir.focus(),
                dir.focused_item().map(Path::to_path_buf),
            )
        }
        None => (false, None, None),
    };
    if adjusted {
        publish(
            s,
            Event::new(emitter, EventName::CursorAdjusted, Payload::CursorAdjusted { view: id }),
        );
    }
    if s.last_focus != Some((id, focus)) {
        s.last_focus = Some((id, focus));
        let emitter = s.panel(RegionId::Main).emitter();
        publish(
            s,
            Event::new(
                emitter,
                EventName::FocusChanged,
                Payload::FocusChanged { view: id, item },
            ),
        );
    }
}

/// Put the main cursor back on the focus line after the view overrode it.
fn main_snap_cursor<H: Host>(s: &mut Session<H>, event: &Event) {
    let Payload::CursorAdjusted { view } = event.payload else {
        return;
    };
    if s.panel(RegionId::Main).view != Some(view) {
        return;
    }
    if let Some((line, col)) = s.cache.get(view).and_then(|v| v.cursor()) {
        s.host.set_cursor(RegionId::Main, line, col);
    }
}

/// Preview the newly focused entry.
fn right_preview_focus<H: Host>(s: &mut Session<H>, event: &Event) {
    let Payload::FocusChanged { item, .. } = &event.payload else {
        return;
    };
    let item = item.clone();
    s.load_key(RegionId::Right, item.as_deref());
}

/// An empty main directory leaves nothing to preview.
fn right_empty_directory<H: Host>(s: &mut Session<H>, event: &Event) {
    let Some(main_id) = loaded_view(event) else {
        return;
    };
    let empty = s
        .cache
        .get(main_id)
        .and_then(|v| v.as_directory())
        .is_some_and(|d| d.is_empty());
    if empty {
        s.load_key(RegionId::Right, None);
    }
}
