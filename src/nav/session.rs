use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{HistoryRangeError, OptionError, Result};
use crate::fs::access::{FileKind, Filesystem};
use crate::fs::sort::SortOrder;
use crate::host::launcher::Launcher;
use crate::host::{Host, RegionId};

use super::bus::{
    publish, BusContext, Emitter, EmitterKind, Event, EventBus, EventKey, EventName, Handler,
    InstanceId, Payload, Subscriber, Target,
};
use super::cache::ViewCache;
use super::directory::DirectoryView;
use super::filter::FilterMode;
use super::history::History;
use super::options::Options;
use super::panel::Panel;
use super::view::{Dirty, View, ViewId};

/// Notifications the host forwards into the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    CursorMoved(RegionId),
    RegionFocused(RegionId),
}

/// What `Session::enter` should open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnterTarget {
    /// The entry focused in the main panel.
    Focused,
    /// The parent of the main directory.
    Parent,
    /// An explicit path, relative ones resolved against the main directory.
    Path(PathBuf),
    /// An entry of the main directory.
    Name(String),
}

/// Result of `Session::enter`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entered {
    /// The path is now shown in the main panel.
    Shown(PathBuf),
    /// A regular file was handed to the launcher.
    Launched(PathBuf),
    /// There was nothing to enter.
    Nothing,
}

/// Summary of the main panel for a status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub path: Option<PathBuf>,
    pub item: Option<String>,
    pub focus: Option<usize>,
    pub count: usize,
    pub sort: SortOrder,
    pub query: Option<String>,
}

/// One browsing session: the triad of panels over a shared view cache.
pub struct Session<H: Host> {
    pub(crate) host: H,
    pub(crate) fs: Box<dyn Filesystem>,
    launcher: Box<dyn Launcher>,
    pub(crate) cache: ViewCache,
    history: History,
    pub(crate) panels: [Panel; 3],
    bus: EventBus<Session<H>>,
    pub(crate) options: Options,
    /// Main view and focus line last announced with `focus_changed`.
    pub(crate) last_focus: Option<(ViewId, Option<usize>)>,
}

impl<H: Host> fmt::Debug for Session<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("panels", &self.panels)
            .field("views", &self.cache.len())
            .field("history", &self.history)
            .field("options", &self.options)
            .finish()
    }
}

impl<H: Host> BusContext for Session<H> {
    fn bus(&self) -> &EventBus<Self> {
        &self.bus
    }
}

/// Session-wide rules that belong to no single panel.
struct Coordinator;

impl<H: Host> Subscriber<Session<H>> for Coordinator {
    fn manage_id(&self) -> InstanceId {
        InstanceId::Session
    }

    fn subscriptions(&self) -> Vec<(EventKey, Handler<Session<H>>)> {
        vec![
            (
                EventKey::new(EventName::ViewLoaded, Target::Kind(EmitterKind::MainPanel)),
                Handler::new("session.record_history", record_history::<H>),
            ),
            (
                EventKey::new(EventName::RegionFocused, Target::Kind(EmitterKind::Region)),
                Handler::new("session.keep_main_focused", keep_main_focused::<H>),
            ),
        ]
    }
}

fn record_history<H: Host>(s: &mut Session<H>, event: &Event) {
    let Payload::ViewLoaded { view, .. } = event.payload else {
        return;
    };
    if let Some(path) = s.cache.get(view).and_then(View::path) {
        let path = path.to_path_buf();
        s.history.add(&path);
        debug!(history = %s.history, "history updated");
    }
}

fn keep_main_focused<H: Host>(s: &mut Session<H>, event: &Event) {
    if let Payload::Region(region) = event.payload {
        if region != RegionId::Main {
            s.host.focus_region(RegionId::Main);
        }
    }
}

fn slot(region: RegionId) -> usize {
    match region {
        RegionId::Left => 0,
        RegionId::Main => 1,
        RegionId::Right => 2,
    }
}

impl<H: Host> Session<H> {
    pub fn new(
        host: H,
        fs: Box<dyn Filesystem>,
        launcher: Box<dyn Launcher>,
        options: Options,
    ) -> Self {
        let panels = RegionId::ALL.map(Panel::new);
        let mut bus: EventBus<Self> = EventBus::new();
        for panel in &panels {
            bus.manage(panel);
        }
        bus.manage(&Coordinator);
        Self {
            host,
            fs,
            launcher,
            cache: ViewCache::new(),
            history: History::new(),
            panels,
            bus,
            options,
            last_focus: None,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn cache(&self) -> &ViewCache {
        &self.cache
    }

    pub fn panel(&self, region: RegionId) -> &Panel {
        &self.panels[slot(region)]
    }

    pub(crate) fn panel_mut(&mut self, region: RegionId) -> &mut Panel {
        &mut self.panels[slot(region)]
    }

    /// View currently shown in `region`.
    pub fn view_in(&self, region: RegionId) -> Option<&View> {
        self.panel(region).view().and_then(|id| self.cache.get(id))
    }

    pub fn main_directory(&self) -> Option<&DirectoryView> {
        self.view_in(RegionId::Main).and_then(View::as_directory)
    }

    /// Path of the directory shown in the main panel.
    pub fn current_path(&self) -> Option<&Path> {
        self.view_in(RegionId::Main).and_then(View::path)
    }

    pub fn focused_item(&self) -> Option<&Path> {
        self.main_directory().and_then(DirectoryView::focused_item)
    }

    /// Single entry point for host notifications.
    pub fn handle_event(&mut self, event: HostEvent) {
        let (name, region) = match event {
            HostEvent::CursorMoved(region) => (EventName::CursorMoved, region),
            HostEvent::RegionFocused(region) => (EventName::RegionFocused, region),
        };
        publish(
            self,
            Event::new(
                Emitter::instance(EmitterKind::Region, InstanceId::Region(region)),
                name,
                Payload::Region(region),
            ),
        );
    }

    /// Open `target`: directories (and unreadable paths) are shown in the
    /// main panel, regular files go to the launcher.
    pub fn enter(&mut self, target: EnterTarget) -> Result<Entered> {
        let current = self.current_path().map(Path::to_path_buf);
        let path = match target {
            EnterTarget::Focused => match self.focused_item() {
                Some(item) => item.to_path_buf(),
                None => return Ok(Entered::Nothing),
            },
            EnterTarget::Parent => match current.as_deref().and_then(Path::parent) {
                Some(parent) => parent.to_path_buf(),
                None => return Ok(Entered::Nothing),
            },
            EnterTarget::Path(path) => match &current {
                Some(dir) if path.is_relative() => dir.join(path),
                _ => path,
            },
            EnterTarget::Name(name) => match &current {
                Some(dir) => dir.join(name),
                None => return Ok(Entered::Nothing),
            },
        };

        if let Ok(stat) = self.fs.stat(&path, true) {
            if stat.kind == FileKind::Regular {
                info!(path = %path.display(), "opening file");
                self.launcher.open(&path)?;
                return Ok(Entered::Launched(path));
            }
        }

        info!(path = %path.display(), "entering");
        self.show_in_main(&path);
        // Coming back up, focus the directory we came from.
        if let Some(child) = current.filter(|c| c.parent() == Some(path.as_path())) {
            self.focus_main_on(&child);
        }
        Ok(Entered::Shown(path))
    }

    fn show_in_main(&mut self, path: &Path) {
        self.load_key(RegionId::Main, Some(path));
        self.handle_event(HostEvent::CursorMoved(RegionId::Main));
    }

    /// Focus the main entry named like `path` and move the cursor there.
    pub fn focus_main_on(&mut self, path: &Path) -> bool {
        let Some(id) = self.panel(RegionId::Main).view() else {
            return false;
        };
        let Some(dir) = self.cache.get_mut(id).and_then(View::as_directory_mut) else {
            return false;
        };
        if !dir.set_focused_item_by_path(path) {
            return false;
        }
        if let Some(focus) = dir.focus() {
            self.host.set_cursor(RegionId::Main, focus, 0);
        }
        self.handle_event(HostEvent::CursorMoved(RegionId::Main));
        true
    }

    /// Move `step` entries through the history and show that entry.
    ///
    /// Out of range steps leave everything untouched.
    pub fn go_history(&mut self, step: isize) -> std::result::Result<PathBuf, HistoryRangeError> {
        let path = self.history.go(step)?;
        debug!(step, path = %path.display(), "history jump");
        self.show_in_main(&path);
        Ok(path)
    }

    /// Change a runtime option and bring every visible panel up to date.
    pub fn set_option(&mut self, key: &str, value: &str) -> std::result::Result<(), OptionError> {
        let level = self.options.set(key, value)?;
        info!(key, value, "option set");
        if level > Dirty::Clean {
            self.cache.mark_directories_dirty(level);
            for region in RegionId::ALL {
                self.refresh_panel(region, false);
            }
            self.handle_event(HostEvent::CursorMoved(RegionId::Main));
        }
        publish(
            self,
            Event::global(
                EventName::OptionChanged,
                Payload::Option {
                    key: key.to_string(),
                },
            ),
        );
        Ok(())
    }

    /// Re-read everything that is shown.
    ///
    /// Views whose path disappeared are evicted unless a panel still shows
    /// them; shown ones re-render their error instead.
    pub fn refresh_all(&mut self) {
        self.cache.mark_all_dirty();
        let shown: Vec<ViewId> = self.panels.iter().filter_map(Panel::view).collect();
        let vanished: Vec<_> = self
            .cache
            .keys()
            .filter(|key| {
                key.as_deref()
                    .is_some_and(|p| self.fs.stat(p, false).is_err())
            })
            .filter(|key| {
                self.cache
                    .id_for(key)
                    .is_some_and(|id| !shown.contains(&id))
            })
            .cloned()
            .collect();
        for key in vanished {
            self.cache.evict(&key, &mut self.host);
        }
        for region in RegionId::ALL {
            self.refresh_panel(region, false);
        }
        self.last_focus = None;
        self.handle_event(HostEvent::CursorMoved(RegionId::Main));
        info!(views = self.cache.len(), "refreshed");
    }

    /// Filter the main directory. An empty query clears the filter.
    pub fn filter(&mut self, query: &str, mode: Option<FilterMode>) {
        if query.is_empty() {
            self.clear_filter();
            return;
        }
        let mode = mode.unwrap_or(self.options.filter_mode);
        let Some(id) = self.panel(RegionId::Main).view() else {
            return;
        };
        let Some(view) = self.cache.get_mut(id) else {
            return;
        };
        let surface = view.surface;
        let Some(dir) = view.as_directory_mut() else {
            warn!("filter on a non-directory view");
            return;
        };
        dir.filter(mode, query);
        self.host.set_folds(surface, dir.folds());
        if let Some(focus) = dir.focus() {
            self.host.set_cursor(RegionId::Main, focus, 0);
        }
        self.handle_event(HostEvent::CursorMoved(RegionId::Main));
    }

    pub fn clear_filter(&mut self) {
        let Some(id) = self.panel(RegionId::Main).view() else {
            return;
        };
        let Some(view) = self.cache.get_mut(id) else {
            return;
        };
        let surface = view.surface;
        let Some(dir) = view.as_directory_mut() else {
            return;
        };
        dir.clear_filter();
        self.host.set_folds(surface, &[]);
        if let Some(focus) = dir.focus() {
            self.host.set_cursor(RegionId::Main, focus, 0);
        }
        self.handle_event(HostEvent::CursorMoved(RegionId::Main));
    }

    pub fn status(&self) -> Status {
        let dir = self.main_directory();
        Status {
            path: self.current_path().map(Path::to_path_buf),
            item: self
                .focused_item()
                .and_then(Path::file_name)
                .map(|n| n.to_string_lossy().to_string()),
            focus: dir.and_then(DirectoryView::focus),
            count: dir.map(DirectoryView::len).unwrap_or(0),
            sort: self.options.sort,
            query: dir.and_then(|d| d.query().map(str::to_string)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::access::LocalFs;
    use crate::host::buffers::BufferHost;
    use std::cell::RefCell;
    use std::fs;
    use std::io;
    use std::rc::Rc;
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct RecordingLauncher(Rc<RefCell<Vec<PathBuf>>>);

    impl Launcher for RecordingLauncher {
        fn open(&mut self, path: &Path) -> io::Result<()> {
            self.0.borrow_mut().push(path.to_path_buf());
            Ok(())
        }
    }

    /// root/
    ///   alpha/ (one.txt, two.txt)
    ///   beta/  (empty)
    ///   notes.txt
    ///
    /// `root` sits inside the temp dir so it is not hidden in its parent.
    fn setup_tree() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("root");
        fs::create_dir(&root).unwrap();
        fs::create_dir(root.join("alpha")).unwrap();
        fs::write(root.join("alpha").join("one.txt"), "first\n").unwrap();
        fs::write(root.join("alpha").join("two.txt"), "second\n").unwrap();
        fs::create_dir(root.join("beta")).unwrap();
        fs::write(root.join("notes.txt"), "hello\nworld\n").unwrap();
        (dir, root)
    }

    fn session_with(launcher: RecordingLauncher) -> Session<BufferHost> {
        let options = Options {
            columns: Vec::new(),
            ..Options::default()
        };
        Session::new(
            BufferHost::new(),
            Box::new(LocalFs),
            Box::new(launcher),
            options,
        )
    }

    fn session() -> Session<BufferHost> {
        session_with(RecordingLauncher::default())
    }

    fn lines(s: &Session<BufferHost>, region: RegionId) -> Vec<String> {
        s.host().lines(region)
    }

    fn move_main(s: &mut Session<BufferHost>, delta: isize) {
        s.host_mut().move_cursor(RegionId::Main, delta);
        s.handle_event(HostEvent::CursorMoved(RegionId::Main));
    }

    #[test]
    fn entering_a_directory_fills_the_triad() {
        let (_tmp, root) = setup_tree();
        let mut s = session();
        assert_eq!(
            s.enter(EnterTarget::Path(root.clone())).unwrap(),
            Entered::Shown(root.clone())
        );

        assert_eq!(lines(&s, RegionId::Main), vec!["alpha/", "beta/", "notes.txt"]);
        // Right previews the focused first entry.
        assert_eq!(lines(&s, RegionId::Right), vec!["one.txt", "two.txt"]);
        // Left shows the parent focused on the directory we are in.
        let parent = root.parent().unwrap();
        let left = s.view_in(RegionId::Left).unwrap();
        assert_eq!(left.path(), Some(parent));
        assert_eq!(
            left.as_directory().unwrap().focused_item(),
            Some(root.as_path())
        );
        assert_eq!(s.history().entries(), &[root]);
    }

    #[test]
    fn loading_the_shown_view_again_is_a_no_op() {
        let (_tmp, root) = setup_tree();
        let mut s = session();
        s.enter(EnterTarget::Path(root.clone())).unwrap();
        let main_id = s.panel(RegionId::Main).view().unwrap();
        let left_id = s.panel(RegionId::Left).view().unwrap();
        // Following main would clear this filter on the left view.
        s.cache
            .get_mut(left_id)
            .unwrap()
            .as_directory_mut()
            .unwrap()
            .filter(FilterMode::Substring, "zzz");

        s.load_view(RegionId::Main, main_id);

        assert_eq!(s.history().entries(), &[root]);
        assert_eq!(s.panel(RegionId::Main).view(), Some(main_id));
        assert_eq!(s.panel(RegionId::Left).view(), Some(left_id));
        assert!(s
            .view_in(RegionId::Left)
            .unwrap()
            .as_directory()
            .unwrap()
            .is_filtered());
    }

    #[test]
    fn moving_the_cursor_updates_the_preview() {
        let (_tmp, root) = setup_tree();
        let mut s = session();
        s.enter(EnterTarget::Path(root.clone())).unwrap();

        move_main(&mut s, 1);
        assert_eq!(s.status().item.as_deref(), Some("beta"));
        assert_eq!(lines(&s, RegionId::Right), vec!["(directory empty)"]);

        move_main(&mut s, 1);
        assert_eq!(lines(&s, RegionId::Right), vec!["hello", "world"]);
    }

    #[test]
    fn empty_directory_previews_nothing() {
        let (_tmp, root) = setup_tree();
        let mut s = session();
        s.enter(EnterTarget::Path(root.join("beta"))).unwrap();
        assert_eq!(lines(&s, RegionId::Main), vec!["(directory empty)"]);
        assert_eq!(lines(&s, RegionId::Right), vec!["(nothing to show)"]);
        assert!(!s.host().region(RegionId::Main).cursor_line);
    }

    #[test]
    fn enter_focused_then_parent_restores_focus() {
        let (_tmp, root) = setup_tree();
        let mut s = session();
        s.enter(EnterTarget::Path(root.clone())).unwrap();
        move_main(&mut s, 1);
        move_main(&mut s, -1);
        s.enter(EnterTarget::Focused).unwrap();
        assert_eq!(s.current_path(), Some(root.join("alpha").as_path()));
        assert_eq!(lines(&s, RegionId::Left), vec!["alpha/", "beta/", "notes.txt"]);
        assert_eq!(s.host().cursor(RegionId::Left), (1, 0));

        move_main(&mut s, 1);
        s.enter(EnterTarget::Parent).unwrap();
        assert_eq!(s.current_path(), Some(root.as_path()));
        assert_eq!(s.status().item.as_deref(), Some("alpha"));
        assert_eq!(s.host().cursor(RegionId::Main), (1, 0));
    }

    #[test]
    fn entering_a_file_launches_it() {
        let (_tmp, root) = setup_tree();
        let launcher = RecordingLauncher::default();
        let mut s = session_with(launcher.clone());
        s.enter(EnterTarget::Path(root.clone())).unwrap();
        let entered = s.enter(EnterTarget::Name("notes.txt".into())).unwrap();
        assert_eq!(entered, Entered::Launched(root.join("notes.txt")));
        assert_eq!(launcher.0.borrow().as_slice(), &[root.join("notes.txt")]);
        assert_eq!(s.current_path(), Some(root.as_path()));
    }

    #[test]
    fn missing_path_shows_an_error_message() {
        let (_tmp, root) = setup_tree();
        let mut s = session();
        s.enter(EnterTarget::Path(root.join("ghost"))).unwrap();
        let main = lines(&s, RegionId::Main);
        assert!(main[0].contains("No such file or directory"));
        assert!(s.host().bound(RegionId::Main).is_some());
    }

    #[test]
    fn root_has_nothing_on_the_left() {
        let mut s = session();
        s.enter(EnterTarget::Path(PathBuf::from("/"))).unwrap();
        assert_eq!(lines(&s, RegionId::Left), vec!["(nothing to show)"]);
        assert_eq!(s.enter(EnterTarget::Parent).unwrap(), Entered::Nothing);
    }

    #[test]
    fn history_back_and_forward() {
        let (_tmp, root) = setup_tree();
        let mut s = session();
        s.enter(EnterTarget::Path(root.clone())).unwrap();
        s.enter(EnterTarget::Name("alpha".into())).unwrap();
        s.enter(EnterTarget::Path(root.join("beta"))).unwrap();

        assert_eq!(s.go_history(-2).unwrap(), root);
        assert_eq!(s.current_path(), Some(root.as_path()));
        assert_eq!(s.history().len(), 3);
        assert_eq!(s.go_history(1).unwrap(), root.join("alpha"));
        assert_eq!(s.go_history(5), Err(HistoryRangeError));
        assert_eq!(s.current_path(), Some(root.join("alpha").as_path()));
    }

    #[test]
    fn filter_hides_rows_and_moves_focus() {
        let (_tmp, root) = setup_tree();
        let mut s = session();
        s.enter(EnterTarget::Path(root.clone())).unwrap();
        s.filter("notes", None);

        let main = s.host().bound(RegionId::Main).unwrap();
        assert_eq!(main.folds, vec![(1, 2)]);
        assert_eq!(s.host().cursor(RegionId::Main), (3, 0));
        assert_eq!(lines(&s, RegionId::Right), vec!["hello", "world"]);
        assert_eq!(s.status().query.as_deref(), Some("notes"));

        // Moving up into the fold bounces back to the only visible line.
        move_main(&mut s, -1);
        assert_eq!(s.host().cursor(RegionId::Main), (3, 0));

        s.filter("", None);
        assert!(s.host().bound(RegionId::Main).unwrap().folds.is_empty());
        assert_eq!(s.status().focus, Some(3));
    }

    #[test]
    fn filter_without_match_clears_preview() {
        let (_tmp, root) = setup_tree();
        let mut s = session();
        s.enter(EnterTarget::Path(root.clone())).unwrap();
        s.filter("zzz", Some(FilterMode::Prefix));
        assert_eq!(s.status().focus, None);
        assert_eq!(lines(&s, RegionId::Right), vec!["(nothing to show)"]);
        s.clear_filter();
        assert_eq!(s.status().focus, Some(1));
        assert_eq!(lines(&s, RegionId::Right), vec!["one.txt", "two.txt"]);
    }

    #[test]
    fn leaving_a_filtered_directory_clears_its_filter() {
        let (_tmp, root) = setup_tree();
        let mut s = session();
        s.enter(EnterTarget::Path(root.clone())).unwrap();
        s.filter("alpha", None);
        s.enter(EnterTarget::Focused).unwrap();
        let left = s.view_in(RegionId::Left).unwrap().as_directory().unwrap();
        assert!(!left.is_filtered());
        assert!(s.host().bound(RegionId::Left).unwrap().folds.is_empty());
    }

    #[test]
    fn resort_follows_the_focused_entry() {
        let (_tmp, root) = setup_tree();
        let mut s = session();
        s.enter(EnterTarget::Path(root.clone())).unwrap();
        move_main(&mut s, 1);
        assert_eq!(s.status().focus, Some(2));

        s.set_option("sort", "alpha_reverse").unwrap();
        assert_eq!(lines(&s, RegionId::Main), vec!["notes.txt", "beta/", "alpha/"]);
        assert_eq!(s.status().item.as_deref(), Some("beta"));
        assert_eq!(s.status().focus, Some(2));

        move_main(&mut s, -1);
        s.set_option("sort", "alpha").unwrap();
        assert_eq!(s.status().item.as_deref(), Some("notes.txt"));
        assert_eq!(s.host().cursor(RegionId::Main), (3, 0));
    }

    #[test]
    fn hidden_toggle_relists() {
        let (_tmp, root) = setup_tree();
        fs::write(root.join(".dotfile"), "").unwrap();
        let mut s = session();
        s.enter(EnterTarget::Path(root.clone())).unwrap();
        assert_eq!(s.status().count, 3);
        s.set_option("hidden", "true").unwrap();
        assert_eq!(s.status().count, 4);
        assert!(s.set_option("hidden", "sometimes").is_err());
    }

    #[test]
    fn refresh_picks_up_changes_and_evicts_vanished_views() {
        let (_tmp, root) = setup_tree();
        let mut s = session();
        s.enter(EnterTarget::Path(root.clone())).unwrap();
        move_main(&mut s, 1);
        move_main(&mut s, 1);
        // alpha was previewed earlier and is no longer shown anywhere.
        let alpha = Some(root.join("alpha"));
        assert!(s.cache().id_for(&alpha).is_some());

        fs::remove_dir_all(root.join("alpha")).unwrap();
        fs::write(root.join("new.txt"), "").unwrap();
        s.refresh_all();

        assert!(s.cache().id_for(&alpha).is_none());
        assert_eq!(lines(&s, RegionId::Main), vec!["beta/", "new.txt", "notes.txt"]);
        assert_eq!(s.status().item.as_deref(), Some("notes.txt"));
        assert_eq!(lines(&s, RegionId::Right), vec!["hello", "world"]);
    }

    #[test]
    fn side_regions_hand_focus_back_to_main() {
        let mut s = session();
        s.host_mut().focus_region(RegionId::Left);
        s.handle_event(HostEvent::RegionFocused(RegionId::Left));
        assert_eq!(s.host().focused(), RegionId::Main);
    }

    #[test]
    fn views_are_shared_between_panels() {
        let (_tmp, root) = setup_tree();
        let mut s = session();
        s.enter(EnterTarget::Path(root.clone())).unwrap();
        let previewed = s.panel(RegionId::Right).view();
        s.enter(EnterTarget::Focused).unwrap();
        assert_eq!(s.panel(RegionId::Main).view(), previewed);
        let before = s.cache().len();
        s.enter(EnterTarget::Parent).unwrap();
        s.enter(EnterTarget::Focused).unwrap();
        assert_eq!(s.cache().len(), before);
    }
}
