use std::collections::HashMap;

use tracing::{debug, info};

use crate::fs::access::{FileKind, Filesystem};
use crate::host::{Host, StyleId};

use super::directory::DirectoryView;
use super::view::{Dirty, FileView, MessageView, View, ViewId, ViewKey, ViewKind};

/// Arena of views, at most one per key.
#[derive(Debug, Default)]
pub struct ViewCache {
    by_key: HashMap<ViewKey, ViewId>,
    views: HashMap<ViewId, View>,
    next_id: u64,
}

/// Decide which kind of view shows `key`.
fn classify(key: &ViewKey, fs: &dyn Filesystem) -> ViewKind {
    let Some(path) = key else {
        return ViewKind::Empty;
    };
    match fs.stat(path, true) {
        Err(err) => ViewKind::Message(MessageView::error(&err)),
        Ok(stat) => match stat.kind {
            FileKind::Directory => ViewKind::Directory(DirectoryView::new(path.clone())),
            FileKind::Regular => ViewKind::File(FileView::new(path.clone())),
            other => ViewKind::Message(MessageView::new(
                format!("({})", other.description()),
                StyleId::Message,
            )),
        },
    }
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The view for `key`, created on first request.
    ///
    /// An existing view is returned untouched, without looking at the
    /// filesystem again.
    pub fn get_or_create(
        &mut self,
        key: &ViewKey,
        fs: &dyn Filesystem,
        host: &mut dyn Host,
    ) -> ViewId {
        if let Some(id) = self.by_key.get(key) {
            return *id;
        }
        let kind = classify(key, fs);
        self.next_id += 1;
        let id = ViewId(self.next_id);
        let surface = host.create_surface();
        let view = View::new(id, key.clone(), surface, kind);
        info!(view = id.0, ?key, kind = ?view.emitter_kind(), "view created");
        self.views.insert(id, view);
        self.by_key.insert(key.clone(), id);
        id
    }

    pub fn get(&self, id: ViewId) -> Option<&View> {
        self.views.get(&id)
    }

    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut View> {
        self.views.get_mut(&id)
    }

    pub fn id_for(&self, key: &ViewKey) -> Option<ViewId> {
        self.by_key.get(key).copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ViewKey> {
        self.by_key.keys()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Require every view to re-read its source before it is shown again.
    pub fn mark_all_dirty(&mut self) {
        for view in self.views.values_mut() {
            view.dirty = Dirty::Init;
        }
        debug!(views = self.views.len(), "all views marked dirty");
    }

    pub fn mark_directories_dirty(&mut self, level: Dirty) {
        for view in self.views.values_mut() {
            if view.as_directory().is_some() {
                view.mark(level);
            }
        }
    }

    /// Drop the view for `key` and dispose its surface.
    pub fn evict(&mut self, key: &ViewKey, host: &mut dyn Host) -> Option<ViewId> {
        let id = self.by_key.remove(key)?;
        if let Some(view) = self.views.remove(&id) {
            host.dispose_surface(view.surface);
        }
        info!(view = id.0, ?key, "view evicted");
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::access::LocalFs;
    use crate::host::buffers::BufferHost;
    use crate::nav::bus::EmitterKind;
    use std::fs;
    use std::os::unix::net::UnixListener;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn key(path: PathBuf) -> ViewKey {
        Some(path)
    }

    #[test]
    fn same_key_returns_same_view() {
        let dir = TempDir::new().unwrap();
        let mut cache = ViewCache::new();
        let mut host = BufferHost::new();
        let k = key(dir.path().to_path_buf());
        let a = cache.get_or_create(&k, &LocalFs, &mut host);
        let b = cache.get_or_create(&k, &LocalFs, &mut host);
        assert_eq!(a, b);
        assert_eq!(cache.len(), 1);
        assert_eq!(host.surface_count(), 1);
    }

    #[test]
    fn existing_view_is_not_reclassified() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("thing");
        fs::write(&path, "x").unwrap();
        let mut cache = ViewCache::new();
        let mut host = BufferHost::new();
        let id = cache.get_or_create(&key(path.clone()), &LocalFs, &mut host);
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();
        assert_eq!(cache.get_or_create(&key(path), &LocalFs, &mut host), id);
        assert!(matches!(cache.get(id).unwrap().kind, ViewKind::File(_)));
    }

    #[test]
    fn classification_by_file_type() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("f"), "x").unwrap();
        let sock = dir.path().join("sock");
        let _listener = UnixListener::bind(&sock).unwrap();
        let mut cache = ViewCache::new();
        let mut host = BufferHost::new();

        let mut kind_of = |k: ViewKey| {
            let id = cache.get_or_create(&k, &LocalFs, &mut host);
            cache.get(id).unwrap().emitter_kind()
        };
        assert_eq!(kind_of(None), EmitterKind::EmptyView);
        assert_eq!(kind_of(key(dir.path().to_path_buf())), EmitterKind::DirectoryView);
        assert_eq!(kind_of(key(dir.path().join("f"))), EmitterKind::FileView);
        assert_eq!(kind_of(key(sock.clone())), EmitterKind::MessageView);
        assert_eq!(kind_of(key(dir.path().join("missing"))), EmitterKind::MessageView);

        let id = cache.id_for(&key(sock)).unwrap();
        match &cache.get(id).unwrap().kind {
            ViewKind::Message(m) => assert_eq!(m.text(), "(socket)"),
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn mark_all_dirty_keeps_views() {
        let dir = TempDir::new().unwrap();
        let mut cache = ViewCache::new();
        let mut host = BufferHost::new();
        let id = cache.get_or_create(&key(dir.path().to_path_buf()), &LocalFs, &mut host);
        cache.get_mut(id).unwrap().dirty = Dirty::Clean;
        cache.mark_all_dirty();
        assert_eq!(cache.get(id).unwrap().dirty, Dirty::Init);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn mark_directories_only_touches_directories() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("f"), "x").unwrap();
        let mut cache = ViewCache::new();
        let mut host = BufferHost::new();
        let d = cache.get_or_create(&key(dir.path().to_path_buf()), &LocalFs, &mut host);
        let f = cache.get_or_create(&key(dir.path().join("f")), &LocalFs, &mut host);
        for id in [d, f] {
            cache.get_mut(id).unwrap().dirty = Dirty::Clean;
        }
        cache.mark_directories_dirty(Dirty::Redraw);
        assert_eq!(cache.get(d).unwrap().dirty, Dirty::Redraw);
        assert_eq!(cache.get(f).unwrap().dirty, Dirty::Clean);
    }

    #[test]
    fn evict_disposes_surface_and_allows_recreation() {
        let dir = TempDir::new().unwrap();
        let mut cache = ViewCache::new();
        let mut host = BufferHost::new();
        let k = key(dir.path().to_path_buf());
        let first = cache.get_or_create(&k, &LocalFs, &mut host);
        assert_eq!(cache.evict(&k, &mut host), Some(first));
        assert_eq!(host.surface_count(), 0);
        assert!(cache.get(first).is_none());
        assert_eq!(cache.evict(&k, &mut host), None);
        let second = cache.get_or_create(&k, &LocalFs, &mut host);
        assert_ne!(first, second);
    }
}
