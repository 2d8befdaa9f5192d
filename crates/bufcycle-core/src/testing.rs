//! In-memory host used by the unit tests.
//!
//! Every capability call is recorded so tests can assert on what the core
//! asked for (activations, surfaces, highlights, timers, notifications).

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::time::Duration;

use crate::command::Command;
use crate::content::Span;
use crate::cycle::BufCycle;
use crate::document::{DocumentId, DocumentInfo};
use crate::host::{
    Documents, HostError, NotifyLevel, Notifier, Overlay, OverlaySpec, Registrar, Scheduler,
    Size, SurfaceId, TimerId,
};
use crate::timer::{TimerQueue, TimerToken};

#[derive(Debug)]
pub struct MockDoc {
    pub id: DocumentId,
    pub info: DocumentInfo,
    pub listed: bool,
}

#[derive(Debug)]
pub struct MockHost {
    pub docs: Vec<MockDoc>,
    pub active: Option<DocumentId>,
    pub base: Option<PathBuf>,
    pub viewport: Size,
    pub reject: HashSet<DocumentId>,
    pub fail_overlay: bool,
    pub fail_content: bool,

    pub activations: Vec<DocumentId>,
    pub contents: HashMap<DocumentId, Vec<String>>,
    pub surfaces: HashMap<SurfaceId, (DocumentId, OverlaySpec)>,
    pub surfaces_opened: usize,
    pub surfaces_closed: usize,
    pub highlights: Vec<(DocumentId, usize, Span)>,
    pub timers: TimerQueue,
    pub cancelled: Vec<TimerId>,
    pub notifications: Vec<(NotifyLevel, String)>,
    pub commands: Vec<(String, Command)>,
    pub keys: Vec<(String, Command)>,

    next_id: u32,
    next_surface: u32,
}

impl MockHost {
    /// A host with one listed document per `(name, modified)` pair, ids
    /// starting at 1, the first one active.
    pub fn with_docs(docs: &[(&str, bool)]) -> Self {
        let mut host = Self {
            docs: Vec::new(),
            active: None,
            base: Some(PathBuf::from("/work")),
            viewport: Size::new(80, 24),
            reject: HashSet::new(),
            fail_overlay: false,
            fail_content: false,
            activations: Vec::new(),
            contents: HashMap::new(),
            surfaces: HashMap::new(),
            surfaces_opened: 0,
            surfaces_closed: 0,
            highlights: Vec::new(),
            timers: TimerQueue::new(),
            cancelled: Vec::new(),
            notifications: Vec::new(),
            commands: Vec::new(),
            keys: Vec::new(),
            next_id: 0,
            next_surface: 0,
        };
        for &(name, modified) in docs {
            host.open(name, modified, true);
        }
        host.active = host.docs.first().map(|d| d.id);
        host
    }

    /// Add a document; returns its id. Does not change the active document.
    pub fn open(&mut self, name: &str, modified: bool, listed: bool) -> DocumentId {
        self.next_id += 1;
        let id = DocumentId(self.next_id);
        let info = if name.is_empty() {
            DocumentInfo::unnamed()
        } else {
            DocumentInfo::named(name)
        };
        self.docs.push(MockDoc {
            id,
            info: info.with_modified(modified),
            listed,
        });
        id
    }

    pub fn remove(&mut self, id: DocumentId) {
        self.docs.retain(|d| d.id != id);
        if self.active == Some(id) {
            self.active = self.docs.iter().find(|d| d.listed).map(|d| d.id);
        }
    }

    /// Id of the `n`-th document (0-based) in host order.
    pub fn nth(&self, n: usize) -> DocumentId {
        self.docs[n].id
    }

    /// The single live surface's content lines, if exactly one is open.
    pub fn popup_lines(&self) -> Option<&Vec<String>> {
        if self.surfaces.len() != 1 {
            return None;
        }
        let (content, _) = self.surfaces.values().next()?;
        self.contents.get(content)
    }

    pub fn popup_spec(&self) -> Option<&OverlaySpec> {
        self.surfaces.values().next().map(|(_, spec)| spec)
    }

    /// Advance the virtual clock by `ms`, delivering due timers to `cycle`.
    pub fn wait(&mut self, cycle: &mut BufCycle, ms: u64) {
        let until = self.timers.now() + Duration::from_millis(ms);
        while let Some((_, token)) = self.timers.pop_due(until) {
            cycle.on_timer(self, token);
        }
        self.timers.advance_to(until);
    }
}

impl Documents for MockHost {
    fn documents(&self) -> Vec<DocumentId> {
        self.docs.iter().map(|d| d.id).collect()
    }

    fn is_listed(&self, id: DocumentId) -> bool {
        self.docs.iter().any(|d| d.id == id && d.listed)
    }

    fn active(&self) -> Option<DocumentId> {
        self.active
    }

    fn activate(&mut self, id: DocumentId) -> Result<(), HostError> {
        self.activations.push(id);
        if self.reject.contains(&id) || !self.docs.iter().any(|d| d.id == id) {
            return Err(HostError::InvalidDocument(id));
        }
        self.active = Some(id);
        Ok(())
    }

    fn info(&self, id: DocumentId) -> Option<DocumentInfo> {
        self.docs.iter().find(|d| d.id == id).map(|d| d.info.clone())
    }

    fn base_dir(&self) -> Option<PathBuf> {
        self.base.clone()
    }
}

impl Overlay for MockHost {
    fn viewport(&self) -> Size {
        self.viewport
    }

    fn create_content(&mut self, lines: &[String]) -> Result<DocumentId, HostError> {
        if self.fail_content {
            return Err(HostError::Other("no buffers left".into()));
        }
        self.next_id += 1;
        let id = DocumentId(self.next_id);
        self.contents.insert(id, lines.to_vec());
        Ok(id)
    }

    fn delete_content(&mut self, id: DocumentId) {
        self.contents.remove(&id);
    }

    fn open_overlay(
        &mut self,
        content: DocumentId,
        spec: &OverlaySpec,
    ) -> Result<SurfaceId, HostError> {
        if self.fail_overlay {
            return Err(HostError::Other("floating windows unavailable".into()));
        }
        self.next_surface += 1;
        let id = SurfaceId(self.next_surface);
        self.surfaces.insert(id, (content, spec.clone()));
        self.surfaces_opened += 1;
        Ok(id)
    }

    fn close_overlay(&mut self, id: SurfaceId) {
        if self.surfaces.remove(&id).is_some() {
            self.surfaces_closed += 1;
        }
    }

    fn highlight(&mut self, content: DocumentId, line: usize, span: Span) {
        self.highlights.push((content, line, span));
    }
}

impl Scheduler for MockHost {
    fn schedule(&mut self, delay: Duration, token: TimerToken) -> TimerId {
        self.timers.schedule(delay, token)
    }

    fn cancel(&mut self, id: TimerId) {
        self.cancelled.push(id);
        self.timers.cancel(id);
    }
}

impl Notifier for MockHost {
    fn notify(&mut self, level: NotifyLevel, message: &str) {
        self.notifications.push((level, message.to_string()));
    }
}

impl Registrar for MockHost {
    fn register_command(&mut self, name: &str, command: Command) {
        self.commands.push((name.to_string(), command));
    }

    fn bind_key(&mut self, key: &str, command: Command) {
        self.keys.push((key.to_string(), command));
    }
}
