// SPDX-License-Identifier: MIT
//
// Reference host — an in-memory editor that drives `BufCycle`.
//
// `SessionHost` implements every host capability on plain data: a document
// list, content buffers, surfaces, a virtual-clock timer queue, registered
// commands and keys. `Session` pairs it with a `BufCycle` and applies script
// steps to both, emitting the same notifications a real editor would.
//
// Popup content buffers live outside the document list. They are never
// reported as added or removed, so a popup render can never feed back into
// the lifecycle reactions.
//
// The screen is a character grid: the status line on the last row, then
// every open surface painted in the order it was opened.

use std::collections::{BTreeMap, HashMap};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use bufcycle_core::content::Span;
use bufcycle_core::host::{
    Documents, HostError, NotifyLevel, Notifier, Overlay, OverlaySpec, Registrar, Scheduler, Size,
    SurfaceId, TimerId,
};
use bufcycle_core::timer::TimerQueue;
use bufcycle_core::{BufCycle, Command, Config, DocumentId, DocumentInfo, TimerToken};
use bufcycle_screen::output::{self, Style};
use bufcycle_screen::{Grid, Mark, overlay};
use thiserror::Error;

use crate::script::{self, ParseError, Step};

/// A step that could not be applied.
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("no document {0}")]
    NoDocument(u32),

    #[error("no binding for key `{0}`")]
    UnboundKey(String),

    #[error("command `{0}` is not registered")]
    Unregistered(Command),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A script failure, with the 1-based line it happened on.
#[derive(Debug, Error)]
#[error("line {line}: {source}")]
pub struct ScriptError {
    pub line: usize,
    #[source]
    pub source: StepError,
}

// ---------------------------------------------------------------------------
// SessionHost
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Document {
    id: DocumentId,
    info: DocumentInfo,
    listed: bool,
}

#[derive(Debug, Default)]
struct Content {
    lines: Vec<String>,
    spans: Vec<(usize, Span)>,
}

/// In-memory host state.
#[derive(Debug)]
pub struct SessionHost {
    docs: Vec<Document>,
    active: Option<DocumentId>,
    base: Option<PathBuf>,
    home: Option<PathBuf>,
    viewport: Size,
    contents: HashMap<DocumentId, Content>,
    surfaces: BTreeMap<SurfaceId, (DocumentId, OverlaySpec)>,
    timers: TimerQueue,
    commands: HashMap<String, Command>,
    keys: HashMap<String, Command>,
    notifications: Vec<(NotifyLevel, String)>,
    next_id: u32,
    next_surface: u32,
}

impl SessionHost {
    #[must_use]
    pub fn new(viewport: Size, base: Option<PathBuf>, home: Option<PathBuf>) -> Self {
        Self {
            docs: Vec::new(),
            active: None,
            base,
            home,
            viewport,
            contents: HashMap::new(),
            surfaces: BTreeMap::new(),
            timers: TimerQueue::new(),
            commands: HashMap::new(),
            keys: HashMap::new(),
            notifications: Vec::new(),
            next_id: 0,
            next_surface: 0,
        }
    }

    const fn allocate_id(&mut self) -> DocumentId {
        self.next_id += 1;
        DocumentId(self.next_id)
    }

    /// Add a document and make it active. Relative paths are taken against
    /// the base directory.
    pub fn open(&mut self, path: Option<&str>, listed: bool) -> DocumentId {
        let id = self.allocate_id();
        let info = match path {
            Some(p) => DocumentInfo::named(self.resolve(Path::new(p))),
            None => DocumentInfo::unnamed(),
        };
        self.docs.push(Document { id, info, listed });
        self.active = Some(id);
        tracing::debug!(%id, listed, "document opened");
        id
    }

    /// Drop a document. If it was active, the next listed document after it
    /// becomes active, else the closest one before it.
    pub fn remove(&mut self, id: DocumentId) -> bool {
        let Some(pos) = self.docs.iter().position(|d| d.id == id) else {
            return false;
        };
        self.docs.remove(pos);
        if self.active == Some(id) {
            self.active = self.docs[pos..]
                .iter()
                .find(|d| d.listed)
                .or_else(|| self.docs[..pos].iter().rev().find(|d| d.listed))
                .map(|d| d.id);
        }
        tracing::debug!(%id, active = ?self.active, "document removed");
        true
    }

    pub fn contains(&self, id: DocumentId) -> bool {
        self.docs.iter().any(|d| d.id == id)
    }

    pub fn set_modified(&mut self, id: DocumentId, modified: bool) -> bool {
        match self.docs.iter_mut().find(|d| d.id == id) {
            Some(doc) => {
                doc.info.modified = modified;
                true
            }
            None => false,
        }
    }

    /// Make `id` active without involving the cycler.
    pub fn focus(&mut self, id: DocumentId) -> bool {
        if self.contains(id) {
            self.active = Some(id);
            true
        } else {
            false
        }
    }

    pub const fn resize(&mut self, size: Size) {
        self.viewport = size;
    }

    /// The command bound to `key`, if any.
    #[must_use]
    pub fn key(&self, key: &str) -> Option<Command> {
        self.keys.get(key).copied()
    }

    /// Whether `command` was registered by name.
    #[must_use]
    pub fn is_registered(&self, command: Command) -> bool {
        self.commands.get(command.name()) == Some(&command)
    }

    #[cfg(test)]
    #[must_use]
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.timers.now()
    }

    /// Take the notifications raised since the last call.
    pub fn take_notifications(&mut self) -> Vec<(NotifyLevel, String)> {
        std::mem::take(&mut self.notifications)
    }

    /// Paint the whole screen.
    #[must_use]
    pub fn paint(&self) -> Grid {
        let mut grid = Grid::new(self.viewport.cols, self.viewport.rows);

        if let Some(last) = self.viewport.rows.checked_sub(1) {
            grid.fill(0, last, self.viewport.cols, 1, " ", Mark::STATUS);
            grid.put_str(0, last, &self.status_line(), Mark::STATUS);
        }

        for (content, spec) in self.surfaces.values() {
            if let Some(body) = self.contents.get(content) {
                overlay::paint(&mut grid, spec, &body.lines, &body.spans);
            }
        }
        grid
    }

    fn status_line(&self) -> String {
        let Some(info) = self.active.and_then(|id| self.info(id)) else {
            return String::new();
        };
        let name = info.display_name(self.base.as_deref(), self.home.as_deref());
        if info.modified {
            format!(" {name} [+]")
        } else {
            format!(" {name}")
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    fn fire_due(&mut self, cycle: &mut BufCycle, until: Duration) {
        while let Some((id, token)) = self.timers.pop_due(until) {
            tracing::trace!(timer = id.0, ?token, "timer fired");
            cycle.on_timer(self, token);
        }
        self.timers.advance_to(until);
    }
}

impl Documents for SessionHost {
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
        if !self.contains(id) {
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

    fn home_dir(&self) -> Option<PathBuf> {
        self.home.clone()
    }
}

impl Overlay for SessionHost {
    fn viewport(&self) -> Size {
        self.viewport
    }

    fn create_content(&mut self, lines: &[String]) -> Result<DocumentId, HostError> {
        let id = self.allocate_id();
        self.contents.insert(
            id,
            Content {
                lines: lines.to_vec(),
                spans: Vec::new(),
            },
        );
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
        if !self.contents.contains_key(&content) {
            return Err(HostError::InvalidDocument(content));
        }
        self.next_surface += 1;
        let id = SurfaceId(self.next_surface);
        self.surfaces.insert(id, (content, spec.clone()));
        Ok(id)
    }

    fn close_overlay(&mut self, id: SurfaceId) {
        self.surfaces.remove(&id);
    }

    fn highlight(&mut self, content: DocumentId, line: usize, span: Span) {
        if let Some(body) = self.contents.get_mut(&content) {
            body.spans.push((line, span));
        }
    }
}

impl Scheduler for SessionHost {
    fn schedule(&mut self, delay: Duration, token: TimerToken) -> TimerId {
        self.timers.schedule(delay, token)
    }

    fn cancel(&mut self, id: TimerId) {
        self.timers.cancel(id);
    }
}

impl Notifier for SessionHost {
    fn notify(&mut self, level: NotifyLevel, message: &str) {
        self.notifications.push((level, message.to_string()));
    }
}

impl Registrar for SessionHost {
    fn register_command(&mut self, name: &str, command: Command) {
        self.commands.insert(name.to_string(), command);
    }

    fn bind_key(&mut self, key: &str, command: Command) {
        self.keys.insert(key.to_string(), command);
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A host and the cycler it drives.
#[derive(Debug)]
pub struct Session {
    host: SessionHost,
    cycle: BufCycle,
    style: Style,
}

impl Session {
    #[must_use]
    pub fn new(mut host: SessionHost, config: Config, style: Style) -> Self {
        let cycle = BufCycle::setup(&mut host, config);
        Self { host, cycle, style }
    }

    #[cfg(test)]
    #[must_use]
    pub const fn host(&self) -> &SessionHost {
        &self.host
    }

    #[cfg(test)]
    #[must_use]
    pub const fn cycle(&self) -> &BufCycle {
        &self.cycle
    }

    /// Apply one step. `show` and notifications are written to `out`.
    ///
    /// # Errors
    ///
    /// Fails when the step names a document or key that does not exist, or
    /// when writing to `out` fails.
    pub fn apply(&mut self, step: Step, out: &mut impl Write) -> Result<(), StepError> {
        tracing::trace!(?step, "apply");
        match step {
            Step::Open(path) => {
                let id = self.host.open(path.as_deref(), true);
                self.cycle.on_document_added(&mut self.host, id);
            }
            Step::Scratch => {
                let id = self.host.open(None, false);
                self.cycle.on_document_added(&mut self.host, id);
            }
            Step::Close(n) => {
                let id = self.existing(n)?;
                self.cycle.on_document_removed(&mut self.host, id);
                self.host.remove(id);
            }
            Step::Modify(n) => {
                let id = self.existing(n)?;
                self.host.set_modified(id, true);
            }
            Step::Save(n) => {
                let id = self.existing(n)?;
                self.host.set_modified(id, false);
            }
            Step::Focus(n) => {
                let id = self.existing(n)?;
                self.host.focus(id);
            }
            Step::Run(command) => {
                if !self.host.is_registered(command) {
                    return Err(StepError::Unregistered(command));
                }
                self.cycle.run(&mut self.host, command);
            }
            Step::Key(key) => {
                let command = self.host.key(&key).ok_or(StepError::UnboundKey(key))?;
                self.cycle.run(&mut self.host, command);
            }
            Step::Wait(ms) => {
                let until = self.host.now() + Duration::from_millis(ms);
                self.host.fire_due(&mut self.cycle, until);
            }
            Step::Resize(size) => self.host.resize(size),
            Step::Show => writeln!(out, "{}", self.screen())?,
        }

        for (level, message) in self.host.take_notifications() {
            writeln!(out, "[{}] {message}", level_name(level))?;
        }
        Ok(())
    }

    /// Parse and apply every line of `text`, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first failing line and why it failed.
    pub fn run_script(&mut self, text: &str, out: &mut impl Write) -> Result<(), ScriptError> {
        for (i, line) in text.lines().enumerate() {
            let at = |source: StepError| ScriptError {
                line: i + 1,
                source,
            };
            let Some(step) = script::parse_line(line).map_err(|e| at(e.into()))? else {
                continue;
            };
            self.apply(step, out).map_err(at)?;
        }
        Ok(())
    }

    /// The current screen in the session's output style.
    #[must_use]
    pub fn screen(&self) -> String {
        output::render(&self.host.paint(), self.style)
    }

    fn existing(&self, n: u32) -> Result<DocumentId, StepError> {
        let id = DocumentId(n);
        if self.host.contains(id) {
            Ok(id)
        } else {
            Err(StepError::NoDocument(n))
        }
    }
}

const fn level_name(level: NotifyLevel) -> &'static str {
    match level {
        NotifyLevel::Info => "info",
        NotifyLevel::Warn => "warn",
        NotifyLevel::Error => "error",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
