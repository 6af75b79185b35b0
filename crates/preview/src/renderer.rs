//! The preview renderer.
//!
//! A render cycle moves through `Idle -> Composing -> Loading -> Executing ->
//! Idle`. When direct document access is refused, `Loading` returns straight
//! to `Idle` through the fallback load; that is not an error.

use crate::bridge::bridge_script;
use crate::config::PreviewConfig;
use crate::history::DiagnosticLog;
use crate::relay::{RelayInbox, RelayPort, relay_channel, stringify_arg};
use livepen_composer::compose;
use livepen_traits::{ContextError, IsolatedContext};
use livepen_types::{DiagnosticEntry, DiagnosticKind, SourceBundle};
use log::{debug, info, warn};
use serde::Serialize;

/// Where the renderer is within a render cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    Idle,
    Composing,
    Loading,
    Executing,
}

/// How the last document reached the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPath {
    /// Written through direct document access.
    Direct,
    /// Loaded through the fallback path; no bridge could be injected.
    Fallback,
    /// No context exists; nothing was loaded.
    Unavailable,
}

/// Summary of one completed render cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOutcome {
    pub cycle: u64,
    pub path: LoadPath,
    /// Whether console output of this cycle is relayed to the host.
    pub bridged: bool,
    /// Size of the composed document in bytes.
    pub document_len: usize,
}

/// Owns the isolated context, the diagnostic log and the host end of the
/// console relay.
#[derive(Debug)]
pub struct PreviewRenderer<C: IsolatedContext = Box<dyn IsolatedContext>> {
    context: Result<C, ContextError>,
    log: DiagnosticLog,
    port: RelayPort,
    inbox: RelayInbox,
    phase: RenderPhase,
    last_outcome: Option<RenderOutcome>,
}

impl<C: IsolatedContext> PreviewRenderer<C> {
    /// Creates a renderer over `context` with the default configuration.
    pub fn new(context: C) -> Self {
        Self::with_config(PreviewConfig::default(), Ok(context))
    }

    /// Creates a renderer from the result of instantiating a context.
    ///
    /// If instantiation failed, every render reports the failure as a single
    /// error entry instead of loading anything.
    pub fn with_config(config: PreviewConfig, context: Result<C, ContextError>) -> Self {
        if let Err(err) = &context {
            warn!("Preview renderer started without a context: {}", err);
        }
        let (port, inbox) = relay_channel(config.relay_capacity);
        Self {
            context,
            log: DiagnosticLog::new(config.log_threshold, config.log_retain),
            port,
            inbox,
            phase: RenderPhase::Idle,
            last_outcome: None,
        }
    }

    /// A port for the host listener on the isolation boundary.
    pub fn port(&self) -> RelayPort {
        self.port.clone()
    }

    pub fn phase(&self) -> RenderPhase {
        self.phase
    }

    pub fn last_outcome(&self) -> Option<RenderOutcome> {
        self.last_outcome
    }

    pub fn current_cycle(&self) -> u64 {
        self.inbox.current_cycle()
    }

    pub fn has_context(&self) -> bool {
        self.context.is_ok()
    }

    pub fn context(&self) -> Option<&C> {
        self.context.as_ref().ok()
    }

    /// Composes `bundle` and fully replaces the context's document with it.
    ///
    /// Clears the log and starts a new cycle first, so console output of
    /// earlier documents can no longer reach the log. Never fails.
    pub fn render(&mut self, bundle: &SourceBundle) -> RenderOutcome {
        self.transition(RenderPhase::Composing);
        let document = compose(bundle);

        self.clear();
        let cycle = self.inbox.begin_cycle();

        if let Err(err) = &self.context {
            let message = format!("Preview unavailable: {err}");
            self.log.append(DiagnosticKind::Error, vec![message]);
            return self.finish(cycle, LoadPath::Unavailable, false, document.len());
        }

        self.transition(RenderPhase::Loading);
        let Ok(context) = self.context.as_mut() else {
            unreachable!("context checked above");
        };
        debug!(
            "Cycle {}: loading {} bytes into {}",
            cycle,
            document.len(),
            context.name()
        );
        match context.write_direct(document.as_str()) {
            Ok(()) => {
                let bridged = match context.inject_script(&bridge_script(cycle)) {
                    Ok(()) => true,
                    Err(err) => {
                        warn!("Cycle {}: console bridge not injected: {}", cycle, err);
                        false
                    }
                };
                self.transition(RenderPhase::Executing);
                self.finish(cycle, LoadPath::Direct, bridged, document.len())
            }
            Err(err) => {
                debug!("Cycle {}: direct access refused ({}), using fallback", cycle, err);
                context.load_fallback(document.as_str());
                self.finish(cycle, LoadPath::Fallback, false, document.len())
            }
        }
    }

    /// Moves every pending relay message into the log.
    ///
    /// Returns the number of entries appended.
    pub fn pump(&mut self) -> usize {
        let messages = self.inbox.drain();
        let count = messages.len();
        for message in messages {
            self.log.append(message.method.kind(), message.args);
        }
        count
    }

    /// Appends one entry, evicting old entries if the log is over its bound.
    pub fn append_entry(&mut self, kind: DiagnosticKind, args: Vec<String>) {
        let evicted = self.log.append(kind, args);
        if evicted > 0 {
            debug!("Evicted {} old diagnostic entries", evicted);
        }
    }

    /// Appends one entry built from arbitrary serializable arguments.
    pub fn append_values<T: Serialize>(&mut self, kind: DiagnosticKind, args: &[T]) {
        let rendered = args.iter().map(|arg| stringify_arg(arg)).collect();
        self.append_entry(kind, rendered);
    }

    /// Records a host-side failure as a single error entry.
    pub fn log_host_error(&mut self, message: impl Into<String>) {
        self.append_entry(DiagnosticKind::Error, vec![message.into()]);
    }

    pub fn clear(&mut self) {
        self.log.clear();
    }

    pub fn log(&self) -> &DiagnosticLog {
        &self.log
    }

    pub fn entries(&self) -> impl Iterator<Item = &DiagnosticEntry> {
        self.log.iter()
    }

    fn transition(&mut self, next: RenderPhase) {
        debug!("Preview phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }

    fn finish(
        &mut self,
        cycle: u64,
        path: LoadPath,
        bridged: bool,
        document_len: usize,
    ) -> RenderOutcome {
        self.transition(RenderPhase::Idle);
        let outcome = RenderOutcome {
            cycle,
            path,
            bridged,
            document_len,
        };
        info!("Render cycle {} finished via {:?}", cycle, path);
        self.last_outcome = Some(outcome);
        outcome
    }
}
