//! Builder for [`EditorSession`].

use crate::defaults::starter_bundle;
use crate::session::EditorSession;
use crate::settings::EditorSettings;
use livepen_preview::{PreviewConfig, PreviewRenderer};
use livepen_traits::{ContextError, IsolatedContext};
use livepen_types::SourceBundle;

/// Configures and creates an [`EditorSession`].
///
/// # Example
///
/// ```ignore
/// let session = SessionBuilder::new()
///     .with_settings(EditorSettings::default().with_tab_size(2))
///     .with_context(InMemoryContext::new())
///     .build();
/// ```
#[derive(Debug)]
pub struct SessionBuilder<C: IsolatedContext = Box<dyn IsolatedContext>> {
    preview_config: PreviewConfig,
    settings: EditorSettings,
    bundle: Option<SourceBundle>,
    context: Option<Result<C, ContextError>>,
}

impl<C: IsolatedContext> Default for SessionBuilder<C> {
    fn default() -> Self {
        Self {
            preview_config: PreviewConfig::default(),
            settings: EditorSettings::default(),
            bundle: None,
            context: None,
        }
    }
}

impl<C: IsolatedContext> SessionBuilder<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preview_config(mut self, config: PreviewConfig) -> Self {
        self.preview_config = config;
        self
    }

    pub fn with_settings(mut self, settings: EditorSettings) -> Self {
        self.settings = settings.normalized();
        self
    }

    /// Initial buffers. Defaults to the starter project.
    pub fn with_bundle(mut self, bundle: SourceBundle) -> Self {
        self.bundle = Some(bundle);
        self
    }

    pub fn with_context(mut self, context: C) -> Self {
        self.context = Some(Ok(context));
        self
    }

    /// Takes the outcome of instantiating a context, failure included.
    pub fn with_context_result(mut self, context: Result<C, ContextError>) -> Self {
        self.context = Some(context);
        self
    }

    /// Builds the session. Without a context, every run reports the preview
    /// as unavailable.
    pub fn build(self) -> EditorSession<C> {
        let context = self.context.unwrap_or_else(|| {
            Err(ContextError::Unavailable(
                "no isolated context configured".to_string(),
            ))
        });
        EditorSession::from_parts(
            self.bundle.unwrap_or_else(starter_bundle),
            self.settings,
            PreviewRenderer::with_config(self.preview_config, context),
        )
    }
}
