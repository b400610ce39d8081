//! Body dispatch and the body handler registry
//!
//! Handlers are registered by media type during startup. The registry is
//! then frozen, either by moving it into an `Arc` held by a parser or by
//! installing it once process-wide, and is only read while parsing.

use crate::error::{HandlerError, MsrpError, MsrpResult};
use crate::line::split_lines;
use crate::types::{BodyItem, BodyRendering, Diagnostic};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

/// A type-specific consumer of message bodies
pub trait BodyHandler: Send + Sync {
    /// Short name used in renderings and logs
    fn name(&self) -> &'static str;

    /// Render `body`; `parameters` is the Content-Type parameter string
    ///
    /// Item ranges are relative to the start of `body`.
    fn handle(&self, body: &[u8], parameters: Option<&str>) -> Result<Vec<BodyItem>, HandlerError>;
}

/// Media type to handler table
#[derive(Default, Clone)]
pub struct BodyHandlerRegistry {
    handlers: HashMap<String, Arc<dyn BodyHandler>>,
}

impl fmt::Debug for BodyHandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyHandlerRegistry")
            .field("media_types", &self.media_types())
            .finish()
    }
}

impl BodyHandlerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the handlers shipped in [`crate::handlers`]
    pub fn with_builtin_handlers() -> Self {
        let mut registry = Self::new();
        crate::handlers::register_builtin_handlers(&mut registry);
        registry
    }

    /// Register a handler; the media type is matched ignoring ASCII case
    ///
    /// A second registration for the same media type replaces the first.
    pub fn register_body_handler(&mut self, media_type: &str, handler: impl BodyHandler + 'static) {
        let key = media_type.to_ascii_lowercase();
        debug!(media_type = %key, handler = handler.name(), "registering body handler");
        if let Some(previous) = self.handlers.insert(key, Arc::new(handler)) {
            debug!(previous = previous.name(), "replaced body handler");
        }
    }

    /// Look up the handler for a media type
    pub fn lookup(&self, media_type: &str) -> Option<&dyn BodyHandler> {
        if let Some(handler) = self.handlers.get(media_type) {
            return Some(handler.as_ref());
        }
        self.handlers
            .get(&media_type.to_ascii_lowercase())
            .map(|handler| handler.as_ref())
    }

    pub fn contains(&self, media_type: &str) -> bool {
        self.lookup(media_type).is_some()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered media types, sorted
    pub fn media_types(&self) -> Vec<&str> {
        let mut media_types: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        media_types.sort_unstable();
        media_types
    }
}

static GLOBAL_REGISTRY: OnceLock<Arc<BodyHandlerRegistry>> = OnceLock::new();

/// Install the process-wide registry; may be called once
pub fn install_global_registry(registry: BodyHandlerRegistry) -> MsrpResult<()> {
    let media_types = registry.len();
    GLOBAL_REGISTRY
        .set(Arc::new(registry))
        .map_err(|_| MsrpError::RegistryAlreadyInstalled)?;
    debug!(media_types, "installed global body handler registry");
    Ok(())
}

/// The process-wide registry, or an empty one if none was installed
///
/// Once this has been called without a prior install, the empty registry
/// stays in place.
pub fn global_registry() -> Arc<BodyHandlerRegistry> {
    GLOBAL_REGISTRY
        .get_or_init(|| Arc::new(BodyHandlerRegistry::new()))
        .clone()
}

/// Outcome of dispatching a body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub rendering: BodyRendering,
    /// Set when a registered handler failed or declined
    pub failure: Option<Diagnostic>,
}

/// Render a body with its registered handler, falling back to raw lines
///
/// A missing media type, a media type with no handler, and a handler
/// error all produce [`BodyRendering::Raw`].
pub fn dispatch_body(
    media_type: Option<&str>,
    parameters: Option<&str>,
    body: &[u8],
    registry: &BodyHandlerRegistry,
) -> Dispatch {
    let Some(media_type) = media_type else {
        debug!("no media type, rendering body as raw text");
        return raw_dispatch(body, None);
    };

    let Some(handler) = registry.lookup(media_type) else {
        debug!(media_type, "no body handler registered, rendering body as raw text");
        return raw_dispatch(body, None);
    };

    match handler.handle(body, parameters) {
        Ok(items) => Dispatch {
            rendering: BodyRendering::Handled {
                media_type: media_type.to_ascii_lowercase(),
                handler: handler.name(),
                items,
            },
            failure: None,
        },
        Err(err) => {
            warn!(media_type, handler = handler.name(), error = %err, "body handler failed, rendering body as raw text");
            raw_dispatch(
                body,
                Some(Diagnostic::HandlerFailure {
                    media_type: media_type.to_ascii_lowercase(),
                    reason: err.to_string(),
                }),
            )
        }
    }
}

/// Raw line-by-line rendering of a body
pub fn render_raw(body: &[u8]) -> BodyRendering {
    BodyRendering::Raw {
        lines: split_lines(body),
    }
}

fn raw_dispatch(body: &[u8], failure: Option<Diagnostic>) -> Dispatch {
    Dispatch {
        rendering: render_raw(body),
        failure,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TextRange;

    struct UpperHandler;

    impl BodyHandler for UpperHandler {
        fn name(&self) -> &'static str {
            "upper"
        }

        fn handle(&self, body: &[u8], parameters: Option<&str>) -> Result<Vec<BodyItem>, HandlerError> {
            let text = String::from_utf8_lossy(body).to_uppercase();
            let label = parameters.unwrap_or("text").to_string();
            Ok(vec![BodyItem::new(label, text, TextRange::new(0, body.len()))])
        }
    }

    struct FailingHandler;

    impl BodyHandler for FailingHandler {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn handle(&self, _body: &[u8], _parameters: Option<&str>) -> Result<Vec<BodyItem>, HandlerError> {
            Err(HandlerError::failed("cannot parse"))
        }
    }

    #[test]
    fn test_registration_is_case_insensitive() {
        let mut registry = BodyHandlerRegistry::new();
        registry.register_body_handler("Text/X-Upper", UpperHandler);
        assert!(registry.contains("text/x-upper"));
        assert!(registry.contains("TEXT/X-UPPER"));
        assert_eq!(registry.media_types(), vec!["text/x-upper"]);
    }

    #[test]
    fn test_reregistration_replaces() {
        let mut registry = BodyHandlerRegistry::new();
        registry.register_body_handler("text/x-upper", FailingHandler);
        registry.register_body_handler("text/x-upper", UpperHandler);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("text/x-upper").map(|h| h.name()), Some("upper"));
    }

    #[test]
    fn test_dispatch_to_handler_passes_parameters() {
        let mut registry = BodyHandlerRegistry::new();
        registry.register_body_handler("text/x-upper", UpperHandler);

        let dispatch = dispatch_body(Some("text/x-upper"), Some("charset=utf-8"), b"hi", &registry);
        assert_eq!(dispatch.failure, None);
        match dispatch.rendering {
            BodyRendering::Handled { media_type, handler, items } => {
                assert_eq!(media_type, "text/x-upper");
                assert_eq!(handler, "upper");
                assert_eq!(items[0].label, "charset=utf-8");
                assert_eq!(items[0].value, "HI");
            }
            other => panic!("expected handled rendering, got {:?}", other),
        }
    }

    #[test]
    fn test_unregistered_media_type_falls_back_to_raw() {
        let registry = BodyHandlerRegistry::new();
        let dispatch = dispatch_body(Some("application/x-custom"), None, b"a\r\nb\r\n", &registry);
        assert_eq!(
            dispatch.rendering,
            BodyRendering::Raw {
                lines: vec![TextRange::new(0, 1), TextRange::new(3, 4)]
            }
        );
        assert_eq!(dispatch.failure, None);
    }

    #[test]
    fn test_missing_media_type_falls_back_to_raw() {
        let mut registry = BodyHandlerRegistry::new();
        registry.register_body_handler("text/x-upper", UpperHandler);
        let dispatch = dispatch_body(None, None, b"abc", &registry);
        assert!(dispatch.rendering.is_raw());
    }

    #[test]
    fn test_failing_handler_falls_back_to_raw() {
        let mut registry = BodyHandlerRegistry::new();
        registry.register_body_handler("application/x-broken", FailingHandler);
        let dispatch = dispatch_body(Some("application/x-broken"), None, b"abc\r\n", &registry);
        assert!(dispatch.rendering.is_raw());
        assert_eq!(
            dispatch.failure,
            Some(Diagnostic::HandlerFailure {
                media_type: "application/x-broken".to_string(),
                reason: "failed: cannot parse".to_string(),
            })
        );
    }

    #[test]
    fn test_registry_debug_lists_media_types() {
        let mut registry = BodyHandlerRegistry::new();
        registry.register_body_handler("b/b", UpperHandler);
        registry.register_body_handler("a/a", UpperHandler);
        assert_eq!(
            format!("{:?}", registry),
            "BodyHandlerRegistry { media_types: [\"a/a\", \"b/b\"] }"
        );
    }
}
