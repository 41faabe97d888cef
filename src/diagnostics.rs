//! Unified, `miette`-based diagnostic system for the recipe engine. Every
//! failure mode in the crate — signature analysis, rewriting, assembly, and
//! generated-function invocation — is a [`RecipeError`] carrying an
//! [`ErrorContext`] (optional source, optional span, optional help).
//!
//! # Error construction
//!
//! - Use `err_msg!` for message-only errors: `err_msg!(Eval, "unknown function `{}`", name)`
//! - Use `err_ctx!` for errors with a span (and optionally help or a source):
//!   `err_ctx!(Malformed, "attribute key must be a name", span)`
//! - `RecipeError::unsupported` builds the one structured variant, raised when
//!   a `require`-flagged attribute is rejected by the backend predicate.
//!
//! Do not construct `ErrorContext` by hand at call sites; the macros and
//! constructors cover the normal cases. Spans are optional throughout: trees
//! built programmatically carry default spans, and diagnostics degrade to
//! message + help when no source text exists.

use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use thiserror::Error;

use crate::ast::Span;

pub type SourceArc = Arc<NamedSource<String>>;

/// Type-safe error classification that corresponds to RecipeError variants.
/// Test code matches on this instead of parsing rendered messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// Signature analysis failures: non-call-form, nothing to dispatch on,
    /// misplaced keyword sub-list, bad parameter shapes
    Signature,
    /// Structurally malformed attribute-set or series-block shapes
    Malformed,
    /// Runtime evaluation failures: unknown functions, undefined names, arity
    Eval,
    /// Ill-typed builtin arguments (e.g. string where number expected)
    TypeError,
    /// No registered recipe matches the invocation's argument types
    Dispatch,
    /// A `require`-flagged attribute the backend does not support
    Unsupported,
    /// Internal engine errors (recursion ceiling, broken invariants)
    Internal,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Signature => "Signature",
            ErrorType::Malformed => "Malformed",
            ErrorType::Eval => "Eval",
            ErrorType::TypeError => "TypeError",
            ErrorType::Dispatch => "Dispatch",
            ErrorType::Unsupported => "Unsupported",
            ErrorType::Internal => "Internal",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Minimal, composable error context for diagnostics.
#[derive(Debug, Default)]
pub struct ErrorContext {
    /// The primary source for this error (if any).
    pub source: Option<SourceArc>,
    /// The primary span for this error (if any).
    pub span: Option<Span>,
    /// An optional help message.
    pub help: Option<String>,
}

impl ErrorContext {
    /// Returns an empty error context (no source, span, or help).
    pub fn none() -> Self {
        Self::default()
    }

    /// Creates a context with only a span.
    pub fn with_span(span: Span) -> Self {
        Self {
            source: None,
            span: Some(span),
            help: None,
        }
    }

    /// Creates a context with source, span, and help message.
    pub fn with_all(source: SourceArc, span: Span, help: String) -> Self {
        Self {
            source: Some(source),
            span: Some(span),
            help: Some(help),
        }
    }
}

/// Unified error type for all recipe-engine failure modes, supporting error
/// chaining through the standard `source` mechanism.
#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("Signature error: {message}")]
    Signature {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Malformed recipe: {message}")]
    Malformed {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Evaluation error: {message}")]
    Eval {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Type error: {message}")]
    TypeError {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Dispatch error: {message}")]
    Dispatch {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("required attribute `{key}` is not supported by backend `{backend}`")]
    Unsupported {
        key: String,
        backend: String,
        ctx: ErrorContext,
    },
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
}

impl RecipeError {
    /// Builds the invocation-time failure for a `require`-flagged attribute
    /// the backend rejects.
    pub fn unsupported(key: impl Into<String>, backend: impl Into<String>, span: Span) -> Self {
        RecipeError::Unsupported {
            key: key.into(),
            backend: backend.into(),
            ctx: ErrorContext::with_span(span),
        }
    }

    fn get_ctx(&self) -> &ErrorContext {
        match self {
            RecipeError::Signature { ctx, .. } => ctx,
            RecipeError::Malformed { ctx, .. } => ctx,
            RecipeError::Eval { ctx, .. } => ctx,
            RecipeError::TypeError { ctx, .. } => ctx,
            RecipeError::Dispatch { ctx, .. } => ctx,
            RecipeError::Unsupported { ctx, .. } => ctx,
            RecipeError::Internal { ctx, .. } => ctx,
        }
    }

    /// Returns the type-safe error classification for this error.
    pub fn error_type(&self) -> ErrorType {
        match self {
            RecipeError::Signature { .. } => ErrorType::Signature,
            RecipeError::Malformed { .. } => ErrorType::Malformed,
            RecipeError::Eval { .. } => ErrorType::Eval,
            RecipeError::TypeError { .. } => ErrorType::TypeError,
            RecipeError::Dispatch { .. } => ErrorType::Dispatch,
            RecipeError::Unsupported { .. } => ErrorType::Unsupported,
            RecipeError::Internal { .. } => ErrorType::Internal,
        }
    }

    fn label_text(&self) -> String {
        match self {
            RecipeError::Signature { message, .. } => message.clone(),
            RecipeError::Malformed { message, .. } => message.clone(),
            RecipeError::Eval { message, .. } => message.clone(),
            RecipeError::TypeError { message, .. } => message.clone(),
            RecipeError::Dispatch { message, .. } => message.clone(),
            RecipeError::Unsupported { key, backend, .. } => {
                format!("`{key}` rejected by backend `{backend}`")
            }
            RecipeError::Internal { message, .. } => message.clone(),
        }
    }
}

impl Diagnostic for RecipeError {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        None
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.get_ctx()
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn std::fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.get_ctx()
            .source
            .as_ref()
            .map(|s| s.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.get_ctx().span?;
        let len = if span.end > span.start {
            span.end - span.start
        } else {
            1
        };
        let label = LabeledSpan::new(Some(self.label_text()), span.start, len);
        Some(Box::new(std::iter::once(label)))
    }
}

/// Converts a source string into an `Arc<NamedSource<String>>` for use in
/// error contexts, for front-ends that do track source text.
pub fn to_error_source<S: AsRef<str>>(source: S) -> SourceArc {
    Arc::new(NamedSource::new("recipe", source.as_ref().to_string()))
}

/// Constructs a RecipeError variant with a formatted message and no context.
///
/// Use this macro for errors that do not require source, span, or help.
/// Supports formatting with trailing arguments.
#[macro_export]
macro_rules! err_msg {
    // Message with format arguments
    ($variant:ident, $msg:expr, $($arg:expr),+) => {
        $crate::RecipeError::$variant {
            message: format!($msg, $($arg),+),
            ctx: $crate::ErrorContext { source: None, span: None, help: None },
            source: None,
        }
    };
    // Message only
    ($variant:ident, $msg:expr) => {
        $crate::RecipeError::$variant {
            message: format!("{}", $msg),
            ctx: $crate::ErrorContext { source: None, span: None, help: None },
            source: None,
        }
    };
}

/// Constructs a RecipeError variant with a message and context. The common
/// arms take a `Span` (plus an optional help string); the widest arm also
/// accepts a pre-built source for front-ends that have one.
#[macro_export]
macro_rules! err_ctx {
    // Message, src, span, help
    ($variant:ident, $msg:expr, $src:expr, $span:expr, $help:expr) => {
        $crate::RecipeError::$variant {
            message: $msg.to_string(),
            ctx: $crate::ErrorContext {
                source: Some($crate::diagnostics::SourceArc::clone($src)),
                span: Some($span),
                help: Some(format!("{}", $help)),
            },
            source: None,
        }
    };
    // Message, span, help
    ($variant:ident, $msg:expr, $span:expr, $help:expr) => {
        $crate::RecipeError::$variant {
            message: $msg.to_string(),
            ctx: $crate::ErrorContext {
                source: None,
                span: Some($span),
                help: Some(format!("{}", $help)),
            },
            source: None,
        }
    };
    // Message, span
    ($variant:ident, $msg:expr, $span:expr) => {
        $crate::RecipeError::$variant {
            message: $msg.to_string(),
            ctx: $crate::ErrorContext {
                source: None,
                span: Some($span),
                help: None,
            },
            source: None,
        }
    };
}

#[cfg(test)]
mod diagnostics_tests {
    use miette::{NamedSource, Report};

    use super::*;

    #[test]
    fn test_span_label_and_help() {
        let src = Arc::new(NamedSource::new(
            "wave.recipe",
            "color --> :red".to_string(),
        ));
        let span = Span { start: 0, end: 5 };
        let ctx = ErrorContext::with_all(
            src,
            span,
            "attribute keys must be names, symbols, or strings".to_string(),
        );
        let err = RecipeError::Malformed {
            message: "attribute key must be a literal name".to_string(),
            ctx,
            source: None,
        };
        let report = Report::new(err);
        let output = format!("{report:?}");
        assert!(output.contains("attribute key must be a literal name"));
        assert!(output.contains("attribute keys must be names, symbols, or strings"));
    }

    #[test]
    fn test_error_chaining() {
        let cause = err_msg!(Eval, "unknown function `{}`", "lerp");
        let err = RecipeError::Dispatch {
            message: "recipe body failed".to_string(),
            ctx: ErrorContext::none(),
            source: Some(Box::new(cause)),
        };
        let report = Report::new(err);
        let output = format!("{report:?}");
        assert!(output.contains("recipe body failed"));
        assert!(output.contains("unknown function `lerp`"));
    }

    #[test]
    fn test_unsupported_carries_key_and_backend() {
        let err = RecipeError::unsupported("marker", "gdraw", Span::default());
        assert_eq!(err.error_type(), ErrorType::Unsupported);
        let rendered = err.to_string();
        assert!(rendered.contains("`marker`"));
        assert!(rendered.contains("`gdraw`"));
        match err {
            RecipeError::Unsupported { key, backend, .. } => {
                assert_eq!(key, "marker");
                assert_eq!(backend, "gdraw");
            }
            other => panic!("expected Unsupported, got {other:?}"),
        }
    }

    #[test]
    fn test_spanless_errors_render() {
        let err = err_msg!(Signature, "recipe signature must be call-form");
        let report = Report::new(err);
        let output = format!("{report:?}");
        assert!(output.contains("recipe signature must be call-form"));
    }
}
