//! Contains the common [`ErrorKind`] trait used by all errors to display user-facing error
//! messages.

use ariadne::{Color, Report, Source};
use std::{any::Any, fmt::Debug, ops::Range};

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur while resolving a batch of tasks.
pub trait ErrorKind: Debug + Send {
    /// Returns this error kind as a [`&dyn Any`](Any), enabling downcasting to the concrete kind.
    fn as_any(&self) -> &dyn Any;

    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)>;
}

/// An error associated with regions of source text that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source text that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given spans and kind.
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind) }
    }

    /// Returns true if the underlying kind is an instance of `T`.
    pub fn is<T: ErrorKind + 'static>(&self) -> bool {
        self.kind.as_any().is::<T>()
    }

    /// Returns a reference to the underlying kind if it is an instance of `T`.
    pub fn downcast<T: ErrorKind + 'static>(&self) -> Option<&T> {
        self.kind.as_any().downcast_ref::<T>()
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }

    /// Builds the report for this error and prints it to stderr, resolving the spans against the
    /// given source text.
    pub fn report_to_stderr(&self, src_id: &str, source: &str) {
        // an unwritable stderr is not actionable here
        let _ = self.build_report(src_id).eprint((src_id, Source::from(source)));
    }
}
