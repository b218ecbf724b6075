//! Replication-span validation.
//!
//! Walks a [`Template`] in document order with an explicit stack of open
//! replication contexts. Every item below a header (descriptor, malformed
//! placeholder or nested replication) counts as one unit toward the
//! innermost open context; when a context closes, its unit count must match
//! the declared width. Each context is judged on its own, so a short inner
//! group never causes its parents to be reported unless they are short too.

use bufrcheck_syntax::{Category, Descriptor, Diagnostic, Node, ReplicationNode, Span, Template};
use smallvec::SmallVec;
use std::fmt;
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IterationError {
    WidthMismatch { header: Descriptor, expected: usize, actual: usize, span: Span },
    MissingDelayedCount { header: Descriptor, span: Span },
    InvalidDelayedCount { header: Descriptor, found: Descriptor, span: Span },
}

impl IterationError {
    pub fn span(&self) -> Span {
        match self {
            IterationError::WidthMismatch { span, .. } => *span,
            IterationError::MissingDelayedCount { span, .. } => *span,
            IterationError::InvalidDelayedCount { span, .. } => *span,
        }
    }
}

impl fmt::Display for IterationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IterationError::WidthMismatch { expected, actual, .. } => {
                write!(f, "expected {}, got {}", expected, actual)
            }
            IterationError::MissingDelayedCount { header, .. } => {
                write!(f, "missing delayed-count descriptor after delayed replication {}", header)
            }
            IterationError::InvalidDelayedCount { header, found, .. } => {
                write!(
                    f,
                    "invalid delayed-count descriptor {} after delayed replication {}",
                    found, header
                )
            }
        }
    }
}

impl std::error::Error for IterationError {}

impl From<IterationError> for Diagnostic {
    fn from(err: IterationError) -> Self {
        Diagnostic::new(Category::Iteration, err.to_string(), err.span())
    }
}

/// Lifecycle of one open replication context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    HeaderSeen,
    AwaitingDelayedMarker,
    AccumulatingBody,
    Closed,
    ClosedWithIterationError,
}

#[derive(Debug)]
struct ReplicationContext {
    header: Descriptor,
    span: Span,
    expected: usize,
    consumed: usize,
    state: ContextState,
}

impl ReplicationContext {
    fn transition(&mut self, next: ContextState) {
        trace!(header = %self.header, from = ?self.state, to = ?next, "replication state");
        self.state = next;
    }
}

enum Visit<'t> {
    Enter(&'t Node),
    Leave,
}

/// Stack-based walker that collects [`IterationError`]s.
#[derive(Debug, Default)]
pub struct ReplicationValidator {
    contexts: SmallVec<[ReplicationContext; 8]>,
    errors: Vec<IterationError>,
    closed: usize,
}

impl ReplicationValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(mut self, template: &Template) -> Vec<IterationError> {
        let mut pending: Vec<Visit<'_>> = template.children.iter().rev().map(Visit::Enter).collect();

        while let Some(visit) = pending.pop() {
            match visit {
                Visit::Enter(node) => {
                    self.count_unit();
                    match node {
                        Node::Descriptor(_) | Node::Invalid { .. } => {}
                        Node::Replication(replication) => {
                            self.open(replication);
                            pending.push(Visit::Leave);
                            pending.extend(replication.children.iter().rev().map(Visit::Enter));
                        }
                    }
                }
                Visit::Leave => self.close(),
            }
        }

        debug!(
            groups = self.closed,
            errors = self.errors.len(),
            "replication validation finished"
        );
        self.errors
    }

    fn count_unit(&mut self) {
        if let Some(innermost) = self.contexts.last_mut() {
            innermost.consumed += 1;
        }
    }

    fn open(&mut self, replication: &ReplicationNode) {
        let mut context = ReplicationContext {
            header: replication.header,
            span: replication.span,
            expected: usize::from(replication.spec.width),
            consumed: 0,
            state: ContextState::HeaderSeen,
        };
        if replication.spec.is_delayed() {
            context.transition(ContextState::AwaitingDelayedMarker);
            match &replication.delayed_count {
                None => self.errors.push(IterationError::MissingDelayedCount {
                    header: replication.header,
                    span: replication.span,
                }),
                Some(count) if !count.descriptor.is_delayed_factor() => {
                    self.errors.push(IterationError::InvalidDelayedCount {
                        header: replication.header,
                        found: count.descriptor,
                        span: replication.span,
                    })
                }
                Some(_) => {}
            }
        }

        context.transition(ContextState::AccumulatingBody);
        self.contexts.push(context);
    }

    fn close(&mut self) {
        let Some(mut context) = self.contexts.pop() else {
            return;
        };

        if context.consumed == context.expected {
            context.transition(ContextState::Closed);
        } else {
            context.transition(ContextState::ClosedWithIterationError);
            self.errors.push(IterationError::WidthMismatch {
                header: context.header,
                expected: context.expected,
                actual: context.consumed,
                span: context.span,
            });
        }

        trace!(
            header = %context.header,
            at = %context.span,
            consumed = context.consumed,
            expected = context.expected,
            "close replication"
        );
        self.closed += 1;
    }
}

/// Validates every replication group in `template`.
pub fn validate(template: &Template) -> Vec<Diagnostic> {
    ReplicationValidator::new()
        .validate(template)
        .into_iter()
        .map(Diagnostic::from)
        .collect()
}
