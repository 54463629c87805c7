//! # Parse Diagnostics
//!
//! Parse failures are recoverable by design: the parser returns `None` and
//! describes the failure here. An optional host-supplied [`ErrorSink`]
//! surfaces the description to the user; [`Diagnostics`] wraps the sink
//! with once-per-distinct-failure dedup and a session mute flag.
//!
//! The sink is invoked synchronously on the thread performing the parse.
//! [`Diagnostics`] is `Send + Sync`, so world loading may happen on a
//! worker thread while the sink marshals to the UI however it likes.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

/// Host-supplied callback presenting a parse diagnostic to the user.
///
/// The return value selects an action: button index 1 requests the next
/// error, anything else mutes diagnostics for the rest of the session.
pub trait ErrorSink: Send + Sync {
    fn report(&self, title: &str, description: &str, buttons: &[&str]) -> Option<usize>;
}

/// A single parser failure, with enough context to point at the problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagnostic {
    /// The token that could not be consumed.
    pub token: String,
    /// The failing token with one token of context on each side.
    pub window: String,
    /// The full source line, reconstructed from the token stream.
    pub line: String,
    /// 1-based line number of the failure within the source.
    pub line_number: usize,
}

impl ParseDiagnostic {
    /// Human-readable description, also used as the dedup key.
    pub fn description(&self) -> String {
        format!(
            "Unexpected {} near \"{}\" on line {}:\n{}",
            self.token, self.window, self.line_number, self.line
        )
    }
}

/// Dedup and mute policy around an optional [`ErrorSink`].
#[derive(Default)]
pub struct Diagnostics {
    sink: Option<Arc<dyn ErrorSink>>,
    state: Mutex<SinkState>,
}

#[derive(Default)]
struct SinkState {
    muted: bool,
    seen: HashSet<String>,
}

impl Diagnostics {
    pub fn new(sink: Arc<dyn ErrorSink>) -> Self {
        Diagnostics {
            sink: Some(sink),
            state: Mutex::new(SinkState::default()),
        }
    }

    /// No sink: failures are logged and otherwise dropped.
    pub fn disabled() -> Self {
        Diagnostics::default()
    }

    /// Report a parse failure. Each distinct failure is surfaced at most
    /// once; the user's response may mute the session.
    pub(crate) fn parse_failure(&self, diagnostic: &ParseDiagnostic) {
        let description = diagnostic.description();
        {
            let mut state = self.state.lock();
            if state.muted || !state.seen.insert(description.clone()) {
                return;
            }
        }

        warn!(
            token = %diagnostic.token,
            line = %diagnostic.line,
            line_number = diagnostic.line_number,
            "requires string failed to parse"
        );

        let Some(sink) = &self.sink else { return };
        let choice = sink.report(
            "Logic parse error",
            &description,
            &["Dismiss", "Show next error"],
        );
        if choice != Some(1) {
            self.state.lock().muted = true;
        }
    }
}
