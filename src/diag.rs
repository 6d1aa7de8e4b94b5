//! Operator-facing diagnostics.
//!
//! Progress notes (double-page detections, per-half completion) go through
//! an explicitly injected sink rather than a process-wide stream, so
//! embedders decide where they end up. Notes are informational only and are
//! never part of a returned result.

/// Receives human-readable progress notes during analysis and rendering.
pub trait DiagnosticSink {
    /// Record one note.
    fn note(&mut self, message: &str);
}

/// Sink that discards every note.
#[derive(Debug, Default, Clone, Copy)]
pub struct Quiet;

impl DiagnosticSink for Quiet {
    fn note(&mut self, _message: &str) {}
}

/// Sink that forwards notes to the `log` facade at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn note(&mut self, message: &str) {
        log::info!("{message}");
    }
}

/// Sink wrapping a closure, for ad-hoc collection or printing.
pub struct FnSink<F: FnMut(&str)>(pub F);

impl<F: FnMut(&str)> DiagnosticSink for FnSink<F> {
    fn note(&mut self, message: &str) {
        (self.0)(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fn_sink_collects_notes() {
        let mut notes: Vec<String> = Vec::new();
        {
            let mut sink = FnSink(|message: &str| notes.push(message.to_string()));
            sink.note("first");
            sink.note("second");
        }
        assert_eq!(notes, vec!["first", "second"]);
    }

    #[test]
    fn test_quiet_sink_accepts_notes() {
        let mut sink = Quiet;
        sink.note("dropped");
    }
}
