//! Rendering of collected diagnostics.
//!
//! Without source text each diagnostic is its one-line `Display`. With source
//! text it becomes an annotated snippet whose primary label names the node
//! and property the diagnostic is attached to.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Level, Renderer, Snippet};
use rowan::TextRange;

use super::Diagnostics;
use super::message::{DiagnosticMessage, Severity, Target};

pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            source: None,
            path: None,
            colored: false,
        }
    }

    /// Render annotated snippets against `source`.
    pub fn source(mut self, source: &'s str) -> Self {
        self.source = Some(source);
        self
    }

    /// Document path shown in the `-->` line.
    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            match self.source {
                Some(source) => self.format_annotated(&renderer, diag, source, w)?,
                None => write!(w, "{diag}")?,
            }
        }
        Ok(())
    }

    fn format_annotated(
        &self,
        renderer: &Renderer,
        diag: &DiagnosticMessage,
        source: &str,
        w: &mut impl Write,
    ) -> std::fmt::Result {
        // A label equal to the title is not repeated under the span.
        let label = diag.target.map_or_else(|| diag.message.clone(), target_label);

        let mut snippet = Snippet::source(source).line_start(1).annotation(
            AnnotationKind::Primary
                .span(span(diag.range, source.len()))
                .label(&label),
        );
        if let Some(path) = self.path {
            snippet = snippet.path(path);
        }
        for related in &diag.related {
            snippet = snippet.annotation(
                AnnotationKind::Context
                    .span(span(related.range, source.len()))
                    .label(&related.message),
            );
        }

        let mut group = level(diag.severity())
            .primary_title(&diag.message)
            .element(snippet);
        for hint in &diag.hints {
            group = group.element(Level::HELP.message(hint.as_str()));
        }

        write!(w, "{}", renderer.render(&[group]))
    }
}

/// `` `object` of node #4 ``, or `node #4` when no property is involved.
fn target_label(target: Target) -> String {
    match target.property {
        Some(property) => format!("`{property}` of node {}", target.node),
        None => format!("node {}", target.node),
    }
}

fn level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
    }
}

/// Byte span clamped to the source. Empty ranges (synthesized nodes) still
/// get a one-column marker.
fn span(range: TextRange, limit: usize) -> std::ops::Range<usize> {
    let start = usize::from(range.start()).min(limit);
    let end = usize::from(range.end()).min(limit);
    if start == end {
        return start..(start + 1).min(limit);
    }
    start..end
}
