use rowan::TextRange;
use slarti_core::{NodeId, RefSlot};

use super::*;

#[test]
fn severity_display() {
    insta::assert_snapshot!(format!("{}", Severity::Error), @"error");
    insta::assert_snapshot!(format!("{}", Severity::Warning), @"warning");
}

#[test]
fn report_with_default_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(
            DiagnosticKind::UndefinedReference,
            TextRange::new(0.into(), 5.into()),
        )
        .emit();

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.has_errors());
    insta::assert_snapshot!(diagnostics.render(), @"error at 0..5: undefined reference");
}

#[test]
fn report_with_custom_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(
            DiagnosticKind::NotAPrinciple,
            TextRange::new(0.into(), 5.into()),
        )
        .message("Theme")
        .emit();

    let diag = diagnostics.iter().next().unwrap();
    assert_eq!(diag.message(), "`Theme` is not a principle");
    assert_eq!(diag.severity(), Severity::Error);
}

#[test]
fn message_templates() {
    assert_eq!(
        DiagnosticKind::DuplicateDefinition.message(None),
        "duplicate definition"
    );
    assert_eq!(
        DiagnosticKind::DuplicateDefinition.message(Some("T")),
        "`T` is already defined in this scope"
    );
    assert_eq!(
        DiagnosticKind::UnknownMember.message(Some("`P2` has no member `Px`")),
        "`P2` has no member `Px`"
    );
}

#[test]
fn target_node_and_property() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UndefinedReference, TextRange::default())
        .message("X")
        .at(NodeId::from_raw(4), Some(RefSlot::Object))
        .hint("did you mean `Y`?")
        .emit();

    let diag = diagnostics.iter().next().unwrap();
    assert_eq!(diag.node(), Some(NodeId::from_raw(4)));
    assert_eq!(diag.property(), Some(RefSlot::Object));
    assert_eq!(diag.hints(), ["did you mean `Y`?"]);
    insta::assert_snapshot!(diagnostics.render(), @"error at 0..0: `X` is not defined (node #4, property `object`) (hint: did you mean `Y`?)");
}

#[test]
fn counts_by_severity() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::DuplicateDefinition, TextRange::default())
        .emit();
    diagnostics
        .report(DiagnosticKind::UnknownMember, TextRange::default())
        .emit();
    diagnostics
        .report(DiagnosticKind::UndefinedReference, TextRange::default())
        .emit();

    assert_eq!(diagnostics.error_count(), 2);
    assert_eq!(diagnostics.warning_count(), 1);
    assert!(diagnostics.has_warnings());
}

#[test]
fn builder_with_related() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(
            DiagnosticKind::UndefinedReference,
            TextRange::new(0.into(), 5.into()),
        )
        .message("Alpha")
        .related_to("similar name declared here", TextRange::new(6.into(), 10.into()))
        .emit();

    let result = diagnostics.printer().source("Alpha Beta!").render();
    insta::assert_snapshot!(result, @r"
    error: `Alpha` is not defined
      |
    1 | Alpha Beta!
      | ^^^^^ ---- similar name declared here
    ");
}

#[test]
fn printer_with_path() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(
            DiagnosticKind::NotAPrinciple,
            TextRange::new(8.into(), 9.into()),
        )
        .message("T")
        .emit();

    let result = diagnostics
        .printer()
        .source("require T")
        .path("model.slarti")
        .render();
    insta::assert_snapshot!(result, @r"
    error: `T` is not a principle
     --> model.slarti:1:9
      |
    1 | require T
      |         ^
    ");
}

#[test]
fn printer_labels_target() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(
            DiagnosticKind::UndefinedReference,
            TextRange::new(11.into(), 16.into()),
        )
        .message("Colou")
        .at(NodeId::from_raw(3), Some(RefSlot::Subject))
        .emit();
    diagnostics
        .report(
            DiagnosticKind::DuplicateDefinition,
            TextRange::new(9.into(), 10.into()),
        )
        .message("r")
        .at(NodeId::from_raw(3), None)
        .emit();

    let result = diagnostics
        .printer()
        .source("relation r[Colou, Colour]")
        .render();
    insta::assert_snapshot!(result, @r"
    error: `Colou` is not defined
      |
    1 | relation r[Colou, Colour]
      |            ^^^^^ `subject` of node #3

    warning: `r` is already defined in this scope
      |
    1 | relation r[Colou, Colour]
      |          ^ node #3
    ");
}

#[test]
fn printer_colored() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(
            DiagnosticKind::UndefinedReference,
            TextRange::new(0.into(), 5.into()),
        )
        .message("test")
        .emit();

    let result = diagnostics.printer().source("hello").colored(true).render();
    assert!(result.contains("test"));
    assert!(result.contains('\x1b'));
}

#[test]
fn printer_empty_diagnostics() {
    let diagnostics = Diagnostics::new();

    assert!(diagnostics.printer().source("source").render().is_empty());
    assert!(diagnostics.render().is_empty());
}

#[test]
fn printer_zero_width_span() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UndefinedReference, TextRange::empty(0.into()))
        .message("T")
        .emit();

    let result = diagnostics.printer().source("hello").render();
    insta::assert_snapshot!(result, @r"
    error: `T` is not defined
      |
    1 | hello
      | ^
    ");
}

#[test]
fn plain_rendering_separates_lines() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UndefinedReference, TextRange::default())
        .message("A")
        .emit();
    diagnostics
        .report(DiagnosticKind::UndefinedReference, TextRange::default())
        .message("B")
        .emit();

    insta::assert_snapshot!(diagnostics.render(), @r"
    error at 0..0: `A` is not defined
    error at 0..0: `B` is not defined
    ");
}
