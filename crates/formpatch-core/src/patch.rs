//! One submit attempt: snapshots in, update body out.

use crate::closure::close_delta;
use crate::diff::{diff, Delta};
use crate::options::{PatchOptions, SelfReferenceReduction};
use crate::self_ref::reduce_self_references;
use crate::snapshot::{QuadSet, Snapshot};
use crate::writer::write_update;

/// The repaired delta for one submit attempt.
///
/// Built fresh per submit and never persisted; a failed or cancelled submit
/// just drops it.
#[derive(Debug, Clone)]
pub struct FormPatch {
    delta: Delta,
    options: PatchOptions,
}

impl FormPatch {
    pub fn compute(stored: &Snapshot, revised: &Snapshot, options: PatchOptions) -> Self {
        let mut delta = diff(stored, revised);

        if options.self_reference == SelfReferenceReduction::BeforeClosure {
            reduce_both(&mut delta);
        }
        close_delta(&mut delta, stored, revised);
        if options.self_reference == SelfReferenceReduction::AfterClosure {
            reduce_both(&mut delta);
        }

        tracing::debug!(
            removed = delta.removed.len(),
            added = delta.added.len(),
            style = ?options.delete_clause_style,
            "form patch ready"
        );
        Self { delta, options }
    }

    pub fn removed(&self) -> &QuadSet {
        &self.delta.removed
    }

    pub fn added(&self) -> &QuadSet {
        &self.delta.added
    }

    pub fn delta(&self) -> &Delta {
        &self.delta
    }

    pub fn options(&self) -> PatchOptions {
        self.options
    }

    /// Nothing to send; the body would be the no-op update.
    pub fn is_noop(&self) -> bool {
        self.delta.is_empty()
    }

    pub fn to_sparql_update(&self) -> String {
        write_update(
            &self.delta.removed,
            &self.delta.added,
            self.options.delete_clause_style,
        )
    }
}

fn reduce_both(delta: &mut Delta) {
    delta.removed = reduce_self_references(&delta.removed);
    delta.added = reduce_self_references(&delta.added);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::DeleteClauseStyle;
    use crate::term::{Literal, Node, Quad, Term};
    use crate::writer::EMPTY_UPDATE;

    fn res() -> Node {
        Node::iri("http://ex/res")
    }

    #[test]
    fn identical_snapshots_are_noop() {
        let quads = || {
            vec![
                Quad::new(res(), "http://ex/name", Literal::string("Alice")),
                Quad::new(res(), "http://ex/knows", Term::blank("_:b1")),
            ]
        };
        let patch = FormPatch::compute(
            &Snapshot::build(quads()),
            &Snapshot::build(quads()),
            PatchOptions::default(),
        );
        assert!(patch.is_noop());
        assert_eq!(patch.to_sparql_update(), EMPTY_UPDATE);
    }

    #[test]
    fn reduction_before_closure_drops_scaffolding() {
        let link = Quad::new(res(), "http://ex/about", Term::from(res()));
        let note = Quad::new(res(), "http://ex/note", Literal::string("ignored"));
        let revised = Snapshot::build(vec![link.clone(), note.clone()]);

        let options =
            PatchOptions::default().with_self_reference(SelfReferenceReduction::BeforeClosure);
        let patch = FormPatch::compute(&Snapshot::default(), &revised, options);
        assert!(patch.added().contains(&link));
        assert!(!patch.added().contains(&note));

        let plain = FormPatch::compute(&Snapshot::default(), &revised, PatchOptions::default());
        assert!(plain.added().contains(&note));
    }

    #[test]
    fn reduction_after_closure_also_applies() {
        let link = Quad::new(res(), "http://ex/about", Term::from(res()));
        let note = Quad::new(res(), "http://ex/note", Literal::string("ignored"));
        let revised = Snapshot::build(vec![link, note.clone()]);

        let options =
            PatchOptions::default().with_self_reference(SelfReferenceReduction::AfterClosure);
        let patch = FormPatch::compute(&Snapshot::default(), &revised, options);
        assert!(!patch.added().contains(&note));
    }

    #[test]
    fn style_is_carried_to_writer() {
        let stored = Snapshot::build(vec![Quad::new(
            res(),
            "http://ex/name",
            Literal::string("Alice"),
        )]);
        let options = PatchOptions::default().with_style(DeleteClauseStyle::DeleteInsertWhere);
        let patch = FormPatch::compute(&stored, &Snapshot::default(), options);
        let body = patch.to_sparql_update();
        assert!(body.starts_with("DELETE {\n"), "{body}");
        assert!(body.contains("WHERE {\n  <http://ex/res>"), "{body}");
    }
}
