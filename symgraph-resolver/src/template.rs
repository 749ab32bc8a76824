//! Placeholder substitution over the generated text template.
//!
//! One left-to-right pass replaces each `[[CAS:<id>]]` occurrence with the result's typeset
//! form. The output is assembled from the untouched text between tokens and the replacements,
//! and never rescanned, so each occurrence is substituted exactly once, even if a
//! typeset form happens to contain token-like text. Substitution is all-or-nothing: an id with
//! no result aborts before any text is returned.

use crate::error::BatchError;
use crate::refs;
use crate::store::ResultStore;

/// Substitutes every placeholder in the template, or fails atomically.
///
/// A template without placeholders passes through unchanged; results the template does not
/// reference are simply unused.
pub fn fill(template: &str, store: &ResultStore) -> Result<String, BatchError> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in refs::PLACEHOLDER.captures_iter(template) {
        let whole = caps.get(0).unwrap();
        let id = &caps[1];
        let Some(result) = store.get(id) else {
            return Err(BatchError::UnresolvedPlaceholder {
                id: id.to_string(),
                span: whole.range(),
                src_text: template.to_string(),
            });
        };

        out.push_str(&template[last..whole.start()]);
        out.push_str(&result.typeset_form);
        last = whole.end();
    }

    out.push_str(&template[last..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskResult;
    use pretty_assertions::assert_eq;

    fn store(results: Vec<(&str, &str)>) -> ResultStore {
        let mut store = ResultStore::default();
        for (id, typeset) in results {
            store.insert(TaskResult {
                id: id.to_string(),
                typeset_form: typeset.to_string(),
                canonical_form: typeset.to_string(),
            });
        }
        store
    }

    #[test]
    fn substitutes_typeset_forms() {
        let store = store(vec![("1", "4")]);
        assert_eq!(fill("Answer: [[CAS:1]]", &store).unwrap(), "Answer: 4");
    }

    #[test]
    fn every_occurrence_is_replaced_exactly_once() {
        let store = store(vec![("1", "x^{2}")]);
        let out = fill("a [[CAS:1]] b [[CAS:1]] c", &store).unwrap();
        assert_eq!(out, "a x^{2} b x^{2} c");
    }

    #[test]
    fn substituted_text_is_never_rescanned() {
        // a typeset form containing token-like text must not trigger a second substitution
        let store = store(vec![("1", "[[CAS:2]]"), ("2", "boom")]);
        let out = fill("[[CAS:1]]", &store).unwrap();
        assert_eq!(out, "[[CAS:2]]");
    }

    #[test]
    fn missing_ids_abort() {
        let store = store(vec![("1", "4")]);
        let err = fill("[[CAS:1]] and [[CAS:2]]", &store).unwrap_err();
        assert!(matches!(
            err,
            BatchError::UnresolvedPlaceholder { id, .. } if id == "2"
        ));
    }

    #[test]
    fn template_without_placeholders_passes_through() {
        let store = store(vec![]);
        assert_eq!(fill("no tokens here", &store).unwrap(), "no tokens here");
    }

    #[test]
    fn unused_results_are_not_an_error() {
        let store = store(vec![("1", "4"), ("2", "5")]);
        assert_eq!(fill("[[CAS:1]]", &store).unwrap(), "4");
    }
}
