//! Expansion of `#<refId>` references between targets of one panel

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;

use crate::constants::target::REFERENCE_PATTERN;
use crate::error::{DashboardError, Result};
use crate::model::target::QueryTarget;

fn reference_regex() -> &'static Regex {
    static REFERENCE: OnceLock<Regex> = OnceLock::new();
    REFERENCE.get_or_init(|| Regex::new(REFERENCE_PATTERN).expect("reference pattern is valid"))
}

/// True when `expression` still holds a `#<refId>` token
pub fn has_references(expression: &str) -> bool {
    reference_regex().is_match(expression)
}

/// Expand `expression`, substituting each `#<refId>` with the referenced expression
///
/// `visiting` holds the refIds on the current expansion path.
fn expand(
    expression: &str,
    sources: &HashMap<&str, &str>,
    visiting: &mut Vec<String>,
) -> Result<String> {
    let mut expanded = String::with_capacity(expression.len());
    let mut last = 0;
    for captures in reference_regex().captures_iter(expression) {
        let (Some(token), Some(ref_id)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        let ref_id = ref_id.as_str();
        if visiting.iter().any(|v| v == ref_id) {
            return Err(DashboardError::CyclicReference {
                ref_id: ref_id.to_string(),
            });
        }
        let referenced = sources
            .get(ref_id)
            .ok_or_else(|| DashboardError::UnknownReference {
                ref_id: ref_id.to_string(),
                expression: expression.to_string(),
            })?;

        visiting.push(ref_id.to_string());
        let inner = expand(referenced, sources, visiting)?;
        visiting.pop();

        expanded.push_str(&expression[last..token.start()]);
        expanded.push_str(&inner);
        last = token.end();
    }
    expanded.push_str(&expression[last..]);
    Ok(expanded)
}

/// Set `target_full` on every standard target of the list
///
/// Targets without references get their expression copied unchanged.
/// References to targets that are themselves referencing are expanded
/// through. A cycle, a refId absent from the list or a refId carried by two
/// targets is an error and leaves the targets untouched.
pub fn resolve_targets(targets: &mut [QueryTarget]) -> Result<()> {
    let expanded = {
        let mut sources: HashMap<&str, &str> = HashMap::with_capacity(targets.len());
        for target in targets.iter() {
            let Some(ref_id) = target.ref_id() else {
                continue;
            };
            if sources.insert(ref_id, target.expression()).is_some() {
                return Err(DashboardError::DuplicateReference {
                    ref_id: ref_id.to_string(),
                });
            }
        }

        let mut expanded = Vec::with_capacity(targets.len());
        for target in targets.iter() {
            let mut visiting: Vec<String> = target.ref_id().map(str::to_string).into_iter().collect();
            expanded.push(expand(target.expression(), &sources, &mut visiting)?);
        }
        expanded
    };

    let mut resolved = 0;
    for (target, full) in targets.iter_mut().zip(expanded) {
        if let QueryTarget::Standard(target) = target {
            if full != target.expr {
                resolved += 1;
            }
            target.target_full = Some(full);
        }
    }
    debug!(targets = targets.len(), resolved, "resolved target expressions");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::panel::{Graph, Panel};
    use crate::model::target::Target;

    fn full(target: &QueryTarget) -> &str {
        match target {
            QueryTarget::Standard(t) => t.target_full.as_deref().unwrap_or_default(),
            QueryTarget::CloudWatch(_) => "",
        }
    }

    #[test]
    fn test_graphite_target_full() {
        let panel = Panel::from(Graph::new(
            "Graphite target full test",
            vec![
                Target::new("foo.bar").with_ref_id("A").into(),
                Target::new("sumSeries(#A,foo2.bar2)").with_ref_id("B").into(),
            ],
        ))
        .resolve_expression_refs()
        .unwrap();

        for target in panel.targets() {
            assert!(!full(target).is_empty());
            assert!(!has_references(full(target)));
        }
        assert_eq!(full(&panel.targets()[0]), "foo.bar");
        assert_eq!(full(&panel.targets()[1]), "sumSeries(foo.bar,foo2.bar2)");
    }

    #[test]
    fn test_transitive_references() {
        let mut targets: Vec<QueryTarget> = vec![
            Target::new("a.b").with_ref_id("A").into(),
            Target::new("scale(#A,2)").with_ref_id("B").into(),
            Target::new("diffSeries(#B,#A)").with_ref_id("C").into(),
        ];
        resolve_targets(&mut targets).unwrap();
        assert_eq!(full(&targets[2]), "diffSeries(scale(a.b,2),a.b)");
    }

    #[test]
    fn test_unknown_reference_fails() {
        let mut targets: Vec<QueryTarget> = vec![Target::new("sumSeries(#Z)").with_ref_id("A").into()];
        let err = resolve_targets(&mut targets).unwrap_err();
        assert_eq!(
            err,
            DashboardError::UnknownReference {
                ref_id: "Z".to_string(),
                expression: "sumSeries(#Z)".to_string(),
            }
        );
        assert_eq!(full(&targets[0]), "");
    }

    #[test]
    fn test_cyclic_reference_fails() {
        let mut targets: Vec<QueryTarget> = vec![
            Target::new("#B").with_ref_id("A").into(),
            Target::new("#A").with_ref_id("B").into(),
        ];
        assert!(matches!(
            resolve_targets(&mut targets),
            Err(DashboardError::CyclicReference { .. })
        ));
    }

    #[test]
    fn test_self_reference_fails() {
        let mut targets: Vec<QueryTarget> = vec![Target::new("offset(#A,1)").with_ref_id("A").into()];
        assert_eq!(
            resolve_targets(&mut targets),
            Err(DashboardError::CyclicReference {
                ref_id: "A".to_string()
            })
        );
    }

    #[test]
    fn test_duplicate_ref_id_fails() {
        let mut targets: Vec<QueryTarget> = vec![
            Target::new("first.series").with_ref_id("A").into(),
            Target::new("second.series").with_ref_id("A").into(),
            Target::new("sumSeries(#A)").with_ref_id("B").into(),
        ];
        assert_eq!(
            resolve_targets(&mut targets),
            Err(DashboardError::DuplicateReference {
                ref_id: "A".to_string()
            })
        );
        assert_eq!(full(&targets[2]), "");
    }

    #[test]
    fn test_has_references() {
        assert!(has_references("sumSeries(#A)"));
        assert!(!has_references("sumSeries(a.b)"));
        assert!(!has_references("#lower"));
    }
}
