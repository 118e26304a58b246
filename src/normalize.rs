//! Identifier assignment over a dashboard's panel tree
//!
//! Both passes keep identifiers the caller already set and only fill the
//! gaps, so running them again on a normalized tree changes nothing. All
//! counters and used-sets live for one call only.

use std::collections::HashSet;
use tracing::{debug, warn};

use crate::model::panel::Panel;
use crate::model::target::QueryTarget;

/// Visit non-row panels depth-first, pre-order; rows are replaced by their children
fn visit_leaf_panels_mut(panels: &mut [Panel], f: &mut impl FnMut(&mut Panel)) {
    for panel in panels {
        match panel {
            Panel::Row(row) => visit_leaf_panels_mut(&mut row.panels, f),
            leaf => f(leaf),
        }
    }
}

/// Assign ids to every non-row panel lacking one, returning how many were assigned
pub fn assign_panel_ids(panels: &mut [Panel]) -> usize {
    let mut used = HashSet::new();
    visit_leaf_panels_mut(panels, &mut |panel| {
        if let Some(id) = panel.id() {
            used.insert(id);
        }
    });

    let mut next = 1u32;
    let mut assigned = 0;
    visit_leaf_panels_mut(panels, &mut |panel| {
        let Some(slot) = panel.id_mut() else {
            return;
        };
        if slot.is_some() {
            return;
        }
        while used.contains(&next) {
            next += 1;
        }
        *slot = Some(next);
        used.insert(next);
        assigned += 1;
    });

    debug!(assigned, taken = used.len(), "assigned panel ids");
    assigned
}

/// Labels handed out to targets: A..Z, then AA..ZZ
fn ref_id_labels() -> impl Iterator<Item = String> {
    let letters = || ('A'..='Z').map(String::from);
    letters().chain(letters().flat_map(move |first| letters().map(move |second| format!("{first}{second}"))))
}

/// Assign refIds to every target lacking one, returning how many were assigned
///
/// Labels already used by a target in the list are skipped; assignment
/// follows list order.
pub fn assign_ref_ids(targets: &mut [QueryTarget]) -> usize {
    let used: HashSet<String> = targets
        .iter()
        .filter_map(|t| t.ref_id().map(str::to_string))
        .collect();
    let mut labels = ref_id_labels().filter(|label| !used.contains(label));

    let mut assigned = 0;
    for target in targets.iter_mut().filter(|t| t.ref_id().is_none()) {
        match labels.next() {
            Some(label) => {
                target.set_ref_id(label);
                assigned += 1;
            }
            None => {
                warn!(targets = used.len() + assigned, "ran out of refId labels");
                break;
            }
        }
    }
    assigned
}

/// Rebuild a panel list, passing each non-row panel through `f` and keeping rows in place
pub fn try_map_leaf_panels<F, E>(panels: Vec<Panel>, f: &mut F) -> Result<Vec<Panel>, E>
where
    F: FnMut(Panel) -> Result<Panel, E>,
{
    panels
        .into_iter()
        .map(|panel| match panel {
            Panel::Row(mut row) => {
                row.panels = try_map_leaf_panels(std::mem::take(&mut row.panels), f)?;
                Ok(Panel::Row(row))
            }
            leaf => f(leaf),
        })
        .collect()
}
