//! Update plan between the strings a project already holds and a newly
//! uploaded version of the same WTS file.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::record::{ExportRecord, StringRecord};

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ChangedString {
    pub number: u32,
    pub old_content: String,
    pub new_content: String,
    pub comment: Option<String>,
    /// The stored translation was finished against the old text.
    pub needs_review: bool,
}

#[derive(Debug, Serialize, Default, PartialEq, Eq)]
pub struct MergePlan {
    pub added: Vec<StringRecord>,
    pub changed: Vec<ChangedString>,
    pub removed: Vec<u32>,
    pub unchanged: usize,
}

fn same_text(a: &str, b: &str) -> bool {
    a.replace('\r', "") == b.replace('\r', "")
}

pub fn plan(stored: &[ExportRecord], parsed: &[StringRecord]) -> MergePlan {
    let mut incoming: BTreeMap<u32, &StringRecord> = BTreeMap::new();
    for record in parsed {
        if incoming.insert(record.number, record).is_some() {
            tracing::warn!(
                "STRING {} appears more than once, keeping the last one",
                record.number
            );
        }
    }

    let mut existing: BTreeMap<u32, &ExportRecord> = BTreeMap::new();
    for record in stored {
        if existing.insert(record.string_number, record).is_some() {
            tracing::warn!(
                "Stored string {} appears more than once, keeping the last one",
                record.string_number
            );
        }
    }

    let mut out = MergePlan::default();

    for (number, new) in &incoming {
        let Some(old) = existing.get(number) else {
            out.added.push((*new).clone());
            continue;
        };

        if same_text(&old.original_text, &new.content) && old.comment == new.comment {
            out.unchanged += 1;
            continue;
        }

        out.changed.push(ChangedString {
            number: *number,
            old_content: old.original_text.clone(),
            new_content: new.content.clone(),
            comment: new.comment.clone(),
            needs_review: old.completed,
        });
    }

    out.removed = existing
        .keys()
        .filter(|n| !incoming.contains_key(*n))
        .copied()
        .collect();

    tracing::debug!(
        "Merge plan: {} added, {} changed, {} removed, {} unchanged",
        out.added.len(),
        out.changed.len(),
        out.removed.len(),
        out.unchanged
    );
    out
}
