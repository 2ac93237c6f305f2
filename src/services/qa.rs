use serde::{Deserialize, Serialize};

use crate::model::record::ExportRecord;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct QaIssue {
    pub string_number: u32,
    pub code: String,
    pub message: String,
}

fn issue(record: &ExportRecord, code: &str, message: impl Into<String>) -> QaIssue {
    QaIssue {
        string_number: record.string_number,
        code: code.to_string(),
        message: message.into(),
    }
}

fn count_line_breaks(text: &str) -> usize {
    text.matches('\n').count() + text.matches("|n").count()
}

pub fn run(records: &[ExportRecord]) -> Vec<QaIssue> {
    let mut issues: Vec<QaIssue> = Vec::new();

    for r in records {
        let original_trim = r.original_text.trim();
        let translation = r.translation();
        let translation_trim = translation.trim();

        if translation_trim.is_empty() {
            if r.completed {
                issues.push(issue(
                    r,
                    "COMPLETED_BUT_EMPTY",
                    "Marked as completed, but the translation is empty",
                ));
            }
            continue;
        }

        if translation_trim == original_trim {
            issues.push(issue(r, "SAME_AS_ORIGINAL", "Translation is identical to the original"));
        }

        let opened = translation.matches("|c").count();
        let closed = translation.matches("|r").count();
        if opened != closed {
            issues.push(issue(
                r,
                "COLOR_CODE_UNBALANCED",
                format!("{opened} color code(s) opened with |c, {closed} closed with |r"),
            ));
        } else if opened != r.original_text.matches("|c").count() {
            issues.push(issue(
                r,
                "COLOR_CODE_MISMATCH",
                "Translation has a different number of colored spans than the original",
            ));
        }

        let expected = count_line_breaks(&r.original_text);
        let found = count_line_breaks(translation);
        if expected != found {
            issues.push(issue(
                r,
                "LINE_BREAK_MISMATCH",
                format!("Original has {expected} line break(s), translation has {found}"),
            ));
        }
    }

    issues
}
