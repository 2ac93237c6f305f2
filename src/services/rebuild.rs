use base64::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::model::project::ProjectInfo;
use crate::model::record::{ExportRecord, Purpose};

/// What the UI receives to trigger a download.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    pub file_name: String,
    /// Base64 of the UTF-8 file text.
    pub file_content: String,
}

/// Rebuilds WTS text from stored strings.
///
/// Blocks come out in ascending number order with one blank line between
/// them; line endings inside texts are left as stored.
pub fn rebuild(records: &[ExportRecord], purpose: Purpose) -> Result<String> {
    let mut selected: Vec<&ExportRecord> = records
        .iter()
        .filter(|r| purpose != Purpose::Upload || r.completed)
        .collect();

    if selected.is_empty() {
        return Err(CoreError::NoContent);
    }

    selected.sort_by_key(|r| r.string_number);

    let blocks: Vec<String> = selected
        .into_iter()
        .map(|r| render_block(r, purpose))
        .collect();

    tracing::debug!("Rebuilt {} WTS blocks ({:?})", blocks.len(), purpose);
    Ok(blocks.join("\n\n"))
}

fn render_block(record: &ExportRecord, purpose: Purpose) -> String {
    let text = match purpose {
        Purpose::Upload => record.translation(),
        Purpose::Release | Purpose::Debug => {
            if record.completed {
                record.translation()
            } else {
                record.original_text.as_str()
            }
        }
    };

    let mut block = format!("STRING {}\n", record.string_number);
    if let Some(comment) = &record.comment {
        block.push_str("// ");
        block.push_str(comment);
        block.push('\n');
    }
    block.push_str("{\n");
    if purpose == Purpose::Debug {
        block.push_str(&format!("[{}]_", record.string_number));
    }
    block.push_str(text);
    block.push_str("\n}");
    block
}

/// Rebuilds and packs the text for transport to the download step.
pub fn export(
    records: &[ExportRecord],
    purpose: Purpose,
    project: &ProjectInfo,
) -> Result<ExportPayload> {
    let text = rebuild(records, purpose)?;

    Ok(ExportPayload {
        file_name: project.file_name(),
        file_content: BASE64_STANDARD.encode(text.as_bytes()),
    })
}
