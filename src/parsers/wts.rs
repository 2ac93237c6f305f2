use crate::error::{CoreError, Result};
use crate::model::record::StringRecord;

const BLOCK_TOKEN: &str = "STRING";
const COMMENT_PREFIX: &str = "// ";

/// Parses WTS source text into records, in source order.
///
/// A line inside a block that starts with `// ` right after the number is
/// always taken as the comment, even if it was meant as text. The token
/// `STRING` inside a text also starts a new block, so one stray occurrence
/// fails the whole file with [`CoreError::InvalidNumber`].
pub fn parse(text: &str) -> Result<Vec<StringRecord>> {
    let mut blocks = text.split(BLOCK_TOKEN);

    // Everything before the first token (BOM, header comments) is dropped.
    blocks.next();

    let mut records = Vec::new();
    for (i, block) in blocks.enumerate() {
        records.push(parse_block(i + 1, block)?);
    }

    if records.is_empty() {
        return Err(CoreError::Format);
    }

    tracing::debug!("Parsed {} WTS records", records.len());
    Ok(records)
}

fn parse_block(index: usize, block: &str) -> Result<StringRecord> {
    let clean = block.replace('\r', "");
    let mut lines: Vec<&str> = clean.split('\n').collect();

    let number_line = lines.remove(0).trim();
    let number = number_line
        .parse::<u32>()
        .map_err(|_| CoreError::InvalidNumber {
            block: index,
            found: number_line.to_string(),
        })?;

    let comment = lines
        .first()
        .and_then(|line| line.strip_prefix(COMMENT_PREFIX))
        .map(|c| c.trim().to_string());
    if comment.is_some() {
        lines.remove(0);
    }

    // Blank separator lines before the next block are not part of the body.
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }

    let mut body: &[&str] = &lines;
    if body.first().is_some_and(|l| l.trim() == "{") {
        body = &body[1..];
    }
    if body.last().is_some_and(|l| l.trim() == "}") {
        body = &body[..body.len() - 1];
    }

    Ok(StringRecord {
        number,
        comment,
        content: body.join("\r\n"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(number: u32, comment: Option<&str>, content: &str) -> StringRecord {
        StringRecord {
            number,
            comment: comment.map(str::to_string),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_parse_comment_block() {
        let records = parse("STRING 7\n// note\n{\nhello\n}").unwrap();
        assert_eq!(records, vec![record(7, Some("note"), "hello")]);
    }

    #[test]
    fn test_parse_multiple_blocks_crlf() {
        let text = "\u{feff}STRING 1\r\n{\r\nFootman\r\n}\r\n\r\n\
            STRING 3\r\n// Units: h000 (Footman), Ubertip\r\n{\r\n\
            A basic unit.|nCan learn |cffffcc00Defend|r.\r\nSecond line\r\n}\r\n\r\n";
        let records = parse(text).unwrap();
        assert_eq!(
            records,
            vec![
                record(1, None, "Footman"),
                record(
                    3,
                    Some("Units: h000 (Footman), Ubertip"),
                    "A basic unit.|nCan learn |cffffcc00Defend|r.\r\nSecond line"
                ),
            ]
        );
    }

    #[test]
    fn test_parse_keeps_source_order() {
        let text = "STRING 10\n{\nb\n}\n\nSTRING 2\n{\na\n}\n";
        let numbers: Vec<u32> = parse(text).unwrap().iter().map(|r| r.number).collect();
        assert_eq!(numbers, vec![10, 2]);
    }

    #[test]
    fn test_parse_empty_body() {
        let records = parse("STRING 4\n{\n}\n").unwrap();
        assert_eq!(records, vec![record(4, None, "")]);
    }

    #[test]
    fn test_parse_keeps_interior_blank_lines() {
        let records = parse("STRING 5\n{\nfirst\n\nthird\n}\n").unwrap();
        assert_eq!(records[0].content, "first\r\n\r\nthird");
    }

    #[test]
    fn test_parse_header_before_first_block() {
        let records = parse("// generated header\n\nSTRING 1\n{\nx\n}").unwrap();
        assert_eq!(records, vec![record(1, None, "x")]);
    }

    #[test]
    fn test_comment_lookalike_is_taken_as_comment() {
        let records = parse("STRING 1\n{\n// not a comment\n}").unwrap();
        assert_eq!(records[0].comment, None);
        assert_eq!(records[0].content, "// not a comment");

        let records = parse("STRING 1\n// a\n{\nb\n}").unwrap();
        assert_eq!(records[0].comment.as_deref(), Some("a"));
    }

    #[test]
    fn test_parse_rejects_non_wts() {
        assert!(matches!(parse(""), Err(CoreError::Format)));
        assert!(matches!(parse("no string token here"), Err(CoreError::Format)));
    }

    #[test]
    fn test_token_inside_text_fails_whole_file() {
        let err = parse("STRING 1\n{\nThe STRINGS of fate\n}\n\nSTRING 2\n{\nx\n}").unwrap_err();
        match err {
            CoreError::InvalidNumber { block, found } => {
                assert_eq!(block, 2);
                assert_eq!(found, "S of fate");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_rejects_bad_number() {
        let err = parse("STRING abc\n{\nx\n}").unwrap_err();
        assert!(matches!(err, CoreError::InvalidNumber { block: 1, .. }));
    }
}
