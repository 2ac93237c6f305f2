//! Display markup for WTS string content.
//!
//! Plain mode only makes the text safe to embed. Preview mode follows the
//! in-game rich text rules: `|n` breaks a line, `|cAARRGGBB...|r` colors a
//! run of text (alpha is dropped) and any `<...>` tag shows up as `0`, the
//! way the game substitutes unresolved placeholders.

use std::sync::LazyLock;

use regex::Regex;

pub const LINE_BREAK: &str = "<br/>";

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^<>]*>").expect("tag pattern is valid"));

static COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\|c[0-9A-Fa-f]{2}(?P<rgb>[0-9A-Fa-f]{6})(?P<text>[^|]*)\|r")
        .expect("color pattern is valid")
});

pub fn render(content: &str, interpret: bool) -> String {
    if interpret {
        render_preview(content)
    } else {
        render_plain(content)
    }
}

fn escape_angle_brackets(s: &str) -> String {
    s.replace('<', "&lt;").replace('>', "&gt;")
}

fn render_plain(content: &str) -> String {
    escape_angle_brackets(content)
        .replace('\r', "")
        .replace('\n', LINE_BREAK)
}

fn render_preview(content: &str) -> String {
    let text = TAG_RE.replace_all(content, "0");
    // Stray brackets that did not form a tag stay literal.
    let text = escape_angle_brackets(&text)
        .replace('\r', "")
        .replace('\n', LINE_BREAK)
        .replace("|n", LINE_BREAK);

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    for caps in COLOR_RE.captures_iter(&text) {
        let (Some(whole), Some(rgb), Some(inner)) =
            (caps.get(0), caps.name("rgb"), caps.name("text"))
        else {
            continue;
        };

        out.push_str(&text[cursor..whole.start()]);
        out.push_str("<span style=\"color:#");
        out.push_str(rgb.as_str());
        out.push_str("\">");
        out.push_str(inner.as_str());
        out.push_str("</span>");
        cursor = whole.end();
    }
    out.push_str(&text[cursor..]);

    out
}
