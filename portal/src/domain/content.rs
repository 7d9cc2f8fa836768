//! Minimal markup renderer for article bodies.
//!
//! Supported syntax: `#`, `##` and `###` headings, paragraphs separated by
//! blank lines, `-`/`*` bullet lists, `1.` ordered lists, `>` quotes and the
//! inline forms `**bold**`, `*italic*`, `` `code` `` and `[text](url)`.
//! Text is HTML-escaped before inline markers are interpreted, so author
//! input can never inject markup.

/// Escape text for inclusion in HTML element content or quoted attributes.
///
/// # Examples
/// ```
/// use portal::domain::escape_html;
///
/// assert_eq!(escape_html("<a href=\"x\">&'</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;");
/// ```
#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Paragraph,
    Bullets,
    Ordered,
    Quote,
}

enum Line<'a> {
    Blank,
    Heading(u8, &'a str),
    Block(BlockKind, &'a str),
}

fn classify(line: &str) -> Line<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Line::Blank;
    }
    for (marker, level) in [("### ", 3), ("## ", 2), ("# ", 1)] {
        if let Some(text) = trimmed.strip_prefix(marker) {
            return Line::Heading(level, text.trim());
        }
    }
    if let Some(text) = trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("* ")) {
        return Line::Block(BlockKind::Bullets, text.trim());
    }
    if let Some(text) = ordered_item(trimmed) {
        return Line::Block(BlockKind::Ordered, text);
    }
    if let Some(text) = trimmed.strip_prefix('>') {
        return Line::Block(BlockKind::Quote, text.trim());
    }
    Line::Block(BlockKind::Paragraph, trimmed)
}

fn ordered_item(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix(". ").map(str::trim)
}

struct Renderer {
    out: String,
    open: Option<(BlockKind, Vec<String>)>,
}

impl Renderer {
    fn push(&mut self, kind: BlockKind, text: &str) {
        let html = inline(text);
        match &mut self.open {
            Some((open_kind, lines)) if *open_kind == kind => lines.push(html),
            _ => {
                self.flush();
                self.open = Some((kind, vec![html]));
            }
        }
    }

    fn heading(&mut self, level: u8, text: &str) {
        self.flush();
        let html = inline(text);
        self.out.push_str(&format!("<h{level}>{html}</h{level}>\n"));
    }

    fn flush(&mut self) {
        let Some((kind, lines)) = self.open.take() else {
            return;
        };
        match kind {
            BlockKind::Paragraph => {
                self.out.push_str(&format!("<p>{}</p>\n", lines.join("<br>\n")));
            }
            BlockKind::Quote => {
                self.out
                    .push_str(&format!("<blockquote><p>{}</p></blockquote>\n", lines.join("<br>\n")));
            }
            BlockKind::Bullets | BlockKind::Ordered => {
                let tag = if kind == BlockKind::Bullets { "ul" } else { "ol" };
                self.out.push_str(&format!("<{tag}>\n"));
                for item in lines {
                    self.out.push_str(&format!("<li>{item}</li>\n"));
                }
                self.out.push_str(&format!("</{tag}>\n"));
            }
        }
    }
}

/// Render article markup to HTML.
///
/// # Examples
/// ```
/// use portal::domain::render_markup;
///
/// let html = render_markup("# Titre\n\nUn **grand** merci <3");
/// assert_eq!(html, "<h1>Titre</h1>\n<p>Un <strong>grand</strong> merci &lt;3</p>\n");
/// ```
#[must_use]
pub fn render_markup(source: &str) -> String {
    let mut renderer = Renderer {
        out: String::new(),
        open: None,
    };
    for line in source.lines() {
        match classify(line) {
            Line::Blank => renderer.flush(),
            Line::Heading(level, text) => renderer.heading(level, text),
            Line::Block(kind, text) => renderer.push(kind, text),
        }
    }
    renderer.flush();
    renderer.out
}

fn inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    render_inline(&escape_html(text), &mut out);
    out
}

fn render_inline(text: &str, out: &mut String) {
    let mut rest = text;
    while let Some(pos) = rest.find(['`', '*', '[']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if let Some((html, consumed)) = inline_span(tail) {
            out.push_str(&html);
            rest = &tail[consumed..];
        } else {
            out.push_str(&tail[..1]);
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
}

/// Interpret the inline construct at the start of `tail`, returning its HTML
/// and the number of bytes consumed.
fn inline_span(tail: &str) -> Option<(String, usize)> {
    if let Some(body) = tail.strip_prefix('`') {
        let end = body.find('`').filter(|end| *end > 0)?;
        return Some((format!("<code>{}</code>", &body[..end]), end + 2));
    }
    if let Some(body) = tail.strip_prefix("**") {
        let end = body.find("**").filter(|end| *end > 0)?;
        let mut inner = String::new();
        render_inline(&body[..end], &mut inner);
        return Some((format!("<strong>{inner}</strong>"), end + 4));
    }
    if let Some(body) = tail.strip_prefix('*') {
        if body.starts_with(' ') {
            return None;
        }
        let end = body.find('*').filter(|end| *end > 0)?;
        let mut inner = String::new();
        render_inline(&body[..end], &mut inner);
        return Some((format!("<em>{inner}</em>"), end + 2));
    }
    if let Some(body) = tail.strip_prefix('[') {
        let label_end = body.find("](")?;
        let target = &body[label_end + 2..];
        let url_end = target.find(')')?;
        let url = target[..url_end].trim();
        let rel = link_rel(url)?;
        let mut label = String::new();
        render_inline(&body[..label_end], &mut label);
        let consumed = 1 + label_end + 2 + url_end + 1;
        return Some((format!("<a href=\"{url}\"{rel}>{label}</a>"), consumed));
    }
    None
}

/// Extra attributes for an allowed link target; `None` rejects the target.
fn link_rel(url: &str) -> Option<&'static str> {
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Some(" rel=\"noopener noreferrer\"")
    } else if lower.starts_with("mailto:") || (url.starts_with('/') && !url.starts_with("//")) {
        Some("")
    } else {
        None
    }
}

/// Plain-text summary of the first paragraph, cut at `max_chars`.
///
/// Used when an article has no explicit excerpt.
#[must_use]
pub fn plain_summary(source: &str, max_chars: usize) -> String {
    let paragraph: Vec<&str> = source
        .lines()
        .map(classify)
        .skip_while(|line| !matches!(line, Line::Block(BlockKind::Paragraph, _)))
        .map_while(|line| match line {
            Line::Block(BlockKind::Paragraph, text) => Some(text),
            _ => None,
        })
        .collect();
    let text: String = paragraph
        .join(" ")
        .chars()
        .filter(|ch| !matches!(ch, '*' | '`'))
        .collect();
    if text.chars().count() <= max_chars {
        return text;
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}…", cut.trim_end())
}
