use super::unescape;
use crate::dom::{Dom, InlineFormatType, InlineStyle, Line, LineKind, ListType, Run, StyleSet};
use crate::error::ModelError;

/// Parse an HTML fragment into a document.
///
/// Accepts the markup produced by [`to_html`](super::to_html) plus common aliases (`b`, `i`,
/// `s`, `strike`, `div`, `span`) and `<br>`, which splits the current line. Inline whitespace
/// between block elements is ignored. Nested lists are not supported.
pub fn parse(html: &str) -> Result<Dom, ModelError> {
    let mut parser = HtmlParser::default();
    let mut rest = html;

    while !rest.is_empty() {
        match rest.find('<') {
            Some(0) => {
                if let Some(after) = rest.strip_prefix("<!--") {
                    rest = after.find("-->").map_or("", |end| &after[end + 3..]);
                    continue;
                }
                match rest.find('>') {
                    Some(close) => {
                        parser.tag(&rest[1..close])?;
                        rest = &rest[close + 1..];
                    }
                    None => {
                        parser.text(&decode_text(rest));
                        rest = "";
                    }
                }
            }
            Some(lt) => {
                parser.text(&decode_text(&rest[..lt]));
                rest = &rest[lt..];
            }
            None => {
                parser.text(&decode_text(rest));
                rest = "";
            }
        }
    }

    parser.finish()
}

/// Decode raw element content. A whitespace run holding a line feed renders as one space, so
/// text never carries a line separator; other spaces are kept as written.
fn decode_text(raw: &str) -> String {
    let mut collapsed = String::with_capacity(raw.len());
    let mut whitespace = String::new();
    for ch in raw.chars() {
        if matches!(ch, ' ' | '\t' | '\r' | '\n' | '\x0C') {
            whitespace.push(ch);
            continue;
        }
        flush_whitespace(&mut whitespace, &mut collapsed);
        collapsed.push(ch);
    }
    flush_whitespace(&mut whitespace, &mut collapsed);
    unescape(&collapsed).replace('\n', " ")
}

fn flush_whitespace(whitespace: &mut String, out: &mut String) {
    if whitespace.contains('\n') {
        out.push(' ');
    } else {
        out.push_str(whitespace);
    }
    whitespace.clear();
}

#[derive(Debug)]
enum Role {
    Style(Option<InlineStyle>),
    List(ListType),
    ListItem,
    Block,
    Transparent,
}

#[derive(Debug)]
struct OpenTag {
    name: String,
    role: Role,
}

#[derive(Debug, Default)]
struct HtmlParser {
    lines: Vec<Line>,
    stack: Vec<OpenTag>,
    /// The last line was closed by a block end tag; further text starts a new line.
    after_block: bool,
}

impl HtmlParser {
    fn tag(&mut self, raw: &str) -> Result<(), ModelError> {
        let raw = raw.trim();
        if raw.starts_with('!') || raw.starts_with('?') {
            return Ok(());
        }
        if let Some(name) = raw.strip_prefix('/') {
            return self.close(&name.trim().to_ascii_lowercase());
        }

        let self_closing = raw.ends_with('/');
        let raw = raw.trim_end_matches('/');
        let (name, attributes) = raw
            .split_once(|c: char| c.is_ascii_whitespace())
            .unwrap_or((raw, ""));
        let name = name.to_ascii_lowercase();
        tracing::trace!(tag = %name, "html open tag");

        let role = match name.as_str() {
            "br" => {
                self.line_break();
                return Ok(());
            }
            "strong" | "b" => Role::Style(Some(InlineFormatType::Bold.into())),
            "em" | "i" => Role::Style(Some(InlineFormatType::Italic.into())),
            "del" | "s" | "strike" => Role::Style(Some(InlineFormatType::StrikeThrough.into())),
            "u" => Role::Style(Some(InlineFormatType::Underline.into())),
            "code" => Role::Style(Some(InlineFormatType::InlineCode.into())),
            "a" => Role::Style(
                attribute(attributes, "href")
                    .filter(|href| !href.is_empty())
                    .map(InlineStyle::Link),
            ),
            "ol" | "ul" => {
                if self.in_list_item() {
                    return Err(ModelError::UnsupportedTag { tag: name.clone() });
                }
                self.after_block = true;
                Role::List(if name == "ol" {
                    ListType::Ordered
                } else {
                    ListType::Unordered
                })
            }
            "li" => {
                let list_type = self
                    .stack
                    .iter()
                    .rev()
                    .find_map(|open| match open.role {
                        Role::List(list_type) => Some(list_type),
                        _ => None,
                    })
                    .unwrap_or(ListType::Unordered);
                self.start_line(LineKind::ListItem(list_type));
                Role::ListItem
            }
            "p" | "div" if !self.in_list_item() => {
                self.start_line(LineKind::Paragraph);
                Role::Block
            }
            "p" | "div" | "span" | "html" | "body" => Role::Transparent,
            _ => return Err(ModelError::UnsupportedTag { tag: name.clone() }),
        };

        self.stack.push(OpenTag {
            name: name.clone(),
            role,
        });
        if self_closing {
            self.close(&name)?;
        }
        Ok(())
    }

    fn close(&mut self, name: &str) -> Result<(), ModelError> {
        if name == "br" {
            return Ok(());
        }
        match self.stack.last() {
            Some(open) if open.name == name => {}
            _ => {
                return Err(ModelError::UnexpectedClosingTag {
                    tag: name.to_string(),
                });
            }
        }
        if let Some(open) = self.stack.pop()
            && matches!(open.role, Role::List(_) | Role::ListItem | Role::Block)
        {
            self.after_block = true;
        }
        Ok(())
    }

    fn text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let between_blocks =
            self.after_block || matches!(self.stack.last(), Some(OpenTag { role: Role::List(_), .. }));
        if between_blocks && text.trim().is_empty() {
            return;
        }
        let styles = self.styles();
        self.current_line().runs.push(Run::new(text, styles));
    }

    fn line_break(&mut self) {
        let kind = self.current_line().kind;
        self.lines.push(Line::new(kind));
    }

    fn start_line(&mut self, kind: LineKind) {
        self.lines.push(Line::new(kind));
        self.after_block = false;
    }

    fn current_line(&mut self) -> &mut Line {
        if self.after_block || self.lines.is_empty() {
            self.start_line(LineKind::Paragraph);
        }
        let last = self.lines.len() - 1;
        &mut self.lines[last]
    }

    fn in_list_item(&self) -> bool {
        self.stack
            .iter()
            .any(|open| matches!(open.role, Role::ListItem))
    }

    fn styles(&self) -> StyleSet {
        self.stack
            .iter()
            .filter_map(|open| match &open.role {
                Role::Style(style) => style.clone(),
                _ => None,
            })
            .collect()
    }

    fn finish(self) -> Result<Dom, ModelError> {
        if let Some(open) = self.stack.last() {
            return Err(ModelError::UnbalancedContainer {
                tag: open.name.clone(),
            });
        }
        Ok(Dom::from_lines(self.lines))
    }
}

/// Value of attribute `name` in a raw attribute list (quoted or bare), entity-decoded.
fn attribute(attributes: &str, name: &str) -> Option<String> {
    let mut rest = attributes.trim_start();
    while !rest.is_empty() {
        let key_end = rest
            .find(|c: char| c == '=' || c.is_ascii_whitespace())
            .unwrap_or(rest.len());
        let key = &rest[..key_end];
        rest = rest[key_end..].trim_start();

        let value = match rest.strip_prefix('=') {
            Some(after) => {
                let after = after.trim_start();
                let (value, remaining) = match after.chars().next() {
                    Some(quote @ ('"' | '\'')) => {
                        let body = &after[1..];
                        let end = body.find(quote).unwrap_or(body.len());
                        (&body[..end], body.get(end + 1..).unwrap_or(""))
                    }
                    _ => {
                        let end = after
                            .find(|c: char| c.is_ascii_whitespace())
                            .unwrap_or(after.len());
                        (&after[..end], &after[end..])
                    }
                };
                rest = remaining.trim_start();
                value
            }
            None => "",
        };

        if key.eq_ignore_ascii_case(name) {
            return Some(unescape(value));
        }
    }
    None
}
