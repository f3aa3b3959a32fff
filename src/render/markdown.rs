//! Markdown front-end and Markdown page output.
//!
//! [`parse_markdown`] turns source text into the flat block sequence the
//! paginator works on. [`to_markdown`] writes paginated pages back out,
//! keeping each list fragment's own start number.

use std::sync::OnceLock;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};
use regex::Regex;

use crate::model::inline::has_visible_content;
use crate::model::{Block, GenericKind, ImageRef, Inline, List, ListItem, Page};
use crate::paginate::PageSet;

/// Separator written between pages.
pub const PAGE_SEPARATOR: &str = "\n---\n\n";

fn embed_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"!\[\[([^\]|]+)(?:\|([^\]]*))?\]\]").expect("valid embed regex"))
}

/// Parse Markdown source into blocks.
///
/// Nested lists are flattened into the text of their outermost item.
/// Tables, block quotes and HTML blocks become generic blocks. Obsidian
/// `![[image.png|alt]]` embeds are recognised as images.
pub fn parse_markdown(source: &str) -> Vec<Block> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut reader = MarkdownReader::default();
    for event in Parser::new_ext(source, options) {
        reader.handle(event);
    }
    log::debug!("parsed {} blocks from markdown", reader.blocks.len());
    reader.blocks
}

/// Element opened by a start event and closed by the next matching end.
enum Open {
    Paragraph,
    Heading(u8),
    Quote,
    CodeBlock,
    HtmlBlock,
    List,
    Item,
    Table,
    TableRow,
    TableCell,
    Link { start: usize, url: String },
    Image { start: usize, src: String },
    Other,
}

#[derive(Default)]
struct ListState {
    ordered: bool,
    start: u32,
    items: Vec<ListItem>,
    depth: usize,
}

#[derive(Default)]
struct MarkdownReader {
    blocks: Vec<Block>,
    open: Vec<Open>,
    inlines: Vec<Inline>,
    code: Option<(Option<String>, String)>,
    list: Option<ListState>,
    quote_depth: usize,
    cell_index: usize,
}

impl MarkdownReader {
    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => {
                if let Some(open) = self.open.pop() {
                    self.end(open);
                }
            }
            Event::Text(text) => match self.code.as_mut() {
                Some((_, code)) => code.push_str(&text),
                None => push_text(&mut self.inlines, &text),
            },
            Event::Code(code) => self.inlines.push(Inline::Code {
                code: code.to_string(),
            }),
            Event::Html(html) | Event::InlineHtml(html) => push_text(&mut self.inlines, &html),
            Event::SoftBreak => push_text(&mut self.inlines, " "),
            Event::HardBreak => self.inlines.push(Inline::LineBreak),
            Event::Rule => {
                if self.list.is_some() {
                    push_break(&mut self.inlines);
                    push_text(&mut self.inlines, "---");
                } else {
                    self.flush_inlines(GenericKind::Paragraph);
                    self.blocks.push(Block::Rule);
                }
            }
            Event::TaskListMarker(done) => push_text(&mut self.inlines, if done { "[x] " } else { "[ ] " }),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let open = match tag {
            Tag::Paragraph => {
                let after_break = matches!(self.inlines.last(), Some(Inline::LineBreak));
                if self.list.is_some() && has_visible_content(&self.inlines) && !after_break {
                    push_text(&mut self.inlines, "\n\n");
                }
                Open::Paragraph
            }
            Tag::Heading { level, .. } => {
                if self.list.is_some() {
                    push_break(&mut self.inlines);
                }
                Open::Heading(level as u8)
            }
            Tag::BlockQuote(..) => {
                self.quote_depth += 1;
                Open::Quote
            }
            Tag::CodeBlock(kind) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_string),
                    CodeBlockKind::Indented => None,
                };
                if self.list.is_some() {
                    push_break(&mut self.inlines);
                } else {
                    self.code = Some((language, String::new()));
                }
                Open::CodeBlock
            }
            Tag::HtmlBlock => Open::HtmlBlock,
            Tag::List(first) => {
                match self.list.as_mut() {
                    Some(list) => list.depth += 1,
                    None => {
                        self.flush_inlines(GenericKind::Paragraph);
                        self.list = Some(ListState {
                            ordered: first.is_some(),
                            start: first.map(|n| n as u32).unwrap_or(1),
                            ..Default::default()
                        });
                    }
                }
                Open::List
            }
            Tag::Item => {
                let nested = self.list.as_ref().map_or(false, |list| list.depth > 0);
                if nested {
                    push_break(&mut self.inlines);
                } else {
                    self.inlines.clear();
                }
                Open::Item
            }
            Tag::Table(_) => {
                self.cell_index = 0;
                Open::Table
            }
            Tag::TableHead | Tag::TableRow => {
                if has_visible_content(&self.inlines) {
                    push_text(&mut self.inlines, "\n");
                }
                self.cell_index = 0;
                Open::TableRow
            }
            Tag::TableCell => {
                if self.cell_index > 0 {
                    push_text(&mut self.inlines, " | ");
                }
                self.cell_index += 1;
                Open::TableCell
            }
            Tag::Link { dest_url, .. } => Open::Link {
                start: self.open_run(),
                url: dest_url.to_string(),
            },
            Tag::Image { dest_url, .. } => Open::Image {
                start: self.open_run(),
                src: dest_url.to_string(),
            },
            _ => Open::Other,
        };
        self.open.push(open);
    }

    fn end(&mut self, open: Open) {
        match open {
            Open::Paragraph => {
                if self.list.is_none() {
                    let kind = if self.quote_depth > 0 {
                        GenericKind::Quote
                    } else {
                        GenericKind::Paragraph
                    };
                    self.flush_inlines(kind);
                }
            }
            Open::Heading(level) => {
                if self.list.is_some() {
                    push_break(&mut self.inlines);
                } else {
                    let content = expand_embeds(std::mem::take(&mut self.inlines));
                    if has_visible_content(&content) {
                        self.blocks.push(Block::Heading { level, content });
                    }
                }
            }
            Open::Quote => {
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            Open::CodeBlock => {
                if let Some((language, code)) = self.code.take() {
                    let code = code.trim_end_matches('\n').to_string();
                    self.blocks.push(Block::CodeBlock { language, code });
                }
            }
            Open::HtmlBlock => {
                if self.list.is_none() {
                    self.flush_inlines(GenericKind::Html);
                }
            }
            Open::List => self.end_list(),
            Open::Item => {
                if let Some(list) = self.list.as_mut() {
                    if list.depth == 0 {
                        let content = expand_embeds(std::mem::take(&mut self.inlines));
                        list.items.push(ListItem::from_inlines(trim_inlines(content)));
                    }
                }
            }
            Open::Table => {
                if self.list.is_none() {
                    self.flush_inlines(GenericKind::Table);
                }
            }
            Open::TableRow | Open::TableCell | Open::Other => {}
            Open::Link { start, url } => self.close_link(start, &url),
            Open::Image { start, src } => {
                let start = start.min(self.inlines.len());
                let alt = crate::model::inline::plain_text(&self.inlines[start..]);
                self.inlines.truncate(start);
                let mut image = ImageRef::new(src);
                if !alt.is_empty() {
                    image = image.with_alt(alt);
                }
                self.inlines.push(Inline::Image(image));
            }
        }
    }

    fn end_list(&mut self) {
        let Some(list) = self.list.as_mut() else {
            return;
        };
        if list.depth > 0 {
            list.depth -= 1;
            return;
        }
        if let Some(list) = self.list.take() {
            if !list.items.is_empty() {
                self.blocks
                    .push(Block::List(List::new(list.ordered, list.start, list.items)));
            }
        }
    }

    /// Start a fresh text run for link or alt text and return its index.
    fn open_run(&mut self) -> usize {
        self.inlines.push(Inline::text(""));
        self.inlines.len() - 1
    }

    /// Replace the inlines opened at `start` with links.
    ///
    /// Images inside the link stay in place; text around them becomes link
    /// text.
    fn close_link(&mut self, start: usize, url: &str) {
        let start = start.min(self.inlines.len());
        let inner = self.inlines.split_off(start);

        let mut text: Vec<Inline> = Vec::new();
        for inline in inner {
            match inline {
                Inline::Image(_) | Inline::Placeholder { .. } | Inline::Link { .. } => {
                    push_link(&mut self.inlines, &mut text, url);
                    self.inlines.push(inline);
                }
                other => text.push(other),
            }
        }
        push_link(&mut self.inlines, &mut text, url);
    }

    fn flush_inlines(&mut self, kind: GenericKind) {
        let content = expand_embeds(std::mem::take(&mut self.inlines));
        if has_visible_content(&content) {
            self.blocks.push(Block::generic(kind, trim_inlines(content)));
        }
    }
}

fn push_text(out: &mut Vec<Inline>, text: &str) {
    if text.is_empty() {
        return;
    }
    match out.last_mut() {
        Some(Inline::Text { text: last }) => last.push_str(text),
        _ => out.push(Inline::text(text)),
    }
}

/// Turn pending link text into a link, dropping it if blank.
fn push_link(out: &mut Vec<Inline>, text: &mut Vec<Inline>, url: &str) {
    let label = crate::model::inline::plain_text(text);
    text.clear();
    if !label.trim().is_empty() {
        out.push(Inline::Link {
            text: label,
            url: url.to_string(),
        });
    }
}

/// End the current line of a list item, if it has any content.
fn push_break(out: &mut Vec<Inline>) {
    if !has_visible_content(out) {
        return;
    }
    if let Some(Inline::Text { text }) = out.last_mut() {
        let trimmed = text.trim_end().len();
        text.truncate(trimmed);
    }
    out.push(Inline::LineBreak);
}

/// Replace Obsidian `![[file|alt]]` embeds in text runs with images.
fn expand_embeds(content: Vec<Inline>) -> Vec<Inline> {
    let re = embed_regex();
    let mut out = Vec::with_capacity(content.len());
    for inline in content {
        let text = match inline {
            Inline::Text { text } if re.is_match(&text) => text,
            other => {
                out.push(other);
                continue;
            }
        };

        let mut last = 0;
        for caps in re.captures_iter(&text) {
            let Some(whole) = caps.get(0) else { continue };
            push_text(&mut out, &text[last..whole.start()]);
            let mut image = ImageRef::new(caps[1].trim());
            if let Some(alt) = caps.get(2).map(|m| m.as_str().trim()).filter(|a| !a.is_empty()) {
                image = image.with_alt(alt);
            }
            out.push(Inline::Image(image));
            last = whole.end();
        }
        push_text(&mut out, &text[last..]);
    }
    out
}

/// Trim leading and trailing whitespace and trailing breaks of a text run.
fn trim_inlines(mut content: Vec<Inline>) -> Vec<Inline> {
    while matches!(content.last(), Some(Inline::LineBreak)) {
        content.pop();
    }
    if let Some(Inline::Text { text }) = content.first_mut() {
        *text = text.trim_start().to_string();
    }
    if let Some(Inline::Text { text }) = content.last_mut() {
        *text = text.trim_end().to_string();
    }
    content.retain(|inline| !matches!(inline, Inline::Text { text } if text.is_empty()));
    content
}

/// Render a page set back to Markdown, one section per page.
pub fn to_markdown(pages: &PageSet) -> String {
    pages
        .iter()
        .map(page_markdown)
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR)
}

/// Render a single page to Markdown.
pub fn page_markdown(page: &Page) -> String {
    let mut output = String::new();
    for block in &page.blocks {
        render_block(&mut output, block);
    }
    output.trim_end().to_string() + "\n"
}

fn render_block(output: &mut String, block: &Block) {
    match block {
        Block::Heading { level, content } => {
            output.push_str(&"#".repeat(*level as usize));
            output.push(' ');
            render_inlines(output, content);
            output.push_str("\n\n");
        }
        Block::Generic { kind, content } => {
            let mut text = String::new();
            render_inlines(&mut text, content);
            match kind {
                GenericKind::Quote => {
                    for line in text.lines() {
                        output.push_str("> ");
                        output.push_str(line);
                        output.push('\n');
                    }
                }
                _ => {
                    output.push_str(&text);
                    output.push('\n');
                }
            }
            output.push('\n');
        }
        Block::CodeBlock { language, code } => {
            output.push_str("```");
            output.push_str(language.as_deref().unwrap_or(""));
            output.push('\n');
            output.push_str(code);
            output.push_str("\n```\n\n");
        }
        Block::List(list) => {
            for (i, item) in list.items.iter().enumerate() {
                let marker = if list.ordered {
                    format!("{}.", list.number_of(i))
                } else {
                    "-".to_string()
                };
                let indent = " ".repeat(marker.len() + 1);

                let mut text = String::new();
                render_inlines(&mut text, &item.content);
                output.push_str(&marker);
                output.push(' ');
                for (n, line) in text.lines().enumerate() {
                    if n > 0 {
                        output.push('\n');
                        if !line.is_empty() {
                            output.push_str(&indent);
                        }
                    }
                    output.push_str(line);
                }
                output.push('\n');
            }
            output.push('\n');
        }
        Block::Rule => output.push_str("---\n\n"),
    }
}

fn render_inlines(output: &mut String, content: &[Inline]) {
    for inline in content {
        match inline {
            Inline::Text { text } => output.push_str(text),
            Inline::Code { code } => {
                output.push('`');
                output.push_str(code);
                output.push('`');
            }
            Inline::LineBreak => output.push('\n'),
            Inline::Link { text, url } => output.push_str(&format!("[{}]({})", text, url)),
            Inline::Image(image) => {
                let alt = image.alt.as_deref().unwrap_or("");
                output.push_str(&format!("![{}]({})", alt, image.src));
            }
            Inline::Placeholder { message, .. } => {
                output.push('*');
                output.push_str(message);
                output.push('*');
            }
        }
    }
}
