//! Rich-text body rendering.
//!
//! A [`BlockRegistry`] maps block tags (see [`Block::tag`]) and mark tags
//! to render functions. Tags without an entry go to the registry's
//! default renderer, so new block types never break a page.

use domain::rich_text::{Block, ListKind, MarkDef, Span};
use std::collections::HashMap;
use storage::ImageUrls;
use tracing::debug;

use crate::escape::html_escape;

/// What a block renderer gets to work with.
pub struct BlockView<'a> {
    pub block: &'a Block,
    /// Already rendered (and escaped) inline content.
    pub children: &'a str,
    pub images: &'a ImageUrls,
}

/// What a mark renderer gets to work with.
pub struct MarkView<'a> {
    /// Decorator name (`strong`, `em`...) or annotation type (`link`...).
    pub tag: &'a str,
    /// Set for annotations, which carry their data in the block's `markDefs`.
    pub def: Option<&'a MarkDef>,
    pub children: &'a str,
}

pub type BlockFn = fn(&BlockView<'_>) -> String;
pub type MarkFn = fn(&MarkView<'_>) -> String;

#[derive(Clone)]
pub struct BlockRegistry {
    blocks: HashMap<String, BlockFn>,
    marks: HashMap<String, MarkFn>,
    default_block: BlockFn,
    default_mark: MarkFn,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl BlockRegistry {
    /// A registry with nothing but the fallbacks.
    pub fn empty() -> Self {
        Self {
            blocks: HashMap::new(),
            marks: HashMap::new(),
            default_block: fallback_block,
            default_mark: fallback_mark,
        }
    }

    /// Plain HTML for the common block styles, decorators and links.
    pub fn standard() -> Self {
        Self::empty()
            .with_block("normal", |v| format!("<p>{}</p>", v.children))
            .with_block("h1", |v| format!("<h1>{}</h1>", v.children))
            .with_block("h2", |v| format!("<h2>{}</h2>", v.children))
            .with_block("h3", |v| format!("<h3>{}</h3>", v.children))
            .with_block("h4", |v| format!("<h4>{}</h4>", v.children))
            .with_block("h5", |v| format!("<h5>{}</h5>", v.children))
            .with_block("h6", |v| format!("<h6>{}</h6>", v.children))
            .with_block("blockquote", |v| {
                format!("<blockquote>{}</blockquote>", v.children)
            })
            .with_block("li", |v| format!("<li>{}</li>", v.children))
            .with_block("image", image_block)
            .with_mark("strong", |v| format!("<strong>{}</strong>", v.children))
            .with_mark("em", |v| format!("<em>{}</em>", v.children))
            .with_mark("code", |v| format!("<code>{}</code>", v.children))
            .with_mark("underline", |v| {
                format!(r#"<span style="text-decoration:underline">{}</span>"#, v.children)
            })
            .with_mark("strike-through", |v| format!("<del>{}</del>", v.children))
            .with_mark("link", |v| match v.def.and_then(|d| d.href.as_deref()) {
                Some(href) => format!(r#"<a href="{}">{}</a>"#, html_escape(href), v.children),
                None => v.children.to_string(),
            })
    }

    /// The standard set with the post page's heading, list item and link
    /// overrides.
    pub fn post_body() -> Self {
        Self::standard()
            .with_block("h1", |v| {
                format!(r#"<h1 class="my-5 text-2xl font-bold">{}</h1>"#, v.children)
            })
            .with_block("h2", |v| {
                format!(r#"<h2 class="my-5 text-xl font-bold">{}</h2>"#, v.children)
            })
            .with_block("li", |v| {
                format!(r#"<li class="ml-4 list-disc">{}</li>"#, v.children)
            })
            .with_mark("link", |v| match v.def.and_then(|d| d.href.as_deref()) {
                Some(href) => format!(
                    r#"<a href="{}" class="text-blue-500 hover:underline">{}</a>"#,
                    html_escape(href),
                    v.children
                ),
                None => v.children.to_string(),
            })
    }

    pub fn with_block(mut self, tag: impl Into<String>, f: BlockFn) -> Self {
        self.blocks.insert(tag.into(), f);
        self
    }

    pub fn with_mark(mut self, tag: impl Into<String>, f: MarkFn) -> Self {
        self.marks.insert(tag.into(), f);
        self
    }

    pub fn with_default_block(mut self, f: BlockFn) -> Self {
        self.default_block = f;
        self
    }

    pub fn block_fn(&self, tag: &str) -> BlockFn {
        self.blocks.get(tag).copied().unwrap_or(self.default_block)
    }

    pub fn mark_fn(&self, tag: &str) -> MarkFn {
        self.marks.get(tag).copied().unwrap_or(self.default_mark)
    }

    /// Renders a whole body. Runs of list items become one `<ul>`/`<ol>`.
    pub fn render(&self, blocks: &[Block], images: &ImageUrls) -> String {
        let mut out = String::new();
        let mut open_list: Option<ListKind> = None;

        for block in blocks {
            let kind = block.list_kind();
            if open_list != kind {
                if let Some(prev) = open_list {
                    out.push_str(list_close(prev));
                }
                if let Some(next) = kind {
                    out.push_str(list_open(next));
                }
                open_list = kind;
            }
            out.push_str(&self.render_block(block, images));
        }

        if let Some(prev) = open_list {
            out.push_str(list_close(prev));
        }
        out
    }

    fn render_block(&self, block: &Block, images: &ImageUrls) -> String {
        let children: String = block
            .children
            .iter()
            .map(|span| self.render_span(block, span))
            .collect();
        let view = BlockView {
            block,
            children: &children,
            images,
        };
        (self.block_fn(block.tag()))(&view)
    }

    fn render_span(&self, block: &Block, span: &Span) -> String {
        let mut html = html_escape(&span.text).replace('\n', "<br/>");
        // 第一个 mark 在最内层
        for mark in &span.marks {
            let def = block.mark_def(mark);
            let tag = def.map(|d| d.mark_type.as_str()).unwrap_or(mark.as_str());
            let view = MarkView {
                tag,
                def,
                children: &html,
            };
            html = (self.mark_fn(tag))(&view);
        }
        html
    }
}

fn list_open(kind: ListKind) -> &'static str {
    match kind {
        ListKind::Bullet => "<ul>",
        ListKind::Number => "<ol>",
    }
}

fn list_close(kind: ListKind) -> &'static str {
    match kind {
        ListKind::Bullet => "</ul>",
        ListKind::Number => "</ol>",
    }
}

fn fallback_block(view: &BlockView<'_>) -> String {
    if view.block.is_text() {
        return format!("<p>{}</p>", view.children);
    }
    debug!("No renderer for block type '{}'", view.block.block_type);
    String::new()
}

fn fallback_mark(view: &MarkView<'_>) -> String {
    view.children.to_string()
}

fn image_block(view: &BlockView<'_>) -> String {
    let asset_ref = view
        .block
        .extra
        .get("asset")
        .and_then(|a| a.get("_ref"))
        .and_then(|r| r.as_str());
    let Some(src) = asset_ref.and_then(|r| view.images.url_for_ref(r)) else {
        return String::new();
    };
    let alt = view
        .block
        .extra
        .get("alt")
        .and_then(|a| a.as_str())
        .unwrap_or("");
    format!(
        r#"<figure><img src="{}" alt="{}"/></figure>"#,
        html_escape(&src),
        html_escape(alt)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::CmsConfig;

    fn blocks(v: serde_json::Value) -> Vec<Block> {
        serde_json::from_value(v).unwrap()
    }

    fn images() -> ImageUrls {
        ImageUrls::new(&CmsConfig::new("proj", "production"))
    }

    #[test]
    fn standard_renders_paragraphs_and_headings() {
        let body = blocks(serde_json::json!([
            { "_type": "block", "style": "h1", "children": [{ "text": "Title" }] },
            { "_type": "block", "style": "normal", "children": [{ "text": "a < b" }] }
        ]));
        let html = BlockRegistry::standard().render(&body, &images());
        assert_eq!(html, "<h1>Title</h1><p>a &lt; b</p>");
    }

    #[test]
    fn post_body_overrides_headings_lists_and_links() {
        let body = blocks(serde_json::json!([
            { "_type": "block", "style": "h2", "children": [{ "text": "Intro" }] },
            { "_type": "block", "listItem": "bullet", "children": [{ "text": "one" }] },
            { "_type": "block", "listItem": "bullet", "children": [{ "text": "two" }] },
            { "_type": "block",
              "children": [{ "text": "docs", "marks": ["l1"] }],
              "markDefs": [{ "_key": "l1", "_type": "link", "href": "https://example.com/?a=1&b=2" }] }
        ]));
        let html = BlockRegistry::post_body().render(&body, &images());
        assert_eq!(
            html,
            concat!(
                r#"<h2 class="my-5 text-xl font-bold">Intro</h2>"#,
                r#"<ul><li class="ml-4 list-disc">one</li><li class="ml-4 list-disc">two</li></ul>"#,
                r#"<p><a href="https://example.com/?a=1&amp;b=2" class="text-blue-500 hover:underline">docs</a></p>"#
            )
        );
    }

    #[test]
    fn unregistered_tags_use_defaults() {
        let body = blocks(serde_json::json!([
            { "_type": "block", "style": "fancy", "children": [{ "text": "styled", "marks": ["sparkle"] }] },
            { "_type": "youtube", "url": "https://youtu.be/x" }
        ]));
        let html = BlockRegistry::standard().render(&body, &images());
        assert_eq!(html, "<p>styled</p>");

        let custom = BlockRegistry::empty()
            .with_default_block(|v| format!("[{}]", v.block.tag()))
            .render(&body, &images());
        assert_eq!(custom, "[fancy][youtube]");
    }

    #[test]
    fn nested_marks_and_numbered_lists() {
        let body = blocks(serde_json::json!([
            { "_type": "block", "listItem": "number", "children": [{ "text": "x", "marks": ["strong", "em"] }] },
            { "_type": "block", "listItem": "bullet", "children": [{ "text": "y" }] }
        ]));
        let html = BlockRegistry::standard().render(&body, &images());
        assert_eq!(
            html,
            "<ol><li><em><strong>x</strong></em></li></ol><ul><li>y</li></ul>"
        );
    }

    #[test]
    fn unknown_list_kinds_render_as_plain_blocks() {
        let body = blocks(serde_json::json!([
            { "_type": "block", "listItem": "bullet", "children": [{ "text": "one" }] },
            { "_type": "block", "listItem": "checklist", "children": [{ "text": "todo" }] },
            { "_type": "block", "listItem": "bullet", "children": [{ "text": "two" }] }
        ]));
        let html = BlockRegistry::standard().render(&body, &images());
        assert_eq!(html, "<ul><li>one</li></ul><p>todo</p><ul><li>two</li></ul>");
    }

    #[test]
    fn image_blocks_resolve_to_cdn() {
        let body = blocks(serde_json::json!([
            { "_type": "image", "alt": "Cat", "asset": { "_ref": "image-abc-10x20-png" } }
        ]));
        let html = BlockRegistry::standard().render(&body, &images());
        assert_eq!(
            html,
            r#"<figure><img src="https://cdn.sanity.io/images/proj/production/abc-10x20.png" alt="Cat"/></figure>"#
        );
    }
}
