//! Rendering functions for the mdast renderer.

use super::context::Context;
use super::types::Scope;
use crate::renderer::html_guard::{closes_embed, opens_unclosed_embed};
use markdown::mdast::{AlignKind, Node};

/// Renders a list node as `<ul>` or `<ol>`.
fn render_list(list: &markdown::mdast::List, ctx: &mut Context) {
    let tag = if list.ordered { "ol" } else { "ul" };
    match list.start {
        Some(start) if list.ordered && start != 1 => {
            ctx.push_raw(&format!("<{} start=\"{}\">", tag, start));
        }
        _ => ctx.push_raw(&format!("<{}>", tag)),
    }
    ctx.enter(Scope::List {
        spread: list.spread,
    });

    for child in &list.children {
        render_node(child, ctx);
    }

    ctx.exit();
    ctx.push_raw(&format!("</{}>", tag));
}

/// Renders a list item node as `<li>`.
///
/// Task list items (GFM) get a `task-list-item` class and a disabled checkbox.
fn render_list_item(item: &markdown::mdast::ListItem, ctx: &mut Context) {
    match item.checked {
        Some(checked) => {
            ctx.push_raw("<li class=\"task-list-item\">");
            let checked_str = if checked { " checked" } else { "" };
            ctx.push_raw(&format!("<input type=\"checkbox\" disabled{} /> ", checked_str));
        }
        None => ctx.push_raw("<li>"),
    }

    for child in &item.children {
        render_node(child, ctx);
    }

    ctx.push_raw("</li>");
}

/// Helper function to render a table row with proper alignment.
fn render_table_row(
    row: &markdown::mdast::TableRow,
    ctx: &mut Context,
    is_header: bool,
    aligns: &[AlignKind],
) {
    ctx.push_raw("<tr>");
    ctx.enter(Scope::TableRow);

    for (i, cell) in row.children.iter().enumerate() {
        if let Node::TableCell(c) = cell {
            let tag = if is_header { "th" } else { "td" };

            let align_attr = match aligns.get(i) {
                Some(AlignKind::Left) => " align=\"left\"",
                Some(AlignKind::Right) => " align=\"right\"",
                Some(AlignKind::Center) => " align=\"center\"",
                Some(AlignKind::None) | None => "",
            };

            ctx.push_raw(&format!("<{}{}>", tag, align_attr));
            ctx.enter(Scope::TableCell);

            for child in &c.children {
                render_node(child, ctx);
            }

            ctx.exit(); // TableCell
            ctx.push_raw(&format!("</{}>", tag));
        }
    }

    ctx.exit(); // TableRow
    ctx.push_raw("</tr>");
}

/// Renders a table node as `<table>` with `<thead>` and optional `<tbody>`.
fn render_table(table: &markdown::mdast::Table, ctx: &mut Context) {
    ctx.enter(Scope::Table);
    ctx.push_raw("<table>");

    ctx.push_raw("<thead>");
    if let Some(Node::TableRow(row)) = table.children.first() {
        render_table_row(row, ctx, true, &table.align);
    }
    ctx.push_raw("</thead>");

    if table.children.len() > 1 {
        ctx.push_raw("<tbody>");
        for row in table.children.iter().skip(1) {
            if let Node::TableRow(r) = row {
                render_table_row(r, ctx, false, &table.align);
            }
        }
        ctx.push_raw("</tbody>");
    }

    ctx.push_raw("</table>");
    ctx.exit(); // Table
}

/// Renders a paragraph node, suppressing `<p>` wrappers in tight lists.
fn render_paragraph(para: &markdown::mdast::Paragraph, ctx: &mut Context) {
    let in_tight_list = ctx.is_in_tight_list();
    if !in_tight_list {
        ctx.push_raw("<p>");
    }

    ctx.enter(Scope::Paragraph);
    render_children(&para.children, ctx);
    ctx.exit();

    if !in_tight_list {
        ctx.push_raw("</p>");
    }
}

/// Renders a link node as `<a>`.
fn render_link(link: &markdown::mdast::Link, ctx: &mut Context) {
    ctx.push_raw(r#"<a href=""#);
    ctx.push_attr_value(&link.url);
    ctx.push_raw(r#"""#);

    if let Some(title) = &link.title {
        ctx.push_raw(r#" title=""#);
        ctx.push_attr_value(title);
        ctx.push_raw(r#"""#);
    }

    ctx.push_raw(">");
    render_children(&link.children, ctx);
    ctx.push_raw("</a>");
}

/// Renders a heading node as `<h1>`..`<h6>`.
fn render_heading(heading: &markdown::mdast::Heading, ctx: &mut Context) {
    let tag = format!("h{}", heading.depth);
    ctx.push_raw(&format!("<{}>", tag));
    ctx.enter(Scope::Heading);
    render_children(&heading.children, ctx);
    ctx.exit();
    ctx.push_raw(&format!("</{}>", tag));
}

/// Renders a footnote definition into the trailing footnote section.
fn render_footnote_definition(
    definition: &markdown::mdast::FootnoteDefinition,
    ctx: &mut Context,
) {
    ctx.capture_footnote(&definition.identifier, |ctx| {
        render_children(&definition.children, ctx);
    });
}

/// Wraps children in a fixed inline tag.
fn render_wrapped(tag: &str, children: &[Node], ctx: &mut Context) {
    ctx.push_raw(&format!("<{}>", tag));
    render_children(children, ctx);
    ctx.push_raw(&format!("</{}>", tag));
}

/// Renders sibling nodes in order.
///
/// An inline `<iframe …>` is closed by the guard, so the `</iframe>` node
/// right after it is dropped instead of being escaped as text.
fn render_children(children: &[Node], ctx: &mut Context) {
    let mut siblings = children.iter().peekable();
    while let Some(child) = siblings.next() {
        render_node(child, ctx);

        if let Node::Html(html) = child {
            if opens_unclosed_embed(&html.value) {
                let _ = siblings.next_if(|next| {
                    matches!(next, Node::Html(close) if closes_embed(&close.value))
                });
            }
        }
    }
}

/// Recursively renders an AST node to HTML, updating the context state.
///
/// Images, raw HTML and code go through the registry first; every other
/// node kind is rendered here.
pub fn render_node(node: &Node, ctx: &mut Context) {
    if let Some(output) = ctx.registry().dispatch(node) {
        ctx.push_override(output, node.position());
        return;
    }

    match node {
        Node::Root(root) => render_children(&root.children, ctx),
        Node::Text(text) => ctx.push_text(&text.value),
        Node::Paragraph(para) => render_paragraph(para, ctx),
        Node::Heading(heading) => render_heading(heading, ctx),
        Node::Link(link) => render_link(link, ctx),
        Node::LinkReference(link) => render_children(&link.children, ctx),
        Node::ImageReference(image) => ctx.push_text(&image.alt),
        Node::Strong(strong) => render_wrapped("strong", &strong.children, ctx),
        Node::Emphasis(emphasis) => render_wrapped("em", &emphasis.children, ctx),
        Node::Delete(delete) => render_wrapped("del", &delete.children, ctx),
        Node::InlineCode(code) => {
            ctx.push_raw("<code>");
            ctx.push_text(&code.value);
            ctx.push_raw("</code>");
        }
        Node::Blockquote(quote) => render_wrapped("blockquote", &quote.children, ctx),
        Node::List(list) => render_list(list, ctx),
        Node::ListItem(item) => render_list_item(item, ctx),
        Node::Table(table) => render_table(table, ctx),
        Node::TableRow(_) | Node::TableCell(_) => {}
        Node::ThematicBreak(_) => ctx.push_raw("<hr />"),
        Node::Break(_) => ctx.push_raw("<br />"),
        Node::Definition(_) => {}
        Node::FootnoteReference(reference) => ctx.push_footnote_call(&reference.identifier),
        Node::FootnoteDefinition(definition) => render_footnote_definition(definition, ctx),
        _ => {
            log::debug!("Skipping unsupported markdown node: {:?}", node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RendererRegistry;
    use crate::renderer::highlight::{CodeStyle, PlainHighlighter};
    use crate::renderer::image::ResolvedImage;
    use crate::renderer::mdast::types::RenderBlock;
    use folio_core::{ParseOptions, ResolveError, parse_mdast};

    fn identity(path: &str) -> Result<ResolvedImage, ResolveError> {
        Ok(ResolvedImage::new(path, [(path, "1x")]))
    }

    fn render_blocks(input: &str) -> Vec<RenderBlock> {
        let registry = RendererRegistry::new(&identity, &PlainHighlighter, CodeStyle::default());
        let tree = parse_mdast(input, &ParseOptions::content()).unwrap();
        let mut ctx = Context::new(&registry);
        render_node(&tree, &mut ctx);
        ctx.finish(None).blocks
    }

    fn render_html(input: &str) -> String {
        let mut out = String::new();
        for block in render_blocks(input) {
            block.write_html(&mut out);
        }
        out
    }

    #[test]
    fn test_paragraph() {
        assert_eq!(render_html("This is a paragraph."), "<p>This is a paragraph.</p>");
    }

    #[test]
    fn test_heading_and_emphasis() {
        assert_eq!(
            render_html("## Hello *big* **world** ~~x~~"),
            "<h2>Hello <em>big</em> <strong>world</strong> <del>x</del></h2>"
        );
    }

    #[test]
    fn test_link_attributes_are_escaped() {
        assert_eq!(
            render_html(r#"[Rust](https://www.rust-lang.org/?a=1&b=2 "The \"book\"")"#),
            r#"<p><a href="https://www.rust-lang.org/?a=1&amp;b=2" title="The &quot;book&quot;">Rust</a></p>"#
        );
    }

    #[test]
    fn test_tight_list_has_no_paragraphs() {
        assert_eq!(render_html("- one\n- two"), "<ul><li>one</li><li>two</li></ul>");
    }

    #[test]
    fn test_loose_list_keeps_paragraphs() {
        assert_eq!(
            render_html("1. one\n\n2. two"),
            "<ol><li><p>one</p></li><li><p>two</p></li></ol>"
        );
    }

    #[test]
    fn test_task_list_items() {
        assert_eq!(
            render_html("- [x] done\n- [ ] todo"),
            concat!(
                r#"<ul><li class="task-list-item"><input type="checkbox" disabled checked /> done</li>"#,
                r#"<li class="task-list-item"><input type="checkbox" disabled /> todo</li></ul>"#
            )
        );
    }

    #[test]
    fn test_table_alignment() {
        assert_eq!(
            render_html("| a | b |\n| :- | -: |\n| 1 | 2 |"),
            concat!(
                r#"<table><thead><tr><th align="left">a</th><th align="right">b</th></tr></thead>"#,
                r#"<tbody><tr><td align="left">1</td><td align="right">2</td></tr></tbody></table>"#
            )
        );
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(render_html("a &amp; b \\<c\\>"), "<p>a &amp; b &lt;c&gt;</p>");
    }

    #[test]
    fn test_inline_code_and_blockquote() {
        assert_eq!(
            render_html("> use `<b>`"),
            "<blockquote><p>use <code>&lt;b&gt;</code></p></blockquote>"
        );
    }

    #[test]
    fn test_top_level_code_is_its_own_block() {
        let blocks = render_blocks("before\n\n```rust\nfn main() {}\n```\n\nafter");
        assert_eq!(blocks.len(), 3);
        assert!(matches!(&blocks[0], RenderBlock::Html { content } if content == "<p>before</p>"));
        assert!(matches!(
            &blocks[1],
            RenderBlock::Code { code, language, .. } if code == "fn main() {}" && language == "javascript"
        ));
        assert!(matches!(&blocks[2], RenderBlock::Html { content } if content == "<p>after</p>"));
    }

    #[test]
    fn test_code_in_list_stays_inline() {
        let blocks = render_blocks("- item\n\n  ```\n  x\n  ```");
        assert_eq!(blocks.len(), 1);
        let RenderBlock::Html { content } = &blocks[0] else {
            panic!("expected html block");
        };
        assert!(content.contains("<pre><code>x</code></pre>"));
    }

    #[test]
    fn test_inline_iframe_stays_in_its_paragraph() {
        assert_eq!(
            render_html("Watch <iframe src=\"https://x\"></iframe> now\n\nNext paragraph"),
            concat!(
                r#"<p>Watch <span class="Content--Iframe"><iframe src="https://x"></iframe></span> now</p>"#,
                "<p>Next paragraph</p>"
            )
        );
    }

    #[test]
    fn test_inline_iframe_in_heading_and_tight_list() {
        assert_eq!(
            render_html("## See <iframe src=\"x\"></iframe>"),
            r#"<h2>See <span class="Content--Iframe"><iframe src="x"></iframe></span></h2>"#
        );
        assert_eq!(
            render_html("- see <iframe src=\"x\"></iframe>"),
            r#"<ul><li>see <span class="Content--Iframe"><iframe src="x"></iframe></span></li></ul>"#
        );
    }

    #[test]
    fn test_stray_closing_tag_is_still_escaped() {
        assert_eq!(render_html("a </iframe> b"), "<p>a &lt;/iframe&gt; b</p>");
    }

    #[test]
    fn test_footnotes_render_in_trailing_section() {
        assert_eq!(
            render_html("Claim[^1] and again[^1].\n\n[^1]: The source."),
            concat!(
                r##"<p>Claim<sup><a href="#fn-1" id="fnref-1">1</a></sup> and again"##,
                r##"<sup><a href="#fn-1" id="fnref-1-2">1</a></sup>.</p>"##,
                r#"<section class="Content--Footnotes"><ol><li id="fn-1"><p>The source.</p>"#,
                r##"<a href="#fnref-1" class="Content--Footnote-backref">↩</a>"##,
                r##"<a href="#fnref-1-2" class="Content--Footnote-backref">↩</a></li></ol></section>"##
            )
        );
    }

    #[test]
    fn test_code_in_footnote_stays_inside_the_note() {
        let blocks = render_blocks("Text[^n].\n\n[^n]: Note.\n\n    ```\n    x\n    ```");
        assert_eq!(blocks.len(), 1);
        let RenderBlock::Html { content } = &blocks[0] else {
            panic!("expected html block");
        };
        assert!(content.contains(r#"<li id="fn-n"><p>Note.</p><pre><code>x</code></pre>"#));
    }

    #[test]
    fn test_thematic_break_and_hard_break() {
        let html = render_html("a  \nb\n\n***");
        assert!(html.starts_with("<p>a<br />"));
        assert!(html.ends_with("b</p><hr />"));
    }
}
