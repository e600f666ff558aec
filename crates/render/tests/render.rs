use folio_render::{
    BatchInput, BatchOptions, ContentRenderer, DiagnosticKind, Highlighter, PlainHighlighter,
    RenderBlock, RenderConfig, RenderError, RenderOptions, ResolveError, ResolvedImage,
    StaticResolver, SyntectHighlighter, render, render_batch,
};

fn identity(path: &str) -> Result<ResolvedImage, ResolveError> {
    Ok(ResolvedImage::new(path, [(path, "1x")]))
}

fn render_html(source: &str) -> String {
    let config = RenderConfig::new(&identity, &PlainHighlighter);
    render(Some(source), &config).unwrap().to_html()
}

struct Recording;

impl Highlighter for Recording {
    fn highlight(&self, code: &str, language: &str, theme: &str) -> String {
        format!("<pre data-lang=\"{language}\" data-theme=\"{theme}\">{code}</pre>")
    }
}

#[test]
fn iframe_blocks_are_wrapped() {
    insta::assert_snapshot!(
        render_html("<iframe src=\"https://x\"></iframe>"),
        @r#"<div class="Content"><div class="Content--Iframe"><iframe src="https://x"></iframe></div></div>"#
    );
}

#[test]
fn inline_iframe_keeps_the_rest_of_the_document() {
    insta::assert_snapshot!(
        render_html("Watch <iframe src=\"https://x\"></iframe> now\n\nNext paragraph"),
        @r#"<div class="Content"><p>Watch <span class="Content--Iframe"><iframe src="https://x"></iframe></span> now</p><p>Next paragraph</p></div>"#
    );
}

#[test]
fn iframe_block_with_other_markup_is_trusted_whole() {
    assert_eq!(
        render_html("<iframe src=\"https://x\"></iframe>\n<p>caption</p>\n\nAfter"),
        concat!(
            r#"<div class="Content"><div class="Content--Iframe"><iframe src="https://x"></iframe>"#,
            "\n",
            r#"<p>caption</p></div><p>After</p></div>"#
        )
    );
}

#[test]
fn other_html_blocks_are_inert() {
    insta::assert_snapshot!(
        render_html("<script>alert(1)</script>"),
        @r#"<div class="Content">&lt;script&gt;alert(1)&lt;/script&gt;</div>"#
    );
}

#[test]
fn images_get_src_and_srcset() {
    let resolver = StaticResolver::new().with(
        "/img/my photo.jpg",
        ResolvedImage::new("a.jpg", [("a-1x.jpg", "1x"), ("a-2x.jpg", "2x")]),
    );
    let config = RenderConfig::new(&resolver, &PlainHighlighter);
    let document = render(Some("![A photo](/img/my photo.jpg)"), &config).unwrap();

    assert!(!document.diagnostics.has_any());
    insta::assert_snapshot!(
        document.to_html(),
        @r#"<div class="Content"><p><img class="Content--Image" src="a.jpg" srcset="a-1x.jpg 1x, a-2x.jpg 2x" alt="A photo" /></p></div>"#
    );
}

#[test]
fn link_destinations_with_spaces_are_encoded() {
    insta::assert_snapshot!(
        render_html("[x](/my file.png)"),
        @r#"<div class="Content"><p><a href="/my%20file.png">x</a></p></div>"#
    );
}

#[test]
fn nested_parentheses_stay_in_the_destination() {
    insta::assert_snapshot!(
        render_html("[wiki](https://en.wikipedia.org/wiki/Rust_(programming language))"),
        @r#"<div class="Content"><p><a href="https://en.wikipedia.org/wiki/Rust_(programming%20language)">wiki</a></p></div>"#
    );
}

#[test]
fn decode_failure_does_not_affect_siblings() {
    let config = RenderConfig::new(&identity, &PlainHighlighter);
    let document = render(Some("![bad](/img/%FF.png) ![ok](/ok.png)"), &config).unwrap();

    assert_eq!(document.diagnostics.count_of(DiagnosticKind::DecodeError), 1);
    assert_eq!(document.diagnostics.entries.len(), 1);
    insta::assert_snapshot!(
        document.to_html(),
        @r#"<div class="Content"><p><span class="Content--Image-fallback">bad</span> <img class="Content--Image" src="/ok.png" srcset="/ok.png 1x" alt="ok" /></p></div>"#
    );
}

#[test]
fn resolver_failure_keeps_a_plain_image() {
    let resolver = StaticResolver::new();
    let config = RenderConfig::new(&resolver, &PlainHighlighter);
    let document = render(Some("![gone](/missing.png)"), &config).unwrap();

    assert_eq!(
        document.diagnostics.count_of(DiagnosticKind::ResolverFailure),
        1
    );
    let location = document.diagnostics.entries[0].location.clone().unwrap();
    assert_eq!((location.line, location.column), (1, 1));
    insta::assert_snapshot!(
        document.to_html(),
        @r#"<div class="Content"><p><img class="Content--Image" src="/missing.png" alt="gone" /></p></div>"#
    );
}

#[test]
fn code_blocks_use_the_configured_style() {
    let config = RenderConfig::new(&identity, &Recording);
    let document = render(Some("```python\nprint(1)\n```"), &config).unwrap();

    assert_eq!(
        document.blocks,
        vec![RenderBlock::Code {
            code: "print(1)".to_string(),
            language: "javascript".to_string(),
            theme: "InspiredGitHub".to_string(),
            html: r#"<pre data-lang="javascript" data-theme="InspiredGitHub">print(1)</pre>"#
                .to_string(),
        }]
    );
}

#[test]
fn absent_or_empty_source_is_invalid_input() {
    let config = RenderConfig::new(&identity, &PlainHighlighter);
    assert!(matches!(
        render(None, &config),
        Err(RenderError::InvalidInput(_))
    ));
    assert!(matches!(
        render(Some(""), &config),
        Err(RenderError::InvalidInput(_))
    ));
}

#[test]
fn rendering_is_deterministic() {
    let source = "# Title\n\n![a](/a b.png)\n\n```js\nconst a = 1;\n```\n\n<iframe src=\"x\"></iframe>\n\n<b>no</b>";
    let highlighter = SyntectHighlighter::new();
    let config = RenderConfig::new(&identity, &highlighter).with_class_name("post");

    let first = render(Some(source), &config).unwrap();
    let second = render(Some(source), &config).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_html(), second.to_html());
}

#[test]
fn content_renderer_resolves_cdn_images() {
    let renderer = ContentRenderer::new(RenderOptions::default());
    let document = renderer
        .render(Some("![x](https://ucarecdn.com/abc/)"))
        .unwrap();

    insta::assert_snapshot!(
        document.to_html(),
        @r#"<div class="Content"><p><img class="Content--Image" src="https://ucarecdn.com/abc/-/resize/1200x/" srcset="https://ucarecdn.com/abc/-/resize/300x/ 300w, https://ucarecdn.com/abc/-/resize/600x/ 600w, https://ucarecdn.com/abc/-/resize/1200x/ 1200w, https://ucarecdn.com/abc/-/resize/1800x/ 1800w" alt="x" /></p></div>"#
    );
}

#[test]
fn spaced_image_paths_are_encoded_in_src_and_srcset() {
    let document = ContentRenderer::default()
        .render(Some("![a](/img/my photo.jpg)"))
        .unwrap();

    insta::assert_snapshot!(
        document.to_html(),
        @r#"<div class="Content"><p><img class="Content--Image" src="/img/my%20photo.jpg" srcset="/img/my%20photo.jpg 1x" alt="a" /></p></div>"#
    );
}

#[test]
fn reserved_escapes_reach_the_resolver_encoded() {
    let resolver = StaticResolver::new().with(
        "/img/a%2Fb.png",
        ResolvedImage::new("/img/a%2Fb.png", [("/img/a%2Fb.png", "1x")]),
    );
    let config = RenderConfig::new(&resolver, &PlainHighlighter);
    let document = render(Some("![a](/img/a%2Fb.png)"), &config).unwrap();

    assert!(!document.diagnostics.has_any());
}

#[test]
fn footnotes_are_kept() {
    insta::assert_snapshot!(
        render_html("Claim[^1].\n\n[^1]: The source."),
        @r##"<div class="Content"><p>Claim<sup><a href="#fn-1" id="fnref-1">1</a></sup>.</p><section class="Content--Footnotes"><ol><li id="fn-1"><p>The source.</p><a href="#fnref-1" class="Content--Footnote-backref">↩</a></li></ol></section></div>"##
    );
}

#[test]
fn src_alias_is_rendered_when_source_is_missing() {
    let renderer = ContentRenderer::default();
    let document = renderer.render_content(None, Some("from *src*")).unwrap();
    assert_eq!(
        document.to_html(),
        r#"<div class="Content"><p>from <em>src</em></p></div>"#
    );
}

#[test]
fn batch_preserves_input_order() {
    let config = RenderConfig::new(&identity, &PlainHighlighter);
    let inputs: Vec<BatchInput> = (0..32)
        .map(|i| BatchInput::new(format!("doc-{i}"), format!("# Doc {i}")))
        .collect();

    let outcome = render_batch(inputs, &config, &BatchOptions::default());

    assert_eq!(outcome.stats.total, 32);
    assert_eq!(outcome.stats.succeeded, 32);
    for (i, result) in outcome.results.iter().enumerate() {
        assert_eq!(result.id, format!("doc-{i}"));
        let html = result.document.as_ref().unwrap().to_html();
        assert_eq!(html, format!(r#"<div class="Content"><h1>Doc {i}</h1></div>"#));
    }
}
