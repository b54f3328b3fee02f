mod common;

use common::MemoryVault;
use devpub::Transformer;

#[tokio::test]
async fn test_resolves_links_to_note_urls() {
    let vault = MemoryVault::new()
        .with_note("note.md", "Line1: [[File1]]\nLine2: [[File2]]\nLine3: [[File3]]")
        .with_note("File1.md", "---\nurl: https://example.com/file1\n---\nFile 1")
        .with_note("File2.md", "File 2 has no url");

    let markdown = Transformer::new(&vault).generate_markdown("note.md").await.unwrap();
    assert_eq!(
        markdown,
        "Line1: [File1](https://example.com/file1)\nLine2: File2\nLine3: File3"
    );
}

#[tokio::test]
async fn test_alias_is_used_as_link_text() {
    let vault = MemoryVault::new()
        .with_note("note.md", "See [[File1|the first file]].")
        .with_note("File1.md", "---\nurl: https://example.com/file1\n---\n");

    let markdown = Transformer::new(&vault).generate_markdown("note.md").await.unwrap();
    assert_eq!(markdown, "See [the first file](https://example.com/file1).");
}

#[tokio::test]
async fn test_non_string_url_is_ignored() {
    let vault = MemoryVault::new()
        .with_note("note.md", "[[File1]]")
        .with_note("File1.md", "---\nurl: 42\n---\n");

    let markdown = Transformer::new(&vault).generate_markdown("note.md").await.unwrap();
    assert_eq!(markdown, "File1");
}

#[tokio::test]
async fn test_strips_everything_through_first_heading() {
    let vault = MemoryVault::new()
        .with_note(
            "note.md",
            "Line1: [[File1]]\n\n# Heading\n\nLine2: [[File2]]\nLine3: [[File3]]",
        )
        .with_note("File1.md", "---\nurl: https://example.com/file1\n---\n")
        .with_note("File2.md", "no url");

    let transformer = Transformer::new(&vault);
    assert_eq!(transformer.generate_title("note.md").await.unwrap(), "Heading");
    assert_eq!(
        transformer.generate_markdown("note.md").await.unwrap(),
        "Line2: File2\nLine3: File3"
    );
}

#[tokio::test]
async fn test_link_at_start_of_heading_line() {
    let vault = MemoryVault::new().with_note("note.md", "[[Intro]]\n# Title\nBody [[Intro]]");

    let markdown = Transformer::new(&vault).generate_markdown("note.md").await.unwrap();
    assert_eq!(markdown, "Body Intro");
}

#[tokio::test]
async fn test_frontmatter_is_stripped() {
    let vault = MemoryVault::new().with_note(
        "note.md",
        "---\ndev-tags:\n  - rust\n---\n# Title\n\nBody text\n",
    );

    let markdown = Transformer::new(&vault).generate_markdown("note.md").await.unwrap();
    assert_eq!(markdown, "Body text");
}

#[tokio::test]
async fn test_frontmatter_is_stripped_without_heading() {
    let vault = MemoryVault::new().with_note("note.md", "---\nfoo: Bar\n---\n\nFoo bar\n");

    let transformer = Transformer::new(&vault);
    assert_eq!(transformer.generate_markdown("note.md").await.unwrap(), "Foo bar");
    assert_eq!(transformer.generate_title("note.md").await.unwrap(), "Heading Missing");
}

#[tokio::test]
async fn test_currency_untouched_without_mathjax() {
    let text = "Income: 120$\n\nExpenses: 80$\n\nProfit: 40$";
    let vault = MemoryVault::new().with_note("note.md", text);

    let markdown = Transformer::new(&vault).generate_markdown("note.md").await.unwrap();
    assert_eq!(markdown, text);
}

#[tokio::test]
async fn test_math_with_mathjax_enabled() {
    let vault = MemoryVault::new().with_note(
        "note.md",
        "---\ndev-enable-mathjax: true\n---\nOur $CO_2$ reporting!\n\n$$\nx^2\n$$",
    );

    let markdown = Transformer::new(&vault).generate_markdown("note.md").await.unwrap();
    assert_eq!(
        markdown,
        "Our {% katex inline %}\n CO_2\n{% endkatex %} reporting!\n\n{% katex %}\nx^2\n{% endkatex %}"
    );
}

#[tokio::test]
async fn test_mathjax_flag_must_be_boolean() {
    let vault = MemoryVault::new().with_note(
        "note.md",
        "---\ndev-enable-mathjax: \"true\"\n---\nOur $CO_2$ reporting!",
    );

    let markdown = Transformer::new(&vault).generate_markdown("note.md").await.unwrap();
    assert_eq!(markdown, "Our $CO_2$ reporting!");
}

#[tokio::test]
async fn test_mapped_embeds_become_images() {
    let vault = MemoryVault::new().with_note(
        "note.md",
        "---\ndev-image-map:\n  - imageFile: \"[[diagram.png]]\"\n    publicUrl: https://cdn.example.com/diagram.png\n---\n![[diagram.png|Architecture]]\n\n![[unmapped.png]]",
    );

    let markdown = Transformer::new(&vault).generate_markdown("note.md").await.unwrap();
    assert_eq!(
        markdown,
        "![Architecture](https://cdn.example.com/diagram.png)\n\n![[unmapped.png]]"
    );
}

#[tokio::test]
async fn test_article_data_tags_and_series() {
    let vault = MemoryVault::new().with_note(
        "note.md",
        "---\ndev-tags: [Tag-1, Tag-2, Tag-3, Tag-4, Tag-5, Tag-6]\ndev-series: My awesome series\n---\n# Title\n\nBody",
    );

    let article = Transformer::new(&vault).article_data("note.md").await.unwrap();
    assert_eq!(article.title, "Title");
    assert_eq!(article.markdown, "Body");
    assert_eq!(
        article.tags,
        Some(vec!["Tag-1".into(), "Tag-2".into(), "Tag-3".into(), "Tag-4".into()])
    );
    assert_eq!(article.series.as_deref(), Some("My awesome series"));
}

#[tokio::test]
async fn test_article_data_ignores_malformed_tags_and_series() {
    let vault = MemoryVault::new().with_note(
        "note.md",
        "---\ndev-tags: 42\ndev-series: 7\n---\n# Title\n",
    );

    let article = Transformer::new(&vault).article_data("note.md").await.unwrap();
    assert_eq!(article.tags, None);
    assert_eq!(article.series, None);
    assert_eq!(article.markdown, "");
}

#[tokio::test]
async fn test_embed_before_link() {
    let vault = MemoryVault::new()
        .with_note(
            "note.md",
            "---\ndev-image-map:\n  - imageFile: \"[[a.png]]\"\n    publicUrl: https://img/a.png\n---\n![[a.png]] then [[Other]]",
        )
        .with_note("Other.md", "no url");

    let markdown = Transformer::new(&vault).generate_markdown("note.md").await.unwrap();
    assert_eq!(markdown, "![a.png](https://img/a.png) then Other");
}

#[tokio::test]
async fn test_math_before_link() {
    let vault = MemoryVault::new().with_note(
        "note.md",
        "---\ndev-enable-mathjax: true\n---\n$x$ then [[Other]]",
    );

    let markdown = Transformer::new(&vault).generate_markdown("note.md").await.unwrap();
    assert_eq!(markdown, "{% katex inline %}\n x\n{% endkatex %} then Other");
}

#[tokio::test]
async fn test_math_embeds_and_links_interleaved() {
    let vault = MemoryVault::new()
        .with_note(
            "note.md",
            "---\ndev-enable-mathjax: true\ndev-image-map:\n  - imageFile: \"[[a.png]]\"\n    publicUrl: https://img/a.png\n---\n# Title\n\nSee $x$, ![[a.png]] and [[Other]].\n\n[[Other|again]] after ![[a.png|pic]] and $$y$$ then [[Missing]]",
        )
        .with_note("Other.md", "---\nurl: https://example.com/other\n---\n");

    let markdown = Transformer::new(&vault).generate_markdown("note.md").await.unwrap();
    assert_eq!(
        markdown,
        "See {% katex inline %}\n x\n{% endkatex %}, ![a.png](https://img/a.png) and [Other](https://example.com/other).\n\n[again](https://example.com/other) after ![pic](https://img/a.png) and {% katex %}\ny\n{% endkatex %} then Missing"
    );
}
