use criterion::{black_box, criterion_group, criterion_main, Criterion};
use citadel_sanitizer::css::{serialize_tokens, tokenize_css};
use citadel_sanitizer::{CssSanitizer, CssSanitizerBuilder, HtmlSanitizer, DEFAULT_SANITIZER_TABLE};

const ARTICLE: &str = r#"
    <article>
        <h1 dir="LTR">Hello, World!</h1>
        <p>This is a test document with some <strong>bold text</strong> and a <a href="https://example.com">link</a>.</p>
        <img src="https://example.com/a.png" srcset="a.png 1x, b.png 2x" alt="picture">
        <div class="container" onclick="alert('click')">
            <ul>
                <li>Item 1</li>
                <li>Item 2</li>
                <li>Item 3</li>
            </ul>
        </div>
    </article>
"#;

const HOSTILE: &str = r#"
    <script>alert('xss');</script>
    <style>body { color: red; behavior: url(x.htc) } :host { display: none }</style>
    <div style="background: url(javascript:alert(1)); color: blue">
        <iframe src="http://evil.com"></iframe>
        <img src="x" onerror="alert('error')">
        <form action="http://evil.com">
            <input type="text" name="test">
            <button onclick="submit()">Submit</button>
        </form>
        <a href="javascript:alert('click')">Click me</a>
        <custom-element>Custom content</custom-element>
    </div>
"#;

const STYLESHEET: &str = r#"
    body { margin: 0; padding: 0; font-family: "Helvetica Neue", sans-serif; }
    .header > nav a:hover { color: #ff0000 !important; text-decoration: underline; }
    @keyframes spin { from { transform: rotate(0deg) } to { transform: rotate(360deg) } }
    @media (max-width: 600px) { body { font-size: 12px } }
    .logo { background-image: url("https://example.com/logo.png"); width: calc(100% - 2em); }
"#;

fn sanitize_article(c: &mut Criterion) {
    let sanitizer = HtmlSanitizer::new(DEFAULT_SANITIZER_TABLE.clone());

    c.bench_function("sanitize_article", |b| {
        b.iter(|| sanitizer.sanitize(black_box(ARTICLE)))
    });
}

fn sanitize_hostile_document(c: &mut Criterion) {
    let sanitizer = match CssSanitizerBuilder::new().allow_inline_styles().build() {
        Ok(sanitizer) => sanitizer,
        Err(err) => panic!("failed to build sanitizer: {err}"),
    };

    c.bench_function("sanitize_hostile_document", |b| {
        b.iter(|| sanitizer.sanitize(black_box(HOSTILE)))
    });
}

fn tokenize_stylesheet(c: &mut Criterion) {
    c.bench_function("tokenize_stylesheet", |b| {
        b.iter(|| tokenize_css(black_box(STYLESHEET)))
    });

    let tokens = tokenize_css(STYLESHEET);
    c.bench_function("serialize_stylesheet", |b| {
        b.iter(|| serialize_tokens(black_box(&tokens)))
    });
}

fn sanitize_stylesheet(c: &mut Criterion) {
    let sanitizer = CssSanitizer::default().allow_keyframes(true);

    c.bench_function("sanitize_stylesheet", |b| {
        b.iter(|| sanitizer.sanitize_style_element(black_box(STYLESHEET)))
    });
}

fn sanitize_deep_nesting(c: &mut Criterion) {
    let sanitizer = HtmlSanitizer::new(DEFAULT_SANITIZER_TABLE.clone());
    let html = format!("{}text{}", "<div>".repeat(1000), "</div>".repeat(1000));

    c.bench_function("sanitize_deep_nesting", |b| {
        b.iter(|| sanitizer.sanitize(black_box(&html)))
    });
}

criterion_group!(
    benches,
    sanitize_article,
    sanitize_hostile_document,
    tokenize_stylesheet,
    sanitize_stylesheet,
    sanitize_deep_nesting
);
criterion_main!(benches);
