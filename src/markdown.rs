use pulldown_cmark::{Options, Parser, html};

/// External collaborator seam: the documentation panel composes a markdown
/// string and hands it to a converter, it never renders markdown itself.
pub trait MarkdownConverter: Send + Sync {
    fn convert(&self, text: &str) -> String;
}

/// Default converter backed by pulldown-cmark's HTML renderer.
#[derive(Clone, Copy, Debug, Default)]
pub struct CommonMarkHtml;

impl MarkdownConverter for CommonMarkHtml {
    fn convert(&self, text: &str) -> String {
        let parser = Parser::new_ext(text, Options::ENABLE_STRIKETHROUGH);
        let mut out = String::with_capacity(text.len() * 2);
        html::push_html(&mut out, parser);
        out
    }
}
