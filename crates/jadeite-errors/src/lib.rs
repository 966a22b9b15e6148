pub use annotate_snippets::Renderer;
use annotate_snippets::{Level, Snippet};
pub use text_size::TextRange;

/// A fatal problem in a named template, located by `range`.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct Diagnostic {
    template: String,
    message: String,
    range: TextRange,
}

impl Diagnostic {
    pub fn error(template: impl Into<String>, message: impl Into<String>, range: TextRange) -> Self {
        Self { template: template.into(), message: message.into(), range }
    }

    /// Name of the template being compiled when the error was found.
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    /// Renders the message with the offending source lines of `text`,
    /// read from `path`.
    pub fn render(&self, renderer: &Renderer, path: &str, text: &str) -> String {
        let label = format!("in template `{}`", self.template);
        let message = Level::Error.title(&self.message).snippet(
            Snippet::source(text)
                .origin(path)
                .annotation(Level::Error.span(self.range.into()).label(&label))
                .fold(true),
        );
        renderer.render(message).to_string()
    }
}
