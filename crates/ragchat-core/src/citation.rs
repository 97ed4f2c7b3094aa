//! Citation suffix for assistant messages.
//!
//! Only the best-scoring source is ever surfaced, and only when its score is
//! strictly above [`CITATION_THRESHOLD`].

use std::borrow::Cow;
use ragchat_types::message::Source;

pub const CITATION_THRESHOLD: f64 = 0.5;

const INLINE_MARKER: &str = "(source : ";

/// A rendered citation pointing at one source
#[derive(Debug, Clone, PartialEq)]
pub struct Citation {
    pub display_name: String,
    pub score: f64,
    /// Viewer path or URL, see `Source::view_path`
    pub view_path: String,
}

impl Citation {
    /// `" (source : name - 87.5%)"`
    pub fn label(&self) -> String {
        format!(" (source : {} - {:.1}%)", self.display_name, self.score * 100.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormattedMessage<'a> {
    pub text: Cow<'a, str>,
    pub citation: Option<Citation>,
}

/// Highest-scoring source. The first one wins ties.
pub fn best_source(sources: &[Source]) -> Option<&Source> {
    let mut iter = sources.iter();
    let first = iter.next()?;
    Some(iter.fold(first, |best, current| {
        if current.score() > best.score() {
            current
        } else {
            best
        }
    }))
}

pub fn citation_for(sources: &[Source]) -> Option<Citation> {
    let best = best_source(sources)?;
    let score = best.score();
    if score > CITATION_THRESHOLD {
        Some(Citation {
            display_name: best.display_name(),
            score,
            view_path: best.view_path(),
        })
    } else {
        None
    }
}

/// Text plus optional citation. When a citation is shown, a
/// `(source : ...)` fragment the model wrote inline is dropped from the text
/// so the reference does not appear twice.
pub fn format_with_citation<'a>(text: &'a str, sources: &[Source]) -> FormattedMessage<'a> {
    match citation_for(sources) {
        Some(citation) => FormattedMessage {
            text: strip_inline_citation(text),
            citation: Some(citation),
        },
        None => FormattedMessage {
            text: Cow::Borrowed(text),
            citation: None,
        },
    }
}

/// Remove the first `(source : ...)` fragment, if any.
fn strip_inline_citation(text: &str) -> Cow<'_, str> {
    let Some(start) = text.find(INLINE_MARKER) else {
        return Cow::Borrowed(text);
    };
    let Some(len) = text[start..].find(')') else {
        return Cow::Borrowed(text);
    };
    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..start]);
    out.push_str(&text[start + len + 1..]);
    Cow::Owned(out)
}
