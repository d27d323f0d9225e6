//! Where the text of a reading session comes from.

use tracing::{info, warn};

/// Origin of the session text, shown as a badge in the reader header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SourceKind {
    Selection,
    Article,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    pub text: String,
    pub kind: SourceKind,
}

/// Pick the session text. An article wins when it has any non-whitespace
/// content; otherwise the selection text is used as the fallback. Blank text
/// with no fallback is still returned: the engine treats it as an already
/// complete session.
pub fn resolve(article: Option<String>, selection: Option<String>) -> Option<SourceText> {
    let (text, kind) = match (article, selection) {
        (Some(article), _) if !article.trim().is_empty() => (article, SourceKind::Article),
        (Some(_), Some(selection)) => {
            warn!("article text is empty, falling back to selection");
            (selection, SourceKind::Selection)
        }
        (Some(article), None) => (article, SourceKind::Article),
        (None, Some(selection)) => (selection, SourceKind::Selection),
        (None, None) => return None,
    };
    info!(%kind, bytes = text.len(), "resolved session text");
    Some(SourceText { text, kind })
}
