//! Ordered snippet injection into rendered HTML bodies.
//!
//! Rules run sequentially in declared order, each over the output of the
//! previous one. Matching is case-insensitive with dot-matches-newline, and
//! operates on bytes so pages in legacy encodings survive untouched outside
//! the matched spans. A rule whose keyphrase never matches is a no-op.

use async_trait::async_trait;
use bytes::Bytes;
use regex::bytes::RegexBuilder;
use relict_core::{InjectPosition, InjectionRule};
use std::path::PathBuf;

use crate::error::PipelineError;

/// Renders the snippet body for an injection rule.
///
/// The seam for snippet sourcing: the shipped implementation reads static
/// files from the content root. Executing code at request time is
/// deliberately not reproduced; anything beyond text substitution has to be
/// supplied by the embedding application.
#[async_trait]
pub trait SnippetRenderer: Send + Sync {
    /// Render the snippet for a rule, or `None` when the rule is inert.
    async fn render(&self, rule: &InjectionRule) -> Result<Option<String>, PipelineError>;
}

/// Snippet sources resolved as files under the content root.
#[derive(Debug, Clone)]
pub struct FileSnippets {
    root: PathBuf,
}

impl FileSnippets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl SnippetRenderer for FileSnippets {
    async fn render(&self, rule: &InjectionRule) -> Result<Option<String>, PipelineError> {
        if rule.file.is_empty() {
            return Ok(None);
        }
        let path = self.root.join(&rule.file);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(source) => Err(PipelineError::Snippet { path: path.display().to_string(), source }),
        }
    }
}

/// Apply the configured rules to an HTML body, in declared order.
pub async fn apply_rules(
    body: Bytes,
    rules: &[InjectionRule],
    snippets: &dyn SnippetRenderer,
) -> Result<Bytes, PipelineError> {
    let mut content = body;
    for rule in rules {
        if rule.limit == 0 {
            continue;
        }
        let Some(snippet) = snippets.render(rule).await? else {
            continue;
        };
        content = apply_rule(content, rule, &snippet)?;
    }
    Ok(content)
}

fn apply_rule(content: Bytes, rule: &InjectionRule, snippet: &str) -> Result<Bytes, PipelineError> {
    let pattern = if rule.regex { rule.keyphrase.clone() } else { regex::escape(&rule.keyphrase) };
    let matcher = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()?;

    // A literal `$` in the snippet must not read as a backreference.
    let snippet = snippet.replace('$', "$$");
    let replacement = match rule.position {
        InjectPosition::Before => format!("{snippet}${{0}}"),
        InjectPosition::After => format!("${{0}}{snippet}"),
        InjectPosition::Replace => snippet,
    };

    let limit = if rule.limit < 0 { 0 } else { rule.limit as usize };
    match matcher.replacen(&content, limit, replacement.as_bytes()) {
        std::borrow::Cow::Borrowed(_) => Ok(content),
        std::borrow::Cow::Owned(replaced) => Ok(Bytes::from(replaced)),
    }
}
