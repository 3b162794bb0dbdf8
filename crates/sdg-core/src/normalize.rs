//! Assemble the text fed to the classifier from a work's metadata.
//!
//! Parts are taken in a fixed order:
//!
//! 1. title
//! 2. abstract, decoded from the inverted index
//! 3. primary topic hierarchy: subfield, field, domain
//! 4. keyword display names
//! 5. concept display names
//! 6. MeSH descriptor names
//!
//! Blank parts are dropped and the rest joined verbatim with `". "`.

use tracing::debug;

use crate::CoreError;
use crate::abstract_index::{IndexBase, deabstract_with_base};
use crate::work::{TopicLevel, Work};

pub const SEPARATOR: &str = ". ";

/// Build the classification string for `work`.
///
/// Parts are kept exactly as OpenAlex sent them, so a title-only work yields
/// its title unchanged. Returns an empty string when the work carries no
/// usable text.
pub fn classification_text(work: &Work) -> Result<String, CoreError> {
    let abstract_text = match work.abstract_inverted_index.as_ref() {
        Some(index) => deabstract_with_base(Some(index), IndexBase::detect(index))?,
        None => String::new(),
    };

    let mut parts: Vec<&str> = Vec::new();
    parts.extend(work.title());
    parts.push(&abstract_text);

    if let Some(topic) = &work.primary_topic {
        let levels = [&topic.subfield, &topic.field, &topic.domain];
        parts.extend(levels.into_iter().filter_map(level_name));
    }

    if let Some(keywords) = &work.keywords {
        parts.extend(keywords.iter().filter_map(|k| k.display_name.as_deref()));
    }
    if let Some(concepts) = &work.concepts {
        parts.extend(concepts.iter().filter_map(|c| c.display_name.as_deref()));
    }
    if let Some(mesh) = &work.mesh {
        parts.extend(mesh.iter().filter_map(|m| m.descriptor_name.as_deref()));
    }

    let text = join_parts(parts);
    debug!(chars = text.len(), "assembled classification text");
    Ok(text)
}

/// Drop blank parts and join the rest, untrimmed, with [`SEPARATOR`].
pub fn join_parts<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for part in parts {
        let part = part.as_ref();
        if part.trim().is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push_str(SEPARATOR);
        }
        out.push_str(part);
    }
    out
}

fn level_name(level: &Option<TopicLevel>) -> Option<&str> {
    level.as_ref()?.display_name.as_deref()
}
