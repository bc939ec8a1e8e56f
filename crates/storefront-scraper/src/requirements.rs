//! System-requirement blocks (`pc_requirements`, `mac_requirements`,
//! `linux_requirements`).
//!
//! Each tier is a markup fragment where labels are bold:
//! `<strong>OS:</strong> Windows 10<br><strong>Memory:</strong> 8 GB RAM`.
//! Everything except the bold markers is stripped, then the text is walked
//! label by label.

use serde_json::Value;
use storefront_core::{LabelMap, RequirementSet};

use crate::markup::{clean_text, strip_tags};
use crate::segment::{segments, split_at_sentinel};

const LABEL_OPEN: &str = "<strong>";
const LABEL_CLOSE: &str = "</strong>";

/// Parses a requirement object into its tiers.
///
/// Tiers missing from the object stay `None`. The store sends an empty array
/// instead of an object for titles without requirements; that yields an empty
/// [`RequirementSet`].
#[must_use]
pub fn parse_requirements(value: &Value) -> RequirementSet {
    let Some(obj) = value.as_object() else {
        return RequirementSet::default();
    };
    let tier = |key: &str| {
        obj.get(key).and_then(|v| match v.as_str() {
            Some(fragment) => Some(parse_requirement_block(fragment)),
            None => {
                tracing::debug!(tier = key, "requirement tier is not a string; skipping");
                None
            }
        })
    };
    RequirementSet {
        minimum: tier("minimum"),
        recommended: tier("recommended"),
    }
}

/// Parses one tier fragment into an ordered label → value mapping.
///
/// Text before the first label is ignored. A label whose closing marker is
/// missing is kept with an empty value. The last label takes the rest of the
/// fragment as its value.
#[must_use]
pub fn parse_requirement_block(fragment: &str) -> LabelMap {
    let text = strip_tags(fragment, &["strong"]);
    let mut map = LabelMap::new();

    for segment in segments(&text, LABEL_OPEN).skip(1) {
        let (label, value) = split_at_sentinel(segment.content, LABEL_CLOSE);
        let label = clean_text(label);
        let label = label.trim_end_matches(':').trim_end();
        if label.is_empty() {
            continue;
        }
        map.insert(label, clean_text(value.unwrap_or_default()));
    }

    map
}
