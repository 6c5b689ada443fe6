//! Heading-level normalization.
//!
//! Each page's headings are shifted by one per-page offset so that the page's first heading
//! lands on the page's outline depth. Relative nesting inside the page is preserved. Only `#`
//! headings are rewritten; levels are clamped to 1..=6.

use std::ops::Range;

use crate::sites::extract_headings;

/// Deepest Markdown heading level.
const MAX_LEVEL: usize = 6;

/// Shifts every `#` heading in `body` so the first heading sits at `depth`.
///
/// Returns the body unchanged when it has no headings or is already aligned.
pub fn normalize_heading_levels(body: &str, depth: usize) -> String {
    let headings = extract_headings(body);
    let Some(first) = headings.first() else {
        return body.to_string();
    };

    let target = depth.clamp(1, MAX_LEVEL) as isize;
    let offset = target - first.level as isize;
    if offset == 0 {
        return body.to_string();
    }

    let mut result = String::with_capacity(body.len() + headings.len() * 2);
    let mut cursor = 0;
    for heading in headings.iter().filter(|h| h.atx) {
        let Some(hashes) = hash_run(body, heading.range.start) else {
            continue;
        };
        let new_level = (heading.level as isize + offset).clamp(1, MAX_LEVEL as isize) as usize;
        result.push_str(&body[cursor..hashes.start]);
        result.push_str(&"#".repeat(new_level));
        cursor = hashes.end;
    }
    result.push_str(&body[cursor..]);
    result
}

/// Locates the run of opening `#` characters of an ATX heading starting at `start`.
fn hash_run(body: &str, start: usize) -> Option<Range<usize>> {
    let line = &body[start..];
    let indent = line.len() - line.trim_start_matches(' ').len();
    let count = line[indent..].chars().take_while(|&c| c == '#').count();
    (count > 0).then(|| start + indent..start + indent + count)
}
