//! Family-aware target path normalization.
//!
//! Raw link targets written inside a bundle come in many shapes: climbing `../` prefixes,
//! partial prefixes (`Actions/...`, `Shared_Admin/...`), lowercase directory names, and
//! trees that were renamed after publication. [`normalize_target_path`] rewrites such a path
//! into the form it has on the published site by applying [`Rule::ORDER`] in sequence. Each
//! rule is a narrow rewrite that may or may not fire.

use std::fmt;

use log::debug;

use crate::family::DocFamily;

/// Top-level trees that stay where they are inside the expert guide.
const SHARED_TREES: [&str; 4] = ["IDOLExpert", "Shared_Admin", "OmniGroupServer", "IAS"];

/// Directory names with a fixed published casing.
const CANONICAL_DIRS: [&str; 7] = [
    "Content",
    "Actions",
    "GrammarReference",
    "Shared_Admin",
    "IDOLExpert",
    "OmniGroupServer",
    "ENCODINGS",
];

/// Splits a raw target into a path with `../` climbing and extension removed, and the
/// fragment (without `#`).
///
/// `../../Shared_Admin/_ADM_Config.htm#My_Anchor` becomes
/// `("Shared_Admin/_ADM_Config", Some("My_Anchor"))`.
pub fn strip_rel_and_ext(raw: &str) -> (String, Option<String>) {
    let (path, fragment) = match raw.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment.to_string())),
        None => (raw, None),
    };

    let path = path.replace('\\', "/");
    let mut rest = path.as_str();
    loop {
        if let Some(stripped) = rest.strip_prefix("../") {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix("./") {
            rest = stripped;
        } else {
            break;
        }
    }

    let name_start = rest.rfind('/').map_or(0, |i| i + 1);
    let without_ext = match rest[name_start..].rfind('.') {
        Some(dot) if dot > 0 => &rest[..name_start + dot],
        _ => rest,
    };
    (without_ext.to_string(), fragment)
}

/// Strips `prefix` from `path`, ignoring ASCII case.
fn strip_prefix_ci<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let head = path.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &path[prefix.len()..])
}

/// Returns true if `path` starts with `prefix`, ignoring ASCII case.
fn starts_with_ci(path: &str, prefix: &str) -> bool {
    strip_prefix_ci(path, prefix).is_some()
}

/// One normalization rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// `Shared_Admin/...` moves under `Content/`.
    SharedAdmin,
    /// The encodings reference page moves to `Content/Actions/ENCODINGS/`.
    Encodings,
    /// `Actions/...` moves under `Content/`.
    Actions,
    /// Standard family: every path lives under `Content/`.
    StandardContent,
    /// Merged family: every path lives under `Content/` as well.
    MergedContent,
    /// Merged family, expert guide: non-shared trees live under `Content/IDOLExpert/`.
    ExpertGuide,
    /// `Content/MappedSecurity/` was renamed to `Content/OmniGroupServer/`.
    MappedSecurity,
    /// Known directory names take their published casing.
    Casing,
}

impl Rule {
    /// The order in which rules are applied.
    pub const ORDER: [Self; 8] = [
        Self::SharedAdmin,
        Self::Encodings,
        Self::Actions,
        Self::StandardContent,
        Self::MergedContent,
        Self::ExpertGuide,
        Self::MappedSecurity,
        Self::Casing,
    ];

    /// Applies the rule, returning the rewritten path if it fired.
    pub fn apply(self, path: &str, family: DocFamily, subfolder: Option<&str>) -> Option<String> {
        match self {
            Self::SharedAdmin => {
                starts_with_ci(path, "Shared_Admin/").then(|| format!("Content/{path}"))
            }
            Self::Encodings => rehome_encodings(path),
            Self::Actions => starts_with_ci(path, "Actions/").then(|| format!("Content/{path}")),
            Self::StandardContent => (family == DocFamily::Standard
                && !starts_with_ci(path, "Content/"))
            .then(|| format!("Content/{path}")),
            Self::MergedContent => (family == DocFamily::MergedMultiGuide
                && !starts_with_ci(path, "Content/"))
            .then(|| format!("Content/{path}")),
            Self::ExpertGuide => {
                let is_expert = subfolder
                    .and_then(|s| s.rsplit('/').next())
                    .is_some_and(|s| s.eq_ignore_ascii_case("expert"));
                if family != DocFamily::MergedMultiGuide || !is_expert {
                    return None;
                }
                let rest = strip_prefix_ci(path, "Content/")?;
                let shared = SHARED_TREES
                    .iter()
                    .any(|tree| starts_with_ci(rest, &format!("{tree}/")));
                (!shared).then(|| format!("Content/IDOLExpert/{rest}"))
            }
            Self::MappedSecurity => strip_prefix_ci(path, "Content/MappedSecurity/")
                .map(|rest| format!("Content/OmniGroupServer/{rest}")),
            Self::Casing => canonical_casing(path),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SharedAdmin => "shared-admin",
            Self::Encodings => "encodings",
            Self::Actions => "actions",
            Self::StandardContent => "standard-content",
            Self::MergedContent => "merged-content",
            Self::ExpertGuide => "expert-guide",
            Self::MappedSecurity => "mapped-security",
            Self::Casing => "casing",
        };
        f.write_str(name)
    }
}

/// Rehomes `.../ENCODINGS/*_ENCODINGS` to `Content/Actions/ENCODINGS/...`.
fn rehome_encodings(path: &str) -> Option<String> {
    let segments: Vec<&str> = path.split('/').collect();
    let [.., dir, name] = segments.as_slice() else {
        return None;
    };
    let is_reference = dir.eq_ignore_ascii_case("ENCODINGS")
        && name.len() >= "_ENCODINGS".len()
        && name[name.len() - "_ENCODINGS".len()..].eq_ignore_ascii_case("_ENCODINGS");
    if !is_reference {
        return None;
    }
    let rehomed = format!("Content/Actions/ENCODINGS/{name}");
    (rehomed != path).then_some(rehomed)
}

/// Rewrites known directory names to their published casing.
fn canonical_casing(path: &str) -> Option<String> {
    let mut segments: Vec<&str> = path.split('/').collect();
    let dir_count = segments.len().saturating_sub(1);
    let mut changed = false;
    for segment in segments.iter_mut().take(dir_count) {
        let current: &str = *segment;
        if let Some(&canonical) = CANONICAL_DIRS
            .iter()
            .find(|c| c.eq_ignore_ascii_case(current) && **c != current)
        {
            *segment = canonical;
            changed = true;
        }
    }
    changed.then(|| segments.join("/"))
}

/// A normalized path and the rules that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    /// The normalized path, without extension.
    pub path: String,
    /// Rules that fired, in order.
    pub fired: Vec<Rule>,
}

/// Applies every rule in [`Rule::ORDER`] to a stripped path.
///
/// `path` must already have its `../` prefixes, extension and fragment removed
/// (see [`strip_rel_and_ext`]).
pub fn normalize_target_path(path: &str, family: DocFamily, subfolder: Option<&str>) -> Normalized {
    let mut current = path.trim_start_matches('/').to_string();
    let mut fired = Vec::new();
    for rule in Rule::ORDER {
        if let Some(next) = rule.apply(&current, family, subfolder) {
            debug!("rule {rule}: {current} -> {next}");
            current = next;
            fired.push(rule);
        }
    }
    Normalized {
        path: current,
        fired,
    }
}
