//! Configuration templates for `helpbind init`.
//!
//! Templates are kept as valid TOML and handed out commented out, so a fresh file changes
//! nothing until the user uncomments what they need.

/// Per-bundle configuration template (valid TOML).
const LOCAL_TEMPLATE: &str = include_str!("../templates/config.toml");

/// Global configuration template (valid TOML).
const GLOBAL_TEMPLATE: &str = include_str!("../templates/config-global.toml");

/// Returns the per-bundle configuration template, commented out.
pub fn local_template() -> String {
    comment_template(LOCAL_TEMPLATE)
}

/// Returns the global configuration template, commented out.
pub fn global_template() -> String {
    comment_template(GLOBAL_TEMPLATE)
}

/// Prefixes every non-empty, non-comment line with `# `.
fn comment_template(template: &str) -> String {
    template
        .lines()
        .map(|line| {
            if line.is_empty() || line.starts_with('#') {
                format!("{line}\n")
            } else {
                format!("# {line}\n")
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::{
        merge::{ParsedConfig, merge_configs},
        parse::parse_config,
    };

    #[test]
    fn templates_parse_as_valid_toml() {
        for (name, template) in [("local", LOCAL_TEMPLATE), ("global", GLOBAL_TEMPLATE)] {
            let result = parse_config(template);
            assert!(result.is_ok(), "{name} template failed to parse: {result:?}");
        }
    }

    #[test]
    fn local_template_values_validate_cleanly() {
        let config = merge_configs(&[ParsedConfig {
            path: PathBuf::from("/bundle/.helpbind.toml"),
            config: parse_config(LOCAL_TEMPLATE).unwrap(),
        }]);
        assert!(config.validate().is_empty(), "{:?}", config.validate());
        assert!(config.compile_exclusions().is_ok());
        assert_eq!(config.subfolders.len(), 4);
    }

    #[test]
    fn commented_templates_change_nothing() {
        for text in [local_template(), global_template()] {
            let raw = parse_config(&text).unwrap();
            assert!(raw.root.is_none());
            assert!(raw.bundle.is_none());
            assert!(raw.online.is_none());
            assert!(raw.exclude.is_none());
        }
    }

    #[test]
    fn comment_template_keeps_comments_and_blank_lines() {
        let input = "# note\n[online]\n\nbase_url = \"x\"\n";
        assert_eq!(
            comment_template(input),
            "# note\n# [online]\n\n# base_url = \"x\"\n"
        );
    }
}
