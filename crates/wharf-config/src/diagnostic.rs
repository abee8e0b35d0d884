// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Config diagnostics: turns Figment errors into miette reports.
//!
//! Unknown keys get a "did you mean" suggestion (Jaro-Winkler) and, when the
//! offending file can be found, a labelled source span.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity for a key to be offered as a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration problem with enough context for a rich report.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(wharf::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        suggestion: Option<String>,
        valid_keys: String,
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(wharf::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
    },

    #[error("invalid value for key `{key}`: {detail}")]
    #[diagnostic(code(wharf::config::invalid_value))]
    InvalidValue { key: String, detail: String },

    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(wharf::config::missing_key),
        help("add `{key} = <value>` to your wharf.toml")
    )]
    MissingKey { key: String },

    #[error("validation error: {message}")]
    #[diagnostic(code(wharf::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(wharf::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Convert every error inside a `figment::Error` into a [`ConfigError`].
///
/// `sources` holds `(path, contents)` pairs used to locate spans.
pub fn figment_to_config_errors(
    err: figment::Error,
    sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| {
            let dotted = error
                .path
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(".");

            match &error.kind {
                Kind::UnknownField(field, expected) => {
                    let (span, src) = locate(&error, field, sources);
                    ConfigError::UnknownKey {
                        key: field.clone(),
                        suggestion: suggest_key(field, expected),
                        valid_keys: expected.join(", "),
                        span,
                        src,
                    }
                }
                Kind::MissingField(field) => ConfigError::MissingKey {
                    key: if dotted.is_empty() {
                        field.to_string()
                    } else {
                        format!("{dotted}.{field}")
                    },
                },
                Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                    key: dotted,
                    detail: format!("found {actual}, expected {expected}"),
                    expected: expected.clone(),
                },
                Kind::UnknownVariant(variant, expected) => ConfigError::InvalidValue {
                    key: dotted,
                    detail: format!("`{variant}` is not one of {}", expected.join(", ")),
                },
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

/// Find the span of `field` in whichever source file produced `error`.
fn locate(
    error: &figment::Error,
    field: &str,
    sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let origin = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| match s {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });

    let found = origin.and_then(|path| sources.iter().find(|(p, _)| *p == path));
    let Some((path, content)) = found else {
        return (None, None);
    };

    let section: Vec<String> = error.path.iter().map(String::to_string).collect();
    match find_key_offset(content, &section, field) {
        Some(offset) => (
            Some(SourceSpan::new(offset.into(), field.len())),
            Some(NamedSource::new(path, content.clone())),
        ),
        None => (None, None),
    }
}

/// Byte offset of `field` at the start of a line, after the `[section]` header
/// named by `path[0]` (or from the top of the file for top-level keys).
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let start = match path.first() {
        Some(section) => {
            let header = format!("[{section}]");
            content.find(&header)? + header.len()
        }
        None => 0,
    };

    let mut offset = start;
    for line in content[start..].split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(rest) = trimmed.strip_prefix(field) {
            if rest.starts_with([' ', '\t', '=']) {
                return Some(offset + (line.len() - trimmed.len()));
            }
        }
        offset += line.len();
    }
    None
}

/// Best-matching valid key for `unknown`, if any clears the threshold.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|&key| (strsim::jaro_winkler(unknown, key), key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Render diagnostics to stderr with miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        if handler.render_report(&mut buf, error as &dyn Diagnostic).is_ok() {
            eprint!("{buf}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_close_key() {
        let valid = &["app_id", "log_level"];
        assert_eq!(suggest_key("app_di", valid), Some("app_id".to_string()));
    }

    #[test]
    fn suggests_grace_period() {
        let valid = &["grace_period_ms", "force_timeout_ms"];
        assert_eq!(
            suggest_key("grace_perod_ms", valid),
            Some("grace_period_ms".to_string())
        );
    }

    #[test]
    fn no_suggestion_for_distant_key() {
        assert_eq!(suggest_key("zzzzzz", &["app_id", "log_level"]), None);
    }

    #[test]
    fn finds_key_in_section() {
        let content = "[host]\napp_di = \"x\"\n";
        let offset = find_key_offset(content, &["host".to_string()], "app_di").unwrap();
        assert_eq!(&content[offset..offset + 6], "app_di");
    }

    #[test]
    fn ignores_key_prefixes() {
        let content = "[http]\nportable = true\nport = 1\n";
        let offset = find_key_offset(content, &["http".to_string()], "port").unwrap();
        assert_eq!(&content[offset..offset + 8], "port = 1");
    }
}
