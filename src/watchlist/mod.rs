//! Watch lists: who to cc, and what to say, when a change touches
//! particular files or adds particular lines.
//!
//! The on-disk form is YAML:
//!
//! ```yaml
//! definitions:
//!   ChromiumGraphics:
//!     filename: Source/WebCore/platform/graphics/chromium/
//!   ThreadingFiles:
//!     filename: Source/JavaScriptCore/wtf/Threading
//!     in_added_lines: pthread_
//! cc_rules:
//!   ChromiumGraphics|ThreadingFiles: [graphics@example.org]
//! message_rules:
//!   ThreadingFiles: ["Please run the threading tests."]
//! ```
//!
//! `filename` is matched against the start of the path. `in_added_lines`
//! is searched for in added lines and `more` in added or removed lines.
//! A definition matches a file when all of its conditions match.

pub mod diff;
pub mod loader;

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;
use serde::Deserialize;

pub use diff::{parse_diff, FileChange};
pub use loader::WatchListLoader;

use crate::error::WatchListError;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawWatchList {
    #[serde(default)]
    definitions: BTreeMap<String, RawDefinition>,
    #[serde(default)]
    cc_rules: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    message_rules: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDefinition {
    filename: Option<String>,
    in_added_lines: Option<String>,
    more: Option<String>,
}

/// A named set of conditions on one changed file.
#[derive(Debug, Clone)]
pub struct Definition {
    name: String,
    filename: Option<Regex>,
    in_added_lines: Option<Regex>,
    more: Option<Regex>,
}

impl Definition {
    /// Definition name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if every condition of this definition holds for `change`.
    #[must_use]
    pub fn matches(&self, change: &FileChange) -> bool {
        let path = change.path.to_string_lossy();
        self.filename.as_ref().map_or(true, |re| re.is_match(&path))
            && self
                .in_added_lines
                .as_ref()
                .map_or(true, |re| change.added_lines.iter().any(|l| re.is_match(l)))
            && self.more.as_ref().map_or(true, |re| {
                change.added_lines.iter().chain(&change.removed_lines).any(|l| re.is_match(l))
            })
    }
}

#[derive(Debug, Clone)]
struct Rule {
    definitions: Vec<String>,
    values: Vec<String>,
}

/// What a watch list asks for on a given change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchListMatch {
    /// Addresses to cc, sorted and deduplicated.
    pub cc: Vec<String>,
    /// Messages to post, deduplicated, in rule order.
    pub messages: Vec<String>,
}

/// A parsed, validated watch list.
#[derive(Debug, Clone)]
pub struct WatchList {
    definitions: BTreeMap<String, Definition>,
    cc_rules: Vec<Rule>,
    message_rules: Vec<Rule>,
}

impl WatchList {
    /// Parses and validates a YAML watch list.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed YAML, unknown keys, a definition with
    /// no conditions, an invalid regular expression, or a rule naming a
    /// definition that does not exist.
    pub fn parse(yaml: &str) -> Result<Self, WatchListError> {
        let raw: RawWatchList = serde_yaml::from_str(yaml)?;

        let mut definitions = BTreeMap::new();
        for (name, def) in raw.definitions {
            if def.filename.is_none() && def.in_added_lines.is_none() && def.more.is_none() {
                return Err(WatchListError::EmptyDefinition(name));
            }
            let compile = |field: &'static str, pattern: Option<String>, anchored: bool| {
                pattern
                    .map(|p| Regex::new(&if anchored { format!("^(?:{p})") } else { p }))
                    .transpose()
                    .map_err(|source| WatchListError::InvalidPattern { name: name.clone(), field, source })
            };
            let definition = Definition {
                filename: compile("filename", def.filename, true)?,
                in_added_lines: compile("in_added_lines", def.in_added_lines, false)?,
                more: compile("more", def.more, false)?,
                name: name.clone(),
            };
            definitions.insert(name, definition);
        }

        let cc_rules = build_rules("cc_rules", raw.cc_rules, &definitions)?;
        let message_rules = build_rules("message_rules", raw.message_rules, &definitions)?;
        Ok(Self { definitions, cc_rules, message_rules })
    }

    /// Definition names, sorted.
    #[must_use]
    pub fn definition_names(&self) -> Vec<&str> {
        self.definitions.keys().map(String::as_str).collect()
    }

    /// Names of the definitions matched by at least one change, sorted.
    #[must_use]
    pub fn find_matching_definitions(&self, changes: &[FileChange]) -> BTreeSet<String> {
        self.definitions
            .values()
            .filter(|def| changes.iter().any(|change| def.matches(change)))
            .map(|def| def.name.clone())
            .collect()
    }

    /// Collects the cc addresses and messages triggered by `changes`.
    #[must_use]
    pub fn determine_cc_and_messages(&self, changes: &[FileChange]) -> WatchListMatch {
        let matched = self.find_matching_definitions(changes);
        let fired = |rule: &&Rule| rule.definitions.iter().any(|d| matched.contains(d));

        let cc: BTreeSet<String> =
            self.cc_rules.iter().filter(fired).flat_map(|r| r.values.iter().cloned()).collect();

        let mut messages: Vec<String> = Vec::new();
        for message in self.message_rules.iter().filter(fired).flat_map(|r| r.values.iter()) {
            if !messages.contains(message) {
                messages.push(message.clone());
            }
        }
        WatchListMatch { cc: cc.into_iter().collect(), messages }
    }
}

fn build_rules(
    section: &'static str,
    raw: BTreeMap<String, Vec<String>>,
    definitions: &BTreeMap<String, Definition>,
) -> Result<Vec<Rule>, WatchListError> {
    raw.into_iter()
        .map(|(key, values)| {
            let names: Vec<String> = key.split('|').map(|n| n.trim().to_string()).collect();
            if let Some(missing) = names.iter().find(|n| !definitions.contains_key(*n)) {
                return Err(WatchListError::UndefinedDefinition { section, name: missing.clone() });
            }
            Ok(Rule { definitions: names, values })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const SAMPLE: &str = r#"
definitions:
  ChromiumGraphics:
    filename: Source/WebCore/platform/graphics/chromium/
  ThreadingFiles:
    filename: Source/JavaScriptCore/wtf/Threading
    in_added_lines: pthread_
  WatchListScript:
    filename: Tools/Scripts/webkitpy/common/watchlist/
cc_rules:
  ChromiumGraphics|ThreadingFiles: [graphics@example.org, threads@example.org]
  WatchListScript: [levin@example.org]
message_rules:
  ThreadingFiles: ["Please run the threading tests."]
  WatchListScript: ["Please run the threading tests."]
"#;

    fn change(path: &str, added: &[&str]) -> FileChange {
        FileChange {
            path: PathBuf::from(path),
            added_lines: added.iter().map(ToString::to_string).collect(),
            removed_lines: Vec::new(),
        }
    }

    #[test]
    fn filename_is_anchored_at_path_start() {
        let list = WatchList::parse(SAMPLE).unwrap();
        let hits = list.find_matching_definitions(&[change("Source/WebCore/platform/graphics/chromium/Canvas.cpp", &[])]);
        assert_eq!(hits.into_iter().collect::<Vec<_>>(), vec!["ChromiumGraphics"]);

        let miss = list.find_matching_definitions(&[change("Other/Source/WebCore/platform/graphics/chromium/x", &[])]);
        assert!(miss.is_empty());
    }

    #[test]
    fn all_conditions_must_hold() {
        let list = WatchList::parse(SAMPLE).unwrap();
        let without = [change("Source/JavaScriptCore/wtf/ThreadingPthreads.cpp", &["int x;"])];
        assert!(list.find_matching_definitions(&without).is_empty());

        let with = [change("Source/JavaScriptCore/wtf/ThreadingPthreads.cpp", &["pthread_mutex_lock(&m);"])];
        assert!(list.find_matching_definitions(&with).contains("ThreadingFiles"));
    }

    #[test]
    fn cc_and_messages_are_deduplicated() {
        let list = WatchList::parse(SAMPLE).unwrap();
        let result = list.determine_cc_and_messages(&[
            change("Source/JavaScriptCore/wtf/ThreadingPthreads.cpp", &["pthread_create(...)"]),
            change("Tools/Scripts/webkitpy/common/watchlist/watchlist.py", &[]),
        ]);
        assert_eq!(
            result.cc,
            vec!["graphics@example.org", "levin@example.org", "threads@example.org"]
        );
        assert_eq!(result.messages, vec!["Please run the threading tests."]);
    }

    #[test]
    fn no_changes_no_output() {
        let list = WatchList::parse(SAMPLE).unwrap();
        assert_eq!(list.determine_cc_and_messages(&[]), WatchListMatch::default());
    }

    #[test]
    fn rule_with_unknown_definition_is_rejected() {
        let err = WatchList::parse("definitions: {}\ncc_rules:\n  Missing: [a@b.c]\n").unwrap_err();
        assert!(matches!(err, WatchListError::UndefinedDefinition { section: "cc_rules", ref name } if name == "Missing"));
    }

    #[test]
    fn empty_definition_is_rejected() {
        let err = WatchList::parse("definitions:\n  Nothing: {}\n").unwrap_err();
        assert!(matches!(err, WatchListError::EmptyDefinition(ref n) if n == "Nothing"));
    }

    #[test]
    fn bad_regex_is_rejected() {
        let err = WatchList::parse("definitions:\n  Broken:\n    more: \"(unclosed\"\n").unwrap_err();
        assert!(matches!(err, WatchListError::InvalidPattern { field: "more", .. }));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(WatchList::parse("definitons: {}\n"), Err(WatchListError::Parse(_))));
    }
}
