//! String matchers loaded from setup files.
//!
//! Setup files describe the path and parent filters as plain data
//! ([`MatcherSpec`]); they are compiled once into [`Matcher`] values before a
//! sampling pass so that regex errors surface while loading configuration.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Declarative matcher as it appears in a setup file.
///
/// ```yaml
/// path_filter: { kind: prefix, value: /usr/lib/firefox/ }
/// parent_filter:
///   kind: not
///   matcher: { kind: contains, value: -contentproc }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatcherSpec {
    /// Whole-string equality.
    Exact { path: String },
    /// Substring match.
    Contains { value: String },
    /// Prefix match.
    Prefix { value: String },
    /// Regular expression (unanchored unless the pattern anchors itself).
    Regex { pattern: String },
    /// Negation of another matcher.
    Not { matcher: Box<MatcherSpec> },
    /// True if any inner matcher is true. An empty list never matches.
    Any { matchers: Vec<MatcherSpec> },
    /// True if every inner matcher is true. An empty list always matches.
    All { matchers: Vec<MatcherSpec> },
}

impl MatcherSpec {
    /// Compiles the matcher, validating every regex it contains.
    pub fn compile(&self) -> Result<Matcher, regex::Error> {
        Ok(match self {
            MatcherSpec::Exact { path } => Matcher::Exact(path.clone()),
            MatcherSpec::Contains { value } => Matcher::Contains(value.clone()),
            MatcherSpec::Prefix { value } => Matcher::Prefix(value.clone()),
            MatcherSpec::Regex { pattern } => Matcher::Regex(Regex::new(pattern)?),
            MatcherSpec::Not { matcher } => Matcher::Not(Box::new(matcher.compile()?)),
            MatcherSpec::Any { matchers } => Matcher::Any(
                matchers
                    .iter()
                    .map(MatcherSpec::compile)
                    .collect::<Result<_, _>>()?,
            ),
            MatcherSpec::All { matchers } => Matcher::All(
                matchers
                    .iter()
                    .map(MatcherSpec::compile)
                    .collect::<Result<_, _>>()?,
            ),
        })
    }
}

impl std::fmt::Display for MatcherSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatcherSpec::Exact { path } => write!(f, "== {:?}", path),
            MatcherSpec::Contains { value } => write!(f, "contains {:?}", value),
            MatcherSpec::Prefix { value } => write!(f, "starts with {:?}", value),
            MatcherSpec::Regex { pattern } => write!(f, "matches /{}/", pattern),
            MatcherSpec::Not { matcher } => write!(f, "not ({})", matcher),
            MatcherSpec::Any { matchers } => write_joined(f, matchers, " or "),
            MatcherSpec::All { matchers } => write_joined(f, matchers, " and "),
        }
    }
}

fn write_joined(
    f: &mut std::fmt::Formatter<'_>,
    matchers: &[MatcherSpec],
    sep: &str,
) -> std::fmt::Result {
    write!(f, "(")?;
    for (i, m) in matchers.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        write!(f, "{}", m)?;
    }
    write!(f, ")")
}

/// Compiled matcher, ready to be evaluated against paths and command lines.
#[derive(Debug, Clone)]
pub enum Matcher {
    Exact(String),
    Contains(String),
    Prefix(String),
    Regex(Regex),
    Not(Box<Matcher>),
    Any(Vec<Matcher>),
    All(Vec<Matcher>),
}

impl Matcher {
    pub fn matches(&self, input: &str) -> bool {
        match self {
            Matcher::Exact(s) => input == s,
            Matcher::Contains(s) => input.contains(s.as_str()),
            Matcher::Prefix(s) => input.starts_with(s.as_str()),
            Matcher::Regex(re) => re.is_match(input),
            Matcher::Not(m) => !m.matches(input),
            Matcher::Any(ms) => ms.iter().any(|m| m.matches(input)),
            Matcher::All(ms) => ms.iter().all(|m| m.matches(input)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains(v: &str) -> MatcherSpec {
        MatcherSpec::Contains { value: v.into() }
    }

    // -------------------------------------------------------------------------
    // Tests for Matcher::matches
    // -------------------------------------------------------------------------

    #[test]
    fn test_basic_matchers() {
        let exact = MatcherSpec::Exact {
            path: "/opt/app/app".into(),
        }
        .compile()
        .unwrap();
        assert!(exact.matches("/opt/app/app"));
        assert!(!exact.matches("/opt/app/app-helper"));

        let prefix = MatcherSpec::Prefix {
            value: "/usr/lib/firefox/".into(),
        }
        .compile()
        .unwrap();
        assert!(prefix.matches("/usr/lib/firefox/firefox"));
        assert!(!prefix.matches("/usr/bin/firefox"));

        let sub = contains("--type=").compile().unwrap();
        assert!(sub.matches("chrome --type=renderer"));
        assert!(!sub.matches("chrome"));
    }

    #[test]
    fn test_regex_matcher() {
        let re = MatcherSpec::Regex {
            pattern: r"(?i)\\chrome\.exe$".into(),
        }
        .compile()
        .unwrap();
        assert!(re.matches(r"C:\Program Files\Google\Chrome\Application\CHROME.EXE"));
        assert!(!re.matches(r"C:\Program Files\Google\Chrome\Application\chrome_proxy.exe"));
    }

    #[test]
    fn test_invalid_regex_fails_to_compile() {
        let bad = MatcherSpec::Regex {
            pattern: "([unclosed".into(),
        };
        assert!(bad.compile().is_err());

        // Errors nested inside combinators are surfaced too
        let nested = MatcherSpec::Not {
            matcher: Box::new(MatcherSpec::Any {
                matchers: vec![contains("ok"), bad],
            }),
        };
        assert!(nested.compile().is_err());
    }

    #[test]
    fn test_combinators() {
        let parent = MatcherSpec::Not {
            matcher: Box::new(contains("-contentproc")),
        }
        .compile()
        .unwrap();
        assert!(parent.matches("/usr/lib/firefox/firefox -foreground"));
        assert!(!parent.matches("/usr/lib/firefox/firefox -contentproc -childID 1"));

        let any = MatcherSpec::Any {
            matchers: vec![contains("a"), contains("b")],
        }
        .compile()
        .unwrap();
        assert!(any.matches("xbx"));
        assert!(!any.matches("xyz"));

        let all = MatcherSpec::All {
            matchers: vec![contains("a"), contains("b")],
        }
        .compile()
        .unwrap();
        assert!(all.matches("ab"));
        assert!(!all.matches("a"));
    }

    #[test]
    fn test_empty_combinators() {
        let any = MatcherSpec::Any { matchers: vec![] }.compile().unwrap();
        let all = MatcherSpec::All { matchers: vec![] }.compile().unwrap();
        assert!(!any.matches("anything"));
        assert!(all.matches("anything"));
    }

    // -------------------------------------------------------------------------
    // Tests for MatcherSpec deserialization
    // -------------------------------------------------------------------------

    #[test]
    fn test_deserialize_tagged_yaml() {
        let yaml = r#"
kind: not
matcher:
  kind: contains
  value: "--type="
"#;
        let spec: MatcherSpec = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            spec,
            MatcherSpec::Not {
                matcher: Box::new(contains("--type="))
            }
        );
    }

    #[test]
    fn test_deserialize_unknown_kind_fails() {
        let json = r#"{ "kind": "glob", "value": "*.exe" }"#;
        assert!(serde_json::from_str::<MatcherSpec>(json).is_err());
    }

    #[test]
    fn test_display() {
        let spec = MatcherSpec::All {
            matchers: vec![
                contains("firefox"),
                MatcherSpec::Not {
                    matcher: Box::new(contains("-contentproc")),
                },
            ],
        };
        assert_eq!(
            spec.to_string(),
            r#"(contains "firefox" and not (contains "-contentproc"))"#
        );
    }
}
