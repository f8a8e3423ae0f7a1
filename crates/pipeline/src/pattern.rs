//! Pattern compilation and path matching.
//!
//! Patterns are compiled once per run into `PathMatcher`s and reused for
//! every changed file of every pull request.
//!
//! ## Match modes
//! - `auto`: patterns with `*` or `?` are globs, everything else is a literal substring
//! - `substring`: always a literal, case-sensitive substring
//! - `segment`: the pattern must line up with whole path segments
//! - `regex`: the pattern is a regular expression searched anywhere in the path
//!
//! Globs are unanchored: `*` matches any run of characters except `/`,
//! `**` matches any run of characters, and `?` matches one character except `/`.

use pr_records::{PatternSet, Result, SelectError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How pattern strings are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    #[default]
    Auto,
    Substring,
    Segment,
    Regex,
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "auto" => Ok(MatchMode::Auto),
            "substring" => Ok(MatchMode::Substring),
            "segment" => Ok(MatchMode::Segment),
            "regex" => Ok(MatchMode::Regex),
            _ => Err(format!(
                "unknown match mode '{s}' (expected auto, substring, segment, or regex)"
            )),
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchMode::Auto => "auto",
            MatchMode::Substring => "substring",
            MatchMode::Segment => "segment",
            MatchMode::Regex => "regex",
        };
        f.write_str(name)
    }
}

/// Rule sets that can be switched on in addition to the project's own patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinRule {
    /// Shell scripts plus CI and build configuration files
    Infrastructure,
}

impl BuiltinRule {
    /// Matchers contributed by this rule set
    pub fn matchers(&self) -> Vec<CompiledPattern> {
        match self {
            BuiltinRule::Infrastructure => {
                let suffixes = [".sh", ".bash", ".yml", ".yaml", ".cmake", ".config"];
                let names = ["Jenkinsfile", "Makefile", "Dockerfile", "Vagrantfile"];

                let suffix_rules = suffixes.iter().map(|s| CompiledPattern {
                    source: format!("*{s}"),
                    matcher: PathMatcher::Suffix(s.to_string()),
                });
                let name_rules = names.iter().map(|n| CompiledPattern {
                    source: n.to_string(),
                    matcher: PathMatcher::Contains(n.to_string()),
                });
                suffix_rules.chain(name_rules).collect()
            }
        }
    }
}

impl FromStr for BuiltinRule {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "infrastructure" => Ok(BuiltinRule::Infrastructure),
            _ => Err(format!("unknown builtin rule set '{s}' (expected infrastructure)")),
        }
    }
}

/// Changed files that are ignored before any pattern is consulted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathExclusion {
    /// Documentation and image assets
    Documentation,
}

impl PathExclusion {
    pub fn excludes(&self, path: &str) -> bool {
        match self {
            PathExclusion::Documentation => {
                const SUFFIXES: [&str; 5] = [".txt", ".md", ".png", "jpeg", ".in"];
                const DIRS: [&str; 3] = ["docs", "doc", "Documentation"];

                SUFFIXES.iter().any(|s| path.ends_with(s))
                    || path
                        .split('/')
                        .rev()
                        .skip(1)
                        .any(|segment| DIRS.contains(&segment))
            }
        }
    }
}

/// A compiled test against a single path
#[derive(Debug, Clone)]
pub enum PathMatcher {
    Contains(String),
    Suffix(String),
    Regex(Regex),
}

impl PathMatcher {
    pub fn is_match(&self, path: &str) -> bool {
        match self {
            PathMatcher::Contains(needle) => path.contains(needle.as_str()),
            PathMatcher::Suffix(suffix) => path.ends_with(suffix.as_str()),
            PathMatcher::Regex(re) => re.is_match(path),
        }
    }
}

/// A pattern together with the text it was compiled from
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub source: String,
    pub matcher: PathMatcher,
}

/// True when the pattern uses glob wildcards
pub fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?'])
}

/// Translate a glob into an unanchored regex body.
///
/// Example: "src/*.cpp" -> `src/[^/]*\.cpp`
///          "**/test"   -> `.*/test`
pub fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    out.push_str(".*");
                } else {
                    out.push_str("[^/]*");
                }
            }
            '?' => out.push_str("[^/]"),
            other => out.push_str(&regex::escape(&other.to_string())),
        }
    }
    out
}

/// Compile one pattern string under the given mode
pub fn compile_pattern(pattern: &str, mode: MatchMode) -> std::result::Result<PathMatcher, regex::Error> {
    match mode {
        MatchMode::Auto if is_glob(pattern) => Ok(PathMatcher::Regex(Regex::new(&glob_to_regex(pattern))?)),
        MatchMode::Auto | MatchMode::Substring => Ok(PathMatcher::Contains(pattern.to_string())),
        MatchMode::Segment => {
            let fragment = pattern.trim_matches('/');
            if fragment.is_empty() {
                return Ok(PathMatcher::Contains(pattern.to_string()));
            }
            let body = glob_to_regex(fragment);
            Ok(PathMatcher::Regex(Regex::new(&format!("(?:^|/){body}(?:/|$)"))?))
        }
        MatchMode::Regex => Ok(PathMatcher::Regex(Regex::new(pattern)?)),
    }
}

/// All patterns of one run, compiled once
#[derive(Debug, Clone, Default)]
pub struct PatternMatcher {
    patterns: Vec<CompiledPattern>,
}

impl PatternMatcher {
    /// Compile a pattern set.
    ///
    /// A pattern that does not compile (only possible for regexes) is a
    /// malformed row of the pattern source.
    pub fn compile(set: &PatternSet, mode: MatchMode) -> Result<Self> {
        let mut patterns = Vec::with_capacity(set.len());
        for record in set.iter() {
            let matcher = compile_pattern(&record.pattern, mode).map_err(|e| {
                SelectError::MalformedInput {
                    input: set.label.clone(),
                    line: record.line,
                    column: "pattern".to_string(),
                    reason: format!("invalid {mode} pattern '{}': {e}", record.pattern),
                }
            })?;
            patterns.push(CompiledPattern {
                source: record.pattern.clone(),
                matcher,
            });
        }
        Ok(Self { patterns })
    }

    /// Add the matchers of a builtin rule set (builder pattern)
    pub fn with_builtin(mut self, rule: BuiltinRule) -> Self {
        self.patterns.extend(rule.matchers());
        self
    }

    /// First pattern matching the path, if any
    pub fn first_match(&self, path: &str) -> Option<&CompiledPattern> {
        self.patterns.iter().find(|p| p.matcher.is_match(path))
    }

    pub fn matches(&self, path: &str) -> bool {
        self.first_match(path).is_some()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
