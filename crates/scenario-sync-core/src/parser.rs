//! Tolerant feature-file parser
//!
//! Recognizes only what sync needs: tag lines, scenario headers and the
//! boundaries between scenario blocks. Everything else is opaque text.
//!
//! # State machine
//!
//! ```text
//!            tag line                     header
//! Idle ──────────────→ AccumulatingTags ─────────→ InScenario
//!  │ header               │  ↑ tag/blank/comment      │  │ tag line
//!  └──────────→ InScenario│  └────────┘                │  └──→ AccumulatingTags
//!                         └─ other line → Idle / InScenario
//! ```
//!
//! Blank and comment lines keep pending tags; any other foreign line drops
//! them. A header consumes the pending tags and records its block start.

use crate::issue_key::IssueKey;
use crate::types::LocalScenario;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static SCENARIO_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:scenario outline|scenario):\s*(.+)$").expect("scenario header pattern is valid")
});

/// Classification of a single source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LineKind<'a> {
    /// Only `@`-prefixed tokens
    Tags(Vec<&'a str>),
    /// `Scenario:` / `Scenario Outline:` with the trimmed name
    Header(&'a str),
    /// Empty or whitespace only
    Blank,
    /// Starts with `#`
    Comment,
    /// Anything else
    Other,
}

/// Classify one line of feature text
pub(crate) fn classify_line(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if trimmed.starts_with('@') {
        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        if tokens.iter().all(|t| t.starts_with('@')) {
            return LineKind::Tags(tokens);
        }
        return LineKind::Other;
    }
    if let Some(caps) = SCENARIO_HEADER.captures(trimmed) {
        if let Some(name) = caps.get(1) {
            let name = name.as_str().trim();
            if !name.is_empty() {
                return LineKind::Header(name);
            }
        }
    }
    if trimmed.starts_with('#') {
        return LineKind::Comment;
    }
    LineKind::Other
}

/// Split feature text into lines, tolerating CRLF
pub(crate) fn split_lines(content: &str) -> Vec<&str> {
    content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Scenario header located during the line scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioSpan {
    /// Scenario name
    pub name: String,
    /// First line of the block (first pending tag, or the header itself)
    pub block_start: usize,
    /// Line of the `Scenario:` header
    pub header_line: usize,
    /// Tags collected for this scenario
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ScanState {
    Idle,
    AccumulatingTags { tags: Vec<String>, start: usize },
    InScenario,
}

#[derive(Debug)]
struct Fold {
    state: ScanState,
    spans: Vec<ScenarioSpan>,
}

impl Fold {
    fn new() -> Self {
        Self {
            state: ScanState::Idle,
            spans: Vec::new(),
        }
    }

    /// State to fall back to when pending tags are discarded
    fn settled(&self) -> ScanState {
        if self.spans.is_empty() {
            ScanState::Idle
        } else {
            ScanState::InScenario
        }
    }

    fn step(mut self, (index, line): (usize, &str)) -> Self {
        let state = std::mem::replace(&mut self.state, ScanState::Idle);
        self.state = match (state, classify_line(line)) {
            (ScanState::AccumulatingTags { mut tags, start }, LineKind::Tags(new)) => {
                tags.extend(new.into_iter().map(str::to_string));
                ScanState::AccumulatingTags { tags, start }
            }
            (_, LineKind::Tags(new)) => ScanState::AccumulatingTags {
                tags: new.into_iter().map(str::to_string).collect(),
                start: index,
            },
            (state, LineKind::Header(name)) => {
                let (tags, block_start) = match state {
                    ScanState::AccumulatingTags { tags, start } => (tags, start),
                    _ => (Vec::new(), index),
                };
                self.spans.push(ScenarioSpan {
                    name: name.to_string(),
                    block_start,
                    header_line: index,
                    tags,
                });
                ScanState::InScenario
            }
            (state, LineKind::Blank | LineKind::Comment) => state,
            (_, LineKind::Other) => self.settled(),
        };
        self
    }
}

/// Locate every scenario header and its block start, in file order
#[must_use]
pub fn scan_scenarios(content: &str) -> Vec<ScenarioSpan> {
    split_lines(content)
        .into_iter()
        .enumerate()
        .fold(Fold::new(), Fold::step)
        .spans
}

/// Parser for `.feature` files
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureParser;

impl FeatureParser {
    /// Create new feature parser
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Supported file extensions (without dot)
    #[must_use]
    pub fn extensions(&self) -> &[&str] {
        &["feature"]
    }

    /// Check if this parser can handle the given path
    #[must_use]
    pub fn can_parse(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions().contains(&ext))
    }

    /// Extract key-tagged scenarios from one file's content
    ///
    /// Scenarios without an issue key are skipped. Scenarios carrying more
    /// than one distinct key are ambiguous and skipped with a warning.
    #[must_use]
    pub fn parse(&self, path: &Path, content: &str) -> Vec<LocalScenario> {
        let lines = split_lines(content);
        let spans = scan_scenarios(content);

        let mut scenarios = Vec::with_capacity(spans.len());
        for (i, span) in spans.iter().enumerate() {
            let block_end = spans.get(i + 1).map_or(lines.len(), |next| next.block_start);

            let mut keys: Vec<IssueKey> = Vec::new();
            for key in span.tags.iter().filter_map(|tag| IssueKey::from_tag(tag)) {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }

            let issue_key = match keys.len() {
                0 => continue,
                1 => keys.remove(0),
                _ => {
                    tracing::warn!(
                        path = %path.display(),
                        scenario = %span.name,
                        keys = ?keys.iter().map(IssueKey::as_str).collect::<Vec<_>>(),
                        "scenario carries several issue keys, skipping"
                    );
                    continue;
                }
            };

            let block = lines[span.block_start..block_end].join("\n");
            scenarios.push(LocalScenario::new(issue_key, span.name.clone(), path, block));
        }

        tracing::debug!(path = %path.display(), count = scenarios.len(), "parsed feature file");
        scenarios
    }
}

/// Parse one feature file with the default parser
#[must_use]
pub fn parse_feature(path: &Path, content: &str) -> Vec<LocalScenario> {
    FeatureParser::new().parse(path, content)
}
