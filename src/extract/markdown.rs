//! Benchmark report parsing
//!
//! Reports are markdown with one numbered section per scenario:
//!
//! ````text
//! ## 1. Patient Zero Analysis
//! **Vector-Only (Naive RAG):**
//! ```
//! ... PT-10002 ...
//! ```
//! **Knowledge Model (Graph RAG):**
//! ```
//! ... PT-10002, PT-10044 ...
//! ```
//! ````
//!
//! Section titles are mapped to scenario names by keyword, and the fenced
//! block directly under each method heading is scanned for codes. A method
//! without a block gets an empty set.

use super::{merge, read_to_string, ExtractResult, RetrievedSetSource, DEFAULT_CODE_PATTERN};
use crate::metrics::{CodeSet, RetrievedSets};
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Section title keyword -> scenario name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRule {
    pub keyword: String,
    pub scenario: String,
}

/// Method heading line -> method name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodRule {
    pub heading: String,
    pub method: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionRules {
    /// Regex matching one external code
    pub code_pattern: String,
    /// Checked in order; the first keyword contained in the title wins
    pub sections: Vec<SectionRule>,
    pub methods: Vec<MethodRule>,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        let section = |keyword: &str, scenario: &str| SectionRule {
            keyword: keyword.to_string(),
            scenario: scenario.to_string(),
        };
        let method = |heading: &str, method: &str| MethodRule {
            heading: heading.to_string(),
            method: method.to_string(),
        };

        Self {
            code_pattern: DEFAULT_CODE_PATTERN.to_string(),
            sections: vec![
                section("Patient Zero", "Patient Zero"),
                section("Contraindicated", "Contraindications"),
                section("Smokers", "Smokers with Asthma"),
                section("Intersection", "Intersection"),
                section("Root Cause", "Root Cause Analysis"),
            ],
            methods: vec![
                method("**Vector-Only (Naive RAG):**", "Vector"),
                method("**Knowledge Model (Graph RAG):**", "KM"),
            ],
        }
    }
}

/// Compiled form of [`ExtractionRules`]
#[derive(Debug, Clone)]
pub struct MarkdownReportParser {
    section_header: Regex,
    code: Regex,
    sections: Vec<SectionRule>,
    methods: Vec<(String, Regex)>,
}

impl MarkdownReportParser {
    pub fn new(rules: &ExtractionRules) -> ExtractResult<Self> {
        let methods = rules
            .methods
            .iter()
            .map(|rule| {
                let block = format!(r"{}\r?\n```(?s:(.*?))```", regex::escape(&rule.heading));
                Ok((rule.method.clone(), Regex::new(&block)?))
            })
            .collect::<ExtractResult<Vec<_>>>()?;

        Ok(Self {
            section_header: Regex::new(r"## \d+\. ")?,
            code: Regex::new(&rules.code_pattern)?,
            sections: rules.sections.clone(),
            methods,
        })
    }

    /// Extract every recognised scenario of one report
    pub fn parse_str(&self, content: &str) -> RetrievedSets {
        let mut sets = RetrievedSets::new();

        // Text before the first numbered header is preamble
        for section in self.section_header.split(content).skip(1) {
            let title = section.lines().next().unwrap_or_default().trim();
            let Some(scenario) = self.scenario_for(title) else {
                debug!(title = %title, "unrecognised report section");
                continue;
            };

            let methods: IndexMap<String, CodeSet> = self
                .methods
                .iter()
                .map(|(method, block)| {
                    let codes = block
                        .captures(section)
                        .and_then(|caps| caps.get(1))
                        .map(|m| self.codes(m.as_str()))
                        .unwrap_or_default();
                    (method.clone(), codes)
                })
                .collect();
            sets.insert(scenario.to_string(), methods);
        }
        sets
    }

    /// All codes in a block of free text
    pub fn codes(&self, text: &str) -> CodeSet {
        self.code
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    fn scenario_for(&self, title: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|rule| title.contains(&rule.keyword))
            .map(|rule| rule.scenario.as_str())
    }
}

/// A list of report files parsed with the same rules
#[derive(Debug, Clone)]
pub struct MarkdownReports {
    parser: MarkdownReportParser,
    paths: Vec<PathBuf>,
}

impl MarkdownReports {
    pub fn new(rules: &ExtractionRules, paths: Vec<PathBuf>) -> ExtractResult<Self> {
        Ok(Self {
            parser: MarkdownReportParser::new(rules)?,
            paths,
        })
    }
}

impl RetrievedSetSource for MarkdownReports {
    /// Later reports override earlier ones for the same scenario
    fn retrieved_sets(&self) -> ExtractResult<RetrievedSets> {
        let mut sets = RetrievedSets::new();
        for path in &self.paths {
            let parsed = self.parser.parse_str(&read_to_string(path)?);
            debug!(path = %path.display(), scenarios = parsed.len(), "parsed report");
            merge(&mut sets, parsed);
        }
        Ok(sets)
    }
}
