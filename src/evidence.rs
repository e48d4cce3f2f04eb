//! Evidence matching
//!
//! Counts whole-word, case-insensitive occurrences of a component's cue
//! phrases across the corpus. Cues are independent of each other: every cue is
//! counted over the full text of every file. Per-file tallies are summed, so
//! files can be scanned in any order and in parallel.

use crate::corpus::SourceCorpus;
use crate::models::EvidenceReport;
use crate::rubric::{RubricError, RubricResult};
use indexmap::IndexMap;
use memchr::memmem;
use rayon::prelude::*;
use regex::Regex;
use std::path::PathBuf;

#[derive(Debug)]
struct Cue {
    phrase: String,
    needle: String,
    pattern: Regex,
}

/// A component's compiled cue vocabulary
#[derive(Debug)]
pub struct CueSet {
    cues: Vec<Cue>,
}

impl CueSet {
    /// Compile the cues of `component`
    pub fn new<S: AsRef<str>>(component: &str, phrases: &[S]) -> RubricResult<Self> {
        let cues = phrases
            .iter()
            .map(|phrase| {
                let phrase = phrase.as_ref();
                let needle = phrase.to_lowercase();
                let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(&needle)))
                    .map_err(|source| RubricError::InvalidCue {
                        component: component.to_string(),
                        cue: phrase.to_string(),
                        source,
                    })?;
                Ok(Cue {
                    phrase: phrase.to_string(),
                    needle,
                    pattern,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { cues })
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Cue phrases as written in the rubric
    pub fn phrases(&self) -> impl Iterator<Item = &str> {
        self.cues.iter().map(|c| c.phrase.as_str())
    }

    /// Per-cue whole-word counts in already lower-cased text
    pub fn count_in(&self, lowered: &str) -> Vec<u64> {
        self.cues
            .iter()
            .map(|cue| {
                // Substring prefilter: no substring means no whole-word hit
                if memmem::find(lowered.as_bytes(), cue.needle.as_bytes()).is_none() {
                    return 0;
                }
                cue.pattern.find_iter(lowered).count() as u64
            })
            .collect()
    }
}

/// Evidence for one component plus the files that produced it
#[derive(Debug, Clone)]
pub struct EvidenceScan {
    pub report: EvidenceReport,
    /// Files with at least one cue hit, in path order
    pub matched_paths: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
struct Tally<'a> {
    per_cue: Vec<u64>,
    matched: Vec<&'a PathBuf>,
}

impl<'a> Tally<'a> {
    fn new(cue_count: usize) -> Self {
        Self {
            per_cue: vec![0; cue_count],
            matched: Vec::new(),
        }
    }

    fn add(mut self, path: &'a PathBuf, counts: &[u64]) -> Self {
        for (total, count) in self.per_cue.iter_mut().zip(counts) {
            *total += count;
        }
        self.matched.push(path);
        self
    }

    fn merge(mut self, other: Self) -> Self {
        for (total, count) in self.per_cue.iter_mut().zip(&other.per_cue) {
            *total += count;
        }
        self.matched.extend(other.matched);
        self
    }
}

/// Scan the whole corpus for a cue set
pub fn find_evidence(corpus: &SourceCorpus, cues: &CueSet) -> EvidenceScan {
    let tally = corpus
        .par_iter()
        .map(|(path, file)| (path, cues.count_in(file.lowercase())))
        .filter(|(_, counts)| counts.iter().any(|&c| c > 0))
        .fold(
            || Tally::new(cues.len()),
            |tally, (path, counts)| tally.add(path, &counts),
        )
        .reduce(|| Tally::new(cues.len()), Tally::merge);

    let mut matched_paths: Vec<PathBuf> = tally.matched.into_iter().cloned().collect();
    matched_paths.sort();

    let cue_matches: IndexMap<String, u64> = cues
        .phrases()
        .map(str::to_string)
        .zip(tally.per_cue.iter().copied())
        .collect();

    EvidenceScan {
        report: EvidenceReport {
            total_matches: tally.per_cue.iter().sum(),
            matched_files: matched_paths.len(),
            cue_matches,
        },
        matched_paths,
    }
}
