// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The ordered spec list and its one-shot setup transforms.

use rand::Rng;
use rand::seq::SliceRandom;
use regex::Regex;

use crate::error::Result;
use crate::partition;
use crate::spec::Spec;
use crate::tree::ContainerNode;

pub struct SpecCollection<'a> {
    specs: Vec<Spec<'a>>,
    number_of_original_specs: usize,
    has_programmatic_focus: bool,
}

impl<'a> SpecCollection<'a> {
    pub fn new(specs: Vec<Spec<'a>>) -> Self {
        let number_of_original_specs = specs.len();
        Self {
            specs,
            number_of_original_specs,
            has_programmatic_focus: false,
        }
    }

    /// Collate `root` into specs.
    pub fn from_tree(root: &'a ContainerNode) -> Self {
        Self::new(root.collate().into_iter().map(Spec::from_collated).collect())
    }

    pub fn specs(&self) -> &[Spec<'a>] {
        &self.specs
    }

    pub fn specs_mut(&mut self) -> &mut [Spec<'a>] {
        &mut self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Count before parallel trimming.
    pub fn number_of_original_specs(&self) -> usize {
        self.number_of_original_specs
    }

    /// Whether programmatic focus restricted the run.
    pub fn has_programmatic_focus(&self) -> bool {
        self.has_programmatic_focus
    }

    /// Sort by concatenated text, then apply a seeded permutation.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut sorted = std::mem::take(&mut self.specs);
        sorted.sort_by_cached_key(Spec::concatenated_text);

        let mut permutation: Vec<usize> = (0..sorted.len()).collect();
        permutation.shuffle(rng);

        let mut slots: Vec<Option<Spec<'a>>> = sorted.into_iter().map(Some).collect();
        self.specs = permutation
            .into_iter()
            .filter_map(|index| slots[index].take())
            .collect();
    }

    /// Decide which specs run.
    ///
    /// Without filters, programmatic focus applies: if any runnable spec is
    /// focused, every other non-pending spec is skipped. With a focus or
    /// skip filter, programmatic focus is ignored and each spec is matched
    /// as `"<description> <container texts> <subject text>"`.
    pub fn apply_focus(&mut self, description: &str, focus: Option<&Regex>, skip: Option<&Regex>) {
        if focus.is_none() && skip.is_none() {
            self.apply_programmatic_focus();
        } else {
            self.apply_regex_focus(description, focus, skip);
        }
    }

    fn apply_programmatic_focus(&mut self) {
        self.has_programmatic_focus = self
            .specs
            .iter()
            .any(|spec| spec.is_focused() && !spec.is_pending());

        if self.has_programmatic_focus {
            for spec in &mut self.specs {
                if !spec.is_focused() && !spec.is_pending() {
                    spec.skip();
                }
            }
        }
    }

    fn apply_regex_focus(&mut self, description: &str, focus: Option<&Regex>, skip: Option<&Regex>) {
        for spec in &mut self.specs {
            let subject = format!("{description} {}", spec.concatenated_text());
            let matches_focus = focus.is_none_or(|re| re.is_match(&subject));
            let matches_skip = skip.is_some_and(|re| re.is_match(&subject));
            if !matches_focus || matches_skip {
                spec.skip();
            }
        }
    }

    pub fn skip_measurements(&mut self) {
        for spec in &mut self.specs {
            if spec.is_measurement() {
                spec.skip();
            }
        }
    }

    /// Keep only the slice worker `node` of `total` runs.
    pub fn trim_for_parallelization(&mut self, total: usize, node: usize) -> Result<()> {
        let range = partition::index_range(self.specs.len(), total, node)?;
        tracing::debug!(
            total,
            node,
            start = range.start,
            end = range.end,
            "trimming spec list for parallel worker"
        );
        self.specs.truncate(range.end);
        self.specs.drain(..range.start);
        Ok(())
    }
}

#[cfg(test)]
#[path = "collection_tests.rs"]
mod tests;
