// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The declared container tree.
//!
//! Built once by the suite builder, then frozen. Execution only ever sees
//! the flattened output of [`ContainerNode::collate`].

use rand::Rng;
use rand::seq::SliceRandom;

use crate::code_location::CodeLocation;
use crate::leaf::{SetupNode, SubjectNode};
use crate::types::FlagType;

/// A container's child: either a nested container or a spec subject.
pub enum Child {
    Container(ContainerNode),
    Subject(SubjectNode),
}

impl Child {
    pub fn text(&self) -> &str {
        match self {
            Self::Container(container) => container.text(),
            Self::Subject(subject) => subject.text(),
        }
    }

    pub fn flag(&self) -> FlagType {
        match self {
            Self::Container(container) => container.flag(),
            Self::Subject(subject) => subject.flag(),
        }
    }
}

/// One flattened spec: every enclosing container (root first) plus its subject.
pub struct Collated<'a> {
    pub containers: Vec<&'a ContainerNode>,
    pub subject: &'a SubjectNode,
}

pub struct ContainerNode {
    text: String,
    flag: FlagType,
    code_location: CodeLocation,
    before_each: Vec<SetupNode>,
    just_before_each: Vec<SetupNode>,
    after_each: Vec<SetupNode>,
    children: Vec<Child>,
}

impl ContainerNode {
    pub fn new(text: impl Into<String>, flag: FlagType, code_location: CodeLocation) -> Self {
        Self {
            text: text.into(),
            flag,
            code_location,
            before_each: Vec::new(),
            just_before_each: Vec::new(),
            after_each: Vec::new(),
            children: Vec::new(),
        }
    }

    /// The implicit top-level container. It has no text and never shows up
    /// in spec descriptions.
    pub fn root() -> Self {
        Self::new("", FlagType::None, CodeLocation::default())
    }

    pub fn push_container(&mut self, container: ContainerNode) {
        self.children.push(Child::Container(container));
    }

    pub fn push_subject(&mut self, subject: SubjectNode) {
        self.children.push(Child::Subject(subject));
    }

    pub fn push_before_each(&mut self, node: SetupNode) {
        self.before_each.push(node);
    }

    pub fn push_just_before_each(&mut self, node: SetupNode) {
        self.just_before_each.push(node);
    }

    pub fn push_after_each(&mut self, node: SetupNode) {
        self.after_each.push(node);
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn flag(&self) -> FlagType {
        self.flag
    }

    pub fn code_location(&self) -> &CodeLocation {
        &self.code_location
    }

    pub fn before_each(&self) -> &[SetupNode] {
        &self.before_each
    }

    pub fn just_before_each(&self) -> &[SetupNode] {
        &self.just_before_each
    }

    pub fn after_each(&self) -> &[SetupNode] {
        &self.after_each
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    /// Reorder this container's direct children.
    ///
    /// Children are first sorted by text, then permuted by `rng`, so the
    /// result depends only on the seed and the texts, never on declaration
    /// order. Nested containers keep their own order.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut sorted = std::mem::take(&mut self.children);
        sorted.sort_by(|a, b| a.text().cmp(b.text()));

        let mut permutation: Vec<usize> = (0..sorted.len()).collect();
        permutation.shuffle(rng);

        let mut slots: Vec<Option<Child>> = sorted.into_iter().map(Some).collect();
        self.children = permutation
            .into_iter()
            .filter_map(|index| slots[index].take())
            .collect();
    }

    /// Flatten the tree depth-first into specs.
    pub fn collate(&self) -> Vec<Collated<'_>> {
        let mut specs = Vec::new();
        let mut path = Vec::new();
        self.collate_into(&mut path, &mut specs);
        specs
    }

    fn collate_into<'a>(&'a self, path: &mut Vec<&'a ContainerNode>, specs: &mut Vec<Collated<'a>>) {
        path.push(self);
        for child in &self.children {
            match child {
                Child::Container(container) => container.collate_into(path, specs),
                Child::Subject(subject) => specs.push(Collated {
                    containers: path.clone(),
                    subject,
                }),
            }
        }
        path.pop();
    }

    /// Drop the focus of any container that has a focused descendant.
    ///
    /// Focusing a spec inside a focused container narrows the focus to that
    /// spec instead of running the whole container. Pending containers are
    /// left alone. Returns whether this subtree contains any focus.
    pub fn back_propagate_focus(&mut self) -> bool {
        if self.flag == FlagType::Pending {
            return false;
        }

        let mut descendant_focused = false;
        for child in &mut self.children {
            let focused = match child {
                Child::Container(container) => container.back_propagate_focus(),
                Child::Subject(subject) => subject.flag() == FlagType::Focused,
            };
            descendant_focused |= focused;
        }

        if descendant_focused {
            if self.flag == FlagType::Focused {
                self.flag = FlagType::None;
            }
            return true;
        }
        self.flag == FlagType::Focused
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;
