//! Instruction trees: the natural-language description of when a predicate holds,
//! computed without looking at any submission.
//!
//! Every node of an [`InstructionTree`] corresponds to exactly one component
//! number. Numbers are assigned depth-first, pre-order, so a composite's marker
//! comes before its children. Negation has no node of its own: it is absorbed
//! into the phrasing of its descendants.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default rendering of [`Label::AllOf`].
pub const ALL_OF_TEXT: &str = "Aan al volgende voorwaarden is voldaan:";
/// Default rendering of [`Label::AtLeastOne`].
pub const AT_LEAST_ONE_TEXT: &str = "Aan minstens één van volgende voorwaarden is voldaan:";

/// Label of an instruction node.
///
/// The composite markers are tags so presentation layers can localize them; the
/// `Display` impl falls back to [`ALL_OF_TEXT`] / [`AT_LEAST_ONE_TEXT`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Label {
    AllOf,
    AtLeastOne,
    Text(String),
}

impl Label {
    pub fn text(s: impl Into<String>) -> Self {
        Label::Text(s.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Label::AllOf => ALL_OF_TEXT,
            Label::AtLeastOne => AT_LEAST_ONE_TEXT,
            Label::Text(s) => s,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rose tree of instruction labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionTree {
    pub label: Label,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<InstructionTree>,
}

/// One node of a tree together with its component number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberedInstruction<'a> {
    pub number: u32,
    pub depth: usize,
    pub label: &'a Label,
}

impl InstructionTree {
    pub fn leaf(text: impl Into<String>) -> Self {
        Self {
            label: Label::text(text),
            children: Vec::new(),
        }
    }

    pub fn node(label: Label, children: Vec<InstructionTree>) -> Self {
        Self { label, children }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of component numbers this tree accounts for.
    pub fn width(&self) -> u32 {
        1 + self.children.iter().map(InstructionTree::width).sum::<u32>()
    }

    /// Labels in pre-order.
    pub fn labels(&self) -> Vec<&Label> {
        let mut out = Vec::with_capacity(self.width() as usize);
        self.collect_labels(&mut out);
        out
    }

    fn collect_labels<'a>(&'a self, out: &mut Vec<&'a Label>) {
        out.push(&self.label);
        for child in &self.children {
            child.collect_labels(out);
        }
    }

    /// Pre-order walk assigning numbers from `first` onwards.
    pub fn numbered(&self, first: u32) -> Vec<NumberedInstruction<'_>> {
        let mut out = Vec::with_capacity(self.width() as usize);
        self.collect_numbered(first, 0, &mut out);
        out
    }

    fn collect_numbered<'a>(
        &'a self,
        number: u32,
        depth: usize,
        out: &mut Vec<NumberedInstruction<'a>>,
    ) -> u32 {
        out.push(NumberedInstruction {
            number,
            depth,
            label: &self.label,
        });
        let mut next = number + 1;
        for child in &self.children {
            next = child.collect_numbered(next, depth + 1, out);
        }
        next
    }

    /// Same branching, ignoring labels.
    pub fn same_shape(&self, other: &InstructionTree) -> bool {
        self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(&other.children)
                .all(|(a, b)| a.same_shape(b))
    }
}

/// The two trees shown before submitting: when an exercise is refused and when
/// it is accepted. Numbering continues from the refusing tree into the
/// accepting one, exactly as evaluation does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyInstructions {
    pub refusing: InstructionTree,
    pub accepting: InstructionTree,
}

impl StrategyInstructions {
    /// Component number of the accepting tree's root.
    pub fn accepting_offset(&self) -> u32 {
        1 + self.refusing.width()
    }

    /// Both trees numbered from 1, refusing tree first.
    pub fn numbered(&self) -> Vec<NumberedInstruction<'_>> {
        let mut all = self.refusing.numbered(1);
        all.extend(self.accepting.numbered(self.accepting_offset()));
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested() -> InstructionTree {
        InstructionTree::node(
            Label::AllOf,
            vec![
                InstructionTree::leaf("True"),
                InstructionTree::node(
                    Label::AtLeastOne,
                    vec![InstructionTree::leaf("False"), InstructionTree::leaf("True")],
                ),
            ],
        )
    }

    #[test]
    fn width_counts_every_node() {
        assert_eq!(InstructionTree::leaf("x").width(), 1);
        assert_eq!(nested().width(), 5);
        assert_eq!(InstructionTree::node(Label::AllOf, vec![]).width(), 1);
    }

    #[test]
    fn numbering_is_preorder() {
        let tree = nested();
        let numbered = tree.numbered(1);
        let got: Vec<(u32, usize, &str)> = numbered
            .iter()
            .map(|n| (n.number, n.depth, n.label.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![
                (1, 0, ALL_OF_TEXT),
                (2, 1, "True"),
                (3, 1, AT_LEAST_ONE_TEXT),
                (4, 2, "False"),
                (5, 2, "True"),
            ]
        );
    }

    #[test]
    fn strategy_numbering_continues_into_accepting_tree() {
        let instructions = StrategyInstructions {
            refusing: nested(),
            accepting: InstructionTree::leaf("True"),
        };
        assert_eq!(instructions.accepting_offset(), 6);
        let numbers: Vec<u32> = instructions.numbered().iter().map(|n| n.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn same_shape_ignores_labels() {
        let a = nested();
        let mut b = nested();
        b.label = Label::AtLeastOne;
        b.children[0] = InstructionTree::leaf("anders");
        assert!(a.same_shape(&b));
        b.children.pop();
        assert!(!a.same_shape(&b));
    }
}
