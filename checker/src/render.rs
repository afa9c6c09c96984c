//! Markup for instruction trees and multiple-choice questions.
//!
//! Every instruction node, composite markers included, is wrapped in an element
//! with `id="instruction-N"`, where `N` is the component number an evaluation
//! assigns to that node, so `#instruction-N` links from a component land on the
//! condition it explains. All labels and question texts are HTML-escaped.

use std::fmt::Write;

use crate::checks::McModel;
use crate::instructions::{InstructionTree, StrategyInstructions};

pub const REFUSED_HEADING: &str = "Je oefening wordt geweigerd als:";
pub const ACCEPTED_HEADING: &str = "Je oefening wordt aanvaard als:";

/// Escape text for use in element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn tree_to_html(tree: &InstructionTree, number: u32, out: &mut String) -> u32 {
    let _ = write!(
        out,
        r#"<li><span id="instruction-{number}">{}</span>"#,
        escape_html(tree.label.as_str())
    );
    let mut next = number + 1;
    if !tree.is_leaf() {
        out.push_str("<ul>");
        for child in &tree.children {
            next = tree_to_html(child, next, out);
        }
        out.push_str("</ul>");
    }
    out.push_str("</li>");
    next
}

/// Both trees as one nested list, under the refused/accepted headings.
pub fn instructions_to_html(instructions: &StrategyInstructions) -> String {
    let mut refusing = String::new();
    let next = tree_to_html(&instructions.refusing, 1, &mut refusing);
    let mut accepting = String::new();
    tree_to_html(&instructions.accepting, next, &mut accepting);

    format!(
        "<ul><li>{REFUSED_HEADING}<ul>{refusing}</ul></li><li>{ACCEPTED_HEADING}<ul>{accepting}</ul></li></ul>"
    )
}

/// Numbered outline for terminals, two spaces of indent per level.
pub fn instructions_to_text(instructions: &StrategyInstructions) -> String {
    let mut out = String::new();
    let offset = instructions.accepting_offset();
    for (heading, tree, first) in [
        (REFUSED_HEADING, &instructions.refusing, 1),
        (ACCEPTED_HEADING, &instructions.accepting, offset),
    ] {
        out.push_str(heading);
        out.push('\n');
        for node in tree.numbered(first) {
            let _ = writeln!(
                out,
                "{:indent$}{}. {}",
                "",
                node.number,
                node.label,
                indent = 2 * (node.depth + 1)
            );
        }
    }
    out
}

/// Questions as an ordered list, each with its answer options.
pub fn render_multiple_choice(model: &McModel) -> String {
    let mut out = String::from(r#"<ol class="multiple-choice">"#);
    for question in model.questions() {
        let _ = write!(out, "<li>{}<ol>", escape_html(&question.text));
        for answer in &question.answers {
            let _ = write!(out, "<li>{}</li>", escape_html(&answer.text));
        }
        out.push_str("</ol></li>");
    }
    out.push_str("</ol>");
    out
}
