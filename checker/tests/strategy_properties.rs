//tests/strategy_properties.rs
use checker::checks::multiple_choice::{McAnswer, McQuestion};
use checker::checks::{McModel, multiple_choice_answers};
use checker::instructions::{ALL_OF_TEXT, InstructionTree, Label};
use checker::types::CheckContext;
use checker::{
    CheckingPredicate, ClassificationState, Strategy, Submission, all_of, any_of, file_exists,
    negation,
};
use std::fs;
use tempfile::TempDir;

fn model() -> McModel {
    let answer = |text: &str, correct: bool, hint: Option<&str>| McAnswer {
        text: text.to_string(),
        correct,
        hint: hint.map(str::to_owned),
    };
    McModel(vec![
        McQuestion {
            text: "Eerste vraag".into(),
            answers: vec![answer("ja", true, None), answer("nee", false, Some("nee klopt niet"))],
        },
        McQuestion {
            text: "Tweede vraag".into(),
            answers: vec![
                answer("x", false, None),
                answer("y", true, None),
                answer("z", true, None),
            ],
        },
    ])
}

/// A spread of predicates covering every variant and some nesting.
fn samples() -> Vec<CheckingPredicate> {
    let a = file_exists(Some("a"), Some("txt"));
    let b = file_exists(None, Some("md"));
    vec![
        CheckingPredicate::True,
        a.clone(),
        CheckingPredicate::MultipleChoiceFormat,
        multiple_choice_answers(model()),
        negation(b.clone()),
        all_of([a.clone(), b.clone(), CheckingPredicate::True]),
        any_of([a.clone(), negation(b.clone())]),
        negation(all_of([
            any_of([a.clone(), CheckingPredicate::MultipleChoiceFormat]),
            negation(b.clone()),
        ])),
        all_of([]),
        any_of([all_of([a, b]), negation(negation(CheckingPredicate::True))]),
    ]
}

fn flatten(tree: &InstructionTree) -> Vec<String> {
    tree.labels().iter().map(|l| l.to_string()).collect()
}

#[test]
fn positive_and_negative_instructions_have_same_shape() {
    for p in samples() {
        for name in [None, Some("oef")] {
            let pos = p.instructions(name);
            let neg = p.negative_instructions(name);
            assert!(pos.same_shape(&neg), "shape differs for {:?}", p);
            assert_eq!(flatten(&pos).len(), flatten(&neg).len());
        }
    }
}

#[test]
fn double_negation_is_identity_on_instructions() {
    for p in samples() {
        let twice = negation(negation(p.clone()));
        assert_eq!(twice.instructions(Some("oef")), p.instructions(Some("oef")));
        assert_eq!(
            twice.negative_instructions(Some("oef")),
            p.negative_instructions(Some("oef"))
        );
    }
}

#[test]
fn de_morgan_holds_for_and_and_or() {
    let samples = samples();
    for a in &samples {
        for b in &samples {
            let not_and = negation(all_of([a.clone(), b.clone()]));
            let or_nots = any_of([negation(a.clone()), negation(b.clone())]);
            assert_eq!(not_and.instructions(None), or_nots.instructions(None));

            let not_or = negation(any_of([a.clone(), b.clone()]));
            let and_nots = all_of([negation(a.clone()), negation(b.clone())]);
            assert_eq!(not_or.instructions(None), and_nots.instructions(None));
        }
    }
}

#[test]
fn three_trues_under_all_of_scenario() {
    let p = all_of([
        CheckingPredicate::True,
        CheckingPredicate::True,
        CheckingPredicate::True,
    ]);
    assert_eq!(
        p.instructions(None),
        InstructionTree::node(
            Label::AllOf,
            vec![
                InstructionTree::leaf("True"),
                InstructionTree::leaf("True"),
                InstructionTree::leaf("True"),
            ]
        )
    );
    assert_eq!(flatten(&p.instructions(None))[0], ALL_OF_TEXT);
}

#[test]
fn file_exists_instruction_scenario() {
    assert_eq!(
        file_exists(Some("myfile"), Some("txt")).instructions(None),
        InstructionTree::leaf("Je hebt een bestand met naam myfile.txt")
    );
}

#[test]
fn undecided_numbering_is_gap_free_across_both_predicates() {
    let dir = TempDir::new().unwrap();
    // Neither predicate short-circuits: OR sees only false children, AND fails on its last.
    let strategy = Strategy::new(
        any_of([file_exists(Some("a"), None), file_exists(Some("b"), None)]),
        all_of([
            CheckingPredicate::True,
            CheckingPredicate::True,
            file_exists(Some("c"), None),
        ]),
    );
    let outcome = strategy.check_submission(&Submission::new("oef"), dir.path());
    assert_eq!(outcome.state, ClassificationState::Undecided);

    let numbers: Vec<u32> = outcome
        .components
        .iter()
        .filter_map(|c| c.component_number)
        .collect();
    let width = strategy.refusing.width(Some("oef")) + strategy.accepting.width(Some("oef"));
    assert_eq!(numbers, (1..=width).collect::<Vec<_>>());

    let instructions = strategy.instructions("oef");
    let shown: Vec<u32> = instructions.numbered().iter().map(|n| n.number).collect();
    assert_eq!(numbers, shown);
}

#[test]
fn refused_numbering_covers_refusing_width() {
    let dir = TempDir::new().unwrap();
    let strategy = Strategy::new(
        all_of([CheckingPredicate::True, negation(file_exists(Some("a"), None))]),
        CheckingPredicate::True,
    );
    let outcome = strategy.check_submission(&Submission::new("oef"), dir.path());
    assert_eq!(outcome.state, ClassificationState::Refused);

    let numbers: Vec<u32> = outcome
        .components
        .iter()
        .filter_map(|c| c.component_number)
        .collect();
    assert_eq!(numbers, vec![1, 2, 3]);
}

#[test]
fn short_circuit_consumes_the_same_numbers_as_full_evaluation() {
    let dir = TempDir::new().unwrap();
    let ctx = CheckContext::new("oef", dir.path());
    let x = any_of([CheckingPredicate::True, file_exists(Some("x"), None)]);
    let y = all_of([CheckingPredicate::True, CheckingPredicate::True]);
    let p = all_of([file_exists(Some("gate"), None), x, y]);

    let (short, short_next) = p.check_submission(&ctx, true, 10, false).unwrap();
    assert!(!short.outcome);
    assert_eq!(short.components.len(), 2);

    fs::write(dir.path().join("gate"), "").unwrap();
    let (full, full_next) = p.check_submission(&ctx, true, 10, false).unwrap();
    assert!(full.outcome);

    assert_eq!(short_next, full_next);
    assert_eq!(full_next, 10 + p.width(Some("oef")));
}

#[test]
fn accepting_is_never_run_once_refused() {
    let dir = TempDir::new().unwrap();
    // Without an .mc file the accepting check fails with an I/O error if it runs.
    let strategy = Strategy::new(
        CheckingPredicate::True,
        CheckingPredicate::MultipleChoiceFormat,
    );
    let outcome = strategy.check_submission(&Submission::new("oef"), dir.path());
    assert_eq!(outcome.state, ClassificationState::Refused);
}

#[test]
fn never_refusing_never_accepting_is_undecided() {
    let dir = TempDir::new().unwrap();
    let strategy = Strategy::new(
        negation(CheckingPredicate::True),
        negation(CheckingPredicate::True),
    );
    let outcome = strategy.check_submission(&Submission::new("wat-dan-ook"), dir.path());
    assert_eq!(outcome.state, ClassificationState::Undecided);
    assert!(outcome.components[0].component_number.is_none());
}

#[test]
fn multiple_choice_sheet_end_to_end() {
    let dir = TempDir::new().unwrap();
    let strategy = Strategy::new(
        negation(CheckingPredicate::MultipleChoiceFormat),
        multiple_choice_answers(model()),
    );

    fs::write(dir.path().join("mc1.mc"), "// mijn antwoorden\n1 a\n2 bc\n").unwrap();
    let outcome = strategy.check_submission(&Submission::new("mc1"), dir.path());
    assert_eq!(outcome.state, ClassificationState::Accepted);
    assert_eq!(outcome.components.len(), 1);
    assert_eq!(outcome.components[0].component_number, Some(2));

    fs::write(dir.path().join("mc1.mc"), "1 b\n2 bc\n").unwrap();
    let outcome = strategy.check_submission(&Submission::new("mc1"), dir.path());
    assert_eq!(outcome.state, ClassificationState::Undecided);
    let explanation = outcome.components.last().unwrap().renderer_data.clone();
    assert_eq!(
        explanation.as_deref(),
        Some("Je hebt volgende fouten:\nVraag 1: nee klopt niet")
    );

    fs::write(dir.path().join("mc1.mc"), "1 a\n2 b c ?\n").unwrap();
    let outcome = strategy.check_submission(&Submission::new("mc1"), dir.path());
    assert_eq!(outcome.state, ClassificationState::Refused);
    assert_eq!(
        outcome.components[0].renderer_data.as_deref(),
        Some("Je multiple choice bestand volgt het afgesproken formaat niet en dat moet juist wel")
    );
}
