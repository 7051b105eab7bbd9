//! Line scanning for model turns.
//!
//! Both scanners walk the turn's lines from last to first and stop at the
//! first hit, so the latest statement in a turn wins.

use regex::Regex;
use std::sync::LazyLock;

const ACTION_PREFIX: &str = "action:";

/// `<TOOL_NAME>[ARGUMENT]`, anchored at the start; the argument runs to the last `]`.
static ACTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<(\w+)>\[(.*)\]").expect("action pattern is valid"));

/// A tool call requested by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub tool: String,
    pub argument: String,
}

/// What a single turn asks the loop to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnDecision {
    Finish(String),
    Act(Action),
    Stuck,
}

impl TurnDecision {
    /// A final-answer line takes precedence over any action line.
    pub fn classify(text: &str) -> Self {
        if let Some(answer) = parse_final_answer(text) {
            TurnDecision::Finish(answer)
        } else if let Some(action) = parse_action(text) {
            TurnDecision::Act(action)
        } else {
            TurnDecision::Stuck
        }
    }
}

/// Last line mentioning "final answer" (any case).
///
/// The answer is the text after that line's first colon, or the whole line
/// when it has none.
pub fn parse_final_answer(text: &str) -> Option<String> {
    text.lines()
        .rev()
        .find(|line| line.to_lowercase().contains("final answer"))
        .map(|line| match line.split_once(':') {
            Some((_, answer)) => answer.trim().to_string(),
            None => line.trim().to_string(),
        })
}

/// Last well-formed `Action: <TOOL>[ARG]` line.
///
/// Malformed action lines are skipped and the scan continues upward.
pub fn parse_action(text: &str) -> Option<Action> {
    text.lines().rev().find_map(|line| {
        let line = line.trim();
        let head = line.get(..ACTION_PREFIX.len())?;
        if !head.eq_ignore_ascii_case(ACTION_PREFIX) {
            return None;
        }
        let body = line[ACTION_PREFIX.len()..].trim();
        let captures = ACTION_PATTERN.captures(body)?;
        Some(Action {
            tool: captures[1].to_string(),
            argument: captures[2].to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn action(tool: &str, argument: &str) -> Action {
        Action {
            tool: tool.to_string(),
            argument: argument.to_string(),
        }
    }

    #[rstest]
    #[case::colon("Thought: easy.\nFinal Answer: 42", Some("42"))]
    #[case::lowercase("final answer: Paris ", Some("Paris"))]
    #[case::no_colon("the final answer is 7", Some("the final answer is 7"))]
    #[case::first_colon_only("Final Answer: 10:30", Some("10:30"))]
    #[case::last_line_wins("Final Answer: 1\nwait\nFinal Answer: 2", Some("2"))]
    #[case::mid_line("So my final answer: 3", Some("3"))]
    #[case::empty_after_colon("Final Answer:", Some(""))]
    #[case::none("Action: <math>[1+1]", None)]
    #[case::empty("", None)]
    fn test_parse_final_answer(#[case] text: &str, #[case] expected: Option<&str>) {
        assert_eq!(parse_final_answer(text).as_deref(), expected);
    }

    #[rstest]
    #[case::basic("Action: <math>[2*(3+4)]", Some(action("math", "2*(3+4)")))]
    #[case::lowercase_prefix("action: <reflect>[units]", Some(action("reflect", "units")))]
    #[case::indented("   ACTION:   <python>[print(1)]", Some(action("python", "print(1)")))]
    #[case::greedy_brackets("Action: <math>[max([1])]", Some(action("math", "max([1])")))]
    #[case::empty_argument("Action: <reflect>[]", Some(action("reflect", "")))]
    #[case::trailing_text("Action: <math>[1+1] then wait", Some(action("math", "1+1")))]
    #[case::last_wins("Action: <math>[1]\nAction: <math>[2]", Some(action("math", "2")))]
    #[case::skips_malformed("Action: <math>[1]\nAction: math(2)", Some(action("math", "1")))]
    #[case::not_line_start("I will take Action: <math>[1]", None)]
    #[case::missing_brackets("Action: <math>", None)]
    #[case::non_word_tool("Action: <web-search>[x]", None)]
    #[case::no_action("Just thinking.", None)]
    fn test_parse_action(#[case] text: &str, #[case] expected: Option<Action>) {
        assert_eq!(parse_action(text), expected);
    }

    #[test]
    fn test_final_answer_beats_later_action() {
        let text = "Final Answer: 5\nAction: <math>[2+3]";
        assert_eq!(
            TurnDecision::classify(text),
            TurnDecision::Finish("5".to_string())
        );
    }

    #[test]
    fn test_classify_action_and_stuck() {
        assert_eq!(
            TurnDecision::classify("Thought: compute.\nAction: <math>[6*7]"),
            TurnDecision::Act(action("math", "6*7"))
        );
        assert_eq!(TurnDecision::classify("I am not sure."), TurnDecision::Stuck);
    }
}
