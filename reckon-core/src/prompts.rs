//! Prompt tables for reasoning and extraction calls.
//!
//! [`PromptBook`] is an immutable value built once and passed by reference to
//! the components that need it. [`PromptBook::default`] carries the built-in
//! tables; callers may start from it and replace entries.

use crate::labels::{Complexity, Domain};
use std::collections::HashMap;

/// Maximum number of worked examples appended to an extraction prompt.
pub const MAX_FEW_SHOT: usize = 5;

const MODIFIER_THOROUGH: &str =
    "Reason in a deliberate and thorough way: work step by step and verify each step before moving on.";
const MODIFIER_BRIEF: &str = "Keep your reasoning brief: a few short steps are enough.";
const MODIFIER_CONCISE: &str = "Keep your reasoning concise and focused on what matters.";

/// A worked example shown to the extraction call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FewShot {
    pub problem: String,
    pub answer: String,
}

impl FewShot {
    pub fn new(problem: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            problem: problem.into(),
            answer: answer.into(),
        }
    }
}

/// Domain-keyed prompt tables.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct PromptBook {
    /// Base system prompt per domain
    pub base: HashMap<Domain, String>,

    /// Base prompt for a domain missing from `base`
    pub fallback_base: String,

    /// Task instruction per domain
    pub tasks: HashMap<Domain, String>,

    /// Task instruction for a domain missing from `tasks`
    pub default_task: String,

    /// System prompt of the extraction call, before examples
    pub extraction: String,

    /// Worked examples per domain; only the first [`MAX_FEW_SHOT`] are used
    pub examples: HashMap<Domain, Vec<FewShot>>,
}

impl PromptBook {
    /// System prompt for the reasoning call.
    ///
    /// Base prompt, then a chain-of-thought intensity modifier chosen by
    /// complexity, then the domain's task instruction.
    pub fn system_prompt(&self, domain: Domain, complexity: Option<Complexity>) -> String {
        let base = self.base.get(&domain).unwrap_or(&self.fallback_base);
        let task = self.tasks.get(&domain).unwrap_or(&self.default_task);
        format!("{}\n\n{}\n\n{}", base, cot_modifier(complexity), task)
    }

    /// System prompt for the extraction call.
    pub fn extraction_prompt(&self, domain: Domain) -> String {
        let mut prompt = self.extraction.clone();
        let examples = self.examples.get(&domain).map(Vec::as_slice).unwrap_or(&[]);
        if !examples.is_empty() {
            prompt.push_str("\n\nExamples of ideal answers:");
            for example in examples.iter().take(MAX_FEW_SHOT) {
                prompt.push_str(&format!(
                    "\n\nProblem: {}\nIdeal answer: {}",
                    example.problem, example.answer
                ));
            }
        }
        prompt
    }
}

fn cot_modifier(complexity: Option<Complexity>) -> &'static str {
    match complexity {
        Some(c) if c.is_demanding() => MODIFIER_THOROUGH,
        Some(Complexity::Easy) => MODIFIER_BRIEF,
        _ => MODIFIER_CONCISE,
    }
}

impl Default for PromptBook {
    fn default() -> Self {
        let base = HashMap::from([
            (
                Domain::Math,
                "You are a careful math problem solver.".to_string(),
            ),
            (
                Domain::Coding,
                "You are an expert programmer who reasons precisely about code.".to_string(),
            ),
            (
                Domain::FuturePrediction,
                "You are a forecasting assistant who makes calibrated predictions.".to_string(),
            ),
            (
                Domain::Planning,
                "You are a planning assistant who builds clear, actionable plans.".to_string(),
            ),
            (
                Domain::CommonSense,
                "You are a common sense reasoning assistant.".to_string(),
            ),
            (
                Domain::General,
                "You are a helpful assistant that provides accurate answers.".to_string(),
            ),
        ]);

        let tasks = HashMap::from([
            (
                Domain::Math,
                "Work through the calculation step by step and state the final numeric result on the last line.".to_string(),
            ),
            (
                Domain::Coding,
                "Reason about the required behaviour, then give the exact code or output the question asks for.".to_string(),
            ),
            (
                Domain::Planning,
                "Lay out the plan as ordered steps, check every constraint, then state the final plan.".to_string(),
            ),
            (
                Domain::FuturePrediction,
                "Weigh the available evidence and base rates, then commit to one specific prediction.".to_string(),
            ),
            (
                Domain::CommonSense,
                "Use everyday knowledge to rule out implausible options, then give the single best answer.".to_string(),
            ),
        ]);

        let examples = HashMap::from([
            (
                Domain::Math,
                vec![
                    FewShot::new("What is 15% of 80?", "12"),
                    FewShot::new("Solve for x: 2x + 6 = 14.", "4"),
                    FewShot::new("What is the sum of the interior angles of a hexagon, in degrees?", "720"),
                    FewShot::new("Simplify the fraction 18/24.", "3/4"),
                    FewShot::new("How many ways can 3 books be chosen from 7?", "35"),
                ],
            ),
            (
                Domain::Coding,
                vec![
                    FewShot::new("What does Python print for len([1, 2, 3])?", "3"),
                    FewShot::new(
                        "Write a Python expression that reverses the string s.",
                        "s[::-1]",
                    ),
                    FewShot::new("What is the time complexity of binary search?", "O(log n)"),
                ],
            ),
            (
                Domain::Planning,
                vec![
                    FewShot::new(
                        "Move a stack of 2 disks from peg A to peg C using peg B.",
                        "A->B, A->C, B->C",
                    ),
                    FewShot::new(
                        "Order these tasks so dependencies come first: deploy (needs test), test (needs build), build.",
                        "build, test, deploy",
                    ),
                ],
            ),
            (
                Domain::CommonSense,
                vec![
                    FewShot::new("Where would you most likely keep milk cold?", "refrigerator"),
                    FewShot::new("If you drop a glass on a stone floor, what most likely happens?", "it breaks"),
                    FewShot::new("What do people usually use to cut paper?", "scissors"),
                ],
            ),
            (
                Domain::FuturePrediction,
                vec![
                    FewShot::new("Will the sun rise tomorrow? Answer yes or no.", "yes"),
                    FewShot::new("Give a probability that a fair coin lands heads.", "0.5"),
                ],
            ),
        ]);

        Self {
            base,
            fallback_base: "You are a helpful assistant.".to_string(),
            tasks,
            default_task: "Answer the question accurately and state the final answer clearly."
                .to_string(),
            extraction: "You are an answer extraction assistant. Given a problem description and a draft solution, \
output only the final answer string in plain text. Do not use markdown, LaTeX dollar signs, \
or \\boxed. Do not include any explanation or extra words such as 'Final answer'. \
Return just the answer string."
                .to_string(),
            examples,
        }
    }
}
