//! Integration tests for ReactLoop
//!
//! Scripted tests run offline. The live test requires OPENAI_API_KEY.
//! Run with: cargo test -p reckon-react -- --include-ignored

mod common;

use common::{create_live_client, get_api_key, scripted};
use reckon_react::{ReactConfig, ReactFailure, ReactLoop};
use reckon_tools::ToolRegistry;
use rstest::rstest;

const TOOL_TURN: &str = "Thought: let me check.\nAction: <math>[1+1]";

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(5)]
#[tokio::test]
async fn test_answer_on_turn_k_takes_exactly_k_calls(#[case] k: usize) {
    let mut turns = vec![TOOL_TURN; k - 1];
    turns.push("Thought: done.\nFinal Answer: X");
    turns.push("Final Answer: never reached");
    let client = scripted(&turns);
    let tools = ToolRegistry::with_defaults();
    let react = ReactLoop::new(&client, &tools, ReactConfig::default().with_max_turns(5))
        .expect("valid config");

    let trace = react.run("question").await;

    assert!(trace.ok(), "outcome: {:?}", trace.outcome);
    assert_eq!(trace.answer(), Some("X"));
    assert_eq!(client.call_count(), k);
    assert_eq!(trace.turns.len(), k);
    assert_eq!(trace.tool_calls.len(), k - 1);
}

#[rstest]
#[case::all_tool_calls(vec![TOOL_TURN; 10])]
#[case::all_malformed(vec!["Action: math 1+1"; 10])]
#[case::mixed(vec![TOOL_TURN, "Action: <reflect>[]", TOOL_TURN, "hmm", TOOL_TURN])]
#[tokio::test]
async fn test_loop_terminates_within_budget(#[case] turns: Vec<&str>) {
    let tools = ToolRegistry::with_defaults();

    for max_turns in 1..=4 {
        let client = scripted(&turns);
        let react = ReactLoop::new(
            &client,
            &tools,
            ReactConfig::default().with_max_turns(max_turns),
        )
        .expect("valid config");

        let trace = react.run("question").await;

        assert!(!trace.ok());
        assert!(client.call_count() <= max_turns);
    }
}

#[tokio::test]
async fn test_script_running_dry_is_a_call_failure() {
    let client = scripted(&[TOOL_TURN]);
    let tools = ToolRegistry::with_defaults();
    let react = ReactLoop::new(&client, &tools, ReactConfig::default()).expect("valid config");

    let trace = react.run("question").await;

    assert!(matches!(trace.error(), Some(ReactFailure::Call(_))));
    assert_eq!(trace.turns.len(), 1);
}

#[tokio::test]
async fn test_history_is_cumulative() {
    let client = scripted(&[
        "Action: <math>[2**5]",
        "Action: <python>[print(1]",
        "Final Answer: 32",
    ]);
    let tools = ToolRegistry::with_defaults();
    let react = ReactLoop::new(&client, &tools, ReactConfig::default()).expect("valid config");

    let trace = react.run("What is 2 to the fifth?").await;
    assert_eq!(trace.answer(), Some("32"));

    let requests = client.requests();
    let lengths: Vec<usize> = requests.iter().map(|r| r.messages.len()).collect();
    assert_eq!(lengths, vec![2, 4, 6]);

    // Earlier messages are never rewritten.
    let last = &requests[2].messages;
    for (i, earlier) in requests[1].messages.iter().enumerate() {
        assert_eq!(&last[i], earlier);
    }
    assert_eq!(last[3].content, "[Observation]: 32");
    assert!(last[5].content.starts_with("[Observation]: SYNTAX ERROR:"));
}

/// Live check against a real backend.
#[tokio::test]
#[ignore] // Requires OPENAI_API_KEY
async fn test_react_live_arithmetic() {
    let Some(api_key) = get_api_key() else {
        eprintln!("Skipping test: OPENAI_API_KEY not set");
        return;
    };

    let client = create_live_client(&api_key);
    let tools = ToolRegistry::with_defaults();
    let react = ReactLoop::new(&client, &tools, ReactConfig::default().with_max_turns(5))
        .expect("valid config");

    let trace = react.run("What is 25 * 4? Use the math tool.").await;
    println!("{}", trace.transcript());

    match trace.answer() {
        Some(answer) => assert!(answer.contains("100"), "answer: {}", answer),
        None => eprintln!("Loop failed: {:?}", trace.error()),
    }
}
