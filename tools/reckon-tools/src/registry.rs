//! Tool registry for the ReAct loop.

use crate::{MathTool, PythonTool, ReflectTool, Tool, ToolInvocation};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of available tools, keyed by lowercase name.
///
/// Built once and passed by reference into the loop that dispatches
/// against it. Lookups are case-insensitive.
///
/// # Example
///
/// ```
/// use reckon_tools::ToolRegistry;
///
/// let registry = ToolRegistry::with_defaults();
/// assert_eq!(registry.dispatch("MATH", "6*7").observation, "42");
/// assert_eq!(
///     registry.dispatch("search", "x").observation,
///     "ERROR: unknown tool 'search'"
/// );
/// ```
#[derive(Debug, Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `math`, `python` and `reflect`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .register(MathTool)
            .register(PythonTool)
            .register(ReflectTool);
        registry
    }

    /// Register a tool, replacing any tool with the same name.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) -> &mut Self {
        self.tools
            .insert(tool.name().to_lowercase(), Arc::new(tool));
        self
    }

    /// Look up a tool by case-insensitive name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(&name.trim().to_lowercase()).cloned()
    }

    /// Run a tool and record the exchange.
    ///
    /// Never fails: unknown tools and evaluation faults become `ERROR:`
    /// observations so the caller can feed them back to the model.
    pub fn dispatch(&self, tool_name: &str, argument: &str) -> ToolInvocation {
        let observation = match self.get(tool_name) {
            Some(tool) => tool.invoke(argument),
            None => {
                log::debug!("Unknown tool requested: {}", tool_name);
                format!("ERROR: unknown tool '{}'", tool_name)
            }
        };
        ToolInvocation {
            tool_name: tool_name.to_string(),
            argument: argument.to_string(),
            observation,
        }
    }

    /// Registered tool names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// One `- name: description` line per tool, sorted by name.
    pub fn describe(&self) -> String {
        self.names()
            .into_iter()
            .filter_map(|name| {
                self.tools
                    .get(name)
                    .map(|tool| format!("- {}: {}", name, tool.description()))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug)]
    struct EchoTool;

    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "Echo"
        }

        fn description(&self) -> &str {
            "Echo the argument"
        }

        fn invoke(&self, argument: &str) -> String {
            argument.to_string()
        }
    }

    #[test]
    fn test_defaults() {
        let registry = ToolRegistry::with_defaults();
        assert_eq!(registry.names(), vec!["math", "python", "reflect"]);
        assert_eq!(registry.len(), 3);
    }

    #[rstest]
    #[case("math")]
    #[case("Math")]
    #[case("PYTHON")]
    #[case(" reflect ")]
    fn test_lookup_is_case_insensitive(#[case] name: &str) {
        assert!(ToolRegistry::with_defaults().get(name).is_some());
    }

    #[test]
    fn test_dispatch_records_invocation() {
        let invocation = ToolRegistry::with_defaults().dispatch("math", "2*(3+4)");
        assert_eq!(invocation.tool_name, "math");
        assert_eq!(invocation.argument, "2*(3+4)");
        assert_eq!(invocation.observation, "14");
        assert!(!invocation.is_error());
    }

    #[test]
    fn test_dispatch_unknown_tool() {
        let invocation = ToolRegistry::with_defaults().dispatch("web_search", "rust");
        assert_eq!(invocation.observation, "ERROR: unknown tool 'web_search'");
        assert!(invocation.is_error());
    }

    #[test]
    fn test_syntax_fault_is_an_error_observation() {
        let invocation = ToolRegistry::with_defaults().dispatch("python", "return 5");
        assert!(invocation.observation.starts_with("SYNTAX ERROR:"));
        assert!(invocation.is_error());
    }

    #[test]
    fn test_register_lowercases_and_replaces() {
        let mut registry = ToolRegistry::new();
        assert!(registry.is_empty());
        registry.register(EchoTool).register(EchoTool);
        assert_eq!(registry.names(), vec!["echo"]);
        assert_eq!(registry.dispatch("ECHO", "hi").observation, "hi");
    }

    #[test]
    fn test_describe_lists_every_tool() {
        let description = ToolRegistry::with_defaults().describe();
        let lines: Vec<&str> = description.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("- math: "));
        assert!(lines[1].starts_with("- python: "));
        assert!(lines[2].starts_with("- reflect: "));
    }
}
