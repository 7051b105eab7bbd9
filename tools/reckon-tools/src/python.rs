//! Python syntax checker.
//!
//! The snippet is parsed as Python 3 and never executed. After a clean parse
//! a second pass rejects what the compiler refuses before running anything:
//! misplaced `return`/`yield`/`break`/`continue`, duplicate parameters,
//! unparenthesized generator arguments and bare `:=` statements.

use crate::Tool;
use rustpython_parser::text_size::TextRange;
use rustpython_parser::{ast, Parse};
use std::collections::HashSet;

/// Reported when the snippet compiles without faults.
pub const SYNTAX_OK: &str = "OK";

/// Source path shown in parser diagnostics.
const SOURCE_PATH: &str = "<python_tool>";

/// Checks a Python snippet and reports the first syntax fault.
///
/// Observations are either `OK` or `SYNTAX ERROR: <what> (line <n>)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonTool;

impl PythonTool {
    /// First fault in `source`, or `None` if it would compile.
    pub fn check(source: &str) -> Option<SyntaxFault> {
        match ast::Suite::parse(source, SOURCE_PATH) {
            Err(e) => Some(SyntaxFault::at(
                source,
                u32::from(e.offset) as usize,
                e.error.to_string(),
            )),
            Ok(suite) => Compile { source }.body(&suite, Scope::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxFault {
    /// 1-based line number.
    pub line: usize,
    pub message: String,
}

impl SyntaxFault {
    fn at(source: &str, offset: usize, message: impl Into<String>) -> Self {
        let end = offset.min(source.len());
        let line = source.as_bytes()[..end]
            .iter()
            .filter(|&&b| b == b'\n')
            .count()
            + 1;
        Self {
            line,
            message: clip(&message.into()),
        }
    }
}

fn clip(s: &str) -> String {
    const MAX: usize = 120;
    if s.chars().count() <= MAX {
        s.to_string()
    } else {
        let head: String = s.chars().take(MAX - 3).collect();
        format!("{}...", head)
    }
}

/// Enclosing context of the statement being checked.
#[derive(Debug, Clone, Copy, Default)]
struct Scope {
    in_function: bool,
    in_loop: bool,
}

impl Scope {
    fn function() -> Self {
        Self {
            in_function: true,
            in_loop: false,
        }
    }

    fn looping(self) -> Self {
        Self {
            in_loop: true,
            ..self
        }
    }
}

/// Compile-time checks over a parsed suite.
struct Compile<'s> {
    source: &'s str,
}

impl Compile<'_> {
    fn fault(&self, range: TextRange, message: impl Into<String>) -> Option<SyntaxFault> {
        Some(SyntaxFault::at(
            self.source,
            u32::from(range.start()) as usize,
            message,
        ))
    }

    fn starts_with_paren(&self, range: TextRange) -> bool {
        self.source.as_bytes().get(u32::from(range.start()) as usize) == Some(&b'(')
    }

    fn body(&self, stmts: &[ast::Stmt], scope: Scope) -> Option<SyntaxFault> {
        stmts.iter().find_map(|stmt| self.stmt(stmt, scope))
    }

    fn stmt(&self, stmt: &ast::Stmt, scope: Scope) -> Option<SyntaxFault> {
        use ast::Stmt;

        match stmt {
            Stmt::FunctionDef(ast::StmtFunctionDef {
                args,
                body,
                decorator_list,
                returns,
                range,
                ..
            }) => self.function(args, body, decorator_list, returns.as_deref(), *range, scope),
            Stmt::AsyncFunctionDef(ast::StmtAsyncFunctionDef {
                args,
                body,
                decorator_list,
                returns,
                range,
                ..
            }) => self.function(args, body, decorator_list, returns.as_deref(), *range, scope),
            Stmt::ClassDef(ast::StmtClassDef {
                bases,
                keywords,
                body,
                decorator_list,
                ..
            }) => self
                .exprs(decorator_list.iter().chain(bases), scope)
                .or_else(|| self.exprs(keywords.iter().map(|k| &k.value), scope))
                .or_else(|| self.body(body, Scope::default())),
            Stmt::Return(ast::StmtReturn { value, range, .. }) => {
                if !scope.in_function {
                    return self.fault(*range, "'return' outside function");
                }
                self.exprs(value.as_deref(), scope)
            }
            Stmt::Break(ast::StmtBreak { range, .. }) if !scope.in_loop => {
                self.fault(*range, "'break' outside loop")
            }
            Stmt::Continue(ast::StmtContinue { range, .. }) if !scope.in_loop => {
                self.fault(*range, "'continue' not properly in loop")
            }
            Stmt::For(ast::StmtFor {
                target,
                iter,
                body,
                orelse,
                ..
            }) => self.looped(&[target.as_ref(), iter.as_ref()], body, orelse, scope),
            Stmt::AsyncFor(ast::StmtAsyncFor {
                target,
                iter,
                body,
                orelse,
                ..
            }) => self.looped(&[target.as_ref(), iter.as_ref()], body, orelse, scope),
            Stmt::While(ast::StmtWhile {
                test, body, orelse, ..
            }) => self.looped(&[test.as_ref()], body, orelse, scope),
            Stmt::If(ast::StmtIf {
                test, body, orelse, ..
            }) => self
                .expr(test, scope)
                .or_else(|| self.body(body, scope))
                .or_else(|| self.body(orelse, scope)),
            Stmt::With(ast::StmtWith { items, body, .. }) => self
                .with_items(items, scope)
                .or_else(|| self.body(body, scope)),
            Stmt::AsyncWith(ast::StmtAsyncWith { items, body, .. }) => self
                .with_items(items, scope)
                .or_else(|| self.body(body, scope)),
            Stmt::Try(ast::StmtTry {
                body,
                handlers,
                orelse,
                finalbody,
                ..
            }) => self.guarded(body, handlers, orelse, finalbody, scope),
            Stmt::TryStar(ast::StmtTryStar {
                body,
                handlers,
                orelse,
                finalbody,
                ..
            }) => self.guarded(body, handlers, orelse, finalbody, scope),
            Stmt::Match(ast::StmtMatch { subject, cases, .. }) => {
                self.expr(subject, scope).or_else(|| {
                    cases.iter().find_map(|case| {
                        self.exprs(case.guard.as_deref(), scope)
                            .or_else(|| self.body(&case.body, scope))
                    })
                })
            }
            Stmt::Expr(ast::StmtExpr { value, range, .. }) => {
                // `(x := 1)` is a valid statement; the parser drops the parentheses.
                if let ast::Expr::NamedExpr(named) = value.as_ref() {
                    if named.range.start() == range.start() && !self.starts_with_paren(*range) {
                        return self.fault(*range, "invalid syntax: bare ':=' statement");
                    }
                }
                self.expr(value, scope)
            }
            Stmt::Assign(ast::StmtAssign { targets, value, .. }) => self
                .exprs(targets, scope)
                .or_else(|| self.expr(value, scope)),
            Stmt::AugAssign(ast::StmtAugAssign { target, value, .. }) => {
                self.exprs([target.as_ref(), value.as_ref()], scope)
            }
            Stmt::AnnAssign(ast::StmtAnnAssign {
                target,
                annotation,
                value,
                ..
            }) => self
                .exprs([target.as_ref(), annotation.as_ref()], scope)
                .or_else(|| self.exprs(value.as_deref(), scope)),
            Stmt::Delete(ast::StmtDelete { targets, .. }) => self.exprs(targets, scope),
            Stmt::Raise(ast::StmtRaise { exc, cause, .. }) => self
                .exprs(exc.as_deref(), scope)
                .or_else(|| self.exprs(cause.as_deref(), scope)),
            Stmt::Assert(ast::StmtAssert { test, msg, .. }) => self
                .expr(test, scope)
                .or_else(|| self.exprs(msg.as_deref(), scope)),
            _ => None,
        }
    }

    fn function(
        &self,
        args: &ast::Arguments,
        body: &[ast::Stmt],
        decorators: &[ast::Expr],
        returns: Option<&ast::Expr>,
        range: TextRange,
        scope: Scope,
    ) -> Option<SyntaxFault> {
        if let Some(name) = duplicate_parameter(args) {
            return self.fault(
                range,
                format!("duplicate argument '{}' in function definition", name),
            );
        }
        self.exprs(decorators, scope)
            .or_else(|| self.defaults(args, scope))
            .or_else(|| self.exprs(returns, scope))
            .or_else(|| self.body(body, Scope::function()))
    }

    fn defaults(&self, args: &ast::Arguments, scope: Scope) -> Option<SyntaxFault> {
        let defaults = args
            .posonlyargs
            .iter()
            .chain(&args.args)
            .chain(&args.kwonlyargs)
            .filter_map(|a| a.default.as_deref());
        self.exprs(defaults, scope)
    }

    /// Loop header, then the body in loop context. `else` keeps the outer context.
    fn looped(
        &self,
        header: &[&ast::Expr],
        body: &[ast::Stmt],
        orelse: &[ast::Stmt],
        scope: Scope,
    ) -> Option<SyntaxFault> {
        self.exprs(header.iter().copied(), scope)
            .or_else(|| self.body(body, scope.looping()))
            .or_else(|| self.body(orelse, scope))
    }

    fn with_items(&self, items: &[ast::WithItem], scope: Scope) -> Option<SyntaxFault> {
        items.iter().find_map(|item| {
            self.expr(&item.context_expr, scope)
                .or_else(|| self.exprs(item.optional_vars.as_deref(), scope))
        })
    }

    fn guarded(
        &self,
        body: &[ast::Stmt],
        handlers: &[ast::ExceptHandler],
        orelse: &[ast::Stmt],
        finalbody: &[ast::Stmt],
        scope: Scope,
    ) -> Option<SyntaxFault> {
        self.body(body, scope)
            .or_else(|| {
                handlers.iter().find_map(|handler| {
                    let ast::ExceptHandler::ExceptHandler(handler) = handler;
                    self.exprs(handler.type_.as_deref(), scope)
                        .or_else(|| self.body(&handler.body, scope))
                })
            })
            .or_else(|| self.body(orelse, scope))
            .or_else(|| self.body(finalbody, scope))
    }

    fn exprs<'e>(
        &self,
        exprs: impl IntoIterator<Item = &'e ast::Expr>,
        scope: Scope,
    ) -> Option<SyntaxFault> {
        exprs.into_iter().find_map(|e| self.expr(e, scope))
    }

    fn comprehension(
        &self,
        elts: &[&ast::Expr],
        generators: &[ast::Comprehension],
        scope: Scope,
    ) -> Option<SyntaxFault> {
        self.exprs(elts.iter().copied(), scope).or_else(|| {
            generators.iter().find_map(|g| {
                self.exprs([&g.target, &g.iter], scope)
                    .or_else(|| self.exprs(&g.ifs, scope))
            })
        })
    }

    fn expr(&self, expr: &ast::Expr, scope: Scope) -> Option<SyntaxFault> {
        use ast::Expr;

        match expr {
            Expr::Yield(ast::ExprYield { range, .. })
            | Expr::YieldFrom(ast::ExprYieldFrom { range, .. })
                if !scope.in_function =>
            {
                self.fault(*range, "'yield' outside function")
            }
            Expr::Yield(ast::ExprYield { value, .. }) => self.exprs(value.as_deref(), scope),
            Expr::YieldFrom(ast::ExprYieldFrom { value, .. })
            | Expr::Await(ast::ExprAwait { value, .. })
            | Expr::Attribute(ast::ExprAttribute { value, .. })
            | Expr::Starred(ast::ExprStarred { value, .. }) => self.expr(value, scope),
            Expr::Call(ast::ExprCall {
                func,
                args,
                keywords,
                ..
            }) => {
                if args.len() + keywords.len() > 1 {
                    for arg in args {
                        if let Expr::GeneratorExp(generator) = arg {
                            if !self.starts_with_paren(generator.range) {
                                return self.fault(
                                    generator.range,
                                    "Generator expression must be parenthesized",
                                );
                            }
                        }
                    }
                }
                self.expr(func, scope)
                    .or_else(|| self.exprs(args, scope))
                    .or_else(|| self.exprs(keywords.iter().map(|k| &k.value), scope))
            }
            Expr::Lambda(ast::ExprLambda { args, body, range, .. }) => {
                if let Some(name) = duplicate_parameter(args) {
                    return self.fault(
                        *range,
                        format!("duplicate argument '{}' in function definition", name),
                    );
                }
                self.defaults(args, scope)
                    .or_else(|| self.expr(body, Scope::function()))
            }
            Expr::BoolOp(ast::ExprBoolOp { values, .. }) => self.exprs(values, scope),
            Expr::NamedExpr(ast::ExprNamedExpr { target, value, .. }) => {
                self.exprs([target.as_ref(), value.as_ref()], scope)
            }
            Expr::BinOp(ast::ExprBinOp { left, right, .. }) => {
                self.exprs([left.as_ref(), right.as_ref()], scope)
            }
            Expr::UnaryOp(ast::ExprUnaryOp { operand, .. }) => self.expr(operand, scope),
            Expr::IfExp(ast::ExprIfExp {
                test, body, orelse, ..
            }) => self.exprs([test.as_ref(), body.as_ref(), orelse.as_ref()], scope),
            Expr::Dict(ast::ExprDict { keys, values, .. }) => self
                .exprs(keys.iter().flatten(), scope)
                .or_else(|| self.exprs(values, scope)),
            Expr::Set(ast::ExprSet { elts, .. })
            | Expr::List(ast::ExprList { elts, .. })
            | Expr::Tuple(ast::ExprTuple { elts, .. }) => self.exprs(elts, scope),
            Expr::ListComp(ast::ExprListComp {
                elt, generators, ..
            })
            | Expr::SetComp(ast::ExprSetComp {
                elt, generators, ..
            })
            | Expr::GeneratorExp(ast::ExprGeneratorExp {
                elt, generators, ..
            }) => self.comprehension(&[elt.as_ref()], generators, scope),
            Expr::DictComp(ast::ExprDictComp {
                key,
                value,
                generators,
                ..
            }) => self.comprehension(&[key.as_ref(), value.as_ref()], generators, scope),
            Expr::Compare(ast::ExprCompare {
                left, comparators, ..
            }) => self
                .expr(left, scope)
                .or_else(|| self.exprs(comparators, scope)),
            Expr::Subscript(ast::ExprSubscript { value, slice, .. }) => {
                self.exprs([value.as_ref(), slice.as_ref()], scope)
            }
            Expr::Slice(ast::ExprSlice {
                lower, upper, step, ..
            }) => self.exprs(
                [lower, upper, step].into_iter().filter_map(|e| e.as_deref()),
                scope,
            ),
            _ => None,
        }
    }
}

/// First parameter name bound twice in one signature.
fn duplicate_parameter(args: &ast::Arguments) -> Option<&str> {
    let mut seen = HashSet::new();
    args.posonlyargs
        .iter()
        .chain(&args.args)
        .chain(&args.kwonlyargs)
        .map(|a| a.def.arg.as_str())
        .chain(args.vararg.iter().map(|a| a.arg.as_str()))
        .chain(args.kwarg.iter().map(|a| a.arg.as_str()))
        .find(|name| !seen.insert(*name))
}

impl Tool for PythonTool {
    fn name(&self) -> &str {
        "python"
    }

    fn description(&self) -> &str {
        "Check a Python snippet for syntax errors without running it. \
         Returns OK or the first error with its line number."
    }

    fn invoke(&self, argument: &str) -> String {
        match Self::check(argument) {
            None => SYNTAX_OK.to_string(),
            Some(fault) => {
                log::debug!("python tool: line {}: {}", fault.line, fault.message);
                format!("SYNTAX ERROR: {} (line {})", fault.message, fault.line)
            }
        }
    }
}
