//! JavaScript code generator
//!
//! Emission is a staged state machine: readline prelude, runtime helper
//! block with the program's axis defaults baked in, then the statements in
//! source order, then `rl.close()`. Input acquisitions are hoisted into the
//! prelude and their call sites replaced by fresh `inputVar__N` temporaries.
//!
//! Stream semantics at use sites:
//! - a step read inside the defining function's own body is just the
//!   most-recent history read; advancement is driven from statement
//!   position, never from inside the recurrence,
//! - `f(x)` with `f`'s own stream parameter in value position drives the
//!   cell to the end of its axis and reads the final value,
//! - `x : n` drives the cell the same way and reads the first `n` history
//!   entries,
//! - a bare stream-parameter reference outside its defining body is the
//!   cell itself, driven to the end of the axis; printing it prints the
//!   whole history.

use std::collections::{HashMap, HashSet};

use funktion_core::ast::Node;

use super::names::NameTable;
use super::runtime;

/// JavaScript generator
pub struct Generator {
    names: NameTable,
    /// Hoisted input acquisitions, in call-site order
    preamble: Vec<String>,
    output: Vec<String>,
    input_index: usize,
    /// Raw parameter names whose cell is already declared
    cells: HashSet<String>,
    /// Function name -> its stream parameter
    param_of: HashMap<String, String>,
    /// Stream parameter -> the function that drives its cell
    driver_of: HashMap<String, String>,
    /// Function whose body is currently being emitted
    current_fn: Option<String>,
}

impl Generator {
    /// Create a new generator
    pub fn new() -> Self {
        Self {
            names: NameTable::new(),
            preamble: Vec::new(),
            output: Vec::new(),
            input_index: 0,
            cells: HashSet::new(),
            param_of: HashMap::new(),
            driver_of: HashMap::new(),
            current_fn: None,
        }
    }

    /// Generate the complete JavaScript program for an analyzed AST
    pub fn generate(mut self, program: &Node) -> String {
        let (global_range, statements) = match program {
            Node::Program {
                global_range,
                statements,
            } => (global_range.as_deref(), &statements[..]),
            other => (None, std::slice::from_ref(other)),
        };

        for statement in statements {
            if let Node::FuncDef { name, param, .. } = statement {
                self.param_of.insert(name.clone(), param.clone());
                self.driver_of.insert(param.clone(), name.clone());
            }
        }

        let (start, end, step, is_char) = self.axis_defaults(global_range);
        self.output
            .push(runtime::runtime_block(&start, &end, &step, is_char));

        for statement in statements {
            self.gen_statement(statement);
        }
        self.output.push(runtime::CLOSE_STMT.to_string());

        let mut lines = vec![runtime::READLINE_PRELUDE.to_string()];
        lines.extend(self.preamble);
        lines.extend(self.output);
        lines.join("\n")
    }

    /// Axis defaults baked into `generateRange`; fallback axis is 1..5
    /// with step 1.
    fn axis_defaults(&mut self, global_range: Option<&Node>) -> (String, String, String, bool) {
        let Some(Node::GlobalRange { range, timestep }) = global_range else {
            return ("1".to_string(), "5".to_string(), "1".to_string(), false);
        };

        let step = match timestep.as_deref() {
            Some(Node::Timestep { value }) => self.gen_expr(value),
            _ => "1".to_string(),
        };

        match range.as_ref() {
            Node::NumRange { start, end } => {
                let start = self.gen_expr(start);
                let end = match end.as_deref() {
                    Some(e) => self.gen_expr(e),
                    None => "Infinity".to_string(),
                };
                (start, end, step, false)
            }
            Node::CharRange { start, end } => {
                let start = self.char_code(start);
                let end = match end.as_deref() {
                    Some(e) => self.char_code(e),
                    None => "Infinity".to_string(),
                };
                (start, end, step, true)
            }
            other => {
                let start = self.gen_expr(other);
                (start, "Infinity".to_string(), step, false)
            }
        }
    }

    fn char_code(&mut self, node: &Node) -> String {
        match node {
            Node::Char(c) => (*c as u32).to_string(),
            other => format!("{}.charCodeAt(0)", self.gen_expr(other)),
        }
    }

    fn cell_name(&mut self, param: &str) -> String {
        format!("{}_cell", self.names.target(param))
    }

    fn gen_statement(&mut self, node: &Node) {
        match node {
            Node::FuncDef { name, param, body } => {
                let func_name = self.names.target(name);
                let param_name = self.names.target(param);
                if self.cells.insert(param.clone()) {
                    self.output
                        .push(format!("let {param_name}_cell = initializeCell();"));
                }

                let previous = self.current_fn.replace(name.clone());
                let body_js = match body.as_ref() {
                    Node::Slice { exprs } => {
                        let parts: Vec<String> =
                            exprs.iter().map(|e| self.gen_expr(e)).collect();
                        parts.join(", ")
                    }
                    other => self.gen_expr(other),
                };
                self.current_fn = previous;

                self.output.push(format!(
                    "function {func_name}({param_name}) {{ return [{body_js}]; }}"
                ));
            }

            Node::Print { expr } => {
                let value = self.gen_expr(expr);
                self.output.push(format!("funktionPrint({value});"));
            }

            // Step in statement position only advances; nothing reads
            Node::Step { func, param, count } => {
                let cell = self.cell_name(param);
                let f = self.names.target(func);
                self.output
                    .push(format!("advanceCell({cell}, {}, {f});", js_number(*count)));
            }

            Node::Expr { first, rest } => {
                self.gen_statement(first);
                for e in rest {
                    self.gen_statement(e);
                }
            }

            // Consumed while computing axis defaults
            Node::GlobalRange { .. }
            | Node::NumRange { .. }
            | Node::CharRange { .. }
            | Node::Timestep { .. } => {}

            other => {
                let value = self.gen_expr(other);
                self.output.push(format!("{value};"));
            }
        }
    }

    fn gen_expr(&mut self, node: &Node) -> String {
        match node {
            Node::Number(n) => js_number(*n),
            Node::Str(s) => js_string(s),
            Node::Char(c) => js_string(&c.to_string()),

            Node::Ident(name) => {
                // Outside its defining body a stream parameter is its cell;
                // the bare target name is only bound as the function
                // parameter. Printing the cell prints its whole history.
                if let Some(func) = self.driver_of.get(name).cloned() {
                    if self.current_fn.as_deref() != Some(func.as_str()) {
                        let cell = self.cell_name(name);
                        let f = self.names.target(&func);
                        return format!("(advanceCell({cell}, Infinity, {f}), {cell})");
                    }
                }
                self.names.target(name)
            }

            Node::FuncCall { name, arg } => {
                if self.current_fn.as_deref() != Some(name.as_str()) {
                    if let Node::Ident(arg_name) = arg.as_ref() {
                        if self.param_of.get(name) == Some(arg_name) {
                            // The value of the sequence at a use site is the
                            // final value over its axis
                            let f = self.names.target(name);
                            let cell = self.cell_name(arg_name);
                            return format!(
                                "(advanceCell({cell}, Infinity, {f}), cellLatest({cell}))"
                            );
                        }
                    }
                }
                let f = self.names.target(name);
                let arg = self.gen_expr(arg);
                format!("{f}({arg})")
            }

            Node::Step { func, param, count } => {
                let cell = self.cell_name(param);
                if self.current_fn.as_deref() == Some(func.as_str()) {
                    // The recurrence's previous value; advancing here would
                    // recurse forever
                    format!("cellLatest({cell})")
                } else {
                    let f = self.names.target(func);
                    format!(
                        "(advanceCell({cell}, {}, {f}), cellLatest({cell}))",
                        js_number(*count)
                    )
                }
            }

            Node::Time { target, count } => {
                if let Node::Ident(name) = target.as_ref() {
                    if let Some(func) = self.driver_of.get(name).cloned() {
                        let cell = self.cell_name(name);
                        let n = self.gen_expr(count);
                        if self.current_fn.as_deref() == Some(func.as_str()) {
                            return format!("{cell}.values.slice(0, {n})");
                        }
                        let f = self.names.target(&func);
                        return format!(
                            "(advanceCell({cell}, Infinity, {f}), {cell}.values.slice(0, {n}))"
                        );
                    }
                }
                let target = self.gen_expr(target);
                let n = self.gen_expr(count);
                format!("{target}.values.slice(0, {n})")
            }

            Node::Input { prompt } => {
                let prompt = self.gen_expr(prompt);
                let var = format!("inputVar__{}", self.input_index);
                self.input_index += 1;
                self.preamble.push(format!("console.log({prompt});"));
                self.preamble
                    .push(format!("const {var} = await rl.question(\"Input: \");"));
                var
            }

            Node::Cond {
                left,
                op,
                right,
                then_branch,
                else_branch,
            } => {
                let l = self.gen_expr(left);
                let r = self.gen_expr(right);
                let t = self.gen_expr(then_branch);
                let e = self.gen_expr(else_branch);
                format!("({l} {} {r} ? {t} : {e})", op.js())
            }

            Node::Bitwise { left, op, right } => {
                let l = self.gen_expr(left);
                let r = self.gen_expr(right);
                format!("({l} {} {r})", op.symbol())
            }

            Node::Shift { left, op, right } => {
                let l = self.gen_expr(left);
                let r = self.gen_expr(right);
                format!("({l} {} {r})", op.symbol())
            }

            Node::Add { left, op, right } => {
                let l = self.gen_expr(left);
                let r = self.gen_expr(right);
                format!("({l} {} {r})", op.symbol())
            }

            Node::Mul { left, op, right } => {
                let l = self.gen_expr(left);
                let r = self.gen_expr(right);
                format!("({l} {} {r})", op.symbol())
            }

            Node::Pow { base, exponent } => {
                let b = self.gen_expr(base);
                let e = self.gen_expr(exponent);
                format!("Math.pow({b}, {e})")
            }

            Node::Unary { op, operand } => {
                let operand = self.gen_expr(operand);
                format!("({}{operand})", op.symbol())
            }

            Node::Expr { first, rest } => {
                if rest.is_empty() {
                    self.gen_expr(first)
                } else {
                    let mut parts = vec![self.gen_expr(first)];
                    parts.extend(rest.iter().map(|e| self.gen_expr(e)));
                    format!("({})", parts.join(", "))
                }
            }

            Node::Slice { exprs } => {
                let parts: Vec<String> = exprs.iter().map(|e| self.gen_expr(e)).collect();
                format!("[{}]", parts.join(", "))
            }

            // Statement forms never appear in value position
            Node::Program { .. }
            | Node::FuncDef { .. }
            | Node::Print { .. }
            | Node::GlobalRange { .. }
            | Node::NumRange { .. }
            | Node::CharRange { .. }
            | Node::Timestep { .. } => String::new(),
        }
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a number the way the target host prints it
fn js_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        format!("{n}")
    }
}

/// Render a string as a quoted, escaped JavaScript literal
fn js_string(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use funktion_core::ast::{AddOp, BitOp, CmpOp, MulOp, UnaryOp};

    fn generate(program: &Node) -> String {
        Generator::new().generate(program)
    }

    #[test]
    fn test_hello_world_prints_once() {
        let program = Node::program(None, vec![Node::print(Node::string("Hello, World!"))]);
        let js = generate(&program);
        assert_eq!(js.matches("funktionPrint(\"Hello, World!\");").count(), 1);
        assert!(js.ends_with("rl.close();"));
    }

    #[test]
    fn test_prelude_comes_first() {
        let js = generate(&Node::program(None, vec![]));
        assert!(js.starts_with("import { createInterface } from \"node:readline/promises\";"));
        assert!(js.contains("const rl = createInterface({ input, output });"));
    }

    #[test]
    fn test_default_axis_when_no_global_range() {
        let js = generate(&Node::program(None, vec![]));
        assert!(js.contains("generateRange(start = 1, end = 5, step = 1, isChar = false)"));
    }

    #[test]
    fn test_global_range_sets_axis_defaults() {
        let program = Node::program(
            Some(Node::global_range(
                Node::num_range(Node::number(5.0), Some(Node::number(1.0))),
                Some(Node::timestep(Node::number(1.0))),
            )),
            vec![],
        );
        let js = generate(&program);
        assert!(js.contains("generateRange(start = 5, end = 1, step = 1, isChar = false)"));
    }

    #[test]
    fn test_open_ended_range_runs_to_infinity() {
        let program = Node::program(
            Some(Node::global_range(
                Node::num_range(Node::number(3.0), None),
                None,
            )),
            vec![],
        );
        let js = generate(&program);
        assert!(js.contains("generateRange(start = 3, end = Infinity, step = 1, isChar = false)"));
    }

    #[test]
    fn test_char_range_uses_char_codes() {
        let program = Node::program(
            Some(Node::global_range(
                Node::char_range(Node::Char('a'), Some(Node::Char('e'))),
                None,
            )),
            vec![],
        );
        let js = generate(&program);
        assert!(js.contains("generateRange(start = 97, end = 101, step = 1, isChar = true)"));
    }

    #[test]
    fn test_factorial_program() {
        // factorial(x) = [x * factorial(x).step()]; print(factorial(x))
        let program = Node::program(
            Some(Node::global_range(
                Node::num_range(Node::number(5.0), Some(Node::number(1.0))),
                None,
            )),
            vec![
                Node::func_def(
                    "factorial",
                    "x",
                    Node::slice(vec![Node::mul(
                        Node::ident("x"),
                        MulOp::Mul,
                        Node::step("factorial", "x", 1.0),
                    )]),
                ),
                Node::print(Node::func_call("factorial", Node::ident("x"))),
            ],
        );
        let js = generate(&program);
        assert!(js.contains("let x_2_cell = initializeCell();"));
        assert!(js
            .contains("function factorial_1(x_2) { return [(x_2 * cellLatest(x_2_cell))]; }"));
        assert!(js.contains(
            "funktionPrint((advanceCell(x_2_cell, Infinity, factorial_1), cellLatest(x_2_cell)));"
        ));
    }

    #[test]
    fn test_step_read_outside_definition_advances_then_reads() {
        let program = Node::program(
            None,
            vec![
                Node::func_def(
                    "f",
                    "x",
                    Node::slice(vec![Node::add(
                        Node::ident("x"),
                        AddOp::Add,
                        Node::number(1.0),
                    )]),
                ),
                Node::print(Node::step("f", "x", 2.0)),
            ],
        );
        let js = generate(&program);
        assert!(js.contains(
            "funktionPrint((advanceCell(x_2_cell, 2, f_1), cellLatest(x_2_cell)));"
        ));
    }

    #[test]
    fn test_step_in_statement_position_only_advances() {
        let program = Node::program(
            None,
            vec![
                Node::func_def(
                    "f",
                    "x",
                    Node::slice(vec![Node::ident("x")]),
                ),
                Node::step("f", "x", 3.0),
            ],
        );
        let js = generate(&program);
        assert!(js.contains("advanceCell(x_2_cell, 3, f_1);"));
        assert!(!js.contains("advanceCell(x_2_cell, 3, f_1), cellLatest"));
    }

    #[test]
    fn test_time_call_reads_history_prefix() {
        let program = Node::program(
            None,
            vec![
                Node::func_def("f", "x", Node::slice(vec![Node::ident("x")])),
                Node::print(Node::time(Node::ident("x"), Node::number(3.0))),
            ],
        );
        let js = generate(&program);
        assert!(js.contains(
            "funktionPrint((advanceCell(x_2_cell, Infinity, f_1), x_2_cell.values.slice(0, 3)));"
        ));
    }

    #[test]
    fn test_print_of_stream_parameter_passes_the_cell() {
        // f(x) = [x]; print(x) must print the cell's whole history; the
        // bare target name is only bound as the function parameter
        let program = Node::program(
            None,
            vec![
                Node::func_def("f", "x", Node::slice(vec![Node::ident("x")])),
                Node::print(Node::ident("x")),
            ],
        );
        let js = generate(&program);
        assert!(js.contains(
            "funktionPrint((advanceCell(x_2_cell, Infinity, f_1), x_2_cell));"
        ));
        assert!(!js.contains("funktionPrint(x_2);"));
    }

    #[test]
    fn test_foreign_stream_parameter_argument_is_its_cell() {
        // g(y) passes f's driven cell when called on f's parameter
        let program = Node::program(
            None,
            vec![
                Node::func_def("f", "x", Node::slice(vec![Node::ident("x")])),
                Node::func_def(
                    "g",
                    "y",
                    Node::slice(vec![Node::add(
                        Node::ident("y"),
                        AddOp::Add,
                        Node::number(1.0),
                    )]),
                ),
                Node::print(Node::func_call("g", Node::ident("x"))),
            ],
        );
        let js = generate(&program);
        assert!(js.contains(
            "funktionPrint(g_3((advanceCell(x_2_cell, Infinity, f_1), x_2_cell)));"
        ));
    }

    #[test]
    fn test_bitwise_and_pow_render() {
        let program = Node::program(
            None,
            vec![
                Node::print(Node::bitwise(Node::number(5.0), BitOp::And, Node::number(3.0))),
                Node::print(Node::pow(Node::number(2.0), Node::number(3.0))),
            ],
        );
        let js = generate(&program);
        assert!(js.contains("funktionPrint((5 & 3));"));
        assert!(js.contains("funktionPrint(Math.pow(2, 3));"));
    }

    #[test]
    fn test_equality_renders_strict() {
        let program = Node::program(
            None,
            vec![Node::print(Node::cond(
                Node::ident("x"),
                CmpOp::Eq,
                Node::number(1.0),
                Node::string("y"),
                Node::string("n"),
            ))],
        );
        let js = generate(&program);
        assert!(js.contains("(x_1 === 1 ? \"y\" : \"n\")"));
    }

    #[test]
    fn test_unary_render() {
        let program = Node::program(
            None,
            vec![Node::print(Node::unary(UnaryOp::BitNot, Node::ident("x")))],
        );
        assert!(generate(&program).contains("funktionPrint((~x_1));"));
    }

    #[test]
    fn test_input_is_hoisted_into_prelude() {
        let program = Node::program(
            None,
            vec![Node::func_def(
                "f",
                "x",
                Node::slice(vec![Node::input(Node::string("Enter a value"))]),
            )],
        );
        let js = generate(&program);
        let hoist = js.find("const inputVar__0 = await rl.question(\"Input: \");");
        let func = js.find("function f_1(x_2) { return [inputVar__0]; }");
        assert!(js.contains("console.log(\"Enter a value\");"));
        match (hoist, func) {
            (Some(h), Some(f)) => assert!(h < f),
            _ => panic!("missing hoisted input or function"),
        }
    }

    #[test]
    fn test_each_input_gets_a_fresh_temporary() {
        let program = Node::program(
            None,
            vec![Node::func_def(
                "f",
                "x",
                Node::slice(vec![Node::add(
                    Node::input(Node::string("a")),
                    AddOp::Add,
                    Node::input(Node::string("b")),
                )]),
            )],
        );
        let js = generate(&program);
        assert!(js.contains("inputVar__0"));
        assert!(js.contains("inputVar__1"));
    }

    #[test]
    fn test_cell_instantiated_once_per_parameter() {
        let program = Node::program(
            None,
            vec![
                Node::func_def("f", "x", Node::slice(vec![Node::ident("x")])),
                Node::func_def("g", "x", Node::slice(vec![Node::ident("x")])),
            ],
        );
        let js = generate(&program);
        assert_eq!(js.matches("_cell = initializeCell();").count(), 1);
    }

    #[test]
    fn test_identifier_numbering_is_first_use_order() {
        let program = Node::program(
            None,
            vec![
                Node::func_def("f", "x", Node::slice(vec![Node::ident("x")])),
                Node::func_def("g", "y", Node::slice(vec![Node::ident("y")])),
            ],
        );
        let js = generate(&program);
        assert!(js.contains("function f_1(x_2)"));
        assert!(js.contains("function g_3(y_4)"));
    }

    #[test]
    fn test_js_number_rendering() {
        assert_eq!(js_number(5.0), "5");
        assert_eq!(js_number(2.5), "2.5");
        assert_eq!(js_number(-3.0), "-3");
        assert_eq!(js_number(f64::INFINITY), "Infinity");
    }

    #[test]
    fn test_js_string_escaping() {
        assert_eq!(js_string("hi"), "\"hi\"");
        assert_eq!(js_string("a\"b"), "\"a\\\"b\"");
        assert_eq!(js_string("line\nbreak"), "\"line\\nbreak\"");
    }
}
