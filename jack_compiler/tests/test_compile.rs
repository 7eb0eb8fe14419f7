use jack_compiler::{
    compile::{render, VmCommand},
    compile_str, compile_vm,
};
use pretty_assertions::assert_eq;
use std::collections::HashSet;

const MAIN: &str = include_str!("Main.jack");
const SQUARE: &str = include_str!("Square.jack");
const CALLS: &str = include_str!("Calls.jack");
const SCOPES: &str = include_str!("Scopes.jack");

fn lines(source: &str) -> Vec<String> {
    compile_vm(source)
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Instructions of the named function, header included.
fn function(code: &[String], name: &str) -> Vec<String> {
    let header = format!("function {name} ");
    code.iter()
        .skip_while(|line| !line.starts_with(&header))
        .enumerate()
        .take_while(|(i, line)| *i == 0 || !line.starts_with("function "))
        .map(|(_, line)| line.clone())
        .collect()
}

/// Every statement leaves the stack as it found it, and every
/// `return` finds exactly one value to hand back.
fn assert_balanced(code: &[VmCommand]) {
    let mut depth = 0;
    for command in code {
        match command {
            VmCommand::Function { name, .. } => {
                assert_eq!(depth, 0, "unbalanced function before {name}");
            }
            VmCommand::Return => {
                assert_eq!(depth, 1, "return without exactly one value");
                depth = 0;
            }
            _ => {
                depth += command.stack_effect();
                assert!(depth >= 0, "stack underflow at {command}");
            }
        }
    }
    assert_eq!(depth, 0);
}

#[test]
fn test_main_end_to_end() {
    let unit = compile_str(MAIN).unwrap();

    assert_eq!(unit.class_name, "Main");
    assert_eq!(
        unit.vm,
        "function Main.main 0\n\
         push constant 1\n\
         push constant 2\n\
         add\n\
         call Output.printInt 1\n\
         pop temp 0\n\
         push constant 0\n\
         return\n"
    );
}

#[test]
fn test_compile_vm_matches_rendered_stream() {
    let code = compile_vm(SQUARE).unwrap();
    assert_eq!(render(&code), compile_str(SQUARE).unwrap().vm);
}

#[test]
fn test_constructor() {
    let code = lines(SQUARE);
    assert_eq!(
        function(&code, "Square.new"),
        vec![
            "function Square.new 0",
            // Three fields; the two statics do not count.
            "push constant 3",
            "call Memory.alloc 1",
            "pop pointer 0",
            "push argument 0",
            "pop this 0",
            "push argument 1",
            "pop this 1",
            "push argument 2",
            "pop this 2",
            "push static 0",
            "push constant 1",
            "add",
            "pop static 0",
            "push pointer 0",
            "call Square.draw 1",
            "pop temp 0",
            "push pointer 0",
            "return",
        ]
    );
}

#[test]
fn test_stack_balance_of_class() {
    assert_balanced(&compile_vm(SQUARE).unwrap());
    assert_balanced(&compile_vm(CALLS).unwrap());
    assert_balanced(&compile_vm(SCOPES).unwrap());
}

#[test]
fn test_stack_balance_per_statement() {
    let statements = [
        "let a = 1;",
        "let arr[a + 1] = arr[b] + s;",
        "if (a < b) { let a = b; } else { do t.run(a); }",
        "if (true) { let b = -a; }",
        "while (~(a = 10)) { let a = a + 1; }",
        "do run(-a);",
        "do Math.max(a, b * 2);",
        "let s = \"ok\";",
        "let t = T.new(null);",
    ];

    for stmt in statements.iter() {
        let source = format!(
            "class T {{ field Array arr; static int s; \
             method void run(int p) {{ var int a, b; var T t; {stmt} return; }} }}"
        );
        let code = compile_vm(&source).unwrap();

        // Strip the header with receiver binding, and the trailing return.
        let body = &code[3..code.len() - 2];
        let mut depth = 0;
        for command in body {
            depth += command.stack_effect();
            assert!(depth >= 0, "stack underflow in `{stmt}`");
        }
        assert_eq!(depth, 0, "unbalanced `{stmt}`");
    }
}

#[test]
fn test_return_leaves_one_value() {
    let code = compile_vm("class R { method int get(int p) { return p + 1; } }").unwrap();
    let end = code.iter().position(|c| *c == VmCommand::Return).unwrap();
    let depth: i32 = code[3..end].iter().map(VmCommand::stack_effect).sum();
    assert_eq!(depth, 1);
}

#[test]
fn test_labels_unique_across_subroutines() {
    let code = lines(SQUARE);
    let labels: Vec<&String> = code.iter().filter(|line| line.starts_with("label ")).collect();

    let unique: HashSet<&&String> = labels.iter().collect();
    assert_eq!(unique.len(), labels.len());

    let grow = function(&code, "Square.grow");
    assert!(grow.contains(&"label WHILE_EXP0".to_string()));
    assert!(grow.contains(&"label IF_TRUE0".to_string()));

    // Counters continue in the next subroutine instead of restarting.
    let area = function(&code, "Square.area");
    assert!(area.contains(&"label IF_TRUE1".to_string()));
    assert!(area.contains(&"label WHILE_EXP1".to_string()));
    assert!(!area.contains(&"label IF_TRUE0".to_string()));
}

#[test]
fn test_if_else() {
    let code = lines("class I { function int f(int a) { if (a) { return 1; } else { return 2; } return 0; } }");
    assert_eq!(
        code,
        vec![
            "function I.f 0",
            "push argument 0",
            "if-goto IF_TRUE0",
            "goto IF_FALSE0",
            "label IF_TRUE0",
            "push constant 1",
            "return",
            "goto IF_END0",
            "label IF_FALSE0",
            "push constant 2",
            "return",
            "label IF_END0",
            "push constant 0",
            "return",
        ]
    );
}

#[test]
fn test_while() {
    let code = lines("class W { function void f() { var int i; while (i < 3) { let i = i + 1; } return; } }");
    assert_eq!(
        code,
        vec![
            "function W.f 1",
            "label WHILE_EXP0",
            "push local 0",
            "push constant 3",
            "lt",
            "not",
            "if-goto WHILE_END0",
            "push local 0",
            "push constant 1",
            "add",
            "pop local 0",
            "goto WHILE_EXP0",
            "label WHILE_END0",
            "push constant 0",
            "return",
        ]
    );
}

#[test]
fn test_left_to_right_evaluation() {
    let code = lines("class E { function int f(int a, int b, int c) { return a - b - c; } }");
    assert_eq!(
        code,
        vec![
            "function E.f 0",
            "push argument 0",
            "push argument 1",
            "sub",
            "push argument 2",
            "sub",
            "return",
        ]
    );

    // No precedence: (2 + 3) * 4
    let code = lines("class E { function int g() { return 2 + 3 * 4; } }");
    assert_eq!(
        &code[1..],
        &[
            "push constant 2",
            "push constant 3",
            "add",
            "push constant 4",
            "call Math.multiply 2",
            "return",
        ]
    );
}

#[test]
fn test_comparison_and_logic_operators() {
    let code = lines(
        "class L { function boolean f(int a, int b, boolean c, boolean d) { \
         if (~(a = b)) { return a > b & c | d; } return false; } }",
    );
    assert_eq!(
        &code[1..5],
        &["push argument 0", "push argument 1", "eq", "not"]
    );

    let start = code.iter().position(|line| line == "label IF_TRUE0").unwrap();
    assert_eq!(
        &code[start + 1..start + 9],
        &[
            "push argument 0",
            "push argument 1",
            "gt",
            "push argument 2",
            "and",
            "push argument 3",
            "or",
            "return",
        ]
    );
}

#[test]
fn test_bare_return_in_value_subroutine() {
    let code = lines("class B { function int f() { return; } }");
    assert_eq!(code, vec!["function B.f 0", "push constant 0", "return"]);
}

#[test]
fn test_array_assignment_order() {
    let code = lines("class A { function void f(Array a, int i, int v) { let a[i] = v; return; } }");
    assert_eq!(
        code,
        vec![
            "function A.f 0",
            "push argument 0",
            "push argument 1",
            "add",
            "push argument 2",
            "pop temp 0",
            "pop pointer 1",
            "push temp 0",
            "pop that 0",
            "push constant 0",
            "return",
        ]
    );
}

#[test]
fn test_implicit_receiver_counting() {
    let code = lines(CALLS);
    assert_eq!(
        function(&code, "Calls.run"),
        vec![
            "function Calls.run 0",
            "push argument 0",
            "pop pointer 0",
            // foo(1, 2) on the current object
            "push pointer 0",
            "push constant 1",
            "push constant 2",
            "call Calls.foo 3",
            "pop temp 0",
            // SomeClass is not a variable
            "push constant 1",
            "call SomeClass.bar 1",
            "pop temp 0",
            // next is a field typed Calls
            "push this 0",
            "push constant 3",
            "push constant 4",
            "call Calls.foo 3",
            "pop temp 0",
            "push constant 0",
            "return",
        ]
    );
}

#[test]
fn test_scope_reset() {
    let code = lines(SCOPES);
    assert_eq!(
        function(&code, "Scopes.first"),
        vec![
            "function Scopes.first 2",
            "push local 1",
            "call Line.draw 1",
            "pop temp 0",
            "push constant 0",
            "return",
        ]
    );
    assert_eq!(
        function(&code, "Scopes.second"),
        vec![
            "function Scopes.second 1",
            "push local 0",
            "call Point.draw 1",
            "pop temp 0",
            "push constant 0",
            "return",
        ]
    );
}

#[test]
fn test_string_and_negation() {
    let code = lines(SQUARE);
    let describe = function(&code, "Square.describe");
    assert_eq!(&describe[1..3], &["push constant 9", "call String.new 1"]);
    assert_eq!(&describe[3..5], &["push constant 83", "call String.appendChar 2"]);

    let area = function(&code, "Square.area");
    assert!(area
        .windows(3)
        .any(|w| w == ["push constant 1", "neg", "return"]));
}
