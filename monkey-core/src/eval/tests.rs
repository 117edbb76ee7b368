use std::{cell::RefCell, rc::Rc};

use crate::{
    environment::prelude::{Environment, Value},
    parser::prelude::parse_module,
};

use super::eval;

fn run(input: &str) -> Value {
    let program = parse_module(input).expect("input must parse");
    let env = Rc::new(RefCell::new(Environment::new()));

    eval(&program, env)
}

fn assert_integer(input: &str, expected: i64) {
    assert_eq!(
        run(input),
        Value::Integer { value: expected },
        "for input {input:?}"
    );
}

fn assert_boolean(input: &str, expected: bool) {
    assert_eq!(
        run(input),
        Value::Boolean { value: expected },
        "for input {input:?}"
    );
}

fn assert_error(input: &str, message: &str) {
    assert_eq!(
        run(input),
        Value::Error { message: message.to_string() },
        "for input {input:?}"
    );
}

#[test]
fn test_integer_expressions() {
    let tests = vec![
        ("7", 7),
        ("777", 777),
        ("-5", -5),
        ("--7", 7),
        ("-50 + 100 + -50", 0),
        ("5 + 5 + 5 + 5 - 10", 10),
        ("2 * 2 * 2 * 2 * 2", 32),
        ("50 / 2 * 2 + 10", 60),
        ("20 + 2 * -10", 0),
        ("3 * (3 * 3) + 10", 37),
        ("(5 + 10 * 2 + 15 / 3) * 2 + -10", 50),
    ];

    for (input, expected) in tests {
        assert_integer(input, expected);
    }
}

#[test]
fn test_boolean_expressions() {
    let tests = vec![
        ("true", true),
        ("false", false),
        ("1 < 2", true),
        ("1 > 2", false),
        ("1 == 1", true),
        ("1 != 1", false),
        ("1 == 2", false),
        ("1 != 2", true),
        ("true == true", true),
        ("false == false", true),
        ("true == false", false),
        ("true != false", true),
        ("(1 < 2) == true", true),
        ("(1 > 2) == false", true),
    ];

    for (input, expected) in tests {
        assert_boolean(input, expected);
    }
}

#[test]
fn test_bang_operator() {
    let tests = vec![
        ("!true", false),
        ("!false", true),
        ("!!true", true),
        ("!!false", false),
        ("!7", false),
        ("!!7", true),
        ("!0", true),
    ];

    for (input, expected) in tests {
        assert_boolean(input, expected);
    }
}

// Booleans and null coerce through the integer conversion under the
// arithmetic operators; only boolean operands are rejected, and only by
// the binary ones.
#[test]
fn test_integer_coercion() {
    let tests = vec![
        ("-true", -1),
        ("-false", 0),
        ("5 + if (false) { 5 }", 5),
        ("if (false) { 5 } + if (false) { 5 }", 0),
    ];

    for (input, expected) in tests {
        assert_integer(input, expected);
    }

    assert_boolean("if (false) { 1 } < 1", true);
}

#[test]
fn test_conditionals() {
    let tests = vec![
        ("if (true) { 10 }", Value::Integer { value: 10 }),
        ("if (false) { 10 }", Value::Null),
        ("if (1) { 10 }", Value::Integer { value: 10 }),
        ("if (0) { 10 }", Value::Null),
        ("if (1 < 2) { 10 }", Value::Integer { value: 10 }),
        ("if (1 > 2) { 10 }", Value::Null),
        ("if (1 > 2) { 10 } else { 20 }", Value::Integer { value: 20 }),
        ("if (1 < 2) { 10 } else { 20 }", Value::Integer { value: 10 }),
        ("if (1 > 2) { 10 } else { true }", Value::Boolean { value: true }),
        ("if (true) {}", Value::Null),
    ];

    for (input, expected) in tests {
        assert_eq!(run(input), expected, "for input {input:?}");
    }
}

#[test]
fn test_return_statements() {
    let tests = vec![
        ("return 10;", 10),
        ("return 10; 9;", 10),
        ("return 2 * 5; 9;", 10),
        ("9; return 2 * 5; 9;", 10),
        ("if (true) { if (true) { return 10; } return 1; }", 10),
        ("if (false) { if (true) { return 10; } return 1; } 25", 25),
    ];

    for (input, expected) in tests {
        assert_integer(input, expected);
    }
}

#[test]
fn test_let_statements() {
    let tests = vec![
        ("let a = 5; a;", 5),
        ("let a = 5 * 5; a;", 25),
        ("let a = 5; let b = a; b;", 5),
        ("let a = 5; let b = a; let c = a + b + 5; c;", 15),
        // a let binding evaluates to the bound value
        ("let a = 5;", 5),
        ("let a = 5; let a = a + 1; a;", 6),
    ];

    for (input, expected) in tests {
        assert_integer(input, expected);
    }
}

#[test]
fn test_function_values() {
    let value = run("fn(x) { x + 2; }");

    match &value {
        Value::Function { params, body, .. } => {
            assert_eq!(params, &vec!["x".to_string()]);
            assert_eq!(body.to_string(), "{(x + 2);}");
        }
        value => panic!("expected function value, got {value:?}"),
    }

    assert_eq!(value.to_string(), "fn (x) {(x + 2);}");
}

#[test]
fn test_function_application() {
    let tests = vec![
        ("let identity = fn(x) { x; }; identity(5);", 5),
        ("let identity = fn(x) { return x; }; identity(5);", 5),
        ("let double = fn(x) { x * 2; }; double(5);", 10),
        ("let add = fn(x, y) { x + y; }; add(5, 5);", 10),
        ("let add = fn(x, y) { x + y; }; add(5 + 5, add(5, 5));", 20),
        ("fn(x) { x; }(5)", 5),
    ];

    for (input, expected) in tests {
        assert_integer(input, expected);
    }
}

#[test]
fn test_closures() {
    let input = r#"
        let newAdder = fn(x) { fn(y) { x + y } };
        let addTwo = newAdder(2);
        addTwo(3);
    "#;

    assert_integer(input, 5);
}

// A closure reads the environment it was defined in, not the one in
// force at the call site.
#[test]
fn test_closure_capture() {
    let input = r#"
        let a = 10;
        let f = fn() { a };
        let g = fn(a) { f() };
        g(1);
    "#;

    assert_integer(input, 10);

    let input = r#"
        let newClosure = fn(a) { fn() { a } };
        let closure = newClosure(99);
        closure();
    "#;

    assert_integer(input, 99);
}

#[test]
fn test_parameter_shadowing() {
    let input = r#"
        let x = 5;
        let f = fn(x) { x * 2 };
        f(1) + x;
    "#;

    assert_integer(input, 7);
}

#[test]
fn test_recursion() {
    let input = r#"
        let fact = fn(n) {
            if (n < 2) { return 1; }
            n * fact(n - 1)
        };
        fact(5);
    "#;

    assert_integer(input, 120);

    let input = r#"
        let fib = fn(n) {
            if (n < 2) { return n; }
            fib(n - 1) + fib(n - 2)
        };
        fib(10);
    "#;

    assert_integer(input, 55);
}

#[test]
fn test_errors() {
    let tests = vec![
        ("foo", "unknown identifier: foo"),
        ("foo + 5", "unknown identifier: foo"),
        ("true + 5", "first operand of + cannot be boolean"),
        ("5 + true", "second operand of + cannot be boolean"),
        ("true + false", "first operand of + cannot be boolean"),
        ("true < false", "first operand of < cannot be boolean"),
        ("5 > true", "second operand of > cannot be boolean"),
        ("5 - true * 2", "first operand of * cannot be boolean"),
        ("5 == true", "cannot do == of different types"),
        ("true != 5", "cannot do != of different types"),
        ("3 * (3 == true)", "cannot do == of different types"),
        ("if (false) { 1 } == 1", "cannot do == of different types"),
        ("5 / 0", "divide by zero"),
        ("if (10 > 1) { true + 5; }", "first operand of + cannot be boolean"),
        ("5(3)", "non callable object is used: 5"),
        ("let x = 5; x(1)", "non callable object is used: 5"),
        ("true(1)", "non callable object is used: true"),
        ("-fn(x) { x }", "unhandled type for integer conversion"),
        ("!fn(x) { x }", "unhandled type for bool conversion"),
        ("if (fn(x) { x }) { 1 }", "unhandled type for bool conversion"),
        ("fn(x) { x } + 1", "unhandled type for integer conversion"),
    ];

    for (input, expected) in tests {
        assert_error(input, expected);
    }
}

#[test]
fn test_arity_mismatch() {
    let tests = vec![
        (
            "let add = fn(x, y) { x + y }; add(1)",
            "wrong number of arguments for fn (x, y): expected 2, got 1",
        ),
        (
            "fn() { 1 }(2)",
            "wrong number of arguments for fn (): expected 0, got 1",
        ),
    ];

    for (input, expected) in tests {
        assert_error(input, expected);
    }
}

// An error halts the statement sequence the way a return does.
#[test]
fn test_error_halts_evaluation() {
    let tests = vec![
        ("5; true + 5; 10;", "first operand of + cannot be boolean"),
        ("let a = true + 1; a;", "first operand of + cannot be boolean"),
        ("return foo; 5;", "unknown identifier: foo"),
    ];

    for (input, expected) in tests {
        assert_error(input, expected);
    }
}

#[test]
fn test_error_propagates_through_calls() {
    let input = r#"
        let explode = fn() { missing };
        let wrap = fn() { explode() };
        wrap();
    "#;

    assert_error(input, "unknown identifier: missing");

    assert_error(
        "let f = fn(x) { x }; f(missing)",
        "unknown identifier: missing",
    );
}

#[test]
fn test_inspect() {
    let tests = vec![
        ("5", "5"),
        ("true", "true"),
        ("if (false) { 1 }", "null"),
        ("foo", r#"ERROR("unknown identifier: foo")"#),
        ("fn(x, y) { x + y; }", "fn (x, y) {(x + y);}"),
    ];

    for (input, expected) in tests {
        assert_eq!(run(input).to_string(), expected, "for input {input:?}");
    }
}

// Re-parsing a pretty-printed program evaluates to the same result.
#[test]
fn test_pretty_print_round_trip() {
    let inputs = vec![
        "-50 + 100 + -50",
        "(5 + 10 * 2 + 15 / 3) * 2 + -10",
        "3 + 4 * 5 == 3 * 1 + 4 * 5",
        "let a = 5; let b = a; let c = a + b + 5; c;",
    ];

    for input in inputs {
        let program = parse_module(input).expect("input must parse");
        let reprinted = program.to_string();

        assert_eq!(
            run(input),
            run(&reprinted),
            "for input {input:?} reprinted as {reprinted:?}"
        );
    }
}
