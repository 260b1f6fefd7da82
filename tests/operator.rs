mod common;

#[test]
fn arithmetic_and_precedence() {
    common::run_ok("arithmetic_and_precedence", "print(1 + 2 * 3);", "7\n");
}

#[test]
fn string_concatenation() {
    common::run_ok("string_concatenation", r#"print("foo" + "bar");"#, "foobar\n");
}

#[test]
fn comparison_chains() {
    common::run_ok(
        "comparison_chains",
        "print(1 < 2); print(2 <= 2); print(3 > 4); print(4 >= 4);",
        "true\ntrue\nfalse\ntrue\n",
    );
}

#[test]
fn equality_across_types_is_never_an_error() {
    common::run_ok(
        "equality_across_types_is_never_an_error",
        r#"print(1 == "1"); print(nil == false); print(1 == 1);"#,
        "false\nfalse\ntrue\n",
    );
}

#[test]
fn dividing_by_zero_is_a_runtime_error() {
    common::run_runtime_error("dividing_by_zero_is_a_runtime_error", "print(1 / 0);", "Division by zero");
}

#[test]
fn adding_a_number_to_a_string_is_a_runtime_error() {
    common::run_runtime_error(
        "adding_a_number_to_a_string_is_a_runtime_error",
        r#"print(1 + "a");"#,
        "Operands must be two numbers or two strings",
    );
}

#[test]
fn negating_a_non_number_is_a_runtime_error() {
    common::run_runtime_error("negating_a_non_number_is_a_runtime_error", r#"print(-"a");"#, "Operand must be a number");
}

#[test]
fn comma_expressions_evaluate_all_and_return_the_last() {
    common::run_ok(
        "comma_expressions_evaluate_all_and_return_the_last",
        "print((1, 2, 3));",
        "3\n",
    );
}
