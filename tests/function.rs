mod common;

#[test]
fn recursion() {
    common::run_ok(
        "recursion",
        r#"
            func fib(n) {
                if (n < 2) ret n;
                ret fib(n - 1) + fib(n - 2);
            }
            print(fib(10));
        "#,
        "55\n",
    );
}

#[test]
fn a_function_with_no_explicit_return_yields_nil() {
    common::run_ok(
        "a_function_with_no_explicit_return_yields_nil",
        r#"
            func noop() {}
            print(noop());
        "#,
        "nil\n",
    );
}

#[test]
fn functions_stringify_with_their_name() {
    common::run_ok(
        "functions_stringify_with_their_name",
        "func greet() {} print(greet);",
        "<func 'greet'>\n",
    );
}

#[test]
fn up_to_255_parameters_are_accepted() {
    let params: Vec<String> = (0..255).map(|i| format!("p{i}")).collect();
    let args: Vec<String> = (0..255).map(|i| i.to_string()).collect();
    let source = format!(
        "func sum({}) {{ ret p0; }} print(sum({}));",
        params.join(", "),
        args.join(", ")
    );
    common::run_ok("up_to_255_parameters_are_accepted", &source, "0\n");
}
