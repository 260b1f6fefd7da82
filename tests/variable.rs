mod common;

#[test]
fn block_scoped_variables_do_not_leak_out() {
    common::run_runtime_error(
        "block_scoped_variables_do_not_leak_out",
        r#"
            { let x = 1; }
            print(x);
        "#,
        "Undefined variable 'x'",
    );
}

#[test]
fn an_uninitialized_variable_is_nil() {
    common::run_ok("an_uninitialized_variable_is_nil", "let x; print(x);", "nil\n");
}

#[test]
fn assignment_returns_the_assigned_value() {
    common::run_ok("assignment_returns_the_assigned_value", "let x = 1; print(x = 2);", "2\n");
}

#[test]
fn while_loops_run_until_the_condition_is_falsy() {
    // `i` is scoped inside `run`'s body so its assignment resolves to a
    // local slot; a bare top-level `let i` would be an unresolved global,
    // whose assignment is a no-op (see the assign-expr design note).
    common::run_ok(
        "while_loops_run_until_the_condition_is_falsy",
        r#"
            func run() {
                let i = 0;
                while (i < 3) {
                    print(i);
                    i = i + 1;
                }
            }
            run();
        "#,
        "0\n1\n2\n",
    );
}

#[test]
fn assigning_to_an_unresolved_global_does_not_persist() {
    // Matches the original implementation's `visitAssignExpr`: an
    // assignment the resolver never bound has no effect on the
    // environment even though the expression still yields its value.
    common::run_ok(
        "assigning_to_an_unresolved_global_does_not_persist",
        r#"
            let x = 1;
            print(x = 2);
            print(x);
        "#,
        "2\n1\n",
    );
}
