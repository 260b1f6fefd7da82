mod common;

#[test]
fn desugars_into_a_while_loop() {
    common::run_ok(
        "desugars_into_a_while_loop",
        "for (let i = 0; i < 3; i = i + 1) print(i);",
        "0\n1\n2\n",
    );
}

#[test]
fn body_can_be_a_block() {
    common::run_ok(
        "body_can_be_a_block",
        r#"
            let total = 0;
            for (let i = 1; i <= 5; i = i + 1) {
                total = total + i;
            }
            print(total);
        "#,
        "15\n",
    );
}

#[test]
fn omitted_clauses_are_legal() {
    common::run_ok(
        "omitted_clauses_are_legal",
        r#"
            func run() {
                let i = 0;
                for (;;) {
                    if (i >= 3) ret;
                    print(i);
                    i = i + 1;
                }
            }
            run();
        "#,
        "0\n1\n2\n",
    );
}
