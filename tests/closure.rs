mod common;

#[test]
fn remembers_its_defining_environment() {
    common::run_ok(
        "remembers_its_defining_environment",
        r#"
            func make(n) { func inner() { ret n; } ret inner; }
            let a = make(1); let b = make(2);
            print(a()); print(b());
        "#,
        "1\n2\n",
    );
}

#[test]
fn shares_mutable_state_across_calls() {
    common::run_ok(
        "shares_mutable_state_across_calls",
        r#"
            func makeCounter() {
                let count = 0;
                func increment() { count = count + 1; print(count); }
                ret increment;
            }
            let counter = makeCounter();
            counter();
            counter();
            counter();
        "#,
        "1\n2\n3\n",
    );
}

#[test]
fn each_call_to_the_outer_function_gets_its_own_environment() {
    common::run_ok(
        "each_call_to_the_outer_function_gets_its_own_environment",
        r#"
            func makeCounter() {
                let count = 0;
                func increment() { count = count + 1; print(count); }
                ret increment;
            }
            let a = makeCounter();
            let b = makeCounter();
            a();
            a();
            b();
        "#,
        "1\n2\n1\n",
    );
}
