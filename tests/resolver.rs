mod common;

#[test]
fn a_top_level_return_is_illegal() {
    common::run_static_error("a_top_level_return_is_illegal", "ret 1;", "[line 1] Error : Illegal return statement");
}

#[test]
fn returning_a_value_from_init_is_illegal() {
    common::run_static_error(
        "returning_a_value_from_init_is_illegal",
        "class Foo { func init() { ret 1; } }",
        "Cannot return a value from an initializer",
    );
}

#[test]
fn this_outside_a_class_is_illegal() {
    common::run_static_error("this_outside_a_class_is_illegal", "print(this);", "Cannot use 'this' outside of a class");
}

#[test]
fn reading_a_local_variable_in_its_own_initializer_is_illegal() {
    common::run_static_error(
        "reading_a_local_variable_in_its_own_initializer_is_illegal",
        "{ let x = x; }",
        "Cannot read local variable in its own initializer",
    );
}

#[test]
fn redeclaring_a_name_in_the_same_scope_is_illegal() {
    common::run_static_error(
        "redeclaring_a_name_in_the_same_scope_is_illegal",
        "{ let x = 1; let x = 2; }",
        "Identifier 'x' has already been declared",
    );
}

#[test]
fn shadowing_across_nested_scopes_is_legal() {
    common::run_ok(
        "shadowing_across_nested_scopes_is_legal",
        r#"
            let x = "outer";
            {
                let x = "inner";
                print(x);
            }
            print(x);
        "#,
        "inner\nouter\n",
    );
}
