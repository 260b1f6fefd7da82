mod common;

#[test]
fn fields_and_init() {
    common::run_ok(
        "fields_and_init",
        r#"
            class Point {
                let x = 0;
                let y = 0;
                func init(a, b) { this.x = a; this.y = b; }
                func sum() { ret this.x + this.y; }
            }
            print(Point(3,4).sum());
        "#,
        "7\n",
    );
}

#[test]
fn stringifies_as_class_and_instance() {
    common::run_ok(
        "stringifies_as_class_and_instance",
        r#"
            class Foo {}
            print(Foo);
            print(Foo());
        "#,
        "<class 'Foo'>\n<'Foo' instance>\n",
    );
}

#[test]
fn bare_init_return_yields_this() {
    common::run_ok(
        "bare_init_return_yields_this",
        r#"
            class Box {
                let value = 0;
                func init(v) { this.value = v; ret; }
            }
            print(Box(9).value);
        "#,
        "9\n",
    );
}

#[test]
fn accessing_an_undeclared_field_is_a_runtime_error() {
    common::run_runtime_error(
        "accessing_an_undeclared_field_is_a_runtime_error",
        r#"
            class Empty {}
            print(Empty().missing);
        "#,
        "Empty object has not property 'missing'",
    );
}

#[test]
fn setting_an_undeclared_field_is_a_runtime_error() {
    common::run_runtime_error(
        "setting_an_undeclared_field_is_a_runtime_error",
        r#"
            class Empty {}
            let e = Empty();
            e.missing = 1;
        "#,
        "Empty object has not property 'missing'",
    );
}

#[test]
fn a_class_cannot_inherit_from_itself() {
    common::run_static_error(
        "a_class_cannot_inherit_from_itself",
        "class Foo extends Foo {}",
        "A class cannot inherit from itself",
    );
}
