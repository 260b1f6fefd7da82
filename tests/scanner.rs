mod common;

#[test]
fn an_unterminated_string_is_a_lex_error() {
    common::run_static_error("an_unterminated_string_is_a_lex_error", "print(\"unterminated);", "Error");
}

#[test]
fn an_unrecognized_character_is_a_lex_error() {
    common::run_static_error("an_unrecognized_character_is_a_lex_error", "let x = 1 @ 2;", "Error");
}

#[test]
fn numbers_print_without_a_trailing_zero() {
    common::run_ok("numbers_print_without_a_trailing_zero", "print(1.5); print(2 + 2);", "1.5\n4\n");
}

#[test]
fn typeof_is_a_reserved_word_not_an_identifier() {
    common::run_static_error("typeof_is_a_reserved_word_not_an_identifier", "let typeof = 1;", "Error");
}
