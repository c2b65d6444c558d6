use assert_cmd::Command;

/// `tokenize`'s literal column and type column follow a different
/// convention than the interpreter's own print stringification: a whole
/// number always shows a decimal place (`123.0`, not `123`), and every
/// token type name is the canonical upper-snake-case form, not Rust's
/// enum-variant spelling.
#[test]
fn whole_number_literal_gets_a_decimal_point_and_canonical_type_names() {
    Command::cargo_bin("tlox")
        .unwrap()
        .arg("tokenize")
        .arg("tests/fixtures/tokenize/whole_number.lox")
        .assert()
        .stdout(
            "NUMBER 123 123.0\n\
             SEMICOLON ; null\n\
             NUMBER 45.67 45.67\n\
             BANG_EQUAL != null\n\
             STRING \"hi\" hi\n\
             SEMICOLON ; null\n\
             EOF  null\n",
        )
        .success();
}
