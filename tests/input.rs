use assert_cmd::Command;
use std::fs;

#[test]
fn reads_one_whitespace_delimited_word_from_stdin() {
    let mut path = std::env::temp_dir();
    path.push(format!("nex_test_input_{}.nex", std::process::id()));
    fs::write(&path, "print(input());").unwrap();

    Command::cargo_bin("nex")
        .unwrap()
        .arg(&path)
        .write_stdin("hello world\n")
        .assert()
        .success()
        .stdout("hello\n");

    let _ = fs::remove_file(path);
}

#[test]
fn reads_a_non_ascii_word_without_corrupting_it() {
    let mut path = std::env::temp_dir();
    path.push(format!("nex_test_input_utf8_{}.nex", std::process::id()));
    fs::write(&path, "print(input());").unwrap();

    Command::cargo_bin("nex")
        .unwrap()
        .arg(&path)
        .write_stdin("café résumé\n")
        .assert()
        .success()
        .stdout("café\n");

    let _ = fs::remove_file(path);
}
