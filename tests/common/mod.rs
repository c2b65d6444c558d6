/// Drives the built `tlox` binary's `interpret` subcommand against a fixture
/// under `tests/fixtures/<scope>/<file>.lox`, asserting the exact stdout (for
/// programs expected to run clean) or stderr (for programs expected to fail)
/// the interpreter produces for it.
#[macro_export]
macro_rules! tests {
    ($file:ident in $scope:ident is OK $($expected:expr)*) => {
        #[test]
        fn $file() {
            use assert_cmd::Command;

            let mut expected = vec![$($expected),*];
            let expected = match expected.len() {
                0 => "".to_string(),
                _ => {
                    expected.push("");
                    expected.join("\n")
                }
            };

            let path = format!("tests/fixtures/{}/{}.lox", stringify!($scope), stringify!($file));

            Command::cargo_bin("tlox").unwrap()
                .arg("interpret")
                .arg(path)
                .assert()
                .stdout(expected)
                .success();
        }
    };

    ($file:ident in $scope:ident is ERR $($expected:expr)+) => {
        #[test]
        fn $file() {
            use assert_cmd::Command;

            let output = vec![$($expected),+].join("\n");
            let path = format!("tests/fixtures/{}/{}.lox", stringify!($scope), stringify!($file));

            Command::cargo_bin("tlox").unwrap()
                .arg("interpret")
                .arg(path)
                .assert()
                .stderr(format!("{output}\n"))
                .failure();
        }
    };
}
