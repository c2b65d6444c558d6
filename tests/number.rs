#[macro_use]
mod common;

#[cfg(test)]
mod number {
    tests! {
        literals in number is OK
        "123"
        "0"
        "123.456"
        "-0.001"
    }

    tests! {
        nan_equality in number is OK
        "true"
        "false"
    }

    tests! {
        leading_dot in number is ERR
        "[line 1] Error at '.': Expect expression."
    }
}
