#[macro_use]
mod common;

#[cfg(test)]
mod assignment {
    tests! {
        basic in assignment is OK
        "2"
    }

    tests! {
        chained in assignment is OK
        "3"
        "3"
        "3"
    }

    tests! {
        is_expression in assignment is OK
        "2"
    }

    tests! {
        undefined in assignment is ERR
        "Undefined variable 'a'."
        "[line 1]"
    }

    tests! {
        invalid_target in assignment is ERR
        "[line 3] Error at '=': Invalid assignment target."
    }
}
