#[macro_use]
mod common;

#[cfg(test)]
mod _return {
    tests! {
        in_function in return is OK
        "before"
        "ok"
    }

    tests! {
        in_method in return is OK
        "before"
        "ok"
    }

    tests! {
        return_nil_if_no_value in return is OK
        "nil"
    }

    tests! {
        at_top_level in return is ERR
        "[line 1] Error at 'return': Can't return from top-level code."
    }
}
