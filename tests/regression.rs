#[macro_use]
mod common;

#[cfg(test)]
mod regression {
    tests! {
        print_function_and_class in regression is OK
        "<fn f>"
        "B"
    }

    tests! {
        nested_function_return in regression is OK
        "inner outer"
    }
}
