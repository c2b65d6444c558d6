#[macro_use]
mod common;

#[cfg(test)]
mod field {
    tests! {
        call_function_field in field is OK
        "called argument"
    }

    tests! {
        method in field is OK
        "Crunch crunch crunch!"
    }

    tests! {
        method_binds_this in field is OK
        "Jane"
    }

    tests! {
        get_on_bool in field is ERR
        "Only instances have properties."
        "[line 1]"
    }

    tests! {
        set_on_bool in field is ERR
        "Only instances have fields."
        "[line 1]"
    }

    tests! {
        undefined in field is ERR
        "Undefined property 'bar'."
        "[line 3]"
    }
}
