#[macro_use]
mod common;

#[cfg(test)]
mod inheritance {
    tests! {
        constructor in inheritance is OK
        "value"
    }

    tests! {
        inherit_methods in inheritance is OK
        "foo"
        "override bar"
    }

    tests! {
        inherit_from_function in inheritance is ERR
        "Superclass must be a class."
        "[line 3]"
    }

    tests! {
        inherit_from_self in inheritance is ERR
        "[line 1] Error at 'Foo': A class can't inherit from itself."
    }
}
