#[macro_use]
mod common;

#[cfg(test)]
mod class {
    tests! {
        empty in class is OK
        "Foo"
    }

    tests! {
        reference_self in class is OK
        "Foo"
    }

    tests! {
        local_reference_self in class is OK
        "Foo"
    }
}
