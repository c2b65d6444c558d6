#[macro_use]
mod common;

#[cfg(test)]
mod _for {
    tests! {
        basic in for is OK
        "0"
        "1"
        "2"
    }

    tests! {
        initializer_scope in for is OK
        "0"
        "outer"
    }

    tests! {
        return_inside in for is OK
        "2"
    }
}
