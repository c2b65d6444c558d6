#[macro_use]
mod common;

#[cfg(test)]
mod _while {
    tests! {
        basic in while is OK
        "0"
        "1"
        "2"
    }

    tests! {
        return_inside in while is OK
        "done"
    }

    tests! {
        closure_in_body in while is OK
        "1"
        "2"
        "3"
    }
}
