//! Parsers generated from `grammars/` by the build script.

pub mod basic {
    include!(concat!(env!("OUT_DIR"), "/basic.rs"));
}

pub mod arith {
    include!(concat!(env!("OUT_DIR"), "/arith.rs"));
}

/// The arithmetic grammar again, generated inside `pub mod arith`.
pub mod namespaced {
    include!(concat!(env!("OUT_DIR"), "/arith_namespaced.rs"));
}
