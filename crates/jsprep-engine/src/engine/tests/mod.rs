// crates/jsprep-engine/src/engine/tests/mod.rs
