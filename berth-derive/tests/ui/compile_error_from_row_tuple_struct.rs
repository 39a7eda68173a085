//! `FromRow` requires a struct with named fields.

use berth_derive::FromRow;

#[derive(FromRow)]
struct Flat(i64, String);

fn main() {}
