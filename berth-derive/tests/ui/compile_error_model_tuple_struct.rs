//! `Model` requires a struct with named fields.

use berth_derive::Model;

#[derive(Model)]
struct Broken(i32);

fn main() {}
