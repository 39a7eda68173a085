//! Field types outside the known column mapping need an explicit override.

use berth_derive::Model;

#[derive(Model)]
struct Sensor {
    id: i64,
    readings: Vec<String>,
}

fn main() {}
