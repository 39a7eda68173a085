//! At most one field may carry the primary key marker.

use berth_derive::Model;

#[derive(Model)]
struct Account {
    #[primary_key]
    id: i64,
    #[primary_key] email: String,
}

fn main() {}
