//! Unrecognized `column_type` values are rejected at expansion time.

use berth_derive::Model;

#[derive(Model)]
#[table_name = "articles"]
struct Article {
    id: i64,
    #[column_type = "varchar"] title: String,
}

fn main() {}
