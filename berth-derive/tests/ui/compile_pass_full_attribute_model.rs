//! The full attribute surface expands cleanly, including `FromRow` on the
//! same struct and json/chrono columns on a write-only record.

use berth_derive::{FromRow, Model};

#[derive(Debug, Clone, Model, FromRow)]
#[table_name = "crew_members"]
struct CrewMember {
    #[primary_key]
    id: u32,
    #[column_name = "full_name"]
    name: String,
    email: Option<String>,
}

#[derive(Debug, Clone, Model)]
struct Shipment {
    id: i64,
    manifest: serde_json::Value,
    loaded_at: Option<chrono::NaiveDateTime>,
}

fn main() {
    assert_eq!(<CrewMember as berth::Model>::table_name(), "crew_members");
    assert_eq!(<CrewMember as berth::Model>::primary_key(), "id");
    assert_eq!(<Shipment as berth::Model>::table_name(), "shipments");
}
