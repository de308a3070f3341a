//! Fixtures shared by the repository tests.

use chrono::NaiveTime;

use turfbook_app::ports::TurfRepository;
use turfbook_domain::id::OwnerId;
use turfbook_domain::owner::Owner;
use turfbook_domain::turf::Turf;

use crate::owner_directory::SqliteOwnerDirectory;
use crate::pool::{Config, Database};
use crate::turf_repo::SqliteTurfRepository;

pub(crate) fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

pub(crate) async fn setup_db() -> Database {
    Config {
        database_url: "sqlite::memory:".to_string(),
    }
    .build()
    .await
    .unwrap()
}

pub(crate) async fn seed_owner(db: &Database, name: &str) -> Owner {
    let owner = Owner {
        id: OwnerId::new(),
        name: name.to_string(),
        phone: Some("555-0100".to_string()),
    };
    SqliteOwnerDirectory::new(db.pool().clone())
        .insert(&owner)
        .await
        .unwrap();
    owner
}

pub(crate) async fn seed_turf(db: &Database, name: &str) -> Turf {
    let owner = seed_owner(db, "Asha").await;
    let turf = Turf::builder()
        .owner_id(owner.id)
        .name(name)
        .operating_hours(hm(6, 0), hm(22, 0))
        .build()
        .unwrap();
    SqliteTurfRepository::new(db.pool().clone())
        .create(turf.clone(), vec![])
        .await
        .unwrap();
    turf
}
