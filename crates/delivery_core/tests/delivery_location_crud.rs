use chrono::NaiveDate;
use delivery_core::db::open_db_in_memory;
use delivery_core::{
    DeliveryLocation, DeliveryLocationService, DeliveryLocationValidationError, RepoError,
    SqliteDeliveryLocationRepository, SqliteSupplierRepository, Supplier, SupplierRepository,
};
use rusqlite::Connection;
use std::collections::HashSet;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn taxas() -> Supplier {
    Supplier::new("taxas", "firstname", "lastname", "password", "business name")
}

fn ed() -> Supplier {
    Supplier::new("ed", "edd", "eddy", "jawbreaker101", "jawbreaker inc")
}

fn qiryat_shemona(owner: &Supplier) -> DeliveryLocation {
    DeliveryLocation::new(owner, "Qiryat Shemona", date(2022, 12, 30))
}

fn haifa(owner: &Supplier) -> DeliveryLocation {
    DeliveryLocation::new(owner, "Haifa", date(2022, 12, 31))
}

fn save(conn: &Connection, supplier: &Supplier) {
    SqliteSupplierRepository::try_new(conn)
        .unwrap()
        .save_supplier(supplier)
        .unwrap();
}

fn service(conn: &Connection) -> DeliveryLocationService<SqliteDeliveryLocationRepository<'_>> {
    DeliveryLocationService::new(SqliteDeliveryLocationRepository::try_new(conn).unwrap())
}

#[test]
fn added_locations_appear_in_full_listing() {
    let conn = open_db_in_memory().unwrap();
    let supplier = taxas();
    save(&conn, &supplier);
    let service = service(&conn);

    let mut first = qiryat_shemona(&supplier);
    let mut second = haifa(&supplier);
    let first_id = service.add_delivery_location(&mut first).unwrap();
    let second_id = service.add_delivery_location(&mut second).unwrap();

    assert_ne!(first_id, second_id);
    assert_eq!(first.id(), Some(first_id));
    assert_eq!(second.id(), Some(second_id));

    let all = service.all_delivery_locations().unwrap();
    assert!(all.contains(&first));
    assert!(all.contains(&second));
    assert_eq!(all.len(), 2);
}

#[test]
fn removing_unknown_id_fails_with_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let err = service.remove_delivery_location_by_id(-1).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(Some(-1))));
    assert!(err.is_not_found());
}

#[test]
fn removed_location_is_gone_from_listing_and_lookup() {
    let conn = open_db_in_memory().unwrap();
    let supplier = taxas();
    save(&conn, &supplier);
    let service = service(&conn);

    let mut record = qiryat_shemona(&supplier);
    let id = service.add_delivery_location(&mut record).unwrap();
    assert!(service.all_delivery_locations().unwrap().contains(&record));

    service.remove_delivery_location(&mut record).unwrap();

    assert!(!record.is_persisted());
    assert!(service.all_delivery_locations().unwrap().is_empty());
    let err = service.get_delivery_location_by_id(id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(Some(found)) if found == id));
}

#[test]
fn removing_twice_or_before_add_fails_with_not_found() {
    let conn = open_db_in_memory().unwrap();
    let supplier = taxas();
    save(&conn, &supplier);
    let service = service(&conn);

    let mut unsaved = haifa(&supplier);
    let err = service.remove_delivery_location(&mut unsaved).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(None)));

    let mut record = qiryat_shemona(&supplier);
    let id = service.add_delivery_location(&mut record).unwrap();
    service.remove_delivery_location_by_id(id).unwrap();
    let err = service.remove_delivery_location_by_id(id).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn get_by_id_round_trips() {
    let conn = open_db_in_memory().unwrap();
    let supplier = taxas();
    save(&conn, &supplier);
    let service = service(&conn);

    let mut record = qiryat_shemona(&supplier);
    let id = service.add_delivery_location(&mut record).unwrap();

    let loaded = service.get_delivery_location_by_id(id).unwrap();
    assert_eq!(loaded, record);
    assert_eq!(loaded.owner, "taxas");
    assert_eq!(loaded.location, "Qiryat Shemona");
    assert_eq!(loaded.date, date(2022, 12, 30));
}

#[test]
fn get_by_unknown_id_fails_with_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let err = service.get_delivery_location_by_id(-1).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(Some(-1))));
}

#[test]
fn filter_by_supplier_and_location_matches_exactly() {
    let conn = open_db_in_memory().unwrap();
    let supplier = taxas();
    let other = ed();
    save(&conn, &supplier);
    save(&conn, &other);
    let service = service(&conn);

    let mut target = qiryat_shemona(&supplier);
    let mut same_supplier_other_place = haifa(&supplier);
    let mut same_place_other_supplier = qiryat_shemona(&other);
    service.add_delivery_location(&mut target).unwrap();
    service
        .add_delivery_location(&mut same_supplier_other_place)
        .unwrap();
    service
        .add_delivery_location(&mut same_place_other_supplier)
        .unwrap();

    let found = service
        .filter_by_supplier_and_location(&supplier, "Qiryat Shemona")
        .unwrap();
    assert_eq!(found, vec![target]);
}

#[test]
fn filter_by_supplier_and_unrelated_location_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let supplier = taxas();
    save(&conn, &supplier);
    let service = service(&conn);

    let found = service
        .filter_by_supplier_and_location(&supplier, "LOCATION THAT IS NOT RELATED TO SUPPLIER0")
        .unwrap();
    assert!(found.is_empty());
}

#[test]
fn filter_by_location_with_supplier_returns_all_owned_records() {
    let conn = open_db_in_memory().unwrap();
    let supplier = taxas();
    let other = ed();
    save(&conn, &supplier);
    save(&conn, &other);
    let service = service(&conn);

    let mut first = qiryat_shemona(&supplier);
    let mut second = haifa(&supplier);
    let mut foreign = haifa(&other);
    service.add_delivery_location(&mut first).unwrap();
    service.add_delivery_location(&mut second).unwrap();
    service.add_delivery_location(&mut foreign).unwrap();

    let found: HashSet<_> = service
        .filter_by_location(&supplier)
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(found, HashSet::from([first, second]));
}

#[test]
fn filter_by_location_with_place_name() {
    let conn = open_db_in_memory().unwrap();
    let supplier = taxas();
    let other = ed();
    save(&conn, &supplier);
    save(&conn, &other);
    let service = service(&conn);

    let mut mine = haifa(&supplier);
    let mut theirs = haifa(&other);
    let mut elsewhere = qiryat_shemona(&supplier);
    service.add_delivery_location(&mut mine).unwrap();
    service.add_delivery_location(&mut theirs).unwrap();
    service.add_delivery_location(&mut elsewhere).unwrap();

    let found = service.filter_by_location("Haifa").unwrap();
    assert_eq!(found, vec![mine, theirs]);

    assert!(service
        .filter_by_location("NOT EXISTED LOCATION")
        .unwrap()
        .is_empty());
}

#[test]
fn filter_by_location_on_empty_store_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    assert!(service
        .filter_by_location("NOT EXISTED LOCATION")
        .unwrap()
        .is_empty());
}

#[test]
fn update_date_persists() {
    let conn = open_db_in_memory().unwrap();
    let supplier = taxas();
    save(&conn, &supplier);
    let service = service(&conn);

    let mut record = qiryat_shemona(&supplier);
    let id = service.add_delivery_location(&mut record).unwrap();

    let new_date = date(2023, 1, 1);
    service.update_date(&mut record, new_date).unwrap();

    assert_eq!(record.date, new_date);
    assert_eq!(service.get_delivery_location_by_id(id).unwrap().date, new_date);
}

#[test]
fn update_location_persists() {
    let conn = open_db_in_memory().unwrap();
    let supplier = taxas();
    save(&conn, &supplier);
    let service = service(&conn);

    let mut record = qiryat_shemona(&supplier);
    let id = service.add_delivery_location(&mut record).unwrap();

    service.update_location(&mut record, "Yafo").unwrap();

    assert_eq!(record.location, "Yafo");
    assert_eq!(service.get_delivery_location_by_id(id).unwrap().location, "Yafo");
}

#[test]
fn update_location_does_not_validate() {
    let conn = open_db_in_memory().unwrap();
    let supplier = taxas();
    save(&conn, &supplier);
    let service = service(&conn);

    let mut record = qiryat_shemona(&supplier);
    let id = service.add_delivery_location(&mut record).unwrap();

    service.update_location(&mut record, "").unwrap();
    assert_eq!(service.get_delivery_location_by_id(id).unwrap().location, "");
}

#[test]
fn updating_unsaved_record_fails_and_leaves_it_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let supplier = taxas();
    save(&conn, &supplier);
    let service = service(&conn);

    let mut record = haifa(&supplier);
    let err = service
        .update_date(&mut record, date(2024, 2, 29))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(None)));
    assert_eq!(record.date, date(2022, 12, 31));

    let err = service.update_location(&mut record, "Yafo").unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(record.location, "Haifa");
}

#[test]
fn updating_removed_record_fails_with_not_found() {
    let conn = open_db_in_memory().unwrap();
    let supplier = taxas();
    save(&conn, &supplier);
    let service = service(&conn);

    let mut record = haifa(&supplier);
    let id = service.add_delivery_location(&mut record).unwrap();
    service.remove_delivery_location_by_id(id).unwrap();

    let err = service.update_location(&mut record, "Yafo").unwrap_err();
    assert!(matches!(err, RepoError::NotFound(Some(found)) if found == id));
    assert_eq!(record.location, "Haifa");
}

#[test]
fn empty_location_is_rejected_and_nothing_is_persisted() {
    let conn = open_db_in_memory().unwrap();
    let supplier = taxas();
    save(&conn, &supplier);
    let service = service(&conn);

    let mut invalid = DeliveryLocation::new(&supplier, "", date(2022, 12, 31));
    let err = service.add_delivery_location(&mut invalid).unwrap_err();

    assert!(matches!(
        err,
        RepoError::Validation(DeliveryLocationValidationError::EmptyLocation)
    ));
    assert!(err.is_validation());
    assert!(!invalid.is_persisted());
    assert!(service.all_delivery_locations().unwrap().is_empty());
}

#[test]
fn adding_for_unsaved_supplier_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let mut record = qiryat_shemona(&taxas());
    let err = service.add_delivery_location(&mut record).unwrap_err();

    assert!(matches!(err, RepoError::UnknownSupplier(ref name) if name == "taxas"));
    assert!(service.all_delivery_locations().unwrap().is_empty());
}

#[test]
fn re_adding_persisted_record_saves_over_its_row() {
    let conn = open_db_in_memory().unwrap();
    let supplier = taxas();
    save(&conn, &supplier);
    let service = service(&conn);

    let mut record = haifa(&supplier);
    let id = service.add_delivery_location(&mut record).unwrap();

    record.location = "Akko".to_string();
    assert_eq!(service.add_delivery_location(&mut record).unwrap(), id);

    let all = service.all_delivery_locations().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].location, "Akko");

    record.location.clear();
    let err = service.add_delivery_location(&mut record).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(service.get_delivery_location_by_id(id).unwrap().location, "Akko");
}

#[test]
fn removed_ids_are_not_reused() {
    let conn = open_db_in_memory().unwrap();
    let supplier = taxas();
    save(&conn, &supplier);
    let service = service(&conn);

    let mut first = haifa(&supplier);
    let first_id = service.add_delivery_location(&mut first).unwrap();
    service.remove_delivery_location(&mut first).unwrap();

    let mut second = haifa(&supplier);
    let second_id = service.add_delivery_location(&mut second).unwrap();
    assert!(second_id > first_id);
}

#[test]
fn re_adding_with_new_owner_moves_the_record() {
    let conn = open_db_in_memory().unwrap();
    let supplier = taxas();
    let other = ed();
    save(&conn, &supplier);
    save(&conn, &other);
    let service = service(&conn);

    let mut record = haifa(&supplier);
    let id = service.add_delivery_location(&mut record).unwrap();

    record.owner = other.user_name.clone();
    assert_eq!(service.add_delivery_location(&mut record).unwrap(), id);

    let stored = service.get_delivery_location_by_id(id).unwrap();
    assert_eq!(stored.owner, "ed");
    assert_eq!(service.filter_by_location(&other).unwrap(), vec![record]);
    assert!(service.filter_by_location(&supplier).unwrap().is_empty());
}

#[test]
fn re_adding_with_unsaved_owner_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let supplier = taxas();
    save(&conn, &supplier);
    let service = service(&conn);

    let mut record = haifa(&supplier);
    let id = service.add_delivery_location(&mut record).unwrap();

    record.owner = "ghost".to_string();
    let err = service.add_delivery_location(&mut record).unwrap_err();
    assert!(matches!(err, RepoError::UnknownSupplier(ref name) if name == "ghost"));

    let stored = service.get_delivery_location_by_id(id).unwrap();
    assert_eq!(stored.owner, "taxas");
}

#[test]
fn re_adding_after_remove_by_id_inserts_under_new_id() {
    let conn = open_db_in_memory().unwrap();
    let supplier = taxas();
    save(&conn, &supplier);
    let service = service(&conn);

    let mut record = qiryat_shemona(&supplier);
    let old_id = service.add_delivery_location(&mut record).unwrap();
    service.remove_delivery_location_by_id(old_id).unwrap();

    let new_id = service.add_delivery_location(&mut record).unwrap();

    assert_ne!(new_id, old_id);
    assert_eq!(record.id(), Some(new_id));
    assert!(service.get_delivery_location_by_id(old_id).unwrap_err().is_not_found());
    let all = service.all_delivery_locations().unwrap();
    assert_eq!(all, vec![record]);
    assert_eq!(all[0].location, "Qiryat Shemona");
}
