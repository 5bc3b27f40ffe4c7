mod common;

use common::{day, open_memory, setup_memory_store, FlakyStorage};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use trade_ledger::{
    Collection, Config, DashboardTotals, LedgerError, LedgerStore, MemoryStorage, PartyRole,
    StorageBackend, TransactionInput, TransactionKind,
};

fn alice_sale() -> TransactionInput {
    TransactionInput::sale(day(2025, 1, 5), "Alice", "Milk", dec!(10), "Liters", dec!(180))
        .with_id("1")
}

fn alice_payment() -> TransactionInput {
    TransactionInput::payment_in(day(2025, 1, 10), "Alice", dec!(800)).with_id("2")
}

#[test]
fn sale_and_payment_leave_client_owing_the_difference() {
    let (mut store, _) = setup_memory_store();
    let sale = store.create(alice_sale()).expect("sale").durable().expect("durable");
    assert_eq!(sale.amount, dec!(1800));
    store.create(alice_payment()).expect("payment").durable().expect("durable");

    assert_eq!(store.client_balance("Alice"), dec!(1000));
    assert_eq!(
        store.dashboard().totals,
        DashboardTotals {
            total_sales: dec!(1800),
            total_purchases: dec!(0),
            net_balance: dec!(1800),
        }
    );
}

#[test]
fn deleting_the_sale_leaves_a_negative_balance() {
    let (mut store, _) = setup_memory_store();
    store.create(alice_sale()).expect("sale").durable().expect("durable");
    store.create(alice_payment()).expect("payment").durable().expect("durable");

    let removed = store.delete(PartyRole::Client, "1");
    assert!(removed.is_durable());
    assert_eq!(removed.value.map(|txn| txn.id), Some("1".to_string()));
    assert_eq!(store.client_balance("Alice"), dec!(-800));
    assert_eq!(store.dashboard().totals.total_sales, Decimal::ZERO);
}

#[test]
fn delete_is_idempotent_and_skips_writes_for_unknown_ids() {
    let (mut store, storage) = setup_memory_store();
    store.create(alice_sale()).expect("sale").durable().expect("durable");
    store.delete(PartyRole::Client, "1").durable().expect("first delete");
    let after_first = storage.raw(Collection::Sales);

    let second = store.delete(PartyRole::Client, "1");
    assert!(second.value.is_none());
    assert!(second.is_durable());
    assert_eq!(storage.raw(Collection::Sales), after_first);
    assert!(store.list(PartyRole::Client).is_empty());
}

#[test]
fn supplier_purchases_and_payments_drive_the_due() {
    let (mut store, _) = setup_memory_store();
    store
        .create(TransactionInput::purchase(
            day(2025, 2, 1),
            "Local Farm A",
            "Raw milk",
            dec!(100),
            "Liters",
            dec!(120),
        ))
        .expect("purchase")
        .durable()
        .expect("durable");
    store
        .create(TransactionInput::payment_out(day(2025, 2, 3), "Local Farm A", dec!(5000)))
        .expect("payment")
        .durable()
        .expect("durable");

    assert_eq!(store.supplier_due("Local Farm A"), dec!(7000));
    assert_eq!(store.client_balance("Local Farm A"), Decimal::ZERO);
    let totals = store.dashboard().totals;
    assert_eq!(totals.total_purchases, dec!(12000));
    assert_eq!(totals.net_balance, dec!(-12000));
}

#[test]
fn first_transaction_registers_the_party_once() {
    let (mut store, storage) = setup_memory_store();
    store.create(alice_sale()).expect("sale").durable().expect("durable");
    store.create(alice_payment()).expect("payment").durable().expect("durable");

    assert_eq!(store.parties(PartyRole::Client), ["Alice"]);
    assert!(store.parties(PartyRole::Supplier).is_empty());
    let persisted: Vec<String> =
        serde_json::from_str(&storage.raw(Collection::Clients).expect("clients written"))
            .expect("parse clients");
    assert_eq!(persisted, vec!["Alice".to_string()]);
}

#[test]
fn removing_a_party_keeps_its_balance() {
    let (mut store, _) = setup_memory_store();
    store.create(alice_sale()).expect("sale").durable().expect("durable");

    assert!(store.remove_party(PartyRole::Client, "Alice").durable().expect("remove"));
    assert!(store.parties(PartyRole::Client).is_empty());
    assert_eq!(store.client_balance("Alice"), dec!(1800));
    assert!(!store.remove_party(PartyRole::Client, "Alice").into_value());
}

#[test]
fn register_party_validates_and_deduplicates() {
    let (mut store, _) = setup_memory_store();
    let err = store
        .register_party(PartyRole::Supplier, "   ")
        .expect_err("blank name");
    assert!(matches!(err, LedgerError::Validation(_)));

    assert!(store
        .register_party(PartyRole::Supplier, " Center B ")
        .expect("register")
        .into_value());
    assert!(!store
        .register_party(PartyRole::Supplier, "Center B")
        .expect("register again")
        .into_value());
    assert_eq!(store.parties(PartyRole::Supplier), ["Center B"]);
}

#[test]
fn update_replaces_fields_but_keeps_identity() {
    let (mut store, _) = setup_memory_store();
    let original = store.create(alice_sale()).expect("sale").into_value();

    let edited = TransactionInput::sale(day(2025, 1, 6), "Alice", "Yogurt", dec!(4), "Kg", dec!(250));
    let updated = store
        .update("1", edited)
        .expect("update")
        .durable()
        .expect("durable");

    assert_eq!(updated.id, "1");
    assert_eq!(updated.created_at, original.created_at);
    assert_eq!(updated.amount, dec!(1000));
    assert_eq!(store.list(PartyRole::Client).len(), 1);
    assert_eq!(store.client_balance("Alice"), dec!(1000));
}

#[test]
fn update_unknown_id_is_not_found() {
    let (mut store, _) = setup_memory_store();
    let err = store.update("missing", alice_payment().with_id("missing")).expect_err("absent");
    assert_eq!(err, LedgerError::NotFound("missing".into()));
}

#[test]
fn update_with_conflicting_id_is_rejected() {
    let (mut store, _) = setup_memory_store();
    store.create(alice_payment()).expect("payment").durable().expect("durable");
    let err = store
        .update("2", alice_payment().with_id("3"))
        .expect_err("id mismatch");
    assert!(matches!(err, LedgerError::Validation(_)));
    assert_eq!(store.get(PartyRole::Client, "2").map(|t| t.amount), Some(dec!(800)));
}

#[test]
fn invalid_input_changes_nothing() {
    let (mut store, storage) = setup_memory_store();
    let missing_amount = TransactionInput::new(day(2025, 1, 5), "Alice", TransactionKind::PaymentIn);
    assert!(matches!(
        store.create(missing_amount),
        Err(LedgerError::Validation(_))
    ));
    let negative = TransactionInput::payment_in(day(2025, 1, 5), "Alice", dec!(-10));
    assert!(store.create(negative).is_err());
    let nameless = TransactionInput::payment_in(day(2025, 1, 5), "", dec!(10));
    assert!(store.create(nameless).is_err());

    assert!(store.is_empty());
    assert!(store.parties(PartyRole::Client).is_empty());
    assert!(storage.raw(Collection::Sales).is_none());
}

#[test]
fn failed_write_keeps_memory_and_reports_the_collection() {
    let storage = FlakyStorage::new();
    let mut store = LedgerStore::open(Box::new(storage.clone()));
    storage.set_reject_writes(true);

    let committed = store.create(alice_sale()).expect("validation passes");
    assert!(!committed.is_durable());
    assert!(committed.write_failures.iter().all(LedgerError::is_persistence));
    assert!(matches!(
        &committed.write_failures[0],
        LedgerError::PersistenceWrite { collection, .. } if collection == "sales"
    ));
    assert_eq!(store.client_balance("Alice"), dec!(1800));
    assert!(storage.inner().raw(Collection::Sales).is_none());

    storage.set_reject_writes(false);
    store.create(alice_payment()).expect("payment").durable().expect("durable");
    let reopened = LedgerStore::open(Box::new(storage.clone()));
    assert_eq!(reopened.client_balance("Alice"), dec!(1000));
}

#[test]
fn corrupt_collection_reads_as_empty_with_a_warning() {
    let storage = MemoryStorage::new();
    storage.write(Collection::Sales, "{ not json").expect("seed corrupt sales");
    storage
        .write(Collection::Clients, r#"["Alice", "Bob"]"#)
        .expect("seed clients");

    let store = open_memory(&storage);
    assert!(store.list(PartyRole::Client).is_empty());
    assert_eq!(store.parties(PartyRole::Client), ["Alice", "Bob"]);
    assert_eq!(store.load_warnings().len(), 1);
    assert!(matches!(
        &store.load_warnings()[0],
        LedgerError::PersistenceRead { collection, .. } if collection == "sales"
    ));
}

#[test]
fn search_matches_party_substrings_newest_first() {
    let (mut store, _) = setup_memory_store();
    store.create(alice_sale()).expect("sale").durable().expect("durable");
    store.create(alice_payment()).expect("payment").durable().expect("durable");
    store
        .create(TransactionInput::payment_in(day(2025, 1, 7), "Bob", dec!(5)).with_id("3"))
        .expect("bob")
        .durable()
        .expect("durable");

    let ids: Vec<_> = store
        .search(PartyRole::Client, "ALI")
        .into_iter()
        .map(|txn| txn.id.as_str())
        .collect();
    assert_eq!(ids, vec!["2", "1"]);
    assert!(store.search(PartyRole::Supplier, "ali").is_empty());
    assert_eq!(store.search(PartyRole::Client, "").len(), 3);
}

#[test]
fn dashboard_recent_respects_configured_limit() {
    let storage = MemoryStorage::new();
    let config = Config {
        recent_limit: 2,
        ..Config::default()
    };
    let mut store = LedgerStore::open_with(
        Box::new(storage),
        Box::new(common::frozen_clock()),
        config,
    );
    for d in 1..=4 {
        store
            .create(TransactionInput::payment_in(day(2025, 3, d), "Alice", dec!(1)))
            .expect("payment")
            .durable()
            .expect("durable");
    }
    let recent: Vec<_> = store.dashboard().recent.iter().map(|t| t.date).collect();
    assert_eq!(recent, vec![day(2025, 3, 4), day(2025, 3, 3)]);
}

#[test]
fn settings_updates_persist() {
    let (mut store, storage) = setup_memory_store();
    let mut settings = store.settings().clone();
    settings.business_name = "Daud Dairy".into();
    settings.phone = Some("0300-1234567".into());
    store.update_settings(settings.clone()).durable().expect("save settings");

    let reopened = open_memory(&storage);
    assert_eq!(reopened.settings(), &settings);
}

#[test]
fn replace_parties_cleans_and_persists_the_list() {
    let (mut store, storage) = setup_memory_store();
    store
        .replace_parties(PartyRole::Supplier, [" Local Farm A ", "", "Center B", "Local Farm A"])
        .durable()
        .expect("replace");
    assert_eq!(store.parties(PartyRole::Supplier), ["Local Farm A", "Center B"]);

    let reopened = open_memory(&storage);
    assert_eq!(reopened.parties(PartyRole::Supplier), ["Local Farm A", "Center B"]);
}

#[test]
fn payments_touch_only_their_own_party() {
    let (mut store, _) = setup_memory_store();
    store.create(alice_sale()).expect("sale").durable().expect("durable");
    store
        .create(TransactionInput::sale(day(2025, 1, 6), "Bob", "Cheese", dec!(2), "Kg", dec!(40)))
        .expect("bob sale")
        .durable()
        .expect("durable");
    store
        .create(TransactionInput::purchase(
            day(2025, 1, 6),
            "Local Farm A",
            "Raw milk",
            dec!(5),
            "Liters",
            dec!(100),
        ))
        .expect("purchase")
        .durable()
        .expect("durable");
    let totals_before = store.dashboard().totals;

    store.create(alice_payment()).expect("payment in").durable().expect("durable");
    store
        .create(TransactionInput::payment_out(day(2025, 1, 12), "Local Farm A", dec!(200)))
        .expect("payment out")
        .durable()
        .expect("durable");

    assert_eq!(store.client_balance("Alice"), dec!(1000));
    assert_eq!(store.client_balance("Bob"), dec!(80));
    assert_eq!(store.supplier_due("Local Farm A"), dec!(300));
    assert_eq!(store.supplier_due("Alice"), Decimal::ZERO);
    assert_eq!(store.dashboard().totals, totals_before);
}

#[test]
fn editing_one_record_moves_only_that_party() {
    let (mut store, _) = setup_memory_store();
    store.create(alice_sale()).expect("sale").durable().expect("durable");
    store
        .create(
            TransactionInput::sale(day(2025, 1, 6), "Bob", "Cheese", dec!(2), "Kg", dec!(40))
                .with_id("3"),
        )
        .expect("bob sale")
        .durable()
        .expect("durable");
    store
        .create(TransactionInput::purchase(
            day(2025, 1, 6),
            "Local Farm A",
            "Raw milk",
            dec!(5),
            "Liters",
            dec!(100),
        ))
        .expect("purchase")
        .durable()
        .expect("durable");
    let len_before = store.len();
    let sales_before = store.dashboard().totals.total_sales;
    let alice_before = store.client_balance("Alice");

    let edited = TransactionInput::sale(day(2025, 1, 7), "Bob", "Cheese", dec!(3), "Kg", dec!(40));
    let updated = store.update("3", edited).expect("update").durable().expect("durable");

    assert_eq!(updated.amount, dec!(120));
    assert_eq!(store.len(), len_before);
    assert_eq!(store.client_balance("Bob"), dec!(120));
    assert_eq!(store.client_balance("Alice"), alice_before);
    assert_eq!(store.supplier_due("Local Farm A"), dec!(500));
    let totals = store.dashboard().totals;
    assert_eq!(totals.total_sales - sales_before, dec!(120) - dec!(80));
    assert_eq!(totals.total_purchases, dec!(500));
}

#[test]
fn removed_supplier_stays_removed_after_reopen() {
    let storage = MemoryStorage::new();
    storage
        .write(
            Collection::Settings,
            r#"{"businessName": "Daud Dairy", "suppliers": ["Local Farm A"]}"#,
        )
        .expect("seed legacy settings");
    let mut store = open_memory(&storage);
    assert_eq!(store.parties(PartyRole::Supplier), ["Local Farm A"]);

    assert!(store
        .remove_party(PartyRole::Supplier, "Local Farm A")
        .durable()
        .expect("remove"));
    let reopened = open_memory(&storage);
    assert!(reopened.parties(PartyRole::Supplier).is_empty());
    assert!(reopened.load_warnings().is_empty());
}

#[test]
fn emptied_supplier_list_stays_empty_after_reopen() {
    let storage = MemoryStorage::new();
    storage
        .write(Collection::Settings, r#"{"suppliers": ["Local Farm A", "Center B"]}"#)
        .expect("seed legacy settings");
    let mut store = open_memory(&storage);
    store
        .replace_parties(PartyRole::Supplier, Vec::<String>::new())
        .durable()
        .expect("replace");

    let reopened = open_memory(&storage);
    assert!(reopened.parties(PartyRole::Supplier).is_empty());
}
