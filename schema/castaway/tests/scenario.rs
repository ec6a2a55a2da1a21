//! End-to-end scenario: declare the castaway domain, resolve its mapping
//! policy, materialize the schema, persist a stranded castaway's bottle,
//! then cascade-delete the bottle.

use flotsam::prelude::*;
use flotsam_castaway_fixtures::{castaway_schema, rows};

fn setup() -> (Schema, MappingPolicy) {
    let schema = castaway_schema().unwrap();
    let policy = MappingPolicy::resolve(&schema).unwrap();

    (schema, policy)
}

#[test]
fn policy_resolves_one_class_per_relationship() {
    let (schema, policy) = setup();

    let declared: usize = schema.entities().map(|e| e.relations.len()).sum();
    assert_eq!(policy.relations().count(), declared);

    let messages = policy.relation("Bottle", "Messages").unwrap();
    assert_eq!(messages.cascade, Cascade::AllDeleteOrphan);
    assert_eq!(messages.owner, "Message");
    assert_eq!(messages.delimited_key_column(), "[Bottle_id]");
}

#[test]
fn schema_materializes_idempotently() {
    let (schema, policy) = setup();
    let mut materializer = MemoryMaterializer::new();

    materializer.ensure_database("TestSimpleDb").unwrap();
    materializer.apply_schema(&schema, &policy).unwrap();
    materializer.apply_schema(&schema, &policy).unwrap();

    assert!(materializer.catalog_exists("TestSimpleDb"));
    assert_eq!(materializer.table_count(), 4);

    let bottle = materializer.table("[Bottle]").unwrap();
    assert!(bottle.columns.contains("[OpenedBy_id]"));
}

#[test]
fn stranded_castaway_bottle_cascade() {
    let (schema, policy) = setup();
    let mut store = Store::new(&schema);

    // Tahiti -> Bob -> a bottle -> two messages.
    let mut session = Session::new(&schema, &policy, &mut store);
    let tahiti = session.save("Island", rows::island("Tahiti")).unwrap();
    let bob = session.save("Person", rows::person(Some(tahiti))).unwrap();
    let bottle = session.save("Bottle", rows::bottle(Some(bob))).unwrap();
    session
        .save(
            "Message",
            rows::message(
                bottle,
                "Register now for an exciting opportunity!",
                Timestamp::now().sub_days(730),
            ),
        )
        .unwrap();
    session
        .save(
            "Message",
            rows::message(
                bottle,
                "Dear Bob. When will you get home to feed me?? Sincerely -The Cat.",
                Timestamp::now().sub_days(730),
            ),
        )
        .unwrap();
    session.flush().unwrap();

    assert_eq!(store.len("Message").unwrap(), 2);
    store.verify_integrity(&policy).unwrap();

    // Read back what washed ashore.
    let texts: Vec<&str> = store
        .rows("Message")
        .unwrap()
        .filter_map(|row| row.get("Text").and_then(Value::as_text))
        .collect();
    assert_eq!(texts.len(), 2);

    // Cascade-deleting the bottle drowns the messages and nothing else.
    let mut session = Session::new(&schema, &policy, &mut store);
    let deleted = session.delete("Bottle", bottle).unwrap();
    assert_eq!(deleted.len(), 3);

    assert_eq!(store.len("Message").unwrap(), 0);
    assert!(store.contains("Person", bob));
    assert!(store.contains("Island", tahiti));
    store.verify_integrity(&policy).unwrap();
}
