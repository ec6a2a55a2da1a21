//! Console walkthrough: declare the castaway domain, resolve the mapping
//! policy, materialize the schema, strand somebody, and read their mail.

use flotsam::prelude::*;
use flotsam_castaway_fixtures::{castaway_schema, rows};

fn main() -> Result<(), flotsam::Error> {
    let schema = castaway_schema()?;
    let policy = MappingPolicy::resolve(&schema)?;

    // Auto create/update the catalog. Very useful for getting started,
    // very terrible for keeping going :)
    let mut materializer = MemoryMaterializer::new();
    materializer.ensure_database("TestSimpleDb")?;
    materializer.apply_schema(&schema, &policy)?;

    let mut store = Store::new(&schema);

    // Do some stuff!
    let mut session = Session::new(&schema, &policy, &mut store).with_debug(true);

    let tahiti = session.save("Island", rows::island("Tahiti"))?;
    session.flush()?;

    let bob = session.save("Person", rows::person(Some(tahiti)))?;
    session.flush()?;

    let jack_daniels = session.save("Bottle", rows::bottle(Some(bob)))?;
    session.flush()?;

    session.save(
        "Message",
        rows::message(
            jack_daniels,
            "Register now for an exciting opportunity!",
            Timestamp::now().sub_days(730),
        ),
    )?;
    session.save(
        "Message",
        rows::message(
            jack_daniels,
            "Dear Bob.  How have you been?  When will you get home to feed me?? Sincerely -The Cat.",
            Timestamp::now().sub_days(730),
        ),
    )?;
    session.flush()?;

    // Read the messages back, oldest identity first.
    for row in store.rows("Message")? {
        let date = row
            .get("DateAdded")
            .map(|v| match v {
                Value::Timestamp(ts) => ts.to_string(),
                other => format!("{other:?}"),
            })
            .unwrap_or_default();
        let text = row
            .get("Text")
            .and_then(Value::as_text)
            .unwrap_or_default();
        println!("{date}: {text}");
    }

    println!("All Done!");

    Ok(())
}
