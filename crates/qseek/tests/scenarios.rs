//! End-to-end translation scenarios.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use qseek::{
    parse_query_string, processor, Dir, Field, ObjectId, Operand, OrderBy, Processor, Registry,
    ReservedNames, Timestamp, Value,
};
use serde_json::json;

fn oid(hex: &str) -> ObjectId {
    hex.parse().unwrap()
}

fn full_registry() -> Registry {
    Registry::new([
        Field::new("myString"),
        Field::new("myStringWithDefault").default_value("slike:Something useful"),
        Field::new("myInt").integer().sortable().projectable(),
        Field::new("myFloat").float().sortable().projectable(),
        Field::new("myBool").boolean(),
        Field::new("myDateTime").timestamp(),
        Field::new("myObjectID").identifier().with_aliases(["_id", "id"]),
        Field::new("pageMarker").meta(),
    ])
    .unwrap()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn integer_range() {
    let registry = Registry::new([Field::new("count").integer()]).unwrap();
    let q = registry.process(&[("count", "gt:1,lt:10")]);
    assert_eq!(
        serde_json::to_value(&q.filter()["count"]).unwrap(),
        json!({"$gt": 1, "$lt": 10})
    );
}

#[test]
fn starts_with_escapes_metacharacters() {
    let registry = Registry::new([Field::new("name")]).unwrap();
    let q = registry.process(&[("name", "slike:Jo.hn")]);
    let fragment = &q.filter()["name"];
    let pattern = fragment.get("$regex").and_then(Operand::as_pattern).unwrap();
    assert_eq!(pattern.pattern, "^Jo\\.hn");
    assert!(pattern.case_insensitive);
    assert_eq!(
        serde_json::to_value(fragment).unwrap(),
        json!({"$regex": "^Jo\\.hn", "$options": "i"})
    );
}

#[test]
fn exclusion_projection() {
    let registry = Registry::new([
        Field::new("a").projectable(),
        Field::new("b").projectable(),
    ])
    .unwrap();

    let q = registry.process(&[("a", "x"), ("b", "y"), ("projection", "-a,-b")]);
    assert_eq!(q.projection().get("a"), Some(&0));
    assert_eq!(q.projection().get("b"), Some(&0));

    let q = registry.process(&[("a", "x"), ("b", "y"), ("projection", "+a,-b")]);
    assert_eq!(q.projection().get("a"), Some(&1));
    assert_eq!(q.projection().get("b"), Some(&1));
}

#[test]
fn projection_sum_clamps_for_many_excludes() {
    let registry = Registry::new([
        Field::new("a").projectable(),
        Field::new("b").projectable(),
        Field::new("c").projectable(),
        Field::new("d").projectable(),
    ])
    .unwrap();
    let q = registry.process(&[
        ("a", "1"),
        ("b", "1"),
        ("c", "1"),
        ("d", "1"),
        ("projection", "-a,-b,-c"),
    ]);
    assert_eq!(q.projection().len(), 3);
    assert!(q.projection().values().all(|v| *v == 0));
    assert!(!q.projection().contains_key("d"));
}

#[test]
fn projection_only_for_projectable_fields() {
    let registry = Registry::new([Field::new("a").projectable(), Field::new("b")]).unwrap();
    let q = registry.process(&[("a", "1"), ("b", "1"), ("projection", "a,b")]);
    assert_eq!(q.projection().len(), 1);
    assert_eq!(q.projection().get("a"), Some(&1));
}

#[test]
fn projection_by_alias() {
    let registry = Registry::new([Field::new("name").projectable().alias("n")]).unwrap();
    let q = registry.process(&[("name", "x"), ("projection", "-n")]);
    assert_eq!(q.projection().get("name"), Some(&0));
}

#[test]
fn identifier_alias_with_invalid_member() {
    let registry = Registry::new([Field::new("objectId").identifier().alias("id")]).unwrap();
    let q = registry.process(&[("id", "in:abc123,6050e7f529a90b22dc47f19f")]);
    assert_eq!(
        q.filter()["objectId"].get("$in"),
        Some(&Operand::List(vec![Value::ObjectId(oid(
            "6050e7f529a90b22dc47f19f"
        ))]))
    );
    assert_eq!(q.filter()["objectId"].len(), 1);
}

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn first_declared_alias_wins() {
    let registry = Registry::new([Field::new("objectId")
        .identifier()
        .with_aliases(["_id", "id"])])
    .unwrap();
    let q = registry.process(&[
        ("id", "6050e7f529a90b22dc47f19f"),
        ("_id", "6050e7f529a90b22dc47f19e"),
    ]);
    assert_eq!(
        q.filter()["objectId"].get("$eq"),
        Some(&Operand::Value(Value::ObjectId(oid(
            "6050e7f529a90b22dc47f19e"
        ))))
    );
}

#[test]
fn default_applies_when_absent() {
    let registry = Registry::new([Field::new("status")
        .sortable()
        .default_value("ne:archived")])
    .unwrap();
    let q = registry.process(&[("sort", "-status")]);
    assert_eq!(
        q.filter()["status"].get("$ne"),
        Some(&Operand::Value(Value::from("archived")))
    );
    assert_eq!(q.sort(), [OrderBy::desc("status")]);
}

#[test]
fn default_not_invoked_when_present() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let registry = Registry::new([Field::new("n").integer().default_with(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        "5".to_string()
    })])
    .unwrap();

    let q = registry.process(&[("n", "7")]);
    assert_eq!(
        q.filter()["n"].get("$eq"),
        Some(&Operand::Value(Value::from(7i64)))
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn default_replaces_unusable_value() {
    let registry = Registry::new([Field::new("n").integer().default_value("gte:5")]).unwrap();
    let q = registry.process(&[("n", "abc")]);
    assert_eq!(
        q.filter()["n"].get("$gte"),
        Some(&Operand::Value(Value::from(5i64)))
    );
    assert!(q.filter()["n"].get("$eq").is_none());
}

#[test]
fn unusable_default_leaves_field_out() {
    let registry = Registry::new([Field::new("n").integer().default_value("x")]).unwrap();
    let q = registry.process(&[] as &[(&str, &str)]);
    assert!(q.filter().is_empty());
}

#[test]
fn meta_field_default_goes_to_meta() {
    let registry = Registry::new([Field::new("cursor").meta().default_value("start")]).unwrap();
    let q = registry.process(&[] as &[(&str, &str)]);
    assert_eq!(q.meta()["cursor"], "start");
    assert!(q.filter().is_empty());
}

#[test]
fn undeclared_parameters_ignored() {
    let registry = Registry::new([Field::new("a")]).unwrap();
    let q = registry.process(&[("unknown", "nin:1,2,3,4")]);
    assert!(q.filter().is_empty());
}

// ============================================================================
// Typed coercion through the pipeline
// ============================================================================

#[test]
fn all_failing_operators_leave_field_out() {
    let registry = Registry::new([Field::new("f").float()]).unwrap();
    let q = registry.process(&[("f", "gt:x,lt:y,in:a,b")]);
    assert!(!q.filter().contains_key("f"));
}

#[test]
fn failing_operator_is_absent_from_fragment() {
    let registry = Registry::new([Field::new("f").float()]).unwrap();
    let q = registry.process(&[("f", "gt:x,lt:2.5")]);
    let fragment = &q.filter()["f"];
    assert!(fragment.get("$gt").is_none());
    assert_eq!(
        fragment.get("$lt"),
        Some(&Operand::Value(Value::from(2.5f64)))
    );
}

#[test]
fn non_finite_float_is_dropped_not_nulled() {
    let registry = Registry::new([Field::new("f").float()]).unwrap();
    for raw in ["nan", "inf", "gt:-infinity"] {
        let q = registry.process(&[("f", raw)]);
        assert!(q.filter().is_empty(), "{raw}");
        assert_eq!(q.to_json().unwrap()["filter"], json!({}), "{raw}");
    }

    let q = registry.process(&[("f", "gt:-infinity,lt:nan,gte:0.5")]);
    assert_eq!(
        serde_json::to_value(&q.filter()["f"]).unwrap(),
        json!({"$gte": 0.5})
    );
}

#[test]
fn string_equality_is_verbatim() {
    let registry = Registry::new([Field::new("s")]).unwrap();
    let q = registry.process(&[("s", "Hello, world,")]);
    assert_eq!(
        q.filter()["s"].get("$eq"),
        Some(&Operand::Value(Value::from("Hello, world")))
    );
}

#[test]
fn search_on_integer_field_contributes_nothing() {
    let registry = Registry::new([Field::new("n").integer()]).unwrap();
    let q = registry.process(&[("n", "like:5")]);
    assert!(q.filter().is_empty());
}

#[test]
fn timestamp_range() {
    let registry = Registry::new([Field::new("at").timestamp()]).unwrap();
    let q = registry.process(&[("at", "gte:1970-01-01T00:00:01Z,lte:1970-01-01T00:00:02Z")]);
    let fragment = &q.filter()["at"];
    assert_eq!(
        fragment.get("$gte"),
        Some(&Operand::Value(Value::Timestamp(Timestamp(1000))))
    );
    assert_eq!(
        fragment.get("$lte"),
        Some(&Operand::Value(Value::Timestamp(Timestamp(2000))))
    );
}

#[test]
fn timestamp_custom_layout() {
    let registry = Registry::new([Field::new("day").timestamp().time_layout("%Y-%m-%d")]).unwrap();
    let q = registry.process(&[("day", "in:1970-01-02,bogus")]);
    assert_eq!(
        q.filter()["day"].get("$in"),
        Some(&Operand::List(vec![Value::Timestamp(Timestamp(86_400_000))]))
    );
}

// ============================================================================
// Full request
// ============================================================================

#[test]
fn full_request() {
    let qs = "unknown=nin%3A1%2C2%2C3%2C4\
        &myString=like%3AHello%2C+world\
        &myInt=gt%3A1%2Clt%3A10\
        &myFloat=1.0\
        &myBool=false\
        &myDateTime=gte%3A2021-01-01T15%3A00%3A00Z%2Clte%3A2021-02-01T15%3A00%3A00Z\
        &id=in%3A6050e7f529a90b22dc47f19e%2C6050e7f529a90b22dc47f19f\
        &pageMarker=6050e7f529a90b22dc47f19f\
        &sort=-myInt%2C%2BmyString\
        &projection=-myFloat\
        &limit=10\
        &skip=100";
    let params = parse_query_string(qs);
    let q = full_registry().process(&params);

    assert_eq!(
        q.to_json().unwrap(),
        json!({
            "filter": {
                "myString": {"$regex": "Hello, world", "$options": "i"},
                "myStringWithDefault": {"$regex": "^Something useful", "$options": "i"},
                "myInt": {"$gt": 1, "$lt": 10},
                "myFloat": {"$eq": 1.0},
                "myBool": {"$eq": false},
                "myDateTime": {
                    "$gte": {"$date": "2021-01-01T15:00:00.000Z"},
                    "$lte": {"$date": "2021-02-01T15:00:00.000Z"},
                },
                "myObjectID": {"$in": [
                    {"$oid": "6050e7f529a90b22dc47f19e"},
                    {"$oid": "6050e7f529a90b22dc47f19f"},
                ]},
            },
            "projection": {"myFloat": 0},
            "sort": {"myInt": -1},
            "limit": 10,
            "skip": 100,
            "meta": {"pageMarker": "6050e7f529a90b22dc47f19f"},
        })
    );
    assert_eq!(q.sort_dir("myInt"), Some(Dir::Desc));
}

#[test]
fn translation_is_idempotent() {
    let registry = full_registry();
    let params = parse_query_string("myInt=gt:1&id=6050e7f529a90b22dc47f19e&sort=myFloat&myFloat=2");
    let first = registry.process(&params);
    let second = registry.process(&params);
    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());
}

#[test]
fn custom_reserved_names() {
    let registry = Registry::builder()
        .reserved(ReservedNames::new("lmt", "skp", "srt", "prj"))
        .field(Field::new("limit").integer().sortable())
        .build()
        .unwrap();
    let q = registry.process(&[("limit", "5"), ("lmt", "2"), ("srt", "-limit")]);
    assert_eq!(q.limit(), 2);
    assert_eq!(
        q.filter()["limit"].get("$eq"),
        Some(&Operand::Value(Value::from(5i64)))
    );
    assert_eq!(q.sort(), [OrderBy::desc("limit")]);
}

#[test]
fn processor_function_is_reusable_across_threads() {
    let translate = processor::<HashMap<String, String>>(full_registry());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let translate = translate.clone();
            std::thread::spawn(move || {
                let params = HashMap::from([("myInt".to_string(), format!("gte:{i}"))]);
                translate(&params)
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let q = handle.join().unwrap();
        assert_eq!(
            q.filter()["myInt"].get("$gte"),
            Some(&Operand::Value(Value::from(i as i64)))
        );
    }
}

#[test]
fn processor_handle_shares_registry() {
    let processor = Processor::new(full_registry());
    let clone = processor.clone();
    assert_eq!(processor.registry().len(), clone.registry().len());
    let q = clone.process(&[("myBool", "t")]);
    assert_eq!(
        q.filter()["myBool"].get("$eq"),
        Some(&Operand::Value(Value::Bool(true)))
    );
}
