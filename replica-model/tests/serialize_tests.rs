use pretty_assertions::assert_eq;
use replica_model::{Context, Definition, PropertySpec};
use serde_json::json;

fn item_definition() -> Definition {
    Definition::builder("item")
        .property("name", PropertySpec::string())
        .build()
}

fn list_definition() -> Definition {
    Definition::builder("list")
        .property("title", PropertySpec::string())
        .property("count", PropertySpec::number())
        .has_many("items", &item_definition())
        .build()
}

// ── Shallow ──────────────────────────────────────────────────────

#[test]
fn serialize_round_trips_enumerable_scalars() {
    let context = Context::new();
    let list = list_definition()
        .create(&context, json!({"title": "groceries", "count": 3}))
        .unwrap();

    assert_eq!(list.serialize(), json!({"title": "groceries", "count": 3}));
}

#[test]
fn absent_properties_are_omitted() {
    let context = Context::new();
    let list = list_definition()
        .create(&context, json!({"title": "only"}))
        .unwrap();

    assert_eq!(list.serialize(), json!({"title": "only"}));
}

#[test]
fn builtins_and_id_stay_out_of_the_record() {
    let context = Context::new();
    let list = list_definition()
        .create(&context, json!({"id": "l1", "title": "t"}))
        .unwrap();
    list.set_edit(true).unwrap();

    let record = list.serialize();
    let record = record.as_object().unwrap();
    assert!(!record.contains_key("id"));
    assert!(!record.contains_key("edit"));
    assert!(!record.contains_key("locked"));
}

#[test]
fn explicitly_hidden_properties_are_excluded() {
    let context = Context::new();
    let def = Definition::builder("secretive")
        .property("visible", PropertySpec::string())
        .property("internal", PropertySpec::string().hidden())
        .build();

    let instance = def.create(&context, json!({"visible": "yes"})).unwrap();
    instance.set("internal", "no").unwrap();

    assert_eq!(instance.serialize(), json!({"visible": "yes"}));
}

#[test]
fn values_are_read_through_their_getters() {
    let context = Context::new();
    let def = Definition::builder("shaped")
        .property(
            "label",
            PropertySpec::string().with_get(|value| match value.as_str() {
                Some(text) => replica_model::Value::from(format!("#{text}")),
                None => value,
            }),
        )
        .build();

    let instance = def.create(&context, json!({"label": "tag"})).unwrap();
    assert_eq!(instance.serialize(), json!({"label": "#tag"}));
}

#[test]
fn shallow_serialization_ignores_relations() {
    let context = Context::new();
    let list = list_definition()
        .create(&context, json!({"title": "t", "items": [{"name": "a"}]}))
        .unwrap();

    assert_eq!(list.serialize(), json!({"title": "t"}));
}

// ── Deep ─────────────────────────────────────────────────────────

#[test]
fn deep_serialization_includes_children_in_construction_order() {
    let context = Context::new();
    let list = list_definition()
        .create(
            &context,
            json!({"title": "t", "items": [{"name": "a"}, {"name": "b"}]}),
        )
        .unwrap();

    assert_eq!(
        list.serialize_deep(),
        json!({"title": "t", "items": [{"name": "a"}, {"name": "b"}]})
    );
}

#[test]
fn deep_serialization_recurses_through_nested_relations() {
    let context = Context::new();
    let comment = Definition::builder("comment")
        .property("body", PropertySpec::string())
        .build();
    let post = Definition::builder("post")
        .property("title", PropertySpec::string())
        .has_many("comments", &comment)
        .build();
    let blog = Definition::builder("blog").has_many("posts", &post).build();

    let instance = blog
        .create(
            &context,
            json!({"posts": [{"title": "hello", "comments": [{"body": "first!"}]}]}),
        )
        .unwrap();

    assert_eq!(
        instance.serialize_deep(),
        json!({"posts": [{"title": "hello", "comments": [{"body": "first!"}]}]})
    );
}

#[test]
fn deep_serialization_shows_empty_relations_as_empty_arrays() {
    let context = Context::new();
    let list = list_definition()
        .create(&context, json!({"title": "t"}))
        .unwrap();

    assert_eq!(list.serialize_deep(), json!({"title": "t", "items": []}));
}

#[test]
fn has_one_children_are_not_recursed() {
    let context = Context::new();
    let person = Definition::builder("person")
        .property("name", PropertySpec::string())
        .build();
    let task = Definition::builder("task")
        .property("summary", PropertySpec::string())
        .has_one("assignee", &person)
        .build();

    let instance = task
        .create(
            &context,
            json!({"summary": "s", "assignee": {"name": "Alice"}}),
        )
        .unwrap();

    assert_eq!(instance.serialize_deep(), json!({"summary": "s"}));
}

#[test]
fn model_valued_properties_flatten_to_records() {
    let context = Context::new();
    let author = Definition::builder("author")
        .property("name", PropertySpec::string())
        .build();
    let post = Definition::builder("post")
        .property("author", PropertySpec::model(author.clone()))
        .build();

    let instance = post.create(&context, json!({})).unwrap();
    let alice = author.create(&context, json!({"name": "Alice"})).unwrap();
    instance.set("author", alice).unwrap();

    assert_eq!(instance.serialize(), json!({"author": {"name": "Alice"}}));
}
