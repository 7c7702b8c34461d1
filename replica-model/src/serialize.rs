//! Flattening instances back into plain records.

use crate::instance::Instance;

impl Instance {
    /// Flattens every enumerable declared property into a plain JSON record.
    ///
    /// Values are read through their getters; absent properties are omitted.
    /// Nested model values flatten to their own shallow records.
    #[must_use]
    pub fn serialize(&self) -> serde_json::Value {
        let mut record = serde_json::Map::new();
        for (name, spec) in self.definition().properties() {
            if !spec.enumerable {
                continue;
            }
            let value = self.get(name);
            if value.is_absent() {
                continue;
            }
            record.insert(name.clone(), value.to_json());
        }
        serde_json::Value::Object(record)
    }

    /// Serializes the instance and, per has-many relationship, the array of
    /// its children's records in construction order, recursively.
    ///
    /// Has-one children are not recursed into; a concrete schema that wants
    /// them serialized declares an enumerable model-typed property instead.
    #[must_use]
    pub fn serialize_deep(&self) -> serde_json::Value {
        let mut root = self.serialize();
        if let Some(record) = root.as_object_mut() {
            for name in self.definition().has_many().keys() {
                if let Some(collection) = self.children(name) {
                    let children: Vec<serde_json::Value> = collection
                        .items()
                        .iter()
                        .map(Instance::serialize_deep)
                        .collect();
                    record.insert(name.clone(), serde_json::Value::Array(children));
                }
            }
        }
        root
    }
}
