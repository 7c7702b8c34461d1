//! The layered value store backing each instance.
//!
//! Every assignment pushes a new frame onto the property's stack; reads see
//! the top frame. Earlier frames are retained so the write history of a
//! property stays inspectable within the instance's lifetime.

use std::collections::HashMap;

use crate::value::Value;

#[derive(Debug, Default)]
pub(crate) struct LayeredStore {
    frames: HashMap<String, Vec<Value>>,
}

impl LayeredStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Pushes a new value frame for `name`.
    pub(crate) fn layer(&mut self, name: &str, value: Value) {
        self.frames.entry(name.to_string()).or_default().push(value);
    }

    /// The current (topmost) value for `name`, if any frame exists.
    pub(crate) fn current(&self, name: &str) -> Option<&Value> {
        self.frames.get(name).and_then(|stack| stack.last())
    }

    /// Number of frames layered for `name`.
    pub(crate) fn depth(&self, name: &str) -> usize {
        self.frames.get(name).map_or(0, Vec::len)
    }
}
