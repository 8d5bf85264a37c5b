//! Port declarations attached to primitive symbols and edge labels.

use circuit_utils::Id;

/// A single typed port: a bit width and an optional display name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Port {
    width: usize,
    name: Option<Id>,
}

impl Port {
    pub fn new(width: usize) -> Self {
        assert!(width >= 1, "port width must be >= 1");
        Port { width, name: None }
    }

    pub fn named(width: usize, name: impl Into<Id>) -> Self {
        assert!(width >= 1, "port width must be >= 1");
        Port {
            width,
            name: Some(name.into()),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn name(&self) -> Option<&Id> {
        self.name.as_ref()
    }
}
