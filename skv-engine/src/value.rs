//! Tagged value shapes stored under one keyspace.

use std::collections::VecDeque;

use hashbrown::HashMap;

/// The three shapes a key can hold. The shape is fixed for the lifetime of a
/// key; changing it requires deleting and re-setting the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Scalar(String),
    List(VecDeque<String>),
    Map(HashMap<String, String>),
}

impl Value {
    pub(crate) fn as_scalar(&self) -> Option<&str> {
        match self {
            Value::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub(crate) fn as_list(&self) -> Option<&VecDeque<String>> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    pub(crate) fn as_list_mut(&mut self) -> Option<&mut VecDeque<String>> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    pub(crate) fn as_map(&self) -> Option<&HashMap<String, String>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub(crate) fn as_map_mut(&mut self) -> Option<&mut HashMap<String, String>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }
}
