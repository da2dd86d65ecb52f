use crate::types::{Symbol, Value};
use itertools::Itertools;
use std::fmt;
use std::rc::Rc;

#[derive(Debug)]
pub struct UnknownSymbol(pub Symbol);

struct Binding {
    name: Symbol,
    value: Value,
    next: Environment,
}

/// An ordered list of bindings where the most recently added binding for a
/// name shadows any older ones.
///
/// Nodes are shared and never mutated, so cloning an `Environment` is a cheap
/// snapshot: extending the clone leaves the original untouched.
#[derive(Clone, Default)]
pub struct Environment {
    head: Option<Rc<Binding>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new environment with one binding in front of `self`.
    pub fn extended(&self, name: Symbol, value: Value) -> Self {
        Self {
            head: Some(Rc::new(Binding {
                name,
                value,
                next: self.clone(),
            })),
        }
    }

    /// Shadows `name` in place. Existing snapshots of `self` keep seeing the
    /// old bindings.
    pub fn prepend(&mut self, name: Symbol, value: Value) {
        *self = self.extended(name, value);
    }

    pub fn get(&self, name: &Symbol) -> Option<&Value> {
        self.iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    pub fn fetch(&self, name: &Symbol) -> Result<Value, UnknownSymbol> {
        self.get(name)
            .cloned()
            .ok_or_else(|| UnknownSymbol(name.clone()))
    }

    pub fn iter(&self) -> Iter {
        Iter {
            next: self.head.as_deref(),
        }
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }
}

pub struct Iter<'a> {
    next: Option<&'a Binding>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a Symbol, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        let binding = self.next?;
        self.next = binding.next.head.as_deref();
        Some((&binding.name, &binding.value))
    }
}

impl Drop for Environment {
    // The default drop is recursive along the chain, which overflows the stack
    // for long-lived sessions with many definitions.
    fn drop(&mut self) {
        let mut next = self.head.take();
        while let Some(binding) = next {
            match Rc::try_unwrap(binding) {
                Ok(mut binding) => next = binding.next.head.take(),
                Err(_) => break,
            }
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}]",
            self.iter().map(|(name, _)| name).join(", ")
        )
    }
}

impl fmt::Debug for Environment {
    // Values are skipped: closures hold environments of their own.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment{}", self)
    }
}
