//! Generic composite node.
//!
//! `ShapeComposite` and `LightComposite` are both a `Composite` over their
//! capability's trait object. The traversal is the same fold over an ordered
//! list of children; the capability impls only choose how answers combine
//! (nearest hit for shapes, sum for lights).

/// An ordered list of children of the same capability.
pub struct Composite<T: ?Sized> {
    children: Vec<Box<T>>,
}

impl<T: ?Sized> Composite<T> {
    /// Create a new empty composite.
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
        }
    }

    /// Add a child.
    pub fn add(&mut self, child: Box<T>) {
        self.children.push(child);
    }

    /// Builder-style [`Composite::add`].
    pub fn with(mut self, child: Box<T>) -> Self {
        self.add(child);
        self
    }

    /// Get the number of direct children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Check if the composite has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Iterate over the direct children in order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.children.iter().map(|c| c.as_ref())
    }

    /// Fold over the children in order.
    pub fn reduce<'a, A>(&'a self, init: A, mut f: impl FnMut(A, &'a T) -> A) -> A {
        self.children.iter().fold(init, |acc, child| f(acc, child.as_ref()))
    }
}

impl<T: ?Sized> Default for Composite<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> FromIterator<Box<T>> for Composite<T> {
    fn from_iter<I: IntoIterator<Item = Box<T>>>(iter: I) -> Self {
        Self {
            children: iter.into_iter().collect(),
        }
    }
}

impl<T: ?Sized> Extend<Box<T>> for Composite<T> {
    fn extend<I: IntoIterator<Item = Box<T>>>(&mut self, iter: I) {
        self.children.extend(iter);
    }
}
