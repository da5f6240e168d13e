use crate::error::AttrError;
use hashbrown::HashSet;
use indexmap::IndexMap;
use std::sync::Arc;

/// Value of an attribute: one scalar for the common case, or a fixed ordered
/// sequence when the attribute is multi-valued.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttrValue {
    Single(Box<str>),
    Multi(Box<[Box<str>]>),
}

impl AttrValue {
    /// Builds a value from a sequence, collapsing a single element to a scalar.
    ///
    /// An empty sequence yields an empty `Multi`, which [`Attribute::new`]
    /// rejects.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Box<str>>,
    {
        let mut values: Vec<Box<str>> = values.into_iter().map(Into::into).collect();
        if values.len() == 1 {
            if let Some(value) = values.pop() {
                return AttrValue::Single(value);
            }
        }
        AttrValue::Multi(values.into_boxed_slice())
    }

    /// All values, a scalar being a one-element slice.
    #[inline(always)]
    pub fn as_slice(&self) -> &[Box<str>] {
        match self {
            AttrValue::Single(value) => std::slice::from_ref(value),
            AttrValue::Multi(values) => values,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.as_slice().iter().map(|v| v.as_ref())
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.as_slice().get(idx).map(|v| v.as_ref())
    }

    /// The scalar, or `None` when multi-valued.
    pub fn as_single(&self) -> Option<&str> {
        match self {
            AttrValue::Single(value) => Some(value),
            AttrValue::Multi(_) => None,
        }
    }

    /// Appends `other` after `self`, keeping arrival order and duplicates.
    pub fn concat(&self, other: &AttrValue) -> AttrValue {
        let merged = self
            .as_slice()
            .iter()
            .chain(other.as_slice())
            .cloned()
            .collect::<Vec<_>>();
        AttrValue::from_values(merged)
    }

    fn normalize(self) -> Self {
        match self {
            AttrValue::Multi(values) if values.len() == 1 => {
                AttrValue::from_values(values.into_vec())
            }
            value => value,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Single(value.into())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Single(value.into_boxed_str())
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(values: Vec<String>) -> Self {
        AttrValue::from_values(values)
    }
}

impl From<Vec<&str>> for AttrValue {
    fn from(values: Vec<&str>) -> Self {
        AttrValue::from_values(values)
    }
}

/// Immutable name/value pair of column 9.
///
/// Equality and hashing cover both name and value, which is what makes
/// instances shareable through an [`AttrCache`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute {
    name: Box<str>,
    value: AttrValue,
}

impl Attribute {
    pub fn new(name: impl Into<Box<str>>, value: impl Into<AttrValue>) -> Result<Self, AttrError> {
        let name = name.into();
        if name.is_empty() {
            return Err(AttrError::EmptyName);
        }

        let value = value.into().normalize();
        if value.is_empty() {
            return Err(AttrError::NoValues(name.into_string()));
        }

        Ok(Self { name, value })
    }

    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    pub fn value(&self) -> &AttrValue {
        &self.value
    }

    /// Number of values, 1 for a scalar.
    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn is_multi(&self) -> bool {
        matches!(self.value, AttrValue::Multi(_))
    }

    /// Value by index; index 0 of a scalar is the scalar itself.
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.value.get(idx)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.value.iter()
    }
}

/// Session-scoped pool of shared [`Attribute`] instances.
///
/// Annotation files repeat the same attributes (`gene_type`, `level`, `tag`)
/// millions of times; interning stores each distinct pair once.
#[derive(Debug, Default)]
pub struct AttrCache {
    attrs: HashSet<Arc<Attribute>>,
}

impl AttrCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the pooled instance equal to `attr`, pooling `attr` on a miss.
    pub fn intern(&mut self, attr: Attribute) -> Arc<Attribute> {
        if let Some(hit) = self.attrs.get(&attr) {
            return Arc::clone(hit);
        }

        let attr = Arc::new(attr);
        self.attrs.insert(Arc::clone(&attr));
        attr
    }

    /// Number of distinct attributes pooled so far.
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn clear(&mut self) {
        self.attrs.clear();
    }
}

/// Attributes of one record, in the order their names first appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttrSet {
    attrs: IndexMap<Box<str>, Arc<Attribute>>,
}

impl AttrSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `value` under `name`, merging with an existing attribute of the
    /// same name by appending the new value(s).
    ///
    /// When `cache` is given the stored instance is the interned one.
    ///
    /// # Example
    ///
    /// ```rust
    /// use gxfgenie::{AttrCache, AttrSet};
    ///
    /// let mut cache = AttrCache::new();
    /// let mut attrs = AttrSet::new();
    /// attrs.add("tag", "basic", Some(&mut cache)).unwrap();
    /// let tag = attrs.add("tag", "CCDS", Some(&mut cache)).unwrap();
    /// assert_eq!(tag.values().collect::<Vec<_>>(), ["basic", "CCDS"]);
    /// ```
    pub fn add(
        &mut self,
        name: &str,
        value: impl Into<AttrValue>,
        cache: Option<&mut AttrCache>,
    ) -> Result<Arc<Attribute>, AttrError> {
        let value = value.into();
        if value.is_empty() {
            return Err(AttrError::NoValues(name.to_string()));
        }

        let attr = match self.attrs.get(name) {
            Some(prev) => Attribute::new(name, prev.value().concat(&value))?,
            None => Attribute::new(name, value)?,
        };

        let attr = match cache {
            Some(cache) => cache.intern(attr),
            None => Arc::new(attr),
        };

        self.attrs.insert(name.into(), Arc::clone(&attr));
        Ok(attr)
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// Attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attrs.values().map(|attr| attr.as_ref())
    }

    /// Shared handle to an attribute, for identity checks.
    pub fn find_shared(&self, name: &str) -> Option<&Arc<Attribute>> {
        self.attrs.get(name)
    }

    pub fn find(&self, name: &str) -> Option<&Attribute> {
        self.attrs.get(name).map(|attr| attr.as_ref())
    }

    pub fn get(&self, name: &str) -> Result<&Attribute, AttrError> {
        self.find(name)
            .ok_or_else(|| AttrError::NotFound(name.to_string()))
    }

    pub fn find_value(&self, name: &str) -> Option<&AttrValue> {
        self.find(name).map(Attribute::value)
    }

    /// Value of a single-valued attribute, `None` if absent.
    pub fn find_value1(&self, name: &str) -> Result<Option<&str>, AttrError> {
        match self.find(name) {
            None => Ok(None),
            Some(attr) => single_value(attr).map(Some),
        }
    }

    /// Value of a single-valued attribute that must be present.
    pub fn get_value1(&self, name: &str) -> Result<&str, AttrError> {
        single_value(self.get(name)?)
    }
}

fn single_value(attr: &Attribute) -> Result<&str, AttrError> {
    attr.value()
        .as_single()
        .ok_or_else(|| AttrError::NotSingleValue {
            name: attr.name().to_string(),
            count: attr.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_arrival_order_and_duplicates() {
        let mut attrs = AttrSet::new();
        attrs.add("tag", "a", None).unwrap();
        attrs.add("tag", "b", None).unwrap();
        assert_eq!(
            attrs.find_value("tag"),
            Some(&AttrValue::from(vec!["a", "b"]))
        );

        attrs.add("tag", "a", None).unwrap();
        let tag = attrs.get("tag").unwrap();
        assert_eq!(tag.values().collect::<Vec<_>>(), ["a", "b", "a"]);
        assert_eq!(tag.len(), 3);
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn test_merge_with_multi_value() {
        let mut attrs = AttrSet::new();
        attrs.add("Parent", "tx1", None).unwrap();
        attrs.add("Parent", vec!["tx2", "tx3"], None).unwrap();
        let parent = attrs.get("Parent").unwrap();
        assert_eq!(parent.values().collect::<Vec<_>>(), ["tx1", "tx2", "tx3"]);
    }

    #[test]
    fn test_single_element_sequence_collapses() {
        let attr = Attribute::new("gene_id", vec!["ENSG00000223972"]).unwrap();
        assert!(!attr.is_multi());
        assert_eq!(attr.value().as_single(), Some("ENSG00000223972"));

        let values: Vec<Box<str>> = vec!["y".into()];
        let attr = Attribute::new("x", AttrValue::Multi(values.into_boxed_slice())).unwrap();
        assert_eq!(attr.value(), &AttrValue::Single("y".into()));
    }

    #[test]
    fn test_indexing() {
        let attr = Attribute::new("level", "2").unwrap();
        assert_eq!(attr.get(0), Some("2"));
        assert_eq!(attr.get(1), None);

        let attr = Attribute::new("tag", vec!["basic", "CCDS"]).unwrap();
        assert_eq!(attr.get(1), Some("CCDS"));
        assert_eq!(attr.get(2), None);
    }

    #[test]
    fn test_construction_misuse() {
        assert_eq!(Attribute::new("", "x"), Err(AttrError::EmptyName));
        assert_eq!(
            Attribute::new("tag", Vec::<String>::new()),
            Err(AttrError::NoValues("tag".to_string()))
        );

        let mut attrs = AttrSet::new();
        attrs.add("tag", "a", None).unwrap();
        assert!(attrs.add("tag", Vec::<&str>::new(), None).is_err());
        assert_eq!(attrs.get("tag").unwrap().len(), 1);
    }

    #[test]
    fn test_interning_shares_instances() {
        let mut cache = AttrCache::new();
        let mut first = AttrSet::new();
        let mut second = AttrSet::new();

        let a = first.add("gene_type", "protein_coding", Some(&mut cache)).unwrap();
        let b = second.add("gene_type", "protein_coding", Some(&mut cache)).unwrap();

        assert_eq!(a, b);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);

        for _ in 0..100 {
            let mut attrs = AttrSet::new();
            attrs.add("gene_type", "protein_coding", Some(&mut cache)).unwrap();
        }
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_interning_merged_values() {
        let mut cache = AttrCache::new();
        let mut attrs = AttrSet::new();
        attrs.add("tag", "basic", Some(&mut cache)).unwrap();
        attrs.add("tag", "CCDS", Some(&mut cache)).unwrap();

        // ("basic") and ("basic", "CCDS")
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_insertion_order() {
        let mut attrs = AttrSet::new();
        attrs.add("gene_id", "g1", None).unwrap();
        attrs.add("transcript_id", "t1", None).unwrap();
        attrs.add("tag", "basic", None).unwrap();
        attrs.add("gene_id", "g2", None).unwrap();

        let names = attrs.iter().map(Attribute::name).collect::<Vec<_>>();
        assert_eq!(names, ["gene_id", "transcript_id", "tag"]);
    }

    #[test]
    fn test_single_value_access() {
        let mut attrs = AttrSet::new();
        attrs.add("gene_id", "g1", None).unwrap();
        attrs.add("tag", vec!["a", "b"], None).unwrap();

        assert_eq!(attrs.get_value1("gene_id"), Ok("g1"));
        assert_eq!(attrs.find_value1("missing"), Ok(None));
        assert_eq!(
            attrs.get_value1("missing"),
            Err(AttrError::NotFound("missing".to_string()))
        );
        assert_eq!(
            attrs.find_value1("tag"),
            Err(AttrError::NotSingleValue {
                name: "tag".to_string(),
                count: 2
            })
        );
    }
}
