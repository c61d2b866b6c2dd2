use std::collections::HashMap;

/// Property key marking a tile as traversable.
pub const WALKABLE: &str = "walkable";

/// A typed property value, kept as the string the map document carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Type tag such as `string`, `bool`, `int`.
    pub kind: String,
    /// Value as written in the document.
    pub value: String,
}

impl Property {
    /// A property with an explicit type tag.
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Property {
            kind: kind.into(),
            value: value.into(),
        }
    }

    /// Shorthand for a `string` typed property.
    pub fn string(value: impl Into<String>) -> Self {
        Property::new("string", value)
    }
}

/// Named properties attached to a level, layer, tile or object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties(HashMap<String, Property>);

impl Properties {
    /// An empty property map.
    pub fn new() -> Self {
        Properties(HashMap::new())
    }

    /// Inserts or replaces a property, returning the old one.
    pub fn insert(&mut self, name: impl Into<String>, property: Property) -> Option<Property> {
        self.0.insert(name.into(), property)
    }

    /// Property by name.
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.0.get(name)
    }

    /// Raw string value of a property.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(|p| p.value.as_str())
    }

    /// True only when the property exists with the exact value `"true"`.
    pub fn is_true(&self, name: &str) -> bool {
        self.value(name) == Some("true")
    }

    /// Whether `walkable` is exactly `"true"`.
    pub fn is_walkable(&self) -> bool {
        self.is_true(WALKABLE)
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no properties.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Name and property pairs, unordered.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Property)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, Property)> for Properties {
    fn from_iter<I: IntoIterator<Item = (String, Property)>>(iter: I) -> Self {
        Properties(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walkable(value: &str) -> Properties {
        let mut props = Properties::new();
        props.insert(WALKABLE, Property::new("bool", value));
        props
    }

    #[test]
    fn walkable_requires_exact_true() {
        assert!(walkable("true").is_walkable());
        assert!(!walkable("True").is_walkable());
        assert!(!walkable("1").is_walkable());
        assert!(!walkable("").is_walkable());
        assert!(!Properties::new().is_walkable());
    }

    #[test]
    fn value_ignores_type_tag() {
        let mut props = Properties::new();
        props.insert("theme", Property::string("forest"));
        assert_eq!(props.value("theme"), Some("forest"));
        assert_eq!(props.get("theme").map(|p| p.kind.as_str()), Some("string"));
        assert_eq!(props.value("missing"), None);
    }
}
