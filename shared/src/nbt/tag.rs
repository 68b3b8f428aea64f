use std::collections::BTreeMap;

/// Wire ids of each tag kind.
pub mod tag_id {
    pub const END: u8 = 0;
    pub const BYTE: u8 = 1;
    pub const SHORT: u8 = 2;
    pub const INT: u8 = 3;
    pub const LONG: u8 = 4;
    pub const FLOAT: u8 = 5;
    pub const DOUBLE: u8 = 6;
    pub const BYTE_ARRAY: u8 = 7;
    pub const STRING: u8 = 8;
    pub const LIST: u8 = 9;
    pub const COMPOUND: u8 = 10;
    pub const INT_ARRAY: u8 = 11;
    pub const LONG_ARRAY: u8 = 12;
}

/// One node of a named-binary-tag tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    /// Elements of a list all share one tag id; an empty list carries `END`.
    List(TagList),
    Compound(Compound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl Tag {
    pub fn id(&self) -> u8 {
        match self {
            Tag::Byte(_) => tag_id::BYTE,
            Tag::Short(_) => tag_id::SHORT,
            Tag::Int(_) => tag_id::INT,
            Tag::Long(_) => tag_id::LONG,
            Tag::Float(_) => tag_id::FLOAT,
            Tag::Double(_) => tag_id::DOUBLE,
            Tag::ByteArray(_) => tag_id::BYTE_ARRAY,
            Tag::String(_) => tag_id::STRING,
            Tag::List(_) => tag_id::LIST,
            Tag::Compound(_) => tag_id::COMPOUND,
            Tag::IntArray(_) => tag_id::INT_ARRAY,
            Tag::LongArray(_) => tag_id::LONG_ARRAY,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Tag::Compound(compound) => Some(compound),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&TagList> {
        match self {
            Tag::List(list) => Some(list),
            _ => None,
        }
    }
}

/// A homogeneous list of tags.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TagList {
    element_id: u8,
    elements: Vec<Tag>,
}

impl TagList {
    pub fn new() -> Self {
        Self {
            element_id: tag_id::END,
            elements: Vec::new(),
        }
    }

    pub(crate) fn from_parts(element_id: u8, elements: Vec<Tag>) -> Self {
        Self {
            element_id,
            elements,
        }
    }

    pub fn element_id(&self) -> u8 {
        self.element_id
    }

    /// Appends `tag`, returning false (and leaving the list untouched) if its kind differs
    /// from the kinds already in the list.
    pub fn push(&mut self, tag: Tag) -> bool {
        if self.elements.is_empty() {
            self.element_id = tag.id();
        } else if tag.id() != self.element_id {
            return false;
        }
        self.elements.push(tag);
        true
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.elements.iter()
    }

    pub fn compounds(&self) -> impl Iterator<Item = &Compound> {
        self.elements.iter().filter_map(Tag::as_compound)
    }
}

impl FromIterator<Tag> for TagList {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        let mut list = TagList::new();
        for tag in iter {
            list.push(tag);
        }
        list
    }
}

/// A compound tag: named children. Getters return `None` when the key is missing or holds
/// a different kind.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Compound {
    entries: BTreeMap<String, Tag>,
}

impl Compound {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, tag: Tag) -> Option<Tag> {
        self.entries.insert(key.into(), tag)
    }

    pub fn with(mut self, key: impl Into<String>, tag: Tag) -> Self {
        self.insert(key, tag);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.entries.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Tag> {
        self.entries.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Tag)> {
        self.entries.iter()
    }

    pub fn get_int(&self, key: &str) -> Option<i32> {
        match self.get(key)? {
            Tag::Byte(value) => Some(i32::from(*value)),
            Tag::Short(value) => Some(i32::from(*value)),
            Tag::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn get_long(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            Tag::Byte(value) => Some(i64::from(*value)),
            Tag::Short(value) => Some(i64::from(*value)),
            Tag::Int(value) => Some(i64::from(*value)),
            Tag::Long(value) => Some(*value),
            _ => None,
        }
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get_int(key).map(|value| value != 0)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            Tag::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn get_int_array(&self, key: &str) -> Option<&[i32]> {
        match self.get(key)? {
            Tag::IntArray(value) => Some(value),
            _ => None,
        }
    }

    pub fn get_list(&self, key: &str) -> Option<&TagList> {
        self.get(key)?.as_list()
    }

    pub fn get_compound(&self, key: &str) -> Option<&Compound> {
        self.get(key)?.as_compound()
    }
}
