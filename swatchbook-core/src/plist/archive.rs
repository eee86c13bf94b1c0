//! `NSKeyedArchiver` object graphs
//!
//! A keyed archive is a property list with a flat `$objects` table. Objects
//! point at each other with UIDs (indexes into that table), `$top.root`
//! names the root object and UID 0 is the `$null` placeholder. Class
//! information lives in separate `{$classname, $classes}` dictionaries
//! referenced through each object's `$class` key.

use super::{parse, to_bytes, PlistDictionary, PlistValue};
use crate::error::{PaletteError, Result};
use std::collections::HashMap;

const ARCHIVER: &str = "NSKeyedArchiver";
const ARCHIVE_VERSION: i64 = 100_000;
const NULL: &str = "$null";

fn structure_error(message: impl Into<String>) -> PaletteError {
    PaletteError::UnsupportedStructure(format!("keyed archive: {}", message.into()))
}

/// Read access to a decoded keyed archive.
#[derive(Debug, Clone)]
pub struct KeyedArchive {
    objects: Vec<PlistValue>,
    root: u64,
}

impl KeyedArchive {
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let plist = parse(data)?;
        let top = plist
            .as_dictionary()
            .ok_or_else(|| structure_error("top level is not a dictionary"))?;

        match top.get("$archiver").and_then(PlistValue::as_str) {
            Some(ARCHIVER) => {}
            Some(other) => {
                return Err(PaletteError::UnrecognizedFormat(format!(
                    "unsupported archiver {other}"
                )))
            }
            None => return Err(structure_error("missing $archiver")),
        }

        let objects = top
            .get("$objects")
            .and_then(PlistValue::as_array)
            .ok_or_else(|| structure_error("missing $objects"))?
            .to_vec();
        let root = top
            .get("$top")
            .and_then(PlistValue::as_dictionary)
            .and_then(|t| t.get("root"))
            .and_then(PlistValue::as_uid)
            .ok_or_else(|| structure_error("missing $top.root"))?;

        let archive = Self { objects, root };
        archive.object(root)?;
        Ok(archive)
    }

    pub fn root(&self) -> Result<&PlistDictionary> {
        self.dictionary(self.root)
    }

    /// The object for `uid`, or `None` for the `$null` placeholder.
    pub fn object(&self, uid: u64) -> Result<Option<&PlistValue>> {
        let object = usize::try_from(uid)
            .ok()
            .and_then(|index| self.objects.get(index))
            .ok_or_else(|| structure_error(format!("UID {uid} out of range")))?;
        match object {
            PlistValue::String(s) if s == NULL => Ok(None),
            other => Ok(Some(other)),
        }
    }

    pub fn dictionary(&self, uid: u64) -> Result<&PlistDictionary> {
        self.object(uid)?
            .and_then(PlistValue::as_dictionary)
            .ok_or_else(|| structure_error(format!("object {uid} is not a dictionary")))
    }

    /// Follows the UID stored under `key`. Missing keys resolve to `None`.
    pub fn resolve<'a>(
        &'a self,
        dict: &'a PlistDictionary,
        key: &str,
    ) -> Result<Option<&'a PlistValue>> {
        match dict.get(key) {
            None => Ok(None),
            Some(PlistValue::Uid(uid)) => self.object(*uid),
            Some(inline) => Ok(Some(inline)),
        }
    }

    /// Name of the class referenced by the object's `$class` key.
    pub fn class_name<'a>(&'a self, dict: &'a PlistDictionary) -> Result<&'a str> {
        let class = self
            .resolve(dict, "$class")?
            .and_then(PlistValue::as_dictionary)
            .ok_or_else(|| structure_error("object without $class"))?;
        class
            .get("$classname")
            .and_then(PlistValue::as_str)
            .ok_or_else(|| structure_error("class without $classname"))
    }

    /// Elements of an `NSArray` stored under `key`, each resolved.
    pub fn array<'a>(
        &'a self,
        dict: &'a PlistDictionary,
        key: &str,
    ) -> Result<Vec<Option<&'a PlistValue>>> {
        let array = self
            .resolve(dict, key)?
            .and_then(PlistValue::as_dictionary)
            .ok_or_else(|| structure_error(format!("missing array {key}")))?;
        let items = array
            .get("NS.objects")
            .and_then(PlistValue::as_array)
            .ok_or_else(|| structure_error(format!("{key} has no NS.objects")))?;
        items
            .iter()
            .map(|item| match item {
                PlistValue::Uid(uid) => self.object(*uid),
                inline => Ok(Some(inline)),
            })
            .collect()
    }
}

/// Builds the `$objects` table of a keyed archive.
#[derive(Debug)]
pub struct ArchiveBuilder {
    objects: Vec<PlistValue>,
    classes: HashMap<String, u64>,
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self {
            objects: vec![PlistValue::from(NULL)],
            classes: HashMap::new(),
        }
    }

    /// Reserves a slot to be filled later with [`ArchiveBuilder::set`].
    pub fn reserve(&mut self) -> u64 {
        self.add(PlistValue::from(NULL))
    }

    pub fn set(&mut self, uid: u64, value: impl Into<PlistValue>) {
        if let Some(slot) = self.objects.get_mut(uid as usize) {
            *slot = value.into();
        }
    }

    pub fn add(&mut self, value: impl Into<PlistValue>) -> u64 {
        self.objects.push(value.into());
        (self.objects.len() - 1) as u64
    }

    /// UID of the class dictionary for `name`, added on first use.
    pub fn class(&mut self, name: &str, superclasses: &[&str]) -> u64 {
        if let Some(uid) = self.classes.get(name) {
            return *uid;
        }
        let mut class = PlistDictionary::new();
        class.set("$classname", name);
        let mut chain = vec![PlistValue::from(name)];
        chain.extend(superclasses.iter().map(|s| PlistValue::from(*s)));
        class.set("$classes", PlistValue::Array(chain));

        let uid = self.add(class);
        self.classes.insert(name.to_string(), uid);
        uid
    }

    /// Adds an `NSArray` of UIDs and returns its UID.
    pub fn array(&mut self, items: Vec<u64>) -> u64 {
        let class = self.class("NSArray", &["NSObject"]);
        let mut array = PlistDictionary::new();
        array.set(
            "NS.objects",
            PlistValue::Array(items.into_iter().map(PlistValue::Uid).collect()),
        );
        array.set("$class", PlistValue::Uid(class));
        self.add(array)
    }

    pub fn finish(self, root: u64) -> Result<Vec<u8>> {
        let mut top = PlistDictionary::new();
        top.set("root", PlistValue::Uid(root));

        let mut archive = PlistDictionary::new();
        archive.set("$version", ARCHIVE_VERSION);
        archive.set("$archiver", ARCHIVER);
        archive.set("$top", top);
        archive.set("$objects", PlistValue::Array(self.objects));
        to_bytes(&PlistValue::Dictionary(archive))
    }
}
