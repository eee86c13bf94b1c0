//! Palette and group aggregate
//!
//! Pure ordered containers. Nothing here sorts, deduplicates or enforces
//! unique names; insertion order is serialization order.

use crate::color::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identity of a [`Group`], independent of its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(Uuid);

impl GroupId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GroupId {
    fn default() -> Self {
        Self::generate()
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordered list of colors, usually named.
///
/// An absent name and an empty name are distinct, since some formats store
/// both. Two groups compare equal when their names and colors match; the
/// [`GroupId`] is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    #[serde(skip)]
    id: GroupId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default)]
    colors: Vec<Color>,
}

impl Group {
    pub fn new(name: impl Into<String>, colors: Vec<Color>) -> Self {
        Self {
            id: GroupId::generate(),
            name: Some(name.into()),
            colors,
        }
    }

    pub fn unnamed(colors: Vec<Color>) -> Self {
        Self {
            id: GroupId::generate(),
            name: None,
            colors,
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn push_color(&mut self, color: Color) {
        self.colors.push(color);
    }

    /// Removes the color at `index`, or returns `None` when out of bounds.
    pub fn remove_color(&mut self, index: usize) -> Option<Color> {
        (index < self.colors.len()).then(|| self.colors.remove(index))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for Group {
    fn default() -> Self {
        Self::unnamed(Vec::new())
    }
}

impl PartialEq for Group {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.colors == other.colors
    }
}

/// Layout details of a decoded file that the palette model does not
/// otherwise carry. Coders consult it so that re-encoding reproduces the
/// input bytes.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SourceLayout {
    /// The file had an ACO version 2 section, even if every name in it was empty.
    pub(crate) aco_name_section: bool,
}

/// The root aggregate: ungrouped colors, groups and a pool of global colors.
///
/// Equality covers the name and the three color lists only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default)]
    colors: Vec<Color>,
    #[serde(default)]
    groups: Vec<Group>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    global_colors: Vec<Color>,
    #[serde(skip)]
    layout: SourceLayout,
}

impl PartialEq for Palette {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.colors == other.colors
            && self.groups == other.groups
            && self.global_colors == other.global_colors
    }
}

impl Palette {
    /// Creates an empty, unnamed palette.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    /// Ungrouped colors, in order.
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn global_colors(&self) -> &[Color] {
        &self.global_colors
    }

    pub fn push_color(&mut self, color: Color) {
        self.colors.push(color);
    }

    /// Inserts an ungrouped color, clamping `index` to the end of the list.
    pub fn insert_color(&mut self, index: usize, color: Color) {
        let index = index.min(self.colors.len());
        self.colors.insert(index, color);
    }

    pub fn remove_color(&mut self, index: usize) -> Option<Color> {
        (index < self.colors.len()).then(|| self.colors.remove(index))
    }

    pub fn push_group(&mut self, group: Group) {
        self.groups.push(group);
    }

    pub fn remove_group(&mut self, index: usize) -> Option<Group> {
        (index < self.groups.len()).then(|| self.groups.remove(index))
    }

    /// Mutable access to a group by index.
    pub fn group_mut(&mut self, index: usize) -> Option<&mut Group> {
        self.groups.get_mut(index)
    }

    /// Finds a group by its identity.
    pub fn group_by_id(&self, id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|group| group.id == id)
    }

    pub fn push_global_color(&mut self, color: Color) {
        self.global_colors.push(color);
    }

    pub fn remove_global_color(&mut self, index: usize) -> Option<Color> {
        (index < self.global_colors.len()).then(|| self.global_colors.remove(index))
    }

    /// Ungrouped colors followed by every group's colors, in order.
    ///
    /// Global colors are not included.
    pub fn all_colors(&self) -> impl Iterator<Item = &Color> {
        self.colors
            .iter()
            .chain(self.groups.iter().flat_map(|group| group.colors.iter()))
    }

    pub fn total_color_count(&self) -> usize {
        self.colors.len() + self.groups.iter().map(Group::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty() && self.groups.is_empty() && self.global_colors.is_empty()
    }

    pub(crate) fn layout(&self) -> SourceLayout {
        self.layout
    }

    pub(crate) fn set_layout(&mut self, layout: SourceLayout) {
        self.layout = layout;
    }
}
