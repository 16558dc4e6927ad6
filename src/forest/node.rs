//! Project status tree.
//!
//! A node either carries a status payload (information text and three alert
//! lists), children, or both. Its JSON form is a single object: the payload
//! fields sit next to one key per child, so `{"information": "...",
//! "critical": [], "small": [], "advancements": [], "Gate": {...}}` is a mixed
//! node with one child.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::types::AlertCategory;

const INFORMATION: &str = "information";
const CRITICAL: &str = "critical";
const SMALL: &str = "small";
const ADVANCEMENTS: &str = "advancements";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPayload {
    pub information: String,
    #[serde(default)]
    pub critical: Vec<String>,
    #[serde(default)]
    pub small: Vec<String>,
    #[serde(default)]
    pub advancements: Vec<String>,
}

impl StatusPayload {
    pub fn with_information(information: impl Into<String>) -> Self {
        Self {
            information: information.into(),
            ..Self::default()
        }
    }

    /// Files `text` under the list matching `category`. Uncolored text has no list.
    pub fn push_alert(&mut self, category: AlertCategory, text: &str) {
        let list = match category {
            AlertCategory::CriticalAlert => &mut self.critical,
            AlertCategory::SmallAlert => &mut self.small,
            AlertCategory::Advancement => &mut self.advancements,
            AlertCategory::Normal => return,
        };
        push_unique(list, text);
    }

    /// Appends `other` to this payload: information separated by a blank line,
    /// alerts only when not already listed.
    pub fn absorb(&mut self, other: &StatusPayload) {
        if self.information.is_empty() {
            self.information = other.information.clone();
        } else if !other.information.is_empty() {
            self.information.push_str("\n\n");
            self.information.push_str(&other.information);
        }
        extend_unique(&mut self.critical, &other.critical);
        extend_unique(&mut self.small, &other.small);
        extend_unique(&mut self.advancements, &other.advancements);
    }

    pub fn alert_count(&self) -> usize {
        self.critical.len() + self.small.len() + self.advancements.len()
    }
}

fn push_unique(list: &mut Vec<String>, item: &str) {
    if !list.iter().any(|existing| existing == item) {
        list.push(item.to_string());
    }
}

fn extend_unique(list: &mut Vec<String>, items: &[String]) {
    for item in items {
        push_unique(list, item);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectNode {
    Terminal(StatusPayload),
    Intermediate(ProjectMap),
    Mixed {
        status: StatusPayload,
        children: ProjectMap,
    },
}

impl Default for ProjectNode {
    fn default() -> Self {
        Self::intermediate()
    }
}

impl ProjectNode {
    pub fn intermediate() -> Self {
        Self::Intermediate(ProjectMap::new())
    }

    /// Reassembles a node from its parts. A payload without children is
    /// terminal; no payload is intermediate, even with no children.
    pub fn from_parts(status: Option<StatusPayload>, children: ProjectMap) -> Self {
        match status {
            Some(status) if children.is_empty() => Self::Terminal(status),
            Some(status) => Self::Mixed { status, children },
            None => Self::Intermediate(children),
        }
    }

    pub fn into_parts(self) -> (Option<StatusPayload>, ProjectMap) {
        match self {
            Self::Terminal(status) => (Some(status), ProjectMap::new()),
            Self::Intermediate(children) => (None, children),
            Self::Mixed { status, children } => (Some(status), children),
        }
    }

    pub fn status(&self) -> Option<&StatusPayload> {
        match self {
            Self::Terminal(status) | Self::Mixed { status, .. } => Some(status),
            Self::Intermediate(_) => None,
        }
    }

    pub fn has_status(&self) -> bool {
        self.status().is_some()
    }

    pub fn children(&self) -> Option<&ProjectMap> {
        match self {
            Self::Intermediate(children) | Self::Mixed { children, .. } => Some(children),
            Self::Terminal(_) => None,
        }
    }

    pub fn child(&self, name: &str) -> Option<&ProjectNode> {
        self.children().and_then(|children| children.get_ci(name))
    }

    /// Children of this node, turning a terminal node into a mixed one first.
    pub fn children_mut(&mut self) -> &mut ProjectMap {
        if let Self::Terminal(status) = self {
            let status = std::mem::take(status);
            *self = Self::Mixed {
                status,
                children: ProjectMap::new(),
            };
        }
        match self {
            Self::Intermediate(children) | Self::Mixed { children, .. } => children,
            Self::Terminal(_) => unreachable!("terminal nodes were promoted above"),
        }
    }

    /// Gives this node a payload: absorbed into an existing one, or installed
    /// next to the children of an intermediate node.
    pub fn attach_status(&mut self, incoming: StatusPayload) {
        match self {
            Self::Terminal(status) | Self::Mixed { status, .. } => status.absorb(&incoming),
            Self::Intermediate(children) => {
                let children = std::mem::take(children);
                *self = Self::from_parts(Some(incoming), children);
            }
        }
    }
}

impl Serialize for ProjectNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        if let Some(status) = self.status() {
            map.serialize_entry(INFORMATION, &status.information)?;
            map.serialize_entry(CRITICAL, &status.critical)?;
            map.serialize_entry(SMALL, &status.small)?;
            map.serialize_entry(ADVANCEMENTS, &status.advancements)?;
        }
        if let Some(children) = self.children() {
            for (name, node) in children.iter() {
                map.serialize_entry(name, node)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ProjectNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(ProjectNodeVisitor)
    }
}

struct ProjectNodeVisitor;

impl<'de> Visitor<'de> for ProjectNodeVisitor {
    type Value = ProjectNode;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a project node object")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut information: Option<String> = None;
        let mut critical: Option<Vec<String>> = None;
        let mut small: Option<Vec<String>> = None;
        let mut advancements: Option<Vec<String>> = None;
        let mut children = ProjectMap::new();

        while let Some(key) = access.next_key::<String>()? {
            match key.as_str() {
                INFORMATION => information = Some(access.next_value()?),
                CRITICAL => critical = Some(access.next_value()?),
                SMALL => small = Some(access.next_value()?),
                ADVANCEMENTS => advancements = Some(access.next_value()?),
                _ => {
                    let node: ProjectNode = access.next_value()?;
                    children.insert(key, node);
                }
            }
        }

        let has_status = information.is_some()
            || critical.is_some()
            || small.is_some()
            || advancements.is_some();
        let status = has_status.then(|| StatusPayload {
            information: information.unwrap_or_default(),
            critical: critical.unwrap_or_default(),
            small: small.unwrap_or_default(),
            advancements: advancements.unwrap_or_default(),
        });
        Ok(ProjectNode::from_parts(status, children))
    }
}

/// Insertion-ordered name → node mapping.
///
/// Exact-key methods (`get`, `insert`, `remove`) back the cross-document merge;
/// the `_ci` methods back row insertion, where names compare case-insensitively
/// and the first spelling seen is kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectMap(IndexMap<String, ProjectNode>);

impl ProjectMap {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, ProjectNode> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ProjectNode> {
        self.0.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ProjectNode> {
        self.0.get_mut(name)
    }

    /// Inserts or replaces under the exact key; a new key goes last.
    pub fn insert(&mut self, name: impl Into<String>, node: ProjectNode) -> Option<ProjectNode> {
        self.0.insert(name.into(), node)
    }

    /// Removes the exact key, keeping the order of the remaining entries.
    pub fn remove(&mut self, name: &str) -> Option<ProjectNode> {
        self.0.shift_remove(name)
    }

    pub fn position_ci(&self, name: &str) -> Option<usize> {
        let wanted = name.to_lowercase();
        self.0.keys().position(|key| key.to_lowercase() == wanted)
    }

    pub fn get_ci(&self, name: &str) -> Option<&ProjectNode> {
        self.position_ci(name)
            .and_then(|idx| self.0.get_index(idx))
            .map(|(_, node)| node)
    }

    pub fn get_ci_mut(&mut self, name: &str) -> Option<&mut ProjectNode> {
        let idx = self.position_ci(name)?;
        self.0.get_index_mut(idx).map(|(_, node)| node)
    }

    /// The node stored under `name` (case-insensitive), created with `make`
    /// under this spelling when absent.
    pub fn entry_ci<F>(&mut self, name: &str, make: F) -> &mut ProjectNode
    where
        F: FnOnce() -> ProjectNode,
    {
        let idx = match self.position_ci(name) {
            Some(idx) => idx,
            None => self.0.insert_full(name.to_string(), make()).0,
        };
        &mut self.0[idx]
    }
}

impl IntoIterator for ProjectMap {
    type Item = (String, ProjectNode);
    type IntoIter = indexmap::map::IntoIter<String, ProjectNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ProjectMap {
    type Item = (&'a String, &'a ProjectNode);
    type IntoIter = indexmap::map::Iter<'a, String, ProjectNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, ProjectNode)> for ProjectMap {
    fn from_iter<I: IntoIterator<Item = (String, ProjectNode)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
