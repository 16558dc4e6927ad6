//! Regrouping of top-level projects judged to be the same project.
//!
//! Each cluster names top-level projects. The member with the shortest name
//! becomes the anchor; the others move under it as children named after what
//! is left of their name once the anchor's name is removed. An anchor that
//! carried its own status keeps it under a `"Général"` child.

use indexmap::IndexMap;
use tracing::{info, warn};

use crate::core::errors::AppError;
use crate::core::types::{AggregatedForest, GroupingCluster};
use crate::forest::merge::merge_node;
use crate::forest::node::{ProjectMap, ProjectNode};

pub const GENERAL_CHILD: &str = "Général";

#[derive(Debug)]
pub struct RegroupOutcome {
    pub projects: ProjectMap,
    pub moved: usize,
    pub skipped: Vec<AppError>,
}

pub fn regroup(projects: &ProjectMap, clusters: &[GroupingCluster]) -> ProjectMap {
    regroup_detailed(projects, clusters).projects
}

pub fn regroup_detailed(projects: &ProjectMap, clusters: &[GroupingCluster]) -> RegroupOutcome {
    let mut outcome = RegroupOutcome {
        projects: projects.clone(),
        moved: 0,
        skipped: Vec::new(),
    };

    for cluster in clusters {
        if cluster.len() < 2 {
            continue;
        }
        match apply_cluster(&mut outcome.projects, cluster) {
            Ok(moved) => outcome.moved += moved,
            Err(err) => {
                warn!("{err}");
                outcome.skipped.push(err);
            }
        }
    }
    outcome
}

pub fn normalize_name(name: &str) -> String {
    name.replace('\n', " ").trim().to_string()
}

fn apply_cluster(projects: &mut ProjectMap, cluster: &[String]) -> Result<usize, AppError> {
    // normalized name → first original spelling carrying it
    let mut originals: IndexMap<String, &str> = IndexMap::new();
    for original in cluster {
        originals.entry(normalize_name(original)).or_insert(original.as_str());
    }

    let Some((anchor_name, anchor_key)) = originals
        .iter()
        .min_by_key(|(normalized, _)| normalized.chars().count())
        .map(|(normalized, original)| (normalized.clone(), original.to_string()))
    else {
        return Ok(0);
    };

    if !projects.contains_key(&anchor_key) {
        return Err(AppError::RegroupingInconsistency(format!(
            "anchor '{anchor_key}' not found among top-level projects"
        )));
    }

    let mut moved = 0;
    for (normalized, original) in &originals {
        if *normalized == anchor_name {
            continue;
        }
        let Some(member) = projects.remove(original) else {
            continue;
        };

        let sub_name = child_name(normalized, &anchor_name);
        if let Some(anchor) = projects.get_mut(&anchor_key) {
            adopt(anchor, sub_name.clone(), member);
        }
        info!(member = %original, anchor = %anchor_key, child = %sub_name, "regrouped project");
        moved += 1;
    }
    Ok(moved)
}

/// What remains of `member` once the anchor's name is cut out, or the whole
/// member name when nothing remains.
pub fn child_name(member: &str, anchor: &str) -> String {
    let rest = if anchor.is_empty() {
        member.to_string()
    } else {
        member.replace(anchor, "")
    };
    let rest = rest.trim_matches('_').trim();
    if rest.is_empty() {
        member.to_string()
    } else {
        rest.to_string()
    }
}

fn adopt(anchor: &mut ProjectNode, sub_name: String, member: ProjectNode) {
    if anchor.has_status() {
        let (status, existing) = std::mem::take(anchor).into_parts();
        let mut children = ProjectMap::new();
        if let Some(status) = status {
            children.insert(GENERAL_CHILD, ProjectNode::Terminal(status));
        }
        for (name, node) in existing {
            children.insert(name, node);
        }
        *anchor = ProjectNode::Intermediate(children);
    }

    let children = anchor.children_mut();
    match children.get_mut(&sub_name) {
        Some(existing) => {
            let current = std::mem::take(existing);
            *existing = merge_node(current, member);
        }
        None => {
            children.insert(sub_name, member);
        }
    }
}

impl AggregatedForest {
    /// A copy of this forest with `clusters` applied to its projects.
    pub fn regrouped(&self, clusters: &[GroupingCluster]) -> RegroupedForest {
        let outcome = regroup_detailed(&self.projects, clusters);
        let mut forest = self.clone();
        forest.projects = outcome.projects;
        forest
            .metadata
            .errors
            .extend(outcome.skipped.iter().map(ToString::to_string));
        RegroupedForest {
            forest,
            moved: outcome.moved,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegroupedForest {
    pub forest: AggregatedForest,
    pub moved: usize,
}
