use std::fmt::Write;

use crate::core::types::AggregatedForest;
use crate::forest::node::{ProjectMap, ProjectNode};

pub const NO_PROJECTS: &str = "Aucun projet trouvé dans les fichiers analysés.";

pub fn format_digest(forest: &AggregatedForest) -> String {
    if forest.projects.is_empty() {
        return NO_PROJECTS.to_string();
    }

    let mut out = format!(
        "📊 **Synthèse globale de {} fichier(s) analysé(s)**\n\n",
        forest.metadata.processed_files
    );
    out.push_str(&format_projects(&forest.projects));

    let services: Vec<_> = forest
        .events_by_service
        .iter()
        .filter(|(_, events)| !events.is_empty())
        .collect();
    if services.is_empty() {
        out.push_str("\n\n📅 **Événements à venir:** Aucun événement particulier prévu.\n");
    } else {
        out.push_str("\n\n📅 **Événements à venir par service:**\n\n");
        for (service, events) in services {
            let _ = writeln!(out, "- **{service}:**");
            for event in events {
                let _ = writeln!(out, "  - {event}");
            }
            out.push('\n');
        }
    }

    out.trim().to_string()
}

pub fn format_projects(projects: &ProjectMap) -> String {
    let mut out = String::new();
    for (name, node) in projects {
        write_node(&mut out, name, node, 0);
    }
    out
}

fn write_node(out: &mut String, name: &str, node: &ProjectNode, level: usize) {
    let indent = "  ".repeat(level);
    let _ = match level {
        0 => writeln!(out, "{indent}🔶 **{name}**"),
        1 => writeln!(out, "{indent}📌 **{name}**"),
        _ => writeln!(out, "{indent}📎 *{name}*"),
    };

    if let Some(status) = node.status() {
        if !status.information.is_empty() {
            for line in status.information.lines().filter(|line| !line.trim().is_empty()) {
                let _ = writeln!(out, "{indent}- {line}");
            }
            out.push('\n');
        }
        write_alerts(out, &indent, "🔴 **Alertes Critiques:**", &status.critical);
        write_alerts(out, &indent, "🟡 **Alertes à surveiller:**", &status.small);
        write_alerts(out, &indent, "🟢 **Avancements:**", &status.advancements);
    }

    if let Some(children) = node.children() {
        for (child_name, child) in children {
            write_node(out, child_name, child, level + 1);
        }
    }
}

fn write_alerts(out: &mut String, indent: &str, heading: &str, alerts: &[String]) {
    if alerts.is_empty() {
        return;
    }
    let _ = writeln!(out, "{indent}- {heading}");
    for alert in alerts {
        let _ = writeln!(out, "{indent}  - {alert}");
    }
    out.push('\n');
}
