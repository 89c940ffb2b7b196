//! `taskflow layout`: diagram for a JSON task file.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use taskflow_core::config::AppConfig;
use taskflow_core::domain::TaskId;
use taskflow_core::{Diagram, GraphNode, compute_levels};

/// One entry of the input file. Other fields (name, dates, ...) are ignored.
#[derive(Debug, Deserialize)]
pub struct TaskEntry {
    pub id: TaskId,
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
}

impl GraphNode for TaskEntry {
    fn node_id(&self) -> &TaskId {
        &self.id
    }

    fn prerequisites(&self) -> &[TaskId] {
        &self.dependencies
    }
}

#[derive(Debug, Serialize)]
struct LayoutOutput {
    #[serde(flatten)]
    diagram: Diagram,
    #[serde(skip_serializing_if = "Option::is_none")]
    levels: Option<BTreeMap<TaskId, usize>>,
}

pub fn run(path: &Path, config: &AppConfig, with_levels: bool) -> Result<()> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading task file at {:?}", path))?;
    let entries = parse_entries(&contents)
        .with_context(|| format!("parsing task list from {:?}", path))?;

    let output = render(&entries, config, with_levels);
    info!(
        tasks = entries.len(),
        edges = output.diagram.edges.len(),
        "layout computed"
    );
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn parse_entries(contents: &str) -> Result<Vec<TaskEntry>> {
    Ok(serde_json::from_str(contents)?)
}

fn render(entries: &[TaskEntry], config: &AppConfig, with_levels: bool) -> LayoutOutput {
    LayoutOutput {
        diagram: Diagram::build(entries, &config.layout),
        levels: with_levels.then(|| compute_levels(entries).into_iter().collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exported_task_records_are_accepted() {
        let json = r#"[
            {"id": "a", "name": "Design", "status": "completed", "dependencies": []},
            {"id": "b", "name": "Build", "dependencies": ["a"]},
            {"id": "c"}
        ]"#;
        let entries = parse_entries(json).unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries[2].dependencies.is_empty());

        let output = render(&entries, &AppConfig::default(), true);
        assert_eq!(output.diagram.edges.len(), 1);
        let levels = output.levels.unwrap();
        assert_eq!(levels[&TaskId::new("b")], 1);
        assert_eq!(levels[&TaskId::new("c")], 0);
    }

    #[test]
    fn levels_are_omitted_unless_requested() {
        let entries = parse_entries(r#"[{"id": "a"}]"#).unwrap();
        let value = serde_json::to_value(render(&entries, &AppConfig::default(), false)).unwrap();
        assert!(value.get("levels").is_none());
        assert_eq!(value["nodes"][0]["position"]["x"], 50.0);
    }
}
