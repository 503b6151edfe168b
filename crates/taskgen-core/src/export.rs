use crate::error::TaskgenError;
use crate::types::{StoredSpec, TaskCategory};
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    Text,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Text => "txt",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "text/markdown; charset=utf-8",
            ExportFormat::Text => "text/plain; charset=utf-8",
        }
    }

    pub fn render(self, spec: &StoredSpec) -> String {
        match self {
            ExportFormat::Markdown => to_markdown(spec),
            ExportFormat::Text => to_text(spec),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = TaskgenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "text" | "txt" => Ok(ExportFormat::Text),
            _ => Err(TaskgenError::InvalidExportFormat(s.to_string())),
        }
    }
}

/// Render a stored spec as a markdown document.
///
/// Tasks are grouped by the four known categories in a fixed order; tasks
/// with any other category are collected under "Other".
pub fn to_markdown(spec: &StoredSpec) -> String {
    let mut md = String::new();
    let feature = &spec.feature;
    let generated = &spec.generated;

    // write! into a String cannot fail
    let _ = writeln!(md, "# Tasks Specification\n");
    let _ = writeln!(
        md,
        "**Generated:** {}\n",
        spec.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    );

    let _ = writeln!(md, "## Feature Details\n");
    let _ = writeln!(md, "**Goal:** {}\n", feature.goal);
    let _ = writeln!(md, "**Target Users:** {}\n", feature.users);
    let _ = writeln!(md, "**Template:** {}\n", feature.template);
    if let Some(constraints) = &feature.constraints {
        let _ = writeln!(md, "**Constraints:** {constraints}\n");
    }

    let _ = writeln!(md, "## User Stories\n");
    for story in &generated.user_stories {
        let _ = writeln!(md, "### {}: {}\n", story.id, story.title);
        let _ = writeln!(md, "{}\n", story.description);
        write_criteria(&mut md, &story.acceptance_criteria);
    }

    let _ = writeln!(md, "## Engineering Tasks\n");
    let mut groups: Vec<(&str, Vec<_>)> = TaskCategory::known()
        .iter()
        .map(|cat| {
            let tasks: Vec<_> = generated
                .engineering_tasks
                .iter()
                .filter(|t| &t.category == cat)
                .collect();
            (cat.as_str(), tasks)
        })
        .collect();
    let other: Vec<_> = generated
        .engineering_tasks
        .iter()
        .filter(|t| matches!(t.category, TaskCategory::Other(_)))
        .collect();
    groups.push(("Other", other));

    for (name, tasks) in groups.into_iter().filter(|(_, t)| !t.is_empty()) {
        let _ = writeln!(md, "### {name}\n");
        for task in tasks {
            let _ = writeln!(
                md,
                "#### {}: {} ({}h)\n",
                task.id, task.title, task.estimated_hours
            );
            let _ = writeln!(md, "{}\n", task.description);
            write_criteria(&mut md, &task.acceptance_criteria);
        }
    }

    let _ = writeln!(md, "## Risks & Unknowns\n");
    for risk in &generated.risks {
        if risk.severity.as_str().is_empty() {
            let _ = writeln!(md, "### {}\n", risk.title);
        } else {
            let _ = writeln!(md, "### {} [{}]\n", risk.title, risk.severity);
        }
        let _ = writeln!(md, "{}\n", risk.description);
        let _ = writeln!(md, "**Mitigation:** {}\n", risk.mitigation);
    }

    md
}

/// Plain-text rendering: the markdown with heading and emphasis markers
/// removed.
pub fn to_text(spec: &StoredSpec) -> String {
    to_markdown(spec).replace(['#', '*'], "")
}

fn write_criteria(md: &mut String, criteria: &[String]) {
    let _ = writeln!(md, "**Acceptance Criteria:**");
    for c in criteria {
        let _ = writeln!(md, "- {c}");
    }
    md.push('\n');
}
