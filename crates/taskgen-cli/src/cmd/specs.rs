use crate::output::{print_json, print_table, truncate};
use anyhow::Context;
use std::path::Path;
use taskgen_core::config::Config;
use taskgen_core::export::ExportFormat;
use taskgen_core::{FileStore, GeneratedBreakdown, SpecStore, StoredSpec};

fn store(config: &Config) -> FileStore {
    FileStore::new(config.specs_file())
}

fn find(config: &Config, id: &str) -> anyhow::Result<StoredSpec> {
    store(config)
        .get(id)
        .with_context(|| format!("spec '{id}' not found"))
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

pub fn list(config: &Config, json: bool) -> anyhow::Result<()> {
    let specs = store(config).list();

    if json {
        return print_json(&serde_json::json!({
            "count": specs.len(),
            "specs": specs,
        }));
    }

    if specs.is_empty() {
        println!("No specs stored.");
        return Ok(());
    }

    let rows = specs
        .iter()
        .map(|s| {
            vec![
                s.id.clone(),
                s.timestamp.format("%Y-%m-%d %H:%M").to_string(),
                s.generated.engineering_tasks.len().to_string(),
                format!("{}h", s.generated.total_hours()),
                truncate(&s.feature.goal, 48),
            ]
        })
        .collect();
    print_table(&["ID", "GENERATED", "TASKS", "HOURS", "GOAL"], rows);
    Ok(())
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

pub fn show(config: &Config, id: &str, json: bool) -> anyhow::Result<()> {
    let spec = find(config, id)?;

    if json {
        return print_json(&spec);
    }

    println!("{}  ({})", spec.id, spec.timestamp.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("Goal:     {}", spec.feature.goal);
    println!("Users:    {}", spec.feature.users);
    println!("Template: {}", spec.feature.template);
    if let Some(constraints) = &spec.feature.constraints {
        println!("Constraints: {constraints}");
    }
    println!();
    print_breakdown(&spec.generated);
    Ok(())
}

pub(crate) fn print_breakdown(generated: &GeneratedBreakdown) {
    println!("User stories ({})", generated.user_stories.len());
    print_table(
        &["ID", "TITLE"],
        generated
            .user_stories
            .iter()
            .map(|s| vec![s.id.clone(), s.title.clone()])
            .collect(),
    );

    println!();
    println!(
        "Engineering tasks ({}, {}h total)",
        generated.engineering_tasks.len(),
        generated.total_hours()
    );
    print_table(
        &["ID", "CATEGORY", "HOURS", "TITLE"],
        generated
            .engineering_tasks
            .iter()
            .map(|t| {
                vec![
                    t.id.clone(),
                    t.category.to_string(),
                    t.estimated_hours.to_string(),
                    t.title.clone(),
                ]
            })
            .collect(),
    );

    println!();
    println!("Risks ({})", generated.risks.len());
    print_table(
        &["ID", "SEVERITY", "TITLE"],
        generated
            .risks
            .iter()
            .map(|r| vec![r.id.clone(), r.severity.to_string(), r.title.clone()])
            .collect(),
    );
}

// ---------------------------------------------------------------------------
// delete
// ---------------------------------------------------------------------------

pub fn delete(config: &Config, id: &str, json: bool) -> anyhow::Result<()> {
    if !store(config).delete(id)? {
        anyhow::bail!("spec '{id}' not found");
    }

    if json {
        print_json(&serde_json::json!({ "success": true, "id": id }))?;
    } else {
        println!("Deleted {id}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// export
// ---------------------------------------------------------------------------

pub fn export(config: &Config, id: &str, format: &str, output: Option<&Path>) -> anyhow::Result<()> {
    let format: ExportFormat = format.parse()?;
    let spec = find(config, id)?;
    let rendered = format.render(&spec);

    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}
