//! Tree command - rebuild and print the category hierarchy

use super::open_catalog;
use anyhow::Result;
use catalog_cli::output::{format_count, Status};
use catalog_core::category_tree::{CategoryNode, ExclusionReason};
use catalog_core::config::ConfigSchema;
use owo_colors::OwoColorize;
use std::path::Path;

/// Run tree command
pub fn run(config: &ConfigSchema, categories: &Path, json: bool) -> Result<()> {
    let service = open_catalog(config, None, Some(categories))?;

    let forest = {
        catalog_telemetry::timed_span!("tree");
        service.category_forest()
    };

    for excluded in &forest.excluded {
        let reason = match excluded.reason {
            ExclusionReason::MissingParent => "parent does not exist",
            ExclusionReason::Cycle => "ancestry forms a cycle",
            ExclusionReason::DepthLimit => "deeper than tree.max_depth",
        };
        Status::warning(&format!("Category {} excluded: {}", excluded.id, reason));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&forest.root)?);
        return Ok(());
    }

    print_tree(&forest.root);
    println!();
    Status::success(&format_count(
        forest.root.descendant_count(),
        "category",
        "categories",
    ));

    Ok(())
}

fn print_tree(root: &CategoryNode) {
    println!("{}", root.name.bold());

    let mut stack: Vec<(&CategoryNode, usize)> =
        root.children.iter().rev().map(|child| (child, 1)).collect();

    while let Some((node, depth)) = stack.pop() {
        println!(
            "{}└─ {} {}",
            "   ".repeat(depth - 1),
            node.name,
            format!("#{}", node.id).dimmed()
        );
        stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
    }
}
