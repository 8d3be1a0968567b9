use crate::output::{print_json, print_table};
use anyhow::Context;
use dfg_core::executor::{self, LogExecutor};
use dfg_core::plan::{self, Operation};
use dfg_core::selection;
use std::io::Read;
use std::path::Path;

pub fn run(
    config_path: &Path,
    payload: Option<String>,
    stdin: bool,
    execute: bool,
    json: bool,
) -> anyhow::Result<()> {
    let config = super::load_config(config_path, None)?;

    let body = if stdin {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read submission from stdin")?;
        buf.trim_end_matches(['\r', '\n']).to_string()
    } else {
        payload.unwrap_or_default()
    };

    let table = selection::decode(body.as_bytes()).context("invalid submission")?;
    let ops = plan::resolve(&table, &config.staging).context("selection does not resolve")?;

    let executed = if execute {
        let mut exec = LogExecutor::new();
        executor::run_plan(&ops, &mut exec)?;
        Some(exec.executed().len())
    } else {
        None
    };

    if json {
        print_json(&serde_json::json!({
            "selection": table,
            "operations": ops,
            "executed": executed.is_some(),
        }))
    } else {
        print_ops(&ops);
        if let Some(count) = executed {
            println!("\nExecuted {count} operation(s).");
        }
        Ok(())
    }
}

fn print_ops(ops: &[Operation]) {
    if ops.is_empty() {
        println!("Nothing selected.");
        return;
    }
    let rows = ops
        .iter()
        .enumerate()
        .map(|(i, op)| {
            vec![
                (i + 1).to_string(),
                op.kind.to_string(),
                op.source.clone(),
                op.destination.clone(),
                op.args.join(" "),
            ]
        })
        .collect();
    print_table(&["#", "KIND", "SOURCE", "DESTINATION", "ARGS"], rows);
}
