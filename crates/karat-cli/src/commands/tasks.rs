//! Worker task commands.

use super::output::{emit, render_table};
use super::{Context, action_error};
use karat_client::Access;
use karat_core::model::{display_date, grams};
use karat_core::{CompleteTask, WorkerTask};

pub async fn list(ctx: &Context) -> anyhow::Result<()> {
    ctx.require(Access::Worker)?;
    let tasks = ctx
        .client
        .worker_tasks()
        .await
        .map_err(|e| action_error(e, "Failed to load tasks"))?;
    emit(ctx.output, &tasks, || tasks_table(&tasks))
}

fn tasks_table(tasks: &[WorkerTask]) -> String {
    if tasks.is_empty() {
        return "No pending tasks.\n".to_string();
    }
    let rows: Vec<Vec<String>> = tasks
        .iter()
        .map(|t| {
            vec![
                t.transaction_id.to_string(),
                t.design_no.clone(),
                t.item_category.clone(),
                t.stage.clone(),
                grams(t.issued_weight),
                display_date(&t.issued_at),
            ]
        })
        .collect();
    render_table(
        &["Task", "Design No", "Category", "Stage", "Issued", "Issued On"],
        &rows,
    )
}

pub async fn complete(
    ctx: &Context,
    transaction_id: i64,
    returned_weight: f64,
    notes: Option<String>,
) -> anyhow::Result<()> {
    ctx.require(Access::Worker)?;
    // Zero is a valid return: everything was lost.
    if !(returned_weight.is_finite() && returned_weight >= 0.0) {
        anyhow::bail!("returned weight must be zero or more");
    }
    let completion = CompleteTask {
        transaction_id,
        returned_weight,
        notes: notes.filter(|n| !n.trim().is_empty()),
    };
    ctx.client
        .complete_task(&completion)
        .await
        .map_err(|e| action_error(e, "Failed to complete task"))?;
    println!(
        "✔ Completed task #{transaction_id} ({} returned)",
        grams(returned_weight)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tasks_table() {
        let tasks = vec![WorkerTask {
            transaction_id: 11,
            job_id: 3,
            design_no: "R-100".to_string(),
            item_category: "ring".to_string(),
            stage: "polishing".to_string(),
            issued_weight: 5.25,
            issued_at: "2024-03-05T10:30:00".to_string(),
        }];
        let table = tasks_table(&tasks);
        let row = table.lines().nth(2).unwrap();
        assert!(row.starts_with("11"));
        assert!(row.contains("5.250g"));
        assert!(row.ends_with("2024-03-05"));
        assert_eq!(tasks_table(&[]), "No pending tasks.\n");
    }
}
