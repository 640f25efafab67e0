//! Text views of goals, batches and denominations.
//!
//! Everything here returns plain strings so the shell decides where they go.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    cli::table::{Table, TableColumn},
    currency::{denomination_by_value, denominations, format_currency, Amount},
    goal::{Batch, BatchFilter, Goal, GoalProgress},
    storage::BackupInfo,
};

const DEFAULT_TERMINAL_WIDTH: usize = 80;
const MIN_BAR_WIDTH: usize = 10;
const MAX_BAR_WIDTH: usize = 50;

/// Progress bar width that fits the current terminal.
pub fn bar_width() -> usize {
    let columns = crossterm::terminal::size()
        .map(|(cols, _)| usize::from(cols))
        .unwrap_or(DEFAULT_TERMINAL_WIDTH);
    columns.saturating_sub(20).clamp(MIN_BAR_WIDTH, MAX_BAR_WIDTH)
}

pub fn progress_bar(percent: f64, width: usize) -> String {
    let ratio = (percent / 100.0).clamp(0.0, 1.0);
    let filled = ((ratio * width as f64).round() as usize).min(width);
    format!(
        "[{}{}] {percent:.1}%",
        "#".repeat(filled),
        "-".repeat(width - filled)
    )
}

fn denomination_label(value: Amount) -> String {
    denomination_by_value(value)
        .map(|denom| denom.label.to_string())
        .unwrap_or_else(|| format_currency(value))
}

pub fn goal_list(goals: &[Goal], active: Option<Uuid>, now: DateTime<Utc>) -> String {
    let mut table = Table::new(vec![
        TableColumn::left(" "),
        TableColumn::right("#"),
        TableColumn::left("Name").max_width(24),
        TableColumn::right("Target"),
        TableColumn::right("Saved"),
        TableColumn::right("Progress"),
        TableColumn::right("Batches"),
        TableColumn::right("Days left"),
    ]);
    for (idx, goal) in goals.iter().enumerate() {
        let progress = goal.progress(now);
        table.add_row([
            if Some(goal.id) == active { "*" } else { "" }.to_string(),
            (idx + 1).to_string(),
            goal.config.name.clone(),
            format_currency(progress.target),
            format_currency(progress.saved),
            format!("{:.1}%", progress.percent),
            format!("{}/{}", progress.batches_completed, progress.batches_total),
            progress.days_left.to_string(),
        ]);
    }
    table.render()
}

pub fn goal_summary(goal: &Goal, progress: &GoalProgress, bar: usize) -> String {
    let denoms = goal
        .config
        .selected_denominations
        .iter()
        .map(|value| denomination_label(*value))
        .collect::<Vec<_>>()
        .join(", ");
    [
        format!("Goal          : {}", goal.config.name),
        format!("Started       : {}", goal.config.start_date.format("%Y-%m-%d")),
        format!("Denominations : {denoms}"),
        format!("Target        : {}", format_currency(progress.target)),
        format!("Saved         : {}", format_currency(progress.saved)),
        format!("Remaining     : {}", format_currency(progress.remaining)),
        format!(
            "Batches       : {}/{} completed",
            progress.batches_completed, progress.batches_total
        ),
        format!(
            "Days          : {} elapsed, {} left of {}",
            progress.days_elapsed, progress.days_left, goal.config.duration_days
        ),
        progress_bar(progress.percent, bar),
    ]
    .join("\n")
}

fn batch_row(batch: &Batch) -> [String; 6] {
    let count = if batch.is_partial() {
        format!("{} (partial)", batch.count)
    } else {
        batch.count.to_string()
    };
    [
        batch.id.clone(),
        denomination_label(batch.denomination_value),
        count,
        format_currency(batch.total_value),
        if batch.is_completed { "done" } else { "pending" }.to_string(),
        batch
            .completed_at
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
    ]
}

pub fn batch_table(goal: &Goal, filter: BatchFilter) -> String {
    let mut table = Table::new(vec![
        TableColumn::left("Batch"),
        TableColumn::left("Denomination"),
        TableColumn::right("Count"),
        TableColumn::right("Value"),
        TableColumn::left("Status"),
        TableColumn::left("Completed"),
    ]);
    for batch in goal.filtered(filter) {
        table.add_row(batch_row(batch));
    }
    table.render()
}

pub fn denomination_table(defaults: &[Amount]) -> String {
    let mut table = Table::new(vec![
        TableColumn::left("Id"),
        TableColumn::left("Label"),
        TableColumn::right("Value"),
        TableColumn::left("Kind"),
        TableColumn::left("Bundles"),
        TableColumn::left("Default"),
    ]);
    for denom in denominations() {
        let bundles = denom
            .bundle_sizes
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join("/");
        table.add_row([
            denom.id.to_string(),
            denom.label.to_string(),
            denom.value.to_string(),
            denom.kind.to_string(),
            bundles,
            if defaults.contains(&denom.value) { "yes" } else { "" }.to_string(),
        ]);
    }
    table.render()
}

pub fn backup_table(backups: &[BackupInfo]) -> String {
    let mut table = Table::new(vec![
        TableColumn::right("#"),
        TableColumn::left("Backup"),
        TableColumn::left("Created (UTC)"),
        TableColumn::right("Size"),
    ]);
    for (idx, backup) in backups.iter().enumerate() {
        table.add_row([
            (idx + 1).to_string(),
            backup.id.clone(),
            backup
                .created_at
                .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "unknown".into()),
            format!("{} B", backup.size_bytes),
        ]);
    }
    table.render()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::goal::GoalConfig;

    fn fixed_goal() -> Goal {
        let start = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        let mut goal = Goal {
            id: Uuid::nil(),
            config: GoalConfig {
                name: "Bike".into(),
                target_amount: Amount::from_millimes(12_030),
                duration_days: 30,
                start_date: start,
                selected_denominations: vec![Amount::from_millimes(500), Amount::from_dinars(5)],
            },
            batches: vec![
                Batch::new("batch-1", Amount::from_dinars(5), 2),
                Batch::new("batch-2", Amount::from_millimes(500), 4),
                Batch::closing("batch-3", Amount::from_millimes(500), Amount::from_millimes(30)),
            ],
        };
        goal.batches[0].set_completed(true, start);
        goal
    }

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(50.0, 10), "[#####-----] 50.0%");
        assert_eq!(progress_bar(0.0, 4), "[----] 0.0%");
        assert_eq!(progress_bar(100.0, 4), "[####] 100.0%");
    }

    #[test]
    fn batch_table_marks_partial_and_completed_batches() {
        let goal = fixed_goal();
        insta::assert_snapshot!(batch_table(&goal, BatchFilter::All), @r###"
        Batch    Denomination        Count       Value  Status   Completed
        -------------------------------------------------------------------
        batch-1  5 دنانير                2  10.000 د.ت  done     2025-02-01
        batch-2  500 مليم                4   2.000 د.ت  pending
        batch-3  500 مليم      1 (partial)     30 مليم  pending
        "###);
    }

    #[test]
    fn pending_filter_hides_completed_batches() {
        let rendered = batch_table(&fixed_goal(), BatchFilter::Pending);
        assert!(!rendered.contains("batch-1"));
        assert!(rendered.contains("batch-2"));
    }

    #[test]
    fn summary_reports_progress() {
        let goal = fixed_goal();
        let now = goal.config.start_date + chrono::Duration::days(4);
        let summary = goal_summary(&goal, &goal.progress(now), 10);
        assert!(summary.contains("Saved         : 10.000 د.ت"));
        assert!(summary.contains("Remaining     : 2.030 د.ت"));
        assert!(summary.contains("Days          : 4 elapsed, 26 left of 30"));
        assert!(summary.contains("Denominations : 500 مليم, 5 دنانير"));
        assert!(summary.ends_with("[########--] 83.1%"));
    }

    #[test]
    fn goal_list_marks_the_active_goal() {
        let goal = fixed_goal();
        let listing = goal_list(std::slice::from_ref(&goal), Some(goal.id), goal.config.start_date);
        let row = listing.lines().nth(2).unwrap();
        assert!(row.starts_with('*'));
        assert!(row.contains("Bike"));
        assert!(row.contains("1/3"));
    }
}
