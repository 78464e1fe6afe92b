//! Table occupation commands.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use cue_client::HttpClient;
use shared::query::{DEFAULT_LIMIT, OccupationSort};
use shared::validation::{StartCheck, check_start, interval_warning};
use shared::{
    OccupationListState, OccupationSortColumn, SortDirection,
    TableOccupationCreate, TableOccupationUpdate,
};

use super::page_size;
use crate::output::{OccupationListOutput, OccupationOutput, fmt_time, print_output};
use crate::time_arg::time_value;

/// Occupation operations.
#[derive(Subcommand)]
pub enum OccupationCommand {
    /// List occupations, newest first unless sorted otherwise.
    List(ListArgs),

    /// Reserve or open a table.
    Create(CreateArgs),

    /// Change an occupation; only the given fields are sent.
    Update(UpdateArgs),

    /// Delete an occupation.
    Delete(DeleteArgs),
}

#[derive(Args)]
pub struct ListArgs {
    /// Page number (1-based).
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Occupations per page: 5, 10, 20 or 50.
    #[arg(long, default_value_t = DEFAULT_LIMIT, value_parser = page_size)]
    pub limit: u32,

    /// Only occupations of this table.
    #[arg(long)]
    pub table: Option<i64>,

    /// Sort column (id, table_id, started_at, finished_at, created_at, updated_at).
    #[arg(long)]
    pub sort: Option<OccupationSortColumn>,

    /// Sort descending.
    #[arg(long)]
    pub desc: bool,
}

#[derive(Args)]
pub struct CreateArgs {
    /// Table id.
    #[arg(long)]
    pub table: i64,

    /// Start, e.g. 2024-05-01T20:00:00Z or now+5m.
    #[arg(long, value_parser = time_value)]
    pub start: DateTime<Utc>,

    /// End; omit for an open-ended occupation.
    #[arg(long, value_parser = time_value)]
    pub finish: Option<DateTime<Utc>>,

    /// Start shortly from now instead of failing when --start is too soon.
    #[arg(long)]
    pub adjust_start: bool,
}

#[derive(Args)]
pub struct UpdateArgs {
    /// Occupation id.
    pub id: i64,

    /// Move to another table.
    #[arg(long)]
    pub table: Option<i64>,

    /// New start.
    #[arg(long, value_parser = time_value)]
    pub start: Option<DateTime<Utc>>,

    /// New end.
    #[arg(long, value_parser = time_value, conflicts_with = "reopen")]
    pub finish: Option<DateTime<Utc>>,

    /// Clear the end, making the occupation open-ended.
    #[arg(long)]
    pub reopen: bool,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Occupation id.
    pub id: i64,

    /// Confirm the deletion.
    #[arg(long, short)]
    pub yes: bool,
}

impl OccupationCommand {
    /// Execute the occupation command.
    pub async fn run(self, client: &HttpClient, json: bool) -> Result<()> {
        match self {
            OccupationCommand::List(args) => occupation_list(client, args, json).await,
            OccupationCommand::Create(args) => occupation_create(client, args, json).await,
            OccupationCommand::Update(args) => occupation_update(client, args, json).await,
            OccupationCommand::Delete(args) => occupation_delete(client, args, json).await,
        }
    }
}

impl ListArgs {
    fn state(&self) -> OccupationListState {
        let mut state = match self.table {
            Some(table_id) => OccupationListState::for_table(table_id),
            None => OccupationListState::default(),
        };
        let direction = if self.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        match (self.sort, state.sort) {
            (Some(column), _) => state.sort = Some(OccupationSort::new(column, direction)),
            (None, Some(current)) if self.desc => {
                state.sort = Some(OccupationSort::new(current.column, SortDirection::Desc));
            }
            (None, _) => {}
        }
        state.list.set_limit(self.limit);
        state.list.page = self.page.max(1);
        state
    }
}

async fn occupation_list(client: &HttpClient, args: ListArgs, json: bool) -> Result<()> {
    let request = args.state().request();
    let page = client
        .list_table_occupations(&request)
        .await
        .context("failed to fetch table occupations")?;
    print_output(&OccupationListOutput(page), json);
    Ok(())
}

async fn occupation_create(client: &HttpClient, args: CreateArgs, json: bool) -> Result<()> {
    let mut started_at = args.start;
    if let StartCheck::TooSoon { suggested } = check_start(started_at, Utc::now()) {
        if !args.adjust_start {
            bail!(
                "start {} is less than a minute away; pass --adjust-start to start at {} instead",
                fmt_time(started_at),
                fmt_time(suggested)
            );
        }
        eprintln!("Start adjusted to {}", fmt_time(suggested));
        started_at = suggested;
    }
    if let Some(warning) = interval_warning(started_at, args.finish) {
        eprintln!("Warning: {warning}");
    }

    let occupation = client
        .create_table_occupation(&TableOccupationCreate {
            table_id: args.table,
            started_at,
            finished_at: args.finish,
        })
        .await
        .context("failed to create table occupation")?;
    print_output(
        &OccupationOutput {
            occupation,
            action: "Created",
        },
        json,
    );
    Ok(())
}

async fn occupation_update(client: &HttpClient, args: UpdateArgs, json: bool) -> Result<()> {
    let original = client
        .get_table_occupation(args.id)
        .await
        .with_context(|| format!("failed to fetch table occupation {}", args.id))?;

    let finished_at = if args.reopen {
        None
    } else {
        args.finish.or(original.finished_at)
    };
    let started_at = args.start.unwrap_or(original.started_at);
    let Some(patch) = TableOccupationUpdate::diff(
        &original,
        args.table.unwrap_or(original.table_id),
        started_at,
        finished_at,
    ) else {
        println!("Nothing to update");
        return Ok(());
    };
    if let Some(warning) = interval_warning(started_at, finished_at) {
        eprintln!("Warning: {warning}");
    }

    let occupation = client
        .update_table_occupation(args.id, &patch)
        .await
        .with_context(|| format!("failed to update table occupation {}", args.id))?;
    print_output(
        &OccupationOutput {
            occupation,
            action: "Updated",
        },
        json,
    );
    Ok(())
}

async fn occupation_delete(client: &HttpClient, args: DeleteArgs, json: bool) -> Result<()> {
    if !args.yes {
        bail!("refusing to delete table occupation {} without --yes", args.id);
    }
    let occupation = client
        .delete_table_occupation(args.id)
        .await
        .with_context(|| format!("failed to delete table occupation {}", args.id))?;
    print_output(
        &OccupationOutput {
            occupation,
            action: "Deleted",
        },
        json,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(table: Option<i64>, sort: Option<OccupationSortColumn>, desc: bool) -> ListArgs {
        ListArgs {
            page: 2,
            limit: 20,
            table,
            sort,
            desc,
        }
    }

    #[test]
    fn test_default_listing_is_newest_first() {
        let request = args(None, None, false).state().request();
        assert_eq!(
            request.sort,
            Some(OccupationSort::new(OccupationSortColumn::CreatedAt, SortDirection::Desc))
        );
        assert_eq!(request.pagination.page, 2);
        assert_eq!(request.pagination.limit, 20);
    }

    #[test]
    fn test_table_history_sorts_by_start() {
        let request = args(Some(4), None, false).state().request();
        assert_eq!(request.filter.table_id, Some(4));
        assert_eq!(
            request.sort,
            Some(OccupationSort::new(OccupationSortColumn::StartedAt, SortDirection::Desc))
        );
        assert_eq!(request.pagination.page, 2);
    }

    #[test]
    fn test_explicit_sort() {
        let request = args(None, Some(OccupationSortColumn::FinishedAt), false)
            .state()
            .request();
        assert_eq!(
            request.sort,
            Some(OccupationSort::new(OccupationSortColumn::FinishedAt, SortDirection::Asc))
        );
        let request = args(None, Some(OccupationSortColumn::Id), true).state().request();
        assert_eq!(request.sort.map(|s| s.to_query_value()), Some("id:desc".to_string()));
    }
}
