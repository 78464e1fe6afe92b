//! Table commands.

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Args, Subcommand};
use cue_client::api::DEFAULT_FETCH_BATCH;
use cue_client::{ActiveOccupationResolver, HttpClient};
use shared::query::DEFAULT_LIMIT;
use shared::{ListState, PaginatedResponse, TableBrand, TableCreate, TableUpdate};

use super::page_size;
use crate::output::{
    TableBatchOutput, TableDetailOutput, TableListOutput, TableOutput, print_output,
};

/// Table operations.
#[derive(Subcommand)]
pub enum TableCommand {
    /// List tables, one page at a time.
    List(ListArgs),

    /// Show a table with its current occupation.
    Show(ShowArgs),

    /// Create a table.
    Create(CreateArgs),

    /// Change a table's number or brand.
    Update(UpdateArgs),

    /// Delete a table.
    Delete(DeleteArgs),
}

#[derive(Args)]
pub struct ListArgs {
    /// Page number (1-based).
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Tables per page: 5, 10, 20 or 50.
    #[arg(long, default_value_t = DEFAULT_LIMIT, value_parser = page_size)]
    pub limit: u32,

    /// Fetch every page.
    #[arg(long, conflicts_with_all = ["page", "limit"])]
    pub all: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Table id.
    pub id: i64,
}

#[derive(Args)]
pub struct CreateArgs {
    /// Table number (at least 1).
    #[arg(long)]
    pub number: i32,

    /// Brand: mrsung, xingjue or diamond.
    #[arg(long)]
    pub brand: TableBrand,
}

#[derive(Args)]
pub struct UpdateArgs {
    /// Table id.
    pub id: i64,

    /// New table number.
    #[arg(long)]
    pub number: Option<i32>,

    /// New brand.
    #[arg(long)]
    pub brand: Option<TableBrand>,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Table id.
    pub id: i64,

    /// Confirm the deletion.
    #[arg(long, short)]
    pub yes: bool,
}

impl TableCommand {
    /// Execute the table command.
    pub async fn run(self, client: &HttpClient, json: bool) -> Result<()> {
        match self {
            TableCommand::List(args) => table_list(client, args, json).await,
            TableCommand::Show(args) => table_show(client, args, json).await,
            TableCommand::Create(args) => table_create(client, args, json).await,
            TableCommand::Update(args) => table_update(client, args, json).await,
            TableCommand::Delete(args) => table_delete(client, args, json).await,
        }
    }
}

async fn table_list(client: &HttpClient, args: ListArgs, json: bool) -> Result<()> {
    if args.all {
        let tables = client
            .list_all_tables(DEFAULT_FETCH_BATCH)
            .await
            .context("failed to fetch tables")?;
        let count = tables.len();
        let page = PaginatedResponse::new(tables, count as u64, 1, count.max(1) as u32);
        print_output(&TableListOutput(page), json);
        return Ok(());
    }

    let mut state = ListState::default();
    state.set_limit(args.limit);
    state.page = args.page.max(1);

    let page = client
        .list_tables(state.pagination())
        .await
        .context("failed to fetch tables")?;
    print_output(&TableListOutput(page), json);
    Ok(())
}

async fn table_show(client: &HttpClient, args: ShowArgs, json: bool) -> Result<()> {
    let mut table = client
        .get_table(args.id)
        .await
        .with_context(|| format!("failed to fetch table {}", args.id))?;

    let now = Utc::now();
    let resolution = ActiveOccupationResolver::new(client.clone())
        .refresh_table(&mut table, now)
        .await;

    print_output(
        &TableDetailOutput {
            table,
            resolution,
            now,
        },
        json,
    );
    Ok(())
}

async fn table_create(client: &HttpClient, args: CreateArgs, json: bool) -> Result<()> {
    let table = client
        .create_table(&TableCreate {
            number: args.number,
            brand: args.brand,
        })
        .await
        .context("failed to create table")?;
    print_output(&TableOutput(table), json);
    Ok(())
}

async fn table_update(client: &HttpClient, args: UpdateArgs, json: bool) -> Result<()> {
    let update = TableUpdate {
        id: args.id,
        number: args.number,
        brand: args.brand,
    };
    if update.is_empty() {
        bail!("nothing to update: pass --number and/or --brand");
    }
    let tables = client
        .update_tables(&[update])
        .await
        .with_context(|| format!("failed to update table {}", args.id))?;
    print_output(&TableBatchOutput(tables), json);
    Ok(())
}

async fn table_delete(client: &HttpClient, args: DeleteArgs, json: bool) -> Result<()> {
    if !args.yes {
        bail!("refusing to delete table {} without --yes", args.id);
    }
    let table = client
        .delete_table(args.id)
        .await
        .with_context(|| format!("failed to delete table {}", args.id))?;
    if json {
        print_output(&TableOutput(table), json);
    } else {
        println!("Deleted table #{} (id {})", table.number, table.id);
    }
    Ok(())
}
