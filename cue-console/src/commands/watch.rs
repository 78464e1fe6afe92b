//! Live countdown command.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use cue_client::{ActiveOccupationResolver, ClientConfig, CountdownFrame, HttpClient, OccupationWatcher};
use serde_json::json;

use crate::output::{TableOutput, print_output};

#[derive(Args)]
pub struct WatchArgs {
    /// Table id.
    pub table_id: i64,

    /// Re-query the occupation every N ticks (0 = only at start).
    #[arg(long)]
    pub refetch_every: Option<u32>,

    /// Tick period in milliseconds.
    #[arg(long)]
    pub tick_millis: Option<u64>,
}

impl WatchArgs {
    /// Print one line per tick until Ctrl-C.
    pub async fn run(self, client: HttpClient, config: &ClientConfig, json: bool) -> Result<()> {
        let table = client
            .get_table(self.table_id)
            .await
            .with_context(|| format!("failed to fetch table {}", self.table_id))?;
        if !json {
            print_output(&TableOutput(table), false);
        }

        let mut config = config.clone();
        if let Some(ticks) = self.refetch_every {
            config = config.with_refetch_every(ticks);
        }
        if let Some(millis) = self.tick_millis {
            config = config.with_tick_millis(millis);
        }

        let resolver = Arc::new(ActiveOccupationResolver::new(client));
        let handle = OccupationWatcher::new(resolver, &config).watch(self.table_id);
        let mut frames = handle.subscribe();

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::debug!("Ctrl-C received, stopping countdown");
                    break;
                }
                changed = frames.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let frame = frames.borrow_and_update().clone();
                    if let Some(frame) = frame {
                        print_frame(&frame, json);
                    }
                }
            }
        }

        handle.join().await;
        Ok(())
    }
}

fn print_frame(frame: &CountdownFrame, json: bool) {
    if json {
        println!(
            "{}",
            json!({
                "table_id": frame.table_id,
                "tick": frame.tick,
                "at": frame.at,
                "status": frame.status,
                "occupancy": frame.occupancy,
                "label": frame.label(),
                "occupation_id": frame.occupation.as_ref().map(|o| o.id),
                "error": frame.error,
            })
        );
    } else {
        println!("{}  {}", frame.at.with_timezone(&Local).format("%H:%M:%S"), frame);
    }
}
