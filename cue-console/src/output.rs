//! Output formatting for CLI responses.
//!
//! Human-readable tables by default, JSON with `--json`.

use chrono::{DateTime, Local, Utc};
use cue_client::Resolution;
use serde_json::json;
use shared::{ListState, Occupancy, PaginatedResponse, Serialize, Table, TableOccupation};

/// Types that can be printed in both formats.
pub trait Outputable {
    fn to_json(&self) -> serde_json::Value;

    fn to_human(&self) -> String;
}

/// Print a value in the appropriate format.
pub fn print_output<T: Outputable>(value: &T, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&value.to_json())
                .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize: {}\"}}", e))
        );
    } else {
        println!("{}", value.to_human());
    }
}

/// `01 May 2024 22:00` in local time
pub fn fmt_time(t: DateTime<Utc>) -> String {
    t.with_timezone(&Local).format("%d %b %Y %H:%M").to_string()
}

fn fmt_optional_time(t: Option<DateTime<Utc>>) -> String {
    t.map(fmt_time).unwrap_or_else(|| "-".to_string())
}

/// "Showing 11 to 20 of 42 entries (page 2/5)"
fn page_footer<T>(page: &PaginatedResponse<T>) -> String {
    let mut state = ListState {
        page: page.page,
        limit: page.limit,
        ..ListState::default()
    };
    state.apply(page);
    let (from, to, count) = state.showing_range();
    format!(
        "Showing {} to {} of {} entries (page {}/{})",
        from,
        to,
        count,
        page.page,
        page.total_pages.max(1)
    )
}

/// Same shape as the backend's list envelope
fn page_json<T: Serialize>(page: &PaginatedResponse<T>, items_key: &str) -> serde_json::Value {
    let mut value = json!({
        "page": page.page,
        "limit": page.limit,
        "count": page.count,
        "total_pages": page.total_pages,
    });
    value[items_key] = json!(page.items);
    value
}

// ===== Tables =====

pub struct TableListOutput(pub PaginatedResponse<Table>);

impl Outputable for TableListOutput {
    fn to_json(&self) -> serde_json::Value {
        page_json(&self.0, "tables")
    }

    fn to_human(&self) -> String {
        if self.0.is_empty() {
            return format!("No tables\n{}", page_footer(&self.0));
        }
        let mut out = format!("{:<6} {:<8} {:<10} {}\n", "ID", "NUMBER", "BRAND", "LAST UPDATED");
        for table in &self.0.items {
            out.push_str(&format!(
                "{:<6} #{:<7} {:<10} {}\n",
                table.id,
                table.number,
                table.brand.label(),
                fmt_time(table.updated_at)
            ));
        }
        out.push_str(&page_footer(&self.0));
        out
    }
}

pub struct TableOutput(pub Table);

impl Outputable for TableOutput {
    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.0).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        let t = &self.0;
        format!(
            "Table #{} (id {})\n  Brand:        {}\n  Created:      {}\n  Last updated: {}",
            t.number,
            t.id,
            t.brand.label(),
            fmt_time(t.created_at),
            fmt_time(t.updated_at)
        )
    }
}

/// Table detail with its current occupation
pub struct TableDetailOutput {
    pub table: Table,
    pub resolution: Resolution,
    pub now: DateTime<Utc>,
}

impl Outputable for TableDetailOutput {
    fn to_json(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(&self.table).unwrap_or_default();
        if let Some(obj) = value.as_object_mut() {
            obj.insert("status".into(), json!(self.table.status));
            obj.insert(
                "active_occupation".into(),
                json!(self.resolution.occupation()),
            );
            obj.insert(
                "occupancy".into(),
                json!(self.resolution.occupancy(self.now)),
            );
            if let Resolution::Unavailable { reason } = &self.resolution {
                obj.insert("error".into(), json!(reason));
            }
        }
        value
    }

    fn to_human(&self) -> String {
        let mut out = TableOutput(self.table.clone()).to_human();
        out.push_str(&format!("\n  Status:       {}", self.table.status));
        match &self.resolution {
            Resolution::Unavailable { reason } => {
                out.push_str(&format!("\n  Occupation:   unavailable ({reason})"));
            }
            Resolution::Known(occupation) => {
                let occupancy = Occupancy::classify(occupation.as_ref(), self.now);
                if let Some(o) = occupation {
                    out.push_str(&format!(
                        "\n  Occupation:   #{} {} -> {}",
                        o.id,
                        fmt_time(o.started_at),
                        fmt_optional_time(o.finished_at)
                    ));
                }
                out.push_str(&format!("\n  {:<13} {}", format!("{}:", occupancy.caption()), occupancy.countdown()));
            }
        }
        out
    }
}

pub struct TableBatchOutput(pub Vec<Table>);

impl Outputable for TableBatchOutput {
    fn to_json(&self) -> serde_json::Value {
        json!({ "updated_tables": self.0 })
    }

    fn to_human(&self) -> String {
        self.0
            .iter()
            .map(|t| format!("Updated table {} -> #{} ({})", t.id, t.number, t.brand.label()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// ===== Occupations =====

pub struct OccupationListOutput(pub PaginatedResponse<TableOccupation>);

impl Outputable for OccupationListOutput {
    fn to_json(&self) -> serde_json::Value {
        page_json(&self.0, "table_occupations")
    }

    fn to_human(&self) -> String {
        if self.0.is_empty() {
            return format!("No occupations\n{}", page_footer(&self.0));
        }
        let mut out = format!(
            "{:<6} {:<6} {:<18} {:<18} {:<18} {}\n",
            "ID", "TABLE", "STARTED AT", "FINISHED AT", "CREATED AT", "UPDATED AT"
        );
        for o in &self.0.items {
            out.push_str(&format!(
                "{:<6} {:<6} {:<18} {:<18} {:<18} {}\n",
                o.id,
                o.table_id,
                fmt_time(o.started_at),
                fmt_optional_time(o.finished_at),
                fmt_time(o.created_at),
                fmt_time(o.updated_at)
            ));
        }
        out.push_str(&page_footer(&self.0));
        out
    }
}

pub struct OccupationOutput {
    pub occupation: TableOccupation,
    pub action: &'static str,
}

impl Outputable for OccupationOutput {
    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.occupation).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        let o = &self.occupation;
        format!(
            "{} occupation {} of table {}: {} -> {}",
            self.action,
            o.id,
            o.table_id,
            fmt_time(o.started_at),
            fmt_optional_time(o.finished_at)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shared::TableBrand;

    fn table(id: i64, number: i32) -> Table {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap();
        Table {
            id,
            number,
            brand: TableBrand::Mrsung,
            created_at: at,
            updated_at: at,
            status: Default::default(),
        }
    }

    #[test]
    fn test_table_list_footer() {
        let page = PaginatedResponse::new(vec![table(11, 11), table(12, 12)], 12, 2, 10);
        let human = TableListOutput(page).to_human();
        assert!(human.contains("MRSUNG"));
        assert!(human.ends_with("Showing 11 to 12 of 12 entries (page 2/2)"));
    }

    #[test]
    fn test_table_list_footer_past_last_page() {
        let page: PaginatedResponse<Table> = PaginatedResponse::new(Vec::new(), 15, 4, 10);
        let human = TableListOutput(page).to_human();
        assert!(human.ends_with("Showing 0 to 0 of 15 entries (page 4/2)"));

        let malformed: PaginatedResponse<Table> = PaginatedResponse::new(Vec::new(), 15, 0, 10);
        assert!(TableListOutput(malformed).to_human().contains("Showing 1 to 10 of 15"));
    }

    #[test]
    fn test_table_list_json_uses_backend_keys() {
        let page = PaginatedResponse::new(vec![table(1, 1)], 1, 1, 10);
        let value = TableListOutput(page).to_json();
        assert_eq!(value["total_pages"], 1);
        assert_eq!(value["tables"][0]["brand"], "mrsung");
    }

    #[test]
    fn test_detail_unavailable() {
        let out = TableDetailOutput {
            table: table(3, 3),
            resolution: Resolution::Unavailable {
                reason: "HTTP error: timed out".into(),
            },
            now: Utc::now(),
        };
        assert!(out.to_human().contains("unavailable (HTTP error: timed out)"));
        assert_eq!(out.to_json()["error"], "HTTP error: timed out");
        assert_eq!(out.to_json()["status"], "available");
    }
}
