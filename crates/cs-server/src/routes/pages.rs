//! Human-readable history page.

use tracing::error;
use warp::{Filter, Rejection, Reply};

use cs_infra::db::models::clipboard_record::DbClipboardRecord;
use cs_infra::store::ClipboardStore;

use super::with_store;
use crate::mapper::format_timestamp;

const PAGE_LIMIT: i64 = 20;

/// `GET /` — the most recent records rendered as HTML.
pub fn index(
    store: ClipboardStore,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path::end()
        .and(warp::get())
        .and(with_store(store))
        .and_then(handle_index)
}

async fn handle_index(store: ClipboardStore) -> Result<impl Reply, Rejection> {
    let records = match store.recent(None, Some(PAGE_LIMIT)) {
        Ok(records) => records,
        Err(err) => {
            error!(error = %err, "failed to load history for the index page");
            Vec::new()
        }
    };
    Ok(warp::reply::html(render_history(&records)))
}

fn render_history(records: &[DbClipboardRecord]) -> String {
    let mut items = String::new();
    if records.is_empty() {
        items.push_str(r#"<div class="empty-message"><p>No clipboard records yet</p></div>"#);
    } else {
        for record in records {
            items.push_str(&format!(
                concat!(
                    r#"<div class="clipboard-item">"#,
                    r#"<div class="content">{}</div>"#,
                    r#"<div class="meta">Device: {}<br>Time: {}</div>"#,
                    "</div>\n"
                ),
                escape_html(&record.content),
                escape_html(&record.device_id),
                format_timestamp(record.created_at),
            ));
        }
    }

    format!(
        concat!(
            "<!DOCTYPE html>\n<html>\n<head>\n",
            r#"<title>Clipboard History</title>"#,
            r#"<meta charset="utf-8">"#,
            "<style>\n",
            "body {{ font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; background-color: #f5f5f5; }}\n",
            "h1 {{ color: #333; text-align: center; margin-bottom: 30px; }}\n",
            ".clipboard-item {{ background: white; padding: 15px; margin-bottom: 15px; border-radius: 5px; box-shadow: 0 2px 5px rgba(0,0,0,0.1); }}\n",
            ".content {{ font-size: 16px; margin-bottom: 10px; word-break: break-all; }}\n",
            ".meta {{ color: #666; font-size: 14px; }}\n",
            ".empty-message {{ text-align: center; color: #666; margin-top: 50px; }}\n",
            "</style>\n</head>\n<body>\n",
            "<h1>Clipboard History</h1>\n{}\n</body>\n</html>\n"
        ),
        items
    )
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
