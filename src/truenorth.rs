use std::sync::{Arc, Mutex};
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams, EventResponseReceived, GetResponseBodyParams, SetUserAgentOverrideParams,
};
use chromiumoxide::error::CdpError;
use chromiumoxide::Page;
use futures::StreamExt;
use serde_json::Value;
use tracing::{info, warn};

/// URL substring identifying the background response that carries the grid data.
pub const SCHEDULE_ENDPOINT: &str = "/Schedule/GetTeamScheduleGrid";

const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(60);
// The grid request can fire after the load event; keep listening a little longer.
const LATE_RESPONSE_GRACE: Duration = Duration::from_secs(5);

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

// Reads the rendered schedule table when no grid response was intercepted.
// Column order: Date | Time | Rink | Home | Home Score | Away | Away Score.
// Stringified because CDP only returns primitives by value.
const DOM_FALLBACK_JS: &str = r#"
    JSON.stringify(Array.from(document.querySelectorAll("table#grdSchedule tr, table.schedule tr"))
        .map(row => Array.from(row.querySelectorAll("td")).map(c => c.innerText.trim()))
        .filter(cells => cells.length >= 4)
        .map(cells => ({
            gameDate:     cells[0] ?? "",
            gameTime:     cells[1] ?? "",
            rinkName:     cells[2] ?? "",
            homeTeamName: cells[3] ?? "",
            homeScore:    cells[4] ?? "",
            awayTeamName: cells[5] ?? "",
            awayScore:    cells[6] ?? "",
        })))
"#;

/// Result of one page load: the raw schedule items intercepted from the
/// grid endpoint, plus the page's visible text for season detection.
pub struct TrueNorth {
    pub raw_items: Vec<Value>,
    pub page_text: String,
}

impl TrueNorth {
    /// Load the team page in headless Chromium and capture the schedule.
    ///
    /// The browser session is torn down before returning on every path.
    /// Navigation failure or timeout is fatal; capturing zero items is not.
    pub async fn fetch(team_page_url: &str) -> Result<Self, String> {
        let browser_config = BrowserConfig::builder()
            .build()
            .map_err(|e| format!("browser config: {}", e))?;
        let (mut browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| format!("failed to launch browser: {}", e))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let result = Self::capture(&browser, team_page_url).await;

        if let Err(e) = browser.close().await {
            warn!(error = %e, "Failed to close browser cleanly");
        }
        let _ = browser.wait().await;
        handler_task.abort();

        result
    }

    async fn capture(browser: &Browser, team_page_url: &str) -> Result<Self, String> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| format!("failed to open page: {}", e))?;
        page.set_user_agent(SetUserAgentOverrideParams::new(USER_AGENT))
            .await
            .map_err(|e| format!("failed to set user agent: {}", e))?;
        page.execute(EnableParams::default())
            .await
            .map_err(|e| format!("failed to enable network events: {}", e))?;

        // Listener must be in place before navigation starts so no response is
        // missed to a listen/load race.
        let mut responses = page
            .event_listener::<EventResponseReceived>()
            .await
            .map_err(|e| format!("failed to register response listener: {}", e))?;

        // Appended to by the capture task, read only after the wait window closes.
        let captured: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
        let collector = tokio::spawn({
            let page = page.clone();
            let captured = Arc::clone(&captured);
            async move {
                while let Some(event) = responses.next().await {
                    if !event.response.url.contains(SCHEDULE_ENDPOINT) {
                        continue;
                    }
                    match page
                        .execute(GetResponseBodyParams::new(event.request_id.clone()))
                        .await
                    {
                        Ok(body) => {
                            if body.base64_encoded {
                                warn!(url = %event.response.url, "Schedule response body is base64-encoded; skipping");
                                continue;
                            }
                            let items = extract_items(&body.body);
                            if items.is_empty() {
                                warn!(url = %event.response.url, "Schedule endpoint responded but carried no items");
                            } else {
                                info!(count = items.len(), url = %event.response.url, "Captured schedule records");
                                captured.lock().expect("capture list lock").extend(items);
                            }
                        }
                        Err(e) => {
                            warn!(error = %e, url = %event.response.url, "Could not read schedule response body");
                        }
                    }
                }
            }
        });

        info!(url = %team_page_url, "Navigating to team page");
        let nav: Result<(), String> = match tokio::time::timeout(NAVIGATION_TIMEOUT, async {
            page.goto(team_page_url).await?;
            page.wait_for_navigation().await?;
            Ok::<(), CdpError>(())
        })
        .await
        {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(format!("navigation failed: {}", e)),
            Err(_) => Err(format!(
                "navigation timed out after {}s",
                NAVIGATION_TIMEOUT.as_secs()
            )),
        };
        if let Err(e) = nav {
            collector.abort();
            return Err(e);
        }

        tokio::time::sleep(LATE_RESPONSE_GRACE).await;
        collector.abort();

        let page_text = match page.evaluate("document.body.innerText").await {
            Ok(result) => match result.into_value::<String>() {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "Page text was not a string; season detection will fall back");
                    String::new()
                }
            },
            Err(e) => {
                warn!(error = %e, "Could not read page text; season detection will fall back");
                String::new()
            }
        };

        let mut raw_items = {
            let mut guard = captured.lock().expect("capture list lock");
            std::mem::take(&mut *guard)
        };

        if raw_items.is_empty() {
            warn!("No schedule responses intercepted; attempting DOM fallback");
            raw_items = dom_fallback(&page).await;
        }
        if raw_items.is_empty() {
            warn!("No schedule items captured; the run will emit an empty calendar");
        }

        Ok(TrueNorth { raw_items, page_text })
    }
}

/// Pull the item array out of one grid response body.
///
/// The endpoint nests its records at `dt.it`; any shape drift yields an
/// empty list rather than an error, so the run degrades to zero games.
pub fn extract_items(body: &str) -> Vec<Value> {
    match serde_json::from_str::<Value>(body) {
        Ok(data) => match data.pointer("/dt/it") {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        },
        Err(e) => {
            warn!(error = %e, "Could not parse schedule response as JSON");
            Vec::new()
        }
    }
}

async fn dom_fallback(page: &Page) -> Vec<Value> {
    let json = match page.evaluate(DOM_FALLBACK_JS).await {
        Ok(result) => match result.into_value::<String>() {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "DOM fallback returned an unexpected shape");
                return Vec::new();
            }
        },
        Err(e) => {
            warn!(error = %e, "DOM fallback evaluation failed");
            return Vec::new();
        }
    };
    match serde_json::from_str::<Vec<Value>>(&json) {
        Ok(rows) => {
            info!(rows = rows.len(), "DOM fallback scraped schedule rows");
            rows
        }
        Err(e) => {
            warn!(error = %e, "DOM fallback rows did not parse");
            Vec::new()
        }
    }
}
