use chrono::{DateTime, Utc};

use super::DashboardError;
use crate::config::DashboardConfig;

const DATA_PLACEHOLDER: &str = "{{DASHBOARD_DATA}}";
const DATA_OPEN_TAG: &str = r#"<script id="dashboard-data" type="application/json">"#;

/// Static viewer document. The payload lands in the `dashboard-data`
/// element; every other placeholder is fixed page chrome.
const DASHBOARD_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{TITLE}}</title>
    <script src="{{CHART_LIBRARY_URL}}"></script>
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Helvetica, Arial, sans-serif; margin: 0; background-color: #f8f9fa; }
        .container { padding: 20px; }
        h1 { text-align: center; color: #333; }
        .controls { display: flex; justify-content: center; align-items: center; margin-bottom: 20px; }
        label { font-size: 1.1em; margin-right: 10px; }
        select { padding: 8px; font-size: 1em; border-radius: 5px; border: 1px solid #ccc; }
        .chart-container { display: flex; flex-wrap: wrap; justify-content: center; gap: 20px; }
        .chart { width: 100%; max-width: 800px; box-shadow: 0 4px 8px rgba(0,0,0,0.1); background: white; border-radius: 8px; }
        footer { text-align: center; color: #888; font-size: 0.8em; padding: 10px; }
    </style>
</head>
<body>
    <div class="container">
        <h1>{{TITLE}}</h1>
        <div class="controls">
            <label for="state-selector">Select State:</label>
            <select id="state-selector"></select>
        </div>
        <div class="chart-container">
            <div id="price-chart" class="chart"></div>
            <div id="sales-chart" class="chart"></div>
        </div>
    </div>
    <footer>Synthetic data, generated {{GENERATED_AT}}</footer>

    <script id="dashboard-data" type="application/json">{{DASHBOARD_DATA}}</script>
    <script>
        const data = JSON.parse(document.getElementById('dashboard-data').textContent);
        const defaultState = {{DEFAULT_STATE}};
        const stateSelector = document.getElementById('state-selector');
        const legend = { x: 0.01, y: 0.99, yanchor: 'top', bgcolor: 'rgba(255, 255, 255, 0.8)', bordercolor: '#ccc', borderwidth: 1 };

        function populateSelector() {
            const states = Object.keys(data);
            states.forEach(state => {
                const option = document.createElement('option');
                option.value = state;
                option.textContent = state;
                stateSelector.appendChild(option);
            });
            stateSelector.value = defaultState in data ? defaultState : states[0];
        }

        function trace(points, field, name, color, dash) {
            return {
                x: points.map(p => p.year),
                y: points.map(p => p[field]),
                mode: 'lines+markers',
                name: name,
                line: dash ? { color: color, dash: dash } : { color: color }
            };
        }

        function layout(title, yTitle) {
            return { title: title, xaxis: { title: 'Year' }, yaxis: { title: yTitle }, margin: { t: 50, l: 60, r: 30, b: 50 }, legend: legend };
        }

        function updateCharts() {
            const state = stateSelector.value;
            const series = data[state];
            if (!series) { return; }

            Plotly.newPlot('price-chart', [
                trace(series.historical, 'price', 'Historical Price', '#1f77b4'),
                trace(series.forecast, 'price', 'Predicted Price', '#ff7f0e', 'dash')
            ], layout(`<b>Price Forecast for ${state}</b>`, 'Average Price (cents/kWh)'));

            Plotly.newPlot('sales-chart', [
                trace(series.historical, 'sales', 'Historical Sales', '#2ca02c'),
                trace(series.forecast, 'sales', 'Predicted Sales', '#d62728', 'dash')
            ], layout(`<b>Sales Forecast for ${state}</b>`, 'Total Sales (MWh)'));
        }

        populateSelector();
        updateCharts();
        stateSelector.addEventListener('change', updateCharts);
    </script>
</body>
</html>
"#;

/// Fill the viewer template. `payload_json` must already be script-safe
/// (see [`super::DashboardPayload::to_json`]).
pub fn render_dashboard(
    payload_json: &str,
    cfg: &DashboardConfig,
    generated_at: DateTime<Utc>,
) -> Result<String, DashboardError> {
    let (head, tail) = DASHBOARD_TEMPLATE
        .split_once(DATA_PLACEHOLDER)
        .filter(|(_, tail)| !tail.contains(DATA_PLACEHOLDER))
        .ok_or_else(|| {
            DashboardError::Template("data placeholder must appear exactly once".to_string())
        })?;

    let default_state = serde_json::to_string(&cfg.default_state)?
        .replace('<', "\\u003c")
        .replace('>', "\\u003e");
    let generated_at = generated_at.format("%Y-%m-%d %H:%M UTC").to_string();

    // Chrome is filled on each side of the data slot separately, so neither
    // configured text nor the payload can move the insertion point.
    let fill_chrome = |part: &str| {
        part.replace("{{TITLE}}", &escape_html(&cfg.title))
            .replace("{{CHART_LIBRARY_URL}}", &escape_html(&cfg.chart_library_url))
            .replace("{{DEFAULT_STATE}}", &default_state)
            .replace("{{GENERATED_AT}}", &generated_at)
    };

    let mut html = fill_chrome(head);
    html.push_str(payload_json);
    html.push_str(&fill_chrome(tail));
    Ok(html)
}

/// The JSON blob embedded by [`render_dashboard`], if present
pub fn extract_payload(html: &str) -> Option<&str> {
    let start = html.find(DATA_OPEN_TAG)? + DATA_OPEN_TAG.len();
    let len = html[start..].find("</script>")?;
    Some(&html[start..start + len])
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_payload_inserted_once_and_extractable() {
        let cfg = DashboardConfig::default();
        let json = r#"{"Ohio":{"historical":[],"forecast":[]}}"#;
        let html = render_dashboard(json, &cfg, fixed_time()).unwrap();

        assert!(!html.contains("{{"));
        assert_eq!(
            extract_payload(&html),
            Some(r#"{"Ohio":{"historical":[],"forecast":[]}}"#)
        );
    }

    #[test]
    fn test_chrome_substituted() {
        let cfg = DashboardConfig {
            title: "Outlook <beta>".to_string(),
            ..Default::default()
        };
        let html = render_dashboard("{}", &cfg, fixed_time()).unwrap();

        assert!(html.contains(r#"<script src="https://cdn.plot.ly/plotly-2.24.1.min.js"></script>"#));
        assert!(html.contains("<title>Outlook &lt;beta&gt;</title>"));
        assert!(html.contains(r#"const defaultState = "California";"#));
        assert!(html.contains("generated 2025-01-15 12:30 UTC"));
    }

    #[test]
    fn test_payload_placeholders_not_expanded() {
        let cfg = DashboardConfig::default();
        let html = render_dashboard(r#"{"note":"{{TITLE}}"}"#, &cfg, fixed_time()).unwrap();
        assert_eq!(extract_payload(&html), Some(r#"{"note":"{{TITLE}}"}"#));
    }

    #[test]
    fn test_placeholder_text_in_title_keeps_data_slot() {
        let cfg = DashboardConfig {
            title: "Run {{DASHBOARD_DATA}}".to_string(),
            ..Default::default()
        };
        let html = render_dashboard(r#"{"Ohio":{}}"#, &cfg, fixed_time()).unwrap();

        assert_eq!(extract_payload(&html), Some(r#"{"Ohio":{}}"#));
        assert!(html.contains("<title>Run {{DASHBOARD_DATA}}</title>"));
        assert_eq!(html.matches(r#"{"Ohio":{}}"#).count(), 1);
    }

    #[test]
    fn test_extract_missing_block() {
        assert_eq!(extract_payload("<html></html>"), None);
    }
}
