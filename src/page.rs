//! HTML shells for the two programs.

use crate::config::PageConfig;
use crate::render::{Figure, PlotConfig};
use anyhow::{Context, Result};
use serde::Serialize;

/// Serializes `value` for inline `<script>` use; `<` is escaped so data cannot close the tag.
pub fn script_json<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value).context("Failed to serialize figure")?;
    Ok(json.replace('<', "\\u003c"))
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn stylesheet_links(page: &PageConfig) -> String {
    page.stylesheets
        .iter()
        .map(|href| format!(r#"<link rel="stylesheet" href="{}">"#, html_escape(href)))
        .collect::<Vec<_>>()
        .join("\n        ")
}

/// Full-viewport map page with pinch-zoom and scroll-bounce disabled.
pub fn render_static_page(page: &PageConfig, figure: &Figure, plot_config: &PlotConfig) -> Result<String> {
    Ok(format!(
        r#"<!DOCTYPE html>
<html>
    <head>
        <meta charset="UTF-8">
        <title>{title}</title>
        {stylesheets}
        <meta name="viewport" content="width=device-width, initial-scale=1.0, maximum-scale=1.0, user-scalable=no" />
        <style>
            body, html {{
                overflow: hidden;
                width: 100%;
                height: 100%;
                margin: 0;
                padding: 0;
            }}
            #map-container {{
                width: 100%;
                height: 100vh;
                position: fixed;
                top: 0;
                left: 0;
            }}
        </style>
        <script src="{plotly}"></script>
    </head>
    <body>
        <div id="main-container">
            <div id="map-container">
                <div id="map" style="width: 100%; height: 100%;"></div>
            </div>
        </div>
        <footer>
            <script>
                const figure = {figure};
                Plotly.newPlot('map', figure.data, figure.layout, {config});
            </script>
            <script>
                document.addEventListener('touchmove', function(e) {{
                    e.preventDefault();
                }}, {{ passive: false }});
            </script>
        </footer>
    </body>
</html>
"#,
        title = html_escape(&page.static_title),
        stylesheets = stylesheet_links(page),
        plotly = html_escape(&page.plotly_js_url),
        figure = script_json(figure)?,
        config = script_json(plot_config)?,
    ))
}

/// Upload form page. The browser reads the chosen file as a data URL and posts it to
/// `upload_path`; the response replaces the output area.
pub fn render_upload_page(page: &PageConfig, upload_path: &str, awaiting_message: &str) -> Result<String> {
    Ok(format!(
        r#"<!DOCTYPE html>
<html>
    <head>
        <meta charset="UTF-8">
        <title>{title}</title>
        <script src="{plotly}"></script>
        <style>
            #upload-data {{
                width: 60%;
                height: 60px;
                line-height: 60px;
                border-width: 2px;
                border-style: dashed;
                border-radius: 10px;
                text-align: center;
                margin: 20px auto;
                cursor: pointer;
            }}
            #upload-data.dragging {{
                background: #f0f0f0;
            }}
            #upload-data a {{
                color: #0d6efd;
                text-decoration: underline;
            }}
        </style>
    </head>
    <body>
        <h1>{title}</h1>
        <h3>Upload a CSV file with your data</h3>
        <div id="upload-data">
            Drag and Drop or <a>Select CSV File</a>
            <input id="upload-input" type="file" accept=".csv,text/csv" hidden>
        </div>
        <div id="output-map">{awaiting}</div>
        <script>
            // AwaitingUpload -> Validating -> Rendering -> Displayed, or -> Error -> AwaitingUpload.
            const zone = document.getElementById('upload-data');
            const input = document.getElementById('upload-input');
            const output = document.getElementById('output-map');
            let state = 'AwaitingUpload';

            function clearOutput() {{
                const graph = output.firstElementChild;
                if (graph) Plotly.purge(graph);
                output.textContent = '';
            }}

            function showText(text) {{
                clearOutput();
                output.textContent = text;
            }}

            function submit(file) {{
                if (!file) return;
                const reader = new FileReader();
                reader.onload = async function() {{
                    state = 'Validating';
                    try {{
                        const response = await fetch({endpoint}, {{
                            method: 'POST',
                            headers: {{ 'Content-Type': 'application/json' }},
                            body: JSON.stringify({{ contents: reader.result, filename: file.name }}),
                        }});
                        if (!response.ok) {{
                            throw new Error('upload failed with status ' + response.status);
                        }}
                        const outcome = await response.json();
                        if (outcome.status === 'rendered') {{
                            state = 'Rendering';
                            clearOutput();
                            const graph = document.createElement('div');
                            graph.style.width = '100%';
                            graph.style.height = '80vh';
                            output.appendChild(graph);
                            await Plotly.newPlot(graph, outcome.figure.data, outcome.figure.layout, outcome.config);
                            state = 'Displayed';
                        }} else {{
                            state = outcome.status === 'failed' ? 'Error' : 'AwaitingUpload';
                            showText(outcome.message);
                        }}
                    }} catch (err) {{
                        state = 'Error';
                        showText('Error processing the file: ' + err.message);
                    }}
                    if (state === 'Error') state = 'AwaitingUpload';
                    input.value = '';
                }};
                reader.readAsDataURL(file);
            }}

            zone.addEventListener('click', function() {{ input.click(); }});
            input.addEventListener('change', function() {{ submit(input.files[0]); }});
            zone.addEventListener('dragover', function(e) {{
                e.preventDefault();
                zone.classList.add('dragging');
            }});
            zone.addEventListener('dragleave', function() {{ zone.classList.remove('dragging'); }});
            zone.addEventListener('drop', function(e) {{
                e.preventDefault();
                zone.classList.remove('dragging');
                submit(e.dataTransfer.files[0]);
            }});
        </script>
    </body>
</html>
"#,
        title = html_escape(&page.upload_title),
        plotly = html_escape(&page.plotly_js_url),
        awaiting = html_escape(awaiting_message),
        endpoint = script_json(&upload_path)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::classify_all;
    use crate::render::build_static_figure;
    use crate::types::CountryRecord;

    #[test]
    fn static_page_locks_viewport_and_embeds_figure() {
        let countries = classify_all(vec![CountryRecord {
            country: "</script><b>Atlantis".to_string(),
            ios_percentage: Some(80.0),
            android_percentage: Some(20.0),
        }]);
        let figure = build_static_figure(&countries);
        let html = render_static_page(&PageConfig::default(), &figure, &PlotConfig::default()).unwrap();

        assert!(html.contains("user-scalable=no"));
        assert!(html.contains("overflow: hidden"));
        assert!(html.contains("touchmove"));
        assert!(html.contains("bootstrap.min.css"));
        assert!(html.contains("\"modeBarButtonsToRemove\":[\"select\",\"lasso2d\",\"autoScale2d\"]"));
        assert!(html.contains("\\u003c/script>\\u003cb>Atlantis"));
        assert!(!html.contains("</script><b>"));
    }

    #[test]
    fn upload_page_wires_endpoint_and_prompt() {
        let html = render_upload_page(&PageConfig::default(), "/upload", "Please upload a CSV file to display the map.").unwrap();

        assert!(html.contains("<h1>iOS vs Android Market Share Map</h1>"));
        assert!(html.contains("Drag and Drop or <a>Select CSV File</a>"));
        assert!(html.contains(r#"fetch("/upload""#));
        assert!(html.contains("readAsDataURL"));
        assert!(html.contains("<div id=\"output-map\">Please upload a CSV file to display the map.</div>"));
        assert!(!html.contains("user-scalable=no"));
    }

    #[test]
    fn upload_page_purges_previous_plot_before_replacing_it() {
        let html = render_upload_page(&PageConfig::default(), "/upload", "waiting").unwrap();

        assert!(html.contains("const graph = output.firstElementChild;"));
        assert!(html.contains("if (graph) Plotly.purge(graph);"));
        assert!(!html.contains("Plotly.purge(output)"));
    }

    #[test]
    fn escapes_markup_in_titles() {
        let page = PageConfig {
            static_title: "Share <2024>".to_string(),
            ..PageConfig::default()
        };
        let html = render_static_page(&page, &build_static_figure(&[]), &PlotConfig::default()).unwrap();
        assert!(html.contains("<title>Share &lt;2024&gt;</title>"));
    }
}
