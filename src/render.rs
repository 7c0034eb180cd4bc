//! Plotly figure construction.
//!
//! Figures are plain serde structs mirroring the plotly.js JSON schema; the browser hands
//! them to `Plotly.newPlot` unchanged. Country-name matching and drawing are done there.

use crate::types::{ClassifiedCountry, Platform};
use serde::Serialize;

pub const ANDROID_GREEN: &str = "#A4C639";
pub const NEUTRAL_GREY: &str = "#999999";
pub const IOS_GREEN: &str = "#5BC236";

pub const UPLOAD_ANDROID_GREEN: &str = "#2ca02c";
pub const UPLOAD_IOS_BLUE: &str = "#1f77b4";

const LOCATION_MODE: &str = "country names";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Choropleth(ChoroplethTrace),
    Scattergeo(ScatterGeoTrace),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethTrace {
    pub locations: Vec<String>,
    pub locationmode: &'static str,
    pub z: Vec<u8>,
    pub zmin: u8,
    pub zmax: u8,
    pub text: Vec<String>,
    pub colorscale: Vec<(f64, &'static str)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autocolorscale: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showscale: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoverinfo: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertext: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<ChoroplethMarker>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethMarker {
    pub line: Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub color: &'static str,
    pub width: f64,
}

/// Invisible point trace; only its legend entry is ever drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterGeoTrace {
    pub lon: Vec<Option<f64>>,
    pub lat: Vec<Option<f64>>,
    pub mode: &'static str,
    pub marker: Marker,
    pub name: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub size: u32,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    pub geo: Geo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_bgcolor: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_bgcolor: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
}

// Cosmetic only; passed to plotly verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Geo {
    pub showframe: bool,
    pub showcoastlines: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coastlinecolor: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showland: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landcolor: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showocean: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oceancolor: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlakes: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showrivers: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showcountries: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countrycolor: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countrywidth: Option<f64>,
    pub projection: Projection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Projection {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Margin {
    pub r: u32,
    pub t: u32,
    pub l: u32,
    pub b: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub title: Title,
    pub orientation: &'static str,
    pub yanchor: &'static str,
    pub y: f64,
    pub xanchor: &'static str,
    pub x: f64,
}

/// Options for the chart toolbar, shared by both pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotConfig {
    pub display_mode_bar: bool,
    pub mode_bar_buttons_to_remove: Vec<&'static str>,
    pub displaylogo: bool,
    pub scroll_zoom: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            display_mode_bar: true,
            mode_bar_buttons_to_remove: vec!["select", "lasso2d", "autoScale2d"],
            displaylogo: false,
            scroll_zoom: true,
        }
    }
}

pub fn upload_color(platform: Platform) -> &'static str {
    match platform {
        Platform::Ios => UPLOAD_IOS_BLUE,
        Platform::Android => UPLOAD_ANDROID_GREEN,
    }
}

pub const MISSING_SHARE: &str = "nan";

/// Formats a coerced share for hover text; the missing marker prints as `nan`.
pub fn format_share(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => MISSING_SHARE.to_string(),
    }
}

pub fn hover_text(country: &ClassifiedCountry) -> String {
    format!(
        "{}<br>iOS: {}%<br>Android: {}%",
        country.record.country,
        format_share(country.record.ios_percentage),
        format_share(country.record.android_percentage)
    )
}

fn base_choropleth(countries: &[ClassifiedCountry], colorscale: Vec<(f64, &'static str)>) -> ChoroplethTrace {
    ChoroplethTrace {
        locations: countries.iter().map(|c| c.record.country.clone()).collect(),
        locationmode: LOCATION_MODE,
        z: countries.iter().map(|c| c.dominant_platform.z()).collect(),
        zmin: Platform::Android.z(),
        zmax: Platform::Ios.z(),
        text: countries.iter().map(|c| c.record.country.clone()).collect(),
        colorscale,
        autocolorscale: None,
        showscale: None,
        showlegend: None,
        hoverinfo: None,
        hovertext: None,
        marker: None,
    }
}

/// The single figure of the static page. The grey midpoint is never hit by a binary z.
pub fn build_static_figure(countries: &[ClassifiedCountry]) -> Figure {
    let mut trace = base_choropleth(
        countries,
        vec![(0.0, ANDROID_GREEN), (0.5, NEUTRAL_GREY), (1.0, IOS_GREEN)],
    );
    trace.autocolorscale = Some(false);
    trace.marker = Some(ChoroplethMarker {
        line: Line {
            color: "darkgray",
            width: 0.5,
        },
    });

    Figure {
        data: vec![Trace::Choropleth(trace)],
        layout: Layout {
            title: Title {
                text: "Dominant Mobile Platform by Country",
            },
            geo: Geo {
                showframe: false,
                showcoastlines: true,
                projection: Projection {
                    kind: "equirectangular",
                },
                ..Geo::default()
            },
            margin: None,
            paper_bgcolor: None,
            plot_bgcolor: None,
            legend: None,
        },
    }
}

/// Figure returned for an upload: the choropleth plus two legend-only traces.
pub fn build_upload_figure(countries: &[ClassifiedCountry]) -> Figure {
    let mut trace = base_choropleth(
        countries,
        vec![(0.0, UPLOAD_ANDROID_GREEN), (1.0, UPLOAD_IOS_BLUE)],
    );
    trace.showlegend = Some(false);
    trace.showscale = Some(false);
    trace.hoverinfo = Some("text");
    trace.hovertext = Some(countries.iter().map(hover_text).collect());

    let legend_entry = |platform: Platform| {
        Trace::Scattergeo(ScatterGeoTrace {
            lon: vec![None],
            lat: vec![None],
            mode: "markers",
            marker: Marker {
                size: 10,
                color: upload_color(platform),
            },
            name: platform.label(),
        })
    };

    Figure {
        data: vec![
            Trace::Choropleth(trace),
            legend_entry(Platform::Ios),
            legend_entry(Platform::Android),
        ],
        layout: Layout {
            title: Title {
                text: "iOS vs Android Market Share by Country",
            },
            geo: Geo {
                showframe: false,
                showcoastlines: true,
                coastlinecolor: Some("RebeccaPurple"),
                showland: Some(true),
                landcolor: Some("LightGrey"),
                showocean: Some(true),
                oceancolor: Some("LightBlue"),
                showlakes: Some(false),
                showrivers: Some(false),
                showcountries: Some(true),
                countrycolor: Some("white"),
                countrywidth: Some(0.5),
                projection: Projection {
                    kind: "natural earth",
                },
            },
            margin: Some(Margin { r: 0, t: 40, l: 0, b: 0 }),
            paper_bgcolor: Some("rgba(0,0,0,0)"),
            plot_bgcolor: Some("rgba(0,0,0,0)"),
            legend: Some(Legend {
                title: Title {
                    text: "Dominant Platform",
                },
                orientation: "h",
                yanchor: "bottom",
                y: 1.02,
                xanchor: "right",
                x: 1.0,
            }),
        },
    }
}
