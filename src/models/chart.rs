//! Chart data in the shape expected by Chart.js.
//!
//! Drawing is left to the consumer; this module only shapes labels and values.

use serde::Serialize;

use super::record::RecordPayload;

/// Label of the single dataset in bar and line charts.
pub const RATING_LABEL: &str = "Bewertung";

/// Label used for list entries whose self link is missing.
pub const UNDEFINED_ID: &str = "undefined";

const BACKGROUND_COLORS: [&str; 5] = ["#F7464A", "#46BFBD", "#FDB45C", "#949FB1", "#4D5360"];
const HOVER_BACKGROUND_COLORS: [&str; 5] =
    ["#FF5A5E", "#5AD3D1", "#FFC870", "#A8B3C5", "#616774"];

pub fn background_color(index: usize) -> &'static str {
    BACKGROUND_COLORS[index % BACKGROUND_COLORS.len()]
}

pub fn hover_background_color(index: usize) -> &'static str {
    HOVER_BACKGROUND_COLORS[index % HOVER_BACKGROUND_COLORS.len()]
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Line,
    Pie,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data: Vec<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover_background_color: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    pub data: ChartData,
}

impl ChartConfig {
    /// Build a chart of ratings labelled by record identifier. Entries without
    /// a rating are skipped.
    pub fn from_payloads(chart_type: ChartType, payloads: &[RecordPayload]) -> Self {
        let (labels, ratings): (Vec<String>, Vec<u8>) = payloads
            .iter()
            .filter_map(|payload| {
                let rating = payload.rating?.clamp(0, 5) as u8;
                let id = payload
                    .id_from_self_link()
                    .unwrap_or_else(|| UNDEFINED_ID.to_string());
                Some((id, rating))
            })
            .unzip();
        tracing::debug!("ChartConfig::from_payloads(): labels={:?}", labels);

        let dataset = match chart_type {
            ChartType::Bar | ChartType::Line => Dataset {
                label: Some(RATING_LABEL.to_string()),
                data: ratings,
                background_color: None,
                hover_background_color: None,
            },
            ChartType::Pie => {
                let count = ratings.len();
                Dataset {
                    label: None,
                    data: ratings,
                    background_color: Some(
                        (0..count).map(|i| background_color(i).to_string()).collect(),
                    ),
                    hover_background_color: Some(
                        (0..count)
                            .map(|i| hover_background_color(i).to_string())
                            .collect(),
                    ),
                }
            }
        };

        Self {
            chart_type,
            data: ChartData {
                labels,
                datasets: vec![dataset],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payloads() -> Vec<RecordPayload> {
        serde_json::from_value(json!([
            { "titel": "A", "art": "KINDLE", "rating": 4,
              "_links": { "self": { "href": "http://localhost/rest/fluege/1" } } },
            { "titel": "B", "art": "KINDLE",
              "_links": { "self": { "href": "http://localhost/rest/fluege/2" } } },
            { "titel": "C", "art": "DRUCKAUSGABE", "rating": 2 }
        ]))
        .unwrap()
    }

    #[test]
    fn test_bar_chart_skips_unrated() {
        let config = ChartConfig::from_payloads(ChartType::Bar, &payloads());

        assert_eq!(config.data.labels, vec!["1", UNDEFINED_ID]);
        assert_eq!(config.data.datasets[0].data, vec![4, 2]);
        assert_eq!(config.data.datasets[0].label.as_deref(), Some(RATING_LABEL));
    }

    #[test]
    fn test_pie_chart_colors_per_slice() {
        let config = ChartConfig::from_payloads(ChartType::Pie, &payloads());
        let value = serde_json::to_value(&config).unwrap();

        assert_eq!(value["type"], "pie");
        assert_eq!(
            value["data"]["datasets"][0]["backgroundColor"],
            json!(["#F7464A", "#46BFBD"])
        );
        assert_eq!(
            value["data"]["datasets"][0]["hoverBackgroundColor"],
            json!(["#FF5A5E", "#5AD3D1"])
        );
    }

    #[test]
    fn test_palette_wraps() {
        assert_eq!(background_color(5), background_color(0));
        assert_eq!(hover_background_color(7), hover_background_color(2));
    }
}
