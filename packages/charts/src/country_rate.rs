//! Country death rates as horizontal bars with value labels.

use road_safety_dataset_models::CountryRate;
use serde_json::{Value, json};

use crate::ViewContext;
use crate::VEGA_LITE_SCHEMA;
use crate::encoding::expr_string;
use crate::palette::{BLUE, LABEL_TEXT, TENNE};

/// Builds the country-rate bar for the country year in `ctx`.
#[must_use]
pub fn build(rates: &[CountryRate], ctx: &ViewContext<'_>) -> Value {
    let year = ctx.params.country_year;
    let values: Vec<&CountryRate> = rates.iter().filter(|r| r.year == year).collect();

    if values.is_empty() {
        log::warn!("No country rates for {year}");
    }

    let highlight = format!(
        "datum.country == {}",
        expr_string(&ctx.settings.highlight_country)
    );

    json!({
        "$schema": VEGA_LITE_SCHEMA,
        "width": 900,
        "height": 400,
        "data": {"values": values},
        "layer": [
            {
                "mark": "bar",
                "encoding": {
                    "y": {
                        "field": "country",
                        "type": "nominal",
                        "title": null,
                        "sort": "-x",
                        "axis": {"labelLimit": 150}
                    },
                    "x": {
                        "field": "rate",
                        "type": "quantitative",
                        "title": "Deaths per 100,000 Population",
                        "scale": {"domain": [0, 40]}
                    },
                    "color": {
                        "condition": {"test": highlight, "value": TENNE},
                        "value": BLUE
                    },
                    "tooltip": [
                        {"field": "country", "title": "Country"},
                        {"field": "rate", "title": "Rate per 100k", "format": ".1f"},
                        {"field": "year", "title": "Year"}
                    ]
                }
            },
            {
                "mark": {
                    "type": "text",
                    "align": "left",
                    "dx": 5,
                    "fontSize": 12,
                    "fontWeight": "bold"
                },
                "encoding": {
                    "y": {"field": "country", "type": "nominal", "sort": "-x"},
                    "x": {"field": "rate", "type": "quantitative"},
                    "text": {"field": "rate", "type": "quantitative", "format": ".1f"},
                    "color": {"value": LABEL_TEXT}
                }
            }
        ]
    })
}
