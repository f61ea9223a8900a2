use super::*;
use crate::dataset::{CellValue, Row};
use crate::report::layout::Item;
use crate::report::request::AnalysisMode;
use crate::summary::DatasetSummary;

fn averages(pairs: &[(&str, Option<f64>)]) -> IndexMap<String, Option<f64>> {
    pairs.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
}

/// Pump/Pump/Valve dataset from the summarizer tests.
fn plant_summary() -> Summary {
    Summary {
        total_count: 3,
        averages: averages(&[
            ("Flowrate", Some(15.0)),
            ("Pressure", Some(10.0)),
            ("Temperature", Some(25.0)),
        ]),
        type_distribution: [("Pump".to_string(), 2), ("Valve".to_string(), 1)]
            .into_iter()
            .collect(),
        per_type_averages: [
            ("Flowrate", averages(&[("Pump", Some(15.0)), ("Valve", None)])),
            ("Pressure", averages(&[("Pump", Some(5.0)), ("Valve", Some(15.0))])),
            ("Temperature", averages(&[("Pump", Some(25.0)), ("Valve", None)])),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect(),
    }
}

fn preview_row(name: &str) -> Row {
    [
        ("Equipment Name".to_string(), CellValue::Text(name.to_string())),
        ("Type".to_string(), CellValue::Text("Pump".to_string())),
        ("Flowrate".to_string(), CellValue::Number(10.0)),
    ]
    .into_iter()
    .collect()
}

fn context() -> ComposeContext {
    ComposeContext::new("alice")
}

fn texts(layout: &Layout) -> Vec<String> {
    layout.texts().map(str::to_string).collect()
}

mod sections {
    use super::*;

    #[test]
    fn preview_only_request_has_title_and_preview() {
        let mut request = ReportRequest::new(plant_summary());
        request.include.summary = false;
        request.include.type_chart = false;
        request.include.analysis.include = false;
        request.include.preview_rows = true;
        request.preview_rows = Some(vec![preview_row("P1"), preview_row("P2"), preview_row("P3")]);

        let report = Composer::default().compose(&request, &context()).unwrap();
        assert_eq!(report.sections, [SectionKind::Title, SectionKind::Preview]);
        assert_eq!(report.page_count, 1);
    }

    #[test]
    fn default_request_has_summary_and_type_chart() {
        let request = ReportRequest::new(plant_summary());
        let layout = Composer::default().layout(&request, &context()).unwrap();
        assert_eq!(
            layout.sections,
            [SectionKind::Title, SectionKind::Summary, SectionKind::TypeChart]
        );
        assert_eq!(layout.images.len(), 1);
    }

    #[test]
    fn stored_dataset_report_covers_every_column() {
        let dataset = DatasetSummary {
            summary: plant_summary(),
            preview_rows: vec![preview_row("P1")],
        };
        let request = ReportRequest::for_dataset(dataset, ChartKind::Pie);
        let layout = Composer::default().layout(&request, &context()).unwrap();
        assert_eq!(
            layout.sections,
            [
                SectionKind::Title,
                SectionKind::Summary,
                SectionKind::TypeChart,
                SectionKind::Analysis("Flowrate".to_string()),
                SectionKind::Analysis("Pressure".to_string()),
                SectionKind::Analysis("Temperature".to_string()),
                SectionKind::Preview,
            ]
        );
        assert_eq!(layout.images.len(), 4);
        assert!(texts(&layout).contains(&"Preview (first rows)".to_string()));
    }
}

mod text {
    use super::*;

    #[test]
    fn title_and_attribution() {
        let request = ReportRequest::new(plant_summary());
        let layout = Composer::default()
            .layout(&request, &context().with_source("plant.csv"))
            .unwrap();
        let lines = texts(&layout);
        assert_eq!(lines[0], "Chemical Equipment Report (Ad-hoc)");
        assert_eq!(lines[1], "File: plant.csv");
        assert_eq!(lines[2], "Generated by: alice");
        assert!(lines[3].starts_with("Generated at: "));
        assert!(matches!(layout.pages[0].items[4], Item::Rule { .. }));
    }

    #[test]
    fn explicit_title_wins() {
        let request = ReportRequest::new(plant_summary()).with_title("Q3 audit");
        let layout = Composer::default().layout(&request, &context()).unwrap();
        assert_eq!(texts(&layout)[0], "Q3 audit");
    }

    #[test]
    fn summary_lists_averages_and_distribution() {
        let mut summary = plant_summary();
        summary.averages.insert("Pressure".to_string(), None);
        let layout = Composer::default()
            .layout(&ReportRequest::new(summary), &context())
            .unwrap();
        let lines = texts(&layout);
        for expected in [
            "Summary",
            "Total equipment: 3",
            "Averages:",
            "Flowrate: 15.00",
            "Pressure: N/A",
            "Temperature: 25.00",
            "Type distribution",
            "Pump: 2",
            "Valve: 1",
        ] {
            assert!(lines.iter().any(|l| l == expected), "missing line {expected:?} in {lines:?}");
        }
    }

    #[test]
    fn missing_type_prints_its_label() {
        let mut summary = plant_summary();
        summary
            .type_distribution
            .insert(crate::summary::MISSING_TYPE_KEY.to_string(), 1);
        let layout = Composer::default()
            .layout(&ReportRequest::new(summary), &context())
            .unwrap();
        assert!(texts(&layout).contains(&"(missing): 1".to_string()));
    }

    #[test]
    fn empty_distribution_prints_notice_instead_of_chart() {
        let request = ReportRequest::new(Summary::default());
        let layout = Composer::default().layout(&request, &context()).unwrap();
        assert!(layout.images.is_empty());
        assert!(texts(&layout).contains(&"Type distribution chart not available.".to_string()));
    }

    #[test]
    fn missing_per_type_averages_print_notice() {
        let mut summary = plant_summary();
        summary.per_type_averages.clear();
        let mut request = ReportRequest::new(summary);
        request.include.analysis.include = true;
        let layout = Composer::default().layout(&request, &context()).unwrap();
        assert!(texts(&layout).contains(&"Per-type averages not available for this dataset.".to_string()));
    }

    #[test]
    fn unknown_parameter_prints_notice() {
        let mut request = ReportRequest::new(plant_summary());
        request.include.analysis.include = true;
        request.include.analysis.parameter = "Viscosity".to_string();
        let layout = Composer::default().layout(&request, &context()).unwrap();
        let lines = texts(&layout);
        assert!(lines.contains(&"Analysis - Viscosity".to_string()));
        assert!(lines.contains(&"No per-type averages available for Viscosity.".to_string()));
    }

    #[test]
    fn unavailable_types_are_counted() {
        let mut request = ReportRequest::new(plant_summary());
        request.include.analysis.include = true;
        let layout = Composer::default().layout(&request, &context()).unwrap();
        assert!(texts(&layout).contains(&"1 type(s) without data".to_string()));
    }
}

mod failures {
    use super::*;

    #[test]
    fn failed_chart_becomes_error_line() {
        let mut summary = plant_summary();
        summary.per_type_averages["Flowrate"].insert("Pump".to_string(), Some(f64::NAN));
        let mut request = ReportRequest::new(summary);
        request.include.analysis.include = true;

        let layout = Composer::default().layout(&request, &context()).unwrap();
        let failure = layout.pages.iter().flat_map(|p| &p.items).find_map(|item| match item {
            Item::Text { text, style, .. } if text == "Failed to draw analysis chart for Flowrate." => Some(style.tone),
            _ => None,
        });
        assert_eq!(failure, Some(Tone::Error));
        // the type chart is unaffected
        assert_eq!(layout.images.len(), 1);
    }

    #[test]
    fn unusable_margin_is_a_render_error() {
        let composer = Composer::new(ReportSettings {
            margin: 400.0,
            ..ReportSettings::default()
        });
        let err = composer
            .compose(&ReportRequest::new(plant_summary()), &context())
            .unwrap_err();
        assert!(matches!(err, ReportError::Render(_)));
        assert!(!err.is_input_error());
    }
}

mod pagination {
    use super::*;

    #[test]
    fn tall_analysis_charts_spill_onto_new_pages_once() {
        let composer = Composer::new(ReportSettings {
            analysis_chart_ratio: 1.5,
            ..ReportSettings::default()
        });
        let mut request = ReportRequest::new(plant_summary());
        request.include.analysis.include = true;
        request.include.analysis.mode = AnalysisMode::All;

        let layout = composer.layout(&request, &context()).unwrap();
        assert!(layout.page_count() > 1);
        let placed: Vec<usize> = layout.placed_images().collect();
        assert_eq!(placed, [0, 1, 2, 3]);
        assert_eq!(layout.images.len(), 4);

        let bottom = layout.geometry.margin;
        for item in layout.pages.iter().flat_map(|p| &p.items) {
            if let Item::Image { y, .. } = item {
                assert!(*y >= bottom - 1e-6, "image below bottom margin: {y}");
            }
        }
    }
}

mod output {
    use super::*;

    #[test]
    fn compose_returns_complete_pdf() {
        let request = ReportRequest::new(plant_summary()).with_filename("plant");
        let report = Composer::default().compose(&request, &context()).unwrap();
        assert!(report.bytes.starts_with(b"%PDF"));
        assert_eq!(report.filename, "plant.pdf");
        assert_eq!(report.page_count, 1);
    }

    #[test]
    fn supplied_preview_is_capped_at_ten_rows() {
        let mut request = ReportRequest::new(plant_summary());
        request.preview_rows = Some((0..15).map(|i| preview_row(&format!("P{i}"))).collect());
        let layout = Composer::default().layout(&request, &context()).unwrap();
        let lines = texts(&layout);
        assert!(lines.contains(&"Preview (provided rows)".to_string()));
        assert!(lines.contains(&"P9".to_string()));
        assert!(!lines.contains(&"P10".to_string()));
    }

    #[test]
    fn preview_columns_are_capped() {
        let row: Row = (0..9)
            .map(|i| (format!("c{i}"), CellValue::Number(f64::from(i))))
            .collect();
        let mut request = ReportRequest::new(Summary::default());
        request.include.summary = false;
        request.include.type_chart = false;
        request.preview_rows = Some(vec![row]);
        let layout = Composer::default().layout(&request, &context()).unwrap();
        let lines = texts(&layout);
        assert!(lines.contains(&"c5".to_string()));
        assert!(!lines.contains(&"c6".to_string()));
    }
}

mod ordering {
    use super::*;

    #[test]
    fn types_sort_by_count_then_first_seen() {
        let mut summary = Summary::default();
        for (t, n) in [("Valve", 1), ("Pump", 3), ("Mixer", 1), ("Tank", 3)] {
            summary.type_distribution.insert(t.to_string(), n);
        }
        assert_eq!(ordered_types(&summary), ["Pump", "Tank", "Valve", "Mixer"]);
    }

    #[test]
    fn analysis_series_follows_type_order_and_skips_missing() {
        let summary = plant_summary();
        let types = ordered_types(&summary);
        let data = analysis_series(&summary, "Temperature", &types);
        assert_eq!(data.series.keys().collect::<Vec<_>>(), ["Pump"]);
        assert_eq!(data.missing, 1);
        assert!(analysis_series(&summary, "Viscosity", &types).series.is_empty());
    }
}

mod type_chart {
    use super::*;

    #[test]
    fn hist_bins_dataset_averages() {
        let summary = plant_summary();
        let types = ordered_types(&summary);
        let chart = type_chart_request(&summary, &types, ChartKind::Hist);
        assert_eq!(chart.samples, Some(vec![15.0, 10.0, 25.0]));
        assert_eq!(chart.series["Pump"], 2.0);
    }

    #[test]
    fn hist_falls_back_to_counts_without_averages() {
        let mut summary = plant_summary();
        for value in summary.averages.values_mut() {
            *value = None;
        }
        let types = ordered_types(&summary);
        let chart = type_chart_request(&summary, &types, ChartKind::Hist);
        assert_eq!(chart.samples, None);
        assert_eq!(chart.title, "Histogram of type counts");
    }

    #[test]
    fn other_kinds_chart_counts() {
        let summary = plant_summary();
        let types = ordered_types(&summary);
        for kind in [ChartKind::Bar, ChartKind::Pie, ChartKind::Line] {
            let chart = type_chart_request(&summary, &types, kind);
            assert_eq!(chart.samples, None);
            assert_eq!(chart.value_label.as_deref(), Some("Count"));
        }
    }
}

mod settings {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(ReportSettings::default().validate().is_ok());
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let cases = [
            ReportSettings {
                margin: 310.0,
                ..ReportSettings::default()
            },
            ReportSettings {
                type_chart_ratio: 0.0,
                ..ReportSettings::default()
            },
            ReportSettings {
                analysis_chart_ratio: f64::NAN,
                ..ReportSettings::default()
            },
            ReportSettings {
                preview_columns: 0,
                ..ReportSettings::default()
            },
        ];
        for settings in cases {
            assert!(matches!(settings.validate(), Err(ReportError::Config(_))));
        }
    }

    #[test]
    fn label_limit_must_fit_an_ellipsis() {
        let mut settings = ReportSettings::default();
        for len in [1, 2, 3] {
            settings.chart.label_max_len = len;
            assert!(matches!(settings.validate(), Err(ReportError::Config(_))));
        }
        settings.chart.label_max_len = 4;
        assert!(settings.validate().is_ok());
    }
}
