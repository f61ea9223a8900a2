use super::*;

fn letter() -> PageGeometry {
    PageGeometry::letter(72.0).unwrap()
}

fn pixel() -> DecodedImage {
    DecodedImage {
        width: 1,
        height: 1,
        rgb: vec![255, 255, 255],
    }
}

mod geometry {
    use super::*;

    #[test]
    fn letter_content_area() {
        let g = letter();
        assert!((g.content_width() - 468.0).abs() < f64::EPSILON);
        assert!((g.content_height() - 648.0).abs() < f64::EPSILON);
        assert!((g.content_top() - 720.0).abs() < f64::EPSILON);
    }

    #[test]
    fn oversized_margins_are_rejected() {
        assert!(matches!(PageGeometry::letter(306.0), Err(ReportError::Render(_))));
        assert!(PageGeometry::letter(-1.0).is_err());
        assert!(PageGeometry::letter(f64::NAN).is_err());
    }
}

mod cursor {
    use super::*;

    #[test]
    fn lines_move_down_and_stay_on_page() {
        let mut engine = LayoutEngine::new(letter());
        engine.line("one", TextStyle::body());
        engine.line("two", TextStyle::body());
        let layout = engine.finish();
        let ys: Vec<f64> = layout.pages[0]
            .items
            .iter()
            .filter_map(|i| match i {
                Item::Text { y, .. } => Some(*y),
                _ => None,
            })
            .collect();
        assert!((ys[0] - 710.0).abs() < 1e-9);
        assert!((ys[0] - ys[1] - 14.0).abs() < 1e-9);
    }

    #[test]
    fn ensure_space_breaks_only_when_needed() {
        let mut engine = LayoutEngine::new(letter());
        engine.line("x", TextStyle::body());
        assert!(!engine.ensure_space(100.0));
        assert!(engine.ensure_space(1000.0));
        assert_eq!(engine.page_count(), 2);
    }

    #[test]
    fn empty_page_is_never_broken() {
        let mut engine = LayoutEngine::new(letter());
        assert!(!engine.ensure_space(5000.0));
        assert_eq!(engine.page_count(), 1);
    }

    #[test]
    fn many_lines_paginate() {
        let mut engine = LayoutEngine::new(letter());
        for i in 0..100 {
            engine.line(&format!("line {i}"), TextStyle::body());
        }
        let layout = engine.finish();
        // 648 / 14 = 46 lines per page
        assert_eq!(layout.page_count(), 3);
        assert_eq!(layout.texts().count(), 100);
        assert_eq!(layout.pages[0].items.len(), 46);
    }

    #[test]
    fn long_lines_are_truncated() {
        let mut engine = LayoutEngine::new(letter());
        engine.line(&"W".repeat(200), TextStyle::body());
        let layout = engine.finish();
        let text = layout.texts().next().unwrap();
        assert!(text.ends_with("..."));
        assert!(text.len() < 200);
    }

    #[test]
    fn heading_is_kept_with_following_block() {
        let mut engine = LayoutEngine::new(letter());
        for _ in 0..40 {
            engine.line("filler", TextStyle::body());
        }
        engine.heading("Analysis - Flowrate", 200.0);
        let layout = engine.finish();
        assert_eq!(layout.page_count(), 2);
        assert!(matches!(
            &layout.pages[1].items[0],
            Item::Text { text, .. } if text == "Analysis - Flowrate"
        ));
    }

    #[test]
    fn finish_always_yields_a_page() {
        let layout = LayoutEngine::new(letter()).finish();
        assert_eq!(layout.page_count(), 1);
        assert!(layout.pages[0].items.is_empty());
    }
}

mod images {
    use super::*;

    #[test]
    fn image_that_does_not_fit_moves_to_next_page() {
        let mut engine = LayoutEngine::new(letter());
        for _ in 0..30 {
            engine.line("filler", TextStyle::body());
        }
        engine.image(pixel(), 468.0, 300.0);
        let layout = engine.finish();
        assert_eq!(layout.page_count(), 2);
        assert!(matches!(layout.pages[1].items[0], Item::Image { y, .. } if (y - 420.0).abs() < 1e-9));
    }

    #[test]
    fn oversized_image_is_shrunk_not_repeated() {
        let mut engine = LayoutEngine::new(letter());
        engine.image(pixel(), 468.0, 2000.0);
        let layout = engine.finish();
        assert_eq!(layout.page_count(), 1);
        assert_eq!(layout.placed_images().collect::<Vec<_>>(), [0]);
        match layout.pages[0].items[0] {
            Item::Image { width, height, .. } => {
                assert!((height - 648.0).abs() < 1e-9);
                assert!((width - 468.0 * 648.0 / 2000.0).abs() < 1e-9);
            }
            ref other => panic!("expected image, got {other:?}"),
        }
    }

    #[test]
    fn fit_height_respects_reserved_space() {
        let engine = LayoutEngine::new(letter());
        assert!((engine.fit_height(1000.0, 48.0) - 600.0).abs() < 1e-9);
        assert!((engine.fit_height(200.0, 48.0) - 200.0).abs() < 1e-9);
    }
}

mod tables {
    use super::*;

    fn header() -> Vec<String> {
        vec!["Name".to_string(), "Type".to_string()]
    }

    #[test]
    fn columns_split_content_width() {
        let mut engine = LayoutEngine::new(letter());
        engine.table(&header(), &[vec!["P1".to_string(), "Pump".to_string()]]);
        let layout = engine.finish();
        let xs: Vec<f64> = layout.pages[0]
            .items
            .iter()
            .filter_map(|i| match i {
                Item::Text { x, .. } => Some(*x),
                _ => None,
            })
            .collect();
        assert_eq!(xs, [72.0, 306.0, 72.0, 306.0]);
    }

    #[test]
    fn header_repeats_after_page_break() {
        let rows: Vec<Vec<String>> = (0..80)
            .map(|i| vec![format!("P{i}"), "Pump".to_string()])
            .collect();
        let mut engine = LayoutEngine::new(letter());
        engine.table(&header(), &rows);
        let layout = engine.finish();
        assert_eq!(layout.page_count(), 2);
        let headers = layout.texts().filter(|t| *t == "Name").count();
        assert_eq!(headers, 2);
        assert!(matches!(
            &layout.pages[1].items[0],
            Item::Text { text, style, .. } if text == "Name" && style.font == Font::Bold
        ));
    }

    #[test]
    fn empty_column_set_draws_nothing() {
        let mut engine = LayoutEngine::new(letter());
        engine.table(&[], &[vec!["x".to_string()]]);
        assert!(engine.finish().texts().next().is_none());
    }
}

#[test]
fn sections_are_recorded_in_order() {
    let mut engine = LayoutEngine::new(letter());
    engine.begin_section(SectionKind::Title);
    engine.begin_section(SectionKind::Analysis("Flowrate".to_string()));
    let layout = engine.finish();
    assert_eq!(
        layout.sections,
        [SectionKind::Title, SectionKind::Analysis("Flowrate".to_string())]
    );
}

#[test]
fn section_kinds_serialize_with_column() {
    let json = serde_json::to_string(&SectionKind::Analysis("Pressure".to_string())).unwrap();
    assert_eq!(json, r#"{"section":"analysis","column":"Pressure"}"#);
}
