//! End-to-end tests through the MuPDF backend: analysis, single-page
//! processing, and double-page splitting against generated fixture PDFs.

#![cfg(feature = "render")]

mod common;

use common::FixturePage;
use pagemill::{DocumentBackend, MupdfBackend, PageAnalyzer, PageProcessor, Quiet};

#[test]
fn analyze_flags_wide_pages_only() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = common::write_fixture(
        dir.path(),
        "mixed.pdf",
        &[
            FixturePage::new(200.0, 300.0, vec![]),
            FixturePage::new(1000.0, 400.0, vec![]),
            FixturePage::new(600.0, 400.0, vec![]),
        ],
    );

    let backend = MupdfBackend::open(&pdf).unwrap();
    let mut notes: Vec<String> = Vec::new();
    let mut sink = pagemill::FnSink(|message: &str| notes.push(message.to_string()));
    let structure = PageAnalyzer::new(&backend).analyze(&mut sink).unwrap();

    assert_eq!(structure.len(), 3);
    assert!((structure[0].aspect_ratio - 200.0 / 300.0).abs() < 0.001);
    assert!(!structure[0].is_double_page);
    assert!(structure[1].is_double_page);
    // Ratio exactly 1.5 is a single page.
    assert!(!structure[2].is_double_page);
    assert_eq!(notes.len(), 1);
}

#[test]
fn process_page_renders_at_double_scale() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = common::write_fixture(
        dir.path(),
        "single.pdf",
        &[FixturePage::new(
            200.0,
            300.0,
            vec![("Hello", 20.0, 40.0), ("world", 120.0, 40.0), ("again", 20.0, 70.0)],
        )],
    );
    let output_dir = dir.path().join("out");

    let backend = MupdfBackend::open(&pdf).unwrap();
    let result = PageProcessor::new(&backend, &output_dir)
        .process_page(0, 1)
        .unwrap();

    assert_eq!(result.width, 400);
    assert_eq!(result.height, 600);

    assert_eq!(result.pdf_path, "out/pages/page_1.pdf");
    for name in ["page_1.pdf", "page_1.png", "page_1.jpg"] {
        let path = output_dir.join("pages").join(name);
        assert!(path.exists(), "missing artifact {name}");
        assert!(fs_size(&path) > 0, "empty artifact {name}");
    }

    let words = &result.text_data.words;
    assert_eq!(words.len(), 3);
    let texts: Vec<&str> = words.iter().map(|w| w.text.as_str()).collect();
    assert!(texts.contains(&"Hello"));
    assert!(texts.contains(&"world"));
    assert!(texts.contains(&"again"));
    for word in words {
        assert_eq!(word.font_name, "Unknown");
        assert!(word.font_size > 0.0);
    }

    // "Hello world" share a baseline; "again" sits 30 units lower.
    assert_eq!(result.text_data.paragraphs.len(), 2);
    assert_eq!(result.text_data.paragraphs[0].word_count, 2);
    assert_eq!(result.text_data.paragraphs[1].word_count, 1);
}

#[test]
fn process_double_page_splits_at_midline() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = common::write_fixture(
        dir.path(),
        "spread.pdf",
        &[FixturePage::new(
            1000.0,
            400.0,
            vec![
                ("lorem", 100.0, 60.0),
                ("ipsum", 200.0, 60.0),
                ("dolor", 600.0, 60.0),
                ("sit", 700.0, 60.0),
            ],
        )],
    );
    let output_dir = dir.path().join("out");

    let backend = MupdfBackend::open(&pdf).unwrap();
    let results = PageProcessor::new(&backend, &output_dir)
        .process_double_page(0, 5, &mut Quiet)
        .unwrap();

    assert_eq!(results.len(), 2);
    let (left, right) = (&results[0], &results[1]);

    // Each half is 500 page units wide, rasterized at 2x.
    assert_eq!(left.width, 1000);
    assert_eq!(left.height, 800);
    assert_eq!(right.width, 1000);
    assert_eq!(right.height, 800);

    assert_eq!(left.pdf_path, "out/pages/page_5.pdf");
    assert_eq!(right.pdf_path, "out/pages/page_6.pdf");

    let left_texts: Vec<&str> = left.text_data.words.iter().map(|w| w.text.as_str()).collect();
    let right_texts: Vec<&str> = right.text_data.words.iter().map(|w| w.text.as_str()).collect();
    assert_eq!(left_texts, vec!["lorem", "ipsum"]);
    assert_eq!(right_texts, vec!["dolor", "sit"]);

    // Left-half words keep their positions; right-half words are shifted
    // into the half's own frame.
    let lorem = &left.text_data.words[0];
    assert!((lorem.x - 100.0).abs() < 1.0);
    let dolor = &right.text_data.words[0];
    assert!((dolor.x - 100.0).abs() < 1.0);
    let sit = &right.text_data.words[1];
    assert!((sit.x - 200.0).abs() < 1.0);
}

#[test]
fn exported_halves_reopen_as_cropped_single_pages() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = common::write_fixture(
        dir.path(),
        "spread.pdf",
        &[FixturePage::new(1000.0, 400.0, vec![("text", 100.0, 60.0)])],
    );
    let output_dir = dir.path().join("out");

    let backend = MupdfBackend::open(&pdf).unwrap();
    PageProcessor::new(&backend, &output_dir)
        .process_double_page(0, 1, &mut Quiet)
        .unwrap();

    for number in [1, 2] {
        let half = MupdfBackend::open(output_dir.join(format!("pages/page_{number}.pdf"))).unwrap();
        assert_eq!(half.page_count(), 1);
        let bounds = half.page_bounds(0).unwrap();
        assert!(
            (bounds.width() - 500.0).abs() < 1.0,
            "half {number} has width {}",
            bounds.width()
        );
        assert!((bounds.height() - 400.0).abs() < 1.0);
    }
}

#[test]
fn missing_file_reports_render_error() {
    let err = MupdfBackend::open("/nonexistent/book.pdf").unwrap_err();
    assert!(matches!(err, pagemill::Error::Render(_)));
}

fn fs_size(path: &std::path::Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
