//! Fixture PDFs built with lopdf for end-to-end tests.

use std::fs;
use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// One positioned word: text, left edge, and baseline measured from the
/// page top (top-left-origin page units).
pub type FixtureWord<'a> = (&'a str, f32, f32);

/// Description of one fixture page.
pub struct FixturePage<'a> {
    pub width: f32,
    pub height: f32,
    pub words: Vec<FixtureWord<'a>>,
}

impl<'a> FixturePage<'a> {
    pub fn new(width: f32, height: f32, words: Vec<FixtureWord<'a>>) -> Self {
        Self {
            width,
            height,
            words,
        }
    }
}

/// Write a PDF with the given pages to `dir`, returning its path.
///
/// Every page carries its own MediaBox and a Helvetica resource; each word
/// is placed with an absolute text position so extraction sees one span
/// per word.
pub fn write_fixture(dir: &Path, name: &str, pages: &[FixturePage]) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page in pages {
        let mut operations = Vec::new();
        for &(text, x, baseline_from_top) in &page.words {
            // PDF text space is bottom-up; fixtures speak top-left units.
            let y = page.height - baseline_from_top;
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
            operations.push(Operation::new(
                "Td",
                vec![Object::Real(x), Object::Real(y)],
            ));
            operations.push(Operation::new("Tj", vec![Object::string_literal(text)]));
            operations.push(Operation::new("ET", vec![]));
        }

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("failed to encode content stream"),
        ));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Real(0.0),
                Object::Real(0.0),
                Object::Real(page.width),
                Object::Real(page.height),
            ],
            "Resources" => resources_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join(name);
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("failed to save fixture PDF");
    fs::write(&path, buffer).expect("failed to write fixture PDF");
    path
}
