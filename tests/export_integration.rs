use std::fs;
use std::path::PathBuf;

use cvpress::export::paginate::{page_height_px, page_slices};
use cvpress::export::{export_pdf, render_surface};
use cvpress::surface::{Style, SurfaceNode, Transform};
use cvpress::{deliver, template, Error, ExportConfig, LivePage};
use sha2::{Digest, Sha256};

fn sample_resume() -> template::ResumeData {
    serde_json::from_str(
        r#"{
            "title": "Jane Doe Resume",
            "theme": "02",
            "profileInfo": {"fullName": "Jane Doe", "designation": "Systems Engineer", "summary": "Builds reliable export pipelines."},
            "contactInfo": {"email": "jane@example.com", "phone": "555-0100", "location": "Berlin"},
            "workExperience": [
                {"company": "Acme", "role": "Engineer", "startDate": "2020", "endDate": "2024", "description": "Shipped the document pipeline."}
            ],
            "education": [{"degree": "BSc CS", "institution": "TU Berlin", "startDate": "2016", "endDate": "2020"}],
            "skills": [{"name": "Rust", "progress": 90}, {"name": "PDF internals", "progress": 70}],
            "interests": ["climbing", "synthesizers"]
        }"#,
    )
    .expect("sample resume JSON")
}

/// A surface tall enough to spill over several A4 pages.
fn tall_surface(lines: usize) -> SurfaceNode {
    let children = (0..lines)
        .map(|i| SurfaceNode::text(format!("line {}", i), Style { margin: 2.0, ..Style::default() }))
        .collect();
    SurfaceNode::block(Style { padding: 16.0, ..Style::default() }).with_children(children)
}

#[tokio::test]
async fn zero_sized_thumbnail_surface_still_exports() {
    // The live node renders at zero size behind a thumbnail transform; the
    // pipeline must force the nominal width and strip the transform
    let mut surface = template::compose_surface(&sample_resume());
    surface.style.width = Some(0.0);
    surface.style.height = Some(0.0);
    surface.style.transform = Some(Transform::scaled(0.0));

    let page = LivePage::new(vec![surface]);
    let config = ExportConfig::default();

    let bitmap = render_surface(&page, page.root(0), &config).await.expect("capture");
    assert!(bitmap.width > 0 && bitmap.height > 0);
    // 800 px nominal width at 2x
    assert_eq!(bitmap.width, 1600);
}

#[tokio::test]
async fn export_leaves_no_nodes_behind() {
    let page = LivePage::new(vec![template::compose_surface(&sample_resume())]);
    let config = ExportConfig::default();
    let before = page.node_count();

    let doc = export_pdf(&page, page.root(0), &config).await.expect("export");
    assert!(!doc.is_empty());
    assert_eq!(page.node_count(), before);
    assert_eq!(page.host_count(), 0);
}

#[tokio::test]
async fn failed_export_also_cleans_up() {
    // An empty block lays out to zero height: the capture is empty, the
    // export rejects as a rendering failure and must not paginate
    let page = LivePage::new(vec![SurfaceNode::block(Style::default())]);
    let config = ExportConfig::default();
    let before = page.node_count();

    match export_pdf(&page, page.root(0), &config).await {
        Err(Error::RenderError(_)) => {}
        other => panic!("expected a rendering failure, got {:?}", other.map(|d| d.len())),
    }
    assert_eq!(page.node_count(), before);
    assert_eq!(page.host_count(), 0);
}

#[tokio::test]
async fn missing_target_fails_fast() {
    let page = LivePage::new(vec![tall_surface(4)]);
    let err = export_pdf(&page, None, &ExportConfig::default()).await.err();
    assert!(matches!(err, Some(Error::ElementNotFound)));
}

#[tokio::test]
async fn repeated_export_is_byte_identical() {
    let page = LivePage::new(vec![template::compose_surface(&sample_resume())]);
    let config = ExportConfig::default();

    let first = export_pdf(&page, page.root(0), &config).await.expect("first export");
    let second = export_pdf(&page, page.root(0), &config).await.expect("second export");
    assert_eq!(first.as_bytes(), second.as_bytes());
}

#[tokio::test]
async fn tall_surface_paginates_to_the_expected_page_count() {
    let page = LivePage::new(vec![tall_surface(250)]);
    let config = ExportConfig::default();

    let bitmap = render_surface(&page, page.root(0), &config).await.expect("capture");
    let expected_pages = page_slices(bitmap.height, page_height_px(bitmap.width, config.page)).len();
    assert!(expected_pages >= 2, "fixture should span multiple pages, got {}", expected_pages);

    let doc = export_pdf(&page, page.root(0), &config).await.expect("export");
    assert!(doc.as_bytes().starts_with(b"%PDF-"));

    // One /Contents entry per page in the document
    let needle: &[u8] = b"/Contents";
    let found = doc
        .as_bytes()
        .windows(needle.len())
        .filter(|w| **w == *needle)
        .count();
    assert_eq!(found, expected_pages);
}

#[tokio::test]
async fn capture_pixels_contain_text_ink_on_background() {
    let page = LivePage::new(vec![template::compose_surface(&sample_resume())]);
    let config = ExportConfig::default();

    let bitmap = render_surface(&page, page.root(0), &config).await.expect("capture");
    let png_data = bitmap.encode_png().expect("encode");
    assert_eq!(&png_data[0..8], b"\x89PNG\r\n\x1a\n");

    let decoder = png::Decoder::new(&png_data[..]);
    let mut reader = decoder.read_info().expect("decode");
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).expect("frame");
    assert_eq!(info.width, bitmap.width);
    assert_eq!(info.height, bitmap.height);

    let bytes = &buf[..info.buffer_size()];
    let mut found_ink = false;
    let mut found_white = false;
    for chunk in bytes.chunks(4) {
        if chunk[0] < 64 && chunk[1] < 64 && chunk[2] < 64 {
            found_ink = true;
        }
        if chunk[0] == 255 && chunk[1] == 255 && chunk[2] == 255 {
            found_white = true;
        }
        if found_ink && found_white {
            break;
        }
    }
    assert!(found_ink, "expected rendered text pixels in the capture");
    assert!(found_white, "expected white background pixels in the capture");
}

#[tokio::test]
async fn download_uses_title_derived_filename() {
    assert_eq!(deliver::download_filename(None), "resume.pdf");
    assert_eq!(deliver::download_filename(Some("Jane Doe Resume")), "Jane Doe Resume.pdf");

    let page = LivePage::new(vec![template::compose_surface(&sample_resume())]);
    let config = ExportConfig::default();
    let doc = export_pdf(&page, page.root(0), &config).await.expect("export");

    let dir = std::env::temp_dir().join("cvpress-test-downloads");
    fs::create_dir_all(&dir).expect("tempdir");
    let path = deliver::save_download(&doc, Some("Jane Doe Resume"), &dir).expect("save");
    assert!(path.ends_with("Jane Doe Resume.pdf"));
    assert_eq!(fs::read(&path).expect("read back").len(), doc.len());
    fs::remove_file(&path).ok();
}

fn golden_path() -> PathBuf {
    let mut p = PathBuf::from("tests/goldens/expected");
    p.push("resume_a4.pdf.sha256");
    p
}

#[tokio::test]
async fn golden_document_digest_matches() {
    let page = LivePage::new(vec![template::compose_surface(&sample_resume())]);
    let doc = export_pdf(&page, page.root(0), &ExportConfig::default())
        .await
        .expect("export");
    let digest = hex::encode(Sha256::digest(doc.as_bytes()));

    let gpath = golden_path();
    if std::env::var("UPDATE_GOLDENS").is_ok() {
        fs::create_dir_all(gpath.parent().unwrap()).ok();
        fs::write(&gpath, &digest).expect("write golden");
        eprintln!("Updated golden: {:?}", gpath);
        return;
    }

    if !gpath.exists() {
        println!("No golden at {:?}; run with UPDATE_GOLDENS=1 to create it. Skipping.", gpath);
        return;
    }

    let expected = fs::read_to_string(&gpath).expect("read golden");
    assert_eq!(digest, expected.trim(), "PDF digest does not match golden");
}
