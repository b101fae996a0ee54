use criterion::{criterion_group, criterion_main, Criterion};

use cvpress::export::export_pdf;
use cvpress::{template, ExportConfig, LivePage};

fn bench_export(c: &mut Criterion) {
    let resume: template::ResumeData = serde_json::from_str(
        r#"{
            "title": "Benchmark Resume",
            "profileInfo": {"fullName": "Bench Mark", "designation": "Engineer", "summary": "Measured."},
            "workExperience": [{"company": "Acme", "role": "Engineer", "startDate": "2020", "endDate": "2024", "description": "Shipped."}],
            "skills": [{"name": "Rust", "progress": 90}]
        }"#,
    )
    .expect("bench resume");

    let page = LivePage::new(vec![template::compose_surface(&resume)]);
    let config = ExportConfig::default();
    let rt = tokio::runtime::Runtime::new().expect("runtime");

    c.bench_function("export_pdf_a4", |b| {
        b.iter(|| {
            let doc = rt
                .block_on(export_pdf(&page, page.root(0), &config))
                .expect("export");
            criterion::black_box(doc.len())
        })
    });
}

criterion_group!(benches, bench_export);
criterion_main!(benches);
