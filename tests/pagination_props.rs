use cvpress::export::paginate::{page_height_px, page_slices, PageSlice};
use cvpress::PageFormat;

#[test]
fn uneven_tail_band_partition() {
    // 2500 px tall at 1000 px pages: bands [0,1000), [1000,2000), [2000,2500)
    let slices = page_slices(2500, 1000);
    assert_eq!(
        slices,
        vec![
            PageSlice { top: 0, height: 1000 },
            PageSlice { top: 1000, height: 1000 },
            PageSlice { top: 2000, height: 500 },
        ]
    );
}

#[test]
fn partition_is_exact_contiguous_and_ceil_sized() {
    for (h, p) in [(1u32, 1000u32), (999, 1000), (1000, 1000), (1001, 1000), (2500, 1000), (123_457, 997)] {
        let slices = page_slices(h, p);

        let expected_pages = (h + p - 1) / p;
        assert_eq!(slices.len() as u32, expected_pages, "H={} P={}", h, p);

        // Contiguous from the top, no gap, no overlap, full coverage
        let mut cursor = 0u32;
        for slice in &slices {
            assert_eq!(slice.top, cursor, "H={} P={}", h, p);
            assert!(slice.height > 0 && slice.height <= p);
            cursor += slice.height;
        }
        assert_eq!(cursor, h, "H={} P={}", h, p);
    }
}

#[test]
fn bitmap_no_taller_than_a_page_yields_one_slice() {
    let p = page_height_px(1600, PageFormat::A4Portrait);
    assert!(p > 0);
    assert_eq!(page_slices(p, p).len(), 1);
    assert_eq!(page_slices(p - 1, p).len(), 1);
    assert_eq!(page_slices(p + 1, p).len(), 2);
}

#[test]
fn degenerate_inputs_produce_no_slices() {
    assert!(page_slices(0, 1000).is_empty());
    assert!(page_slices(1000, 0).is_empty());
}
