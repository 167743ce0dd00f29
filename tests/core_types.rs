use camfilter::filter::ToneCurve;
use camfilter::{
    CamFilterError, Category, FilterChain, FilterSlot, Frame, GrayImage, ImageView, Selection,
};

#[test]
fn image_view_rejects_invalid_dimensions() {
    let data = [0u8; 4];

    let err = ImageView::from_slice(&data, 0, 1).err().unwrap();
    assert_eq!(
        err,
        CamFilterError::InvalidDimensions {
            width: 0,
            height: 1,
        }
    );

    let err = ImageView::from_slice(&data, 1, 0).err().unwrap();
    assert_eq!(
        err,
        CamFilterError::InvalidDimensions {
            width: 1,
            height: 0,
        }
    );
}

#[test]
fn image_view_rejects_invalid_stride() {
    let data = [0u8; 8];

    let err = ImageView::new(&data, 4, 1, 3).err().unwrap();
    assert_eq!(
        err,
        CamFilterError::InvalidStride {
            width: 4,
            stride: 3,
        }
    );
}

#[test]
fn image_view_rejects_small_buffer() {
    let data = [0u8; 3];

    let err = ImageView::new(&data, 2, 2, 2).err().unwrap();
    assert_eq!(err, CamFilterError::BufferTooSmall { needed: 4, got: 3 });
}

#[test]
fn frame_rejects_bad_buffers() {
    let err = Frame::from_rgba(vec![0; 15], 2, 2).err().unwrap();
    assert_eq!(err, CamFilterError::BufferTooSmall { needed: 16, got: 15 });

    let err = Frame::from_rgba(Vec::new(), 0, 3).err().unwrap();
    assert_eq!(
        err,
        CamFilterError::InvalidDimensions {
            width: 0,
            height: 3,
        }
    );

    let err = GrayImage::new(vec![0; 5], 2, 2).err().unwrap();
    assert!(matches!(err, CamFilterError::InvalidDimensions { .. }));
}

#[test]
fn invalid_curve_is_an_init_error() {
    let err = ToneCurve::from_points(&[0.0, 200.0, 100.0], &[0.0, 1.0, 2.0])
        .err()
        .unwrap();
    assert!(matches!(err, CamFilterError::InvalidCurve { .. }));
}

#[test]
fn cycling_returns_to_start() {
    for len in 1..6 {
        let start = FilterSlot::new(len);
        let mut slot = start;
        for _ in 0..len {
            slot = slot.next();
            assert!(slot.index() < len);
        }
        assert_eq!(slot, start);
    }
}

#[test]
fn chain_cycles_every_category() {
    let mut chain = FilterChain::standard(Vec::new());
    for category in Category::ALL {
        let len = chain.len(category);
        for step in 1..=len {
            let index = chain.select_next(category);
            assert_eq!(index, step % len);
            assert!(index < len);
        }
        assert_eq!(chain.active_index(category), 0);
    }
    assert_eq!(chain.selection(), Selection::default());
}

#[test]
fn restore_wraps_stale_indices() {
    let mut chain = FilterChain::standard(Vec::new());
    chain.restore(Selection {
        indices: [7, 9, 3, 5],
    });
    assert_eq!(chain.selection().indices, [2, 1, 1, 0]);
    assert_eq!(chain.selection().get(Category::ChannelMixer), 1);
    assert_eq!(
        chain.active_names(),
        ["portra", "recolor-rc", "stroke-edges", "identity"]
    );
}
